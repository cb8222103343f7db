//! TF-IDF sparse lexical embedder.
//!
//! Fitted once on a catalog corpus. Vectors are indexed by a lexicographically
//! sorted vocabulary of unigrams and bigrams, weighted by raw term count times
//! smoothed inverse document frequency, and L2-normalized. All weights are
//! non-negative, so the dot product of two vectors already lies in [0, 1].

use crate::error::Result;
use crate::provider::{EmbeddingProvider, ScoreRange};
use async_trait::async_trait;
use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::LazyLock;
use tracing::{debug, info};

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("TOKEN_PATTERN is a compile-time constant"));

static STOP_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything",
    "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became", "because",
    "become", "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below",
    "beside", "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call",
    "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail",
    "do", "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together",
    "too", "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up",
    "upon", "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
    "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon",
    "wherever", "whether", "which", "while", "whither", "who", "whoever", "whole", "whom",
    "whose", "why", "will", "with", "within", "without", "would", "yet", "you", "your", "yours",
    "yourself", "yourselves",
];

/// Split text into analyzed terms: lowercase word tokens of two or more
/// characters with stop words removed, followed by adjacent-token bigrams.
pub fn analyze(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !STOP_WORDS.contains(t))
        .collect();

    let mut terms: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    terms.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    terms
}

/// TF-IDF embedder fitted on a fixed corpus.
pub struct TfidfEmbedder {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfEmbedder {
    /// Fit vocabulary and IDF weights on `corpus`.
    pub fn fit(corpus: &[String]) -> Self {
        let analyzed: Vec<Vec<String>> = corpus.iter().map(|doc| analyze(doc)).collect();

        let terms: BTreeSet<&str> = analyzed
            .iter()
            .flat_map(|doc| doc.iter().map(String::as_str))
            .collect();
        let vocabulary: HashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term.to_string(), index))
            .collect();

        let mut document_frequency = vec![0usize; vocabulary.len()];
        for doc in &analyzed {
            let unique: HashSet<usize> = doc.iter().filter_map(|t| vocabulary.get(t).copied()).collect();
            for index in unique {
                document_frequency[index] += 1;
            }
        }

        let n_docs = corpus.len() as f32;
        let idf = document_frequency
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        info!(
            documents = corpus.len(),
            vocabulary = vocabulary.len(),
            "TF-IDF embedder fitted"
        );

        Self { vocabulary, idf }
    }

    /// Number of vocabulary terms
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.vocabulary.len()];
        for term in analyze(text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                vector[index] += 1.0;
            }
        }

        for (weight, idf) in vector.iter_mut().zip(&self.idf) {
            *weight *= idf;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for weight in &mut vector {
                *weight /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for TfidfEmbedder {
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        debug!(batch_size = texts.len(), "TF-IDF embedding");
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }

    fn name(&self) -> &str {
        "tfidf"
    }

    fn score_range(&self) -> ScoreRange {
        ScoreRange::Unit
    }
}

//! Server module
//!
//! # Module Structure
//!
//! - `config`: Configuration structures
//! - `loader`: Configuration loading from files and environment
//! - `init`: Engine construction, router assembly and run loop
//! - `shutdown`: Ctrl+C / SIGTERM handling

pub mod config;
mod init;
mod loader;
mod shutdown;

// Re-export public API
pub use init::{build_engine, run};
pub use loader::load_config;

use anyhow::Result;

// Public modules
pub mod models;
pub mod cli;
pub mod config;
pub mod matcher;
pub mod resolver;
pub mod fetch;
pub mod refresh;
pub mod render;
pub mod download;
pub mod archive;

// Re-export commonly used types
pub use models::*;
pub use anyhow::{Context, Result as AnyhowResult};

// Common type aliases
pub type RelgetResult<T> = Result<T>;

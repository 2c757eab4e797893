//! Document writers
//!
//! Persists scraped documents as JSON and derives file names for them.

pub mod json;
pub mod path;

pub use json::{format_file_size, json_stats, save_json, JsonStats, JsonWriteOptions};
pub use path::{generate_filename, generate_gp_filename, season_filename};

/// Output writer errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

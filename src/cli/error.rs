//! CLI error types and conversions

use crate::fetcher::FetcherError;
use crate::output::OutputError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Scrape failed
    #[error("fetcher error: {0}")]
    FetcherError(#[from] FetcherError),

    /// Document could not be written
    #[error("output error: {0}")]
    OutputError(#[from] OutputError),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

//! CLI command implementations

pub mod error;
pub mod scrape;

pub use error::CliError;
pub use scrape::{Cli, Commands, GrandPrixArgs, LatestArgs, SeasonArgs, SelectionArgs};

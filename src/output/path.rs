//! File name generation for scraped documents
//!
//! - [`generate_filename`] - `prefix_YYYY-MM-DDTHH-MM-SS.ext` or `prefix.ext`
//! - [`generate_gp_filename`] - `2025_miami-grand-prix.json`
//! - [`season_filename`] - `season-2025.json`

use chrono::{DateTime, Utc};

/// File name from a prefix, optionally stamped with the current UTC time
pub fn generate_filename(prefix: &str, extension: &str, include_timestamp: bool) -> String {
    if include_timestamp {
        stamped_filename(prefix, extension, Utc::now())
    } else {
        format!("{prefix}.{extension}")
    }
}

fn stamped_filename(prefix: &str, extension: &str, at: DateTime<Utc>) -> String {
    format!("{}_{}.{}", prefix, at.format("%Y-%m-%dT%H-%M-%S"), extension)
}

/// File name for one Grand Prix document
///
/// The name is lowercased, whitespace runs become `-`, and anything outside
/// `[a-z0-9-]` is dropped, so the result never contains a path separator.
pub fn generate_gp_filename(meeting_name: &str, year: i32, extension: &str) -> String {
    format!("{}_{}.{}", year, slugify(meeting_name), extension)
}

/// File name for a season document
pub fn season_filename(year: i32) -> String {
    format!("season-{year}.json")
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_whitespace = false;

    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            slug.push(c);
        }
    }

    slug
}

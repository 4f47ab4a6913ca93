//! Console prefixes and timestamp helpers.

use owo_colors::OwoColorize;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::OffsetDateTime;

fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if use_colors() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn warn_prefix() -> String {
    if use_colors() {
        "warning:".yellow().bold().to_string()
    } else {
        "warning:".to_string()
    }
}

/// Filesystem-safe timestamp used in backup and export file names.
pub fn timestamp_slug() -> String {
    let fmt = format_description!("[year]-[month]-[day]-[hour]-[minute]-[second]");
    OffsetDateTime::now_utc().format(&fmt).unwrap_or_default()
}

/// RFC 3339 timestamp for export payloads.
pub fn timestamp_iso() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_slug_shape() {
        let slug = timestamp_slug();
        // e.g. 2026-08-23-10-42-07
        assert_eq!(slug.len(), 19);
        assert_eq!(slug.matches('-').count(), 5);
    }
}

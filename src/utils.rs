/// Utility functions for formatting
use time::{format_description, OffsetDateTime};

/// Format a timestamp for human-readable logging
///
/// Converts an OffsetDateTime to DD.MM.YYYY - HH:MM:SS format
/// Falls back to default string representation if formatting fails.
pub fn format_datetime(dt: &OffsetDateTime) -> String {
    let format = format_description::parse("[day].[month].[year] - [hour]:[minute]:[second]")
        .expect("Failed to create format description");
    dt.format(&format).unwrap_or_else(|_| dt.to_string())
}

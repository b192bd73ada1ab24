//! Tour-time rendering for templated emails.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};

/// Format a raw tour-time string as `MM/DD/YYYY, H:M`.
///
/// Month and day are zero-padded; hour and minute are not. The unpadded
/// hour/minute matches the output the notification emails have always
/// carried, so `9:05` renders as `9:5`.
///
/// Unparseable input is passed through verbatim: the rendering is cosmetic
/// and must never fail an intake.
pub fn format_tour_time(raw: &str) -> String {
    match parse(raw) {
        Some(dt) => format!(
            "{:02}/{:02}/{}, {}:{}",
            dt.month(),
            dt.day(),
            dt.year(),
            dt.hour(),
            dt.minute()
        ),
        None => raw.to_string(),
    }
}

fn parse(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        // Render in the timestamp's own offset, not UTC.
        return Some(dt.naive_local());
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%m/%d/%Y %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

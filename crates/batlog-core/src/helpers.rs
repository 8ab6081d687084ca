//! Timestamp helpers shared by the parser, the store, and the CLI.
//!
//! Records are stamped with a compact, fixed-width encoding so that the
//! lexical order of store keys is also chronological order.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// The fixed-width sortable timestamp encoding, e.g. `"20260801120000"`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// The day-resolution display format, e.g. `"2026-08-01"`.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Format an instant in the record timestamp encoding.
pub fn format_timestamp(instant: DateTime<Local>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a record timestamp back into a local instant.
///
/// Returns `None` for strings that are not in the fixed-width encoding
/// (including records written with an empty timestamp).
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).ok()?;
    Local.from_local_datetime(&naive).single()
}

/// Reduce a record timestamp to its day for display, e.g.
/// `"20260801120000"` -> `"2026-08-01"`. Returns `None` if the timestamp
/// does not parse.
pub fn timestamp_day(ts: &str) -> Option<String> {
    let naive = NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).ok()?;
    Some(naive.date().format(DAY_FORMAT).to_string())
}

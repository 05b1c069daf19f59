// ------------------------------------------------------------------------------------------------
// --- Text normalization
// ------------------------------------------------------------------------------------------------

use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;

use crate::parsing::error::{PResult, ParsingError};

// Non-greedy so "9:00am (late) (vip)" loses both remarks.
static RE_REMARK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(.*?\)").unwrap());

/// Removes every whitespace character and lowercases what is left.
///
/// "Park Hyatt", "parkhyatt" and "pArkhyatt " all collapse to "parkhyatt". The
/// original spacing is not recoverable, so the display form of a multi-word
/// location is "Parkhyatt".
pub fn normalize_location(location: &str) -> String {
    location
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Strips parenthesized remarks, trims and lowercases. Does not validate.
pub fn normalize_time(time: &str) -> String {
    RE_REMARK.replace_all(time, "").trim().to_lowercase()
}

/// Upper-cases the first character and leaves the rest as is.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Canonical 12-hour form, e.g. "07:40am".
pub fn format_time(time: NaiveTime) -> String {
    time.format("%I:%M%P").to_string()
}

pub fn create_time(hour: u32, minute: u32) -> PResult<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or(ParsingError::UnableToBuildTime(hour, minute))
}

//! Date, duration and number parsing for spreadsheet cells
//!
//! Parsing is permissive about whitespace but strict about meaning: dates are
//! day-first only, durations need exactly three integer components. A cell
//! that fails to parse becomes [`CellValue::Invalid`] and is treated as
//! absent downstream; nothing here returns an error.

use super::validity::is_present_with;
use crate::constants::{DATE_FORMAT_DASH, DATE_FORMAT_SLASH, TIMESTAMP_FORMAT};
use crate::models::{CellValue, DateValue};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Parse a day-first date or a hyphen-separated range of two day-first dates
///
/// Tried in order: `dd/mm/yyyy`, `dd-mm-yyyy`, then `dd/mm/yyyy - dd/mm/yyyy`.
/// A range is valid only when both halves parse.
pub fn parse_date(raw: &str) -> Option<DateValue> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT_SLASH) {
        return Some(DateValue::Single(date));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT_DASH) {
        return Some(DateValue::Single(date));
    }

    let parts: Vec<&str> = value.split('-').map(str::trim).collect();
    if let [start, end] = parts.as_slice() {
        let start = NaiveDate::parse_from_str(start, DATE_FORMAT_SLASH).ok()?;
        let end = NaiveDate::parse_from_str(end, DATE_FORMAT_SLASH).ok()?;
        return Some(DateValue::Range(start, end));
    }

    None
}

/// Parse an elapsed duration written as `H:MM:SS`; hours may exceed 24
pub fn parse_duration(raw: &str) -> Option<TimeDelta> {
    let parts: Vec<&str> = raw.trim().split(':').collect();
    let [hours, minutes, seconds] = parts.as_slice() else {
        return None;
    };

    let hours: i64 = parse_component(hours)?;
    let minutes: i64 = parse_component(minutes)?;
    let seconds: i64 = parse_component(seconds)?;

    TimeDelta::try_hours(hours)?
        .checked_add(&TimeDelta::try_minutes(minutes)?)?
        .checked_add(&TimeDelta::try_seconds(seconds)?)
}

/// Parse a time of day written as `H:MM` or `H:MM:SS` into an offset from midnight
///
/// Anything at or past 24 hours is not a time of day and is rejected.
pub fn parse_clock_time(raw: &str) -> Option<TimeDelta> {
    let value = raw.trim();
    let offset = match value.split(':').count() {
        2 => parse_duration(&format!("{value}:00")),
        3 => parse_duration(value),
        _ => None,
    }?;
    (offset < TimeDelta::days(1)).then_some(offset)
}

/// Parse a finite decimal number
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parse a stopwatch timestamp (`dd/mm/yyyy HH:MM:SS`)
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).ok()
}

/// Non-negative integer component; signs and blanks are rejected
fn parse_component(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

// -----------------------------------------------------------------------------
// Cell constructors: every typed field of a record is built through one of these
// -----------------------------------------------------------------------------

fn typed_cell<T>(
    raw: Option<&str>,
    placeholder: &str,
    parse: impl FnOnce(&str) -> Option<T>,
    wrap: impl FnOnce(T) -> CellValue,
) -> CellValue {
    let Some(value) = raw.filter(|v| is_present_with(Some(*v), placeholder)) else {
        return CellValue::Absent;
    };
    match parse(value) {
        Some(parsed) => wrap(parsed),
        None => CellValue::Invalid(value.trim().to_string()),
    }
}

pub fn date_cell(raw: Option<&str>, placeholder: &str) -> CellValue {
    typed_cell(raw, placeholder, parse_date, CellValue::ParsedDate)
}

pub fn duration_cell(raw: Option<&str>, placeholder: &str) -> CellValue {
    typed_cell(raw, placeholder, parse_duration, CellValue::ParsedDuration)
}

pub fn clock_cell(raw: Option<&str>, placeholder: &str) -> CellValue {
    typed_cell(raw, placeholder, parse_clock_time, CellValue::ParsedDuration)
}

pub fn number_cell(raw: Option<&str>, placeholder: &str) -> CellValue {
    typed_cell(raw, placeholder, parse_number, CellValue::ParsedNumber)
}

pub fn text_cell(raw: Option<&str>, placeholder: &str) -> CellValue {
    typed_cell(
        raw,
        placeholder,
        |value| Some(super::normalize::normalize(Some(value))),
        CellValue::RawText,
    )
}

//! Document-specific parsers that turn extracted page text into records.
//!
//! Each designation kind has its own submodule. The census tract lists
//! ([`ldct`]) are laid out in columns and go through the spatial layout
//! pipeline; military zone and opportunity zone documents ([`military`],
//! [`opportunity`]) are line-oriented and parsed directly from page text.

pub mod ldct;
pub mod military;
pub mod opportunity;

use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::ZonexError;

static FILENAME_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"20[12]\d").unwrap());

static LONG_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([a-z]+)\s+(\d{1,2}),?\s+(\d{4})$").unwrap());

static PERIOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{4})\s+(?:through|though)\s+(\d{4})").unwrap());

/// Pull the publication year out of a document file name.
///
/// The source agency names its files things like `ldct_2019.pdf` or
/// `2021 Military Zones.pdf`, so the first `20xx` token wins.
pub fn year_from_filename(path: &Path) -> Result<i32, ZonexError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    FILENAME_YEAR_RE
        .find(&name)
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .ok_or_else(|| ZonexError::YearMissing(name))
}

/// Parse a long-form date such as `November 1, 2015` or `March 3 2018`.
///
/// Month names must be written out in full. Returns `None` for anything
/// that does not fit, including misspelled months, so callers can report
/// the raw text instead of silently guessing.
pub fn parse_long_date(text: &str) -> Option<NaiveDate> {
    let caps = LONG_DATE_RE.captures(text.trim())?;
    let month = month_number(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a designation period such as `2018 through 2027`.
///
/// The misspelling `though` appears verbatim in some published documents
/// and is accepted on purpose.
pub fn parse_period(text: &str) -> Option<(i32, i32)> {
    let caps = PERIOD_RE.captures(text)?;
    let start = caps[1].parse().ok()?;
    let end = caps[2].parse().ok()?;
    Some((start, end))
}

/// Record a recoverable drop: logged at warn level and collected for
/// the caller's warning list.
pub(crate) fn push_warning(warnings: &mut Vec<String>, message: String) {
    log::warn!("{}", message);
    warnings.push(message);
}

fn month_number(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "january" => Some(1),
        "february" => Some(2),
        "march" => Some(3),
        "april" => Some(4),
        "may" => Some(5),
        "june" => Some(6),
        "july" => Some(7),
        "august" => Some(8),
        "september" => Some(9),
        "october" => Some(10),
        "november" => Some(11),
        "december" => Some(12),
        _ => None,
    }
}

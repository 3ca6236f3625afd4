//! Parser for military zone designation tables.
//!
//! These documents are single-column tables where every row reads
//! `County  1203.01  Designation effective January 1, 2024`. Rows are
//! matched directly against page text; no layout analysis is needed.

use std::sync::LazyLock;

use regex::Regex;

use crate::extraction::PageText;
use crate::model::MilitaryZoneRecord;
use crate::parsing::{parse_long_date, push_warning};

// County (one or two words), a tract with exactly two decimals, the
// fixed label, then a long-form date. Whitespace spans line wraps.
static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([A-Za-z]+(?:\s+[A-Za-z]+)?)\s+(\d+\.\d{2})\s+Designation effective\s+(\w+\s+\d{1,2},\s+\d{4})",
    )
    .unwrap()
});

/// Records and recoverable problems from one parse pass.
#[derive(Debug, Default)]
pub struct ParsedZones {
    pub records: Vec<MilitaryZoneRecord>,
    pub warnings: Vec<String>,
}

/// Match designation rows across all pages.
///
/// Rows that almost match (a misspelled month, an out-of-range year)
/// turn into warnings; rows that do not match the shape at all are
/// ignored, since most page text is boilerplate.
pub fn extract_from_pages(pages: &[PageText], year: i32) -> ParsedZones {
    let mut out = ParsedZones::default();

    for page in pages {
        let text = page.lines.join("\n");
        for caps in ROW_RE.captures_iter(&text) {
            let county = caps[1].trim();
            let tract = &caps[2];
            let date_str = &caps[3];

            let Some(effective_date) = parse_long_date(date_str) else {
                push_warning(
                    &mut out.warnings,
                    format!("could not parse effective date \"{}\" for {}", date_str, county),
                );
                continue;
            };
            match MilitaryZoneRecord::new(year, county, tract, effective_date) {
                Ok(record) => out.records.push(record),
                Err(e) => push_warning(
                    &mut out.warnings,
                    format!("{}: dropped row for {}", e, county),
                ),
            }
        }
    }

    out
}

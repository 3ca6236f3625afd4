use crate::error::ZonexError;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Census tract codes: digits with an optional 1-2 digit decimal suffix.
/// Longer suffixes are OCR garbage, real tract numbers never carry them.
static TRACT_FORMAT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+(\.\d{1,2})?$").unwrap());

const YEAR_MIN: i32 = 2000;
const YEAR_MAX: i32 = 2030;

/// A Less Developed Census Tract designation for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TractRecord {
    pub year: i32,
    pub msa: String,
    pub county: String,
    pub tract: String,
}

impl TractRecord {
    /// Build a validated record. Field rules:
    /// - tract must be digits with an optional 1-2 digit decimal suffix
    /// - year must be plausible
    /// - county is title-cased, msa upper-cased with any "MSA" suffix dropped
    pub fn new(year: i32, msa: &str, county: &str, tract: &str) -> Result<Self, ZonexError> {
        Ok(TractRecord {
            year: validate_year(year)?,
            msa: normalize_msa(msa),
            county: title_case(county),
            tract: validate_tract(tract)?,
        })
    }
}

/// A Military Zone tract designation with its effective date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilitaryZoneRecord {
    pub year: i32,
    pub county: String,
    pub tract: String,
    pub effective_date: NaiveDate,
}

impl MilitaryZoneRecord {
    pub fn new(
        year: i32,
        county: &str,
        tract: &str,
        effective_date: NaiveDate,
    ) -> Result<Self, ZonexError> {
        Ok(MilitaryZoneRecord {
            year: validate_year(year)?,
            county: title_case(county),
            tract: validate_tract(tract)?,
            effective_date,
        })
    }
}

/// A State Opportunity Zone designation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunityZoneRecord {
    pub area: String,
    pub designated_date: NaiveDate,
    pub start_year: i32,
    pub end_year: i32,
}

impl OpportunityZoneRecord {
    pub fn new(
        area: &str,
        designated_date: NaiveDate,
        start_year: i32,
        end_year: i32,
    ) -> Result<Self, ZonexError> {
        let area = normalize_area(area);
        if area.is_empty() {
            return Err(ZonexError::RecordInvalid("empty area name".into()));
        }
        Ok(OpportunityZoneRecord {
            area,
            designated_date,
            start_year: validate_designation_year(start_year)?,
            end_year: validate_designation_year(end_year)?,
        })
    }
}

fn validate_tract(tract: &str) -> Result<String, ZonexError> {
    let tract = tract.trim();
    if !TRACT_FORMAT.is_match(tract) {
        return Err(ZonexError::RecordInvalid(format!(
            "invalid tract format '{tract}'"
        )));
    }
    Ok(tract.to_string())
}

fn validate_year(year: i32) -> Result<i32, ZonexError> {
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(ZonexError::RecordInvalid(format!("year {year} out of range")));
    }
    Ok(year)
}

/// Designation periods run further into the future, and scanned
/// documents sometimes misread the century digit (3032 for 2032).
fn validate_designation_year(year: i32) -> Result<i32, ZonexError> {
    let year = if (3000..=3050).contains(&year) {
        year - 1000
    } else {
        year
    };
    if !(2000..=2050).contains(&year) {
        return Err(ZonexError::RecordInvalid(format!("year {year} out of range")));
    }
    Ok(year)
}

/// Title-case a name, word by word. Words that already mix upper and
/// lower case (DeKalb, McIntosh) keep their casing.
pub fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mixed = word.chars().any(|c| c.is_lowercase())
                && word.chars().skip(1).any(|c| c.is_uppercase());
            if mixed {
                word.to_string()
            } else {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_msa(msa: &str) -> String {
    let mut upper = msa.trim().to_uppercase();
    if let Some(stripped) = upper.strip_suffix(" MSA") {
        upper = stripped.to_string();
    }
    upper
}

/// Collapse whitespace and unify dash variants in an area name.
fn normalize_area(area: &str) -> String {
    area.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(['\u{2013}', '\u{2014}'], "-")
}

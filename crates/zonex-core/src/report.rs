//! Cross-year reporting over aggregated zone data.
//!
//! These checks run on the combined year -> county -> tracts shape and
//! return plain data; rendering belongs to the caller. Military zone
//! data drops its effective dates before coming through here.

use std::collections::{BTreeMap, BTreeSet};

use crate::aggregate::TractsByCounty;
use crate::error::ZonexError;

/// Per-year county and tract counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSummary {
    pub year: String,
    pub counties: usize,
    pub tracts: usize,
}

/// Tract additions and removals within one county between two years.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountyDelta {
    pub county: String,
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

/// Differences between two years of extracted data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearComparison {
    pub counties_before: usize,
    pub counties_after: usize,
    pub added_counties: Vec<String>,
    pub removed_counties: Vec<String>,
    pub tract_changes: Vec<CountyDelta>,
}

/// One county's tracts across every year it appears in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpotCheck {
    pub appearances: Vec<(String, Vec<String>)>,
    /// Counties whose names contain the query, offered when nothing
    /// matched exactly.
    pub suggestions: Vec<String>,
}

/// A tract that appeared, disappeared, then reappeared across years.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TractGap {
    pub county: String,
    pub tract: String,
    pub years: Vec<String>,
}

/// County and tract counts per year, in year order.
pub fn summarize(data: &TractsByCounty) -> Vec<YearSummary> {
    data.iter()
        .map(|(year, counties)| YearSummary {
            year: year.clone(),
            counties: counties.len(),
            tracts: counties.values().map(|t| t.len()).sum(),
        })
        .collect()
}

/// Compare two years: counties added and removed, and tract-level
/// changes within counties present in both.
pub fn compare_years(
    data: &TractsByCounty,
    year1: &str,
    year2: &str,
) -> Result<YearComparison, ZonexError> {
    let before = data
        .get(year1)
        .ok_or_else(|| ZonexError::YearNotFound(year1.to_string()))?;
    let after = data
        .get(year2)
        .ok_or_else(|| ZonexError::YearNotFound(year2.to_string()))?;

    let counties1: BTreeSet<&String> = before.keys().collect();
    let counties2: BTreeSet<&String> = after.keys().collect();

    let added_counties = counties2
        .difference(&counties1)
        .map(|c| (*c).clone())
        .collect();
    let removed_counties = counties1
        .difference(&counties2)
        .map(|c| (*c).clone())
        .collect();

    let mut tract_changes = Vec::new();
    for county in counties1.intersection(&counties2) {
        let tracts1: BTreeSet<&String> = before[*county].iter().collect();
        let tracts2: BTreeSet<&String> = after[*county].iter().collect();

        let added: Vec<String> = tracts2.difference(&tracts1).map(|t| (*t).clone()).collect();
        let removed: Vec<String> = tracts1.difference(&tracts2).map(|t| (*t).clone()).collect();
        if !added.is_empty() || !removed.is_empty() {
            tract_changes.push(CountyDelta {
                county: (*county).clone(),
                added,
                removed,
            });
        }
    }

    Ok(YearComparison {
        counties_before: counties1.len(),
        counties_after: counties2.len(),
        added_counties,
        removed_counties,
        tract_changes,
    })
}

/// Look up one county across all years, case-insensitively.
pub fn spot_check(data: &TractsByCounty, county_name: &str) -> SpotCheck {
    let query = county_name.to_lowercase();
    let mut result = SpotCheck::default();

    for (year, counties) in data {
        for (county, tracts) in counties {
            if county.to_lowercase() == query {
                result.appearances.push((year.clone(), tracts.clone()));
                break;
            }
        }
    }

    if result.appearances.is_empty() {
        let mut similar = BTreeSet::new();
        for counties in data.values() {
            for county in counties.keys() {
                if county.to_lowercase().contains(&query) {
                    similar.insert(county.clone());
                }
            }
        }
        result.suggestions = similar.into_iter().collect();
    }

    result
}

/// Scan for data quality problems: duplicate tracts within a county,
/// counties more than three times the average size, and tract codes
/// that are not digits-and-dot.
pub fn find_anomalies(data: &TractsByCounty) -> Vec<String> {
    let mut issues = Vec::new();

    for (year, counties) in data {
        for (county, tracts) in counties {
            let unique: BTreeSet<&String> = tracts.iter().collect();
            if unique.len() != tracts.len() {
                let dupes: BTreeSet<&String> = tracts
                    .iter()
                    .filter(|t| tracts.iter().filter(|u| u == t).count() > 1)
                    .collect();
                let listed: Vec<&str> = dupes.iter().map(|t| t.as_str()).collect();
                issues.push(format!(
                    "{}/{}: duplicate tracts: {}",
                    year,
                    county,
                    listed.join(", ")
                ));
            }
        }
    }

    let mut counts = Vec::new();
    for (year, counties) in data {
        for (county, tracts) in counties {
            counts.push((year.as_str(), county.as_str(), tracts.len()));
        }
    }
    if !counts.is_empty() {
        let avg = counts.iter().map(|c| c.2).sum::<usize>() as f64 / counts.len() as f64;
        let mut outliers: Vec<_> = counts
            .iter()
            .filter(|(_, _, n)| *n as f64 > avg * 3.0)
            .collect();
        outliers.sort_by(|a, b| b.2.cmp(&a.2));
        for (year, county, n) in outliers.into_iter().take(5) {
            issues.push(format!(
                "{}/{}: {} tracts (more than 3x the average of {:.1})",
                year, county, n, avg
            ));
        }
    }

    for (year, counties) in data {
        for (county, tracts) in counties {
            for tract in tracts {
                let digits = tract.replace('.', "");
                if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                    issues.push(format!("{}/{}: invalid tract format: {}", year, county, tract));
                }
            }
        }
    }

    issues
}

/// Find tracts that appear, disappear for at least one year, then
/// reappear. These usually mean an extraction miss rather than a real
/// dedesignation.
pub fn find_gaps(data: &TractsByCounty) -> Vec<TractGap> {
    let years: Vec<&String> = data.keys().collect();
    let index_of: BTreeMap<&String, usize> =
        years.iter().enumerate().map(|(i, y)| (*y, i)).collect();

    let mut appearances: BTreeMap<(String, String), BTreeSet<String>> = BTreeMap::new();
    for (year, counties) in data {
        for (county, tracts) in counties {
            for tract in tracts {
                appearances
                    .entry((county.clone(), tract.clone()))
                    .or_default()
                    .insert(year.clone());
            }
        }
    }

    let mut gaps = Vec::new();
    for ((county, tract), seen) in appearances {
        if seen.len() < 2 {
            continue;
        }
        let indices: Vec<usize> = seen.iter().filter_map(|y| index_of.get(y).copied()).collect();
        if indices.windows(2).any(|w| w[1] - w[0] > 1) {
            gaps.push(TractGap {
                county,
                tract,
                years: seen.into_iter().collect(),
            });
        }
    }

    gaps
}

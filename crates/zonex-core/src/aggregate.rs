//! Aggregation of validated records into the published output shapes.
//!
//! All shapes key years as strings so the JSON round-trips cleanly, and
//! all maps are ordered so repeated runs produce byte-identical output.
//! Tract lists sort by full decimal value, which keeps `202` ahead of
//! `9601` and distinguishes `9601.02` from `9601.2`.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{MilitaryZoneRecord, TractRecord};

/// year -> msa -> county -> tracts
pub type TractsByMsa = BTreeMap<String, BTreeMap<String, BTreeMap<String, Vec<String>>>>;

/// year -> county -> tracts
pub type TractsByCounty = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// year -> county -> designation entries
pub type MilitaryByCounty = BTreeMap<String, BTreeMap<String, Vec<MilitaryEntry>>>;

/// One military zone designation as published in the combined output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilitaryEntry {
    pub tract: String,
    pub effective_date: NaiveDate,
}

/// Numeric sort key for a tract code. Codes that fail validation never
/// reach aggregation, so the fallback only orders garbage last.
pub fn tract_sort_key(tract: &str) -> Decimal {
    Decimal::from_str(tract).unwrap_or(Decimal::MAX)
}

fn sort_tracts(tracts: &mut [String]) {
    tracts.sort_by_key(|t| tract_sort_key(t));
}

/// Nest census tract records as year -> msa -> county -> tracts.
pub fn nest_tracts(records: &[TractRecord]) -> TractsByMsa {
    let mut result: TractsByMsa = BTreeMap::new();
    for record in records {
        let tracts = result
            .entry(record.year.to_string())
            .or_default()
            .entry(record.msa.clone())
            .or_default()
            .entry(record.county.clone())
            .or_default();
        if !tracts.contains(&record.tract) {
            tracts.push(record.tract.clone());
        }
    }
    for msas in result.values_mut() {
        for counties in msas.values_mut() {
            for tracts in counties.values_mut() {
                sort_tracts(tracts);
            }
        }
    }
    result
}

/// Nest census tract records as year -> county -> tracts, dropping the
/// MSA level. Downstream consumers that only care about county coverage
/// read this shape.
pub fn nest_tracts_by_county(records: &[TractRecord]) -> TractsByCounty {
    let mut result: TractsByCounty = BTreeMap::new();
    for record in records {
        let tracts = result
            .entry(record.year.to_string())
            .or_default()
            .entry(record.county.clone())
            .or_default();
        if !tracts.contains(&record.tract) {
            tracts.push(record.tract.clone());
        }
    }
    for counties in result.values_mut() {
        for tracts in counties.values_mut() {
            sort_tracts(tracts);
        }
    }
    result
}

/// Nest military zone records as year -> county -> entries. Duplicate
/// tracts within a county keep the first effective date seen.
pub fn nest_military(records: &[MilitaryZoneRecord]) -> MilitaryByCounty {
    let mut result: MilitaryByCounty = BTreeMap::new();
    for record in records {
        let entries = result
            .entry(record.year.to_string())
            .or_default()
            .entry(record.county.clone())
            .or_default();
        if !entries.iter().any(|e| e.tract == record.tract) {
            entries.push(MilitaryEntry {
                tract: record.tract.clone(),
                effective_date: record.effective_date,
            });
        }
    }
    for counties in result.values_mut() {
        for entries in counties.values_mut() {
            entries.sort_by_key(|e| tract_sort_key(&e.tract));
        }
    }
    result
}

/// Flatten military zone entries to bare tract lists, so military data
/// can flow through the county-level reports and GEOID builder.
pub fn military_tracts(data: &MilitaryByCounty) -> TractsByCounty {
    data.iter()
        .map(|(year, counties)| {
            let counties = counties
                .iter()
                .map(|(county, entries)| {
                    let tracts = entries.iter().map(|e| e.tract.clone()).collect();
                    (county.clone(), tracts)
                })
                .collect();
            (year.clone(), counties)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tract(year: i32, msa: &str, county: &str, tract: &str) -> TractRecord {
        TractRecord::new(year, msa, county, tract).unwrap()
    }

    #[test]
    fn test_sort_key_is_full_decimal_value() {
        assert_eq!(tract_sort_key("9601.02"), dec!(9601.02));
        assert!(tract_sort_key("202") < tract_sort_key("9601"));
        assert!(tract_sort_key("9601.02") < tract_sort_key("9601.2"));
        assert!(tract_sort_key("9601.2") < tract_sort_key("9601.21"));
        assert_eq!(tract_sort_key("not a tract"), Decimal::MAX);
    }

    #[test]
    fn test_nest_tracts_shape_and_order() {
        let records = vec![
            tract(2019, "ALBANY", "Dougherty", "9601"),
            tract(2019, "ALBANY", "Dougherty", "202"),
            tract(2019, "ALBANY", "Dougherty", "9601.02"),
            tract(2019, "ALBANY", "Dougherty", "9601.2"),
            tract(2019, "ALBANY", "Terrell", "9702"),
        ];
        let nested = nest_tracts(&records);

        let dougherty = &nested["2019"]["ALBANY"]["Dougherty"];
        assert_eq!(dougherty, &vec!["202", "9601", "9601.02", "9601.2"]);
        assert_eq!(nested["2019"]["ALBANY"]["Terrell"], vec!["9702"]);
    }

    #[test]
    fn test_nest_tracts_dedups_exact_codes() {
        let records = vec![
            tract(2020, "ROME", "Floyd", "12"),
            tract(2020, "ROME", "Floyd", "12"),
            tract(2020, "ROME", "Floyd", "12.01"),
        ];
        let nested = nest_tracts(&records);
        assert_eq!(nested["2020"]["ROME"]["Floyd"], vec!["12", "12.01"]);
    }

    #[test]
    fn test_nest_by_county_drops_msa_level() {
        let records = vec![
            tract(2020, "ROME", "Floyd", "12"),
            tract(2020, "ALBANY", "Dougherty", "5"),
        ];
        let nested = nest_tracts_by_county(&records);
        assert_eq!(nested["2020"]["Floyd"], vec!["12"]);
        assert_eq!(nested["2020"]["Dougherty"], vec!["5"]);
    }

    #[test]
    fn test_nest_military_dedups_by_tract_keeping_first() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let records = vec![
            MilitaryZoneRecord::new(2024, "Bryan", "9203.01", d1).unwrap(),
            MilitaryZoneRecord::new(2024, "Bryan", "9203.01", d2).unwrap(),
            MilitaryZoneRecord::new(2024, "Bryan", "110.02", d2).unwrap(),
        ];
        let nested = nest_military(&records);
        let bryan = &nested["2024"]["Bryan"];
        assert_eq!(bryan.len(), 2);
        assert_eq!(bryan[0].tract, "110.02");
        assert_eq!(bryan[1].tract, "9203.01");
        assert_eq!(bryan[1].effective_date, d1);
    }

    #[test]
    fn test_years_keyed_as_strings() {
        let nested = nest_tracts(&[tract(2021, "MACON", "Bibb", "101")]);
        assert!(nested.contains_key("2021"));
    }

    #[test]
    fn test_military_tracts_drops_dates() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = vec![
            MilitaryZoneRecord::new(2024, "Bryan", "9203.01", d).unwrap(),
            MilitaryZoneRecord::new(2024, "Bryan", "110.02", d).unwrap(),
            MilitaryZoneRecord::new(2024, "Chatham", "110.02", d).unwrap(),
        ];
        let flat = military_tracts(&nest_military(&records));
        assert_eq!(flat["2024"]["Bryan"], vec!["110.02", "9203.01"]);
        assert_eq!(flat["2024"]["Chatham"], vec!["110.02"]);
    }
}

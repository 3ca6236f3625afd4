//! Census GEOID construction from extracted zone data.
//!
//! A tract GEOID is eleven digits: two for the state, three for the
//! county, six for the tract. Tract codes as printed ("202", "9601.02")
//! become the six-digit form by zero-padding the whole part to four
//! digits and the decimal part to two.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::aggregate::TractsByCounty;
use crate::error::ZonexError;

/// Georgia's state FIPS code.
pub const STATE_FIPS: &str = "13";

/// GEOIDs built from one data set, plus the rows that could not be
/// resolved. Errors here never abort a build; a county missing from the
/// reference file is a data problem to report, not a crash.
#[derive(Debug, Default)]
pub struct GeoidBuild {
    pub geoids: Vec<String>,
    pub errors: Vec<String>,
}

/// Load county name -> 3-digit FIPS from a US counties GeoJSON.
///
/// Only features whose `STATEFP` matches [`STATE_FIPS`] are kept; names
/// are lowercased for lookup.
pub fn load_county_fips(path: &Path) -> Result<BTreeMap<String, String>, ZonexError> {
    let raw = fs::read_to_string(path).map_err(|e| ZonexError::CountyReference {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let data: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| ZonexError::CountyReference {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let features = data
        .get("features")
        .and_then(|f| f.as_array())
        .ok_or_else(|| ZonexError::CountyReference {
            path: path.to_path_buf(),
            reason: "no features array".into(),
        })?;

    let mut county_fips = BTreeMap::new();
    for feature in features {
        let Some(props) = feature.get("properties") else {
            continue;
        };
        if props.get("STATEFP").and_then(|v| v.as_str()) != Some(STATE_FIPS) {
            continue;
        }
        let name = props
            .get("NAME")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_lowercase();
        let fips = props
            .get("COUNTYFP")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        if !name.is_empty() && !fips.is_empty() {
            county_fips.insert(name, fips.to_string());
        }
    }
    Ok(county_fips)
}

/// Convert a printed tract code to its six-digit GEOID segment.
///
/// "202" -> "020200", "9601" -> "960100", "9601.02" -> "960102",
/// "103.01" -> "010301".
pub fn tract_to_6digit(tract: &str) -> String {
    let tract = tract.trim();
    let (whole, decimal) = match tract.split_once('.') {
        Some((whole, decimal)) => {
            let padded = format!("{:0>2}", decimal);
            (whole, padded.chars().take(2).collect::<String>())
        }
        None => (tract, "00".to_string()),
    };
    format!("{:0>4}{}", whole, decimal)
}

/// Build the full 11-digit GEOID for one county/tract pair.
pub fn build_geoid(county_fips: &str, tract: &str) -> String {
    format!("{}{}{}", STATE_FIPS, county_fips, tract_to_6digit(tract))
}

/// Build GEOIDs for every tract in a year -> county -> tracts data set.
///
/// `year_filter` restricts the build to one year; `None` takes all.
/// The result is sorted and deduplicated across years and counties.
pub fn geoids_for_tracts(
    data: &TractsByCounty,
    county_fips: &BTreeMap<String, String>,
    year_filter: Option<&str>,
) -> GeoidBuild {
    let mut build = GeoidBuild::default();
    let mut seen = std::collections::BTreeSet::new();

    for (year, counties) in data {
        if year_filter.is_some_and(|y| y != year.as_str()) {
            continue;
        }
        for (county, tracts) in counties {
            let Some(fips) = county_fips.get(&county.to_lowercase()) else {
                build.errors.push(format!("county not found: {}", county));
                continue;
            };
            for tract in tracts {
                seen.insert(build_geoid(fips, tract));
            }
        }
    }

    build.geoids = seen.into_iter().collect();
    build
}

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use zonex_core::aggregate::{self, MilitaryByCounty, TractsByCounty};
use zonex_core::error::ZonexError;
use zonex_core::geoid;

use crate::commands::read_json;
use crate::{GeoidFormat, TractKind};

pub fn run(
    kind: TractKind,
    year: &str,
    extracted_dir: &Path,
    geojson: &Path,
    format: GeoidFormat,
    output: Option<&Path>,
) -> Result<(), ZonexError> {
    eprintln!("Loading Georgia counties from {}...", geojson.display());
    let county_fips = geoid::load_county_fips(geojson)?;
    eprintln!("  Found {} Georgia counties", county_fips.len());

    let data = load_tracts(kind, year, extracted_dir)?;
    let year_filter = (year != "all").then_some(year);
    let build = geoid::geoids_for_tracts(&data, &county_fips, year_filter);

    let unique_errors: BTreeSet<&String> = build.errors.iter().collect();
    if !unique_errors.is_empty() {
        eprintln!("\nWarnings ({}):", unique_errors.len());
        for err in &unique_errors {
            eprintln!("  ⚠ {err}");
        }
    }
    eprintln!("\nGenerated {} unique GEOIDs", build.geoids.len());

    let rendered = match format {
        GeoidFormat::Csv => build.geoids.join(","),
        GeoidFormat::List => build.geoids.join("\n"),
        GeoidFormat::Json => serde_json::to_string_pretty(&build.geoids)?,
    };
    match output {
        Some(path) => {
            fs::write(path, rendered)?;
            eprintln!("Saved to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

/// Read one year's file (wrapped under its year key) or the combined
/// file when asked for "all". Military entries flatten to bare tracts.
fn load_tracts(kind: TractKind, year: &str, dir: &Path) -> Result<TractsByCounty, ZonexError> {
    match kind {
        TractKind::Ldct => {
            if year == "all" {
                Ok(serde_json::from_value(read_json(
                    &dir.join("ldct_combined.json"),
                )?)?)
            } else {
                let counties: BTreeMap<String, Vec<String>> =
                    serde_json::from_value(read_json(&dir.join(format!("ldct_{year}.json")))?)?;
                Ok(BTreeMap::from([(year.to_string(), counties)]))
            }
        }
        TractKind::Mz => {
            let data: MilitaryByCounty = if year == "all" {
                serde_json::from_value(read_json(&dir.join("mz_combined.json"))?)?
            } else {
                let counties =
                    serde_json::from_value(read_json(&dir.join(format!("mz_{year}.json")))?)?;
                BTreeMap::from([(year.to_string(), counties)])
            };
            Ok(aggregate::military_tracts(&data))
        }
    }
}

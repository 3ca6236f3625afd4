use std::path::Path;

use zonex_core::aggregate::{self, MilitaryByCounty, TractsByCounty};
use zonex_core::error::ZonexError;
use zonex_core::report;

use crate::commands::read_json;
use crate::TractKind;

pub fn summary(kind: TractKind, extracted_dir: &Path) -> Result<(), ZonexError> {
    let data = load_combined(kind, extracted_dir)?;
    render_summary(&data, kind);
    Ok(())
}

pub fn compare(
    kind: TractKind,
    year1: &str,
    year2: &str,
    extracted_dir: &Path,
) -> Result<(), ZonexError> {
    let data = load_combined(kind, extracted_dir)?;
    let comparison = report::compare_years(&data, year1, year2)?;
    render_comparison(&data, year1, year2, &comparison);
    Ok(())
}

pub fn spot_check(kind: TractKind, county: &str, extracted_dir: &Path) -> Result<(), ZonexError> {
    let data = load_combined(kind, extracted_dir)?;
    banner(&format!("Spot Check: {county}"));

    let check = report::spot_check(&data, county);
    if check.appearances.is_empty() {
        println!("County '{county}' not found in any year.");
        if !check.suggestions.is_empty() {
            println!("\nDid you mean: {:?}", check.suggestions);
        }
    } else {
        for (year, tracts) in &check.appearances {
            println!("{year}: {tracts:?}");
        }
    }
    println!();
    Ok(())
}

pub fn full(kind: TractKind, extracted_dir: &Path) -> Result<(), ZonexError> {
    let data = load_combined(kind, extracted_dir)?;
    render_summary(&data, kind);
    render_anomalies(&data);
    render_gaps(&data);

    let years: Vec<&String> = data.keys().collect();
    for pair in years.windows(2) {
        let comparison = report::compare_years(&data, pair[0], pair[1])?;
        render_comparison(&data, pair[0], pair[1], &comparison);
    }
    Ok(())
}

fn load_combined(kind: TractKind, dir: &Path) -> Result<TractsByCounty, ZonexError> {
    match kind {
        TractKind::Ldct => Ok(serde_json::from_value(read_json(
            &dir.join("ldct_combined.json"),
        )?)?),
        TractKind::Mz => {
            let military: MilitaryByCounty =
                serde_json::from_value(read_json(&dir.join("mz_combined.json"))?)?;
            Ok(aggregate::military_tracts(&military))
        }
    }
}

fn render_summary(data: &TractsByCounty, kind: TractKind) {
    banner(&format!("Summary Statistics - {}", label(kind)));
    for s in report::summarize(data) {
        println!("{}: {:3} counties, {:4} tracts", s.year, s.counties, s.tracts);
    }
    println!();
}

fn render_comparison(
    data: &TractsByCounty,
    year1: &str,
    year2: &str,
    comparison: &report::YearComparison,
) {
    banner(&format!("Year-over-Year Comparison: {year1} → {year2}"));
    println!("Counties in {year1}: {}", comparison.counties_before);
    println!("Counties in {year2}: {}", comparison.counties_after);
    println!();

    if !comparison.added_counties.is_empty() {
        println!(
            "Counties ADDED in {year2}: ({})",
            comparison.added_counties.len()
        );
        for county in &comparison.added_counties {
            println!("  + {county}: {}", preview(tract_list(data, year2, county), 5));
        }
        println!();
    }
    if !comparison.removed_counties.is_empty() {
        println!(
            "Counties REMOVED in {year2}: ({})",
            comparison.removed_counties.len()
        );
        for county in &comparison.removed_counties {
            println!("  - {county}: {}", preview(tract_list(data, year1, county), 5));
        }
        println!();
    }

    if comparison.tract_changes.is_empty() {
        println!("No tract changes in common counties.");
    } else {
        println!(
            "Tract changes in existing counties: ({} counties)",
            comparison.tract_changes.len()
        );
        for delta in comparison.tract_changes.iter().take(15) {
            if !delta.added.is_empty() {
                println!(
                    "  {}: +{} tracts ({})",
                    delta.county,
                    delta.added.len(),
                    preview(&delta.added, 3)
                );
            }
            if !delta.removed.is_empty() {
                println!(
                    "  {}: -{} tracts ({})",
                    delta.county,
                    delta.removed.len(),
                    preview(&delta.removed, 3)
                );
            }
        }
        if comparison.tract_changes.len() > 15 {
            println!(
                "  ... and {} more counties with changes",
                comparison.tract_changes.len() - 15
            );
        }
    }
    println!();
}

fn render_anomalies(data: &TractsByCounty) {
    banner("Anomaly Detection");
    let issues = report::find_anomalies(data);
    if issues.is_empty() {
        println!("✓ No anomalies detected");
    } else {
        println!("Potential issues found:");
        for issue in issues.iter().take(20) {
            println!("  ⚠ {issue}");
        }
        if issues.len() > 20 {
            println!("  ... and {} more", issues.len() - 20);
        }
    }
    println!();
}

fn render_gaps(data: &TractsByCounty) {
    banner("Consistency Analysis");
    let gaps = report::find_gaps(data);
    if gaps.is_empty() {
        println!("✓ No erratic appearances detected");
    } else {
        println!(
            "Tracts with gaps (appeared, disappeared, reappeared): {}",
            gaps.len()
        );
        for gap in gaps.iter().take(10) {
            println!("  {} / {}: appeared in {:?}", gap.county, gap.tract, gap.years);
        }
        if gaps.len() > 10 {
            println!("  ... and {} more", gaps.len() - 10);
        }
    }
    println!();
}

fn tract_list<'a>(data: &'a TractsByCounty, year: &str, county: &str) -> &'a [String] {
    data.get(year)
        .and_then(|counties| counties.get(county))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn preview(items: &[String], limit: usize) -> String {
    let shown = &items[..items.len().min(limit)];
    let more = if items.len() > limit { "..." } else { "" };
    format!("{shown:?}{more}")
}

fn label(kind: TractKind) -> &'static str {
    match kind {
        TractKind::Ldct => "LDCT",
        TractKind::Mz => "MZ",
    }
}

fn banner(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}\n", "=".repeat(60));
}

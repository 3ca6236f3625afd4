use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use zonex_core::aggregate::{self, MilitaryByCounty, TractsByCounty};
use zonex_core::error::ZonexError;
use zonex_core::extraction::poppler::PopplerBackend;
use zonex_core::extraction::tesseract::TesseractOcr;
use zonex_core::lexicon::{self, builtin, schema::LexiconDef};
use zonex_core::ExtractOptions;

use crate::ZoneKind;

pub fn run(
    kind: ZoneKind,
    input_dir: &Path,
    output: Option<PathBuf>,
    options: &ExtractOptions,
    lang: &str,
    lexicon_file: Option<&Path>,
) -> Result<(), ZonexError> {
    let output_dir = output.unwrap_or_else(|| input_dir.join("extracted"));
    fs::create_dir_all(&output_dir)?;

    match kind {
        ZoneKind::Ldct => {
            let lexicon = match lexicon_file {
                Some(path) => lexicon::load_lexicon(path)?,
                None => builtin::load_preset("georgia")?,
            };
            extract_ldct(input_dir, &output_dir, options, &lexicon, lang)
        }
        ZoneKind::Mz => extract_mz(input_dir, &output_dir),
        ZoneKind::Oz => extract_oz(input_dir, &output_dir),
    }
}

/// Run all three families against the conventional folder layout and
/// write each family's output next to its sources.
pub fn run_all(data_dir: &Path) -> Result<(), ZonexError> {
    banner("Georgia Tax Incentive Zone Extractor");

    let families = [
        (ZoneKind::Ldct, "LDCT", "GA_less_dev_cencus"),
        (ZoneKind::Mz, "MZ", "GA_military_zones"),
        (ZoneKind::Oz, "OZ", "GA_opportunity_zones"),
    ];
    for (kind, label, folder) in families {
        let input_dir = data_dir.join(folder);
        if !input_dir.is_dir() {
            println!("{label} directory not found: {}", input_dir.display());
            continue;
        }
        run(
            kind,
            &input_dir,
            None,
            &ExtractOptions::default(),
            "eng",
            None,
        )?;
    }

    banner("Extraction complete!");
    Ok(())
}

fn extract_ldct(
    input_dir: &Path,
    output_dir: &Path,
    options: &ExtractOptions,
    lexicon: &LexiconDef,
    lang: &str,
) -> Result<(), ZonexError> {
    banner("Extracting Less Developed Census Tracts (LDCT)");
    let backend = PopplerBackend::new();
    let ocr = TesseractOcr::new(lang);

    let mut combined: TractsByCounty = BTreeMap::new();
    let mut total = 0;

    for pdf in sorted_pdfs(input_dir)? {
        println!("\nProcessing: {}", file_name(&pdf));
        let outcome = match zonex_core::extract_census_tracts(&pdf, &backend, &ocr, lexicon, options)
        {
            Ok(outcome) => outcome,
            Err(e) => {
                println!("  ERROR: {e}");
                continue;
            }
        };

        let ocr_note = if outcome.used_ocr { " (OCR)" } else { "" };
        println!("  Extracted {} records{ocr_note}", outcome.records.len());
        print_warnings(&outcome.warnings);
        total += outcome.records.len();
        if outcome.records.is_empty() {
            println!("  WARNING: no records extracted");
            continue;
        }

        for (year, counties) in aggregate::nest_tracts_by_county(&outcome.records) {
            let name = format!("ldct_{year}.json");
            fs::write(output_dir.join(&name), serde_json::to_string_pretty(&counties)?)?;
            println!("  Saved: {name}");
            combined.insert(year, counties);
        }
    }

    if !combined.is_empty() {
        let path = output_dir.join("ldct_combined.json");
        fs::write(&path, serde_json::to_string_pretty(&combined)?)?;
        println!("\nSaved combined: {}", path.display());
    }
    println!("\nTotal LDCT records: {total}");
    Ok(())
}

fn extract_mz(input_dir: &Path, output_dir: &Path) -> Result<(), ZonexError> {
    banner("Extracting Military Zones (MZ)");
    let backend = PopplerBackend::new();

    let mut combined: MilitaryByCounty = BTreeMap::new();
    let mut total = 0;

    for pdf in sorted_pdfs(input_dir)? {
        println!("\nProcessing: {}", file_name(&pdf));
        let outcome = match zonex_core::extract_military_zones(&pdf, &backend) {
            Ok(outcome) => outcome,
            Err(e) => {
                println!("  ERROR: {e}");
                continue;
            }
        };

        println!("  Extracted {} records", outcome.records.len());
        print_warnings(&outcome.warnings);
        total += outcome.records.len();
        if outcome.records.is_empty() {
            println!("  WARNING: no records extracted (may be a map visualization)");
            continue;
        }

        for (year, counties) in aggregate::nest_military(&outcome.records) {
            let name = format!("mz_{year}.json");
            fs::write(output_dir.join(&name), serde_json::to_string_pretty(&counties)?)?;
            println!("  Saved: {name}");

            // Years split across several PDFs repeat tracts; keep the
            // first designation seen for each.
            let merged = combined.entry(year).or_default();
            for (county, entries) in counties {
                let list = merged.entry(county).or_default();
                for entry in entries {
                    if !list.iter().any(|e| e.tract == entry.tract) {
                        list.push(entry);
                    }
                }
            }
        }
    }

    if !combined.is_empty() {
        for counties in combined.values_mut() {
            for entries in counties.values_mut() {
                entries.sort_by_key(|e| aggregate::tract_sort_key(&e.tract));
            }
        }
        let path = output_dir.join("mz_combined.json");
        fs::write(&path, serde_json::to_string_pretty(&combined)?)?;
        println!("\nSaved combined: {}", path.display());
    }
    println!("\nTotal MZ records: {total}");
    Ok(())
}

fn extract_oz(input_dir: &Path, output_dir: &Path) -> Result<(), ZonexError> {
    banner("Extracting State Opportunity Zones (OZ)");
    let backend = PopplerBackend::new();

    let mut all_records = Vec::new();

    for pdf in sorted_pdfs(input_dir)? {
        println!("\nProcessing: {}", file_name(&pdf));
        let outcome = match zonex_core::extract_opportunity_zones(&pdf, &backend) {
            Ok(outcome) => outcome,
            Err(e) => {
                println!("  ERROR: {e}");
                continue;
            }
        };

        println!("  Extracted {} records", outcome.records.len());
        print_warnings(&outcome.warnings);
        all_records.extend(outcome.records);
    }

    if !all_records.is_empty() {
        let path = output_dir.join("opportunity_zones.json");
        fs::write(&path, serde_json::to_string_pretty(&all_records)?)?;
        println!("\nSaved: {}", path.display());
    }
    println!("\nTotal OZ records: {}", all_records.len());
    Ok(())
}

fn sorted_pdfs(dir: &Path) -> Result<Vec<PathBuf>, ZonexError> {
    let mut pdfs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    pdfs.sort();
    Ok(pdfs)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_warnings(warnings: &[String]) {
    let unique: BTreeSet<&String> = warnings.iter().collect();
    for warning in unique {
        eprintln!("  warning: {warning}");
    }
}

fn banner(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

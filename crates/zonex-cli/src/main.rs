mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use zonex_core::OcrMode;

#[derive(Parser)]
#[command(
    name = "zonex",
    version,
    about = "Extract Georgia tax incentive zone designations from state PDFs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Document family a source directory contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ZoneKind {
    /// Less developed census tracts
    Ldct,
    /// Military zones
    Mz,
    /// State opportunity zones
    Oz,
}

/// Zone families that carry census tract numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TractKind {
    Ldct,
    Mz,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OcrPolicy {
    /// OCR only documents that look scanned
    Auto,
    /// Always OCR
    Force,
    /// Never OCR
    Off,
}

impl From<OcrPolicy> for OcrMode {
    fn from(policy: OcrPolicy) -> Self {
        match policy {
            OcrPolicy::Auto => OcrMode::Auto,
            OcrPolicy::Force => OcrMode::Force,
            OcrPolicy::Off => OcrMode::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GeoidFormat {
    /// Comma-separated on one line
    Csv,
    /// One GEOID per line
    List,
    /// JSON array
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one zone family from a directory of PDFs
    Extract {
        /// Which zone family the PDFs describe
        kind: ZoneKind,

        /// Directory containing the source PDFs
        input_dir: PathBuf,

        /// Output directory (default: INPUT_DIR/extracted)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// OCR policy for census tract documents
        #[arg(long, default_value = "auto")]
        ocr: OcrPolicy,

        /// Vertical strips per page during OCR
        #[arg(long, default_value_t = 3)]
        strips: usize,

        /// Rasterization resolution for OCR
        #[arg(long, default_value_t = 150)]
        dpi: u32,

        /// Tesseract language code
        #[arg(long, default_value = "eng")]
        lang: String,

        /// Custom lexicon JSON (default: built-in georgia preset)
        #[arg(long, value_name = "FILE")]
        lexicon: Option<PathBuf>,
    },
    /// Extract every zone family from the conventional folder layout
    ExtractAll {
        /// Folder holding GA_less_dev_cencus, GA_military_zones and
        /// GA_opportunity_zones
        data_dir: PathBuf,
    },
    /// Build 11-digit census GEOIDs from extracted tract data
    Geoids {
        /// Zone family to read
        kind: TractKind,

        /// Four-digit year, or "all" for every extracted year
        year: String,

        /// Directory with extracted JSON files
        extracted_dir: PathBuf,

        /// County boundary GeoJSON with STATEFP and COUNTYFP properties
        #[arg(
            long,
            value_name = "FILE",
            default_value = "data_folders/_reference/us-counties.geojson"
        )]
        geojson: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "csv")]
        format: GeoidFormat,

        /// Output file (default: print to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Sanity checks over extracted data
    Check {
        #[command(subcommand)]
        action: CheckAction,
    },
}

#[derive(Subcommand)]
enum CheckAction {
    /// County and tract counts for every extracted year
    Summary {
        kind: TractKind,
        /// Directory with extracted JSON files
        extracted_dir: PathBuf,
    },
    /// Compare two extracted years
    Compare {
        year1: String,
        year2: String,
        extracted_dir: PathBuf,
        #[arg(long, default_value = "ldct")]
        kind: TractKind,
    },
    /// Show one county across every extracted year
    SpotCheck {
        county: String,
        extracted_dir: PathBuf,
        #[arg(long, default_value = "ldct")]
        kind: TractKind,
    },
    /// Summary, anomaly scan, gap scan and year-over-year diffs
    Full {
        kind: TractKind,
        extracted_dir: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            kind,
            input_dir,
            output,
            ocr,
            strips,
            dpi,
            lang,
            lexicon,
        } => {
            let options = zonex_core::ExtractOptions {
                ocr: ocr.into(),
                strips,
                dpi,
                ..Default::default()
            };
            commands::extract::run(kind, &input_dir, output, &options, &lang, lexicon.as_deref())
        }
        Commands::ExtractAll { data_dir } => commands::extract::run_all(&data_dir),
        Commands::Geoids {
            kind,
            year,
            extracted_dir,
            geojson,
            format,
            output,
        } => commands::geoids::run(
            kind,
            &year,
            &extracted_dir,
            &geojson,
            format,
            output.as_deref(),
        ),
        Commands::Check { action } => match action {
            CheckAction::Summary {
                kind,
                extracted_dir,
            } => commands::check::summary(kind, &extracted_dir),
            CheckAction::Compare {
                year1,
                year2,
                extracted_dir,
                kind,
            } => commands::check::compare(kind, &year1, &year2, &extracted_dir),
            CheckAction::SpotCheck {
                county,
                extracted_dir,
                kind,
            } => commands::check::spot_check(kind, &county, &extracted_dir),
            CheckAction::Full {
                kind,
                extracted_dir,
            } => commands::check::full(kind, &extracted_dir),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

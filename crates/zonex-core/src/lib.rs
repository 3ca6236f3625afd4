pub mod aggregate;
pub mod classify;
pub mod context;
pub mod error;
pub mod extraction;
pub mod geoid;
pub mod layout;
pub mod lexicon;
pub mod model;
pub mod parsing;
pub mod report;

use std::path::Path;

use context::ExtractionContext;
use error::ZonexError;
use extraction::{scanned_document, OcrEngine, PdfBackend};
use layout::LayoutParams;
use lexicon::schema::LexiconDef;
use model::{MilitaryZoneRecord, OpportunityZoneRecord, TractRecord};
use parsing::{ldct, military, opportunity};

/// Overlap between adjacent column strips in pixels, so a character on
/// a strip boundary stays whole in at least one strip.
pub const STRIP_OVERLAP_PX: usize = 5;

/// When to run OCR on a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OcrMode {
    /// Decide per document from the text layer.
    #[default]
    Auto,
    Force,
    Off,
}

/// Tunables for census tract extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub ocr: OcrMode,
    /// Vertical strips per page for the OCR column pass.
    pub strips: usize,
    /// Render resolution for OCR.
    pub dpi: u32,
    pub layout: LayoutParams,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            ocr: OcrMode::Auto,
            strips: 3,
            dpi: 150,
            layout: LayoutParams::default(),
        }
    }
}

/// Census tract extraction outcome for one document.
#[derive(Debug)]
pub struct TractExtraction {
    pub year: i32,
    pub records: Vec<TractRecord>,
    pub used_ocr: bool,
    pub warnings: Vec<String>,
}

/// Military zone extraction outcome for one document.
#[derive(Debug)]
pub struct MilitaryZoneExtraction {
    pub year: i32,
    pub records: Vec<MilitaryZoneRecord>,
    pub warnings: Vec<String>,
}

/// Opportunity zone extraction outcome for one document.
#[derive(Debug)]
pub struct OpportunityZoneExtraction {
    pub records: Vec<OpportunityZoneRecord>,
    pub warnings: Vec<String>,
}

/// Main API entry point for the census tract listings: extract every
/// (year, msa, county, tract) record from one PDF.
///
/// The publication year comes from the file name. Digital documents go
/// through positioned-fragment extraction and column detection; scanned
/// documents are rendered and read strip by strip with OCR. `Auto`
/// decides per document by probing the text layer.
pub fn extract_census_tracts(
    pdf: &Path,
    backend: &dyn PdfBackend,
    ocr: &dyn OcrEngine,
    lexicon: &LexiconDef,
    options: &ExtractOptions,
) -> Result<TractExtraction, ZonexError> {
    let year = parsing::year_from_filename(pdf)?;

    let use_ocr = match options.ocr {
        OcrMode::Force => true,
        OcrMode::Off => false,
        OcrMode::Auto => scanned_document(&backend.extract_pages(pdf)?),
    };

    if !use_ocr {
        let fragments = backend.extract_fragments(pdf)?;
        log::debug!(
            "{}: {} fragments via {}",
            pdf.display(),
            fragments.len(),
            backend.backend_name()
        );
        let parsed = ldct::extract_from_fragments(&fragments, year, lexicon, &options.layout);
        log::info!("{}: {} records (digital)", pdf.display(), parsed.records.len());
        return Ok(TractExtraction {
            year,
            records: parsed.records,
            used_ocr: false,
            warnings: parsed.warnings,
        });
    }

    extract_tracts_ocr(pdf, backend, ocr, lexicon, options, year)
}

/// OCR path: render each page once, recover section headers from the
/// full-width image, then read each column strip through the shared
/// context so headers carry across strips and pages.
fn extract_tracts_ocr(
    pdf: &Path,
    backend: &dyn PdfBackend,
    ocr: &dyn OcrEngine,
    lexicon: &LexiconDef,
    options: &ExtractOptions,
    year: i32,
) -> Result<TractExtraction, ZonexError> {
    let page_count = backend.extract_pages(pdf)?.len();
    log::info!(
        "{}: OCR over {} pages at {} dpi with {}",
        pdf.display(),
        page_count,
        options.dpi,
        ocr.engine_name()
    );

    let mut ctx = ExtractionContext::new(true);
    let mut all = ldct::ParsedTracts::default();

    for page in 0..page_count {
        let image = backend.render_page(pdf, page, options.dpi)?;

        let full_text = ocr.recognize(&image)?;
        if let Some(first) = ldct::page_headers(&full_text, lexicon).first() {
            ctx.seed_header(first);
        }

        for strip in image.vertical_strips(options.strips, STRIP_OVERLAP_PX) {
            let text = ocr.recognize(&strip)?;
            all.extend(ldct::extract_from_column_text(&text, &mut ctx, year, lexicon));
        }
    }

    log::info!("{}: {} records (OCR)", pdf.display(), all.records.len());
    Ok(TractExtraction {
        year,
        records: all.records,
        used_ocr: true,
        warnings: all.warnings,
    })
}

/// Extract military zone designation rows from one PDF. These tables
/// always carry a text layer, so there is no OCR path.
pub fn extract_military_zones(
    pdf: &Path,
    backend: &dyn PdfBackend,
) -> Result<MilitaryZoneExtraction, ZonexError> {
    let year = parsing::year_from_filename(pdf)?;
    let pages = backend.extract_pages(pdf)?;
    let parsed = military::extract_from_pages(&pages, year);
    log::info!(
        "{}: {} military zone records",
        pdf.display(),
        parsed.records.len()
    );
    Ok(MilitaryZoneExtraction {
        year,
        records: parsed.records,
        warnings: parsed.warnings,
    })
}

/// Extract state opportunity zone designations from one PDF. These
/// documents carry no year in their file names; each record spans its
/// own designation period instead.
pub fn extract_opportunity_zones(
    pdf: &Path,
    backend: &dyn PdfBackend,
) -> Result<OpportunityZoneExtraction, ZonexError> {
    let pages = backend.extract_pages(pdf)?;
    let parsed = opportunity::extract_from_pages(&pages);
    log::info!(
        "{}: {} opportunity zone records",
        pdf.display(),
        parsed.records.len()
    );
    Ok(OpportunityZoneExtraction {
        records: parsed.records,
        warnings: parsed.warnings,
    })
}

//! Parser for the columned census tract listings.
//!
//! Digital documents arrive as positioned fragments and go through
//! column detection first; scanned documents arrive as per-strip OCR
//! text and are fed line by line. Both paths funnel through the same
//! classifier and reading context, so the grouping rules cannot drift
//! apart.

use crate::classify::{classify_header, classify_unit};
use crate::context::ExtractionContext;
use crate::extraction::Fragment;
use crate::layout::{detect_columns, group_by_column, LayoutParams};
use crate::lexicon::schema::LexiconDef;
use crate::model::TractRecord;
use crate::parsing::push_warning;

/// Records and recoverable problems from one parse pass.
#[derive(Debug, Default)]
pub struct ParsedTracts {
    pub records: Vec<TractRecord>,
    pub warnings: Vec<String>,
}

impl ParsedTracts {
    pub fn extend(&mut self, other: ParsedTracts) {
        self.records.extend(other.records);
        self.warnings.extend(other.warnings);
    }
}

/// Parse positioned fragments from a digital tract listing.
///
/// Columns are detected over the whole document, then each (page,
/// column) group is read top to bottom. The section header carries
/// across columns and pages; the category label resets per column.
pub fn extract_from_fragments(
    fragments: &[Fragment],
    year: i32,
    lexicon: &LexiconDef,
    params: &LayoutParams,
) -> ParsedTracts {
    let columns = detect_columns(fragments, params);
    let grouped = group_by_column(fragments.to_vec(), &columns);

    let mut out = ParsedTracts::default();
    let mut ctx = ExtractionContext::new(true);

    for group in grouped.values() {
        ctx.begin_column();
        for frag in group {
            observe_line(&mut ctx, &frag.text, year, lexicon, &mut out);
        }
    }

    out
}

/// Scan full-page OCR text for section headers, in reading order.
///
/// Section headers span the full page width, so the strip crops cut
/// them apart. A full-width pass recovers them for seeding.
pub fn page_headers(text: &str, lexicon: &LexiconDef) -> Vec<String> {
    text.lines()
        .filter_map(|line| classify_header(line, lexicon))
        .collect()
}

/// Parse one column strip of OCR text.
///
/// The caller owns the context so the section header carries across
/// strips and pages. Each call starts a fresh category scope.
pub fn extract_from_column_text(
    text: &str,
    ctx: &mut ExtractionContext,
    year: i32,
    lexicon: &LexiconDef,
) -> ParsedTracts {
    let mut out = ParsedTracts::default();
    ctx.begin_column();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        observe_line(ctx, line, year, lexicon, &mut out);
    }
    out
}

fn observe_line(
    ctx: &mut ExtractionContext,
    text: &str,
    year: i32,
    lexicon: &LexiconDef,
    out: &mut ParsedTracts,
) {
    let unit = classify_unit(text, lexicon);
    let Some(emission) = ctx.observe(unit) else {
        return;
    };
    let Some(msa) = emission.header else {
        return;
    };
    match TractRecord::new(year, &msa, &emission.category, &emission.code) {
        Ok(record) => out.records.push(record),
        Err(e) => push_warning(&mut out.warnings, format!("{}: dropped \"{}\"", e, text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::builtin::load_preset;

    fn lex() -> LexiconDef {
        load_preset("georgia").unwrap()
    }

    fn frag(page: usize, x: f32, y: f32, text: &str) -> Fragment {
        Fragment {
            text: text.to_string(),
            x,
            y,
            page,
        }
    }

    fn two_column_page() -> Vec<Fragment> {
        vec![
            // Left column
            frag(0, 72.0, 90.0, "ATLANTA-SANDY SPRINGS-ROSWELL MSA"),
            frag(0, 72.0, 110.0, "Fulton"),
            frag(0, 72.0, 130.0, "Census Tract 78.05"),
            frag(0, 72.0, 150.0, "Census Tract 78.06"),
            frag(0, 73.0, 170.0, "DeKalb"),
            frag(0, 72.0, 190.0, "Census Tract 212"),
            frag(0, 72.0, 210.0, "Census Tract 213.01"),
            // Right column
            frag(0, 310.0, 90.0, "Gwinnett"),
            frag(0, 310.0, 110.0, "Census Tract 502.05"),
            frag(0, 311.0, 130.0, "Census Tract 503"),
            frag(0, 310.0, 150.0, "Page 1 of 12"),
            frag(0, 310.0, 170.0, "Census Tract 504.08"),
            frag(0, 310.0, 190.0, "O.C.G.A. 48-7-40"),
            frag(0, 310.0, 210.0, "Census Tract 505"),
        ]
    }

    #[test]
    fn test_two_column_page_reading_order() {
        let parsed = extract_from_fragments(
            &two_column_page(),
            2019,
            &lex(),
            &LayoutParams::default(),
        );

        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        let rows: Vec<(&str, &str)> = parsed
            .records
            .iter()
            .map(|r| (r.county.as_str(), r.tract.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Fulton", "78.05"),
                ("Fulton", "78.06"),
                ("DeKalb", "212"),
                ("DeKalb", "213.01"),
                ("Gwinnett", "502.05"),
                ("Gwinnett", "503"),
                ("Gwinnett", "504.08"),
                ("Gwinnett", "505"),
            ]
        );
        assert!(parsed
            .records
            .iter()
            .all(|r| r.msa == "ATLANTA-SANDY SPRINGS-ROSWELL"));
    }

    #[test]
    fn test_header_carries_into_second_column() {
        let parsed = extract_from_fragments(
            &two_column_page(),
            2019,
            &lex(),
            &LayoutParams::default(),
        );
        // Gwinnett sits in the right column with no header of its own.
        let gwinnett: Vec<_> = parsed
            .records
            .iter()
            .filter(|r| r.county == "Gwinnett")
            .collect();
        assert_eq!(gwinnett.len(), 4);
        assert!(gwinnett
            .iter()
            .all(|r| r.msa == "ATLANTA-SANDY SPRINGS-ROSWELL"));
    }

    #[test]
    fn test_tract_without_context_is_dropped() {
        let mut frags = two_column_page();
        // A stray tract above the header in the left column.
        frags.insert(0, frag(0, 72.0, 50.0, "Census Tract 9999"));
        let parsed =
            extract_from_fragments(&frags, 2019, &lex(), &LayoutParams::default());
        assert!(parsed.records.iter().all(|r| r.tract != "9999"));
    }

    #[test]
    fn test_invalid_tract_becomes_warning() {
        let mut frags = two_column_page();
        frags.push(frag(0, 310.0, 230.0, "Census Tract 12.345"));
        let parsed =
            extract_from_fragments(&frags, 2019, &lex(), &LayoutParams::default());
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.warnings[0].contains("12.345"));
        assert_eq!(parsed.records.len(), 8);
    }

    #[test]
    fn test_page_headers_found_in_order() {
        let text = "2019 Job Tax Credit Rankings\nALBANY MSA\nDougherty\nCensus Tract 2\nROME MSA (cont.)\n";
        assert_eq!(page_headers(text, &lex()), vec!["ALBANY", "ROME"]);
    }

    #[test]
    fn test_column_text_carries_header_across_strips() {
        let lexicon = lex();
        let mut ctx = ExtractionContext::new(true);
        let mut all = ParsedTracts::default();

        let first = "BRUNSWICK MSA\nGlynn\nCensus Tract 5\nCensus Tract 6.01\n";
        all.extend(extract_from_column_text(first, &mut ctx, 2020, &lexicon));

        // Next strip: no header line of its own.
        let second = "Brantley\nCensus Tract 9501\n";
        all.extend(extract_from_column_text(second, &mut ctx, 2020, &lexicon));

        assert_eq!(all.records.len(), 3);
        assert!(all.records.iter().all(|r| r.msa == "BRUNSWICK"));
        assert_eq!(all.records[2].county, "Brantley");
        assert_eq!(all.records[2].tract, "9501");
    }

    #[test]
    fn test_column_text_category_resets_per_strip() {
        let lexicon = lex();
        let mut ctx = ExtractionContext::new(true);

        let first = "VALDOSTA MSA\nLowndes\nCensus Tract 104\n";
        let parsed = extract_from_column_text(first, &mut ctx, 2021, &lexicon);
        assert_eq!(parsed.records.len(), 1);

        // A tract at the top of the next strip has no county yet.
        let second = "Census Tract 105\nEchols\nCensus Tract 9701\n";
        let parsed = extract_from_column_text(second, &mut ctx, 2021, &lexicon);
        let rows: Vec<(&str, &str)> = parsed
            .records
            .iter()
            .map(|r| (r.county.as_str(), r.tract.as_str()))
            .collect();
        assert_eq!(rows, vec![("Echols", "9701")]);
    }
}

//! Single-unit classification.
//!
//! One text unit (a positioned fragment or an OCR line) is mapped to
//! exactly one of four kinds. The checks run in a fixed priority order
//! because header and boilerplate lines can superficially look like
//! short proper-noun category labels.

use crate::lexicon::schema::LexiconDef;
use crate::model::title_case;
use regex::Regex;
use std::sync::LazyLock;

/// What one text unit turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedUnit {
    /// Document-level grouping label, e.g. an MSA name.
    SectionHeader(String),
    /// Column-local grouping label, e.g. a county name.
    CategoryLabel(String),
    /// A record-bearing unit; the value is the numeric code.
    DataValue(String),
    Noise,
}

static CONT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\(cont\.?\)\s*$").unwrap());

static TRACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Census Tract\s+(\d+(?:\.\d+)?)").unwrap());

static CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][a-zA-Z\s]+$").unwrap());

/// Classify one trimmed text unit.
///
/// Order (first match wins):
/// 1. Strip a trailing "(cont.)" continuation marker
/// 2. Noise patterns (page numbers, boilerplate, running titles)
/// 3. Known header prefix or header suffix token
/// 4. Embedded numeric code ("Census Tract 9601.02")
/// 5. Short proper-noun phrase, corrections applied first
/// 6. Otherwise noise
pub fn classify_unit(text: &str, lexicon: &LexiconDef) -> ClassifiedUnit {
    let stripped = CONT_RE.replace(text.trim(), "");
    let unit = stripped.trim();
    if unit.is_empty() || is_noise(unit, lexicon) {
        return ClassifiedUnit::Noise;
    }

    if let Some(name) = match_header(unit, lexicon) {
        return ClassifiedUnit::SectionHeader(name);
    }

    if let Some(code) = match_code(unit) {
        return ClassifiedUnit::DataValue(code);
    }

    if let Some(name) = match_category(unit, lexicon) {
        return ClassifiedUnit::CategoryLabel(name);
    }

    ClassifiedUnit::Noise
}

/// Header-only classification for full-page scans.
///
/// The OCR path reads each page once at full width just to find the
/// section header, which spans all columns and would be cut apart by
/// the strip crops. Only the header rules apply here.
pub fn classify_header(text: &str, lexicon: &LexiconDef) -> Option<String> {
    let stripped = CONT_RE.replace(text.trim(), "");
    let unit = stripped.trim();
    if unit.is_empty() {
        return None;
    }
    match_header(unit, lexicon)
}

fn is_noise(text: &str, lexicon: &LexiconDef) -> bool {
    // Bare page numbers and page footers.
    if text.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    if text.starts_with("Page") || (text.contains("Page") && text.contains("of")) {
        return true;
    }

    for phrase in &lexicon.noise_phrases {
        if text.contains(phrase.as_str()) {
            return true;
        }
    }

    // Running titles start with the year but never name a tract.
    if text.starts_with("20") && !text.contains("Census") {
        return true;
    }

    false
}

/// Match a section header, returning the canonical header name.
fn match_header(text: &str, lexicon: &LexiconDef) -> Option<String> {
    let upper = text.to_uppercase();

    for alias in &lexicon.headers {
        if upper.contains(alias.prefix.as_str()) {
            return Some(alias.name.clone());
        }
    }

    // Unknown headers still count when they carry the suffix token.
    if let Some(rest) = upper.strip_suffix(&lexicon.header_suffix) {
        let name = rest.trim().trim_end_matches('-').trim();
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }

    None
}

fn match_code(text: &str) -> Option<String> {
    TRACT_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Match a category label, returning the normalized name.
fn match_category(text: &str, lexicon: &LexiconDef) -> Option<String> {
    let lower = text.to_lowercase();

    // Correction table first: exact match, then substring, so that
    // OCR misreadings recover before the shape checks can reject them.
    if let Some(fixed) = lexicon.corrections.get(lower.as_str()) {
        return Some(fixed.clone());
    }
    for (wrong, fixed) in &lexicon.corrections {
        if lower.contains(wrong.as_str()) {
            return Some(fixed.clone());
        }
    }

    if lower.contains("census tract") {
        return None;
    }

    let upper = text.to_uppercase();
    if upper.contains(&lexicon.header_suffix) {
        return None;
    }
    if lexicon.header_fragments.iter().any(|f| upper == *f) {
        return None;
    }

    if text.split_whitespace().count() > 2 {
        return None;
    }

    if CATEGORY_RE.is_match(text) {
        return Some(title_case(text));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::builtin::load_preset;

    fn lex() -> LexiconDef {
        load_preset("georgia").unwrap()
    }

    #[test]
    fn test_known_header_prefix() {
        assert_eq!(
            classify_unit("ATLANTA-SANDY SPRINGS-ROSWELL MSA", &lex()),
            ClassifiedUnit::SectionHeader("ATLANTA-SANDY SPRINGS-ROSWELL".into())
        );
        assert_eq!(
            classify_unit("Warner Robins MSA", &lex()),
            ClassifiedUnit::SectionHeader("WARNER ROBINS".into())
        );
    }

    #[test]
    fn test_unknown_header_by_suffix() {
        assert_eq!(
            classify_unit("SOMETOWN MSA", &lex()),
            ClassifiedUnit::SectionHeader("SOMETOWN".into())
        );
    }

    #[test]
    fn test_continuation_marker_stripped() {
        assert_eq!(
            classify_unit("AUGUSTA MSA (cont.)", &lex()),
            ClassifiedUnit::SectionHeader("AUGUSTA-RICHMOND".into())
        );
        assert_eq!(
            classify_unit("Fulton (cont)", &lex()),
            ClassifiedUnit::CategoryLabel("Fulton".into())
        );
    }

    #[test]
    fn test_census_tract_value() {
        assert_eq!(
            classify_unit("Census Tract 9601.02", &lex()),
            ClassifiedUnit::DataValue("9601.02".into())
        );
        assert_eq!(
            classify_unit("census tract 202", &lex()),
            ClassifiedUnit::DataValue("202".into())
        );
    }

    #[test]
    fn test_county_label() {
        assert_eq!(
            classify_unit("Appling", &lex()),
            ClassifiedUnit::CategoryLabel("Appling".into())
        );
        assert_eq!(
            classify_unit("Ben Hill", &lex()),
            ClassifiedUnit::CategoryLabel("Ben Hill".into())
        );
    }

    #[test]
    fn test_ocr_corrections() {
        assert_eq!(
            classify_unit("aker", &lex()),
            ClassifiedUnit::CategoryLabel("Baker".into())
        );
        assert_eq!(
            classify_unit("Dekalb Cer", &lex()),
            ClassifiedUnit::CategoryLabel("DeKalb".into())
        );
        assert_eq!(
            classify_unit("MCINTOSH", &lex()),
            ClassifiedUnit::CategoryLabel("McIntosh".into())
        );
    }

    #[test]
    fn test_page_noise() {
        assert_eq!(classify_unit("37", &lex()), ClassifiedUnit::Noise);
        assert_eq!(classify_unit("Page 3 of 12", &lex()), ClassifiedUnit::Noise);
    }

    #[test]
    fn test_boilerplate_noise() {
        assert_eq!(
            classify_unit("2024 Less Developed Census Tract Areas", &lex()),
            ClassifiedUnit::Noise
        );
        assert_eq!(
            classify_unit("O.C.G.A. 48-7-40", &lex()),
            ClassifiedUnit::Noise
        );
        assert_eq!(classify_unit("Appendix A", &lex()), ClassifiedUnit::Noise);
    }

    #[test]
    fn test_running_title_with_year() {
        assert_eq!(
            classify_unit("2024 Georgia Job Tax Credit Rankings", &lex()),
            ClassifiedUnit::Noise
        );
    }

    #[test]
    fn test_header_fragment_not_a_category() {
        assert_eq!(classify_unit("ROSWELL", &lex()), ClassifiedUnit::Noise);
        assert_eq!(classify_unit("SPRINGS", &lex()), ClassifiedUnit::Noise);
    }

    #[test]
    fn test_long_phrase_is_noise() {
        assert_eq!(
            classify_unit("Some Long Phrase Here", &lex()),
            ClassifiedUnit::Noise
        );
    }

    #[test]
    fn test_bare_number_without_label_is_noise() {
        assert_eq!(classify_unit("9601.02", &lex()), ClassifiedUnit::Noise);
    }

    #[test]
    fn test_empty_after_continuation_strip() {
        assert_eq!(classify_unit("(cont.)", &lex()), ClassifiedUnit::Noise);
    }

    #[test]
    fn test_classify_header_only() {
        assert_eq!(
            classify_header("DALTON MSA (cont.)", &lex()),
            Some("DALTON".into())
        );
        assert_eq!(classify_header("Fulton", &lex()), None);
        assert_eq!(classify_header("Census Tract 101", &lex()), None);
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A lexicon binding the unit classifier to one document family.
///
/// Everything the classifier knows about a jurisdiction lives here:
/// which header names to expect, how OCR tends to garble category
/// names, and which boilerplate phrases to discard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Suffix token that marks a generic section header (e.g. "MSA").
    pub header_suffix: String,
    /// Known header name prefixes with their canonical full names.
    pub headers: Vec<HeaderAlias>,
    /// Known OCR misreadings of category names, keyed lowercase.
    #[serde(default)]
    pub corrections: BTreeMap<String, String>,
    /// Boilerplate phrases whose presence marks a unit as noise.
    #[serde(default)]
    pub noise_phrases: Vec<String>,
    /// Header fragments that must never be read as category names.
    #[serde(default)]
    pub header_fragments: Vec<String>,
}

/// One known header, matched by case-insensitive prefix containment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderAlias {
    pub prefix: String,
    pub name: String,
}

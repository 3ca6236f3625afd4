//! Header and category context carried while reading a document.
//!
//! Listings interleave three kinds of lines: a section header names a
//! document-level grouping, a category label names a column-local
//! grouping under it, and data values belong to the most recent pair.
//! The context tracks that pair across the reading order and decides
//! when a data value has enough context to become a candidate record.

use crate::classify::ClassifiedUnit;

/// A candidate record produced when a data value is seen under
/// sufficient context. Validation happens later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    pub header: Option<String>,
    pub category: String,
    pub code: String,
}

#[derive(Debug)]
pub struct ExtractionContext {
    header: Option<String>,
    category: Option<String>,
    header_required: bool,
}

impl ExtractionContext {
    /// `header_required` gates emission on a populated header; document
    /// families without a header concept pass `false` and category alone
    /// gates emission.
    pub fn new(header_required: bool) -> Self {
        ExtractionContext {
            header: None,
            category: None,
            header_required,
        }
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    /// Seed the header if none has been established yet. Used by the
    /// OCR path, which learns page headers from a separate full-page
    /// pass.
    pub fn seed_header(&mut self, name: &str) {
        if self.header.is_none() {
            self.header = Some(name.to_string());
        }
    }

    /// Enter a new (page, column) bucket. The category is column-local
    /// and resets; the header carries across columns and pages.
    pub fn begin_column(&mut self) {
        self.category = None;
    }

    /// Consume one classified unit in reading order.
    ///
    /// Data values with insufficient context are dropped silently;
    /// stray values above the first category are layout debris, not
    /// errors.
    pub fn observe(&mut self, unit: ClassifiedUnit) -> Option<Emission> {
        match unit {
            ClassifiedUnit::SectionHeader(name) => {
                self.header = Some(name);
                self.category = None;
                None
            }
            ClassifiedUnit::CategoryLabel(name) => {
                self.category = Some(name);
                None
            }
            ClassifiedUnit::DataValue(code) => {
                if self.header_required && self.header.is_none() {
                    return None;
                }
                let category = self.category.clone()?;
                Some(Emission {
                    header: self.header.clone(),
                    category,
                    code,
                })
            }
            ClassifiedUnit::Noise => None,
        }
    }
}

pub mod poppler;
pub mod raster;
pub mod tesseract;

use std::path::Path;

use crate::error::ZonexError;
pub use raster::PageImage;

/// A positioned text fragment from PDF geometry extraction.
///
/// `x`/`y` are the top-left corner of the fragment in page units;
/// `page` is zero-based. Fragments carry no ordering guarantee.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub page: usize,
}

/// Plain text content of a single page, in layout order.
#[derive(Debug, Clone)]
pub struct PageText {
    pub page_number: usize,
    pub lines: Vec<String>,
}

impl PageText {
    /// Total non-whitespace character count, used for scanned-PDF detection.
    pub fn text_chars(&self) -> usize {
        self.lines
            .iter()
            .map(|l| l.chars().filter(|c| !c.is_whitespace()).count())
            .sum()
    }
}

/// Trait for PDF extraction backends.
///
/// One backend instance serves a whole batch; every method opens and
/// releases the document on its own, so a failed call never leaks a handle.
pub trait PdfBackend: Send + Sync {
    /// Extract layout-preserving text, one entry per page.
    fn extract_pages(&self, pdf: &Path) -> Result<Vec<PageText>, ZonexError>;

    /// Extract positioned text fragments for the whole document.
    fn extract_fragments(&self, pdf: &Path) -> Result<Vec<Fragment>, ZonexError>;

    /// Render one page (zero-based) to a grayscale raster at the given DPI.
    fn render_page(&self, pdf: &Path, page: usize, dpi: u32) -> Result<PageImage, ZonexError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Trait for OCR engines.
pub trait OcrEngine: Send + Sync {
    /// Recognize text in a raster image. Lines are newline-separated;
    /// no positional metadata is returned.
    fn recognize(&self, image: &PageImage) -> Result<String, ZonexError>;

    /// Name of this OCR engine (for diagnostics).
    fn engine_name(&self) -> &str;
}

/// Decide whether a document is scanned (image-only) from its text layer.
///
/// A document counts as scanned when none of its first three pages carries
/// more than 100 characters of extractable text.
pub fn scanned_document(pages: &[PageText]) -> bool {
    pages.iter().take(3).all(|p| p.text_chars() <= 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: usize, lines: &[&str]) -> PageText {
        PageText {
            page_number: number,
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_digital_page_not_scanned() {
        let long = "Census Tract 9601.02 ".repeat(10);
        let pages = vec![page(1, &[&long])];
        assert!(!scanned_document(&pages));
    }

    #[test]
    fn test_empty_pages_are_scanned() {
        let pages = vec![page(1, &[]), page(2, &["", "  "])];
        assert!(scanned_document(&pages));
    }

    #[test]
    fn test_text_on_later_page_still_counts() {
        let long = "x".repeat(200);
        let pages = vec![page(1, &[]), page(2, &[&long])];
        assert!(!scanned_document(&pages));
    }

    #[test]
    fn test_text_beyond_first_three_pages_ignored() {
        let long = "x".repeat(200);
        let pages = vec![page(1, &[]), page(2, &[]), page(3, &[]), page(4, &[&long])];
        assert!(scanned_document(&pages));
    }
}

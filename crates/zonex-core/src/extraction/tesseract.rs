use crate::error::ZonexError;
use crate::extraction::{OcrEngine, PageImage};
use std::io::Write;
use std::process::Command;

/// OCR engine shelling out to the tesseract binary.
pub struct TesseractOcr {
    pub lang: String,
    /// Page segmentation mode, 3 is tesseract's fully automatic default.
    pub psm: u32,
}

impl TesseractOcr {
    pub fn new(lang: &str) -> Self {
        TesseractOcr {
            lang: lang.to_string(),
            psm: 3,
        }
    }

    /// Check if tesseract is available on the system.
    pub fn is_available() -> bool {
        Command::new("tesseract")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new("eng")
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &PageImage) -> Result<String, ZonexError> {
        // Tesseract reads PGM directly, so hand it the raster on disk.
        let mut tmpfile = tempfile::Builder::new()
            .suffix(".pgm")
            .tempfile()
            .map_err(|e| ZonexError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(&image.to_pgm())
            .map_err(|e| ZonexError::Extraction(e.to_string()))?;

        let output = Command::new("tesseract")
            .arg(tmpfile.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .arg("--psm")
            .arg(self.psm.to_string())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ZonexError::TesseractNotFound
                } else {
                    ZonexError::Extraction(format!("tesseract failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(ZonexError::TesseractFailed { code, stderr });
        }

        // Resolution estimates and similar notes land on stderr even on success.
        if !output.stderr.is_empty() {
            log::debug!(
                "tesseract: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn engine_name(&self) -> &str {
        "tesseract"
    }
}

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ZonexError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("pdftoppm not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftoppmNotFound,

    #[error("pdftoppm failed with exit code {code}: {stderr}")]
    PdftoppmFailed { code: i32, stderr: String },

    #[error("tesseract not found. Install tesseract-ocr for scanned PDF support")]
    TesseractNotFound,

    #[error("tesseract failed with exit code {code}: {stderr}")]
    TesseractFailed { code: i32, stderr: String },

    #[error("no 4-digit year token in file name '{0}'")]
    YearMissing(String),

    #[error("year {0} not present in extracted data")]
    YearNotFound(String),

    #[error("invalid record: {0}")]
    RecordInvalid(String),

    #[error("failed to load lexicon from {path}: {reason}")]
    LexiconLoad { path: PathBuf, reason: String },

    #[error("invalid lexicon: {0}")]
    LexiconInvalid(String),

    #[error("failed to load county reference from {path}: {reason}")]
    CountyReference { path: PathBuf, reason: String },

    #[error("cannot read {path}: {reason}")]
    FileRead { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

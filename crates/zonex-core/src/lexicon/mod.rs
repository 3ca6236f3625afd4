pub mod builtin;
pub mod schema;

use crate::error::ZonexError;
use schema::LexiconDef;
use std::path::Path;

/// Load a lexicon from a JSON file.
pub fn load_lexicon(path: &Path) -> Result<LexiconDef, ZonexError> {
    let content = std::fs::read_to_string(path).map_err(|e| ZonexError::LexiconLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_lexicon(&content, path)
}

/// Parse a lexicon from a JSON string.
pub fn parse_lexicon(json: &str, source: &Path) -> Result<LexiconDef, ZonexError> {
    let lexicon: LexiconDef = serde_json::from_str(json).map_err(|e| ZonexError::LexiconLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_lexicon(&lexicon)?;
    Ok(lexicon)
}

/// Parse a lexicon from a JSON string (no file path context).
pub fn parse_lexicon_str(json: &str) -> Result<LexiconDef, ZonexError> {
    let lexicon: LexiconDef = serde_json::from_str(json).map_err(ZonexError::Json)?;
    validate_lexicon(&lexicon)?;
    Ok(lexicon)
}

/// Validate that a lexicon is well-formed.
pub fn validate_lexicon(lexicon: &LexiconDef) -> Result<(), ZonexError> {
    if lexicon.headers.is_empty() {
        return Err(ZonexError::LexiconInvalid(
            "headers must not be empty".into(),
        ));
    }

    if lexicon.header_suffix.trim().is_empty() {
        return Err(ZonexError::LexiconInvalid(
            "header_suffix must not be empty".into(),
        ));
    }

    for alias in &lexicon.headers {
        if alias.prefix.is_empty() || alias.name.is_empty() {
            return Err(ZonexError::LexiconInvalid(
                "header prefix and name must not be empty".into(),
            ));
        }
        // Matching uppercases the unit text, so prefixes must already be upper.
        if alias.prefix != alias.prefix.to_uppercase() {
            return Err(ZonexError::LexiconInvalid(format!(
                "header prefix '{}' must be upper case",
                alias.prefix
            )));
        }
    }

    for (wrong, correct) in &lexicon.corrections {
        if wrong.is_empty() || correct.is_empty() {
            return Err(ZonexError::LexiconInvalid(
                "correction entries must not be empty".into(),
            ));
        }
        // Matching lowercases the unit text, so keys must already be lower.
        if wrong != &wrong.to_lowercase() {
            return Err(ZonexError::LexiconInvalid(format!(
                "correction key '{}' must be lower case",
                wrong
            )));
        }
    }

    for phrase in lexicon
        .noise_phrases
        .iter()
        .chain(&lexicon.header_fragments)
    {
        if phrase.trim().is_empty() {
            return Err(ZonexError::LexiconInvalid(
                "noise phrases must not be empty".into(),
            ));
        }
    }

    Ok(())
}

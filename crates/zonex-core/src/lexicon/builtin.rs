use crate::error::ZonexError;
use crate::lexicon::schema::LexiconDef;

const GEORGIA_JSON: &str = include_str!("../../../../lexicons/georgia.json");

/// Available predefined lexicons.
pub const PRESETS: &[&str] = &["georgia"];

/// Load a predefined lexicon by name.
pub fn load_preset(name: &str) -> Result<LexiconDef, ZonexError> {
    match name {
        "georgia" => {
            let lexicon: LexiconDef = serde_json::from_str(GEORGIA_JSON)?;
            Ok(lexicon)
        }
        _ => Err(ZonexError::LexiconInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_georgia_preset() {
        let lex = load_preset("georgia").unwrap();
        assert_eq!(lex.header_suffix, "MSA");
        assert!(!lex.headers.is_empty());
        assert_eq!(lex.corrections.get("mcintosh").unwrap(), "McIntosh");
    }

    #[test]
    fn test_unknown_preset() {
        assert!(load_preset("xyz").is_err());
    }
}

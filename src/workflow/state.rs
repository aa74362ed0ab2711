//! Session state container
//!
//! Everything the workflow screen mutates lives here. It is created when the
//! screen opens, handed to the controller, and dropped with it.

use crate::capture::ImageReference;
use crate::languages::{LanguageCatalog, LanguageOption};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Currently selected image, replaced wholesale on each pick
    pub image: Option<ImageReference>,
    pub source_language: LanguageOption,
    pub target_language: LanguageOption,
    /// Output of the last successful recognition, user-editable
    pub recognized_text: String,
    pub translated_text: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(
            LanguageOption::new("en", "English"),
            LanguageOption::new("uk", "Ukrainian"),
        )
    }
}

impl SessionState {
    pub fn new(source_language: LanguageOption, target_language: LanguageOption) -> Self {
        Self {
            image: None,
            source_language,
            target_language,
            recognized_text: String::new(),
            translated_text: String::new(),
        }
    }

    /// Session with default languages taken from the catalog by code.
    ///
    /// Codes missing from the catalog fall back to the catalog's first entry,
    /// or to the built-in defaults when the catalog is empty.
    pub fn with_defaults(catalog: &LanguageCatalog, source_code: &str, target_code: &str) -> Self {
        let fallback = Self::default();
        let pick = |code: &str, default: LanguageOption| {
            catalog
                .find(code)
                .or_else(|| catalog.get(0))
                .cloned()
                .unwrap_or(default)
        };

        Self::new(
            pick(source_code, fallback.source_language),
            pick(target_code, fallback.target_language),
        )
    }

    /// Text that would be sent to the translator
    pub fn text_to_translate(&self) -> &str {
        self.recognized_text.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> LanguageCatalog {
        LanguageCatalog::from_options(vec![
            LanguageOption::new("en", "English"),
            LanguageOption::new("uk", "Ukrainian"),
            LanguageOption::new("de", "German"),
        ])
    }

    #[test]
    fn test_default_session() {
        let state = SessionState::default();
        assert!(state.image.is_none());
        assert_eq!(state.source_language.code, "en");
        assert_eq!(state.target_language.code, "uk");
        assert!(state.recognized_text.is_empty());
    }

    #[test]
    fn test_with_defaults_looks_up_codes() {
        let state = SessionState::with_defaults(&catalog(), "de", "en");
        assert_eq!(state.source_language, LanguageOption::new("de", "German"));
        assert_eq!(state.target_language, LanguageOption::new("en", "English"));
    }

    #[test]
    fn test_with_defaults_unknown_code_uses_first_entry() {
        let state = SessionState::with_defaults(&catalog(), "zz", "uk");
        assert_eq!(state.source_language.code, "en");
        assert_eq!(state.target_language.code, "uk");
    }

    #[test]
    fn test_text_to_translate_is_trimmed() {
        let mut state = SessionState::default();
        state.recognized_text = "  Hello \n".into();
        assert_eq!(state.text_to_translate(), "Hello");
    }
}

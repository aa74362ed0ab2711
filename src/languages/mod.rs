//! Language catalog
//!
//! The fixed list of languages the translation engine supports, each paired
//! with an English display title.

pub mod names;

use tracing::debug;

use crate::workflow::collaborators::LanguageCatalogSource;

/// A selectable language: code plus human-readable title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageOption {
    pub code: String,
    pub title: String,
}

impl LanguageOption {
    pub fn new(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
        }
    }

    /// Build an option from a code, resolving the title from the name table
    pub fn from_code(code: &str) -> Self {
        Self::new(code, names::display_title(code))
    }
}

/// Languages offered by the on-device translation toolkit
pub const BUNDLED_LANGUAGE_CODES: &[&str] = &[
    "af", "ar", "be", "bg", "bn", "ca", "cs", "cy", "da", "de", "el", "en", "eo", "es", "et",
    "fa", "fi", "fr", "ga", "gl", "gu", "he", "hi", "hr", "ht", "hu", "id", "is", "it", "ja",
    "ka", "kn", "ko", "lt", "lv", "mk", "mr", "ms", "mt", "nl", "no", "pl", "pt", "ro", "ru",
    "sk", "sl", "sq", "sv", "sw", "ta", "te", "th", "tl", "tr", "uk", "ur", "vi", "zh",
];

/// Catalog source listing the bundled language codes
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledLanguages;

impl LanguageCatalogSource for BundledLanguages {
    fn language_codes(&self) -> Vec<String> {
        BUNDLED_LANGUAGE_CODES.iter().map(|c| c.to_string()).collect()
    }
}

/// Immutable, positionally indexed list of languages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageCatalog {
    languages: Vec<LanguageOption>,
}

impl LanguageCatalog {
    /// Build the catalog from a source's supported codes
    pub fn load(source: &dyn LanguageCatalogSource) -> Self {
        let languages: Vec<LanguageOption> = source
            .language_codes()
            .iter()
            .map(|code| {
                let option = LanguageOption::from_code(code);
                debug!("Catalog language: {} ({})", option.code, option.title);
                option
            })
            .collect();
        Self { languages }
    }

    pub fn from_options(languages: Vec<LanguageOption>) -> Self {
        Self { languages }
    }

    pub fn get(&self, index: usize) -> Option<&LanguageOption> {
        self.languages.get(index)
    }

    pub fn find(&self, code: &str) -> Option<&LanguageOption> {
        self.languages.iter().find(|l| l.code == code)
    }

    pub fn position(&self, code: &str) -> Option<usize> {
        self.languages.iter().position(|l| l.code == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageOption> {
        self.languages.iter()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource(Vec<&'static str>);

    impl LanguageCatalogSource for FixedSource {
        fn language_codes(&self) -> Vec<String> {
            self.0.iter().map(|c| c.to_string()).collect()
        }
    }

    #[test]
    fn test_load_resolves_titles_in_order() {
        let catalog = LanguageCatalog::load(&FixedSource(vec!["en", "uk", "xx"]));
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(0), Some(&LanguageOption::new("en", "English")));
        assert_eq!(catalog.get(1), Some(&LanguageOption::new("uk", "Ukrainian")));
        // Unknown codes keep the code as title
        assert_eq!(catalog.get(2), Some(&LanguageOption::new("xx", "xx")));
        assert_eq!(catalog.get(3), None);
    }

    #[test]
    fn test_bundled_catalog() {
        let catalog = LanguageCatalog::load(&BundledLanguages);
        assert_eq!(catalog.len(), 59);
        assert!(catalog.iter().all(|l| l.title != l.code));
        assert_eq!(catalog.find("de").map(|l| l.title.as_str()), Some("German"));
        assert_eq!(catalog.position("af"), Some(0));
    }
}

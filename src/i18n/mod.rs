//! Internationalization (i18n) support for the built-in pages

use anyhow::Result;
use std::collections::HashMap;

/// Built-in language files: (language, YAML source)
const LANGUAGES: &[(&str, &str)] = &[
    ("en", include_str!("languages/en.yml")),
    ("zh-CN", include_str!("languages/zh-CN.yml")),
];

/// Fallback language
const DEFAULT_LANGUAGE: &str = "en";

/// Internationalization handler
#[derive(Debug, Clone)]
pub struct I18n {
    /// Current language
    language: String,
    /// Language data: lang -> key -> translation
    translations: HashMap<String, HashMap<String, String>>,
}

impl I18n {
    /// Create a handler with the built-in languages loaded
    pub fn new(language: &str) -> Result<Self> {
        let mut translations = HashMap::new();
        for (lang, source) in LANGUAGES {
            let data: HashMap<String, String> = serde_yaml::from_str(source)?;
            translations.insert(lang.to_string(), data);
        }

        if !translations.contains_key(language) {
            tracing::warn!(
                "No translations for language {:?}, falling back to {}",
                language,
                DEFAULT_LANGUAGE
            );
        }

        Ok(Self {
            language: language.to_string(),
            translations,
        })
    }

    /// Get the current language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get a translation by key, falling back to English and then the key
    pub fn get(&self, key: &str) -> String {
        [self.language.as_str(), DEFAULT_LANGUAGE]
            .iter()
            .filter_map(|lang| self.translations.get(*lang))
            .find_map(|data| data.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// All translations for the current language, English filling the gaps
    pub fn get_all_translations(&self) -> HashMap<String, String> {
        let mut all = self
            .translations
            .get(DEFAULT_LANGUAGE)
            .cloned()
            .unwrap_or_default();
        if let Some(data) = self.translations.get(&self.language) {
            all.extend(data.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        all
    }
}

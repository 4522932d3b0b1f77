//! Localization tables
//!
//! Every supported language is compiled into the binary. A [`Localization`]
//! is built once per language at startup and shared read-only afterwards.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

pub const FALLBACK_LANGUAGE: &str = "en";

const BUNDLED: &[(&str, &str)] = &[
    ("en", include_str!("../translations/en.json")),
    ("hi", include_str!("../translations/hi.json")),
    ("pa", include_str!("../translations/pa.json")),
    ("mr", include_str!("../translations/mr.json")),
];

/// One language's dictionary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Localization {
    pub language_code: String,
    pub dictionary: HashMap<String, String>,
}

impl Localization {
    /// Parse the bundled table for `code`. `None` if the language is not bundled.
    pub fn load(code: &str) -> Option<Result<Self>> {
        let (code, raw) = BUNDLED.iter().find(|(c, _)| *c == code)?;
        Some(
            serde_json::from_str::<HashMap<String, String>>(raw)
                .with_context(|| format!("Bundled translations for '{}' are not valid JSON", code))
                .map(|dictionary| Self {
                    language_code: code.to_string(),
                    dictionary,
                }),
        )
    }

    /// Translated text for `key`, or the key itself when untranslated.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.dictionary.get(key).map(String::as_str).unwrap_or(key)
    }
}

/// All bundled languages plus the default used when a request names none.
#[derive(Debug, Clone)]
pub struct Translations {
    tables: HashMap<String, Arc<Localization>>,
    default_language: String,
}

impl Translations {
    pub fn load_bundled(default_language: &str) -> Result<Self> {
        let mut tables = HashMap::new();
        for (code, _) in BUNDLED {
            if let Some(table) = Localization::load(code) {
                tables.insert(code.to_string(), Arc::new(table?));
            }
        }

        let default_language = if tables.contains_key(default_language) {
            default_language.to_string()
        } else {
            tracing::warn!(
                requested = default_language,
                "Default language is not bundled, using {}",
                FALLBACK_LANGUAGE
            );
            FALLBACK_LANGUAGE.to_string()
        };

        tracing::info!(
            languages = tables.len(),
            default_language = %default_language,
            "Translations loaded"
        );

        Ok(Self {
            tables,
            default_language,
        })
    }

    pub fn supported(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.tables.contains_key(&normalize_code(code))
    }

    /// Table for `code`; unknown codes get the English table.
    pub fn get(&self, code: &str) -> Arc<Localization> {
        self.tables
            .get(&normalize_code(code))
            .or_else(|| self.tables.get(FALLBACK_LANGUAGE))
            .cloned()
            .unwrap_or_else(|| {
                Arc::new(Localization {
                    language_code: FALLBACK_LANGUAGE.to_string(),
                    dictionary: HashMap::new(),
                })
            })
    }

    /// Picks a language: explicit request first, then the first supported
    /// `Accept-Language` entry, then the configured default.
    pub fn negotiate(
        &self,
        explicit: Option<&str>,
        accept_language: Option<&str>,
    ) -> Arc<Localization> {
        if let Some(code) = explicit.filter(|c| self.is_supported(c)) {
            return self.get(code);
        }

        let from_header = accept_language.and_then(|header| {
            header
                .split(',')
                .filter_map(|entry| entry.split(';').next())
                .map(normalize_code)
                .find(|code| self.tables.contains_key(code))
        });

        self.get(from_header.as_deref().unwrap_or(self.default_language.as_str()))
    }
}

/// `"hi-IN"` and `" HI "` both become `"hi"`.
fn normalize_code(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

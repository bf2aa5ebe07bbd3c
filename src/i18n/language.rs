//! Supported languages.
//!
//! The set is closed: every code the tool accepts is a variant of
//! [`Language`], and the display name used in the translator instruction is
//! a total `match` over the variants.

use crate::error::Error;
use std::fmt;

/// A language the translator can be asked to read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Spanish,
    French,
    German,
    Italian,
    Japanese,
    Korean,
    Portuguese,
    Russian,
    Chinese,
}

impl Language {
    /// Every supported language, in the order they are listed to users.
    pub const ALL: [Language; 10] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Italian,
        Language::Japanese,
        Language::Korean,
        Language::Portuguese,
        Language::Russian,
        Language::Chinese,
    ];

    /// Resolve a short language code (e.g. "EN", "DE").
    ///
    /// Codes are matched case-insensitively after trimming surrounding
    /// whitespace, so `"de"` and `" DE "` both resolve to German.
    ///
    /// # Returns
    /// * `Ok(Language)` for one of the supported codes
    /// * `Err(Error::UnsupportedLanguageCode)` for anything else
    pub fn from_code(code: &str) -> Result<Language, Error> {
        let normalized = code.trim().to_ascii_uppercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == normalized)
            .ok_or_else(|| Error::UnsupportedLanguageCode(code.to_string()))
    }

    /// The short code, as accepted on the command line.
    ///
    /// Note these are the tool's own codes, not ISO 639-1: Japanese is `JP`
    /// and Chinese is `CN`.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "EN",
            Language::Spanish => "ES",
            Language::French => "FR",
            Language::German => "DE",
            Language::Italian => "IT",
            Language::Japanese => "JP",
            Language::Korean => "KO",
            Language::Portuguese => "PT",
            Language::Russian => "RU",
            Language::Chinese => "CN",
        }
    }

    /// English display name, used verbatim in the translator instruction.
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Italian => "Italian",
            Language::Japanese => "Japanese",
            Language::Korean => "Korean",
            Language::Portuguese => "Portuguese",
            Language::Russian => "Russian",
            Language::Chinese => "Chinese",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

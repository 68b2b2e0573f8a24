use std::slice::Iter;
use std::str::FromStr;

use crate::error::SpotlightError;
use crate::frequency::{FrequencyList, ENGLISH_FREQUENCY, SWEDISH_FREQUENCY};

/// The languages a crawl can be analyzed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Swedish,
}

impl Language {
    /// All known languages.
    pub fn known_languages() -> Iter<'static, Language> {
        static LANGUAGES: [Language; 2] = [Language::English, Language::Swedish];
        LANGUAGES.iter()
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Swedish => "sv",
        }
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Swedish => "Swedish",
        }
    }

    /// The bundled list of the most frequent words of the language.
    pub fn frequency_list(&self) -> &'static FrequencyList {
        match self {
            Language::English => &ENGLISH_FREQUENCY,
            Language::Swedish => &SWEDISH_FREQUENCY,
        }
    }
}

impl FromStr for Language {
    type Err = SpotlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::English),
            "sv" => Ok(Language::Swedish),
            _ => Err(SpotlightError::UnsupportedLanguage {
                code: s.to_string(),
            }),
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

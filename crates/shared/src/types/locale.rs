//! Minimal locale identifier (language plus optional ISO country).

use serde::{Deserialize, Serialize};

/// A language / country pair such as `de_CH`.
///
/// Only identity matters here; no locale-specific rules are attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Locale {
    language: String,
    country: Option<String>,
}

impl Locale {
    /// Creates a locale from a language and an optional country.
    pub fn new(language: impl Into<String>, country: Option<&str>) -> Self {
        Self {
            language: language.into().to_lowercase(),
            country: country.map(str::to_uppercase),
        }
    }

    /// Lower-case language code.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Upper-case ISO country code, if any.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.country {
            Some(country) => write!(f, "{}_{country}", self.language),
            None => write!(f, "{}", self.language),
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(['_', '-']);
        let language = parts.next().unwrap_or_default();
        let country = parts.next();
        if parts.next().is_some() {
            return Err(format!("Unsupported locale: {s}"));
        }
        let valid = |p: &str| !p.is_empty() && p.chars().all(|c| c.is_ascii_alphabetic());
        if !valid(language) || country.is_some_and(|c| !valid(c)) {
            return Err(format!("Invalid locale: {s}"));
        }
        Ok(Self::new(language, country))
    }
}

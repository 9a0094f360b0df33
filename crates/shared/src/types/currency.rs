//! Currency unit as returned by currency providers.

use serde::{Deserialize, Serialize};

/// An ISO 4217 style currency unit.
///
/// Units carry the name of the provider that produced them. Two providers
/// answering with the same code therefore yield two distinct units, which is
/// what lets a strict lookup detect ambiguity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurrencyUnit {
    code: String,
    numeric_code: Option<u16>,
    default_fraction_digits: u32,
    provider: String,
}

impl CurrencyUnit {
    /// Creates a new currency unit with no provider attribution.
    pub fn new(code: impl Into<String>, default_fraction_digits: u32) -> Self {
        Self {
            code: code.into().to_uppercase(),
            numeric_code: None,
            default_fraction_digits,
            provider: String::new(),
        }
    }

    /// Sets the ISO numeric code.
    #[must_use]
    pub fn with_numeric_code(mut self, numeric_code: u16) -> Self {
        self.numeric_code = Some(numeric_code);
        self
    }

    /// Attributes the unit to a provider.
    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// Alphabetic currency code (e.g. "CHF").
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// ISO numeric code, if known.
    #[must_use]
    pub const fn numeric_code(&self) -> Option<u16> {
        self.numeric_code
    }

    /// Number of minor-unit digits.
    #[must_use]
    pub const fn default_fraction_digits(&self) -> u32 {
        self.default_fraction_digits
    }

    /// Name of the provider that produced this unit (empty if unattributed).
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }
}

impl std::fmt::Display for CurrencyUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.provider.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} ({})", self.code, self.provider)
        }
    }
}

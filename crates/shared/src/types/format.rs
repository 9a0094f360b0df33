//! Amount formats returned by format providers.

use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};

use super::{Attributes, Locale, Money};

/// Identifies a format and the provider that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountFormatContext {
    /// Provider name.
    pub provider: String,
    /// Format name.
    pub format_name: String,
    /// Locale the format was made for, if locale specific.
    pub locale: Option<Locale>,
    /// Provider-specific attributes.
    #[serde(default)]
    pub attributes: Attributes,
}

impl AmountFormatContext {
    /// Creates a context for a named format.
    pub fn new(provider: impl Into<String>, format_name: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            format_name: format_name.into(),
            locale: None,
            attributes: Attributes::new(),
        }
    }
}

/// Where the currency code goes relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyPlacement {
    /// `USD 1,000.00`
    Prefix,
    /// `1.000,00 EUR`
    Suffix,
}

/// Plain rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountFormatStyle {
    /// Currency code placement.
    pub placement: CurrencyPlacement,
    /// Thousands separator, if grouping is wanted.
    pub grouping_separator: Option<char>,
    /// Decimal separator.
    pub decimal_separator: char,
}

impl Default for AmountFormatStyle {
    fn default() -> Self {
        Self {
            placement: CurrencyPlacement::Prefix,
            grouping_separator: Some(','),
            decimal_separator: '.',
        }
    }
}

/// A formatter for money amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountFormat {
    /// Where this format came from.
    pub context: AmountFormatContext,
    /// Rendering parameters.
    pub style: AmountFormatStyle,
}

impl AmountFormat {
    /// Creates a format.
    #[must_use]
    pub const fn new(context: AmountFormatContext, style: AmountFormatStyle) -> Self {
        Self { context, style }
    }

    /// Renders an amount padded to its currency's fraction digits.
    #[must_use]
    pub fn format(&self, money: &Money) -> String {
        let dp = money.currency.default_fraction_digits();
        let mut amount = money
            .amount
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
        amount.rescale(dp);

        let digits = amount.abs().to_string();
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

        let mut number = String::new();
        if amount.is_sign_negative() && !amount.is_zero() {
            number.push('-');
        }
        number.push_str(&group(int_part, self.style.grouping_separator));
        if !frac_part.is_empty() {
            number.push(self.style.decimal_separator);
            number.push_str(frac_part);
        }

        match self.style.placement {
            CurrencyPlacement::Prefix => format!("{} {number}", money.currency.code()),
            CurrencyPlacement::Suffix => format!("{number} {}", money.currency.code()),
        }
    }
}

fn group(int_part: &str, separator: Option<char>) -> String {
    let Some(separator) = separator else {
        return int_part.to_string();
    };
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

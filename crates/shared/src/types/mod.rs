//! Value types exchanged between providers, resolvers and callers.
//!
//! All of these are immutable data carriers; they contain no lookup logic.

pub mod currency;
pub mod format;
pub mod locale;
pub mod money;
pub mod rate;
pub mod rounding;

use std::collections::BTreeMap;

pub use currency::CurrencyUnit;
pub use format::{AmountFormat, AmountFormatContext, AmountFormatStyle, CurrencyPlacement};
pub use locale::Locale;
pub use money::Money;
pub use rate::{ConversionContext, ExchangeRate, ProviderContext, RateType};
pub use rounding::{Rounding, RoundingContext, RoundingMode, RoundingScale};

/// Open, string-keyed attribute bag for provider-specific extensions.
pub type Attributes = BTreeMap<String, serde_json::Value>;

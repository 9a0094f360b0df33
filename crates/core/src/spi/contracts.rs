use std::collections::BTreeSet;

use coinage_shared::MonetaryResult;
use coinage_shared::types::{AmountFormat, CurrencyUnit, ExchangeRate, Locale, ProviderContext, Rounding};

use super::Provider;
use crate::query::{AmountFormatQuery, ConversionQuery, CurrencyQuery, RoundingQuery};

/// Answers currency queries.
pub trait CurrencyProvider: Provider {
    /// Every unit this provider knows that matches the query.
    fn currencies(&self, query: &CurrencyQuery) -> MonetaryResult<Vec<CurrencyUnit>>;
}

/// Answers rounding queries.
pub trait RoundingProvider: Provider {
    /// The rounding matching the query, if this provider has one.
    fn rounding(&self, query: &RoundingQuery) -> MonetaryResult<Option<Rounding>>;

    /// Names of the roundings this provider can produce by name.
    fn rounding_names(&self) -> BTreeSet<String>;
}

/// Supplies exchange rates.
///
/// A missing rate is the provider's own domain error
/// ([`MonetaryError::RateUnavailable`](coinage_shared::MonetaryError::RateUnavailable)),
/// not something the resolver decides.
pub trait ExchangeRateProvider: Provider {
    /// Static description of the provider.
    fn provider_context(&self) -> ProviderContext;

    /// Rate for the query's base and term currencies.
    fn exchange_rate(&self, query: &ConversionQuery) -> MonetaryResult<ExchangeRate>;

    /// Whether [`exchange_rate`](Self::exchange_rate) would succeed.
    fn is_available(&self, query: &ConversionQuery) -> bool {
        self.exchange_rate(query).is_ok()
    }
}

/// Supplies amount formats.
pub trait AmountFormatProvider: Provider {
    /// Formats matching the query, best first.
    fn amount_formats(&self, query: &AmountFormatQuery) -> MonetaryResult<Vec<AmountFormat>>;

    /// Locales this provider has dedicated formats for.
    fn available_locales(&self) -> BTreeSet<Locale>;
}

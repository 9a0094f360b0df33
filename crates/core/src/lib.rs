//! Provider registry and query resolution for Coinage.
//!
//! Monetary services (currency lookup, rounding, exchange-rate conversion and
//! amount formatting) are answered by independently registered *providers*.
//! This crate discovers them, computes which ones to consult for a query and
//! combines their answers.
//!
//! # Modules
//!
//! - `spi` - Provider contracts and type-erased provider records
//! - `bootstrap` - Discovery facilities and the registry
//! - `query` - Immutable queries, builders and provider chains
//! - `currency`, `rounding`, `conversion`, `format` - Domain resolvers and facades
//! - `providers` - Built-in providers

pub mod bootstrap;
pub mod conversion;
pub mod currency;
pub mod format;
pub mod providers;
pub mod query;
pub mod rounding;
pub mod spi;

mod resolve;

#[doc(hidden)]
pub use inventory;

pub use bootstrap::{DiscoveryFacility, Registry};
pub use conversion::{Conversions, CurrencyConversion};
pub use currency::Currencies;
pub use format::Formats;
pub use query::{
    AmountFormatQuery, ConversionQuery, CurrencyQuery, Query, QueryBuilder, RoundingQuery,
};
pub use rounding::Roundings;

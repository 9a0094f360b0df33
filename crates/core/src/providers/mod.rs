//! Built-in providers.
//!
//! The stateless ones register themselves with
//! [`register_provider!`](crate::register_provider) and are also listed by
//! [`builtin_records`] for facilities that do not read link-time
//! registrations. [`ConfiguredRateProvider`] carries data and is built
//! explicitly from configuration.

mod configured;
mod currency;
mod format;
mod rate;
mod rounding;

use std::sync::Arc;

use crate::spi::{
    AmountFormatProvider, CurrencyProvider, ExchangeRateProvider, ProviderRecord, RoundingProvider,
};

pub use configured::ConfiguredRateProvider;
pub use currency::{DefaultCurrencyProvider, iso_unit};
pub use format::DefaultFormatProvider;
pub use rate::IdentityRateProvider;
pub use rounding::DefaultRoundingProvider;

crate::register_provider!(dyn CurrencyProvider, DefaultCurrencyProvider);
crate::register_provider!(dyn RoundingProvider, DefaultRoundingProvider);
crate::register_provider!(dyn ExchangeRateProvider, IdentityRateProvider);
crate::register_provider!(dyn AmountFormatProvider, DefaultFormatProvider);

/// Records for every stateless built-in provider.
pub fn builtin_records() -> Vec<ProviderRecord> {
    vec![
        ProviderRecord::provider::<dyn CurrencyProvider>(Arc::new(DefaultCurrencyProvider)),
        ProviderRecord::provider::<dyn RoundingProvider>(Arc::new(DefaultRoundingProvider)),
        ProviderRecord::provider::<dyn ExchangeRateProvider>(Arc::new(IdentityRateProvider)),
        ProviderRecord::provider::<dyn AmountFormatProvider>(Arc::new(DefaultFormatProvider)),
    ]
}

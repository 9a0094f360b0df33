//! Service provider interfaces.
//!
//! A *contract* is a trait object type such as `dyn CurrencyProvider`. Plugins
//! implement a contract and are handed to a discovery facility wrapped in a
//! [`ProviderRecord`]; resolvers get them back, typed, from the registry.

mod contracts;
mod record;

pub use contracts::{AmountFormatProvider, CurrencyProvider, ExchangeRateProvider, RoundingProvider};
pub use record::{ContractId, ProviderRecord};

/// Anything the registry can hand out.
pub trait Service: Send + Sync + 'static {
    /// Implementation type name.
    ///
    /// [`Registry::resolve_one`](crate::Registry::resolve_one) sorts candidates
    /// by this value, so overriding it changes which candidate wins.
    fn implementation(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A named capability participating in a domain.
pub trait Provider: Service {
    /// Declared provider name, unique within its contract.
    ///
    /// `None` is tolerated: such a provider is logged and left out of every
    /// chain, so it can never be selected.
    fn provider_name(&self) -> Option<&str>;
}

use std::collections::BTreeSet;
use std::sync::Arc;

use coinage_shared::types::{CurrencyUnit, Rounding};
use coinage_shared::{MonetaryError, MonetaryResult};

use super::{DefaultRoundingResolver, RoundingResolver};
use crate::bootstrap::Registry;
use crate::query::RoundingQuery;
use crate::spi::Service;

/// Entry point for rounding lookups.
#[derive(Clone)]
pub struct Roundings {
    resolver: Arc<dyn RoundingResolver>,
}

impl Roundings {
    /// Uses the [`RoundingResolver`] deployed in `registry`, or the default one.
    pub fn new(registry: &Arc<Registry>) -> Self {
        let resolver = registry
            .resolve_one::<dyn RoundingResolver>()
            .unwrap_or_else(|| Arc::new(DefaultRoundingResolver::new(Arc::clone(registry))));
        Self { resolver }
    }

    /// Uses an explicit resolver.
    pub fn with_resolver(resolver: Arc<dyn RoundingResolver>) -> Self {
        Self { resolver }
    }

    /// Backed by the process-wide registry.
    pub fn global() -> Self {
        Self::new(&Registry::global())
    }

    /// First rounding matching `query` in chain order.
    pub fn rounding(&self, query: &RoundingQuery) -> Option<Rounding> {
        self.resolver.roundings(query).into_iter().next()
    }

    /// Rounding for `currency`.
    ///
    /// # Errors
    ///
    /// [`MonetaryError::NoRounding`] if no provider answers.
    pub fn rounding_for_currency(&self, currency: &CurrencyUnit, providers: &[&str]) -> MonetaryResult<Rounding> {
        self.rounding(&currency_query(currency, providers))
            .ok_or_else(|| MonetaryError::NoRounding {
                detail: format!("for {}", currency.code()),
            })
    }

    /// Rounding registered under `name`.
    ///
    /// # Errors
    ///
    /// [`MonetaryError::NoRounding`] if no provider answers.
    pub fn rounding_named(&self, name: &str, providers: &[&str]) -> MonetaryResult<Rounding> {
        self.rounding(&named_query(name, providers))
            .ok_or_else(|| MonetaryError::NoRounding {
                detail: format!("for name {name}"),
            })
    }

    /// Every rounding matching `query`, in chain order.
    pub fn roundings(&self, query: &RoundingQuery) -> Vec<Rounding> {
        self.resolver.roundings(query)
    }

    /// Whether any provider answers `query`.
    pub fn is_rounding_available(&self, query: &RoundingQuery) -> bool {
        self.rounding(query).is_some()
    }

    /// Whether any provider has a rounding for `currency`.
    pub fn is_rounding_available_for_currency(&self, currency: &CurrencyUnit, providers: &[&str]) -> bool {
        self.is_rounding_available(&currency_query(currency, providers))
    }

    /// Whether any provider has a rounding named `name`.
    pub fn is_rounding_available_named(&self, name: &str, providers: &[&str]) -> bool {
        self.is_rounding_available(&named_query(name, providers))
    }

    /// Rounding names offered by `providers` (default chain if empty).
    pub fn rounding_names(&self, providers: &[&str]) -> BTreeSet<String> {
        let providers: Vec<String> = providers.iter().map(|p| (*p).to_string()).collect();
        self.resolver.rounding_names(&providers)
    }

    /// The default rounding.
    pub fn default_rounding(&self) -> Rounding {
        self.resolver.default_rounding()
    }

    /// Names of every discovered rounding provider.
    pub fn provider_names(&self) -> BTreeSet<String> {
        self.resolver.provider_names()
    }

    /// Chain used when no providers are named.
    pub fn default_chain(&self) -> Vec<String> {
        self.resolver.default_chain()
    }
}

impl std::fmt::Debug for Roundings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Roundings")
            .field("resolver", &self.resolver.implementation())
            .finish()
    }
}

fn currency_query(currency: &CurrencyUnit, providers: &[&str]) -> RoundingQuery {
    RoundingQuery::builder()
        .currency(currency.clone())
        .provider_names(providers.iter().copied())
        .build()
}

fn named_query(name: &str, providers: &[&str]) -> RoundingQuery {
    RoundingQuery::builder()
        .rounding_name(name)
        .provider_names(providers.iter().copied())
        .build()
}

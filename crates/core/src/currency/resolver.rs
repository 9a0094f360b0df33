use std::collections::BTreeSet;
use std::sync::Arc;

use indexmap::IndexSet;

use coinage_shared::types::CurrencyUnit;

use crate::bootstrap::Registry;
use crate::query::{CurrencyQuery, NameMatch, default_chain};
use crate::resolve;
use crate::spi::{CurrencyProvider, Provider, Service};

/// Resolves currency queries against the deployed currency providers.
pub trait CurrencyResolver: Service {
    /// Units returned by every provider in the effective chain, deduplicated,
    /// in chain order. Units a provider leaves unattributed carry that
    /// provider's name.
    fn currencies(&self, query: &CurrencyQuery) -> IndexSet<CurrencyUnit>;

    /// Names of every discovered currency provider.
    fn provider_names(&self) -> BTreeSet<String>;

    /// Chain used when a query names no providers.
    fn default_chain(&self) -> Vec<String>;
}

/// Resolver used when no [`CurrencyResolver`] is deployed.
#[derive(Debug, Clone)]
pub struct DefaultCurrencyResolver {
    registry: Arc<Registry>,
}

impl DefaultCurrencyResolver {
    /// Creates a resolver backed by `registry`.
    pub const fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    fn providers(&self) -> Vec<Arc<dyn CurrencyProvider>> {
        self.registry.resolve_all::<dyn CurrencyProvider>()
    }
}

impl Service for DefaultCurrencyResolver {}

impl CurrencyResolver for DefaultCurrencyResolver {
    fn currencies(&self, query: &CurrencyQuery) -> IndexSet<CurrencyUnit> {
        let providers = self.providers();
        let chain = resolve::chain_for(query, &providers);
        resolve::collect_in_chain(&providers, &chain, NameMatch::Exact, |provider| {
            let name = provider.provider_name().unwrap_or_default();
            let units = provider.currencies(query)?;
            Ok(units
                .into_iter()
                .map(|unit| {
                    if unit.provider().is_empty() {
                        unit.with_provider(name)
                    } else {
                        unit
                    }
                })
                .collect::<Vec<_>>())
        })
        .into_iter()
        .flatten()
        .collect()
    }

    fn provider_names(&self) -> BTreeSet<String> {
        resolve::provider_names(&self.providers())
    }

    fn default_chain(&self) -> Vec<String> {
        default_chain(self.provider_names())
    }
}

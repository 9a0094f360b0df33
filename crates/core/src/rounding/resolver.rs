use std::collections::BTreeSet;
use std::sync::Arc;

use coinage_shared::types::Rounding;

use crate::bootstrap::Registry;
use crate::query::{NameMatch, RoundingQuery, default_chain};
use crate::resolve;
use crate::spi::{RoundingProvider, Service};

/// Resolves rounding queries against the deployed rounding providers.
pub trait RoundingResolver: Service {
    /// Roundings from every provider in the effective chain, in chain order.
    fn roundings(&self, query: &RoundingQuery) -> Vec<Rounding>;

    /// Rounding names offered by `providers` (default chain if empty).
    ///
    /// Each entry matches a provider name exactly; an entry with no exact
    /// match is tried as a regular expression over the whole name.
    fn rounding_names(&self, providers: &[String]) -> BTreeSet<String>;

    /// Names of every discovered rounding provider.
    fn provider_names(&self) -> BTreeSet<String>;

    /// Chain used when a query names no providers.
    fn default_chain(&self) -> Vec<String>;

    /// Rounding to the currency's default fraction digits, half to even.
    fn default_rounding(&self) -> Rounding {
        Rounding::currency_default()
    }
}

/// Resolver used when no [`RoundingResolver`] is deployed.
#[derive(Debug, Clone)]
pub struct DefaultRoundingResolver {
    registry: Arc<Registry>,
}

impl DefaultRoundingResolver {
    /// Creates a resolver backed by `registry`.
    pub const fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    fn providers(&self) -> Vec<Arc<dyn RoundingProvider>> {
        self.registry.resolve_all::<dyn RoundingProvider>()
    }
}

impl Service for DefaultRoundingResolver {}

impl RoundingResolver for DefaultRoundingResolver {
    fn roundings(&self, query: &RoundingQuery) -> Vec<Rounding> {
        let providers = self.providers();
        let chain = resolve::chain_for(query, &providers);
        resolve::collect_in_chain(&providers, &chain, NameMatch::Exact, |provider| {
            provider.rounding(query)
        })
        .into_iter()
        .flatten()
        .collect()
    }

    fn rounding_names(&self, providers: &[String]) -> BTreeSet<String> {
        let discovered = self.providers();
        let chain = if providers.is_empty() {
            default_chain(resolve::provider_names(&discovered))
        } else {
            providers.to_vec()
        };
        resolve::collect_in_chain(&discovered, &chain, NameMatch::ExactThenPattern, |provider| {
            Ok(provider.rounding_names())
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

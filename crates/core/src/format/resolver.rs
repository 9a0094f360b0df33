use std::collections::BTreeSet;
use std::sync::Arc;

use coinage_shared::types::{AmountFormat, Locale};
use coinage_shared::{MonetaryError, MonetaryResult};

use crate::bootstrap::Registry;
use crate::query::{AmountFormatQuery, NameMatch, default_chain};
use crate::resolve;
use crate::spi::{AmountFormatProvider, Service};

/// Resolves amount format queries against the deployed format providers.
pub trait FormatResolver: Service {
    /// Formats from every provider in the effective chain, in chain order.
    fn amount_formats(&self, query: &AmountFormatQuery) -> Vec<AmountFormat>;

    /// Locales covered by `providers` (default chain if empty).
    ///
    /// # Errors
    ///
    /// [`MonetaryError::UnknownProvider`] for a name no provider declares.
    fn available_locales(&self, providers: &[String]) -> MonetaryResult<BTreeSet<Locale>>;

    /// Names of every discovered format provider.
    fn provider_names(&self) -> BTreeSet<String>;

    /// Chain used when a query names no providers.
    fn default_chain(&self) -> Vec<String>;
}

/// Resolver used when no [`FormatResolver`] is deployed.
#[derive(Debug, Clone)]
pub struct DefaultFormatResolver {
    registry: Arc<Registry>,
}

impl DefaultFormatResolver {
    /// Creates a resolver backed by `registry`.
    pub const fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    fn providers(&self) -> Vec<Arc<dyn AmountFormatProvider>> {
        self.registry.resolve_all::<dyn AmountFormatProvider>()
    }
}

impl Service for DefaultFormatResolver {}

impl FormatResolver for DefaultFormatResolver {
    fn amount_formats(&self, query: &AmountFormatQuery) -> Vec<AmountFormat> {
        let providers = self.providers();
        let chain = resolve::chain_for(query, &providers);
        resolve::collect_in_chain(&providers, &chain, NameMatch::Exact, |provider| {
            provider.amount_formats(query)
        })
        .into_iter()
        .flatten()
        .collect()
    }

    fn available_locales(&self, providers: &[String]) -> MonetaryResult<BTreeSet<Locale>> {
        let discovered = self.providers();
        let chain = if providers.is_empty() {
            default_chain(resolve::provider_names(&discovered))
        } else {
            providers.to_vec()
        };

        let named = resolve::named(&discovered);
        let mut locales = BTreeSet::new();
        for name in &chain {
            let selected = NameMatch::Exact.select(&named, name, |(name, _)| name.as_deref());
            if selected.is_empty() {
                return Err(MonetaryError::UnknownProvider { name: name.clone() });
            }
            for (_, provider) in selected {
                if let Some(found) =
                    resolve::isolate("available_locales", name, || Ok(provider.available_locales()))
                {
                    locales.extend(found);
                }
            }
        }
        Ok(locales)
    }

    fn provider_names(&self) -> BTreeSet<String> {
        resolve::provider_names(&self.providers())
    }

    fn default_chain(&self) -> Vec<String> {
        default_chain(self.provider_names())
    }
}

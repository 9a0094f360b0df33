use std::collections::BTreeSet;
use std::sync::Arc;

use coinage_shared::{MonetaryError, MonetaryResult};

use super::CompoundRateProvider;
use crate::bootstrap::Registry;
use crate::query::{ConversionQuery, NameMatch, default_chain};
use crate::resolve;
use crate::spi::{ExchangeRateProvider, Service};

/// Resolves conversion queries into rate providers.
pub trait ConversionResolver: Service {
    /// Names of every discovered rate provider.
    fn provider_names(&self) -> BTreeSet<String>;

    /// Chain used when a query names no providers.
    fn default_chain(&self) -> Vec<String>;

    /// Providers named by `providers`, in that order (default chain if empty).
    ///
    /// # Errors
    ///
    /// [`MonetaryError::UnknownProvider`] for a name no provider declares.
    fn exchange_rate_providers(
        &self,
        providers: &[String],
    ) -> MonetaryResult<Vec<Arc<dyn ExchangeRateProvider>>>;

    /// The provider answering `query`: a [`CompoundRateProvider`] over its
    /// chain, including a single-member chain.
    ///
    /// # Errors
    ///
    /// [`MonetaryError::UnknownProvider`] for an unknown chain entry,
    /// [`MonetaryError::InvalidQuery`] if the chain is empty.
    fn exchange_rate_provider(
        &self,
        query: &ConversionQuery,
    ) -> MonetaryResult<Arc<dyn ExchangeRateProvider>> {
        let members = self.exchange_rate_providers(query.provider_names())?;
        if members.is_empty() {
            return Err(MonetaryError::InvalidQuery(
                "no exchange rate providers available".to_string(),
            ));
        }
        Ok(Arc::new(CompoundRateProvider::new(members)))
    }
}

/// Resolver used when no [`ConversionResolver`] is deployed.
#[derive(Debug, Clone)]
pub struct DefaultConversionResolver {
    registry: Arc<Registry>,
}

impl DefaultConversionResolver {
    /// Creates a resolver backed by `registry`.
    pub const fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    fn providers(&self) -> Vec<Arc<dyn ExchangeRateProvider>> {
        self.registry.resolve_all::<dyn ExchangeRateProvider>()
    }
}

impl Service for DefaultConversionResolver {}

impl ConversionResolver for DefaultConversionResolver {
    fn provider_names(&self) -> BTreeSet<String> {
        resolve::provider_names(&self.providers())
    }

    fn default_chain(&self) -> Vec<String> {
        default_chain(self.provider_names())
    }

    fn exchange_rate_providers(
        &self,
        providers: &[String],
    ) -> MonetaryResult<Vec<Arc<dyn ExchangeRateProvider>>> {
        let discovered = self.providers();
        let chain = if providers.is_empty() {
            default_chain(resolve::provider_names(&discovered))
        } else {
            providers.to_vec()
        };

        let named = resolve::named(&discovered);
        let mut members = Vec::with_capacity(chain.len());
        for name in &chain {
            let selected = NameMatch::Exact.select(&named, name, |(name, _)| name.as_deref());
            if selected.is_empty() {
                return Err(MonetaryError::UnknownProvider { name: name.clone() });
            }
            members.extend(selected.into_iter().map(|(_, provider)| Arc::clone(provider)));
        }
        tracing::debug!(?chain, "Resolved exchange rate providers");
        Ok(members)
    }
}

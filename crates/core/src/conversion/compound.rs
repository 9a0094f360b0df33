use std::collections::BTreeSet;
use std::sync::Arc;

use coinage_shared::types::{ExchangeRate, ProviderContext};
use coinage_shared::{MonetaryError, MonetaryResult};

use crate::query::ConversionQuery;
use crate::resolve;
use crate::spi::{ExchangeRateProvider, Provider, Service};

/// Chains several rate providers; the first one with a rate wins.
pub struct CompoundRateProvider {
    name: String,
    members: Vec<(String, Arc<dyn ExchangeRateProvider>)>,
}

impl CompoundRateProvider {
    /// Combines `members`, asked in the given order.
    pub fn new(members: Vec<Arc<dyn ExchangeRateProvider>>) -> Self {
        let members: Vec<_> = members
            .into_iter()
            .map(|member| (resolve::declared_name(&*member).unwrap_or_default(), member))
            .collect();
        let name = members
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(",");
        Self { name, members }
    }
}

impl Service for CompoundRateProvider {}

impl Provider for CompoundRateProvider {
    fn provider_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl ExchangeRateProvider for CompoundRateProvider {
    fn provider_context(&self) -> ProviderContext {
        let rate_types: BTreeSet<_> = self
            .members
            .iter()
            .filter_map(|(name, member)| {
                resolve::isolate("provider_context", name, || Ok(member.provider_context()))
            })
            .flat_map(|context| context.rate_types)
            .collect();
        ProviderContext::new(self.name.clone(), rate_types)
    }

    fn exchange_rate(&self, query: &ConversionQuery) -> MonetaryResult<ExchangeRate> {
        let criteria = query.criteria();
        let (Some(base), Some(term)) = (&criteria.base, &criteria.term) else {
            return Err(MonetaryError::InvalidQuery(
                "base and term currencies are required".to_string(),
            ));
        };

        for (name, member) in &self.members {
            let name = name.as_str();
            match resolve::call_guarded(name, || member.exchange_rate(query)) {
                Ok(rate) => return Ok(rate),
                Err(err) if err.is_not_found() => {
                    tracing::debug!(provider = name, base = base.code(), term = term.code(), "No rate, trying next provider");
                }
                Err(err) => {
                    tracing::error!(provider = name, error = %err, "Rate provider failed, skipping");
                }
            }
        }

        Err(MonetaryError::RateUnavailable {
            base: base.code().to_string(),
            term: term.code().to_string(),
            providers: self.name.clone(),
        })
    }
}

impl std::fmt::Debug for CompoundRateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompoundRateProvider")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

use std::collections::BTreeSet;

use coinage_shared::config::RatesConfig;
use coinage_shared::types::{ConversionContext, ExchangeRate, ProviderContext};
use coinage_shared::{MonetaryError, MonetaryResult};

use super::iso_unit;
use crate::query::ConversionQuery;
use crate::spi::{ExchangeRateProvider, Provider, Service};

/// Serves a fixed rate table, typically read from configuration.
///
/// A pair that is only configured in the opposite direction is answered with
/// the inverse rate.
#[derive(Debug, Clone)]
pub struct ConfiguredRateProvider {
    name: String,
    rates: Vec<ExchangeRate>,
}

impl ConfiguredRateProvider {
    /// Creates a provider serving `rates`.
    pub fn new(name: impl Into<String>, rates: Vec<ExchangeRate>) -> Self {
        Self {
            name: name.into(),
            rates,
        }
    }

    /// Builds the provider from the `rates` configuration section.
    pub fn from_config(config: &RatesConfig) -> Self {
        let rates = config
            .entries
            .iter()
            .map(|entry| {
                let rate = ExchangeRate::new(
                    iso_unit(&entry.base),
                    iso_unit(&entry.term),
                    entry.factor,
                    ConversionContext::of(config.provider.clone(), entry.rate_type),
                );
                match entry.effective_date {
                    Some(date) => rate.effective_on(date),
                    None => rate,
                }
            })
            .collect();
        Self::new(config.provider.clone(), rates)
    }

    /// Number of configured rates.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// True if no rates are configured.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Service for ConfiguredRateProvider {}

impl Provider for ConfiguredRateProvider {
    fn provider_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl ExchangeRateProvider for ConfiguredRateProvider {
    fn provider_context(&self) -> ProviderContext {
        let rate_types: BTreeSet<_> = self.rates.iter().map(|rate| rate.context.rate_type).collect();
        ProviderContext::new(self.name.clone(), rate_types)
    }

    fn exchange_rate(&self, query: &ConversionQuery) -> MonetaryResult<ExchangeRate> {
        let criteria = query.criteria();
        let (Some(base), Some(term)) = (&criteria.base, &criteria.term) else {
            return Err(MonetaryError::InvalidQuery(
                "base and term currencies are required".to_string(),
            ));
        };

        let accepted = |rate: &&ExchangeRate| criteria.accepts(rate.context.rate_type);
        let direct = self
            .rates
            .iter()
            .filter(accepted)
            .find(|rate| rate.base.code() == base.code() && rate.term.code() == term.code());
        if let Some(rate) = direct {
            return Ok(rate.clone());
        }

        self.rates
            .iter()
            .filter(accepted)
            .find(|rate| rate.base.code() == term.code() && rate.term.code() == base.code())
            .and_then(ExchangeRate::inverse)
            .ok_or_else(|| MonetaryError::RateUnavailable {
                base: base.code().to_string(),
                term: term.code().to_string(),
                providers: self.name.clone(),
            })
    }
}

use std::collections::BTreeSet;
use std::sync::Arc;

use rust_decimal::Decimal;

use coinage_shared::types::{ConversionContext, CurrencyUnit, ExchangeRate, Money};
use coinage_shared::{MonetaryError, MonetaryResult};

use super::{ConversionResolver, DefaultConversionResolver};
use crate::bootstrap::Registry;
use crate::query::ConversionQuery;
use crate::spi::{ExchangeRateProvider, Provider, Service};

/// Entry point for exchange rates and conversions.
#[derive(Clone)]
pub struct Conversions {
    resolver: Arc<dyn ConversionResolver>,
}

impl Conversions {
    /// Uses the [`ConversionResolver`] deployed in `registry`, or the default one.
    pub fn new(registry: &Arc<Registry>) -> Self {
        let resolver = registry
            .resolve_one::<dyn ConversionResolver>()
            .unwrap_or_else(|| Arc::new(DefaultConversionResolver::new(Arc::clone(registry))));
        Self { resolver }
    }

    /// Uses an explicit resolver.
    pub fn with_resolver(resolver: Arc<dyn ConversionResolver>) -> Self {
        Self { resolver }
    }

    /// Backed by the process-wide registry.
    pub fn global() -> Self {
        Self::new(&Registry::global())
    }

    /// The rate provider for `query`'s chain.
    pub fn exchange_rate_provider(&self, query: &ConversionQuery) -> MonetaryResult<Arc<dyn ExchangeRateProvider>> {
        self.resolver.exchange_rate_provider(query)
    }

    /// The rate provider for an explicit chain (default chain if empty).
    pub fn exchange_rate_provider_named(&self, providers: &[&str]) -> MonetaryResult<Arc<dyn ExchangeRateProvider>> {
        self.exchange_rate_provider(&chain_query(providers))
    }

    /// The individual providers of a chain, in chain order.
    pub fn exchange_rate_providers(&self, providers: &[&str]) -> MonetaryResult<Vec<Arc<dyn ExchangeRateProvider>>> {
        let providers: Vec<String> = providers.iter().map(|p| (*p).to_string()).collect();
        self.resolver.exchange_rate_providers(&providers)
    }

    /// Whether every named provider is deployed.
    pub fn is_exchange_rate_provider_available(&self, providers: &[&str]) -> bool {
        self.exchange_rate_providers(providers)
            .is_ok_and(|providers| !providers.is_empty())
    }

    /// Rate from `base` to `term`.
    pub fn exchange_rate(
        &self,
        base: &CurrencyUnit,
        term: &CurrencyUnit,
        providers: &[&str],
    ) -> MonetaryResult<ExchangeRate> {
        self.conversion_to(term, providers)?.exchange_rate(base)
    }

    /// A conversion into `query`'s term currency.
    ///
    /// # Errors
    ///
    /// [`MonetaryError::InvalidQuery`] without a term currency, plus whatever
    /// [`exchange_rate_provider`](Self::exchange_rate_provider) reports.
    pub fn conversion(&self, query: &ConversionQuery) -> MonetaryResult<CurrencyConversion> {
        let term = query
            .criteria()
            .term
            .clone()
            .ok_or_else(|| MonetaryError::InvalidQuery("term currency is required".to_string()))?;
        let provider = self.exchange_rate_provider(query)?;
        Ok(CurrencyConversion {
            term,
            query: query.clone(),
            provider,
        })
    }

    /// A conversion into `term`.
    pub fn conversion_to(&self, term: &CurrencyUnit, providers: &[&str]) -> MonetaryResult<CurrencyConversion> {
        let query = ConversionQuery::builder()
            .term_currency(term.clone())
            .provider_names(providers.iter().copied())
            .build();
        self.conversion(&query)
    }

    /// Whether `query` can be converted. With a base currency set, a rate
    /// must actually be available.
    pub fn is_conversion_available(&self, query: &ConversionQuery) -> bool {
        let Ok(conversion) = self.conversion(query) else {
            return false;
        };
        query
            .criteria()
            .base
            .as_ref()
            .is_none_or(|base| conversion.exchange_rate(base).is_ok())
    }

    /// Names of every discovered rate provider.
    pub fn provider_names(&self) -> BTreeSet<String> {
        self.resolver.provider_names()
    }

    /// Chain used when no providers are named.
    pub fn default_chain(&self) -> Vec<String> {
        self.resolver.default_chain()
    }
}

impl std::fmt::Debug for Conversions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversions")
            .field("resolver", &self.resolver.implementation())
            .finish()
    }
}

fn chain_query(providers: &[&str]) -> ConversionQuery {
    ConversionQuery::builder()
        .provider_names(providers.iter().copied())
        .build()
}

/// Converts amounts into a fixed term currency.
#[derive(Clone)]
pub struct CurrencyConversion {
    term: CurrencyUnit,
    query: ConversionQuery,
    provider: Arc<dyn ExchangeRateProvider>,
}

impl CurrencyConversion {
    /// Target currency.
    pub const fn term_currency(&self) -> &CurrencyUnit {
        &self.term
    }

    /// The rate provider in use.
    pub fn provider(&self) -> &Arc<dyn ExchangeRateProvider> {
        &self.provider
    }

    /// Describes this conversion.
    pub fn context(&self) -> ConversionContext {
        let mut context = ConversionContext::any();
        let rate_types = &self.query.criteria().rate_types;
        if rate_types.len() == 1
            && let Some(only) = rate_types.iter().next()
        {
            context.rate_type = *only;
        }
        context.provider = self.provider.provider_name().map(str::to_owned);
        context.attributes.clone_from(self.query.attributes());
        context
    }

    /// Rate from `base` into the term currency. Same-code pairs get factor 1.
    pub fn exchange_rate(&self, base: &CurrencyUnit) -> MonetaryResult<ExchangeRate> {
        if base.code() == self.term.code() {
            return Ok(ExchangeRate::new(
                base.clone(),
                self.term.clone(),
                Decimal::ONE,
                self.context(),
            ));
        }
        let query = self
            .query
            .to_builder()
            .base_currency(base.clone())
            .term_currency(self.term.clone())
            .build();
        self.provider.exchange_rate(&query)
    }

    /// Converts `amount`, rounding half to even to the term currency's digits.
    pub fn apply(&self, amount: &Money) -> MonetaryResult<Money> {
        Ok(self.exchange_rate(&amount.currency)?.convert(amount))
    }
}

impl std::fmt::Debug for CurrencyConversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrencyConversion")
            .field("term", &self.term)
            .field("provider", &self.provider.provider_name())
            .finish_non_exhaustive()
    }
}

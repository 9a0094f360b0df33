use rust_decimal::Decimal;

use coinage_shared::types::{ConversionContext, ExchangeRate, ProviderContext, RateType};
use coinage_shared::{MonetaryError, MonetaryResult};

use crate::query::ConversionQuery;
use crate::spi::{ExchangeRateProvider, Provider, Service};

const NAME: &str = "identity";

/// Factor 1 between a currency and itself; nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityRateProvider;

impl Service for IdentityRateProvider {}

impl Provider for IdentityRateProvider {
    fn provider_name(&self) -> Option<&str> {
        Some(NAME)
    }
}

impl ExchangeRateProvider for IdentityRateProvider {
    fn provider_context(&self) -> ProviderContext {
        ProviderContext::new(NAME, [RateType::Other])
    }

    fn exchange_rate(&self, query: &ConversionQuery) -> MonetaryResult<ExchangeRate> {
        let criteria = query.criteria();
        let (Some(base), Some(term)) = (&criteria.base, &criteria.term) else {
            return Err(MonetaryError::InvalidQuery(
                "base and term currencies are required".to_string(),
            ));
        };
        if base.code() != term.code() || !criteria.accepts(RateType::Other) {
            return Err(MonetaryError::RateUnavailable {
                base: base.code().to_string(),
                term: term.code().to_string(),
                providers: NAME.to_string(),
            });
        }
        Ok(ExchangeRate::new(
            base.clone(),
            term.clone(),
            Decimal::ONE,
            ConversionContext::of(NAME, RateType::Other),
        ))
    }
}

use std::collections::BTreeSet;

use coinage_shared::MonetaryResult;
use coinage_shared::types::{Rounding, RoundingContext, RoundingMode, RoundingScale};

use crate::query::RoundingQuery;
use crate::spi::{Provider, RoundingProvider, Service};

const NAME: &str = "default";
const NAMED_DEFAULT_SCALE: u32 = 2;

/// Currency roundings plus the named roundings `bankers`, `half-up` and `default`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRoundingProvider;

impl Service for DefaultRoundingProvider {}

impl Provider for DefaultRoundingProvider {
    fn provider_name(&self) -> Option<&str> {
        Some(NAME)
    }
}

impl RoundingProvider for DefaultRoundingProvider {
    fn rounding(&self, query: &RoundingQuery) -> MonetaryResult<Option<Rounding>> {
        let criteria = query.criteria();

        if let Some(name) = criteria.rounding_name.as_deref() {
            let mode = match name {
                "bankers" => RoundingMode::HalfEven,
                "half-up" => RoundingMode::HalfUp,
                "default" => return Ok(Some(Rounding::currency_default())),
                _ => return Ok(None),
            };
            let scale = criteria.scale.unwrap_or(NAMED_DEFAULT_SCALE);
            return Ok(Some(Rounding::new(
                RoundingContext::new(NAME, name),
                RoundingScale::Fixed(scale),
                mode,
            )));
        }

        if let Some(currency) = &criteria.currency {
            let mut context = RoundingContext::new(NAME, currency.code());
            context.currency = Some(currency.clone());
            let scale = criteria.scale.unwrap_or(currency.default_fraction_digits());
            return Ok(Some(Rounding::new(
                context,
                RoundingScale::Fixed(scale),
                RoundingMode::HalfEven,
            )));
        }

        Ok(criteria.scale.map(|scale| {
            Rounding::new(
                RoundingContext::new(NAME, format!("scale-{scale}")),
                RoundingScale::Fixed(scale),
                RoundingMode::HalfEven,
            )
        }))
    }

    fn rounding_names(&self) -> BTreeSet<String> {
        ["bankers", "default", "half-up"].into_iter().map(String::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinage_shared::types::{CurrencyUnit, Money};
    use rust_decimal_macros::dec;

    fn rounding(query: &RoundingQuery) -> Option<Rounding> {
        DefaultRoundingProvider.rounding(query).unwrap()
    }

    #[test]
    fn test_currency_rounding_uses_fraction_digits() {
        let jpy = CurrencyUnit::new("JPY", 0);
        let query = RoundingQuery::builder().currency(jpy.clone()).build();
        let rounding = rounding(&query).unwrap();
        assert_eq!(rounding.context.currency.as_ref(), Some(&jpy));
        assert_eq!(rounding.apply(&Money::new(dec!(1234.5), jpy)).amount, dec!(1234));
    }

    #[test]
    fn test_named_roundings() {
        let usd = CurrencyUnit::new("USD", 2);
        let half_up = rounding(&RoundingQuery::builder().rounding_name("half-up").build()).unwrap();
        assert_eq!(half_up.apply(&Money::new(dec!(0.125), usd.clone())).amount, dec!(0.13));

        let bankers = rounding(&RoundingQuery::builder().rounding_name("bankers").scale(1).build()).unwrap();
        assert_eq!(bankers.apply(&Money::new(dec!(0.25), usd)).amount, dec!(0.2));
    }

    #[test]
    fn test_unknown_name_and_empty_query() {
        assert!(rounding(&RoundingQuery::builder().rounding_name("cash").build()).is_none());
        assert!(rounding(&RoundingQuery::builder().build()).is_none());
    }
}

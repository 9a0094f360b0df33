//! Exchange rate types and conversion contexts.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::{Attributes, CurrencyUnit, Money};

/// Classification of a rate by its temporal semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateType {
    /// Rate valid for a past point in time.
    Historic,
    /// Current market rate.
    Realtime,
    /// Rate published with a delay.
    Deferred,
    /// Anything not covered above (fixed, configured, synthetic).
    Other,
    /// Wildcard used in queries.
    Any,
}

impl std::fmt::Display for RateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Historic => write!(f, "historic"),
            Self::Realtime => write!(f, "realtime"),
            Self::Deferred => write!(f, "deferred"),
            Self::Other => write!(f, "other"),
            Self::Any => write!(f, "any"),
        }
    }
}

impl std::str::FromStr for RateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "historic" => Ok(Self::Historic),
            "realtime" => Ok(Self::Realtime),
            "deferred" => Ok(Self::Deferred),
            "other" => Ok(Self::Other),
            "any" => Ok(Self::Any),
            _ => Err(format!("Unknown rate type: {s}")),
        }
    }
}

/// Static description of an exchange rate provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderContext {
    /// Provider name.
    pub provider: String,
    /// Rate types the provider can supply.
    pub rate_types: BTreeSet<RateType>,
    /// Provider-specific attributes.
    #[serde(default)]
    pub attributes: Attributes,
}

impl ProviderContext {
    /// Creates a provider context.
    pub fn new(provider: impl Into<String>, rate_types: impl IntoIterator<Item = RateType>) -> Self {
        Self {
            provider: provider.into(),
            rate_types: rate_types.into_iter().collect(),
            attributes: Attributes::new(),
        }
    }
}

/// Describes how a rate (or a conversion) was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionContext {
    /// Provider that supplied the rate, if known.
    pub provider: Option<String>,
    /// Rate type.
    pub rate_type: RateType,
    /// Provider-specific attributes.
    #[serde(default)]
    pub attributes: Attributes,
}

impl ConversionContext {
    /// Context for a rate supplied by a named provider.
    pub fn of(provider: impl Into<String>, rate_type: RateType) -> Self {
        Self {
            provider: Some(provider.into()),
            rate_type,
            attributes: Attributes::new(),
        }
    }

    /// Unattributed context accepting any rate type.
    #[must_use]
    pub fn any() -> Self {
        Self {
            provider: None,
            rate_type: RateType::Any,
            attributes: Attributes::new(),
        }
    }
}

/// Exchange rate between two currencies (1 base = factor term).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Base currency.
    pub base: CurrencyUnit,
    /// Term currency.
    pub term: CurrencyUnit,
    /// Conversion factor.
    pub factor: Decimal,
    /// Where the rate came from.
    pub context: ConversionContext,
    /// Date this rate is effective, if dated.
    pub effective_date: Option<NaiveDate>,
}

impl ExchangeRate {
    /// Creates a new exchange rate.
    #[must_use]
    pub const fn new(
        base: CurrencyUnit,
        term: CurrencyUnit,
        factor: Decimal,
        context: ConversionContext,
    ) -> Self {
        Self {
            base,
            term,
            factor,
            context,
            effective_date: None,
        }
    }

    /// Sets the effective date.
    #[must_use]
    pub fn effective_on(mut self, date: NaiveDate) -> Self {
        self.effective_date = Some(date);
        self
    }

    /// Returns the inverse rate, or `None` for a zero factor.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        let factor = Decimal::ONE.checked_div(self.factor)?;
        Some(Self {
            base: self.term.clone(),
            term: self.base.clone(),
            factor,
            context: self.context.clone(),
            effective_date: self.effective_date,
        })
    }

    /// Converts an amount of the base currency into the term currency.
    ///
    /// Uses banker's rounding (round half to even) to the term currency's
    /// default fraction digits to minimize cumulative errors.
    #[must_use]
    pub fn convert(&self, amount: &Money) -> Money {
        let converted = (amount.amount * self.factor).round_dp_with_strategy(
            self.term.default_fraction_digits(),
            RoundingStrategy::MidpointNearestEven,
        );
        Money::new(converted, self.term.clone())
    }
}

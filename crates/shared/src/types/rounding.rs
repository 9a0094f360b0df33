//! Rounding operators returned by rounding providers.

use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};

use super::{Attributes, CurrencyUnit, Money};

/// Midpoint / direction policy of a rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingMode {
    /// Banker's rounding: 2.5 -> 2, 3.5 -> 4.
    HalfEven,
    /// Midpoint away from zero: 2.5 -> 3.
    HalfUp,
    /// Midpoint toward zero: 2.5 -> 2.
    HalfDown,
    /// Always away from zero.
    Up,
    /// Always toward zero (truncation).
    Down,
    /// Toward positive infinity.
    Ceiling,
    /// Toward negative infinity.
    Floor,
}

impl RoundingMode {
    /// The equivalent `rust_decimal` strategy.
    #[must_use]
    pub const fn strategy(self) -> RoundingStrategy {
        match self {
            Self::HalfEven => RoundingStrategy::MidpointNearestEven,
            Self::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Self::HalfDown => RoundingStrategy::MidpointTowardZero,
            Self::Up => RoundingStrategy::AwayFromZero,
            Self::Down => RoundingStrategy::ToZero,
            Self::Ceiling => RoundingStrategy::ToPositiveInfinity,
            Self::Floor => RoundingStrategy::ToNegativeInfinity,
        }
    }
}

/// Number of decimal places a rounding produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundingScale {
    /// Use the default fraction digits of the amount's currency.
    CurrencyDefault,
    /// Use a fixed number of decimal places.
    Fixed(u32),
}

/// Identifies a rounding and the provider that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingContext {
    /// Provider name.
    pub provider: String,
    /// Rounding name (e.g. "default", "bankers").
    pub rounding_name: String,
    /// Currency this rounding was made for, if currency specific.
    pub currency: Option<CurrencyUnit>,
    /// Provider-specific attributes.
    #[serde(default)]
    pub attributes: Attributes,
}

impl RoundingContext {
    /// Creates a context for a named rounding.
    pub fn new(provider: impl Into<String>, rounding_name: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            rounding_name: rounding_name.into(),
            currency: None,
            attributes: Attributes::new(),
        }
    }
}

/// A rounding operator applicable to money amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rounding {
    /// Where this rounding came from.
    pub context: RoundingContext,
    /// Target scale.
    pub scale: RoundingScale,
    /// Rounding policy.
    pub mode: RoundingMode,
}

impl Rounding {
    /// Creates a rounding.
    #[must_use]
    pub const fn new(context: RoundingContext, scale: RoundingScale, mode: RoundingMode) -> Self {
        Self {
            context,
            scale,
            mode,
        }
    }

    /// The process-wide default: currency digits with banker's rounding.
    #[must_use]
    pub fn currency_default() -> Self {
        Self::new(
            RoundingContext::new("default", "default"),
            RoundingScale::CurrencyDefault,
            RoundingMode::HalfEven,
        )
    }

    /// Applies the rounding to an amount.
    #[must_use]
    pub fn apply(&self, money: &Money) -> Money {
        let dp = match self.scale {
            RoundingScale::CurrencyDefault => money.currency.default_fraction_digits(),
            RoundingScale::Fixed(dp) => dp,
        };
        money.with_amount(
            money
                .amount
                .round_dp_with_strategy(dp, self.mode.strategy()),
        )
    }
}

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use coinage_shared::types::{
    AmountFormatContext, ConversionContext, CurrencyUnit, Locale, ProviderContext, RateType,
    RoundingContext,
};

use super::{Criteria, QueryBuilder};

/// Currency selection criteria. Empty criteria select every unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyCriteria {
    /// Alphabetic codes.
    pub codes: Vec<String>,
    /// Countries (by locale) whose currencies are wanted.
    pub countries: Vec<Locale>,
    /// ISO numeric codes.
    pub numeric_codes: Vec<u16>,
}

impl CurrencyCriteria {
    /// True if no criterion is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty() && self.countries.is_empty() && self.numeric_codes.is_empty()
    }
}

impl Criteria for CurrencyCriteria {
    fn merge_from(&mut self, other: &Self) {
        if !other.codes.is_empty() {
            self.codes.clone_from(&other.codes);
        }
        if !other.countries.is_empty() {
            self.countries.clone_from(&other.countries);
        }
        if !other.numeric_codes.is_empty() {
            self.numeric_codes.clone_from(&other.numeric_codes);
        }
    }
}

impl QueryBuilder<CurrencyCriteria> {
    /// Sets the currency codes.
    #[must_use]
    pub fn currency_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.criteria_mut().codes = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the countries.
    #[must_use]
    pub fn countries(mut self, countries: impl IntoIterator<Item = Locale>) -> Self {
        self.criteria_mut().countries = countries.into_iter().collect();
        self
    }

    /// Sets the numeric codes.
    #[must_use]
    pub fn numeric_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.criteria_mut().numeric_codes = codes.into_iter().collect();
        self
    }
}

/// Rounding selection criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingCriteria {
    /// Named rounding.
    pub rounding_name: Option<String>,
    /// Currency the rounding is for.
    pub currency: Option<CurrencyUnit>,
    /// Requested scale.
    pub scale: Option<u32>,
}

impl Criteria for RoundingCriteria {
    fn merge_from(&mut self, other: &Self) {
        if other.rounding_name.is_some() {
            self.rounding_name.clone_from(&other.rounding_name);
        }
        if other.currency.is_some() {
            self.currency.clone_from(&other.currency);
        }
        if other.scale.is_some() {
            self.scale = other.scale;
        }
    }
}

impl QueryBuilder<RoundingCriteria> {
    /// Sets the rounding name.
    #[must_use]
    pub fn rounding_name(mut self, name: impl Into<String>) -> Self {
        self.criteria_mut().rounding_name = Some(name.into());
        self
    }

    /// Sets the currency.
    #[must_use]
    pub fn currency(mut self, currency: CurrencyUnit) -> Self {
        self.criteria_mut().currency = Some(currency);
        self
    }

    /// Sets the scale.
    #[must_use]
    pub fn scale(mut self, scale: u32) -> Self {
        self.criteria_mut().scale = Some(scale);
        self
    }

    /// Imports a resolved rounding's context for a follow-up lookup.
    #[must_use]
    pub fn import_context(mut self, context: &RoundingContext) -> Self {
        self.criteria_mut().rounding_name = Some(context.rounding_name.clone());
        if context.currency.is_some() {
            self.criteria_mut().currency.clone_from(&context.currency);
        }
        self.merge_attributes(&context.attributes);
        self.provider_name(context.provider.clone())
    }
}

/// Conversion selection criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionCriteria {
    /// Base (source) currency.
    pub base: Option<CurrencyUnit>,
    /// Term (target) currency.
    pub term: Option<CurrencyUnit>,
    /// Acceptable rate types; empty accepts any.
    pub rate_types: BTreeSet<RateType>,
}

impl ConversionCriteria {
    /// Whether a rate of `rate_type` satisfies these criteria.
    #[must_use]
    pub fn accepts(&self, rate_type: RateType) -> bool {
        self.rate_types.is_empty()
            || self.rate_types.contains(&RateType::Any)
            || self.rate_types.contains(&rate_type)
    }
}

impl Criteria for ConversionCriteria {
    fn merge_from(&mut self, other: &Self) {
        if other.base.is_some() {
            self.base.clone_from(&other.base);
        }
        if other.term.is_some() {
            self.term.clone_from(&other.term);
        }
        if !other.rate_types.is_empty() {
            self.rate_types.clone_from(&other.rate_types);
        }
    }
}

impl QueryBuilder<ConversionCriteria> {
    /// Sets the base currency.
    #[must_use]
    pub fn base_currency(mut self, currency: CurrencyUnit) -> Self {
        self.criteria_mut().base = Some(currency);
        self
    }

    /// Sets the term currency.
    #[must_use]
    pub fn term_currency(mut self, currency: CurrencyUnit) -> Self {
        self.criteria_mut().term = Some(currency);
        self
    }

    /// Sets the acceptable rate types.
    #[must_use]
    pub fn rate_types(mut self, rate_types: impl IntoIterator<Item = RateType>) -> Self {
        self.criteria_mut().rate_types = rate_types.into_iter().collect();
        self
    }

    /// Imports a conversion context (e.g. from a resolved rate).
    #[must_use]
    pub fn import_context(mut self, context: &ConversionContext) -> Self {
        self.criteria_mut().rate_types = BTreeSet::from([context.rate_type]);
        self.merge_attributes(&context.attributes);
        match &context.provider {
            Some(provider) => self.provider_names([provider.clone()]),
            None => self,
        }
    }

    /// Restricts the query to a provider and the rate types it declares.
    #[must_use]
    pub fn import_provider_context(mut self, context: &ProviderContext) -> Self {
        self.criteria_mut().rate_types.clone_from(&context.rate_types);
        self.merge_attributes(&context.attributes);
        self.provider_names([context.provider.clone()])
    }
}

/// Amount format selection criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatCriteria {
    /// Target locale.
    pub locale: Option<Locale>,
    /// Named format.
    pub format_name: Option<String>,
}

impl Criteria for FormatCriteria {
    fn merge_from(&mut self, other: &Self) {
        if other.locale.is_some() {
            self.locale.clone_from(&other.locale);
        }
        if other.format_name.is_some() {
            self.format_name.clone_from(&other.format_name);
        }
    }
}

impl QueryBuilder<FormatCriteria> {
    /// Sets the locale.
    #[must_use]
    pub fn locale(mut self, locale: Locale) -> Self {
        self.criteria_mut().locale = Some(locale);
        self
    }

    /// Sets the format name.
    #[must_use]
    pub fn format_name(mut self, name: impl Into<String>) -> Self {
        self.criteria_mut().format_name = Some(name.into());
        self
    }

    /// Imports a resolved format's context for a follow-up lookup.
    #[must_use]
    pub fn import_context(mut self, context: &AmountFormatContext) -> Self {
        self.criteria_mut().format_name = Some(context.format_name.clone());
        if context.locale.is_some() {
            self.criteria_mut().locale.clone_from(&context.locale);
        }
        self.merge_attributes(&context.attributes);
        self.provider_names([context.provider.clone()])
    }
}

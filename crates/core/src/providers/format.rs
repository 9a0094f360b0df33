use std::collections::BTreeSet;

use coinage_shared::MonetaryResult;
use coinage_shared::types::{
    AmountFormat, AmountFormatContext, AmountFormatStyle, CurrencyPlacement, Locale,
};

use crate::query::AmountFormatQuery;
use crate::spi::{AmountFormatProvider, Provider, Service};

const NAME: &str = "default";
const FORMAT_NAME: &str = "default";

/// (language, country, placement, grouping, decimal)
const STYLES: &[(&str, Option<&str>, CurrencyPlacement, char, char)] = &[
    ("de", None, CurrencyPlacement::Suffix, '.', ','),
    ("de", Some("CH"), CurrencyPlacement::Prefix, '\'', '.'),
    ("en", None, CurrencyPlacement::Prefix, ',', '.'),
    ("fr", None, CurrencyPlacement::Suffix, ' ', ','),
];

/// One `"{code} {amount}"` style format for any locale, with separators
/// adjusted for a few well-known locales.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatProvider;

impl DefaultFormatProvider {
    fn style_for(locale: Option<&Locale>) -> AmountFormatStyle {
        let Some(locale) = locale else {
            return AmountFormatStyle::default();
        };
        let exact = STYLES
            .iter()
            .find(|(language, country, ..)| *language == locale.language() && *country == locale.country());
        let by_language = || {
            STYLES
                .iter()
                .find(|(language, country, ..)| *language == locale.language() && country.is_none())
        };
        exact.or_else(by_language).map_or_else(
            AmountFormatStyle::default,
            |&(_, _, placement, grouping, decimal)| AmountFormatStyle {
                placement,
                grouping_separator: Some(grouping),
                decimal_separator: decimal,
            },
        )
    }
}

impl Service for DefaultFormatProvider {}

impl Provider for DefaultFormatProvider {
    fn provider_name(&self) -> Option<&str> {
        Some(NAME)
    }
}

impl AmountFormatProvider for DefaultFormatProvider {
    fn amount_formats(&self, query: &AmountFormatQuery) -> MonetaryResult<Vec<AmountFormat>> {
        let criteria = query.criteria();
        if criteria.format_name.as_deref().is_some_and(|name| name != FORMAT_NAME) {
            return Ok(Vec::new());
        }
        let mut context = AmountFormatContext::new(NAME, FORMAT_NAME);
        context.locale.clone_from(&criteria.locale);
        let style = Self::style_for(criteria.locale.as_ref());
        Ok(vec![AmountFormat::new(context, style)])
    }

    fn available_locales(&self) -> BTreeSet<Locale> {
        STYLES
            .iter()
            .map(|&(language, country, ..)| Locale::new(language, country))
            .collect()
    }
}

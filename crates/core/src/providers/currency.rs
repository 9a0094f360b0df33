use coinage_shared::MonetaryResult;
use coinage_shared::types::CurrencyUnit;

use crate::query::{CurrencyCriteria, CurrencyQuery};
use crate::spi::{CurrencyProvider, Provider, Service};

const NAME: &str = "default";

/// (code, numeric code, fraction digits, countries)
type IsoEntry = (&'static str, u16, u32, &'static [&'static str]);

const ISO_4217: &[IsoEntry] = &[
    ("USD", 840, 2, &["US", "EC", "SV", "PA"]),
    ("EUR", 978, 2, &["AT", "BE", "DE", "ES", "FI", "FR", "IE", "IT", "NL", "PT"]),
    ("IDR", 360, 2, &["ID"]),
    ("SGD", 702, 2, &["SG"]),
    ("JPY", 392, 0, &["JP"]),
    ("CHF", 756, 2, &["CH", "LI"]),
    ("GBP", 826, 2, &["GB"]),
];

/// Unattributed unit for an ISO code, falling back to two fraction digits for
/// codes outside the built-in table.
pub fn iso_unit(code: &str) -> CurrencyUnit {
    ISO_4217
        .iter()
        .find(|(iso, ..)| iso.eq_ignore_ascii_case(code))
        .map_or_else(
            || CurrencyUnit::new(code, 2),
            |&(iso, numeric, digits, _)| CurrencyUnit::new(iso, digits).with_numeric_code(numeric),
        )
}

/// Small ISO 4217 table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCurrencyProvider;

impl Service for DefaultCurrencyProvider {}

impl Provider for DefaultCurrencyProvider {
    fn provider_name(&self) -> Option<&str> {
        Some(NAME)
    }
}

impl CurrencyProvider for DefaultCurrencyProvider {
    fn currencies(&self, query: &CurrencyQuery) -> MonetaryResult<Vec<CurrencyUnit>> {
        let criteria = query.criteria();
        Ok(ISO_4217
            .iter()
            .filter(|entry| selects(criteria, entry))
            .map(|&(code, numeric, digits, _)| {
                CurrencyUnit::new(code, digits)
                    .with_numeric_code(numeric)
                    .with_provider(NAME)
            })
            .collect())
    }
}

fn selects(criteria: &CurrencyCriteria, &(code, numeric, _, countries): &IsoEntry) -> bool {
    criteria.is_empty()
        || criteria.codes.iter().any(|c| c.eq_ignore_ascii_case(code))
        || criteria.numeric_codes.contains(&numeric)
        || criteria
            .countries
            .iter()
            .any(|locale| locale.country().is_some_and(|c| countries.contains(&c)))
}

//! Integration tests for currency resolution through the `Currencies` facade.

mod common;

use std::sync::Arc;

use rstest::rstest;

use coinage_core::bootstrap::StaticDiscovery;
use coinage_core::{Currencies, CurrencyQuery, Registry};
use coinage_shared::MonetaryError;
use coinage_shared::types::Locale;

use common::{
    FailingCurrencies, PanickingCurrencies, StaticCurrencies, TonguelessCurrencies, count_logs,
    currency, registry_with,
};

fn builtin() -> Currencies {
    Currencies::new(&Arc::new(Registry::with_facility(StaticDiscovery::builtin())))
}

fn labels(units: impl IntoIterator<Item = coinage_shared::types::CurrencyUnit>) -> Vec<String> {
    units.into_iter().map(|unit| unit.to_string()).collect()
}

// ============================================================================
// Chains
// ============================================================================

#[test]
fn test_default_chain_is_sorted_and_deduplicated() {
    let currencies = Currencies::new(&registry_with(vec![
        currency(StaticCurrencies::new("zeta", &["USD"])),
        currency(StaticCurrencies::new("alpha", &["EUR"])),
        currency(StaticCurrencies::new("alpha", &["GBP"])),
    ]));

    assert_eq!(currencies.default_chain(), ["alpha", "zeta"]);
    assert_eq!(
        labels(currencies.all_currencies(&[])),
        ["EUR (alpha)", "GBP (alpha)", "USD (zeta)"]
    );
}

#[test]
fn test_explicit_chain_is_honored_verbatim() {
    let currencies = Currencies::new(&registry_with(vec![
        currency(StaticCurrencies::new("p1", &["USD", "EUR"])),
        currency(StaticCurrencies::new("p2", &["EUR", "JPY"])),
    ]));

    assert_eq!(
        labels(currencies.all_currencies(&["p2", "p1"])),
        ["EUR (p2)", "JPY (p2)", "USD (p1)", "EUR (p1)"]
    );
    assert_eq!(labels(currencies.all_currencies(&["p2"])), ["EUR (p2)", "JPY (p2)"]);
}

#[test]
fn test_chain_entry_without_provider_contributes_nothing() {
    let currencies = Currencies::new(&registry_with(vec![currency(StaticCurrencies::new(
        "p1",
        &["USD"],
    ))]));

    assert!(currencies.all_currencies(&["missing"]).is_empty());
    assert_eq!(labels(currencies.all_currencies(&["missing", "p1"])), ["USD (p1)"]);
}

// ============================================================================
// Failure isolation
// ============================================================================

#[rstest]
#[case::error(currency(FailingCurrencies("p2")))]
#[case::panic(currency(PanickingCurrencies("p2")))]
fn test_failing_provider_is_skipped(#[case] middle: coinage_core::spi::ProviderRecord) {
    let currencies = Currencies::new(&registry_with(vec![
        currency(StaticCurrencies::new("p1", &["USD"])),
        middle,
        currency(StaticCurrencies::new("p3", &["EUR"])),
    ]));

    let (units, logs) = count_logs(|| currencies.all_currencies(&[]));
    assert_eq!(labels(units), ["USD (p1)", "EUR (p3)"]);
    assert_eq!(logs.errors, 1);
}

#[test]
fn test_unnamed_provider_is_tolerated_but_never_selected() {
    let currencies = Currencies::new(&registry_with(vec![
        currency(StaticCurrencies::unnamed(&["XTS"])),
        currency(StaticCurrencies::new("p1", &["USD"])),
    ]));

    let (names, logs) = count_logs(|| currencies.provider_names());
    assert_eq!(names.into_iter().collect::<Vec<_>>(), ["p1"]);
    assert_eq!(logs.warnings, 1);
    assert!(!currencies.is_currency_available("XTS", &[]));
}

#[test]
fn test_provider_failing_to_name_itself_is_left_out() {
    let currencies = Currencies::new(&registry_with(vec![
        currency(TonguelessCurrencies),
        currency(StaticCurrencies::new("p1", &["USD"])),
    ]));

    let (names, logs) = count_logs(|| currencies.provider_names());
    assert_eq!(names.into_iter().collect::<Vec<_>>(), ["p1"]);
    assert_eq!(logs.errors, 1);
    assert_eq!(logs.warnings, 0);

    assert_eq!(currencies.currency("USD", &[]).unwrap().provider(), "p1");
    assert!(!currencies.is_currency_available("XAU", &[]));
}

// ============================================================================
// Strict lookups
// ============================================================================

#[test]
fn test_currency_by_code_resolves_single_unit() {
    let currencies = Currencies::new(&registry_with(vec![
        currency(StaticCurrencies::new("p1", &["USD"])),
        currency(StaticCurrencies::new("p2", &["EUR"])),
    ]));

    let unit = currencies.currency("EUR", &[]).unwrap();
    assert_eq!(unit.code(), "EUR");
    assert_eq!(unit.provider(), "p2");
    assert!(currencies.is_currency_available("USD", &[]));
}

#[test]
fn test_currency_reported_by_two_providers_is_ambiguous() {
    let currencies = Currencies::new(&registry_with(vec![
        currency(StaticCurrencies::new("p1", &["CHF"])),
        currency(StaticCurrencies::new("p2", &["CHF"])),
    ]));

    match currencies.currency("CHF", &[]) {
        Err(MonetaryError::AmbiguousCurrency { code, candidates }) => {
            assert_eq!(code, "CHF");
            assert_eq!(candidates, ["CHF (p1)", "CHF (p2)"]);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }

    assert_eq!(currencies.currency("CHF", &["p2"]).unwrap().provider(), "p2");
}

#[test]
fn test_unattributed_units_are_labelled_with_their_provider() {
    let currencies = Currencies::new(&registry_with(vec![
        currency(StaticCurrencies::unlabelled("a", &["CHF"])),
        currency(StaticCurrencies::unlabelled("b", &["CHF"])),
    ]));

    match currencies.currency("CHF", &[]) {
        Err(MonetaryError::AmbiguousCurrency { candidates, .. }) => {
            assert_eq!(candidates, ["CHF (a)", "CHF (b)"]);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }

    let unit = currencies.currency("CHF", &["b"]).unwrap();
    assert_eq!(unit.provider(), "b");
    assert_eq!(labels(currencies.all_currencies(&["a", "a"])), ["CHF (a)"]);
}

#[test]
fn test_unknown_code() {
    let currencies = Currencies::new(&registry_with(vec![currency(StaticCurrencies::new(
        "p1",
        &["USD"],
    ))]));

    let err = currencies.currency("XXX", &[]).unwrap_err();
    assert_eq!(err, MonetaryError::UnknownCurrency { code: "XXX".into() });
    assert!(err.is_not_found());
    assert!(!currencies.is_currency_available("XXX", &[]));
}

#[test]
fn test_find_currency() {
    let currencies = Currencies::new(&registry_with(vec![
        currency(StaticCurrencies::new("p1", &["USD", "CHF"])),
        currency(StaticCurrencies::new("p2", &["CHF"])),
    ]));
    let by_code = |code: &str| CurrencyQuery::builder().currency_codes([code]).build();

    assert_eq!(currencies.find_currency(&by_code("GBP")).unwrap(), None);
    assert_eq!(
        currencies.find_currency(&by_code("USD")).unwrap().map(|unit| unit.to_string()),
        Some("USD (p1)".to_string())
    );
    let err = currencies.find_currency(&by_code("CHF")).unwrap_err();
    assert!(matches!(err, MonetaryError::AmbiguousRequest { ref candidates, .. } if candidates.len() == 2));
}

// ============================================================================
// Built-in table
// ============================================================================

#[test]
fn test_locale_lookup_with_builtin_provider() {
    let currencies = builtin();

    let franc = currencies
        .currency_for_locale(&Locale::new("de", Some("CH")), &[])
        .unwrap();
    assert_eq!(franc.code(), "CHF");
    assert_eq!(franc.numeric_code(), Some(756));

    let yen = currencies.currency_for_locale(&"ja_JP".parse().unwrap(), &[]).unwrap();
    assert_eq!(yen.default_fraction_digits(), 0);

    assert!(currencies.is_currency_available_for_locale(&Locale::new("fr", Some("FR")), &[]));
}

#[test]
fn test_unknown_locale_is_not_found() {
    let currencies = builtin();
    let locale = Locale::new("xx", Some("ZZ"));

    let err = currencies.currency_for_locale(&locale, &[]).unwrap_err();
    assert!(matches!(err, MonetaryError::CurrencyNotFound { .. }));
    assert!(currencies.currencies_for_locale(&locale, &[]).is_empty());
}

#[test]
fn test_builtin_default_chain() {
    let currencies = builtin();
    assert_eq!(currencies.default_chain(), ["default"]);
    assert_eq!(currencies.all_currencies(&[]).len(), 7);
}

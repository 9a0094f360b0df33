//! Shared fixtures for the registry and resolver integration tests.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rust_decimal::Decimal;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use coinage_core::bootstrap::StaticDiscovery;
use coinage_core::spi::{
    AmountFormatProvider, CurrencyProvider, ExchangeRateProvider, Provider, ProviderRecord,
    RoundingProvider, Service,
};
use coinage_core::{AmountFormatQuery, ConversionQuery, CurrencyQuery, Registry, RoundingQuery};
use coinage_shared::types::{
    AmountFormat, AmountFormatContext, AmountFormatStyle, ConversionContext, CurrencyPlacement,
    CurrencyUnit, ExchangeRate, Locale, ProviderContext, RateType, Rounding, RoundingContext,
    RoundingMode, RoundingScale,
};
use coinage_shared::{MonetaryError, MonetaryResult};

// ============================================================================
// Registry helpers
// ============================================================================

/// A registry serving exactly `records`.
pub fn registry_with(records: Vec<ProviderRecord>) -> Arc<Registry> {
    Arc::new(Registry::with_facility(StaticDiscovery::new("test", records)))
}

pub fn currency(provider: impl CurrencyProvider) -> ProviderRecord {
    ProviderRecord::provider::<dyn CurrencyProvider>(Arc::new(provider))
}

pub fn rounding(provider: impl RoundingProvider) -> ProviderRecord {
    ProviderRecord::provider::<dyn RoundingProvider>(Arc::new(provider))
}

pub fn rate(provider: impl ExchangeRateProvider) -> ProviderRecord {
    ProviderRecord::provider::<dyn ExchangeRateProvider>(Arc::new(provider))
}

pub fn format(provider: impl AmountFormatProvider) -> ProviderRecord {
    ProviderRecord::provider::<dyn AmountFormatProvider>(Arc::new(provider))
}

// ============================================================================
// Log counting
// ============================================================================

/// Number of events seen per level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogCounts {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

#[derive(Clone, Default)]
struct CountingLayer {
    errors: Arc<AtomicUsize>,
    warnings: Arc<AtomicUsize>,
    infos: Arc<AtomicUsize>,
}

impl<S: Subscriber> Layer<S> for CountingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let counter = match *event.metadata().level() {
            Level::ERROR => &self.errors,
            Level::WARN => &self.warnings,
            Level::INFO => &self.infos,
            _ => return,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

/// Runs `f` with a counting subscriber installed on the current thread.
pub fn count_logs<T>(f: impl FnOnce() -> T) -> (T, LogCounts) {
    let layer = CountingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let out = tracing::subscriber::with_default(subscriber, f);
    let counts = LogCounts {
        errors: layer.errors.load(Ordering::SeqCst),
        warnings: layer.warnings.load(Ordering::SeqCst),
        infos: layer.infos.load(Ordering::SeqCst),
    };
    (out, counts)
}

// ============================================================================
// Currency providers
// ============================================================================

/// Answers with fixed units, filtered by the query's codes.
pub struct StaticCurrencies {
    name: Option<&'static str>,
    units: Vec<CurrencyUnit>,
}

impl StaticCurrencies {
    pub fn new(name: &'static str, codes: &[&str]) -> Self {
        Self {
            name: Some(name),
            units: codes
                .iter()
                .map(|code| CurrencyUnit::new(*code, 2).with_provider(name))
                .collect(),
        }
    }

    /// Named, but leaves its units unattributed.
    pub fn unlabelled(name: &'static str, codes: &[&str]) -> Self {
        Self {
            name: Some(name),
            units: codes.iter().map(|code| CurrencyUnit::new(*code, 2)).collect(),
        }
    }

    pub fn unnamed(codes: &[&str]) -> Self {
        Self {
            name: None,
            units: codes.iter().map(|code| CurrencyUnit::new(*code, 2)).collect(),
        }
    }
}

impl Service for StaticCurrencies {}

impl Provider for StaticCurrencies {
    fn provider_name(&self) -> Option<&str> {
        self.name
    }
}

impl CurrencyProvider for StaticCurrencies {
    fn currencies(&self, query: &CurrencyQuery) -> MonetaryResult<Vec<CurrencyUnit>> {
        let codes = &query.criteria().codes;
        Ok(self
            .units
            .iter()
            .filter(|unit| codes.is_empty() || codes.iter().any(|c| c == unit.code()))
            .cloned()
            .collect())
    }
}

/// Always returns an error.
pub struct FailingCurrencies(pub &'static str);

impl Service for FailingCurrencies {}

impl Provider for FailingCurrencies {
    fn provider_name(&self) -> Option<&str> {
        Some(self.0)
    }
}

impl CurrencyProvider for FailingCurrencies {
    fn currencies(&self, _query: &CurrencyQuery) -> MonetaryResult<Vec<CurrencyUnit>> {
        Err(MonetaryError::provider(self.0, "backend unavailable"))
    }
}

/// Always panics.
pub struct PanickingCurrencies(pub &'static str);

impl Service for PanickingCurrencies {}

impl Provider for PanickingCurrencies {
    fn provider_name(&self) -> Option<&str> {
        Some(self.0)
    }
}

impl CurrencyProvider for PanickingCurrencies {
    fn currencies(&self, _query: &CurrencyQuery) -> MonetaryResult<Vec<CurrencyUnit>> {
        panic!("{} blew up", self.0)
    }
}

/// Panics when asked for its name.
pub struct TonguelessCurrencies;

impl Service for TonguelessCurrencies {}

impl Provider for TonguelessCurrencies {
    fn provider_name(&self) -> Option<&str> {
        panic!("name registry offline")
    }
}

impl CurrencyProvider for TonguelessCurrencies {
    fn currencies(&self, _query: &CurrencyQuery) -> MonetaryResult<Vec<CurrencyUnit>> {
        Ok(vec![CurrencyUnit::new("XAU", 0)])
    }
}

// ============================================================================
// Rounding providers
// ============================================================================

/// Serves one named rounding at a fixed scale.
pub struct NamedRounding {
    pub name: &'static str,
    pub rounding_name: &'static str,
    pub scale: u32,
}

impl Service for NamedRounding {}

impl Provider for NamedRounding {
    fn provider_name(&self) -> Option<&str> {
        Some(self.name)
    }
}

impl RoundingProvider for NamedRounding {
    fn rounding(&self, query: &RoundingQuery) -> MonetaryResult<Option<Rounding>> {
        if query.criteria().rounding_name.as_deref() != Some(self.rounding_name) {
            return Ok(None);
        }
        Ok(Some(Rounding::new(
            RoundingContext::new(self.name, self.rounding_name),
            RoundingScale::Fixed(self.scale),
            RoundingMode::HalfUp,
        )))
    }

    fn rounding_names(&self) -> BTreeSet<String> {
        BTreeSet::from([self.rounding_name.to_string()])
    }
}

/// Always returns an error.
pub struct FailingRounding(pub &'static str);

impl Service for FailingRounding {}

impl Provider for FailingRounding {
    fn provider_name(&self) -> Option<&str> {
        Some(self.0)
    }
}

impl RoundingProvider for FailingRounding {
    fn rounding(&self, _query: &RoundingQuery) -> MonetaryResult<Option<Rounding>> {
        Err(MonetaryError::provider(self.0, "rounding table corrupt"))
    }

    fn rounding_names(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }
}

// ============================================================================
// Rate providers
// ============================================================================

/// Serves a single currency pair.
pub struct FixedRate {
    pub name: &'static str,
    pub base: &'static str,
    pub term: &'static str,
    pub factor: Decimal,
}

impl Service for FixedRate {}

impl Provider for FixedRate {
    fn provider_name(&self) -> Option<&str> {
        Some(self.name)
    }
}

impl ExchangeRateProvider for FixedRate {
    fn provider_context(&self) -> ProviderContext {
        ProviderContext::new(self.name, [RateType::Realtime])
    }

    fn exchange_rate(&self, query: &ConversionQuery) -> MonetaryResult<ExchangeRate> {
        let criteria = query.criteria();
        let (Some(base), Some(term)) = (&criteria.base, &criteria.term) else {
            return Err(MonetaryError::InvalidQuery("pair required".into()));
        };
        if base.code() != self.base || term.code() != self.term {
            return Err(MonetaryError::RateUnavailable {
                base: base.code().into(),
                term: term.code().into(),
                providers: self.name.into(),
            });
        }
        Ok(ExchangeRate::new(
            base.clone(),
            term.clone(),
            self.factor,
            ConversionContext::of(self.name, RateType::Realtime),
        ))
    }
}

/// Always panics.
pub struct PanickingRate(pub &'static str);

impl Service for PanickingRate {}

impl Provider for PanickingRate {
    fn provider_name(&self) -> Option<&str> {
        Some(self.0)
    }
}

impl ExchangeRateProvider for PanickingRate {
    fn provider_context(&self) -> ProviderContext {
        ProviderContext::new(self.0, [RateType::Realtime])
    }

    fn exchange_rate(&self, _query: &ConversionQuery) -> MonetaryResult<ExchangeRate> {
        panic!("{} feed offline", self.0)
    }
}

// ============================================================================
// Format providers
// ============================================================================

/// Serves one format for any query, tagged with the provider name.
pub struct PlainFormat {
    pub name: &'static str,
    pub placement: CurrencyPlacement,
    pub locales: &'static [(&'static str, Option<&'static str>)],
}

impl Service for PlainFormat {}

impl Provider for PlainFormat {
    fn provider_name(&self) -> Option<&str> {
        Some(self.name)
    }
}

impl AmountFormatProvider for PlainFormat {
    fn amount_formats(&self, _query: &AmountFormatQuery) -> MonetaryResult<Vec<AmountFormat>> {
        Ok(vec![AmountFormat::new(
            AmountFormatContext::new(self.name, "plain"),
            AmountFormatStyle {
                placement: self.placement,
                ..AmountFormatStyle::default()
            },
        )])
    }

    fn available_locales(&self) -> BTreeSet<Locale> {
        self.locales
            .iter()
            .map(|&(language, country)| Locale::new(language, country))
            .collect()
    }
}

/// Always returns an error.
pub struct FailingFormat(pub &'static str);

impl Service for FailingFormat {}

impl Provider for FailingFormat {
    fn provider_name(&self) -> Option<&str> {
        Some(self.0)
    }
}

impl AmountFormatProvider for FailingFormat {
    fn amount_formats(&self, _query: &AmountFormatQuery) -> MonetaryResult<Vec<AmountFormat>> {
        Err(MonetaryError::provider(self.0, "pattern file missing"))
    }

    fn available_locales(&self) -> BTreeSet<Locale> {
        BTreeSet::new()
    }
}

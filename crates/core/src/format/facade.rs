use std::collections::BTreeSet;
use std::sync::Arc;

use coinage_shared::types::{AmountFormat, Locale};
use coinage_shared::{MonetaryError, MonetaryResult};

use super::{DefaultFormatResolver, FormatResolver};
use crate::bootstrap::Registry;
use crate::query::AmountFormatQuery;
use crate::spi::Service;

/// Entry point for amount format lookups.
#[derive(Clone)]
pub struct Formats {
    resolver: Arc<dyn FormatResolver>,
}

impl Formats {
    /// Uses the [`FormatResolver`] deployed in `registry`, or the default one.
    pub fn new(registry: &Arc<Registry>) -> Self {
        let resolver = registry
            .resolve_one::<dyn FormatResolver>()
            .unwrap_or_else(|| Arc::new(DefaultFormatResolver::new(Arc::clone(registry))));
        Self { resolver }
    }

    /// Uses an explicit resolver.
    pub fn with_resolver(resolver: Arc<dyn FormatResolver>) -> Self {
        Self { resolver }
    }

    /// Backed by the process-wide registry.
    pub fn global() -> Self {
        Self::new(&Registry::global())
    }

    /// First format matching `query` in chain order.
    ///
    /// # Errors
    ///
    /// [`MonetaryError::NoFormat`] if nothing matches.
    pub fn amount_format(&self, query: &AmountFormatQuery) -> MonetaryResult<AmountFormat> {
        self.resolver
            .amount_formats(query)
            .into_iter()
            .next()
            .ok_or_else(|| MonetaryError::NoFormat {
                query: query.to_string(),
            })
    }

    /// First format for `locale`.
    pub fn amount_format_for_locale(&self, locale: &Locale, providers: &[&str]) -> MonetaryResult<AmountFormat> {
        self.amount_format(&locale_query(locale, providers))
    }

    /// First format registered as `name`.
    pub fn amount_format_named(&self, name: &str, providers: &[&str]) -> MonetaryResult<AmountFormat> {
        let query = AmountFormatQuery::builder()
            .format_name(name)
            .provider_names(providers.iter().copied())
            .build();
        self.amount_format(&query)
    }

    /// Every format matching `query`, in chain order.
    pub fn amount_formats(&self, query: &AmountFormatQuery) -> Vec<AmountFormat> {
        self.resolver.amount_formats(query)
    }

    /// Whether any provider answers `query`.
    pub fn is_available(&self, query: &AmountFormatQuery) -> bool {
        !self.resolver.amount_formats(query).is_empty()
    }

    /// Whether any provider has a format for `locale`.
    pub fn is_available_for_locale(&self, locale: &Locale, providers: &[&str]) -> bool {
        self.is_available(&locale_query(locale, providers))
    }

    /// Locales covered by `providers` (default chain if empty).
    pub fn available_locales(&self, providers: &[&str]) -> MonetaryResult<BTreeSet<Locale>> {
        let providers: Vec<String> = providers.iter().map(|p| (*p).to_string()).collect();
        self.resolver.available_locales(&providers)
    }

    /// Names of every discovered format provider.
    pub fn provider_names(&self) -> BTreeSet<String> {
        self.resolver.provider_names()
    }

    /// Chain used when no providers are named.
    pub fn default_chain(&self) -> Vec<String> {
        self.resolver.default_chain()
    }
}

impl std::fmt::Debug for Formats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Formats")
            .field("resolver", &self.resolver.implementation())
            .finish()
    }
}

fn locale_query(locale: &Locale, providers: &[&str]) -> AmountFormatQuery {
    AmountFormatQuery::builder()
        .locale(locale.clone())
        .provider_names(providers.iter().copied())
        .build()
}

use std::collections::BTreeSet;
use std::sync::Arc;

use indexmap::IndexSet;

use coinage_shared::types::{CurrencyUnit, Locale};
use coinage_shared::{MonetaryError, MonetaryResult};

use super::{CurrencyResolver, DefaultCurrencyResolver};
use crate::bootstrap::Registry;
use crate::query::CurrencyQuery;
use crate::spi::Service;

/// Entry point for currency lookups.
#[derive(Clone)]
pub struct Currencies {
    resolver: Arc<dyn CurrencyResolver>,
}

impl Currencies {
    /// Uses the [`CurrencyResolver`] deployed in `registry`, or the default one.
    pub fn new(registry: &Arc<Registry>) -> Self {
        let resolver = registry
            .resolve_one::<dyn CurrencyResolver>()
            .unwrap_or_else(|| Arc::new(DefaultCurrencyResolver::new(Arc::clone(registry))));
        Self { resolver }
    }

    /// Uses an explicit resolver.
    pub fn with_resolver(resolver: Arc<dyn CurrencyResolver>) -> Self {
        Self { resolver }
    }

    /// Backed by the process-wide registry.
    pub fn global() -> Self {
        Self::new(&Registry::global())
    }

    /// The unit with `code`.
    ///
    /// # Errors
    ///
    /// [`MonetaryError::UnknownCurrency`] if no provider knows the code,
    /// [`MonetaryError::AmbiguousCurrency`] if providers disagree.
    pub fn currency(&self, code: &str, providers: &[&str]) -> MonetaryResult<CurrencyUnit> {
        let query = CurrencyQuery::builder()
            .currency_codes([code])
            .provider_names(providers.iter().copied())
            .build();
        exactly_one(
            self.resolver.currencies(&query),
            || MonetaryError::UnknownCurrency { code: code.to_string() },
            |candidates| MonetaryError::AmbiguousCurrency {
                code: code.to_string(),
                candidates,
            },
        )
    }

    /// The unit used in `locale`'s country.
    ///
    /// # Errors
    ///
    /// [`MonetaryError::CurrencyNotFound`] or [`MonetaryError::AmbiguousCurrency`].
    pub fn currency_for_locale(&self, locale: &Locale, providers: &[&str]) -> MonetaryResult<CurrencyUnit> {
        let query = locale_query(locale, providers);
        exactly_one(
            self.resolver.currencies(&query),
            || MonetaryError::CurrencyNotFound {
                criteria: format!("locale {locale}"),
            },
            |candidates| MonetaryError::AmbiguousCurrency {
                code: locale.to_string(),
                candidates,
            },
        )
    }

    /// Every unit matching `query`.
    pub fn currencies(&self, query: &CurrencyQuery) -> IndexSet<CurrencyUnit> {
        self.resolver.currencies(query)
    }

    /// Every unit used in `locale`'s country.
    pub fn currencies_for_locale(&self, locale: &Locale, providers: &[&str]) -> IndexSet<CurrencyUnit> {
        self.resolver.currencies(&locale_query(locale, providers))
    }

    /// Every unit the providers know.
    pub fn all_currencies(&self, providers: &[&str]) -> IndexSet<CurrencyUnit> {
        let query = CurrencyQuery::builder()
            .provider_names(providers.iter().copied())
            .build();
        self.resolver.currencies(&query)
    }

    /// The single unit matching `query`, if any.
    ///
    /// # Errors
    ///
    /// [`MonetaryError::AmbiguousRequest`] if more than one unit matches.
    pub fn find_currency(&self, query: &CurrencyQuery) -> MonetaryResult<Option<CurrencyUnit>> {
        let mut found = self.resolver.currencies(query);
        match found.len() {
            0 => Ok(None),
            1 => Ok(found.pop()),
            _ => Err(MonetaryError::AmbiguousRequest {
                query: query.to_string(),
                candidates: found.iter().map(ToString::to_string).collect(),
            }),
        }
    }

    /// Whether any provider knows `code`.
    pub fn is_currency_available(&self, code: &str, providers: &[&str]) -> bool {
        let query = CurrencyQuery::builder()
            .currency_codes([code])
            .provider_names(providers.iter().copied())
            .build();
        !self.resolver.currencies(&query).is_empty()
    }

    /// Whether any provider has a unit for `locale`.
    pub fn is_currency_available_for_locale(&self, locale: &Locale, providers: &[&str]) -> bool {
        !self.currencies_for_locale(locale, providers).is_empty()
    }

    /// Names of every discovered currency provider.
    pub fn provider_names(&self) -> BTreeSet<String> {
        self.resolver.provider_names()
    }

    /// Chain used when no providers are named.
    pub fn default_chain(&self) -> Vec<String> {
        self.resolver.default_chain()
    }
}

impl std::fmt::Debug for Currencies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Currencies")
            .field("resolver", &self.resolver.implementation())
            .finish()
    }
}

fn locale_query(locale: &Locale, providers: &[&str]) -> CurrencyQuery {
    CurrencyQuery::builder()
        .countries([locale.clone()])
        .provider_names(providers.iter().copied())
        .build()
}

fn exactly_one(
    mut found: IndexSet<CurrencyUnit>,
    not_found: impl FnOnce() -> MonetaryError,
    ambiguous: impl FnOnce(Vec<String>) -> MonetaryError,
) -> MonetaryResult<CurrencyUnit> {
    match found.len() {
        0 => Err(not_found()),
        1 => found.pop().ok_or_else(not_found),
        _ => Err(ambiguous(found.iter().map(ToString::to_string).collect())),
    }
}

//! Integration tests for the registry: installation, lazy loading and
//! deterministic single-service resolution.

mod common;

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use indexmap::IndexSet;

use coinage_core::bootstrap::{DiscoveryError, DiscoveryFacility, StaticDiscovery};
use coinage_core::currency::CurrencyResolver;
use coinage_core::spi::{ContractId, CurrencyProvider, ProviderRecord, Service};
use coinage_core::{Currencies, CurrencyQuery, Registry};
use coinage_shared::types::CurrencyUnit;

use common::{StaticCurrencies, count_logs, currency};

fn facility(name: &str, providers: &[&'static str]) -> Arc<dyn DiscoveryFacility> {
    Arc::new(StaticDiscovery::new(
        name,
        providers
            .iter()
            .map(|provider| currency(StaticCurrencies::new(*provider, &["USD"]))),
    ))
}

fn currency_provider_names(registry: &Registry) -> Vec<String> {
    registry
        .resolve_all::<dyn CurrencyProvider>()
        .iter()
        .filter_map(|provider| provider.provider_name().map(str::to_owned))
        .collect()
}

fn unused_loader(
    calls: &Arc<AtomicUsize>,
) -> impl Fn() -> Result<Arc<dyn DiscoveryFacility>, DiscoveryError> + Send + Sync + 'static {
    let calls = Arc::clone(calls);
    move || {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(DiscoveryError::Load {
            facility: "unused".into(),
            message: "must not be loaded".into(),
        })
    }
}

// ============================================================================
// Installation
// ============================================================================

#[test]
fn test_install_returns_previous_facility() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = Registry::with_loader(unused_loader(&calls));

    let (first, first_logs) = count_logs(|| registry.install(facility("a", &["pa"])));
    assert!(first.is_none());
    assert_eq!(first_logs.infos, 1);
    assert_eq!(first_logs.warnings, 0);

    let (previous, replace_logs) = count_logs(|| registry.install(facility("b", &["pb"])));
    assert_eq!(previous.map(|f| f.name().to_owned()).as_deref(), Some("a"));
    assert_eq!(replace_logs.warnings, 1);

    assert_eq!(currency_provider_names(&registry), ["pb"]);
    assert_eq!(registry.facility_name(), "b");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_install_over_lazily_loaded_facility_warns() {
    let registry = Registry::with_loader(|| Ok(facility("lazy", &["lazy"])));
    assert_eq!(currency_provider_names(&registry), ["lazy"]);

    let (previous, logs) = count_logs(|| registry.install(facility("explicit", &["explicit"])));
    assert_eq!(previous.map(|f| f.name().to_owned()).as_deref(), Some("lazy"));
    assert_eq!(logs.warnings, 1);
    assert_eq!(currency_provider_names(&registry), ["explicit"]);
}

// ============================================================================
// Lazy loading
// ============================================================================

#[test]
fn test_failing_loader_falls_back_to_empty_discovery() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = Registry::with_loader(unused_loader(&calls));

    let (providers, logs) = count_logs(|| registry.resolve_all::<dyn CurrencyProvider>());
    assert!(providers.is_empty());
    assert_eq!(logs.errors, 1);
    assert_eq!(registry.facility_name(), "empty");

    assert!(registry.resolve_all::<dyn CurrencyProvider>().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_panicking_loader_falls_back_to_empty_discovery() {
    let registry = Registry::with_loader(|| panic!("plugin directory unreadable"));
    let (providers, logs) = count_logs(|| registry.resolve_all::<dyn CurrencyProvider>());
    assert!(providers.is_empty());
    assert_eq!(logs.errors, 1);
    assert_eq!(registry.facility_name(), "empty");
}

#[test]
fn test_concurrent_first_access_loads_once() {
    const THREADS: usize = 32;

    let calls = Arc::new(AtomicUsize::new(0));
    let registry = {
        let calls = Arc::clone(&calls);
        Registry::with_loader(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            Ok(facility("slow", &["slow"]))
        })
    };
    let barrier = Barrier::new(THREADS);

    let seen: Vec<Vec<String>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    currency_provider_names(&registry)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(seen.iter().all(|names| names == &["slow"]));
}

// ============================================================================
// Discovery failures
// ============================================================================

struct BrokenDiscovery;

impl DiscoveryFacility for BrokenDiscovery {
    fn name(&self) -> &str {
        "broken"
    }

    fn discover(&self, contract: &ContractId) -> Result<Vec<ProviderRecord>, DiscoveryError> {
        Err(DiscoveryError::Enumerate {
            contract: contract.to_string(),
            message: "index corrupt".into(),
        })
    }
}

#[test]
fn test_discovery_error_yields_empty_and_logs() {
    let registry = Registry::with_facility(BrokenDiscovery);
    let (providers, logs) = count_logs(|| registry.resolve_all::<dyn CurrencyProvider>());
    assert!(providers.is_empty());
    assert_eq!(logs.errors, 1);
}

// ============================================================================
// resolve_one
// ============================================================================

struct AlphaResolver;
struct ZuluResolver;

impl Service for AlphaResolver {}
impl Service for ZuluResolver {}

impl CurrencyResolver for AlphaResolver {
    fn currencies(&self, _query: &CurrencyQuery) -> IndexSet<CurrencyUnit> {
        IndexSet::from([CurrencyUnit::new("AAA", 2)])
    }

    fn provider_names(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    fn default_chain(&self) -> Vec<String> {
        vec!["alpha".to_string()]
    }
}

impl CurrencyResolver for ZuluResolver {
    fn currencies(&self, _query: &CurrencyQuery) -> IndexSet<CurrencyUnit> {
        IndexSet::from([CurrencyUnit::new("ZZZ", 2)])
    }

    fn provider_names(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    fn default_chain(&self) -> Vec<String> {
        vec!["zulu".to_string()]
    }
}

#[test]
fn test_resolve_one_orders_by_implementation_name() {
    let registry = Arc::new(Registry::with_facility(StaticDiscovery::new(
        "resolvers",
        [
            ProviderRecord::service::<dyn CurrencyResolver>(Arc::new(ZuluResolver)),
            ProviderRecord::service::<dyn CurrencyResolver>(Arc::new(AlphaResolver)),
        ],
    )));

    for _ in 0..3 {
        let resolver = registry.resolve_one::<dyn CurrencyResolver>().unwrap();
        assert!(resolver.implementation().ends_with("AlphaResolver"));
    }

    let currencies = Currencies::new(&registry);
    assert_eq!(currencies.default_chain(), ["alpha"]);
    assert_eq!(currencies.currency("AAA", &[]).unwrap().code(), "AAA");
}

#[test]
fn test_resolve_one_none_when_nothing_deployed() {
    let registry = Registry::with_facility(StaticDiscovery::new("none", []));
    assert!(registry.resolve_one::<dyn CurrencyResolver>().is_none());
}

#[test]
fn test_global_registry_is_shared() {
    assert!(Arc::ptr_eq(&Registry::global(), &Registry::global()));
}

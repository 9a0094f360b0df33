use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use thiserror::Error;

use crate::spi::{ContractId, ProviderRecord};

/// Discovery failures. They never leave the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// A facility could not be constructed.
    #[error("Discovery facility '{facility}' failed to load: {message}")]
    Load {
        /// Facility name.
        facility: String,
        /// Failure description.
        message: String,
    },

    /// A facility could not enumerate a contract.
    #[error("Discovery of {contract} failed: {message}")]
    Enumerate {
        /// Contract type name.
        contract: String,
        /// Failure description.
        message: String,
    },
}

/// Enumerates deployed implementations of a contract.
///
/// Enumeration may be repeated any number of times and may legitimately
/// return nothing. Implementations make no caching promise.
pub trait DiscoveryFacility: Send + Sync + 'static {
    /// Facility name, for logs.
    fn name(&self) -> &str;

    /// Every record registered under `contract`.
    fn discover(&self, contract: &ContractId) -> Result<Vec<ProviderRecord>, DiscoveryError>;
}

/// Link-time provider registration, created by [`register_provider!`](crate::register_provider).
pub struct ProviderRegistration {
    factory: fn() -> ProviderRecord,
}

impl ProviderRegistration {
    /// Wraps a record factory.
    #[must_use]
    pub const fn new(factory: fn() -> ProviderRecord) -> Self {
        Self { factory }
    }
}

inventory::collect!(ProviderRegistration);

/// Constructor for a discovery facility.
pub type FacilityFactory = fn() -> Result<Arc<dyn DiscoveryFacility>, DiscoveryError>;

/// Link-time facility registration, created by
/// [`register_discovery_facility!`](crate::register_discovery_facility).
pub struct FacilityRegistration {
    name: &'static str,
    factory: FacilityFactory,
}

impl FacilityRegistration {
    /// Wraps a named facility factory.
    #[must_use]
    pub const fn new(name: &'static str, factory: FacilityFactory) -> Self {
        Self { name, factory }
    }
}

inventory::collect!(FacilityRegistration);

/// Registers a provider for [`InventoryDiscovery`].
///
/// ```ignore
/// register_provider!(dyn CurrencyProvider, MyCurrencies::new());
/// ```
#[macro_export]
macro_rules! register_provider {
    (dyn $contract:path, $ctor:expr) => {
        const _: () = {
            fn factory() -> $crate::spi::ProviderRecord {
                $crate::spi::ProviderRecord::provider::<dyn $contract>(::std::sync::Arc::new($ctor))
            }
            $crate::inventory::submit! {
                $crate::bootstrap::ProviderRegistration::new(factory)
            }
        };
    };
}

/// Registers a discovery facility factory picked up by the default loader.
#[macro_export]
macro_rules! register_discovery_facility {
    ($name:literal, $factory:path) => {
        $crate::inventory::submit! {
            $crate::bootstrap::FacilityRegistration::new($name, $factory)
        }
    };
}

/// Enumerates providers registered with [`register_provider!`](crate::register_provider).
///
/// Registrations are re-read on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryDiscovery;

impl DiscoveryFacility for InventoryDiscovery {
    fn name(&self) -> &str {
        "inventory"
    }

    fn discover(&self, contract: &ContractId) -> Result<Vec<ProviderRecord>, DiscoveryError> {
        let mut records = Vec::new();
        for registration in inventory::iter::<ProviderRegistration> {
            match panic::catch_unwind(AssertUnwindSafe(registration.factory)) {
                Ok(record) if record.contract() == *contract => records.push(record),
                Ok(_) => {}
                Err(_) => tracing::error!(%contract, "Provider registration panicked while constructing, skipping"),
            }
        }
        Ok(records)
    }
}

/// An explicit list of records.
#[derive(Debug, Clone)]
pub struct StaticDiscovery {
    name: String,
    records: Vec<ProviderRecord>,
}

impl StaticDiscovery {
    /// Creates a facility serving `records`.
    pub fn new(name: impl Into<String>, records: impl IntoIterator<Item = ProviderRecord>) -> Self {
        Self {
            name: name.into(),
            records: records.into_iter().collect(),
        }
    }

    /// A facility serving the built-in providers.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new("builtin", crate::providers::builtin_records())
    }

    /// Adds one record.
    #[must_use]
    pub fn with_record(mut self, record: ProviderRecord) -> Self {
        self.records.push(record);
        self
    }

    /// Hides every provider whose name is listed.
    #[must_use]
    pub fn without_providers(mut self, disabled: &[String]) -> Self {
        self.records.retain(|record| {
            let keep = record.name().is_none_or(|name| !disabled.iter().any(|d| d == name));
            if !keep {
                tracing::info!(provider = record.name(), "Provider disabled by configuration");
            }
            keep
        });
        self
    }

    /// Records served by this facility.
    #[must_use]
    pub fn records(&self) -> &[ProviderRecord] {
        &self.records
    }
}

impl DiscoveryFacility for StaticDiscovery {
    fn name(&self) -> &str {
        &self.name
    }

    fn discover(&self, contract: &ContractId) -> Result<Vec<ProviderRecord>, DiscoveryError> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.contract() == *contract)
            .cloned()
            .collect())
    }
}

/// Finds nothing, never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyDiscovery;

impl DiscoveryFacility for EmptyDiscovery {
    fn name(&self) -> &str {
        "empty"
    }

    fn discover(&self, _contract: &ContractId) -> Result<Vec<ProviderRecord>, DiscoveryError> {
        Ok(Vec::new())
    }
}

/// Default facility loader.
///
/// Picks the registered facility factory with the smallest name, otherwise
/// [`InventoryDiscovery`].
pub fn default_facility() -> Result<Arc<dyn DiscoveryFacility>, DiscoveryError> {
    match inventory::iter::<FacilityRegistration>
        .into_iter()
        .min_by_key(|registration| registration.name)
    {
        Some(registration) => {
            tracing::debug!(facility = registration.name, "Using registered discovery facility");
            (registration.factory)()
        }
        None => Ok(Arc::new(InventoryDiscovery)),
    }
}

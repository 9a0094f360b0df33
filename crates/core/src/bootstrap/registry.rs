use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;

use super::discovery::{self, DiscoveryError, DiscoveryFacility, EmptyDiscovery};
use crate::spi::{ContractId, Service};

type Facility = Arc<dyn DiscoveryFacility>;
type FacilityLoader = Box<dyn Fn() -> Result<Facility, DiscoveryError> + Send + Sync>;

static GLOBAL: LazyLock<Arc<Registry>> = LazyLock::new(|| Arc::new(Registry::new()));

/// Holder of the active discovery facility.
///
/// The facility is loaded lazily on first use (double-checked under a lock, so
/// the loader runs at most once) and can be replaced at any time with
/// [`install`](Self::install). Readers load it without locking and never see a
/// half-built facility. Providers are always invoked outside the lock.
pub struct Registry {
    facility: ArcSwapOption<Facility>,
    lock: Mutex<()>,
    loader: FacilityLoader,
}

impl Registry {
    /// A registry using the default facility loader.
    #[must_use]
    pub fn new() -> Self {
        Self::with_loader(discovery::default_facility)
    }

    /// A registry that builds its facility with `loader` on first use.
    pub fn with_loader<F>(loader: F) -> Self
    where
        F: Fn() -> Result<Facility, DiscoveryError> + Send + Sync + 'static,
    {
        Self {
            facility: ArcSwapOption::empty(),
            lock: Mutex::new(()),
            loader: Box::new(loader),
        }
    }

    /// A registry already initialized with `facility`.
    pub fn with_facility(facility: impl DiscoveryFacility) -> Self {
        let registry = Self::new();
        let facility: Facility = Arc::new(facility);
        registry.facility.store(Some(Arc::new(facility)));
        registry
    }

    /// The process-wide registry.
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Swaps the active facility, returning the previous one.
    ///
    /// Returns `None` if no facility was active yet. Does not trigger the
    /// default loader.
    pub fn install(&self, facility: Facility) -> Option<Facility> {
        let _guard = self.lock.lock();
        let name = facility.name().to_owned();
        let previous = self.facility.swap(Some(Arc::new(facility)));
        match &previous {
            None => tracing::info!(facility = %name, "Discovery facility installed"),
            Some(previous) => tracing::warn!(
                facility = %name,
                previous = previous.name(),
                "Discovery facility replaced"
            ),
        }
        previous.map(|previous| Arc::clone(&*previous))
    }

    /// Name of the active facility, loading the default one if needed.
    pub fn facility_name(&self) -> String {
        self.facility().name().to_owned()
    }

    /// Every discovered service implementing contract `C`.
    ///
    /// Never fails: discovery errors and panics are logged and yield an empty
    /// list.
    pub fn resolve_all<C: ?Sized + Service>(&self) -> Vec<Arc<C>> {
        let facility = self.facility();
        let contract = ContractId::of::<C>();
        let records = match panic::catch_unwind(AssertUnwindSafe(|| facility.discover(&contract))) {
            Ok(Ok(records)) => records,
            Ok(Err(err)) => {
                tracing::error!(facility = facility.name(), %contract, error = %err, "Discovery failed");
                return Vec::new();
            }
            Err(_) => {
                tracing::error!(facility = facility.name(), %contract, "Discovery panicked");
                return Vec::new();
            }
        };

        records
            .iter()
            .filter_map(|record| {
                let service = record.downcast::<C>();
                if service.is_none() {
                    tracing::error!(
                        %contract,
                        implementation = record.implementation(),
                        "Discovered record does not implement the requested contract, skipping"
                    );
                }
                service
            })
            .collect()
    }

    /// One service implementing `C`, or `None`.
    ///
    /// Candidates are ordered by [`Service::implementation`] and the first one
    /// wins, so the same candidate is chosen on every call as long as the
    /// discovered set does not change.
    pub fn resolve_one<C: ?Sized + Service>(&self) -> Option<Arc<C>> {
        let mut candidates = self.resolve_all::<C>();
        candidates.sort_by(|a, b| a.implementation().cmp(b.implementation()));
        candidates.into_iter().next()
    }

    fn facility(&self) -> Facility {
        if let Some(facility) = self.facility.load_full() {
            return Arc::clone(&*facility);
        }

        let _guard = self.lock.lock();
        if let Some(facility) = self.facility.load_full() {
            return Arc::clone(&*facility);
        }
        let facility = self.load_default();
        self.facility.store(Some(Arc::new(Arc::clone(&facility))));
        facility
    }

    fn load_default(&self) -> Facility {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.loader)())) {
            Ok(Ok(facility)) => {
                tracing::info!(facility = facility.name(), "Default discovery facility loaded");
                facility
            }
            Ok(Err(err)) => {
                tracing::error!(error = %err, "Default discovery facility failed to load, using empty discovery");
                Arc::new(EmptyDiscovery)
            }
            Err(_) => {
                tracing::error!("Default discovery facility loader panicked, using empty discovery");
                Arc::new(EmptyDiscovery)
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let facility = self.facility.load_full().map(|facility| facility.name().to_owned());
        f.debug_struct("Registry")
            .field("facility", &facility)
            .finish_non_exhaustive()
    }
}

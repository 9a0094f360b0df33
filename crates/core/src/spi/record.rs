use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use super::{Provider, Service};

/// Identifies a contract type (e.g. `dyn CurrencyProvider`).
#[derive(Debug, Clone, Copy)]
pub struct ContractId {
    type_id: TypeId,
    name: &'static str,
}

impl ContractId {
    /// The id of contract `C`.
    #[must_use]
    pub fn of<C: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            name: std::any::type_name::<C>(),
        }
    }

    /// Human readable contract type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ContractId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ContractId {}

impl std::hash::Hash for ContractId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A discovered provider: contract tag, name and type-erased behavior.
///
/// Records are created once per enumeration and never mutated.
#[derive(Clone)]
pub struct ProviderRecord {
    contract: ContractId,
    name: Option<String>,
    implementation: &'static str,
    service: Arc<dyn Any + Send + Sync>,
}

impl ProviderRecord {
    /// Wraps a named provider implementing contract `C`.
    pub fn provider<C: ?Sized + Provider>(provider: Arc<C>) -> Self {
        let name = crate::resolve::declared_name(&*provider);
        let mut record = Self::service(provider);
        record.name = name;
        record
    }

    /// Wraps an unnamed service (e.g. a domain resolver) implementing contract `C`.
    pub fn service<C: ?Sized + Service>(service: Arc<C>) -> Self {
        Self {
            contract: ContractId::of::<C>(),
            name: None,
            implementation: service.implementation(),
            service: Arc::new(service),
        }
    }

    /// Contract this record was registered under.
    #[must_use]
    pub const fn contract(&self) -> ContractId {
        self.contract
    }

    /// Declared provider name captured at registration.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Implementation type name.
    #[must_use]
    pub const fn implementation(&self) -> &'static str {
        self.implementation
    }

    /// Typed access; `None` if the record belongs to another contract.
    #[must_use]
    pub fn downcast<C: ?Sized + Service>(&self) -> Option<Arc<C>> {
        self.service.downcast_ref::<Arc<C>>().cloned()
    }
}

impl fmt::Debug for ProviderRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRecord")
            .field("contract", &self.contract.name)
            .field("name", &self.name)
            .field("implementation", &self.implementation)
            .finish_non_exhaustive()
    }
}

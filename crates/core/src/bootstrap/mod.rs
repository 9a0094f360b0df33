//! Provider discovery and the registry.
//!
//! A [`DiscoveryFacility`] enumerates the providers deployed for a contract.
//! The [`Registry`] holds the active facility, loads a default one on first
//! use and lets callers swap it at runtime.

mod discovery;
mod registry;

pub use discovery::{
    DiscoveryError, DiscoveryFacility, EmptyDiscovery, FacilityFactory, FacilityRegistration,
    InventoryDiscovery, ProviderRegistration, StaticDiscovery, default_facility,
};
pub use registry::Registry;

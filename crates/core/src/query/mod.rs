//! Immutable queries, their builders and provider chains.
//!
//! A [`Query`] bundles typed selection criteria, an optional explicit provider
//! chain and an open attribute bag. Queries are built through a
//! [`QueryBuilder`], which accumulates by value and is not meant to be shared
//! between threads; the built query is immutable and freely shareable.

pub mod chain;
mod criteria;

#[cfg(test)]
mod chain_props;

use serde::{Deserialize, Serialize};

use coinage_shared::types::Attributes;

pub use chain::{NameMatch, default_chain, effective_chain};
pub use criteria::{ConversionCriteria, CurrencyCriteria, FormatCriteria, RoundingCriteria};

/// Query for currency units.
pub type CurrencyQuery = Query<CurrencyCriteria>;
/// Query for roundings.
pub type RoundingQuery = Query<RoundingCriteria>;
/// Query for exchange rates and conversions.
pub type ConversionQuery = Query<ConversionCriteria>;
/// Query for amount formats.
pub type AmountFormatQuery = Query<FormatCriteria>;

/// Domain-specific selection criteria.
pub trait Criteria: Clone + Default + std::fmt::Debug {
    /// Overwrites every field that is set in `other`, keeping the rest.
    fn merge_from(&mut self, other: &Self);
}

/// An immutable predicate plus optional explicit provider ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query<C> {
    criteria: C,
    provider_names: Vec<String>,
    attributes: Attributes,
}

impl<C: Criteria> Query<C> {
    /// Starts an empty builder.
    #[must_use]
    pub fn builder() -> QueryBuilder<C> {
        QueryBuilder::new()
    }

    /// A builder pre-filled with this query's contents.
    #[must_use]
    pub fn to_builder(&self) -> QueryBuilder<C> {
        QueryBuilder::new().import(self)
    }
}

impl<C> Query<C> {
    /// Typed selection criteria.
    pub const fn criteria(&self) -> &C {
        &self.criteria
    }

    /// Requested provider chain; empty means "use the default chain".
    pub fn provider_names(&self) -> &[String] {
        &self.provider_names
    }

    /// Provider-specific attributes.
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// A single attribute.
    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }
}

impl<C: std::fmt::Debug> std::fmt::Display for Query<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.criteria)?;
        if !self.provider_names.is_empty() {
            write!(f, " providers=[{}]", self.provider_names.join(", "))?;
        }
        Ok(())
    }
}

/// Accumulating builder for [`Query`].
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder<C> {
    criteria: C,
    provider_names: Vec<String>,
    attributes: Attributes,
}

impl<C: Criteria> QueryBuilder<C> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            criteria: C::default(),
            provider_names: Vec::new(),
            attributes: Attributes::new(),
        }
    }

    /// Replaces the provider chain. Order and duplicates are kept verbatim.
    #[must_use]
    pub fn provider_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provider_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Appends one provider to the chain.
    #[must_use]
    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_names.push(name.into());
        self
    }

    /// Sets a provider-specific attribute.
    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Merges an existing query into this builder.
    ///
    /// Criteria fields set on `query` overwrite the builder's, attributes are
    /// merged key by key with `query` winning, and a non-empty provider chain
    /// on `query` replaces the builder's.
    #[must_use]
    pub fn import(mut self, query: &Query<C>) -> Self {
        self.criteria.merge_from(&query.criteria);
        if !query.provider_names.is_empty() {
            self.provider_names.clone_from(&query.provider_names);
        }
        self.merge_attributes(&query.attributes);
        self
    }

    pub(crate) fn merge_attributes(&mut self, attributes: &Attributes) {
        for (key, value) in attributes {
            self.attributes.insert(key.clone(), value.clone());
        }
    }

    pub(crate) fn criteria_mut(&mut self) -> &mut C {
        &mut self.criteria
    }

    /// Builds the immutable query.
    #[must_use]
    pub fn build(self) -> Query<C> {
        Query {
            criteria: self.criteria,
            provider_names: self.provider_names,
            attributes: self.attributes,
        }
    }
}

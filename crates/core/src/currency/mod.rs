//! Currency lookup.
//!
//! Currency answers are a set: units are deduplicated by value while keeping
//! the order in which the chain produced them. Lookups that expect exactly one
//! unit treat several distinct answers as an error rather than picking one.

mod facade;
mod resolver;

pub use facade::Currencies;
pub use resolver::{CurrencyResolver, DefaultCurrencyResolver};

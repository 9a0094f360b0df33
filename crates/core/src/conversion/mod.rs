//! Exchange rates and currency conversion.
//!
//! A conversion query does not pick one answer out of many: it selects the
//! providers of its chain, which are combined into a single compound provider
//! that asks each member in turn. Whether a rate exists is the providers' call.

mod compound;
mod facade;
mod resolver;

pub use compound::CompoundRateProvider;
pub use facade::{Conversions, CurrencyConversion};
pub use resolver::{ConversionResolver, DefaultConversionResolver};

//! Amount format lookup.
//!
//! Like roundings, formats favor availability: the first match in chain order
//! is used when several providers answer.

mod facade;
mod resolver;

pub use facade::Formats;
pub use resolver::{DefaultFormatResolver, FormatResolver};

//! Rounding lookup.
//!
//! Answers are an ordered list; when several providers match, the first one
//! in chain order wins and no ambiguity is reported.

mod facade;
mod resolver;

pub use facade::Roundings;
pub use resolver::{DefaultRoundingResolver, RoundingResolver};

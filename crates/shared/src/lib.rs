//! Shared value types, errors, and configuration for Coinage.
//!
//! This crate provides the data carriers exchanged between providers,
//! resolvers and callers:
//! - Currency units, locales and money amounts with decimal precision
//! - Exchange rates and conversion contexts
//! - Roundings and amount formats
//! - The monetary error taxonomy
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{MonetaryError, MonetaryResult};

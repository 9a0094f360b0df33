//! Monetary error types.
//!
//! Every failure a caller can observe from a facade or a provider is one of
//! these variants. Provider-level failures are normally swallowed (logged and
//! skipped) by the resolvers; they only surface through [`MonetaryError::Provider`]
//! when a provider is invoked directly.

use thiserror::Error;

/// Result type alias using `MonetaryError`.
pub type MonetaryResult<T> = Result<T, MonetaryError>;

/// Monetary error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonetaryError {
    /// No provider in the chain knows the currency code.
    #[error("Unknown currency code: {code}")]
    UnknownCurrency {
        /// The requested currency code.
        code: String,
    },

    /// No currency matched non-code criteria (e.g. a locale).
    #[error("No currency unit found for {criteria}")]
    CurrencyNotFound {
        /// Human readable description of the criteria.
        criteria: String,
    },

    /// More than one currency unit matched a lookup that expects exactly one.
    #[error("Ambiguous currency unit for {code}: [{}]", .candidates.join(", "))]
    AmbiguousCurrency {
        /// The requested code or locale.
        code: String,
        /// Every conflicting candidate found.
        candidates: Vec<String>,
    },

    /// More than one currency unit matched a free-form query.
    #[error("Ambiguous request for currency unit: {query}, found: [{}]", .candidates.join(", "))]
    AmbiguousRequest {
        /// Debug rendering of the query.
        query: String,
        /// Every conflicting candidate found.
        candidates: Vec<String>,
    },

    /// No rounding provider answered the request.
    #[error("No rounding provided {detail}")]
    NoRounding {
        /// What was asked for (currency or rounding name).
        detail: String,
    },

    /// No amount format matched the query.
    #[error("No amount format for query {query}")]
    NoFormat {
        /// Debug rendering of the query.
        query: String,
    },

    /// No provider in the chain could supply a rate for the pair.
    #[error("No exchange rate available for {base} -> {term} (providers: {providers})")]
    RateUnavailable {
        /// Base currency code.
        base: String,
        /// Term currency code.
        term: String,
        /// Providers that were consulted.
        providers: String,
    },

    /// A provider name was requested explicitly but is not deployed.
    #[error("Unknown provider: {name}")]
    UnknownProvider {
        /// The requested provider name.
        name: String,
    },

    /// The query is missing a required field or is otherwise malformed.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A provider failed while answering.
    #[error("Provider {provider} failed: {message}")]
    Provider {
        /// The failing provider name.
        provider: String,
        /// Failure description.
        message: String,
    },
}

impl MonetaryError {
    /// Creates a provider failure.
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Returns a stable machine-readable code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCurrency { .. } => "UNKNOWN_CURRENCY",
            Self::CurrencyNotFound { .. } => "CURRENCY_NOT_FOUND",
            Self::AmbiguousCurrency { .. } => "AMBIGUOUS_CURRENCY",
            Self::AmbiguousRequest { .. } => "AMBIGUOUS_REQUEST",
            Self::NoRounding { .. } => "NO_ROUNDING",
            Self::NoFormat { .. } => "NO_FORMAT",
            Self::RateUnavailable { .. } => "RATE_UNAVAILABLE",
            Self::UnknownProvider { .. } => "UNKNOWN_PROVIDER",
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::Provider { .. } => "PROVIDER_FAILURE",
        }
    }

    /// Returns true if the error means "nothing matched" rather than a conflict or failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnknownCurrency { .. }
                | Self::CurrencyNotFound { .. }
                | Self::NoRounding { .. }
                | Self::NoFormat { .. }
                | Self::RateUnavailable { .. }
                | Self::UnknownProvider { .. }
        )
    }
}

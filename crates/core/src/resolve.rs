//! Shared aggregation used by every default resolver.
//!
//! Providers are invoked outside of any lock, one chain entry at a time. A
//! provider that returns an error or panics is logged and skipped; it never
//! aborts the overall lookup.

use std::any::Any;
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use coinage_shared::{MonetaryError, MonetaryResult};

use crate::query::{NameMatch, Query, default_chain, effective_chain};
use crate::spi::Provider;

/// Runs a provider call, turning a panic into [`MonetaryError::Provider`].
pub(crate) fn call_guarded<T>(
    provider: &str,
    call: impl FnOnce() -> MonetaryResult<T>,
) -> MonetaryResult<T> {
    panic::catch_unwind(AssertUnwindSafe(call))
        .unwrap_or_else(|payload| Err(MonetaryError::provider(provider, panic_message(&*payload))))
}

/// Runs a provider call, logging and discarding any failure.
pub(crate) fn isolate<T>(
    contract: &'static str,
    provider: &str,
    call: impl FnOnce() -> MonetaryResult<T>,
) -> Option<T> {
    match call_guarded(provider, call) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!(contract, provider, error = %err, "Provider failed, skipping");
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}

/// Declared name of `provider`. A panic while naming is logged and read as
/// no name.
pub(crate) fn declared_name<C: ?Sized + Provider>(provider: &C) -> Option<String> {
    isolate("provider_name", provider.implementation(), || {
        Ok(provider.provider_name().map(str::to_owned))
    })
    .flatten()
}

/// Pairs every provider with its declared name, in discovery order.
pub(crate) fn named<C: ?Sized + Provider>(providers: &[Arc<C>]) -> Vec<(Option<String>, Arc<C>)> {
    providers
        .iter()
        .map(|provider| (declared_name(&**provider), Arc::clone(provider)))
        .collect()
}

/// Declared names of `providers`. Unnamed providers are logged and left out.
pub(crate) fn provider_names<C: ?Sized + Provider>(providers: &[Arc<C>]) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for provider in providers {
        let implementation = provider.implementation();
        match call_guarded(implementation, || Ok(provider.provider_name().map(str::to_owned))) {
            Ok(Some(name)) => {
                names.insert(name);
            }
            Ok(None) => tracing::warn!(
                implementation,
                "Provider declares no name; it is excluded from every chain"
            ),
            Err(err) => tracing::error!(
                implementation,
                error = %err,
                "Provider failed to report its name; it is excluded from every chain"
            ),
        }
    }
    names
}

/// Effective chain for `query` against the discovered `providers`.
pub(crate) fn chain_for<C: ?Sized + Provider, Q>(query: &Query<Q>, providers: &[Arc<C>]) -> Vec<String> {
    let chain = effective_chain(query, || default_chain(provider_names(providers)));
    tracing::debug!(contract = std::any::type_name::<C>(), ?chain, "Effective provider chain");
    chain
}

/// Invokes `call` on every provider selected by `chain`, in chain order.
///
/// Results are appended as they come; duplicates are kept. Failing providers
/// are logged and skipped.
pub(crate) fn collect_in_chain<C, T>(
    providers: &[Arc<C>],
    chain: &[String],
    mode: NameMatch,
    call: impl Fn(&C) -> MonetaryResult<T>,
) -> Vec<T>
where
    C: ?Sized + Provider,
{
    let contract = std::any::type_name::<C>();
    let named = named(providers);
    let mut results = Vec::new();
    for requested in chain {
        for (name, provider) in mode.select(&named, requested, |(name, _)| name.as_deref()) {
            let name = name.as_deref().unwrap_or(requested);
            if let Some(value) = isolate(contract, name, || call(provider)) {
                results.push(value);
            }
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spi::Service;

    #[test]
    fn test_call_guarded_turns_panic_into_error() {
        let result: MonetaryResult<u32> = call_guarded("boom", || panic!("kaput"));
        assert_eq!(
            result,
            Err(MonetaryError::provider("boom", "panicked: kaput"))
        );
    }

    #[test]
    fn test_isolate_passes_values_through() {
        assert_eq!(isolate("test", "ok", || Ok(7)), Some(7));
        assert_eq!(
            isolate::<u32>("test", "bad", || Err(MonetaryError::InvalidQuery("x".into()))),
            None
        );
    }

    struct Named(&'static str);

    impl Service for Named {}

    impl Provider for Named {
        fn provider_name(&self) -> Option<&str> {
            Some(self.0)
        }
    }

    struct Tongueless;

    impl Service for Tongueless {}

    impl Provider for Tongueless {
        fn provider_name(&self) -> Option<&str> {
            panic!("name lookup failed")
        }
    }

    fn providers() -> Vec<Arc<dyn Provider>> {
        vec![Arc::new(Tongueless), Arc::new(Named("beta")), Arc::new(Named("alpha"))]
    }

    #[test]
    fn test_panicking_name_is_left_out() {
        let providers = providers();
        assert_eq!(declared_name(&*providers[0]), None);
        assert_eq!(declared_name(&*providers[1]).as_deref(), Some("beta"));
        assert_eq!(
            provider_names(&providers),
            BTreeSet::from(["alpha".to_string(), "beta".to_string()])
        );
    }

    #[test]
    fn test_chain_walk_survives_panicking_name() {
        let providers = providers();
        let chain = vec!["alpha".to_string(), "beta".to_string()];
        let answered = collect_in_chain(&providers, &chain, NameMatch::Exact, |provider| {
            Ok(provider.provider_name().unwrap_or_default().to_uppercase())
        });
        assert_eq!(answered, ["ALPHA", "BETA"]);
    }
}

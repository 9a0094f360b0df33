//! Provider chain computation.
//!
//! Every domain resolver consults providers in the order given by the
//! *effective chain*: the query's explicit provider names when present,
//! otherwise the domain's default chain. The default chain is the set of
//! discovered names, deduplicated and sorted, so it never depends on the order
//! in which providers were registered.

use std::collections::BTreeSet;

use regex::Regex;

use super::Query;

/// Deduplicated, lexicographically sorted chain of `names`.
pub fn default_chain<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names
        .into_iter()
        .map(Into::into)
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// The chain a query should be answered with.
///
/// An explicit chain is used verbatim, duplicates included. An empty one
/// means "use the default chain", never "use no providers".
pub fn effective_chain<C>(query: &Query<C>, default: impl FnOnce() -> Vec<String>) -> Vec<String> {
    if query.provider_names().is_empty() {
        default()
    } else {
        query.provider_names().to_vec()
    }
}

/// How a chain entry selects providers by declared name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    /// Declared name equals the chain entry.
    Exact,
    /// Exact first; only if nothing matches exactly, the entry is taken as a
    /// regular expression that must match the whole declared name.
    ExactThenPattern,
}

impl NameMatch {
    /// Candidates selected by `requested`, in candidate order.
    pub fn select<'a, T>(
        self,
        candidates: &'a [T],
        requested: &str,
        name_of: impl Fn(&T) -> Option<&str>,
    ) -> Vec<&'a T> {
        let exact: Vec<&T> = candidates
            .iter()
            .filter(|candidate| name_of(candidate) == Some(requested))
            .collect();
        if !exact.is_empty() || self == Self::Exact {
            return exact;
        }

        let Some(pattern) = full_match(requested) else {
            return Vec::new();
        };
        candidates
            .iter()
            .filter(|candidate| name_of(candidate).is_some_and(|name| pattern.is_match(name)))
            .collect()
    }
}

fn full_match(pattern: &str) -> Option<Regex> {
    match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(regex) => Some(regex),
        Err(err) => {
            tracing::warn!(pattern, error = %err, "Invalid provider name pattern; matching nothing");
            None
        }
    }
}

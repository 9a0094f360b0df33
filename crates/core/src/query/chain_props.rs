//! Property-based tests for default chain computation.

use proptest::prelude::*;

use super::default_chain;

fn names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e]{1,3}", 0..12)
}

proptest! {
    /// The default chain depends only on the set of names, never on order.
    #[test]
    fn prop_default_chain_ignores_discovery_order(
        (original, shuffled) in names().prop_flat_map(|names| {
            let shuffled = Just(names.clone()).prop_shuffle();
            (Just(names), shuffled)
        })
    ) {
        prop_assert_eq!(default_chain(original), default_chain(shuffled));
    }

    /// The default chain is strictly ascending and covers every name.
    #[test]
    fn prop_default_chain_strictly_sorted(names in names()) {
        let chain = default_chain(names.clone());
        prop_assert!(chain.windows(2).all(|w| w[0] < w[1]));
        for name in &names {
            prop_assert!(chain.contains(name));
        }
    }
}

//! # Property-Based Tests
//!
//! Invariants of the sanitizer and the collection cache, checked with
//! proptest.

use modeler_core::primitives::MAX_IDENTIFIER_LENGTH;
use modeler_core::{
    CollectionCache, Entity, FetchOutcome, Field, FieldUuid, ModelerError, ObjectUuid,
    is_valid_identifier, sanitize_identifier,
};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::BTreeSet;

// =============================================================================
// HELPERS
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Replace(Vec<u8>),
    Upsert(u8),
    Remove(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        vec(0u8..16, 0..12).prop_map(Op::Replace),
        (0u8..16).prop_map(Op::Upsert),
        (0u8..16).prop_map(Op::Remove),
    ]
}

fn field(id: u8) -> Field {
    Field::new(format!("f{id}"))
}

fn is_unique(items: &[Field]) -> bool {
    let ids: BTreeSet<&FieldUuid> = items.iter().map(Entity::id).collect();
    ids.len() == items.len()
}

// =============================================================================
// SANITIZER
// =============================================================================

proptest! {
    /// Whatever goes in, a successful result is a valid identifier.
    #[test]
    fn sanitized_output_is_always_valid(raw in ".{0,200}") {
        if let Ok(id) = sanitize_identifier(&raw) {
            prop_assert!(is_valid_identifier(&id), "{:?} -> {:?}", raw, id);
            prop_assert!(id.len() <= MAX_IDENTIFIER_LENGTH);
        }
    }

    /// Input made only of disallowed characters always fails.
    #[test]
    fn only_disallowed_characters_fail(raw in "[ !@#$%^&*().,;:/\\\\-]{0,40}") {
        prop_assert_eq!(
            sanitize_identifier(&raw),
            Err(ModelerError::InvalidIdentifier { input: raw.clone() })
        );
    }

    /// Valid identifiers pass through untouched.
    #[test]
    fn valid_identifiers_are_fixed_points(raw in "[a-z_][a-z0-9_]{0,59}") {
        prop_assert_eq!(sanitize_identifier(&raw), Ok(raw.clone()));
    }

    /// Sanitizing twice changes nothing.
    #[test]
    fn sanitize_is_idempotent(raw in "[a-zA-Z0-9 _!-]{1,120}") {
        if let Ok(once) = sanitize_identifier(&raw) {
            prop_assert_eq!(sanitize_identifier(&once), Ok(once.clone()));
        }
    }

    /// Long valid input is truncated, not rejected.
    #[test]
    fn long_input_truncates(raw in "[a-z]{61,200}") {
        let id = sanitize_identifier(&raw).expect("valid");
        prop_assert_eq!(id.len(), MAX_IDENTIFIER_LENGTH);
        prop_assert!(raw.starts_with(&id));
    }
}

// =============================================================================
// COLLECTION CACHE
// =============================================================================

proptest! {
    /// No sequence of operations produces duplicate ids within a parent.
    #[test]
    fn ids_stay_unique(ops in vec(op(), 1..40)) {
        let parent = ObjectUuid::new("o1");
        let mut cache: CollectionCache<ObjectUuid, Field> = CollectionCache::new();
        for op in ops {
            match op {
                Op::Replace(ids) => {
                    cache.replace_all(parent.clone(), ids.into_iter().map(field).collect());
                }
                Op::Upsert(id) => cache.upsert_local(parent.clone(), field(id)),
                Op::Remove(id) => {
                    cache.remove_local(&parent, &FieldUuid::new(format!("f{id}")));
                }
            }
            prop_assert!(is_unique(cache.get_all(&parent)));
        }
    }

    /// A replace with unique items yields exactly those items, in order,
    /// whatever was cached before.
    #[test]
    fn replace_all_is_exact(
        before in vec(0u8..32, 0..16),
        after in proptest::sample::subsequence((0u8..32).collect::<Vec<_>>(), 0..16),
    ) {
        let parent = ObjectUuid::new("o1");
        let mut cache: CollectionCache<ObjectUuid, Field> = CollectionCache::new();
        cache.replace_all(parent.clone(), before.into_iter().map(field).collect());

        let expected: Vec<Field> = after.into_iter().map(field).collect();
        let dropped = cache.replace_all(parent.clone(), expected.clone());

        prop_assert_eq!(dropped, 0);
        prop_assert_eq!(cache.get_all(&parent), expected.as_slice());
    }

    /// Among overlapping fetches only the last one issued is applied.
    #[test]
    fn only_latest_fetch_applies(n in 2usize..8, order in vec(any::<u8>(), 8)) {
        let parent = ObjectUuid::new("o1");
        let mut cache: CollectionCache<ObjectUuid, Field> = CollectionCache::new();
        let mut tokens: Vec<_> = (0..n).map(|_| cache.begin_fetch(parent.clone())).collect();

        // Complete in a scrambled order.
        let mut applied = Vec::new();
        let mut i = 0;
        while !tokens.is_empty() {
            let pick = order[i % order.len()] as usize % tokens.len();
            let token = tokens.remove(pick);
            let seq = token.seq();
            if let FetchOutcome::Applied { .. } =
                cache.complete_fetch(token, vec![field(seq as u8)])
            {
                applied.push(seq);
            }
            i += 1;
        }

        prop_assert_eq!(applied.len(), 1);
        prop_assert_eq!(cache.get_all(&parent).len(), 1);
        prop_assert!(!cache.is_fetching(&parent));
    }
}

//! # Collection Cache
//!
//! A normalized, parent-keyed cache of server-owned entities.
//!
//! Each parent key (an object's uuid for fields and records, `()` for the
//! object list itself) maps to an ordered sequence of entities. The cache is
//! a derived copy of server state: it is never the source of truth, and the
//! app layer decides when it is refreshed.
//!
//! ## Invariants
//!
//! - Within one parent's sequence, entity identifiers are unique.
//! - A fetch response is applied only if it belongs to the most recently
//!   issued fetch for that parent. Responses that arrive after a newer fetch
//!   was started are reported as [`FetchOutcome::Stale`] and dropped.
//! - A local write (`upsert_local`, a successful `replace_local`,
//!   `remove_local`) supersedes every fetch in flight for that parent, so a
//!   list requested before the write cannot overwrite it.

use crate::Entity;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// FETCH TOKENS
// =============================================================================

/// Ticket for one in-flight fetch of a parent's sequence.
///
/// Issued by [`CollectionCache::begin_fetch`] and redeemed by
/// [`CollectionCache::complete_fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a fetch token must be completed or abandoned"]
pub struct FetchToken<K> {
    parent: K,
    seq: u64,
}

impl<K> FetchToken<K> {
    /// The parent this fetch targets.
    pub fn parent(&self) -> &K {
        &self.parent
    }

    /// The request sequence number.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Result of redeeming a [`FetchToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the parent's sequence.
    Applied {
        /// Entities dropped because an earlier one carried the same id.
        duplicates_dropped: usize,
    },
    /// A newer fetch for the same parent was issued; the response was dropped.
    Stale,
}

// =============================================================================
// COLLECTION CACHE
// =============================================================================

/// Parent-keyed cache of entity sequences.
#[derive(Debug, Clone)]
pub struct CollectionCache<K, T> {
    by_parent: BTreeMap<K, Vec<T>>,
    in_flight: BTreeMap<K, u64>,
    next_seq: u64,
}

impl<K, T> Default for CollectionCache<K, T> {
    fn default() -> Self {
        Self {
            by_parent: BTreeMap::new(),
            in_flight: BTreeMap::new(),
            next_seq: 0,
        }
    }
}

impl<K: Ord + Clone, T: Entity> CollectionCache<K, T> {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // READS
    // -------------------------------------------------------------------------

    /// The cached sequence for `parent`, or an empty slice if never loaded.
    pub fn get_all(&self, parent: &K) -> &[T] {
        self.by_parent.get(parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Look up one entity by id.
    pub fn get(&self, parent: &K, id: &T::Id) -> Option<&T> {
        self.get_all(parent).iter().find(|item| item.id() == id)
    }

    /// Whether `parent` has ever been loaded (possibly with zero entities).
    pub fn is_loaded(&self, parent: &K) -> bool {
        self.by_parent.contains_key(parent)
    }

    /// Parents with a cached sequence, in key order.
    pub fn parents(&self) -> impl Iterator<Item = &K> {
        self.by_parent.keys()
    }

    // -------------------------------------------------------------------------
    // WRITES
    // -------------------------------------------------------------------------

    /// Replace the sequence for `parent` wholesale.
    ///
    /// Order is preserved. If the same id appears more than once, the first
    /// occurrence wins and later ones are dropped; the number dropped is
    /// returned.
    pub fn replace_all(&mut self, parent: K, items: Vec<T>) -> usize {
        let total = items.len();
        let mut seen = BTreeSet::new();
        let unique: Vec<T> = items
            .into_iter()
            .filter(|item| seen.insert(item.id().clone()))
            .collect();
        let dropped = total - unique.len();
        self.by_parent.insert(parent, unique);
        dropped
    }

    /// Insert or replace one entity.
    ///
    /// An entity whose id is already present is replaced in place; a new one
    /// is prepended (newest first).
    pub fn upsert_local(&mut self, parent: K, item: T) {
        self.supersede_fetch(&parent);
        let items = self.by_parent.entry(parent).or_default();
        match items.iter().position(|existing| existing.id() == item.id()) {
            Some(idx) => items[idx] = item,
            None => items.insert(0, item),
        }
    }

    /// Replace one entity in place, only if its id is already cached.
    ///
    /// Returns whether a replacement happened. A miss changes nothing.
    pub fn replace_local(&mut self, parent: &K, item: T) -> bool {
        let Some(slot) = self
            .by_parent
            .get_mut(parent)
            .and_then(|items| items.iter_mut().find(|existing| existing.id() == item.id()))
        else {
            return false;
        };
        *slot = item;
        self.supersede_fetch(parent);
        true
    }

    /// Remove one entity. Returns whether it was present.
    pub fn remove_local(&mut self, parent: &K, id: &T::Id) -> bool {
        self.supersede_fetch(parent);
        let Some(items) = self.by_parent.get_mut(parent) else {
            return false;
        };
        let before = items.len();
        items.retain(|item| item.id() != id);
        items.len() != before
    }

    /// Forget everything cached for `parent`.
    pub fn evict(&mut self, parent: &K) {
        self.by_parent.remove(parent);
        self.in_flight.remove(parent);
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.by_parent.clear();
        self.in_flight.clear();
    }

    // -------------------------------------------------------------------------
    // FETCH SEQUENCING
    // -------------------------------------------------------------------------

    /// Register a new fetch for `parent`, superseding any fetch in flight.
    pub fn begin_fetch(&mut self, parent: K) -> FetchToken<K> {
        self.next_seq = self.next_seq.saturating_add(1);
        let seq = self.next_seq;
        self.in_flight.insert(parent.clone(), seq);
        FetchToken { parent, seq }
    }

    /// Apply a fetch response if its token is still current.
    pub fn complete_fetch(&mut self, token: FetchToken<K>, items: Vec<T>) -> FetchOutcome {
        if self.in_flight.get(&token.parent) != Some(&token.seq) {
            return FetchOutcome::Stale;
        }
        self.in_flight.remove(&token.parent);
        let duplicates_dropped = self.replace_all(token.parent, items);
        FetchOutcome::Applied { duplicates_dropped }
    }

    /// Give up on a fetch (the request failed). The cache is left unchanged.
    pub fn abandon_fetch(&mut self, token: FetchToken<K>) {
        if self.in_flight.get(&token.parent) == Some(&token.seq) {
            self.in_flight.remove(&token.parent);
        }
    }

    /// Drop the in-flight marker for `parent`. Every token issued so far
    /// for it will complete as [`FetchOutcome::Stale`].
    fn supersede_fetch(&mut self, parent: &K) {
        self.in_flight.remove(parent);
    }

    /// Whether a fetch for `parent` is outstanding.
    pub fn is_fetching(&self, parent: &K) -> bool {
        self.in_flight.contains_key(parent)
    }
}

// =============================================================================
// TESTS
// =============================================================================

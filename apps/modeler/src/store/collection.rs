//! # Synced Collection
//!
//! One store module: an API client plus the normalized cache it feeds.
//!
//! ## Synchronization protocol
//!
//! - `fetch` replaces the parent's cached sequence wholesale. Overlapping
//!   fetches for the same parent are sequenced; a response that returns
//!   after a newer fetch was issued is discarded.
//! - `create` refreshes only on 201; `update` on 200/204; `delete` on
//!   200/204. Any other 2xx leaves the cache untouched and the raw
//!   response is handed back for inspection.
//! - On error nothing in the cache changes and the error is returned as-is.
//! - Under [`SyncPolicy::Patch`] a confirmed mutation is written straight
//!   into the cache. A created entity is prepended, an updated one replaced
//!   in place, a deleted one removed. The write supersedes any fetch still in
//!   flight for that parent. When the response cannot be applied (no entity
//!   in the body, or an update for an id that is not cached) the parent is
//!   refetched instead.

use super::SyncPolicy;
use crate::api::{ApiResponse, ClientError, CollectionApi, unwrap_entity};
use modeler_core::primitives::{DELETE_SUCCESS, STATUS_CREATED, UPDATE_SUCCESS};
use modeler_core::{CollectionCache, Entity, FetchOutcome};
use serde_json::Value;
use tokio::sync::RwLock;

type IdOf<A> = <<A as CollectionApi>::Item as Entity>::Id;

/// What a successful mutation did on the server.
enum Change<'a, Id> {
    Created,
    Updated,
    Removed(&'a Id),
}

/// A store module for one entity type.
#[derive(Debug)]
pub struct SyncedCollection<A: CollectionApi> {
    api: A,
    cache: RwLock<CollectionCache<A::Parent, A::Item>>,
    policy: SyncPolicy,
}

impl<A: CollectionApi> SyncedCollection<A> {
    pub fn new(api: A, policy: SyncPolicy) -> Self {
        Self {
            api,
            cache: RwLock::new(CollectionCache::new()),
            policy,
        }
    }

    /// The underlying API client.
    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    // =========================================================================
    // READS (cache only)
    // =========================================================================

    /// Snapshot of the cached sequence for `parent`.
    pub async fn cached(&self, parent: &A::Parent) -> Vec<A::Item> {
        self.cache.read().await.get_all(parent).to_vec()
    }

    /// One cached entity.
    pub async fn cached_one(&self, parent: &A::Parent, id: &IdOf<A>) -> Option<A::Item> {
        self.cache.read().await.get(parent, id).cloned()
    }

    /// Whether `parent` has been fetched at least once.
    pub async fn is_loaded(&self, parent: &A::Parent) -> bool {
        self.cache.read().await.is_loaded(parent)
    }

    /// Drop everything cached for `parent`.
    pub async fn evict(&self, parent: &A::Parent) {
        self.cache.write().await.evict(parent);
    }

    /// Store an entity the server just returned from a read. Supersedes any
    /// list fetch for `parent` still in flight.
    pub(crate) async fn upsert_confirmed(&self, parent: &A::Parent, item: A::Item) {
        self.cache.write().await.upsert_local(parent.clone(), item);
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    /// List from the server and overwrite the cached sequence.
    ///
    /// Returns the list exactly as the server sent it.
    pub async fn fetch(&self, parent: &A::Parent) -> Result<Vec<A::Item>, ClientError> {
        let token = self.cache.write().await.begin_fetch(parent.clone());
        let seq = token.seq();

        let items = match self.api.list(parent).await {
            Ok(items) => items,
            Err(e) => {
                self.cache.write().await.abandon_fetch(token);
                return Err(e);
            }
        };

        let outcome = self
            .cache
            .write()
            .await
            .complete_fetch(token, items.clone());
        match outcome {
            FetchOutcome::Applied { duplicates_dropped } if duplicates_dropped > 0 => {
                tracing::warn!(
                    kind = A::KIND,
                    ?parent,
                    duplicates_dropped,
                    "server list repeated identifiers; kept first occurrence"
                );
            }
            FetchOutcome::Applied { .. } => {
                tracing::debug!(kind = A::KIND, ?parent, seq, count = items.len(), "fetch applied");
            }
            FetchOutcome::Stale => {
                tracing::debug!(kind = A::KIND, ?parent, seq, "newer fetch in flight, response discarded");
            }
        }
        Ok(items)
    }

    /// Create an entity; refresh only if the server answered 201.
    pub async fn create(
        &self,
        parent: &A::Parent,
        payload: &Value,
    ) -> Result<ApiResponse, ClientError> {
        let response = self.api.create(parent, payload).await?;
        if response.status == STATUS_CREATED {
            self.synchronize(parent, &response, Change::Created).await?;
        } else {
            tracing::debug!(kind = A::KIND, ?parent, status = response.status, "create not confirmed, cache unchanged");
        }
        Ok(response)
    }

    /// Update an entity; refresh only on 200/204.
    pub async fn update(
        &self,
        parent: &A::Parent,
        id: &IdOf<A>,
        payload: &Value,
    ) -> Result<ApiResponse, ClientError> {
        let response = self.api.update(parent, id, payload).await?;
        if response.is(UPDATE_SUCCESS) {
            self.synchronize(parent, &response, Change::Updated).await?;
        } else {
            tracing::debug!(kind = A::KIND, ?parent, %id, status = response.status, "update not confirmed, cache unchanged");
        }
        Ok(response)
    }

    /// Delete an entity; refresh only on 200/204.
    pub async fn delete(&self, parent: &A::Parent, id: &IdOf<A>) -> Result<ApiResponse, ClientError> {
        let response = self.api.delete(parent, id).await?;
        if response.is(DELETE_SUCCESS) {
            self.synchronize(parent, &response, Change::Removed(id)).await?;
        } else {
            tracing::debug!(kind = A::KIND, ?parent, %id, status = response.status, "delete not confirmed, cache unchanged");
        }
        Ok(response)
    }

    /// Bring the cache in line after a confirmed mutation.
    async fn synchronize(
        &self,
        parent: &A::Parent,
        response: &ApiResponse,
        change: Change<'_, IdOf<A>>,
    ) -> Result<(), ClientError> {
        match (self.policy, change) {
            (SyncPolicy::Refetch, _) => {
                self.fetch(parent).await?;
            }
            (SyncPolicy::Patch, Change::Removed(id)) => {
                self.cache.write().await.remove_local(parent, id);
            }
            (SyncPolicy::Patch, Change::Created) => match unwrap_entity::<A::Item>(&response.body) {
                Ok(item) => self.cache.write().await.upsert_local(parent.clone(), item),
                Err(e) => {
                    tracing::debug!(kind = A::KIND, ?parent, error = %e, "response carries no entity, refetching");
                    self.fetch(parent).await?;
                }
            },
            (SyncPolicy::Patch, Change::Updated) => match unwrap_entity::<A::Item>(&response.body) {
                Ok(item) => {
                    let replaced = self.cache.write().await.replace_local(parent, item);
                    if !replaced {
                        tracing::debug!(kind = A::KIND, ?parent, "updated entity not cached, refetching");
                        self.fetch(parent).await?;
                    }
                }
                Err(e) => {
                    tracing::debug!(kind = A::KIND, ?parent, error = %e, "response carries no entity, refetching");
                    self.fetch(parent).await?;
                }
            },
        }
        Ok(())
    }
}

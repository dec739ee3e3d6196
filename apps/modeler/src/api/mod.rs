//! # Modeler REST API Module
//!
//! Request/response wrappers around the backend REST API.
//!
//! ## Endpoints
//!
//! - `GET|POST /objects`, `GET|PUT|DELETE /objects/{uuid}`
//! - `GET|POST /objects/{uuid}/fields`, `PUT|DELETE /objects/{uuid}/fields/{fieldUuid}`
//! - `GET|POST /objects/{uuid}/records/`, `PUT|DELETE /objects/{uuid}/records/{recordUuid}`
//!
//! List endpoints return the unwrapped body; mutation endpoints return the
//! raw [`ApiResponse`] so callers can inspect the status. Errors propagate
//! unchanged.

mod client;
mod fields;
mod objects;
mod records;

pub use client::{ApiResponse, ClientError, HttpClient};
pub use fields::FieldsApi;
pub use objects::ObjectsApi;
pub use records::RecordsApi;

use modeler_core::Entity;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::future::Future;

// =============================================================================
// COLLECTION API TRAIT
// =============================================================================

/// The four operations every entity endpoint family offers.
///
/// `Parent` is the key a collection lives under: the owning object's uuid
/// for fields and records, `()` for the object list.
pub trait CollectionApi: Send + Sync {
    /// Key of the collection.
    type Parent: Ord + Clone + fmt::Debug + Send + Sync;
    /// Entity type of the collection.
    type Item: Entity<Id: Send + Sync> + DeserializeOwned + Send + Sync;

    /// Short name used in logs (`objects`, `fields`, `records`).
    const KIND: &'static str;

    /// List the collection.
    fn list(
        &self,
        parent: &Self::Parent,
    ) -> impl Future<Output = Result<Vec<Self::Item>, ClientError>> + Send;

    /// Create an entity.
    fn create(
        &self,
        parent: &Self::Parent,
        payload: &Value,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;

    /// Update an entity.
    fn update(
        &self,
        parent: &Self::Parent,
        id: &<Self::Item as Entity>::Id,
        payload: &Value,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;

    /// Delete an entity.
    fn delete(
        &self,
        parent: &Self::Parent,
        id: &<Self::Item as Entity>::Id,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;
}

// =============================================================================
// BODY HELPERS
// =============================================================================

/// Decode a list body.
///
/// A body that is not a JSON array is treated as an empty list.
pub fn decode_list<T: DeserializeOwned>(kind: &str, body: Value) -> Result<Vec<T>, ClientError> {
    match body {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(ClientError::decode))
            .collect(),
        other => {
            tracing::warn!(kind, body = %other, "list body is not an array, treating as empty");
            Ok(Vec::new())
        }
    }
}

/// Decode one entity from a body, reading through its envelope key
/// (`{"object": {...}}`) when present.
pub fn unwrap_entity<T: Entity + DeserializeOwned>(body: &Value) -> Result<T, ClientError> {
    let inner = body.get(T::ENVELOPE).unwrap_or(body);
    serde_json::from_value(inner.clone()).map_err(ClientError::decode)
}

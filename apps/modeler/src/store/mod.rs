//! # Store Module
//!
//! Per-entity store modules and the application-state object that owns
//! them.
//!
//! The cache in each store is a derived copy of server state. After every
//! confirmed mutation it is brought back in line with the server according
//! to one [`SyncPolicy`], applied the same way to objects, fields and
//! records.

mod collection;
mod fields;
mod objects;
mod records;

pub use collection::SyncedCollection;
pub use fields::FieldStore;
pub use objects::ObjectStore;
pub use records::RecordStore;

use crate::api::{ApiResponse, ClientError, FieldsApi, HttpClient, ObjectsApi, RecordsApi};
use modeler_core::ObjectUuid;
use modeler_core::primitives::DELETE_SUCCESS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// SYNC POLICY
// =============================================================================

/// How the cache follows a confirmed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPolicy {
    /// Re-list the whole collection from the server.
    #[default]
    Refetch,
    /// Apply the entity from the mutation response (or remove it) locally.
    /// Falls back to a refetch when the response carries no entity.
    Patch,
}

impl FromStr for SyncPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "refetch" => Ok(Self::Refetch),
            "patch" => Ok(Self::Patch),
            other => Err(format!("unknown sync policy '{other}' (expected refetch or patch)")),
        }
    }
}

impl fmt::Display for SyncPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refetch => f.write_str("refetch"),
            Self::Patch => f.write_str("patch"),
        }
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// All store modules, shared by reference for the lifetime of the app.
pub struct AppStore {
    pub objects: ObjectStore,
    pub fields: FieldStore,
    pub records: RecordStore,
}

impl AppStore {
    /// Build the three stores over one HTTP client.
    pub fn new(client: HttpClient, policy: SyncPolicy) -> Self {
        Self {
            objects: ObjectStore::new(ObjectsApi::new(client.clone()), policy),
            fields: FieldStore::new(FieldsApi::new(client.clone()), policy),
            records: RecordStore::new(RecordsApi::new(client), policy),
        }
    }

    /// Delete an object and forget its cached fields and records.
    pub async fn delete_object(&self, uuid: &ObjectUuid) -> Result<ApiResponse, ClientError> {
        let response = self.objects.delete_object(uuid).await?;
        if response.is(DELETE_SUCCESS) {
            self.fields.evict(uuid).await;
            self.records.evict(uuid).await;
        }
        Ok(response)
    }
}

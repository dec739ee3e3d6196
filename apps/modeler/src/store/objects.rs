//! Object store: the flat object list.

use super::SyncedCollection;
use crate::api::{ApiResponse, ClientError, ObjectsApi};
use modeler_core::{Object, ObjectUuid};
use serde_json::Value;

/// Store module for objects. The list lives under the unit parent key.
pub type ObjectStore = SyncedCollection<ObjectsApi>;

impl SyncedCollection<ObjectsApi> {
    /// Fetch the object list.
    pub async fn load(&self) -> Result<Vec<Object>, ClientError> {
        self.fetch(&()).await
    }

    /// Cached object list.
    pub async fn all(&self) -> Vec<Object> {
        self.cached(&()).await
    }

    /// Cached object by uuid.
    pub async fn by_id(&self, uuid: &ObjectUuid) -> Option<Object> {
        self.cached_one(&(), uuid).await
    }

    /// Fetch one object from the server and update it in the list.
    pub async fn fetch_one(&self, uuid: &ObjectUuid) -> Result<Object, ClientError> {
        let object = self.api().get(uuid).await?;
        self.upsert_confirmed(&(), object.clone()).await;
        Ok(object)
    }

    pub async fn create_object(&self, payload: &Value) -> Result<ApiResponse, ClientError> {
        self.create(&(), payload).await
    }

    pub async fn update_object(
        &self,
        uuid: &ObjectUuid,
        payload: &Value,
    ) -> Result<ApiResponse, ClientError> {
        self.update(&(), uuid, payload).await
    }

    pub async fn delete_object(&self, uuid: &ObjectUuid) -> Result<ApiResponse, ClientError> {
        self.delete(&(), uuid).await
    }
}

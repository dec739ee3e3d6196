//! Objects endpoints: `/objects` and `/objects/{uuid}`.

use super::{ApiResponse, ClientError, CollectionApi, HttpClient, decode_list, unwrap_entity};
use modeler_core::{Object, ObjectUuid};
use serde_json::Value;

/// Client for the object list.
#[derive(Debug, Clone)]
pub struct ObjectsApi {
    client: HttpClient,
}

impl ObjectsApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// GET /objects/{uuid} → one object.
    pub async fn get(&self, uuid: &ObjectUuid) -> Result<Object, ClientError> {
        let body = self.client.get(&format!("/objects/{uuid}")).await?;
        unwrap_entity(&body)
    }
}

impl CollectionApi for ObjectsApi {
    type Parent = ();
    type Item = Object;
    const KIND: &'static str = "objects";

    /// GET /objects
    async fn list(&self, _parent: &()) -> Result<Vec<Object>, ClientError> {
        let body = self.client.get("/objects").await?;
        decode_list(Self::KIND, body)
    }

    /// POST /objects
    async fn create(&self, _parent: &(), payload: &Value) -> Result<ApiResponse, ClientError> {
        self.client.post("/objects", payload).await
    }

    /// PUT /objects/{uuid}
    async fn update(
        &self,
        _parent: &(),
        uuid: &ObjectUuid,
        payload: &Value,
    ) -> Result<ApiResponse, ClientError> {
        self.client.put(&format!("/objects/{uuid}"), payload).await
    }

    /// DELETE /objects/{uuid}
    async fn delete(&self, _parent: &(), uuid: &ObjectUuid) -> Result<ApiResponse, ClientError> {
        self.client.delete(&format!("/objects/{uuid}")).await
    }
}

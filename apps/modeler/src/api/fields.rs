//! Fields endpoints, nested under their object.

use super::{ApiResponse, ClientError, CollectionApi, HttpClient, decode_list};
use modeler_core::{Field, FieldUuid, ObjectUuid};
use serde_json::Value;

/// Client for the fields of an object.
#[derive(Debug, Clone)]
pub struct FieldsApi {
    client: HttpClient,
}

impl FieldsApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

impl CollectionApi for FieldsApi {
    type Parent = ObjectUuid;
    type Item = Field;
    const KIND: &'static str = "fields";

    async fn list(&self, object: &ObjectUuid) -> Result<Vec<Field>, ClientError> {
        let body = self.client.get(&format!("/objects/{object}/fields")).await?;
        decode_list(Self::KIND, body)
    }

    async fn create(&self, object: &ObjectUuid, payload: &Value) -> Result<ApiResponse, ClientError> {
        self.client
            .post(&format!("/objects/{object}/fields"), payload)
            .await
    }

    async fn update(
        &self,
        object: &ObjectUuid,
        field: &FieldUuid,
        payload: &Value,
    ) -> Result<ApiResponse, ClientError> {
        self.client
            .put(&format!("/objects/{object}/fields/{field}"), payload)
            .await
    }

    async fn delete(&self, object: &ObjectUuid, field: &FieldUuid) -> Result<ApiResponse, ClientError> {
        self.client
            .delete(&format!("/objects/{object}/fields/{field}"))
            .await
    }
}

//! Records endpoints, nested under their object.
//!
//! The collection path carries a trailing slash (`/objects/{uuid}/records/`);
//! item paths do not.

use super::{ApiResponse, ClientError, CollectionApi, HttpClient, decode_list};
use modeler_core::{ObjectUuid, Record, RecordUuid};
use serde_json::Value;

/// Client for the records of an object.
#[derive(Debug, Clone)]
pub struct RecordsApi {
    client: HttpClient,
}

impl RecordsApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

impl CollectionApi for RecordsApi {
    type Parent = ObjectUuid;
    type Item = Record;
    const KIND: &'static str = "records";

    async fn list(&self, object: &ObjectUuid) -> Result<Vec<Record>, ClientError> {
        let body = self.client.get(&format!("/objects/{object}/records/")).await?;
        decode_list(Self::KIND, body)
    }

    async fn create(&self, object: &ObjectUuid, payload: &Value) -> Result<ApiResponse, ClientError> {
        self.client
            .post(&format!("/objects/{object}/records/"), payload)
            .await
    }

    async fn update(
        &self,
        object: &ObjectUuid,
        record: &RecordUuid,
        payload: &Value,
    ) -> Result<ApiResponse, ClientError> {
        self.client
            .put(&format!("/objects/{object}/records/{record}"), payload)
            .await
    }

    async fn delete(&self, object: &ObjectUuid, record: &RecordUuid) -> Result<ApiResponse, ClientError> {
        self.client
            .delete(&format!("/objects/{object}/records/{record}"))
            .await
    }
}

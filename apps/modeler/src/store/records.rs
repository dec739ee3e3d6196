//! Record store: records cached per owning object.

use super::SyncedCollection;
use crate::api::RecordsApi;
use modeler_core::{ObjectUuid, Record};

/// Store module for records.
pub type RecordStore = SyncedCollection<RecordsApi>;

impl SyncedCollection<RecordsApi> {
    /// Cached records of `object`, in server order.
    pub async fn records_for(&self, object: &ObjectUuid) -> Vec<Record> {
        self.cached(object).await
    }
}

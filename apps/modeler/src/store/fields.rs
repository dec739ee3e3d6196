//! Field store: fields cached per owning object.

use super::SyncedCollection;
use crate::api::FieldsApi;
use modeler_core::{Field, ObjectUuid};

/// Store module for fields.
pub type FieldStore = SyncedCollection<FieldsApi>;

impl SyncedCollection<FieldsApi> {
    /// Cached fields of `object`, in server order.
    pub async fn fields_for(&self, object: &ObjectUuid) -> Vec<Field> {
        self.cached(object).await
    }
}

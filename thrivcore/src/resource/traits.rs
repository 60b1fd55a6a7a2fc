use async_trait::async_trait;
use crate::error::BackendError;
use super::{Resource, ResourceRecord, Resources};

#[async_trait]
pub trait ResourceBackend {
    async fn insert_resource(
        &self,
        record: &ResourceRecord,
        last_updated: i64,
    ) -> Result<i64, BackendError>;
    async fn update_resource(
        &self,
        id: i64,
        record: &ResourceRecord,
        last_updated: i64,
    ) -> Result<bool, BackendError>;
    /// Removes the resource along with its favorites, category
    /// associations and availabilities as a single transaction.
    async fn delete_resource(
        &self,
        id: i64,
    ) -> Result<bool, BackendError>;
    async fn get_resource(
        &self,
        id: i64,
    ) -> Result<Option<Resource>, BackendError>;
    /// Ordered by name, then id.
    async fn list_resources(
        &self,
    ) -> Result<Resources, BackendError>;
    /// Returned in the same order as `ids`; unknown ids are skipped.
    async fn list_resources_by_ids(
        &self,
        ids: &[i64],
    ) -> Result<Resources, BackendError>;
    async fn list_resource_ids_by_institution(
        &self,
        institution_id: i64,
    ) -> Result<Vec<i64>, BackendError>;
    async fn list_resource_ids_by_type(
        &self,
        type_id: i64,
    ) -> Result<Vec<i64>, BackendError>;
}

use async_trait::async_trait;
use crate::error::BackendError;
use super::{
    SearchDocument,
    SearchHits,
    SearchRequest,
};

#[async_trait]
pub trait SearchBackend {
    /// Inserts or fully replaces the document keyed by its resource id.
    async fn index_document(
        &self,
        document: &SearchDocument,
    ) -> Result<(), BackendError>;
    /// Removing an absent document is not an error.
    async fn remove_document(
        &self,
        resource_id: i64,
    ) -> Result<(), BackendError>;
    async fn get_document(
        &self,
        resource_id: i64,
    ) -> Result<Option<SearchDocument>, BackendError>;
    async fn list_document_ids(
        &self,
    ) -> Result<Vec<i64>, BackendError>;
    /// Returns every matching hit ranked by relevance, ignoring the
    /// pagination fields of the request.
    ///
    /// The raw total and facet tallies cover every matching document
    /// regardless of who is asking.  Callers serving a particular viewer
    /// have to recount them over the hits that viewer may see.
    async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<SearchHits, BackendError>;
}

use async_trait::async_trait;
use mockall::mock;
use thrivcore::{
    error::BackendError,
    platform::PlatformUrl,
    search::{
        SearchDocument,
        SearchHits,
        SearchRequest,
        traits::SearchBackend,
    },
};

mock! {
    pub SearchIndex {}

    #[async_trait]
    impl SearchBackend for SearchIndex {
        async fn index_document(
            &self,
            document: &SearchDocument,
        ) -> Result<(), BackendError>;
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
        async fn search(
            &self,
            request: &SearchRequest,
        ) -> Result<SearchHits, BackendError>;
    }
}

impl PlatformUrl for MockSearchIndex {
    fn url(&self) -> &str {
        "mock::search"
    }
}

/// A search index that never answers.
pub struct StalledSearchIndex;

#[async_trait]
impl SearchBackend for StalledSearchIndex {
    async fn index_document(
        &self,
        _document: &SearchDocument,
    ) -> Result<(), BackendError> {
        std::future::pending().await
    }

    async fn remove_document(
        &self,
        _resource_id: i64,
    ) -> Result<(), BackendError> {
        std::future::pending().await
    }

    async fn get_document(
        &self,
        _resource_id: i64,
    ) -> Result<Option<SearchDocument>, BackendError> {
        std::future::pending().await
    }

    async fn list_document_ids(
        &self,
    ) -> Result<Vec<i64>, BackendError> {
        std::future::pending().await
    }

    async fn search(
        &self,
        _request: &SearchRequest,
    ) -> Result<SearchHits, BackendError> {
        std::future::pending().await
    }
}

impl PlatformUrl for StalledSearchIndex {
    fn url(&self) -> &str {
        "stalled::search"
    }
}

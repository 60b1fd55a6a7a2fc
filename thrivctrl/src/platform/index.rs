use thrivcore::{
    error::BackendError,
    resource::ResourceDetail,
    search::SearchDocument,
};
use std::{
    collections::BTreeSet,
    future::Future,
};

use crate::{
    error::{
        IndexDegradedError,
        PlatformError,
        SearchBackendError,
    },
    platform::{
        Platform,
        ReindexReport,
    },
};

impl Platform {
    /// Runs a search backend call under the configured timeout.
    pub(crate) async fn with_index<T>(
        &self,
        call: impl Future<Output = Result<T, BackendError>>,
    ) -> Result<T, SearchBackendError> {
        match async_std::future::timeout(self.index_timeout(), call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(SearchBackendError::Unavailable(e)),
            Err(_) => Err(SearchBackendError::Timeout(self.index_timeout())),
        }
    }

    pub(crate) async fn index_detail(
        &self,
        detail: &ResourceDetail,
    ) -> Option<IndexDegradedError> {
        let document = SearchDocument::from(detail);
        match self.with_index(self.si_platform().index_document(&document)).await {
            Ok(()) => None,
            Err(cause) => {
                log::warn!("failed to index resource {}: {cause}", detail.id);
                Some(IndexDegradedError { resource_id: detail.id, cause })
            }
        }
    }

    pub(crate) async fn unindex(
        &self,
        resource_id: i64,
    ) -> Option<IndexDegradedError> {
        match self.with_index(self.si_platform().remove_document(resource_id)).await {
            Ok(()) => None,
            Err(cause) => {
                log::warn!("failed to remove resource {resource_id} from index: {cause}");
                Some(IndexDegradedError { resource_id, cause })
            }
        }
    }

    /// Brings the documents of the listed resources in line with the
    /// relational store, collecting every failed index update.
    pub(crate) async fn reindex_ids(
        &self,
        ids: &[i64],
    ) -> Result<Vec<IndexDegradedError>, PlatformError> {
        let mut degraded = Vec::new();
        for id in ids.iter() {
            let result = match self.rd_platform().get_resource_detail(*id).await? {
                Some(detail) => self.index_detail(&detail).await,
                None => self.unindex(*id).await,
            };
            degraded.extend(result);
        }
        Ok(degraded)
    }

    /// Out of band retry for a single resource.
    pub async fn reindex_resource(
        &self,
        id: i64,
    ) -> Result<(), PlatformError> {
        match self.reindex_ids(&[id]).await?.pop() {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// Reconciles the whole index with the relational store: every
    /// resource is indexed and every document without a resource removed.
    pub async fn reindex_all(&self) -> Result<ReindexReport, PlatformError> {
        let resources = self.rd_platform().list_resources().await?;
        let known = resources.iter()
            .map(|resource| resource.id)
            .collect::<BTreeSet<_>>();
        let mut report = ReindexReport::default();

        for resource in resources.into_iter() {
            let detail = self.rd_platform().expand_resource(resource).await?;
            let document = SearchDocument::from(&detail);
            self.with_index(self.si_platform().index_document(&document)).await?;
            report.indexed += 1;
        }

        let orphans = self.with_index(self.si_platform().list_document_ids()).await?
            .into_iter()
            .filter(|id| !known.contains(id))
            .collect::<Vec<_>>();
        for id in orphans.into_iter() {
            self.with_index(self.si_platform().remove_document(id)).await?;
            report.removed += 1;
        }

        log::info!("reindexed {} resource(s), removed {} orphaned document(s)", report.indexed, report.removed);
        Ok(report)
    }
}

use std::time::Duration;
use test_thriv::{
    fixture::Directory,
    search::{
        MockSearchIndex,
        StalledSearchIndex,
    },
};
use thrivcore::{
    ac::Agent,
    error::BackendError,
    resource::ResourceData,
    search::{
        SearchDocument,
        SearchRequest,
        SearchResultSet,
    },
};
use thrivctrl::{
    error::{
        PlatformError,
        SearchBackendError,
    },
    platform::ReindexReport,
    Platform,
};

fn rename(name: &str) -> ResourceData {
    ResourceData {
        name: Some(name.into()),
        ..Default::default()
    }
}

async fn search(platform: &Platform, query: &str) -> anyhow::Result<SearchResultSet> {
    Ok(platform.search(&SearchRequest::new(query), &Agent::Anonymous).await?)
}

#[async_std::test]
async fn renamed_resource_found_by_new_name() -> anyhow::Result<()> {
    let directory = Directory::new().await?;
    let platform = &directory.platform;
    let id = platform.create_resource(&ResourceData {
        approved: Some("Approved".into()),
        segment_id: Some(directory.segments[0]),
        ..rename("Flash Gordon's zappy raygun")
    }, &directory.admin).await?.into_result()?.id;

    assert_eq!(search(platform, "zappy").await?.resource_ids(), [id]);
    assert_eq!(search(platform, "zorpy").await?.total, 0);

    platform.update_resource(id, &rename("Flash Gordon's zorpy raygun"), &directory.admin).await?
        .into_result()?;
    assert_eq!(search(platform, "zappy").await?.total, 0);
    assert_eq!(search(platform, "zorpy").await?.resource_ids(), [id]);
    assert_eq!(search(platform, "ZORPY Raygun").await?.resource_ids(), [id]);
    Ok(())
}

#[async_std::test]
async fn delete_propagates() -> anyhow::Result<()> {
    let directory = Directory::new().await?;
    let platform = &directory.platform;
    let id = directory.resource(6);
    platform.add_favorite(id, &directory.i1_user).await?;

    let committed = platform.delete_resource(id, &directory.admin).await?;
    assert!(!committed.is_degraded());
    assert!(directory.si.get_document(id).await?.is_none());
    assert!(platform.favorites(&directory.i1_user).await?.is_empty());
    let result = platform.search(&SearchRequest::new(""), &Agent::Anonymous).await?;
    assert_eq!(result.total, 3);
    assert!(!result.resource_ids().contains(&id));
    Ok(())
}

#[async_std::test]
async fn failed_index_update_is_reported() -> anyhow::Result<()> {
    let directory = Directory::new().await?;
    let mut index = MockSearchIndex::new();
    index.expect_index_document()
        .times(1)
        .returning(|_| Err(BackendError::Unknown));
    let degraded = directory.builder()
        .si_platform(index)
        .build()?;
    let id = directory.resource(2);

    let committed = degraded.update_resource(id, &rename("Renamed"), &directory.admin).await?;
    assert!(committed.is_degraded());
    assert_eq!(committed.degraded[0].resource_id, id);
    assert!(matches!(committed.degraded[0].cause, SearchBackendError::Unavailable(_)));
    // the relational write stands
    assert_eq!(committed.name, "Renamed");
    let detail = directory.platform.get_resource(id, &Agent::Anonymous).await?;
    assert_eq!(detail.name, "Renamed");
    let stale = directory.si.get_document(id).await?.expect("document");
    assert_eq!(stale.name, "Resource 02");

    directory.platform.reindex_resource(id).await?;
    let fresh = directory.si.get_document(id).await?.expect("document");
    assert_eq!(fresh.name, "Renamed");
    Ok(())
}

#[async_std::test]
async fn stalled_index_times_out() -> anyhow::Result<()> {
    let directory = Directory::new().await?;
    let stalled = directory.builder()
        .si_platform(StalledSearchIndex)
        .index_timeout(Duration::from_millis(50))
        .build()?;

    let committed = stalled.delete_resource(directory.resource(4), &directory.admin).await?;
    assert!(committed.is_degraded());
    assert!(matches!(
        committed.into_result(),
        Err(PlatformError::IndexDegraded(e)) if matches!(e.cause, SearchBackendError::Timeout(_)),
    ));
    assert!(directory.platform.get_resource(directory.resource(4), &directory.admin).await
        .expect_err("deleted")
        .is_not_found());

    assert!(matches!(
        stalled.search(&SearchRequest::new(""), &Agent::Anonymous).await,
        Err(PlatformError::Search(SearchBackendError::Timeout(_))),
    ));

    // the orphaned document is dropped on reconciliation
    let report = directory.platform.reindex_all().await?;
    assert_eq!(report, ReindexReport { indexed: 15, removed: 1 });
    Ok(())
}

#[async_std::test]
async fn reindex_all_reconciles() -> anyhow::Result<()> {
    let directory = Directory::new().await?;
    let platform = &directory.platform;
    directory.si.remove_document(directory.resource(10)).await?;
    directory.si.index_document(&SearchDocument {
        resource_id: 999,
        name: "Orphan".into(),
        ..Default::default()
    }).await?;
    let result = platform.search(&SearchRequest::new(""), &Agent::Anonymous).await?;
    assert_eq!(result.total, 3);

    let report = platform.reindex_all().await?;
    assert_eq!(report, ReindexReport { indexed: 16, removed: 1 });
    assert!(directory.si.get_document(999).await?.is_none());
    let result = platform.search(&SearchRequest::new(""), &Agent::Anonymous).await?;
    assert_eq!(result.total, 4);
    Ok(())
}

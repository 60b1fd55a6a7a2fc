use test_thriv::{
    fixture::{
        Directory,
        OWNER1,
        OWNER2,
    },
    mail::CapturingMailer,
};
use std::sync::Arc;
use thrivcore::{
    ac::Agent,
    category::CategoryData,
    resource::ResourceData,
};
use thrivctrl::error::{
    PermissionError,
    PlatformError,
};

#[async_std::test]
async fn co_owner_may_edit() -> anyhow::Result<()> {
    let directory = Directory::new().await?;
    let platform = &directory.platform;
    let id = directory.resource(1);
    let change = ResourceData {
        description: Some(Some("Shared instrument".into())),
        ..Default::default()
    };
    assert!(matches!(
        platform.update_resource(id, &change, &directory.owner1).await,
        Err(PlatformError::NotFound(_)),
    ));

    platform.update_resource(id, &ResourceData {
        owner: Some(Some(format!("{OWNER2}; {}", OWNER1.to_uppercase()))),
        ..Default::default()
    }, &directory.owner2).await?;
    let detail = platform.update_resource(id, &change, &directory.owner1).await?.into_result()?;
    assert_eq!(detail.description.as_deref(), Some("Shared instrument"));
    assert_eq!(
        platform.list_owned_resources(&directory.owner1).await?.len(),
        9,
    );
    Ok(())
}

#[async_std::test]
async fn approval_does_not_leak_privacy() -> anyhow::Result<()> {
    let directory = Directory::new().await?;
    let platform = &directory.platform;
    let id = directory.resource(3);
    assert!(matches!(
        platform.update_resource(id, &ResourceData {
            approved: Some("Approved".into()),
            ..Default::default()
        }, &directory.i2_user).await,
        Err(PlatformError::NotFound(_)),
    ));
    platform.update_resource(id, &ResourceData {
        approved: Some("Approved".into()),
        ..Default::default()
    }, &directory.owner2).await?.into_result()?;
    // still private to its institution
    assert!(platform.get_resource(id, &Agent::Anonymous).await
        .expect_err("private")
        .is_not_found());
    assert!(platform.get_resource(id, &directory.i1_user).await
        .expect_err("private")
        .is_not_found());
    assert_eq!(platform.get_resource(id, &directory.i2_user).await?.id, id);
    Ok(())
}

#[async_std::test]
async fn popular_resources_in_category() -> anyhow::Result<()> {
    let directory = Directory::new().await?;
    let platform = &directory.platform;
    let category = platform.add_category(&CategoryData {
        name: "Instruments".into(),
        color: Some("#00ff00".into()),
        ..Default::default()
    }, &directory.admin).await?;
    for n in [2, 6, 8, 10] {
        platform.add_resource_category(directory.resource(n), category.id, &directory.admin).await?;
    }
    platform.add_favorite(directory.resource(6), &directory.i1_user).await?;
    platform.add_favorite(directory.resource(6), &directory.i2_user).await?;
    platform.add_favorite(directory.resource(10), &directory.i1_user).await?;
    platform.add_favorite(directory.resource(8), &directory.i1_user).await?;
    platform.add_favorite(directory.resource(8), &directory.owner2).await?;
    platform.add_favorite(directory.resource(8), &directory.admin).await?;

    let ids = platform.category_resources(category.id, &Agent::Anonymous).await?
        .iter()
        .map(|r| r.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, [directory.resource(6), directory.resource(10), directory.resource(2)]);
    let ids = platform.category_resources(category.id, &directory.i1_user).await?
        .iter()
        .map(|r| r.id)
        .collect::<Vec<_>>();
    assert_eq!(ids[0], directory.resource(8));

    let node = platform.get_category(category.id).await?;
    assert_eq!(node.resource_count, 4);
    assert_eq!(
        platform.favorite_resources(&directory.i1_user).await?.len(),
        3,
    );
    Ok(())
}

#[async_std::test]
async fn availability_by_institution() -> anyhow::Result<()> {
    let directory = Directory::new().await?;
    let platform = &directory.platform;
    let id = directory.resource(2);
    let [i1, i2] = directory.institutions;
    platform.set_availabilities(id, &[(i1, true), (i2, false)], &directory.owner2).await?;
    let detail = platform.get_resource(id, &Agent::Anonymous).await?;
    assert_eq!(
        detail.availabilities.iter()
            .map(|a| (a.institution_id, a.available))
            .collect::<Vec<_>>(),
        [(i1, true), (i2, false)],
    );
    assert!(matches!(
        platform.set_availabilities(id, &[], &directory.i1_user).await,
        Err(PlatformError::Permission(PermissionError::Denied)),
    ));
    Ok(())
}

#[async_std::test]
async fn approval_request_mailed() -> anyhow::Result<()> {
    let directory = Directory::new().await?;
    let mailer = Arc::new(CapturingMailer::default());
    let platform = directory.builder()
        .arc_mailer(mailer.clone())
        .approval_recipient("approvals@example.com")
        .build()?;
    let message = platform.request_approval(directory.resource(9), &directory.owner1).await?;
    assert_eq!(message.to, "approvals@example.com");
    assert!(message.body.contains(OWNER1));
    assert!(message.body.contains("Resource 09"));
    assert_eq!(mailer.messages().len(), 1);
    Ok(())
}

use thrivac::owner::is_owner;
use thrivcore::{
    ac::agent::Agent,
    error::BackendError,
    resource::{
        Approval,
        Resource,
        ResourceData,
        ResourceDetail,
        ResourceDetails,
        ResourceRecord,
    },
    search::{
        Filter,
        SearchDocument,
    },
};

use crate::{
    chrono::Utc,
    error::{
        NotFoundError,
        PlatformError,
        ValidationError,
    },
    platform::{
        Committed,
        DEFAULT_PAGE_SIZE,
        Platform,
    },
};

// `Some(None)` clears the field, `None` keeps what is stored.
fn or_existing<T: Clone>(
    value: &Option<Option<T>>,
    existing: Option<&Resource>,
    f: impl FnOnce(&Resource) -> Option<T>,
) -> Option<T> {
    match value {
        Some(value) => value.clone(),
        None => existing.and_then(f),
    }
}

// Validation.
impl Platform {
    /// Produces the record to persist from the supplied fields, falling
    /// back to the existing resource for every absent field.  Nullable
    /// fields given as `Some(None)` are cleared.
    pub(crate) async fn validate_resource_data(
        &self,
        data: &ResourceData,
        existing: Option<&Resource>,
    ) -> Result<ResourceRecord, PlatformError> {
        let name = data.name.as_deref()
            .map(str::trim)
            .or(existing.map(|r| r.name.as_str()))
            .filter(|name| !name.is_empty())
            .ok_or(ValidationError::MissingField("name"))?
            .to_string();

        let segment_id = data.segment_id
            .or(existing.map(|r| r.segment_id))
            .ok_or(ValidationError::MissingField("segment"))?;
        if self.rd_platform().get_segment(segment_id).await?.is_none() {
            Err(ValidationError::UnknownReference("segment", segment_id))?
        }

        let type_id = or_existing(&data.type_id, existing, |r| r.type_id);
        if let Some(type_id) = type_id {
            if self.rd_platform().get_type(type_id).await?.is_none() {
                Err(ValidationError::UnknownReference("type", type_id))?
            }
        }

        let institution_id = or_existing(&data.institution_id, existing, |r| r.institution_id);
        if let Some(institution_id) = institution_id {
            if self.rd_platform().get_institution(institution_id).await?.is_none() {
                Err(ValidationError::UnknownReference("institution", institution_id))?
            }
        }

        let approved = match data.approved.as_deref() {
            Some(s) => s.parse::<Approval>()
                .map_err(|_| ValidationError::UnknownApproval(s.to_string()))?,
            None => existing.map(|r| r.approved).unwrap_or_default(),
        };

        Ok(ResourceRecord {
            name,
            description: or_existing(&data.description, existing, |r| r.description.clone()),
            website: or_existing(&data.website, existing, |r| r.website.clone()),
            cost: or_existing(&data.cost, existing, |r| r.cost.clone()),
            owner: or_existing(&data.owner, existing, |r| r.owner.clone()),
            contact_email: or_existing(&data.contact_email, existing, |r| r.contact_email.clone()),
            contact_phone: or_existing(&data.contact_phone, existing, |r| r.contact_phone.clone()),
            contact_notes: or_existing(&data.contact_notes, existing, |r| r.contact_notes.clone()),
            approved,
            private: data.private
                .or(existing.map(|r| r.private))
                .unwrap_or(false),
            institution_id,
            type_id,
            segment_id,
        })
    }
}

// Resource mutation.
impl Platform {
    pub(crate) async fn resource_detail(
        &self,
        id: i64,
    ) -> Result<ResourceDetail, PlatformError> {
        self.rd_platform()
            .get_resource_detail(id)
            .await?
            .ok_or_else(|| BackendError::AppInvariantViolation(
                format!("resource {id} vanished after being written")
            ).into())
    }

    pub async fn create_resource(
        &self,
        data: &ResourceData,
        agent: &Agent,
    ) -> Result<Committed<ResourceDetail>, PlatformError> {
        self.require_user(agent)?;
        let record = self.validate_resource_data(data, None).await?;
        let ts = Utc::now().timestamp();
        let id = self.rd_platform().insert_resource(&record, ts).await?;
        log::info!("created resource {id} {:?}", record.name);
        let detail = self.resource_detail(id).await?;
        let degraded = self.index_detail(&detail).await;
        Ok(Committed::new(detail, degraded.into_iter().collect()))
    }

    pub async fn update_resource(
        &self,
        id: i64,
        data: &ResourceData,
        agent: &Agent,
    ) -> Result<Committed<ResourceDetail>, PlatformError> {
        let existing = self.editable_resource(id, agent).await?;
        let record = self.validate_resource_data(data, Some(&existing)).await?;
        let ts = Utc::now().timestamp();
        if !self.rd_platform().update_resource(id, &record, ts).await? {
            Err(NotFoundError::resource(id))?
        }
        log::info!("updated resource {id}");
        let detail = self.resource_detail(id).await?;
        let degraded = self.index_detail(&detail).await;
        Ok(Committed::new(detail, degraded.into_iter().collect()))
    }

    /// Deletes the resource together with its favorites, category
    /// associations and availabilities, then drops its search document.
    pub async fn delete_resource(
        &self,
        id: i64,
        agent: &Agent,
    ) -> Result<Committed<()>, PlatformError> {
        self.deletable_resource(id, agent).await?;
        if !self.rd_platform().delete_resource(id).await? {
            Err(NotFoundError::resource(id))?
        }
        log::info!("deleted resource {id}");
        let degraded = self.unindex(id).await;
        Ok(Committed::new((), degraded.into_iter().collect()))
    }
}

// Resource retrieval.
impl Platform {
    pub async fn get_resource(
        &self,
        id: i64,
        agent: &Agent,
    ) -> Result<ResourceDetail, PlatformError> {
        let resource = self.visible_resource(id, agent).await?;
        Ok(self.rd_platform().expand_resource(resource).await?)
    }

    /// Lists the resources visible to the agent by name.
    ///
    /// Filters carry the same semantics as search filters.  The page size
    /// defaults to `DEFAULT_PAGE_SIZE`.
    pub async fn list_resources(
        &self,
        agent: &Agent,
        filters: &[Filter],
        limit: Option<usize>,
        offset: usize,
    ) -> Result<ResourceDetails, PlatformError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
        let visible = self.filter_visible(
            agent,
            self.rd_platform().list_resources().await?,
        );
        if filters.is_empty() {
            let page = visible.into_iter()
                .skip(offset)
                .take(limit)
                .collect();
            Ok(self.rd_platform().expand_resources(page).await?)
        } else {
            let details = self.rd_platform().expand_resources(visible).await?;
            Ok(details.into_iter()
                .filter(|detail| SearchDocument::from(detail).matches_filters(filters))
                .skip(offset)
                .take(limit)
                .collect())
        }
    }

    /// Every resource listing the agent among its owners.
    pub async fn list_owned_resources(
        &self,
        agent: &Agent,
    ) -> Result<ResourceDetails, PlatformError> {
        let user = self.require_user(agent)?;
        let owned = self.rd_platform().list_resources().await?
            .into_iter()
            .filter(|resource| is_owner(resource.owner.as_deref(), &user.email))
            .collect();
        Ok(self.rd_platform().expand_resources(owned).await?)
    }
}

#[cfg(test)]
mod testing {
    use test_thriv::{
        chrono::set_timestamp,
        policy::{
            admin,
            user,
        },
    };
    use thrivcore::{
        ac::agent::Agent,
        resource::{
            Approval,
            ResourceData,
            ResourceDetails,
        },
        search::{
            FacetField,
            Filter,
        },
    };
    use crate::{
        error::{
            PermissionError,
            PlatformError,
            ValidationError,
        },
        platform::testing::{
            create_platform,
            resource_data,
        },
    };

    #[async_std::test]
    async fn create_validation() -> anyhow::Result<()> {
        let (platform, segment_id) = create_platform().await?;
        let owner = user("owner@x.com", None);

        let result = platform.create_resource(&ResourceData {
            segment_id: Some(segment_id),
            ..Default::default()
        }, &owner).await;
        assert!(matches!(result, Err(PlatformError::Validation(ValidationError::MissingField("name")))));

        let result = platform.create_resource(&ResourceData {
            name: Some("   ".into()),
            segment_id: Some(segment_id),
            ..Default::default()
        }, &owner).await;
        assert!(matches!(result, Err(PlatformError::Validation(ValidationError::MissingField("name")))));

        let result = platform.create_resource(&ResourceData {
            name: Some("No Segment".into()),
            ..Default::default()
        }, &owner).await;
        assert!(matches!(result, Err(PlatformError::Validation(ValidationError::MissingField("segment")))));

        let result = platform.create_resource(&ResourceData {
            type_id: Some(Some(42)),
            ..resource_data("Unknown Type", segment_id)
        }, &owner).await;
        assert!(matches!(result, Err(PlatformError::Validation(ValidationError::UnknownReference("type", 42)))));

        let result = platform.create_resource(&ResourceData {
            approved: Some("Unpproved".into()),
            ..resource_data("Typo", segment_id)
        }, &owner).await;
        assert!(matches!(
            result,
            Err(PlatformError::Validation(ValidationError::UnknownApproval(s))) if s == "Unpproved"
        ));

        let result = platform.create_resource(&resource_data("Anonymous", segment_id), &Agent::Anonymous).await;
        assert!(matches!(result, Err(PlatformError::Permission(PermissionError::AuthenticationRequired))));

        // nothing was written or indexed
        assert!(platform.rd_platform().list_resources().await?.is_empty());
        assert!(platform.si_platform().list_document_ids().await?.is_empty());
        Ok(())
    }

    #[async_std::test]
    async fn create_defaults() -> anyhow::Result<()> {
        let (platform, segment_id) = create_platform().await?;
        set_timestamp(1400000000);
        let committed = platform.create_resource(
            &resource_data("Defaults", segment_id),
            &user("owner@x.com", None),
        ).await?;
        assert!(!committed.is_degraded());
        let detail = committed.into_inner();
        assert_eq!(detail.approved, Approval::Unapproved);
        assert!(!detail.private);
        assert_eq!(detail.last_updated, 1400000000);
        assert_eq!(detail.segment.as_ref().map(|s| s.id), Some(segment_id));
        assert_eq!(platform.si_platform().list_document_ids().await?, [detail.id]);
        Ok(())
    }

    #[async_std::test]
    async fn update_bumps_last_updated() -> anyhow::Result<()> {
        let (platform, segment_id) = create_platform().await?;
        let owner = user("Owner@x.com", None);
        set_timestamp(1400000000);
        let id = platform.create_resource(&ResourceData {
            owner: Some(Some("owner@x.com".into())),
            description: Some(Some("kept".into())),
            ..resource_data("Before", segment_id)
        }, &owner).await?.id;

        set_timestamp(1400000100);
        let detail = platform.update_resource(id, &ResourceData {
            name: Some("After".into()),
            ..Default::default()
        }, &owner).await?.into_result()?;
        assert_eq!(detail.name, "After");
        assert_eq!(detail.description.as_deref(), Some("kept"));
        assert_eq!(detail.last_updated, 1400000100);
        let document = platform.si_platform().get_document(id).await?.expect("indexed");
        assert_eq!(document.name, "After");
        assert_eq!(document.last_updated, 1400000100);
        Ok(())
    }

    #[async_std::test]
    async fn update_clears_nullable_fields() -> anyhow::Result<()> {
        let (platform, segment_id) = create_platform().await?;
        let admin = admin("admin@x.com", None);
        let institution_id = platform.rd_platform()
            .add_institution("UVA", Some("virginia.edu"), None, false)
            .await?;
        let type_id = platform.rd_platform().add_type("Software", None).await?;
        let id = platform.create_resource(&ResourceData {
            owner: Some(Some("owner@x.com".into())),
            website: Some(Some("https://spectro.example.com".into())),
            institution_id: Some(Some(institution_id)),
            type_id: Some(Some(type_id)),
            ..resource_data("Spectrometer", segment_id)
        }, &admin).await?.id;
        let document = platform.si_platform().get_document(id).await?.expect("indexed");
        assert_eq!(document.institution_name.as_deref(), Some("UVA"));
        assert_eq!(document.type_name.as_deref(), Some("Software"));

        let detail = platform.update_resource(id, &ResourceData {
            owner: Some(None),
            institution_id: Some(None),
            type_id: Some(None),
            ..Default::default()
        }, &admin).await?.into_result()?;
        assert_eq!(detail.owner, None);
        assert_eq!(detail.institution_id, None);
        assert_eq!(detail.type_id, None);
        assert!(detail.institution.is_none());
        assert!(detail.resource_type.is_none());
        assert_eq!(detail.website.as_deref(), Some("https://spectro.example.com"));

        let document = platform.si_platform().get_document(id).await?.expect("indexed");
        assert_eq!(document.owner, None);
        assert_eq!(document.institution_name, None);
        assert_eq!(document.type_name, None);
        assert_eq!(document.website.as_deref(), Some("https://spectro.example.com"));

        // the former owner can no longer reach the resource
        assert!(platform.update_resource(id, &ResourceData {
            name: Some("Mine".into()),
            ..Default::default()
        }, &user("owner@x.com", None)).await
            .expect_err("no longer an owner")
            .is_not_found());
        Ok(())
    }

    #[async_std::test]
    async fn update_permission() -> anyhow::Result<()> {
        let (platform, segment_id) = create_platform().await?;
        let id = platform.create_resource(&ResourceData {
            owner: Some(Some("owner@x.com".into())),
            approved: Some("Approved".into()),
            ..resource_data("Public", segment_id)
        }, &user("owner@x.com", None)).await?.id;

        let change = ResourceData {
            name: Some("Vandalized".into()),
            ..Default::default()
        };
        // visible but not editable
        let result = platform.update_resource(id, &change, &user("stranger@x.com", None)).await;
        assert!(matches!(result, Err(PlatformError::Permission(PermissionError::Denied))));
        let result = platform.update_resource(id, &change, &Agent::Anonymous).await;
        assert!(matches!(result, Err(PlatformError::Permission(PermissionError::Denied))));
        let result = platform.delete_resource(id, &user("stranger@x.com", None)).await;
        assert!(matches!(result, Err(PlatformError::Permission(PermissionError::Denied))));
        assert_eq!(platform.get_resource(id, &Agent::Anonymous).await?.name, "Public");

        // invalid reference on update
        let result = platform.update_resource(id, &ResourceData {
            segment_id: Some(999),
            ..Default::default()
        }, &admin("admin@x.com", None)).await;
        assert!(matches!(
            result,
            Err(PlatformError::Validation(ValidationError::UnknownReference("segment", 999)))
        ));

        platform.update_resource(id, &change, &admin("admin@x.com", None)).await?;
        assert_eq!(platform.get_resource(id, &Agent::Anonymous).await?.name, "Vandalized");
        Ok(())
    }

    #[async_std::test]
    async fn hidden_is_not_found() -> anyhow::Result<()> {
        let (platform, segment_id) = create_platform().await?;
        let id = platform.create_resource(&ResourceData {
            owner: Some(Some("owner@x.com".into())),
            ..resource_data("Unapproved", segment_id)
        }, &user("owner@x.com", None)).await?.id;

        let stranger = user("stranger@x.com", None);
        let hidden = platform.get_resource(id, &stranger).await
            .expect_err("hidden");
        let missing = platform.get_resource(id + 100, &stranger).await
            .expect_err("missing");
        assert!(hidden.is_not_found());
        assert!(missing.is_not_found());
        // the same error for edits, so existence is never revealed
        assert!(platform.update_resource(id, &ResourceData::default(), &stranger).await
            .expect_err("hidden")
            .is_not_found());
        assert!(platform.delete_resource(id, &stranger).await
            .expect_err("hidden")
            .is_not_found());
        Ok(())
    }

    #[async_std::test]
    async fn delete() -> anyhow::Result<()> {
        let (platform, segment_id) = create_platform().await?;
        let owner = user("owner@x.com", None);
        let id = platform.create_resource(&ResourceData {
            owner: Some(Some("owner@x.com".into())),
            ..resource_data("Doomed", segment_id)
        }, &owner).await?.id;
        assert!(!platform.delete_resource(id, &owner).await?.is_degraded());
        assert!(platform.get_resource(id, &owner).await.expect_err("deleted").is_not_found());
        assert!(platform.si_platform().get_document(id).await?.is_none());
        assert!(platform.delete_resource(id, &owner).await.expect_err("deleted").is_not_found());
        Ok(())
    }

    #[async_std::test]
    async fn list_pagination_and_filters() -> anyhow::Result<()> {
        let (platform, segment_id) = create_platform().await?;
        let admin = admin("admin@x.com", None);
        for i in 0..12 {
            platform.create_resource(&ResourceData {
                approved: Some(if i % 3 == 0 { "Unapproved" } else { "Approved" }.into()),
                ..resource_data(&format!("Resource {i:02}"), segment_id)
            }, &admin).await?;
        }
        let names = |details: ResourceDetails| details
            .iter()
            .map(|d| d.name.clone())
            .collect::<Vec<_>>();

        let page = platform.list_resources(&admin, &[], None, 0).await?;
        assert_eq!(page.len(), 10);
        let page = names(platform.list_resources(&admin, &[], Some(5), 10).await?);
        assert_eq!(page, ["Resource 10", "Resource 11"]);

        // anonymous only sees the approved ones
        let page = names(platform.list_resources(&Agent::Anonymous, &[], Some(3), 0).await?);
        assert_eq!(page, ["Resource 01", "Resource 02", "Resource 04"]);

        let unapproved = [Filter::new(FacetField::Approved, "Unapproved")];
        let page = names(platform.list_resources(&admin, &unapproved, None, 0).await?);
        assert_eq!(page, ["Resource 00", "Resource 03", "Resource 06", "Resource 09"]);
        assert!(platform.list_resources(&Agent::Anonymous, &unapproved, None, 0).await?.is_empty());
        Ok(())
    }

    #[async_std::test]
    async fn owned() -> anyhow::Result<()> {
        let (platform, segment_id) = create_platform().await?;
        let admin = admin("admin@x.com", None);
        for (name, owner) in [
            ("a", "oscar@sesame.org"),
            ("b", "bigbird@sesame.org; Oscar@sesame.org"),
            ("c", "bigbird@sesame.org"),
        ] {
            platform.create_resource(&ResourceData {
                owner: Some(Some(owner.into())),
                ..resource_data(name, segment_id)
            }, &admin).await?;
        }
        let oscar = platform.list_owned_resources(&user("oscar@sesame.org", None)).await?;
        assert_eq!(oscar.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(), ["a", "b"]);
        assert!(matches!(
            platform.list_owned_resources(&Agent::Anonymous).await,
            Err(PlatformError::Permission(PermissionError::AuthenticationRequired)),
        ));
        Ok(())
    }
}

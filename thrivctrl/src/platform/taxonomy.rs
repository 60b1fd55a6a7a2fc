use thrivcore::{
    ac::agent::Agent,
    institution::{
        Institution,
        Institutions,
    },
    resource_type::{
        ResourceType,
        ResourceTypes,
    },
    segment::{
        Segment,
        Segments,
    },
};

use crate::{
    error::{
        NotFoundError,
        PlatformError,
        ValidationError,
    },
    platform::{
        Committed,
        Platform,
    },
};

fn required_name(name: &str) -> Result<&str, PlatformError> {
    match name.trim() {
        "" => Err(ValidationError::MissingField("name").into()),
        name => Ok(name),
    }
}

// Institutions
impl Platform {
    pub async fn add_institution(
        &self,
        name: &str,
        domain: Option<&str>,
        description: Option<&str>,
        hide_availability: bool,
        agent: &Agent,
    ) -> Result<Institution, PlatformError> {
        self.require_admin(agent)?;
        let name = required_name(name)?;
        let id = self.rd_platform()
            .add_institution(name, domain, description, hide_availability)
            .await?;
        log::info!("added institution {id} {name:?}");
        self.get_institution(id).await
    }

    /// Renaming an institution changes the documents of its resources, so
    /// every one of them is reindexed.
    pub async fn update_institution(
        &self,
        id: i64,
        name: &str,
        domain: Option<&str>,
        description: Option<&str>,
        hide_availability: bool,
        agent: &Agent,
    ) -> Result<Committed<Institution>, PlatformError> {
        self.require_admin(agent)?;
        let name = required_name(name)?;
        if !self.rd_platform()
            .update_institution(id, name, domain, description, hide_availability)
            .await?
        {
            Err(NotFoundError::new("institution", id))?
        }
        let ids = self.rd_platform().list_resource_ids_by_institution(id).await?;
        let degraded = self.reindex_ids(&ids).await?;
        Ok(Committed::new(self.get_institution(id).await?, degraded))
    }

    pub async fn get_institution(&self, id: i64) -> Result<Institution, PlatformError> {
        self.rd_platform()
            .get_institution(id)
            .await?
            .ok_or_else(|| NotFoundError::new("institution", id).into())
    }

    pub async fn institution_by_domain(
        &self,
        domain: &str,
    ) -> Result<Option<Institution>, PlatformError> {
        Ok(self.rd_platform().get_institution_by_domain(domain.trim()).await?)
    }

    pub async fn list_institutions(&self) -> Result<Institutions, PlatformError> {
        Ok(self.rd_platform().list_institutions().await?)
    }

    pub async fn list_institutions_with_availability(&self) -> Result<Institutions, PlatformError> {
        Ok(self.rd_platform().list_institutions_with_availability().await?)
    }
}

// Resource types
impl Platform {
    pub async fn add_type(
        &self,
        name: &str,
        description: Option<&str>,
        agent: &Agent,
    ) -> Result<ResourceType, PlatformError> {
        self.require_admin(agent)?;
        let name = required_name(name)?;
        let id = self.rd_platform().add_type(name, description).await?;
        log::info!("added resource type {id} {name:?}");
        self.get_type(id).await
    }

    pub async fn update_type(
        &self,
        id: i64,
        name: &str,
        description: Option<&str>,
        agent: &Agent,
    ) -> Result<Committed<ResourceType>, PlatformError> {
        self.require_admin(agent)?;
        let name = required_name(name)?;
        if !self.rd_platform().update_type(id, name, description).await? {
            Err(NotFoundError::new("type", id))?
        }
        let ids = self.rd_platform().list_resource_ids_by_type(id).await?;
        let degraded = self.reindex_ids(&ids).await?;
        Ok(Committed::new(self.get_type(id).await?, degraded))
    }

    /// Resources of the removed type are retained without a type.
    pub async fn delete_type(
        &self,
        id: i64,
        agent: &Agent,
    ) -> Result<Committed<()>, PlatformError> {
        self.require_admin(agent)?;
        let ids = self.rd_platform().list_resource_ids_by_type(id).await?;
        if !self.rd_platform().delete_type(id).await? {
            Err(NotFoundError::new("type", id))?
        }
        log::info!("deleted resource type {id}");
        let degraded = self.reindex_ids(&ids).await?;
        Ok(Committed::new((), degraded))
    }

    pub async fn get_type(&self, id: i64) -> Result<ResourceType, PlatformError> {
        self.rd_platform()
            .get_type(id)
            .await?
            .ok_or_else(|| NotFoundError::new("type", id).into())
    }

    pub async fn list_types(&self) -> Result<ResourceTypes, PlatformError> {
        Ok(self.rd_platform().list_types().await?)
    }
}

// Segments
impl Platform {
    pub async fn add_segment(
        &self,
        name: &str,
        description: Option<&str>,
        agent: &Agent,
    ) -> Result<Segment, PlatformError> {
        self.require_admin(agent)?;
        let name = required_name(name)?;
        if self.rd_platform().get_segment_by_name(name).await?.is_some() {
            Err(ValidationError::Duplicate("segment", name.to_string()))?
        }
        let id = self.rd_platform().add_segment(name, description).await?;
        log::info!("added segment {id} {name:?}");
        self.get_segment(id).await
    }

    pub async fn get_segment(&self, id: i64) -> Result<Segment, PlatformError> {
        self.rd_platform()
            .get_segment(id)
            .await?
            .ok_or_else(|| NotFoundError::new("segment", id).into())
    }

    pub async fn segment_by_name(&self, name: &str) -> Result<Option<Segment>, PlatformError> {
        Ok(self.rd_platform().get_segment_by_name(name.trim()).await?)
    }

    pub async fn list_segments(&self) -> Result<Segments, PlatformError> {
        Ok(self.rd_platform().list_segments().await?)
    }
}

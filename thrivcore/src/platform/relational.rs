use async_trait::async_trait;
use crate::{
    ac::traits::UserBackend,
    availability::traits::AvailabilityBackend,
    category::traits::{
        CategoryBackend,
        ResourceCategoryBackend,
    },
    error::BackendError,
    favorite::traits::FavoriteBackend,
    institution::traits::InstitutionBackend,
    platform::PlatformUrl,
    resource::{
        Resource,
        ResourceDetail,
        ResourceDetails,
        traits::ResourceBackend,
    },
    resource_type::traits::ResourceTypeBackend,
    segment::traits::SegmentBackend,
};

/// RDPlatform - Resource Directory Platform
///
/// The authoritative relational store of the directory.
///
/// This trait is applicable to everything that correctly implements the
/// relevant backends that compose this trait.
#[async_trait]
pub trait RDPlatform: ResourceBackend
    + InstitutionBackend
    + ResourceTypeBackend
    + SegmentBackend
    + CategoryBackend
    + ResourceCategoryBackend
    + AvailabilityBackend
    + FavoriteBackend
    + UserBackend

    + PlatformUrl

    + Send
    + Sync
{
    fn as_dyn(&self) -> &dyn RDPlatform;

    /// Expands the relationships of the resource.
    async fn expand_resource(
        &self,
        resource: Resource,
    ) -> Result<ResourceDetail, BackendError> {
        let institution = match resource.institution_id {
            Some(id) => self.get_institution(id).await?,
            None => None,
        };
        let resource_type = match resource.type_id {
            Some(id) => self.get_type(id).await?,
            None => None,
        };
        let segment = self.get_segment(resource.segment_id).await?;
        let availabilities = self.list_availabilities_for_resource(resource.id).await?;
        let categories = self.list_categories_for_resource(resource.id).await?;
        let favorite_count = self.count_favorites_for_resource(resource.id).await?;
        Ok(ResourceDetail {
            resource,
            institution,
            resource_type,
            segment,
            availabilities,
            categories,
            favorite_count,
        })
    }

    async fn expand_resources(
        &self,
        resources: Vec<Resource>,
    ) -> Result<ResourceDetails, BackendError> {
        let mut result = Vec::with_capacity(resources.len());
        for resource in resources.into_iter() {
            result.push(self.expand_resource(resource).await?);
        }
        Ok(result.into())
    }

    async fn get_resource_detail(
        &self,
        id: i64,
    ) -> Result<Option<ResourceDetail>, BackendError> {
        match self.get_resource(id).await? {
            Some(resource) => Ok(Some(self.expand_resource(resource).await?)),
            None => Ok(None),
        }
    }
}

impl<P: ResourceBackend
    + InstitutionBackend
    + ResourceTypeBackend
    + SegmentBackend
    + CategoryBackend
    + ResourceCategoryBackend
    + AvailabilityBackend
    + FavoriteBackend
    + UserBackend

    + PlatformUrl

    + Send
    + Sync
> RDPlatform for P {
    fn as_dyn(&self) -> &(dyn RDPlatform) {
        self
    }
}

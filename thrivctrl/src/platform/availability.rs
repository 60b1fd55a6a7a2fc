use thrivcore::{
    ac::agent::Agent,
    availability::{
        Availabilities,
        Availability,
    },
};

use crate::{
    error::{
        NotFoundError,
        PlatformError,
        ValidationError,
    },
    platform::Platform,
};

impl Platform {
    async fn check_tracking_institution(&self, institution_id: i64) -> Result<(), PlatformError> {
        match self.rd_platform().get_institution(institution_id).await? {
            Some(institution) if institution.hide_availability => {
                Err(ValidationError::AvailabilityHidden(institution_id).into())
            }
            Some(_) => Ok(()),
            None => Err(ValidationError::UnknownReference("institution", institution_id).into()),
        }
    }

    async fn require_availability(&self, id: i64) -> Result<Availability, PlatformError> {
        self.rd_platform()
            .get_availability(id)
            .await?
            .ok_or_else(|| NotFoundError::new("availability", id).into())
    }

    /// Records whether the resource is available at the institution,
    /// replacing any earlier record for that pair.
    pub async fn add_availability(
        &self,
        resource_id: i64,
        institution_id: i64,
        available: bool,
        agent: &Agent,
    ) -> Result<Availability, PlatformError> {
        self.editable_resource(resource_id, agent).await?;
        self.check_tracking_institution(institution_id).await?;
        let id = self.rd_platform()
            .add_availability(resource_id, institution_id, available)
            .await?;
        self.require_availability(id).await
    }

    pub async fn set_availabilities(
        &self,
        resource_id: i64,
        entries: &[(i64, bool)],
        agent: &Agent,
    ) -> Result<Availabilities, PlatformError> {
        self.editable_resource(resource_id, agent).await?;
        for (institution_id, _) in entries.iter() {
            self.check_tracking_institution(*institution_id).await?;
        }
        self.rd_platform().set_availabilities(resource_id, entries).await?;
        Ok(self.rd_platform().list_availabilities_for_resource(resource_id).await?)
    }

    pub async fn remove_availability(
        &self,
        id: i64,
        agent: &Agent,
    ) -> Result<(), PlatformError> {
        let availability = self.require_availability(id).await?;
        self.editable_resource(availability.resource_id, agent).await?;
        self.rd_platform().remove_availability(id).await?;
        Ok(())
    }

    pub async fn get_availability(
        &self,
        id: i64,
        agent: &Agent,
    ) -> Result<Availability, PlatformError> {
        let availability = self.require_availability(id).await?;
        match self.visible_resource(availability.resource_id, agent).await {
            Ok(_) => Ok(availability),
            Err(e) if e.is_not_found() => Err(NotFoundError::new("availability", id).into()),
            Err(e) => Err(e),
        }
    }

    pub async fn resource_availabilities(
        &self,
        resource_id: i64,
        agent: &Agent,
    ) -> Result<Availabilities, PlatformError> {
        self.visible_resource(resource_id, agent).await?;
        Ok(self.rd_platform().list_availabilities_for_resource(resource_id).await?)
    }
}

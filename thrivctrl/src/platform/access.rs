use thrivcore::{
    ac::{
        agent::Agent,
        user::User,
    },
    resource::Resource,
};

use crate::{
    error::{
        NotFoundError,
        PermissionError,
        PlatformError,
    },
    platform::Platform,
};

impl Platform {
    pub(crate) fn require_user<'a>(
        &self,
        agent: &'a Agent,
    ) -> Result<&'a User, PlatformError> {
        agent.user()
            .ok_or(PermissionError::AuthenticationRequired.into())
    }

    pub(crate) fn require_admin(
        &self,
        agent: &Agent,
    ) -> Result<(), PlatformError> {
        self.require_user(agent)?;
        if agent.is_admin() {
            Ok(())
        } else {
            Err(PermissionError::Denied.into())
        }
    }

    /// Resolves the resource only if the agent may view it.
    pub(crate) async fn visible_resource(
        &self,
        id: i64,
        agent: &Agent,
    ) -> Result<Resource, PlatformError> {
        match self.rd_platform().get_resource(id).await? {
            Some(resource) if self.enforcer().can_view(agent, &resource) => Ok(resource),
            _ => Err(NotFoundError::resource(id).into()),
        }
    }

    /// Resolves the resource only if the agent may edit it; a resource
    /// hidden from the agent is reported as not found.
    pub(crate) async fn editable_resource(
        &self,
        id: i64,
        agent: &Agent,
    ) -> Result<Resource, PlatformError> {
        let resource = self.visible_resource(id, agent).await?;
        if self.enforcer().can_edit(agent, &resource) {
            Ok(resource)
        } else {
            log::info!("agent {:?} denied edit of resource {id}", Option::<i64>::from(agent));
            Err(PermissionError::Denied.into())
        }
    }

    pub(crate) async fn deletable_resource(
        &self,
        id: i64,
        agent: &Agent,
    ) -> Result<Resource, PlatformError> {
        let resource = self.visible_resource(id, agent).await?;
        if self.enforcer().can_delete(agent, &resource) {
            Ok(resource)
        } else {
            log::info!("agent {:?} denied delete of resource {id}", Option::<i64>::from(agent));
            Err(PermissionError::Denied.into())
        }
    }

    pub(crate) fn filter_visible(
        &self,
        agent: &Agent,
        resources: impl IntoIterator<Item = Resource>,
    ) -> Vec<Resource> {
        resources.into_iter()
            .filter(|resource| self.enforcer().can_view(agent, resource))
            .collect()
    }
}

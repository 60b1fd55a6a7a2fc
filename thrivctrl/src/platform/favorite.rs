use thrivcore::{
    ac::agent::Agent,
    favorite::{
        Favorite,
        Favorites,
    },
    resource::ResourceDetails,
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
    /// Marks a resource the agent can view as one of their favorites.
    pub async fn add_favorite(
        &self,
        resource_id: i64,
        agent: &Agent,
    ) -> Result<Favorite, PlatformError> {
        let user = self.require_user(agent)?;
        self.visible_resource(resource_id, agent).await?;
        let id = self.rd_platform().add_favorite(user.id, resource_id).await?;
        self.rd_platform()
            .get_favorite(id)
            .await?
            .ok_or_else(|| NotFoundError::new("favorite", id).into())
    }

    /// Every resource is checked before any favorite is written, so a
    /// single unknown or hidden resource leaves the favorites untouched.
    pub async fn add_favorites(
        &self,
        resource_ids: &[i64],
        agent: &Agent,
    ) -> Result<Favorites, PlatformError> {
        let user = self.require_user(agent)?;
        for resource_id in resource_ids.iter() {
            self.visible_resource(*resource_id, agent).await?;
        }
        let mut result = Vec::new();
        for resource_id in resource_ids.iter() {
            let id = self.rd_platform().add_favorite(user.id, *resource_id).await?;
            result.push(self.rd_platform()
                .get_favorite(id)
                .await?
                .ok_or(NotFoundError::new("favorite", id))?);
        }
        Ok(result.into())
    }

    /// Favorites are only accessible to the user holding them and to
    /// administrators.
    pub async fn get_favorite(
        &self,
        id: i64,
        agent: &Agent,
    ) -> Result<Favorite, PlatformError> {
        let user = self.require_user(agent)?;
        let favorite = self.rd_platform()
            .get_favorite(id)
            .await?
            .ok_or(NotFoundError::new("favorite", id))?;
        if favorite.user_id != user.id && !agent.is_admin() {
            Err(PermissionError::Denied)?
        }
        Ok(favorite)
    }

    pub async fn remove_favorite(
        &self,
        id: i64,
        agent: &Agent,
    ) -> Result<(), PlatformError> {
        self.get_favorite(id, agent).await?;
        self.rd_platform().remove_favorite(id).await?;
        Ok(())
    }

    pub async fn favorites(
        &self,
        agent: &Agent,
    ) -> Result<Favorites, PlatformError> {
        let user = self.require_user(agent)?;
        Ok(self.rd_platform().list_favorites_for_user(user.id).await?)
    }

    /// The favorited resources the agent can still view.
    pub async fn favorite_resources(
        &self,
        agent: &Agent,
    ) -> Result<ResourceDetails, PlatformError> {
        let ids = self.favorites(agent).await?
            .iter()
            .map(|favorite| favorite.resource_id)
            .collect::<Vec<_>>();
        let visible = self.filter_visible(
            agent,
            self.rd_platform().list_resources_by_ids(&ids).await?,
        );
        Ok(self.rd_platform().expand_resources(visible).await?)
    }
}

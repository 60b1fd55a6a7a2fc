use serde::{Deserialize, Serialize};
use crate::macros::collection;

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub resource_id: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Favorites(Vec<Favorite>);

collection!(Favorites, Favorite);

pub mod traits {
    use async_trait::async_trait;
    use crate::error::BackendError;
    use super::{Favorite, Favorites};

    #[async_trait]
    pub trait FavoriteBackend {
        /// Adding an existing favorite returns the id of that favorite.
        async fn add_favorite(
            &self,
            user_id: i64,
            resource_id: i64,
        ) -> Result<i64, BackendError>;
        async fn get_favorite(
            &self,
            id: i64,
        ) -> Result<Option<Favorite>, BackendError>;
        async fn remove_favorite(
            &self,
            id: i64,
        ) -> Result<bool, BackendError>;
        async fn list_favorites_for_user(
            &self,
            user_id: i64,
        ) -> Result<Favorites, BackendError>;
        async fn count_favorites_for_resource(
            &self,
            resource_id: i64,
        ) -> Result<i64, BackendError>;
    }
}

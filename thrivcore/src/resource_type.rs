use serde::{Deserialize, Serialize};
use crate::macros::collection;

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ResourceType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ResourceTypes(Vec<ResourceType>);

collection!(ResourceTypes, ResourceType);

pub mod traits {
    use async_trait::async_trait;
    use crate::error::BackendError;
    use super::{ResourceType, ResourceTypes};

    #[async_trait]
    pub trait ResourceTypeBackend {
        async fn add_type(
            &self,
            name: &str,
            description: Option<&str>,
        ) -> Result<i64, BackendError>;
        async fn update_type(
            &self,
            id: i64,
            name: &str,
            description: Option<&str>,
        ) -> Result<bool, BackendError>;
        /// Resources of the removed type keep existing without a type.
        async fn delete_type(
            &self,
            id: i64,
        ) -> Result<bool, BackendError>;
        async fn get_type(
            &self,
            id: i64,
        ) -> Result<Option<ResourceType>, BackendError>;
        async fn list_types(
            &self,
        ) -> Result<ResourceTypes, BackendError>;
    }
}

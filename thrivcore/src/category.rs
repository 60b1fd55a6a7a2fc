use serde::{Deserialize, Serialize};
use crate::macros::collection;

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub display_order: Option<i64>,
    pub parent_id: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Categories(Vec<Category>);

collection!(Categories, Category);

/// Caller supplied fields for creating or updating a category.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct CategoryData {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub display_order: Option<i64>,
    pub parent_id: Option<i64>,
}

/// A category as presented to callers, with its effective color and its
/// position in the hierarchy resolved.
///
/// Only a single level of `children` is ever populated; the nodes within
/// `children` and the `parent` node carry no further relatives.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub level: usize,
    pub resource_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<CategoryNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<CategoryNode>>,
}

mod impls;

pub mod traits {
    use async_trait::async_trait;
    use crate::error::BackendError;
    use super::{Categories, Category};

    #[async_trait]
    pub trait CategoryBackend {
        async fn add_category(
            &self,
            name: &str,
            description: Option<&str>,
            color: Option<&str>,
            display_order: Option<i64>,
            parent_id: Option<i64>,
        ) -> Result<i64, BackendError>;
        async fn update_category(
            &self,
            id: i64,
            name: &str,
            description: Option<&str>,
            color: Option<&str>,
            display_order: Option<i64>,
            parent_id: Option<i64>,
        ) -> Result<bool, BackendError>;
        /// Also drops every resource association of the category.
        async fn delete_category(
            &self,
            id: i64,
        ) -> Result<bool, BackendError>;
        async fn get_category(
            &self,
            id: i64,
        ) -> Result<Option<Category>, BackendError>;
        /// All listings are in display order.
        async fn list_categories(
            &self,
        ) -> Result<Categories, BackendError>;
        async fn list_root_categories(
            &self,
        ) -> Result<Categories, BackendError>;
        async fn list_child_categories(
            &self,
            parent_id: i64,
        ) -> Result<Categories, BackendError>;
        async fn count_approved_resources(
            &self,
            category_id: i64,
        ) -> Result<i64, BackendError>;
    }

    #[async_trait]
    pub trait ResourceCategoryBackend {
        /// Returns false if the association already existed.
        async fn add_resource_category(
            &self,
            resource_id: i64,
            category_id: i64,
        ) -> Result<bool, BackendError>;
        async fn remove_resource_category(
            &self,
            resource_id: i64,
            category_id: i64,
        ) -> Result<bool, BackendError>;
        async fn set_resource_categories(
            &self,
            resource_id: i64,
            category_ids: &[i64],
        ) -> Result<(), BackendError>;
        async fn list_categories_for_resource(
            &self,
            resource_id: i64,
        ) -> Result<Categories, BackendError>;
        /// Ordered by favorite count descending, then by resource name.
        async fn list_resource_ids_for_category(
            &self,
            category_id: i64,
        ) -> Result<Vec<i64>, BackendError>;
    }
}

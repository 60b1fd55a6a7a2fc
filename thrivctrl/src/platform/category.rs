use std::collections::BTreeSet;
use thrivcore::{
    ac::agent::Agent,
    category::{
        Categories,
        Category,
        CategoryData,
        CategoryNode,
    },
    resource::ResourceDetails,
};

use crate::{
    error::{
        NotFoundError,
        PlatformError,
        ValidationError,
    },
    platform::Platform,
};

fn validate_name(data: &CategoryData) -> Result<&str, PlatformError> {
    let name = data.name.trim();
    if name.is_empty() {
        Err(ValidationError::MissingField("name"))?
    }
    Ok(name)
}

// Hierarchy resolution.
impl Platform {
    async fn require_category(&self, id: i64) -> Result<Category, PlatformError> {
        self.rd_platform()
            .get_category(id)
            .await?
            .ok_or_else(|| NotFoundError::new("category", id).into())
    }

    async fn check_parent(&self, parent_id: Option<i64>) -> Result<(), PlatformError> {
        if let Some(parent_id) = parent_id {
            if self.rd_platform().get_category(parent_id).await?.is_none() {
                Err(ValidationError::UnknownReference("category", parent_id))?
            }
        }
        Ok(())
    }

    /// The ancestors of the category, nearest first.
    async fn ancestors(&self, category: &Category) -> Result<Vec<Category>, PlatformError> {
        let mut seen = BTreeSet::from([category.id]);
        let mut result = Vec::new();
        let mut next = category.parent_id;
        while let Some(id) = next {
            if !seen.insert(id) {
                log::warn!("category {} has a cyclic ancestry", category.id);
                break;
            }
            match self.rd_platform().get_category(id).await? {
                Some(parent) => {
                    next = parent.parent_id;
                    result.push(parent);
                }
                None => break,
            }
        }
        Ok(result)
    }

    async fn category_node(
        &self,
        mut category: Category,
        ancestors: &[Category],
    ) -> Result<CategoryNode, PlatformError> {
        if category.color.is_none() {
            category.color = ancestors.iter()
                .find_map(|ancestor| ancestor.color.clone());
        }
        let resource_count = self.rd_platform()
            .count_approved_resources(category.id)
            .await?;
        Ok(CategoryNode {
            category,
            level: ancestors.len(),
            resource_count,
            parent: None,
            children: None,
        })
    }

    async fn child_nodes(
        &self,
        category: &Category,
        ancestors: &[Category],
    ) -> Result<Vec<CategoryNode>, PlatformError> {
        let lineage = std::iter::once(category.clone())
            .chain(ancestors.iter().cloned())
            .collect::<Vec<_>>();
        let mut children = Vec::new();
        for child in self.rd_platform().list_child_categories(category.id).await?.into_iter() {
            children.push(self.category_node(child, &lineage).await?);
        }
        Ok(children)
    }
}

// Category management.
impl Platform {
    pub async fn add_category(
        &self,
        data: &CategoryData,
        agent: &Agent,
    ) -> Result<Category, PlatformError> {
        self.require_admin(agent)?;
        let name = validate_name(data)?;
        self.check_parent(data.parent_id).await?;
        let id = self.rd_platform().add_category(
            name,
            data.description.as_deref(),
            data.color.as_deref(),
            data.display_order,
            data.parent_id,
        ).await?;
        log::info!("added category {id} {name:?}");
        self.require_category(id).await
    }

    pub async fn update_category(
        &self,
        id: i64,
        data: &CategoryData,
        agent: &Agent,
    ) -> Result<Category, PlatformError> {
        self.require_admin(agent)?;
        let name = validate_name(data)?;
        let current = self.require_category(id).await?;
        if let Some(parent_id) = data.parent_id {
            if parent_id == id {
                Err(ValidationError::CategoryCycle(id))?
            }
            let parent = self.rd_platform()
                .get_category(parent_id)
                .await?
                .ok_or(ValidationError::UnknownReference("category", parent_id))?;
            if self.ancestors(&parent).await?.iter().any(|c| c.id == id) {
                Err(ValidationError::CategoryCycle(id))?
            }
        }
        self.rd_platform().update_category(
            current.id,
            name,
            data.description.as_deref(),
            data.color.as_deref(),
            data.display_order,
            data.parent_id,
        ).await?;
        self.require_category(id).await
    }

    /// A category that still has children cannot be removed.
    pub async fn delete_category(
        &self,
        id: i64,
        agent: &Agent,
    ) -> Result<(), PlatformError> {
        self.require_admin(agent)?;
        self.require_category(id).await?;
        if !self.rd_platform().list_child_categories(id).await?.is_empty() {
            Err(ValidationError::CategoryHasChildren(id))?
        }
        self.rd_platform().delete_category(id).await?;
        log::info!("deleted category {id}");
        Ok(())
    }
}

// Category retrieval.
impl Platform {
    /// The category with its parent and its immediate children resolved.
    pub async fn get_category(&self, id: i64) -> Result<CategoryNode, PlatformError> {
        let category = self.require_category(id).await?;
        let ancestors = self.ancestors(&category).await?;
        let parent = match ancestors.split_first() {
            Some((parent, rest)) => Some(Box::new(
                self.category_node(parent.clone(), rest).await?
            )),
            None => None,
        };
        let children = self.child_nodes(&category, &ancestors).await?;
        let mut node = self.category_node(category, &ancestors).await?;
        node.parent = parent;
        node.children = Some(children);
        Ok(node)
    }

    /// Root categories, each with its immediate children.
    pub async fn list_categories(&self) -> Result<Vec<CategoryNode>, PlatformError> {
        let mut result = Vec::new();
        for root in self.rd_platform().list_root_categories().await?.into_iter() {
            let children = self.child_nodes(&root, &[]).await?;
            let mut node = self.category_node(root, &[]).await?;
            node.children = Some(children);
            result.push(node);
        }
        Ok(result)
    }

    pub async fn list_root_categories(&self) -> Result<Vec<CategoryNode>, PlatformError> {
        let mut result = Vec::new();
        for root in self.rd_platform().list_root_categories().await?.into_iter() {
            result.push(self.category_node(root, &[]).await?);
        }
        Ok(result)
    }

    /// Resources of the category visible to the agent, most favorited first.
    pub async fn category_resources(
        &self,
        category_id: i64,
        agent: &Agent,
    ) -> Result<ResourceDetails, PlatformError> {
        self.require_category(category_id).await?;
        let ids = self.rd_platform()
            .list_resource_ids_for_category(category_id)
            .await?;
        let visible = self.filter_visible(
            agent,
            self.rd_platform().list_resources_by_ids(&ids).await?,
        );
        Ok(self.rd_platform().expand_resources(visible).await?)
    }
}

// Resource associations.
impl Platform {
    pub async fn add_resource_category(
        &self,
        resource_id: i64,
        category_id: i64,
        agent: &Agent,
    ) -> Result<bool, PlatformError> {
        self.editable_resource(resource_id, agent).await?;
        self.check_parent(Some(category_id)).await?;
        Ok(self.rd_platform().add_resource_category(resource_id, category_id).await?)
    }

    pub async fn remove_resource_category(
        &self,
        resource_id: i64,
        category_id: i64,
        agent: &Agent,
    ) -> Result<bool, PlatformError> {
        self.editable_resource(resource_id, agent).await?;
        Ok(self.rd_platform().remove_resource_category(resource_id, category_id).await?)
    }

    /// Replaces every category association of the resource.
    pub async fn set_resource_categories(
        &self,
        resource_id: i64,
        category_ids: &[i64],
        agent: &Agent,
    ) -> Result<Categories, PlatformError> {
        self.editable_resource(resource_id, agent).await?;
        for id in category_ids.iter() {
            self.check_parent(Some(*id)).await?;
        }
        self.rd_platform().set_resource_categories(resource_id, category_ids).await?;
        Ok(self.rd_platform().list_categories_for_resource(resource_id).await?)
    }

    pub async fn resource_categories(
        &self,
        resource_id: i64,
        agent: &Agent,
    ) -> Result<Categories, PlatformError> {
        self.visible_resource(resource_id, agent).await?;
        Ok(self.rd_platform().list_categories_for_resource(resource_id).await?)
    }
}

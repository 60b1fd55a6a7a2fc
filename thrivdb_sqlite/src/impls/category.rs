use async_trait::async_trait;
use thrivcore::{
    category::{
        Categories,
        Category,
        traits::{
            CategoryBackend,
            ResourceCategoryBackend,
        },
    },
    error::BackendError,
};
use sqlx::{
    QueryBuilder,
    Row,
    Sqlite,
    sqlite::SqliteRow,
};

use crate::SqliteBackend;

const SELECT_CATEGORY: &str = r#"
SELECT
    category.id AS id,
    category.name AS name,
    category.description AS description,
    category.color AS color,
    category.display_order AS display_order,
    category.parent_id AS parent_id
FROM
    category
"#;

const ORDER_CATEGORY: &str = r#"
ORDER BY
    category.display_order IS NULL,
    category.display_order,
    category.name,
    category.id
"#;

fn category_from_row(row: SqliteRow) -> Result<Category, sqlx::Error> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        color: row.try_get("color")?,
        display_order: row.try_get("display_order")?,
        parent_id: row.try_get("parent_id")?,
    })
}

async fn add_category_sqlite(
    backend: &SqliteBackend,
    name: &str,
    description: Option<&str>,
    color: Option<&str>,
    display_order: Option<i64>,
    parent_id: Option<i64>,
) -> Result<i64, BackendError> {
    let id = sqlx::query(r#"
INSERT INTO category (
    name,
    description,
    color,
    display_order,
    parent_id
)
VALUES ( ?1, ?2, ?3, ?4, ?5 )
        "#)
        .bind(name)
        .bind(description)
        .bind(color)
        .bind(display_order)
        .bind(parent_id)
        .execute(&*backend.pool)
        .await?
        .last_insert_rowid();
    Ok(id)
}

async fn update_category_sqlite(
    backend: &SqliteBackend,
    id: i64,
    name: &str,
    description: Option<&str>,
    color: Option<&str>,
    display_order: Option<i64>,
    parent_id: Option<i64>,
) -> Result<bool, BackendError> {
    let rows_affected = sqlx::query(r#"
UPDATE
    category
SET
    name = ?1,
    description = ?2,
    color = ?3,
    display_order = ?4,
    parent_id = ?5
WHERE
    id = ?6
        "#)
        .bind(name)
        .bind(description)
        .bind(color)
        .bind(display_order)
        .bind(parent_id)
        .bind(id)
        .execute(&*backend.pool)
        .await?
        .rows_affected();
    Ok(rows_affected > 0)
}

async fn delete_category_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<bool, BackendError> {
    let mut tx = backend.pool.begin().await?;
    sqlx::query("DELETE FROM resource_category WHERE category_id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let rows_affected = sqlx::query("DELETE FROM category WHERE id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    tx.commit().await?;
    Ok(rows_affected > 0)
}

async fn get_category_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<Category>, BackendError> {
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_CATEGORY);
    query_builder.push("WHERE id = ").push_bind(id);
    let rec = query_builder
        .build()
        .try_map(category_from_row)
        .fetch_optional(&*backend.pool)
        .await?;
    Ok(rec)
}

/// Lists categories, optionally restricted to the children of a parent,
/// or to the roots when `parent_id` is `Some(None)`.
async fn list_categories_sqlite(
    backend: &SqliteBackend,
    parent_id: Option<Option<i64>>,
) -> Result<Categories, BackendError> {
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_CATEGORY);
    match parent_id {
        Some(Some(parent_id)) => {
            query_builder.push("WHERE parent_id = ").push_bind(parent_id);
        }
        Some(None) => {
            query_builder.push("WHERE parent_id IS NULL");
        }
        None => (),
    }
    query_builder.push(ORDER_CATEGORY);
    let recs = query_builder
        .build()
        .try_map(category_from_row)
        .fetch_all(&*backend.pool)
        .await?;
    Ok(recs.into())
}

async fn count_approved_resources_sqlite(
    backend: &SqliteBackend,
    category_id: i64,
) -> Result<i64, BackendError> {
    let count = sqlx::query(r#"
SELECT
    COUNT(*) AS count
FROM
    resource_category
    JOIN resource ON resource.id = resource_category.resource_id
WHERE
    resource_category.category_id = ?1
    AND resource.approved = 'Approved'
        "#)
        .bind(category_id)
        .try_map(|row: SqliteRow| row.try_get("count"))
        .fetch_one(&*backend.pool)
        .await?;
    Ok(count)
}

async fn add_resource_category_sqlite(
    backend: &SqliteBackend,
    resource_id: i64,
    category_id: i64,
) -> Result<bool, BackendError> {
    let rows_affected = sqlx::query(r#"
INSERT OR IGNORE INTO resource_category (
    resource_id,
    category_id
)
VALUES ( ?1, ?2 )
        "#)
        .bind(resource_id)
        .bind(category_id)
        .execute(&*backend.pool)
        .await?
        .rows_affected();
    Ok(rows_affected > 0)
}

async fn remove_resource_category_sqlite(
    backend: &SqliteBackend,
    resource_id: i64,
    category_id: i64,
) -> Result<bool, BackendError> {
    let rows_affected = sqlx::query(r#"
DELETE FROM
    resource_category
WHERE
    resource_id = ?1
    AND category_id = ?2
        "#)
        .bind(resource_id)
        .bind(category_id)
        .execute(&*backend.pool)
        .await?
        .rows_affected();
    Ok(rows_affected > 0)
}

async fn set_resource_categories_sqlite(
    backend: &SqliteBackend,
    resource_id: i64,
    category_ids: &[i64],
) -> Result<(), BackendError> {
    let mut tx = backend.pool.begin().await?;
    sqlx::query("DELETE FROM resource_category WHERE resource_id = ?1")
        .bind(resource_id)
        .execute(&mut *tx)
        .await?;
    for category_id in category_ids.iter() {
        sqlx::query(r#"
INSERT OR IGNORE INTO resource_category (
    resource_id,
    category_id
)
VALUES ( ?1, ?2 )
            "#)
            .bind(resource_id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

async fn list_categories_for_resource_sqlite(
    backend: &SqliteBackend,
    resource_id: i64,
) -> Result<Categories, BackendError> {
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_CATEGORY);
    query_builder
        .push(r#"
    JOIN resource_category ON resource_category.category_id = category.id
WHERE
    resource_category.resource_id = "#)
        .push_bind(resource_id)
        .push(ORDER_CATEGORY);
    let recs = query_builder
        .build()
        .try_map(category_from_row)
        .fetch_all(&*backend.pool)
        .await?;
    Ok(recs.into())
}

async fn list_resource_ids_for_category_sqlite(
    backend: &SqliteBackend,
    category_id: i64,
) -> Result<Vec<i64>, BackendError> {
    let recs = sqlx::query(r#"
SELECT
    resource.id AS id
FROM
    resource_category
    JOIN resource ON resource.id = resource_category.resource_id
    LEFT JOIN (
        SELECT
            resource_id,
            COUNT(*) AS favorite_count
        FROM
            favorite
        GROUP BY
            resource_id
    ) AS favorites ON favorites.resource_id = resource.id
WHERE
    resource_category.category_id = ?1
ORDER BY
    COALESCE(favorites.favorite_count, 0) DESC,
    resource.name,
    resource.id
        "#)
        .bind(category_id)
        .try_map(|row: SqliteRow| row.try_get("id"))
        .fetch_all(&*backend.pool)
        .await?;
    Ok(recs)
}

#[async_trait]
impl CategoryBackend for SqliteBackend {
    async fn add_category(
        &self,
        name: &str,
        description: Option<&str>,
        color: Option<&str>,
        display_order: Option<i64>,
        parent_id: Option<i64>,
    ) -> Result<i64, BackendError> {
        add_category_sqlite(self, name, description, color, display_order, parent_id).await
    }

    async fn update_category(
        &self,
        id: i64,
        name: &str,
        description: Option<&str>,
        color: Option<&str>,
        display_order: Option<i64>,
        parent_id: Option<i64>,
    ) -> Result<bool, BackendError> {
        update_category_sqlite(self, id, name, description, color, display_order, parent_id).await
    }

    async fn delete_category(
        &self,
        id: i64,
    ) -> Result<bool, BackendError> {
        delete_category_sqlite(self, id).await
    }

    async fn get_category(
        &self,
        id: i64,
    ) -> Result<Option<Category>, BackendError> {
        get_category_sqlite(self, id).await
    }

    async fn list_categories(
        &self,
    ) -> Result<Categories, BackendError> {
        list_categories_sqlite(self, None).await
    }

    async fn list_root_categories(
        &self,
    ) -> Result<Categories, BackendError> {
        list_categories_sqlite(self, Some(None)).await
    }

    async fn list_child_categories(
        &self,
        parent_id: i64,
    ) -> Result<Categories, BackendError> {
        list_categories_sqlite(self, Some(Some(parent_id))).await
    }

    async fn count_approved_resources(
        &self,
        category_id: i64,
    ) -> Result<i64, BackendError> {
        count_approved_resources_sqlite(self, category_id).await
    }
}

#[async_trait]
impl ResourceCategoryBackend for SqliteBackend {
    async fn add_resource_category(
        &self,
        resource_id: i64,
        category_id: i64,
    ) -> Result<bool, BackendError> {
        add_resource_category_sqlite(self, resource_id, category_id).await
    }

    async fn remove_resource_category(
        &self,
        resource_id: i64,
        category_id: i64,
    ) -> Result<bool, BackendError> {
        remove_resource_category_sqlite(self, resource_id, category_id).await
    }

    async fn set_resource_categories(
        &self,
        resource_id: i64,
        category_ids: &[i64],
    ) -> Result<(), BackendError> {
        set_resource_categories_sqlite(self, resource_id, category_ids).await
    }

    async fn list_categories_for_resource(
        &self,
        resource_id: i64,
    ) -> Result<Categories, BackendError> {
        list_categories_for_resource_sqlite(self, resource_id).await
    }

    async fn list_resource_ids_for_category(
        &self,
        category_id: i64,
    ) -> Result<Vec<i64>, BackendError> {
        list_resource_ids_for_category_sqlite(self, category_id).await
    }
}

use async_trait::async_trait;
use thrivcore::{
    error::BackendError,
    resource_type::{
        ResourceType,
        ResourceTypes,
        traits::ResourceTypeBackend,
    },
};
use sqlx::Row;

use crate::SqliteBackend;

async fn add_type_sqlite(
    backend: &SqliteBackend,
    name: &str,
    description: Option<&str>,
) -> Result<i64, BackendError> {
    let id = sqlx::query("INSERT INTO resource_type (name, description) VALUES ( ?1, ?2 )")
        .bind(name)
        .bind(description)
        .execute(&*backend.pool)
        .await?
        .last_insert_rowid();
    Ok(id)
}

async fn update_type_sqlite(
    backend: &SqliteBackend,
    id: i64,
    name: &str,
    description: Option<&str>,
) -> Result<bool, BackendError> {
    let rows_affected = sqlx::query(r#"
UPDATE
    resource_type
SET
    name = ?1,
    description = ?2
WHERE
    id = ?3
        "#)
        .bind(name)
        .bind(description)
        .bind(id)
        .execute(&*backend.pool)
        .await?
        .rows_affected();
    Ok(rows_affected > 0)
}

async fn delete_type_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<bool, BackendError> {
    let mut tx = backend.pool.begin().await?;
    sqlx::query("UPDATE resource SET type_id = NULL WHERE type_id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let rows_affected = sqlx::query("DELETE FROM resource_type WHERE id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    tx.commit().await?;
    Ok(rows_affected > 0)
}

async fn get_type_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<ResourceType>, BackendError> {
    let rec = sqlx::query("SELECT id, name, description FROM resource_type WHERE id = ?1")
        .bind(id)
        .try_map(|row: sqlx::sqlite::SqliteRow| Ok(ResourceType {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
        }))
        .fetch_optional(&*backend.pool)
        .await?;
    Ok(rec)
}

async fn list_types_sqlite(
    backend: &SqliteBackend,
) -> Result<ResourceTypes, BackendError> {
    let recs = sqlx::query("SELECT id, name, description FROM resource_type ORDER BY name, id")
        .try_map(|row: sqlx::sqlite::SqliteRow| Ok(ResourceType {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
        }))
        .fetch_all(&*backend.pool)
        .await?;
    Ok(recs.into())
}

#[async_trait]
impl ResourceTypeBackend for SqliteBackend {
    async fn add_type(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<i64, BackendError> {
        add_type_sqlite(self, name, description).await
    }

    async fn update_type(
        &self,
        id: i64,
        name: &str,
        description: Option<&str>,
    ) -> Result<bool, BackendError> {
        update_type_sqlite(self, id, name, description).await
    }

    async fn delete_type(
        &self,
        id: i64,
    ) -> Result<bool, BackendError> {
        delete_type_sqlite(self, id).await
    }

    async fn get_type(
        &self,
        id: i64,
    ) -> Result<Option<ResourceType>, BackendError> {
        get_type_sqlite(self, id).await
    }

    async fn list_types(
        &self,
    ) -> Result<ResourceTypes, BackendError> {
        list_types_sqlite(self).await
    }
}

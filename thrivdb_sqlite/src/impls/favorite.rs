use async_trait::async_trait;
use thrivcore::{
    error::BackendError,
    favorite::{
        Favorite,
        Favorites,
        traits::FavoriteBackend,
    },
};
use sqlx::{
    Row,
    sqlite::SqliteRow,
};

use crate::SqliteBackend;

fn favorite_from_row(row: SqliteRow) -> Result<Favorite, sqlx::Error> {
    Ok(Favorite {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        resource_id: row.try_get("resource_id")?,
    })
}

async fn add_favorite_sqlite(
    backend: &SqliteBackend,
    user_id: i64,
    resource_id: i64,
) -> Result<i64, BackendError> {
    let id = sqlx::query(r#"
INSERT INTO favorite (
    user_id,
    resource_id
)
VALUES ( ?1, ?2 )
ON CONFLICT (user_id, resource_id) DO UPDATE SET
    user_id = excluded.user_id
RETURNING
    id
        "#)
        .bind(user_id)
        .bind(resource_id)
        .try_map(|row: SqliteRow| row.try_get("id"))
        .fetch_one(&*backend.pool)
        .await?;
    Ok(id)
}

async fn get_favorite_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<Favorite>, BackendError> {
    let rec = sqlx::query("SELECT id, user_id, resource_id FROM favorite WHERE id = ?1")
        .bind(id)
        .try_map(favorite_from_row)
        .fetch_optional(&*backend.pool)
        .await?;
    Ok(rec)
}

async fn remove_favorite_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<bool, BackendError> {
    let rows_affected = sqlx::query("DELETE FROM favorite WHERE id = ?1")
        .bind(id)
        .execute(&*backend.pool)
        .await?
        .rows_affected();
    Ok(rows_affected > 0)
}

async fn list_favorites_for_user_sqlite(
    backend: &SqliteBackend,
    user_id: i64,
) -> Result<Favorites, BackendError> {
    let recs = sqlx::query(r#"
SELECT
    id,
    user_id,
    resource_id
FROM
    favorite
WHERE
    user_id = ?1
ORDER BY
    id
        "#)
        .bind(user_id)
        .try_map(favorite_from_row)
        .fetch_all(&*backend.pool)
        .await?;
    Ok(recs.into())
}

async fn count_favorites_for_resource_sqlite(
    backend: &SqliteBackend,
    resource_id: i64,
) -> Result<i64, BackendError> {
    let count = sqlx::query("SELECT COUNT(*) AS count FROM favorite WHERE resource_id = ?1")
        .bind(resource_id)
        .try_map(|row: SqliteRow| row.try_get("count"))
        .fetch_one(&*backend.pool)
        .await?;
    Ok(count)
}

#[async_trait]
impl FavoriteBackend for SqliteBackend {
    async fn add_favorite(
        &self,
        user_id: i64,
        resource_id: i64,
    ) -> Result<i64, BackendError> {
        add_favorite_sqlite(self, user_id, resource_id).await
    }

    async fn get_favorite(
        &self,
        id: i64,
    ) -> Result<Option<Favorite>, BackendError> {
        get_favorite_sqlite(self, id).await
    }

    async fn remove_favorite(
        &self,
        id: i64,
    ) -> Result<bool, BackendError> {
        remove_favorite_sqlite(self, id).await
    }

    async fn list_favorites_for_user(
        &self,
        user_id: i64,
    ) -> Result<Favorites, BackendError> {
        list_favorites_for_user_sqlite(self, user_id).await
    }

    async fn count_favorites_for_resource(
        &self,
        resource_id: i64,
    ) -> Result<i64, BackendError> {
        count_favorites_for_resource_sqlite(self, resource_id).await
    }
}

use async_trait::async_trait;
use thrivcore::{
    ac::{
        role::Role,
        traits::UserBackend,
        user::User,
    },
    error::{
        BackendError,
        ValueError,
    },
};
use sqlx::{
    QueryBuilder,
    Row,
    Sqlite,
    sqlite::SqliteRow,
};

use crate::SqliteBackend;

fn user_from_row(row: SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        display_name: row.try_get("display_name")?,
        role: row.try_get::<String, _>("role")?
            .parse()
            .map_err(|e: ValueError| sqlx::Error::ColumnDecode {
                index: "role".to_string(),
                source: Box::new(e),
            })?,
        institution_id: row.try_get("institution_id")?,
    })
}

async fn add_user_sqlite(
    backend: &SqliteBackend,
    email: &str,
    display_name: &str,
    role: Role,
    institution_id: Option<i64>,
) -> Result<i64, BackendError> {
    let id = sqlx::query(r#"
INSERT INTO user (
    email,
    display_name,
    role,
    institution_id
)
VALUES ( ?1, ?2, ?3, ?4 )
        "#)
        .bind(email.trim())
        .bind(display_name)
        .bind(role.to_string())
        .bind(institution_id)
        .execute(&*backend.pool)
        .await?
        .last_insert_rowid();
    Ok(id)
}

async fn get_user_sqlite(
    backend: &SqliteBackend,
    id: Option<i64>,
    email: Option<&str>,
) -> Result<Option<User>, BackendError> {
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(r#"
SELECT
    id,
    email,
    display_name,
    role,
    institution_id
FROM
    user
WHERE
    "#);
    match (id, email) {
        (Some(id), _) => query_builder.push("id = ").push_bind(id),
        (None, Some(email)) => query_builder.push("email = ").push_bind(email.trim()),
        (None, None) => return Ok(None),
    };
    let rec = query_builder
        .build()
        .try_map(user_from_row)
        .fetch_optional(&*backend.pool)
        .await?;
    Ok(rec)
}

#[async_trait]
impl UserBackend for SqliteBackend {
    async fn add_user(
        &self,
        email: &str,
        display_name: &str,
        role: Role,
        institution_id: Option<i64>,
    ) -> Result<i64, BackendError> {
        add_user_sqlite(self, email, display_name, role, institution_id).await
    }

    async fn get_user(
        &self,
        id: i64,
    ) -> Result<Option<User>, BackendError> {
        get_user_sqlite(self, Some(id), None).await
    }

    async fn get_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, BackendError> {
        get_user_sqlite(self, None, Some(email)).await
    }
}

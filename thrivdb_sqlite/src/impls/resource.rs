use async_trait::async_trait;
use thrivcore::{
    error::{
        BackendError,
        ValueError,
    },
    resource::{
        Approval,
        Resource,
        ResourceRecord,
        Resources,
        traits::ResourceBackend,
    },
};
use sqlx::{
    QueryBuilder,
    Row,
    Sqlite,
    sqlite::SqliteRow,
};
use std::collections::HashMap;

use crate::SqliteBackend;

const SELECT_RESOURCE: &str = r#"
SELECT
    id,
    name,
    description,
    website,
    cost,
    owner,
    contact_email,
    contact_phone,
    contact_notes,
    approved,
    private,
    institution_id,
    type_id,
    segment_id,
    last_updated
FROM
    resource
"#;

pub(crate) fn approval_from_row(row: &SqliteRow, column: &str) -> Result<Approval, sqlx::Error> {
    row.try_get::<String, _>(column)?
        .parse()
        .map_err(|e: ValueError| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
}

fn resource_from_row(row: SqliteRow) -> Result<Resource, sqlx::Error> {
    Ok(Resource {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        website: row.try_get("website")?,
        cost: row.try_get("cost")?,
        owner: row.try_get("owner")?,
        contact_email: row.try_get("contact_email")?,
        contact_phone: row.try_get("contact_phone")?,
        contact_notes: row.try_get("contact_notes")?,
        approved: approval_from_row(&row, "approved")?,
        private: row.try_get("private")?,
        institution_id: row.try_get("institution_id")?,
        type_id: row.try_get("type_id")?,
        segment_id: row.try_get("segment_id")?,
        last_updated: row.try_get("last_updated")?,
    })
}

async fn insert_resource_sqlite(
    backend: &SqliteBackend,
    record: &ResourceRecord,
    last_updated: i64,
) -> Result<i64, BackendError> {
    let id = sqlx::query(r#"
INSERT INTO resource (
    name,
    description,
    website,
    cost,
    owner,
    contact_email,
    contact_phone,
    contact_notes,
    approved,
    private,
    institution_id,
    type_id,
    segment_id,
    last_updated
)
VALUES ( ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14 )
        "#)
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.website)
        .bind(&record.cost)
        .bind(&record.owner)
        .bind(&record.contact_email)
        .bind(&record.contact_phone)
        .bind(&record.contact_notes)
        .bind(record.approved.to_string())
        .bind(record.private)
        .bind(record.institution_id)
        .bind(record.type_id)
        .bind(record.segment_id)
        .bind(last_updated)
        .execute(&*backend.pool)
        .await?
        .last_insert_rowid();
    Ok(id)
}

async fn update_resource_sqlite(
    backend: &SqliteBackend,
    id: i64,
    record: &ResourceRecord,
    last_updated: i64,
) -> Result<bool, BackendError> {
    let rows_affected = sqlx::query(r#"
UPDATE
    resource
SET
    name = ?1,
    description = ?2,
    website = ?3,
    cost = ?4,
    owner = ?5,
    contact_email = ?6,
    contact_phone = ?7,
    contact_notes = ?8,
    approved = ?9,
    private = ?10,
    institution_id = ?11,
    type_id = ?12,
    segment_id = ?13,
    last_updated = ?14
WHERE
    id = ?15
        "#)
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.website)
        .bind(&record.cost)
        .bind(&record.owner)
        .bind(&record.contact_email)
        .bind(&record.contact_phone)
        .bind(&record.contact_notes)
        .bind(record.approved.to_string())
        .bind(record.private)
        .bind(record.institution_id)
        .bind(record.type_id)
        .bind(record.segment_id)
        .bind(last_updated)
        .bind(id)
        .execute(&*backend.pool)
        .await?
        .rows_affected();
    Ok(rows_affected > 0)
}

async fn delete_resource_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<bool, BackendError> {
    let mut tx = backend.pool.begin().await?;
    for statement in [
        "DELETE FROM favorite WHERE resource_id = ?1",
        "DELETE FROM resource_category WHERE resource_id = ?1",
        "DELETE FROM availability WHERE resource_id = ?1",
    ] {
        let rows_affected = sqlx::query(statement)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        log::trace!("{statement:?} with id={id}: {rows_affected} row(s)");
    }
    let rows_affected = sqlx::query("DELETE FROM resource WHERE id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    tx.commit().await?;
    Ok(rows_affected > 0)
}

async fn get_resource_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<Resource>, BackendError> {
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_RESOURCE);
    query_builder.push("WHERE id = ").push_bind(id);
    let rec = query_builder
        .build()
        .try_map(resource_from_row)
        .fetch_optional(&*backend.pool)
        .await?;
    Ok(rec)
}

async fn list_resources_sqlite(
    backend: &SqliteBackend,
) -> Result<Resources, BackendError> {
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_RESOURCE);
    query_builder.push("ORDER BY name, id");
    let recs = query_builder
        .build()
        .try_map(resource_from_row)
        .fetch_all(&*backend.pool)
        .await?;
    Ok(recs.into())
}

async fn list_resources_by_ids_sqlite(
    backend: &SqliteBackend,
    ids: &[i64],
) -> Result<Resources, BackendError> {
    if ids.is_empty() {
        return Ok(Resources::default());
    }
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_RESOURCE);
    query_builder.push("WHERE id IN (");
    let mut separated = query_builder.separated(", ");
    for id in ids.iter() {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");

    let mut recs = query_builder
        .build()
        .try_map(resource_from_row)
        .fetch_all(&*backend.pool)
        .await?
        .into_iter()
        .map(|resource| (resource.id, resource))
        .collect::<HashMap<_, _>>();
    Ok(ids.iter()
        .filter_map(|id| recs.remove(id))
        .collect())
}

async fn list_resource_ids_by_column_sqlite(
    backend: &SqliteBackend,
    column: &str,
    value: i64,
) -> Result<Vec<i64>, BackendError> {
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT id FROM resource WHERE "
    );
    query_builder
        .push(column)
        .push(" = ")
        .push_bind(value)
        .push(" ORDER BY id");
    let recs = query_builder
        .build()
        .try_map(|row| row.try_get("id"))
        .fetch_all(&*backend.pool)
        .await?;
    Ok(recs)
}

#[async_trait]
impl ResourceBackend for SqliteBackend {
    async fn insert_resource(
        &self,
        record: &ResourceRecord,
        last_updated: i64,
    ) -> Result<i64, BackendError> {
        insert_resource_sqlite(self, record, last_updated).await
    }

    async fn update_resource(
        &self,
        id: i64,
        record: &ResourceRecord,
        last_updated: i64,
    ) -> Result<bool, BackendError> {
        update_resource_sqlite(self, id, record, last_updated).await
    }

    async fn delete_resource(
        &self,
        id: i64,
    ) -> Result<bool, BackendError> {
        delete_resource_sqlite(self, id).await
    }

    async fn get_resource(
        &self,
        id: i64,
    ) -> Result<Option<Resource>, BackendError> {
        get_resource_sqlite(self, id).await
    }

    async fn list_resources(
        &self,
    ) -> Result<Resources, BackendError> {
        list_resources_sqlite(self).await
    }

    async fn list_resources_by_ids(
        &self,
        ids: &[i64],
    ) -> Result<Resources, BackendError> {
        list_resources_by_ids_sqlite(self, ids).await
    }

    async fn list_resource_ids_by_institution(
        &self,
        institution_id: i64,
    ) -> Result<Vec<i64>, BackendError> {
        list_resource_ids_by_column_sqlite(self, "institution_id", institution_id).await
    }

    async fn list_resource_ids_by_type(
        &self,
        type_id: i64,
    ) -> Result<Vec<i64>, BackendError> {
        list_resource_ids_by_column_sqlite(self, "type_id", type_id).await
    }
}

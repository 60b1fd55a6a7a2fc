use async_trait::async_trait;
use thrivcore::{
    error::BackendError,
    segment::{
        Segment,
        Segments,
        traits::SegmentBackend,
    },
};
use sqlx::{
    QueryBuilder,
    Row,
    Sqlite,
    sqlite::SqliteRow,
};

use crate::SqliteBackend;

fn segment_from_row(row: SqliteRow) -> Result<Segment, sqlx::Error> {
    Ok(Segment {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
    })
}

async fn add_segment_sqlite(
    backend: &SqliteBackend,
    name: &str,
    description: Option<&str>,
) -> Result<i64, BackendError> {
    let id = sqlx::query("INSERT INTO segment (name, description) VALUES ( ?1, ?2 )")
        .bind(name)
        .bind(description)
        .execute(&*backend.pool)
        .await?
        .last_insert_rowid();
    Ok(id)
}

async fn get_segment_sqlite(
    backend: &SqliteBackend,
    id: Option<i64>,
    name: Option<&str>,
) -> Result<Option<Segment>, BackendError> {
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT id, name, description FROM segment WHERE "
    );
    match (id, name) {
        (Some(id), _) => query_builder.push("id = ").push_bind(id),
        (None, Some(name)) => query_builder.push("name = ").push_bind(name),
        (None, None) => return Ok(None),
    };
    let rec = query_builder
        .build()
        .try_map(segment_from_row)
        .fetch_optional(&*backend.pool)
        .await?;
    Ok(rec)
}

async fn list_segments_sqlite(
    backend: &SqliteBackend,
) -> Result<Segments, BackendError> {
    let recs = sqlx::query("SELECT id, name, description FROM segment ORDER BY id")
        .try_map(segment_from_row)
        .fetch_all(&*backend.pool)
        .await?;
    Ok(recs.into())
}

#[async_trait]
impl SegmentBackend for SqliteBackend {
    async fn add_segment(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<i64, BackendError> {
        add_segment_sqlite(self, name, description).await
    }

    async fn get_segment(
        &self,
        id: i64,
    ) -> Result<Option<Segment>, BackendError> {
        get_segment_sqlite(self, Some(id), None).await
    }

    async fn get_segment_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Segment>, BackendError> {
        get_segment_sqlite(self, None, Some(name)).await
    }

    async fn list_segments(
        &self,
    ) -> Result<Segments, BackendError> {
        list_segments_sqlite(self).await
    }
}

use async_trait::async_trait;
use itertools::Itertools;
use thrivcore::{
    error::BackendError,
    search::{
        FacetField,
        RawFacets,
        SearchDocument,
        SearchHit,
        SearchHits,
        SearchRequest,
        traits::SearchBackend,
    },
};
use sqlx::{
    QueryBuilder,
    Row,
    Sqlite,
    sqlite::SqliteRow,
};

use crate::{
    SqliteBackend,
    impls::resource::approval_from_row,
};

const SELECT_DOCUMENT: &str = r#"
SELECT
    resource_id,
    name,
    description,
    website,
    owner,
    type_name,
    approved,
    institution_name,
    segment_name,
    last_updated
FROM
    search_document
"#;

fn facet_column(field: FacetField) -> &'static str {
    match field {
        FacetField::Type => "type_name",
        FacetField::Institution => "institution_name",
        FacetField::Segment => "segment_name",
        FacetField::Approved => "approved",
    }
}

fn document_from_row(row: SqliteRow) -> Result<SearchDocument, sqlx::Error> {
    Ok(SearchDocument {
        resource_id: row.try_get("resource_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        website: row.try_get("website")?,
        owner: row.try_get("owner")?,
        type_name: row.try_get("type_name")?,
        approved: approval_from_row(&row, "approved")?,
        institution_name: row.try_get("institution_name")?,
        segment_name: row.try_get("segment_name")?,
        last_updated: row.try_get("last_updated")?,
    })
}

async fn index_document_sqlite(
    backend: &SqliteBackend,
    document: &SearchDocument,
) -> Result<(), BackendError> {
    sqlx::query(r#"
INSERT INTO search_document (
    resource_id,
    name,
    description,
    website,
    owner,
    type_name,
    approved,
    institution_name,
    segment_name,
    last_updated,
    content
)
VALUES ( ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11 )
ON CONFLICT (resource_id) DO UPDATE SET
    name = excluded.name,
    description = excluded.description,
    website = excluded.website,
    owner = excluded.owner,
    type_name = excluded.type_name,
    approved = excluded.approved,
    institution_name = excluded.institution_name,
    segment_name = excluded.segment_name,
    last_updated = excluded.last_updated,
    content = excluded.content
        "#)
        .bind(document.resource_id)
        .bind(&document.name)
        .bind(&document.description)
        .bind(&document.website)
        .bind(&document.owner)
        .bind(&document.type_name)
        .bind(document.approved.to_string())
        .bind(&document.institution_name)
        .bind(&document.segment_name)
        .bind(document.last_updated)
        .bind(document.content())
        .execute(&*backend.pool)
        .await?;
    log::trace!("indexed document for resource {}", document.resource_id);
    Ok(())
}

async fn remove_document_sqlite(
    backend: &SqliteBackend,
    resource_id: i64,
) -> Result<(), BackendError> {
    let rows_affected = sqlx::query("DELETE FROM search_document WHERE resource_id = ?1")
        .bind(resource_id)
        .execute(&*backend.pool)
        .await?
        .rows_affected();
    log::trace!("removed {rows_affected} document(s) for resource {resource_id}");
    Ok(())
}

async fn get_document_sqlite(
    backend: &SqliteBackend,
    resource_id: i64,
) -> Result<Option<SearchDocument>, BackendError> {
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_DOCUMENT);
    query_builder.push("WHERE resource_id = ").push_bind(resource_id);
    let rec = query_builder
        .build()
        .try_map(document_from_row)
        .fetch_optional(&*backend.pool)
        .await?;
    Ok(rec)
}

async fn list_document_ids_sqlite(
    backend: &SqliteBackend,
) -> Result<Vec<i64>, BackendError> {
    let recs = sqlx::query("SELECT resource_id FROM search_document ORDER BY resource_id")
        .try_map(|row: SqliteRow| row.try_get("resource_id"))
        .fetch_all(&*backend.pool)
        .await?;
    Ok(recs)
}

async fn search_sqlite(
    backend: &SqliteBackend,
    request: &SearchRequest,
) -> Result<SearchHits, BackendError> {
    let tokens = request.tokens();
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_DOCUMENT);
    query_builder.push("WHERE 1 = 1");
    for token in tokens.iter() {
        query_builder
            .push(" AND instr(content, ")
            .push_bind(token.as_str())
            .push(") > 0");
    }
    // alternatives within a field, conjunction across fields
    let grouped = request.filters.iter()
        .into_group_map_by(|filter| filter.field)
        .into_iter()
        .sorted_by_key(|(field, _)| *field);
    for (field, filters) in grouped {
        query_builder.push(" AND ").push(facet_column(field)).push(" IN (");
        let mut separated = query_builder.separated(", ");
        for filter in filters.iter() {
            separated.push_bind(filter.value.as_str());
        }
        separated.push_unseparated(")");
    }
    log::trace!("search query: {}", query_builder.sql());

    let documents = query_builder
        .build()
        .try_map(document_from_row)
        .fetch_all(&*backend.pool)
        .await?;

    let mut hits = documents.into_iter()
        .filter_map(|document| document.score(&tokens)
            .map(|score| SearchHit { score, document }))
        .collect::<Vec<_>>();
    hits.sort_by(SearchHit::rank_cmp);
    let facets = RawFacets::tally(
        hits.iter().map(|hit| &hit.document),
        &request.filters,
    );
    log::debug!("search {:?} with {} filter(s): {} hit(s)", request.query, request.filters.len(), hits.len());
    Ok(SearchHits {
        total: hits.len(),
        hits,
        facets,
    })
}

#[async_trait]
impl SearchBackend for SqliteBackend {
    async fn index_document(
        &self,
        document: &SearchDocument,
    ) -> Result<(), BackendError> {
        index_document_sqlite(self, document).await
    }

    async fn remove_document(
        &self,
        resource_id: i64,
    ) -> Result<(), BackendError> {
        remove_document_sqlite(self, resource_id).await
    }

    async fn get_document(
        &self,
        resource_id: i64,
    ) -> Result<Option<SearchDocument>, BackendError> {
        get_document_sqlite(self, resource_id).await
    }

    async fn list_document_ids(
        &self,
    ) -> Result<Vec<i64>, BackendError> {
        list_document_ids_sqlite(self).await
    }

    async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<SearchHits, BackendError> {
        search_sqlite(self, request).await
    }
}

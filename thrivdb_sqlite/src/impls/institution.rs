use async_trait::async_trait;
use thrivcore::{
    error::BackendError,
    institution::{
        Institution,
        Institutions,
        traits::InstitutionBackend,
    },
};
use sqlx::{
    QueryBuilder,
    Row,
    Sqlite,
    sqlite::SqliteRow,
};

use crate::SqliteBackend;

const SELECT_INSTITUTION: &str = r#"
SELECT
    id,
    name,
    domain,
    description,
    hide_availability
FROM
    institution
"#;

fn institution_from_row(row: SqliteRow) -> Result<Institution, sqlx::Error> {
    Ok(Institution {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        domain: row.try_get("domain")?,
        description: row.try_get("description")?,
        hide_availability: row.try_get("hide_availability")?,
    })
}

async fn add_institution_sqlite(
    backend: &SqliteBackend,
    name: &str,
    domain: Option<&str>,
    description: Option<&str>,
    hide_availability: bool,
) -> Result<i64, BackendError> {
    let id = sqlx::query(r#"
INSERT INTO institution (
    name,
    domain,
    description,
    hide_availability
)
VALUES ( ?1, ?2, ?3, ?4 )
        "#)
        .bind(name)
        .bind(domain)
        .bind(description)
        .bind(hide_availability)
        .execute(&*backend.pool)
        .await?
        .last_insert_rowid();
    Ok(id)
}

async fn update_institution_sqlite(
    backend: &SqliteBackend,
    id: i64,
    name: &str,
    domain: Option<&str>,
    description: Option<&str>,
    hide_availability: bool,
) -> Result<bool, BackendError> {
    let rows_affected = sqlx::query(r#"
UPDATE
    institution
SET
    name = ?1,
    domain = ?2,
    description = ?3,
    hide_availability = ?4
WHERE
    id = ?5
        "#)
        .bind(name)
        .bind(domain)
        .bind(description)
        .bind(hide_availability)
        .bind(id)
        .execute(&*backend.pool)
        .await?
        .rows_affected();
    Ok(rows_affected > 0)
}

async fn get_institution_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<Institution>, BackendError> {
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_INSTITUTION);
    query_builder.push("WHERE id = ").push_bind(id);
    let rec = query_builder
        .build()
        .try_map(institution_from_row)
        .fetch_optional(&*backend.pool)
        .await?;
    Ok(rec)
}

async fn get_institution_by_domain_sqlite(
    backend: &SqliteBackend,
    domain: &str,
) -> Result<Option<Institution>, BackendError> {
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_INSTITUTION);
    query_builder
        .push("WHERE domain = ")
        .push_bind(domain.trim())
        .push(" ORDER BY id LIMIT 1");
    let rec = query_builder
        .build()
        .try_map(institution_from_row)
        .fetch_optional(&*backend.pool)
        .await?;
    Ok(rec)
}

async fn list_institutions_sqlite(
    backend: &SqliteBackend,
    with_availability: bool,
) -> Result<Institutions, BackendError> {
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_INSTITUTION);
    if with_availability {
        query_builder.push("WHERE hide_availability = 0 ");
    }
    query_builder.push("ORDER BY name, id");
    let recs = query_builder
        .build()
        .try_map(institution_from_row)
        .fetch_all(&*backend.pool)
        .await?;
    Ok(recs.into())
}

#[async_trait]
impl InstitutionBackend for SqliteBackend {
    async fn add_institution(
        &self,
        name: &str,
        domain: Option<&str>,
        description: Option<&str>,
        hide_availability: bool,
    ) -> Result<i64, BackendError> {
        add_institution_sqlite(self, name, domain, description, hide_availability).await
    }

    async fn update_institution(
        &self,
        id: i64,
        name: &str,
        domain: Option<&str>,
        description: Option<&str>,
        hide_availability: bool,
    ) -> Result<bool, BackendError> {
        update_institution_sqlite(self, id, name, domain, description, hide_availability).await
    }

    async fn get_institution(
        &self,
        id: i64,
    ) -> Result<Option<Institution>, BackendError> {
        get_institution_sqlite(self, id).await
    }

    async fn get_institution_by_domain(
        &self,
        domain: &str,
    ) -> Result<Option<Institution>, BackendError> {
        get_institution_by_domain_sqlite(self, domain).await
    }

    async fn list_institutions(
        &self,
    ) -> Result<Institutions, BackendError> {
        list_institutions_sqlite(self, false).await
    }

    async fn list_institutions_with_availability(
        &self,
    ) -> Result<Institutions, BackendError> {
        list_institutions_sqlite(self, true).await
    }
}

#[cfg(test)]
mod testing {
    use thrivcore::institution::traits::InstitutionBackend;
    use crate::impls::testing::rd;

    #[async_std::test]
    async fn add_get_update() -> anyhow::Result<()> {
        let backend = rd().await?;
        let id = backend.add_institution("UVA", Some("virginia.edu"), Some("Wahoos"), false).await?;
        let institution = backend.get_institution(id).await?.expect("institution");
        assert_eq!(institution.name, "UVA");
        assert_eq!(institution.domain.as_deref(), Some("virginia.edu"));

        assert!(backend.update_institution(id, "University of Virginia", Some("virginia.edu"), None, true).await?);
        let institution = backend.get_institution(id).await?.expect("institution");
        assert_eq!(institution.name, "University of Virginia");
        assert_eq!(institution.description, None);
        assert!(institution.hide_availability);

        assert!(!backend.update_institution(id + 1, "Nowhere", None, None, false).await?);
        assert_eq!(backend.get_institution(id + 1).await?, None);
        Ok(())
    }

    #[async_std::test]
    async fn by_domain() -> anyhow::Result<()> {
        let backend = rd().await?;
        let id = backend.add_institution("UVA", Some("virginia.edu"), None, false).await?;
        assert_eq!(
            backend.get_institution_by_domain("Virginia.EDU").await?.map(|i| i.id),
            Some(id),
        );
        assert_eq!(backend.get_institution_by_domain("vt.edu").await?, None);
        Ok(())
    }

    #[async_std::test]
    async fn with_availability() -> anyhow::Result<()> {
        let backend = rd().await?;
        backend.add_institution("Zed", None, None, false).await?;
        backend.add_institution("Hidden", None, None, true).await?;
        backend.add_institution("Alpha", None, None, false).await?;
        let names = |institutions: thrivcore::institution::Institutions| institutions
            .iter()
            .map(|i| i.name.clone())
            .collect::<Vec<_>>();
        assert_eq!(names(backend.list_institutions().await?), ["Alpha", "Hidden", "Zed"]);
        assert_eq!(names(backend.list_institutions_with_availability().await?), ["Alpha", "Zed"]);
        Ok(())
    }
}

use async_trait::async_trait;
use thrivcore::{
    availability::{
        Availability,
        Availabilities,
        traits::AvailabilityBackend,
    },
    error::BackendError,
};
use sqlx::{
    Row,
    sqlite::SqliteRow,
};

use crate::SqliteBackend;

const UPSERT_AVAILABILITY: &str = r#"
INSERT INTO availability (
    resource_id,
    institution_id,
    available
)
VALUES ( ?1, ?2, ?3 )
ON CONFLICT (resource_id, institution_id) DO UPDATE SET
    available = excluded.available
RETURNING
    id
"#;

fn availability_from_row(row: SqliteRow) -> Result<Availability, sqlx::Error> {
    Ok(Availability {
        id: row.try_get("id")?,
        resource_id: row.try_get("resource_id")?,
        institution_id: row.try_get("institution_id")?,
        available: row.try_get("available")?,
    })
}

async fn add_availability_sqlite(
    backend: &SqliteBackend,
    resource_id: i64,
    institution_id: i64,
    available: bool,
) -> Result<i64, BackendError> {
    let id = sqlx::query(UPSERT_AVAILABILITY)
        .bind(resource_id)
        .bind(institution_id)
        .bind(available)
        .try_map(|row: SqliteRow| row.try_get("id"))
        .fetch_one(&*backend.pool)
        .await?;
    Ok(id)
}

async fn get_availability_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<Availability>, BackendError> {
    let rec = sqlx::query(r#"
SELECT
    id,
    resource_id,
    institution_id,
    available
FROM
    availability
WHERE
    id = ?1
        "#)
        .bind(id)
        .try_map(availability_from_row)
        .fetch_optional(&*backend.pool)
        .await?;
    Ok(rec)
}

async fn remove_availability_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<bool, BackendError> {
    let rows_affected = sqlx::query("DELETE FROM availability WHERE id = ?1")
        .bind(id)
        .execute(&*backend.pool)
        .await?
        .rows_affected();
    Ok(rows_affected > 0)
}

async fn set_availabilities_sqlite(
    backend: &SqliteBackend,
    resource_id: i64,
    entries: &[(i64, bool)],
) -> Result<(), BackendError> {
    let mut tx = backend.pool.begin().await?;
    sqlx::query("DELETE FROM availability WHERE resource_id = ?1")
        .bind(resource_id)
        .execute(&mut *tx)
        .await?;
    for (institution_id, available) in entries.iter() {
        sqlx::query(UPSERT_AVAILABILITY)
            .bind(resource_id)
            .bind(institution_id)
            .bind(available)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

async fn list_availabilities_for_resource_sqlite(
    backend: &SqliteBackend,
    resource_id: i64,
) -> Result<Availabilities, BackendError> {
    let recs = sqlx::query(r#"
SELECT
    id,
    resource_id,
    institution_id,
    available
FROM
    availability
WHERE
    resource_id = ?1
ORDER BY
    institution_id
        "#)
        .bind(resource_id)
        .try_map(availability_from_row)
        .fetch_all(&*backend.pool)
        .await?;
    Ok(recs.into())
}

#[async_trait]
impl AvailabilityBackend for SqliteBackend {
    async fn add_availability(
        &self,
        resource_id: i64,
        institution_id: i64,
        available: bool,
    ) -> Result<i64, BackendError> {
        add_availability_sqlite(self, resource_id, institution_id, available).await
    }

    async fn get_availability(
        &self,
        id: i64,
    ) -> Result<Option<Availability>, BackendError> {
        get_availability_sqlite(self, id).await
    }

    async fn remove_availability(
        &self,
        id: i64,
    ) -> Result<bool, BackendError> {
        remove_availability_sqlite(self, id).await
    }

    async fn set_availabilities(
        &self,
        resource_id: i64,
        entries: &[(i64, bool)],
    ) -> Result<(), BackendError> {
        set_availabilities_sqlite(self, resource_id, entries).await
    }

    async fn list_availabilities_for_resource(
        &self,
        resource_id: i64,
    ) -> Result<Availabilities, BackendError> {
        list_availabilities_for_resource_sqlite(self, resource_id).await
    }
}

#[cfg(test)]
mod testing {
    use thrivcore::{
        availability::{
            Availability,
            traits::AvailabilityBackend,
        },
        institution::traits::InstitutionBackend,
        resource::traits::ResourceBackend,
    };
    use crate::impls::testing::{
        record,
        rd_with_segment,
    };

    #[async_std::test]
    async fn availability() -> anyhow::Result<()> {
        let (backend, segment_id) = rd_with_segment().await?;
        let uva = backend.add_institution("UVA", None, None, false).await?;
        let vt = backend.add_institution("VT", None, None, false).await?;
        let r = backend.insert_resource(&record("r", segment_id), 1).await?;

        let id = backend.add_availability(r, uva, true).await?;
        assert_eq!(backend.get_availability(id).await?, Some(Availability {
            id,
            resource_id: r,
            institution_id: uva,
            available: true,
        }));
        // upsert keeps the same row
        assert_eq!(backend.add_availability(r, uva, false).await?, id);
        assert_eq!(backend.get_availability(id).await?.map(|a| a.available), Some(false));

        backend.set_availabilities(r, &[(vt, true), (uva, true)]).await?;
        let entries = backend.list_availabilities_for_resource(r).await?
            .iter()
            .map(|a| (a.institution_id, a.available))
            .collect::<Vec<_>>();
        assert_eq!(entries, [(uva, true), (vt, true)]);

        let vt_id = backend.list_availabilities_for_resource(r).await?[1].id;
        assert!(backend.remove_availability(vt_id).await?);
        assert!(!backend.remove_availability(vt_id).await?);
        assert_eq!(backend.list_availabilities_for_resource(r).await?.len(), 1);
        Ok(())
    }
}

use thrivcore::platform::{
    ConnectorOption,
    PlatformConnector,
    PlatformUrl,
    RDPlatform,
    SIPlatform,
};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;

use crate::SqliteBackend;

impl PlatformUrl for SqliteBackend {
    fn url(&self) -> &str {
        self.url.as_ref()
    }
}

impl SqliteBackend {
    pub async fn connect(opts: ConnectorOption) -> Result<SqliteBackend, sqlx::Error> {
        if opts.auto_create_db && !Sqlite::database_exists(&opts.url).await.unwrap_or(false) {
            log::warn!("sqlite database {} does not exist; creating...", &opts.url);
            Sqlite::create_database(&opts.url).await?
        }

        let pool = SqlitePool::connect(&opts.url).await?;
        Ok(SqliteBackend {
            pool: Arc::new(pool),
            url: opts.url,
        })
    }

    // Both profiles may share a single database, so migrations applied by
    // the other profile are expected to be absent from each migrator.

    pub async fn migrate_rd(self) -> Result<Self, sqlx::Error> {
        let mut migrator = sqlx::migrate!("migrations/thrivrd");
        migrator.set_ignore_missing(true);
        migrator.run(&*self.pool).await?;
        Ok(self)
    }

    pub async fn migrate_si(self) -> Result<Self, sqlx::Error> {
        let mut migrator = sqlx::migrate!("migrations/thrivsi");
        migrator.set_ignore_missing(true);
        migrator.run(&*self.pool).await?;
        Ok(self)
    }
}

impl PlatformConnector for SqliteBackend {
    async fn rd(opts: ConnectorOption) -> Result<impl RDPlatform, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let backend = SqliteBackend::connect(opts).await
            .map_err(Box::new)?
            .migrate_rd()
            .await
            .map_err(Box::new)?;
        Ok(backend)
    }

    async fn si(opts: ConnectorOption) -> Result<impl SIPlatform, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let backend = SqliteBackend::connect(opts).await
            .map_err(Box::new)?
            .migrate_si()
            .await
            .map_err(Box::new)?;
        Ok(backend)
    }
}

mod ac;
mod availability;
mod category;
mod favorite;
mod institution;
mod resource;
mod resource_type;
mod search;
mod segment;

use clap::Args;
use thrivcore::platform::ConnectorOption;
use thrivdb::Backend;
use std::time::Duration;

use crate::{
    error::PlatformError,
    platform::{
        Builder,
        Platform,
    },
};

/// Deployment settings, read from the command line or the environment.
#[derive(Clone, Debug, Args)]
pub struct Config {
    /// Connection string for the relational store.
    #[clap(long, value_name = "THRIV_RD_DB_URL", env = "THRIV_RD_DB_URL")]
    pub rd_db_url: String,
    /// Connection string for the search index; the relational store is
    /// used when unset.
    #[clap(long, value_name = "THRIV_SI_DB_URL", env = "THRIV_SI_DB_URL")]
    pub si_db_url: Option<String>,
    #[clap(
        long,
        value_name = "THRIV_AUTO_CREATE_DB",
        env = "THRIV_AUTO_CREATE_DB",
        default_value_t = true,
        action = clap::ArgAction::Set,
    )]
    pub auto_create_db: bool,
    #[clap(
        long,
        value_name = "THRIV_INDEX_TIMEOUT_MS",
        env = "THRIV_INDEX_TIMEOUT_MS",
        default_value_t = 5000,
    )]
    pub index_timeout_ms: u64,
    #[clap(long, value_name = "THRIV_APPROVAL_RECIPIENT", env = "THRIV_APPROVAL_RECIPIENT")]
    pub approval_recipient: Option<String>,
}

impl Config {
    pub fn si_db_url(&self) -> &str {
        self.si_db_url.as_deref().unwrap_or(&self.rd_db_url)
    }

    pub fn index_timeout(&self) -> Duration {
        Duration::from_millis(self.index_timeout_ms)
    }

    pub async fn build(self) -> Result<Platform, PlatformError> {
        let rd = Backend::rd(
            ConnectorOption::new()
                .auto_create_db(self.auto_create_db)
                .url(self.rd_db_url.clone())
        ).await.map_err(PlatformError::Connect)?;
        let si = Backend::si(
            ConnectorOption::new()
                .auto_create_db(self.auto_create_db)
                .url(self.si_db_url().to_string())
        ).await.map_err(PlatformError::Connect)?;
        log::debug!("connected to {} and {}", self.rd_db_url, self.si_db_url());

        let mut builder = Builder::new()
            .arc_rd_platform(rd)
            .arc_si_platform(si)
            .index_timeout(self.index_timeout());
        if let Some(recipient) = self.approval_recipient {
            builder = builder.approval_recipient(recipient);
        }
        builder.build()
    }
}

#[cfg(test)]
mod testing {
    use clap::Parser;
    use thrivcore::platform::PlatformUrl;
    use std::time::Duration;
    use super::Config;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        config: Config,
    }

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["thrivctrl", "--rd-db-url", "sqlite::memory:"]);
        assert_eq!(cli.config.si_db_url(), "sqlite::memory:");
        assert!(cli.config.auto_create_db);
        assert_eq!(cli.config.index_timeout(), Duration::from_millis(5000));
        assert_eq!(cli.config.approval_recipient, None);
    }

    #[test]
    fn overrides() {
        let cli = Cli::parse_from([
            "thrivctrl",
            "--rd-db-url", "sqlite:rd.db",
            "--si-db-url", "sqlite:si.db",
            "--auto-create-db", "false",
            "--index-timeout-ms", "250",
            "--approval-recipient", "approvals@x.com",
        ]);
        assert_eq!(cli.config.si_db_url(), "sqlite:si.db");
        assert!(!cli.config.auto_create_db);
        assert_eq!(cli.config.index_timeout(), Duration::from_millis(250));
        assert_eq!(cli.config.approval_recipient.as_deref(), Some("approvals@x.com"));
    }

    #[async_std::test]
    async fn build() -> anyhow::Result<()> {
        let cli = Cli::parse_from([
            "thrivctrl",
            "--rd-db-url", "sqlite::memory:",
            "--index-timeout-ms", "100",
        ]);
        let platform = cli.config.build().await?;
        assert_eq!(platform.rd_platform().url(), "sqlite::memory:");
        assert_eq!(platform.si_platform().url(), "sqlite::memory:");
        assert_eq!(platform.index_timeout(), Duration::from_millis(100));
        Ok(())
    }

    #[async_std::test]
    async fn unsupported() {
        let cli = Cli::parse_from(["thrivctrl", "--rd-db-url", "mysql://localhost/thriv"]);
        assert!(matches!(
            cli.config.build().await,
            Err(crate::error::PlatformError::Connect(_)),
        ));
    }
}

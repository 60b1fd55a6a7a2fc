use thrivcore::platform::{
    ConnectorOption,
    RDPlatform,
    SIPlatform,
};
#[cfg(feature = "sqlite")]
use thrivcore::platform::PlatformConnector;
#[cfg(feature = "sqlite")]
use thrivdb_sqlite::SqliteBackend;
use std::sync::Arc;

pub struct Backend;

#[derive(Clone, Debug, PartialEq)]
pub struct Error(String);

#[derive(Debug)]
enum BackendKind {
    Sqlite,
}

mod display {
    use super::{BackendKind, Error};
    use std::fmt::{Display, Formatter, Result};

    impl Display for BackendKind {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result {
            match self {
                Self::Sqlite => "sqlite".fmt(f),
            }
        }
    }

    impl Display for Error {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result {
            self.0.fmt(f)
        }
    }

    impl std::error::Error for Error {}
}

impl TryFrom<&str> for BackendKind {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.split(':').next() {
            Some("sqlite") => Ok(BackendKind::Sqlite),
            _ => Err(Error(format!("The connection string {s:?} is unsupported.")))
        }
    }
}

impl Backend {
    pub async fn rd(
        opts: impl Into<ConnectorOption>,
    ) -> Result<Arc<dyn RDPlatform>, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let opts = opts.into();
        match BackendKind::try_from(opts.url.as_str()) {
            #[cfg(feature = "sqlite")]
            Ok(BackendKind::Sqlite) => Ok(Arc::new(SqliteBackend::rd(opts).await?)),
            #[cfg(not(feature = "sqlite"))]
            Ok(s) => Err(Box::new(Error(format!(
                "The feature {s:?} must be enabled for thrivdb in order to connect to {:?}",
                opts.url,
            )))),
            Err(e) => Err(Box::new(e)),
        }
    }

    pub async fn si(
        opts: impl Into<ConnectorOption>,
    ) -> Result<Arc<dyn SIPlatform>, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let opts = opts.into();
        match BackendKind::try_from(opts.url.as_str()) {
            #[cfg(feature = "sqlite")]
            Ok(BackendKind::Sqlite) => Ok(Arc::new(SqliteBackend::si(opts).await?)),
            #[cfg(not(feature = "sqlite"))]
            Ok(s) => Err(Box::new(Error(format!(
                "The feature {s:?} must be enabled for thrivdb in order to connect to {:?}",
                opts.url,
            )))),
            Err(e) => Err(Box::new(e)),
        }
    }
}

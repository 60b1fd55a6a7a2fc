use std::error::Error;

use super::*;

#[derive(Default)]
pub struct ConnectorOption {
    pub auto_create_db: bool,
    pub url: String,
}

impl ConnectorOption {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_create_db(mut self, auto_create_db: bool) -> Self {
        self.auto_create_db = auto_create_db;
        self
    }

    pub fn url(mut self, url: String) -> Self {
        self.url = url;
        self
    }
}

impl<T> From<T> for ConnectorOption
where
    T: ToString
{
    fn from(v: T) -> Self {
        Self::new()
            .auto_create_db(true)
            .url(v.to_string())
    }
}

#[allow(async_fn_in_trait)]
pub trait PlatformConnector {
    async fn rd(opts: ConnectorOption) -> Result<impl RDPlatform, Box<dyn Error + Send + Sync + 'static>>;
    async fn si(opts: ConnectorOption) -> Result<impl SIPlatform, Box<dyn Error + Send + Sync + 'static>>;
}

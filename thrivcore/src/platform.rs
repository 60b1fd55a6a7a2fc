mod connector;
mod relational;
mod search_index;
pub use connector::{ConnectorOption, PlatformConnector};
pub use relational::RDPlatform;
pub use search_index::SIPlatform;

pub trait PlatformUrl {
    fn url(&self) -> &str;
}

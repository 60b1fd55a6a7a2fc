use crate::{
    platform::PlatformUrl,
    search::traits::SearchBackend,
};

/// SIPlatform - Search Index Platform
///
/// Holds the denormalized search documents derived from the relational
/// platform.
pub trait SIPlatform: SearchBackend
    + PlatformUrl

    + Send
    + Sync
{
    fn as_dyn(&self) -> &dyn SIPlatform;
}

impl<P: SearchBackend
    + PlatformUrl

    + Send
    + Sync
> SIPlatform for P {
    fn as_dyn(&self) -> &(dyn SIPlatform) {
        self
    }
}

use thrivac::PolicyEnforcer;
use thrivcore::{
    ac::traits::Enforcer,
    notify::{
        LogMailer,
        Mailer,
    },
    platform::{
        RDPlatform,
        SIPlatform,
    },
};
use std::{
    sync::Arc,
    time::Duration,
};

use crate::error::{
    IndexDegradedError,
    PlatformError,
};

pub const DEFAULT_INDEX_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Default)]
pub struct Builder {
    rd_platform: Option<Arc<dyn RDPlatform>>,
    si_platform: Option<Arc<dyn SIPlatform>>,
    enforcer: Option<Arc<dyn Enforcer>>,
    mailer: Option<Arc<dyn Mailer>>,
    index_timeout: Option<Duration>,
    approval_recipient: Option<String>,
}

/// The directory platform.
///
/// Every read and write of the directory goes through here so that the
/// visibility policy is applied uniformly and the search index follows
/// each committed change to the relational store.
#[derive(Clone)]
pub struct Platform(Arc<PlatformInner>);

struct PlatformInner {
    rd_platform: Arc<dyn RDPlatform>,
    si_platform: Arc<dyn SIPlatform>,
    enforcer: Arc<dyn Enforcer>,
    mailer: Arc<dyn Mailer>,
    index_timeout: Duration,
    approval_recipient: Option<String>,
}

/// The outcome of a committed mutation.
///
/// The relational write has happened; `degraded` lists every search index
/// update that failed to follow it.
#[derive(Debug)]
pub struct Committed<T> {
    pub value: T,
    pub degraded: Vec<IndexDegradedError>,
}

/// Counts from a full reconciliation of the search index.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct ReindexReport {
    pub indexed: usize,
    pub removed: usize,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rd_platform(mut self, val: impl RDPlatform + 'static) -> Self {
        self.rd_platform = Some(Arc::new(val));
        self
    }

    pub fn arc_rd_platform(mut self, val: Arc<dyn RDPlatform>) -> Self {
        self.rd_platform = Some(val);
        self
    }

    pub fn si_platform(mut self, val: impl SIPlatform + 'static) -> Self {
        self.si_platform = Some(Arc::new(val));
        self
    }

    pub fn arc_si_platform(mut self, val: Arc<dyn SIPlatform>) -> Self {
        self.si_platform = Some(val);
        self
    }

    pub fn enforcer(mut self, val: impl Enforcer + 'static) -> Self {
        self.enforcer = Some(Arc::new(val));
        self
    }

    pub fn mailer(mut self, val: impl Mailer + 'static) -> Self {
        self.mailer = Some(Arc::new(val));
        self
    }

    pub fn arc_mailer(mut self, val: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(val);
        self
    }

    pub fn index_timeout(mut self, val: Duration) -> Self {
        self.index_timeout = Some(val);
        self
    }

    pub fn approval_recipient(mut self, val: impl Into<String>) -> Self {
        self.approval_recipient = Some(val.into());
        self
    }

    pub fn build(self) -> Result<Platform, PlatformError> {
        Ok(Platform(Arc::new(PlatformInner {
            rd_platform: self.rd_platform
                .ok_or_else(|| PlatformError::Misconfiguration("missing rd_platform".into()))?,
            si_platform: self.si_platform
                .ok_or_else(|| PlatformError::Misconfiguration("missing si_platform".into()))?,
            enforcer: self.enforcer
                .unwrap_or_else(|| Arc::new(PolicyEnforcer::new())),
            mailer: self.mailer
                .unwrap_or_else(|| Arc::new(LogMailer)),
            index_timeout: self.index_timeout
                .unwrap_or(DEFAULT_INDEX_TIMEOUT),
            approval_recipient: self.approval_recipient,
        })))
    }
}

impl Platform {
    pub fn rd_platform(&self) -> &dyn RDPlatform {
        self.0.rd_platform.as_ref()
    }

    pub fn si_platform(&self) -> &dyn SIPlatform {
        self.0.si_platform.as_ref()
    }

    pub fn enforcer(&self) -> &dyn Enforcer {
        self.0.enforcer.as_ref()
    }

    pub(crate) fn mailer(&self) -> &dyn Mailer {
        self.0.mailer.as_ref()
    }

    pub fn index_timeout(&self) -> Duration {
        self.0.index_timeout
    }

    pub(crate) fn approval_recipient(&self) -> Option<&str> {
        self.0.approval_recipient.as_deref()
    }
}

impl<T> Committed<T> {
    pub(crate) fn new(value: T, degraded: Vec<IndexDegradedError>) -> Self {
        Self { value, degraded }
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    /// Treats any degraded index update as an error.
    pub fn into_result(mut self) -> Result<T, PlatformError> {
        match self.degraded.pop() {
            Some(e) => Err(e.into()),
            None => Ok(self.value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Committed<U> {
        Committed {
            value: f(self.value),
            degraded: self.degraded,
        }
    }
}

impl<T> std::ops::Deref for Committed<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

mod access;
mod availability;
mod category;
mod favorite;
mod index;
mod notify;
mod resource;
mod search;
mod taxonomy;
mod user;

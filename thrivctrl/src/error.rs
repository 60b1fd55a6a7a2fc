use thrivcore::{
    error::{
        BackendError,
        ValueError,
    },
    notify::MailError,
};
use std::time::Duration;
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Connect(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error(transparent)]
    IndexDegraded(#[from] IndexDegradedError),
    #[error(transparent)]
    Mail(#[from] MailError),
    #[error("misconfiguration: {0}")]
    Misconfiguration(String),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error(transparent)]
    Permission(#[from] PermissionError),
    #[error(transparent)]
    Search(#[from] SearchBackendError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Value(#[from] ValueError),
}

#[derive(Debug, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("unknown {0} with id {1}")]
    UnknownReference(&'static str, i64),
    #[error("unknown approval state: {0:?}")]
    UnknownApproval(String),
    #[error("category {0} still has child categories")]
    CategoryHasChildren(i64),
    #[error("category {0} cannot be its own ancestor")]
    CategoryCycle(i64),
    #[error("resource {0} is already approved")]
    AlreadyApproved(i64),
    #[error("{0} already exists: {1:?}")]
    Duplicate(&'static str, String),
    #[error("institution {0} does not track availability")]
    AvailabilityHidden(i64),
}

#[derive(Debug, PartialEq, Error)]
pub enum PermissionError {
    #[error("authentication required")]
    AuthenticationRequired,
    #[error("permission denied")]
    Denied,
}

/// Absent and hidden entities are reported identically.
#[derive(Debug, PartialEq, Error)]
#[error("{kind} not found: {id}")]
pub struct NotFoundError {
    pub kind: &'static str,
    pub id: i64,
}

#[derive(Debug, Error)]
pub enum SearchBackendError {
    #[error("search backend unavailable: {0}")]
    Unavailable(#[source] BackendError),
    #[error("search backend did not respond within {0:?}")]
    Timeout(Duration),
}

/// The relational write went through but the search index could not be
/// brought in line with it.
#[derive(Debug, Error)]
#[error("search index degraded for resource {resource_id}: {cause}")]
pub struct IndexDegradedError {
    pub resource_id: i64,
    #[source]
    pub cause: SearchBackendError,
}

impl NotFoundError {
    pub fn new(kind: &'static str, id: i64) -> Self {
        Self { kind, id }
    }

    pub fn resource(id: i64) -> Self {
        Self::new("resource", id)
    }
}

impl PlatformError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlatformError::NotFound(_))
    }
}

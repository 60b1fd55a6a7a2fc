use serde::{Deserialize, Serialize};
use crate::macros::collection;

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Availability {
    pub id: i64,
    pub resource_id: i64,
    pub institution_id: i64,
    pub available: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Availabilities(Vec<Availability>);

collection!(Availabilities, Availability);

pub mod traits {
    use async_trait::async_trait;
    use crate::error::BackendError;
    use super::{Availability, Availabilities};

    #[async_trait]
    pub trait AvailabilityBackend {
        /// Inserts or replaces the availability for the institution.
        async fn add_availability(
            &self,
            resource_id: i64,
            institution_id: i64,
            available: bool,
        ) -> Result<i64, BackendError>;
        async fn get_availability(
            &self,
            id: i64,
        ) -> Result<Option<Availability>, BackendError>;
        async fn remove_availability(
            &self,
            id: i64,
        ) -> Result<bool, BackendError>;
        /// Replaces every availability of the resource in one transaction.
        async fn set_availabilities(
            &self,
            resource_id: i64,
            entries: &[(i64, bool)],
        ) -> Result<(), BackendError>;
        async fn list_availabilities_for_resource(
            &self,
            resource_id: i64,
        ) -> Result<Availabilities, BackendError>;
    }
}

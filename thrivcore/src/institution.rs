use serde::{Deserialize, Serialize};
use crate::macros::collection;

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Institution {
    pub id: i64,
    pub name: String,
    pub domain: Option<String>,
    pub description: Option<String>,
    pub hide_availability: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Institutions(Vec<Institution>);

collection!(Institutions, Institution);

pub mod traits {
    use async_trait::async_trait;
    use crate::error::BackendError;
    use super::{Institution, Institutions};

    #[async_trait]
    pub trait InstitutionBackend {
        async fn add_institution(
            &self,
            name: &str,
            domain: Option<&str>,
            description: Option<&str>,
            hide_availability: bool,
        ) -> Result<i64, BackendError>;
        async fn update_institution(
            &self,
            id: i64,
            name: &str,
            domain: Option<&str>,
            description: Option<&str>,
            hide_availability: bool,
        ) -> Result<bool, BackendError>;
        async fn get_institution(
            &self,
            id: i64,
        ) -> Result<Option<Institution>, BackendError>;
        /// Domain comparison is case-insensitive.
        async fn get_institution_by_domain(
            &self,
            domain: &str,
        ) -> Result<Option<Institution>, BackendError>;
        async fn list_institutions(
            &self,
        ) -> Result<Institutions, BackendError>;
        /// Institutions that have not opted out of availability tracking.
        async fn list_institutions_with_availability(
            &self,
        ) -> Result<Institutions, BackendError>;
    }
}

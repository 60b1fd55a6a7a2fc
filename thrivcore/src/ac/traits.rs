use async_trait::async_trait;
use crate::{
    error::BackendError,
    resource::Resource,
};
use super::{
    agent::Agent,
    role::Role,
    user::User,
};

/// Decides what an agent may do with a given resource.
pub trait Enforcer: Send + Sync {
    fn can_view(&self, agent: &Agent, resource: &Resource) -> bool;
    fn can_edit(&self, agent: &Agent, resource: &Resource) -> bool;
    fn can_delete(&self, agent: &Agent, resource: &Resource) -> bool;
}

#[async_trait]
pub trait UserBackend {
    async fn add_user(
        &self,
        email: &str,
        display_name: &str,
        role: Role,
        institution_id: Option<i64>,
    ) -> Result<i64, BackendError>;
    async fn get_user(
        &self,
        id: i64,
    ) -> Result<Option<User>, BackendError>;
    async fn get_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, BackendError>;
}

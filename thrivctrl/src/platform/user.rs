use thrivcore::{
    ac::{
        agent::Agent,
        role::Role,
        user::User,
    },
};

use crate::{
    error::{
        NotFoundError,
        PlatformError,
        ValidationError,
    },
    platform::Platform,
};

impl Platform {
    /// Provisions an account.  The user is affiliated with the institution
    /// registered for the domain of their email address, if any.
    pub async fn create_user(
        &self,
        email: &str,
        display_name: &str,
        role: Role,
    ) -> Result<User, PlatformError> {
        let email = email.trim();
        let domain = match email.rsplit_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => domain,
            _ => Err(ValidationError::MissingField("email"))?,
        };
        if self.rd_platform().get_user_by_email(email).await?.is_some() {
            Err(ValidationError::Duplicate("user", email.to_string()))?
        }
        let institution_id = self.rd_platform()
            .get_institution_by_domain(domain)
            .await?
            .map(|institution| institution.id);
        let id = self.rd_platform()
            .add_user(email, display_name.trim(), role, institution_id)
            .await?;
        log::info!("created {role} account {id} for {email:?}");
        self.get_user(id).await
    }

    pub async fn get_user(&self, id: i64) -> Result<User, PlatformError> {
        self.rd_platform()
            .get_user(id)
            .await?
            .ok_or_else(|| NotFoundError::new("user", id).into())
    }

    /// The agent every other operation is performed on behalf of.
    pub async fn agent_for_user(&self, id: i64) -> Result<Agent, PlatformError> {
        Ok(self.get_user(id).await?.into())
    }

    pub async fn user_by_email(&self, email: &str) -> Result<Option<User>, PlatformError> {
        Ok(self.rd_platform().get_user_by_email(email.trim()).await?)
    }
}

use thrivcore::{
    ac::agent::Agent,
    notify::Message,
};

use crate::{
    error::{
        PlatformError,
        ValidationError,
    },
    platform::Platform,
};

impl Platform {
    /// Asks the directory administrators to approve the resource on behalf
    /// of the agent.  Returns the message that was sent.
    pub async fn request_approval(
        &self,
        resource_id: i64,
        agent: &Agent,
    ) -> Result<Message, PlatformError> {
        let user = self.require_user(agent)?;
        let resource = self.visible_resource(resource_id, agent).await?;
        if resource.approved.is_approved() {
            Err(ValidationError::AlreadyApproved(resource_id))?
        }
        let to = self.approval_recipient()
            .ok_or_else(|| PlatformError::Misconfiguration("no approval recipient configured".into()))?
            .to_string();
        let message = Message {
            to,
            subject: format!("Approval requested: {}", resource.name),
            body: format!(
                "{} <{}> has requested approval of the resource {:?} (id {}).\n",
                user.display_name,
                user.email,
                resource.name,
                resource.id,
            ),
        };
        self.mailer().send(message.clone()).await?;
        log::info!("approval of resource {resource_id} requested by {}", user.email);
        Ok(message)
    }
}

#[cfg(test)]
mod testing {
    use test_thriv::{
        mail::{
            CapturingMailer,
            FailingMailer,
        },
        policy::{
            admin,
            user,
        },
    };
    use thrivcore::{
        ac::agent::Agent,
        notify::Mailer,
        resource::ResourceData,
    };
    use thrivdb::Backend;
    use std::sync::Arc;
    use crate::{
        error::{
            PermissionError,
            PlatformError,
            ValidationError,
        },
        platform::{
            Builder,
            Platform,
            testing::resource_data,
        },
    };

    async fn platform_with(
        mailer: Arc<dyn Mailer>,
        recipient: Option<&str>,
    ) -> anyhow::Result<(Platform, i64)> {
        let mut builder = Builder::new()
            .arc_rd_platform(Backend::rd("sqlite::memory:").await
                .map_err(|e| anyhow::anyhow!(e))?)
            .arc_si_platform(Backend::si("sqlite::memory:").await
                .map_err(|e| anyhow::anyhow!(e))?)
            .arc_mailer(mailer);
        if let Some(recipient) = recipient {
            builder = builder.approval_recipient(recipient);
        }
        let platform = builder.build()?;
        let segment_id = platform.rd_platform().add_segment("Research", None).await?;
        Ok((platform, segment_id))
    }

    #[async_std::test]
    async fn approval_request() -> anyhow::Result<()> {
        let mailer = Arc::new(CapturingMailer::default());
        let (platform, segment_id) = platform_with(mailer.clone(), Some("approvals@x.com")).await?;
        let owner = user("owner@x.com", None);
        let pending = platform.create_resource(&ResourceData {
            owner: Some(Some("owner@x.com".into())),
            ..resource_data("Pending", segment_id)
        }, &owner).await?.id;
        let approved = platform.create_resource(&ResourceData {
            approved: Some("Approved".into()),
            ..resource_data("Done", segment_id)
        }, &admin("admin@x.com", None)).await?.id;

        let message = platform.request_approval(pending, &owner).await?;
        assert_eq!(message.to, "approvals@x.com");
        assert_eq!(message.subject, "Approval requested: Pending");
        assert_eq!(mailer.messages(), [message]);

        assert!(matches!(
            platform.request_approval(approved, &owner).await,
            Err(PlatformError::Validation(ValidationError::AlreadyApproved(id))) if id == approved,
        ));
        assert!(matches!(
            platform.request_approval(approved, &Agent::Anonymous).await,
            Err(PlatformError::Permission(PermissionError::AuthenticationRequired)),
        ));
        assert!(platform.request_approval(pending, &user("stranger@x.com", None)).await
            .expect_err("hidden")
            .is_not_found());
        assert_eq!(mailer.messages().len(), 1);
        Ok(())
    }

    #[async_std::test]
    async fn approval_failures() -> anyhow::Result<()> {
        let (platform, segment_id) = platform_with(Arc::new(CapturingMailer::default()), None).await?;
        let owner = user("owner@x.com", None);
        let id = platform.create_resource(&ResourceData {
            owner: Some(Some("owner@x.com".into())),
            ..resource_data("Pending", segment_id)
        }, &owner).await?.id;
        assert!(matches!(
            platform.request_approval(id, &owner).await,
            Err(PlatformError::Misconfiguration(_)),
        ));

        let (platform, segment_id) = platform_with(Arc::new(FailingMailer), Some("approvals@x.com")).await?;
        let id = platform.create_resource(&ResourceData {
            owner: Some(Some("owner@x.com".into())),
            ..resource_data("Pending", segment_id)
        }, &owner).await?.id;
        assert!(matches!(
            platform.request_approval(id, &owner).await,
            Err(PlatformError::Mail(_)),
        ));
        Ok(())
    }
}

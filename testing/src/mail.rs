use async_trait::async_trait;
use parking_lot::Mutex;
use thrivcore::notify::{
    MailError,
    Mailer,
    Message,
};

/// Keeps every message sent for later inspection.
#[derive(Debug, Default)]
pub struct CapturingMailer {
    messages: Mutex<Vec<Message>>,
}

impl CapturingMailer {
    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().clone()
    }
}

#[async_trait]
impl Mailer for CapturingMailer {
    async fn send(&self, message: Message) -> Result<(), MailError> {
        self.messages.lock().push(message);
        Ok(())
    }
}

pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _message: Message) -> Result<(), MailError> {
        Err(MailError::Transport("connection refused".into()))
    }
}

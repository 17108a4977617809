use async_trait::async_trait;
use thiserror::Error;

use crate::notifications::Email;

#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("The e-mail is not valid. {0}")]
    InvalidEmail(String),
    #[error("Could not render the e-mail template. {0}")]
    TemplateError(String),
    #[error("The e-mail could not be delivered. {0}")]
    DeliveryError(String),
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, email: Email) -> Result<(), NotificationError>;
}

//! E-mail transports.
//!
//! [`HttpMailer`] posts each e-mail as JSON to a mail delivery service. [`LogMailer`] only writes the e-mail to the
//! log, which is what you get when no delivery service is configured.
use std::time::Duration;

use async_trait::async_trait;
use jewelry_common::Secret;
use jewelry_engine::{
    notifications::Email,
    traits::{NotificationError, NotificationSender},
};
use log::*;
use reqwest::{header::HeaderMap, Client};

const MAILER_TIMEOUT: Duration = Duration::from_secs(10);
const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    url: String,
}

impl HttpMailer {
    pub fn new(url: &str, api_key: &Secret<String>) -> Result<Self, NotificationError> {
        let mut headers = HeaderMap::new();
        if !api_key.reveal().is_empty() {
            let value = api_key.reveal().parse().map_err(|e| {
                NotificationError::DeliveryError(format!("The mailer API key is not a valid header value. {e}"))
            })?;
            headers.insert(API_KEY_HEADER, value);
        }
        let client = Client::builder()
            .default_headers(headers)
            .timeout(MAILER_TIMEOUT)
            .build()
            .map_err(|e| NotificationError::DeliveryError(e.to_string()))?;
        Ok(Self { client, url: url.to_string() })
    }
}

#[async_trait]
impl NotificationSender for HttpMailer {
    async fn send(&self, email: Email) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(&self.url)
            .json(&email)
            .send()
            .await
            .map_err(|e| NotificationError::DeliveryError(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            trace!("📧 Mailer accepted the e-mail to {}", email.to_email);
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(NotificationError::DeliveryError(format!("The mailer responded with {status}. {body}")))
        }
    }
}

#[derive(Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl NotificationSender for LogMailer {
    async fn send(&self, email: Email) -> Result<(), NotificationError> {
        info!("📧 [not sent] To: {} <{}>. Subject: {}", email.to_name, email.to_email, email.subject);
        debug!("📧 [not sent] Body:\n{}", email.html_body);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn email() -> Email {
        Email {
            to_name: "Support".into(),
            to_email: "support@shop.example.com".into(),
            from_name: "Jewelry Shop".into(),
            from_email: "noreply@shop.example.com".into(),
            subject: "New order #1".into(),
            html_body: "<p>Hi</p>".into(),
        }
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        assert!(LogMailer.send(email()).await.is_ok());
    }

    #[tokio::test]
    async fn unreachable_mailer_is_a_delivery_error() {
        let mailer = HttpMailer::new("http://127.0.0.1:1/send", &Secret::new("key".to_string())).unwrap();
        let err = mailer.send(email()).await.unwrap_err();
        assert!(matches!(err, NotificationError::DeliveryError(_)));
    }

    #[test]
    fn invalid_api_key_is_rejected() {
        assert!(HttpMailer::new("http://localhost/send", &Secret::new("bad\nkey".to_string())).is_err());
    }
}

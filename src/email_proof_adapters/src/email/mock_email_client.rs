use std::sync::Arc;

use email_proof_core::{EmailAddress, EmailClient};
use secrecy::ExposeSecret;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub content: String,
}

/// Email client that keeps every message in memory instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct MockEmailClient {
    outbox: Arc<RwLock<Vec<SentEmail>>>,
}

impl MockEmailClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<SentEmail> {
        self.outbox.read().await.clone()
    }
}

#[async_trait::async_trait]
impl EmailClient for MockEmailClient {
    async fn send_email(
        &self,
        recipient: &EmailAddress,
        subject: &str,
        content: &str,
    ) -> Result<(), String> {
        tracing::debug!("Capturing email with subject {subject:?}");
        self.outbox.write().await.push(SentEmail {
            recipient: recipient.as_ref().expose_secret().clone(),
            subject: subject.to_owned(),
            content: content.to_owned(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_email_is_captured() {
        let client = MockEmailClient::new();
        let recipient = EmailAddress::parse("test@example.com").unwrap();

        client
            .send_email(&recipient, "Subject", "Body")
            .await
            .unwrap();

        assert_eq!(
            client.sent().await,
            [SentEmail {
                recipient: "test@example.com".to_string(),
                subject: "Subject".to_string(),
                content: "Body".to_string(),
            }]
        );
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{email_address::EmailAddress, proof_code::ProofCode};

/// Source of new proof codes.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> ProofCode;
}

/// Wall clock used for issuance timestamps and expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Port trait for email sending service
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(
        &self,
        recipient: &EmailAddress,
        subject: &str,
        content: &str,
    ) -> Result<(), String>;
}

#[derive(Debug, Error)]
pub enum UserDirectoryError {
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

/// Lookup of registered account addresses.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_exists(&self, email: &EmailAddress) -> Result<bool, UserDirectoryError>;
}

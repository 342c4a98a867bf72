use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use email_proof_core::{EmailAddress, UserDirectory, UserDirectoryError};
use secrecy::ExposeSecret;

/// Registered addresses kept in memory, matched case-insensitively.
#[derive(Debug, Default, Clone)]
pub struct HashSetUserDirectory {
    emails: Arc<RwLock<HashSet<String>>>,
}

impl HashSetUserDirectory {
    pub fn new() -> Self {
        Self {
            emails: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    pub async fn add_user(&self, email: &EmailAddress) {
        let mut emails = self.emails.write().await;
        emails.insert(email.as_ref().expose_secret().to_ascii_lowercase());
    }

    pub async fn remove_user(&self, email: &EmailAddress) -> bool {
        let mut emails = self.emails.write().await;
        emails.remove(&email.as_ref().expose_secret().to_ascii_lowercase())
    }
}

#[async_trait::async_trait]
impl UserDirectory for HashSetUserDirectory {
    async fn user_exists(&self, email: &EmailAddress) -> Result<bool, UserDirectoryError> {
        let emails = self.emails.read().await;
        Ok(emails.contains(&email.as_ref().expose_secret().to_ascii_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let directory = HashSetUserDirectory::new();
        assert!(!directory.user_exists(&email("a@x.com")).await.unwrap());
    }

    #[tokio::test]
    async fn test_lookup_ignores_case() {
        let directory = HashSetUserDirectory::new();
        directory.add_user(&email("User@X.com")).await;
        assert!(directory.user_exists(&email("user@x.com")).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_user() {
        let directory = HashSetUserDirectory::new();
        directory.add_user(&email("a@x.com")).await;
        assert!(directory.remove_user(&email("A@x.com")).await);
        assert!(!directory.user_exists(&email("a@x.com")).await.unwrap());
    }
}

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{proof_code::ProofCode, proof_item::ProofItem};

// ProofCache port trait and errors
#[derive(Debug, Error)]
pub enum ProofCacheError {
    #[error("Cache backend error: {0}")]
    BackendError(String),
}

/// String key-value cache with absolute TTLs, shared by every running
/// instance of the host process.
#[async_trait]
pub trait ProofCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, ProofCacheError>;

    /// Stores `value` under `key`, expiring `ttl` after this call.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), ProofCacheError>;

    async fn delete(&self, key: &str) -> Result<(), ProofCacheError>;

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, ProofCacheError>;

    /// Writes `replacement` only if the current value still equals `expected`,
    /// where `None` stands for an absent key on either side. A `None`
    /// replacement deletes the key. Returns whether the write happened.
    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        replacement: Option<&str>,
        ttl: Duration,
    ) -> Result<bool, ProofCacheError>;
}

// ProofCodeStore port trait and errors
#[derive(Debug, Error)]
pub enum ProofCodeStoreError {
    #[error("Proof cache error: {0}")]
    Cache(#[from] ProofCacheError),
    #[error("Failed to encode proof items: {0}")]
    Encode(String),
    #[error("Gave up writing {key} after {attempts} conflicting attempts")]
    Contention { key: String, attempts: u32 },
}

#[async_trait]
pub trait ProofCodeStore: Send + Sync {
    /// Issues a fresh code for `email`, superseding any outstanding one.
    async fn generate_proof_code(&self, email: &str) -> Result<ProofCode, ProofCodeStoreError>;

    /// Whether an unexpired code exists for `email`.
    async fn contains(&self, email: &str) -> Result<bool, ProofCodeStoreError>;

    /// Checks `submitted` against the unexpired code for `email` without
    /// consuming it.
    async fn validate_proof_code(
        &self,
        email: &str,
        submitted: u32,
    ) -> Result<bool, ProofCodeStoreError>;

    async fn delete_proof_code(&self, email: &str) -> Result<(), ProofCodeStoreError>;

    async fn list_valid_proof_items(&self) -> Result<Vec<ProofItem>, ProofCodeStoreError>;
}

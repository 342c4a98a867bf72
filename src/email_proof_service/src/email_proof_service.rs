use email_proof_adapters::{HashMapProofCache, RandomCodeGenerator, RedisProofCache, SystemClock};
use email_proof_application::{
    CacheProofCodeStore, ProofPurpose, RequestProofCodeError, RequestProofCodeUseCase,
    VerifyProofCodeError, VerifyProofCodeUseCase,
};
use email_proof_core::{
    EmailAddress, EmailClient, ProofCodeStore, ProofCodeStoreError, ProofItem, UserDirectory,
};

pub type RedisProofCodeStore = CacheProofCodeStore<RedisProofCache, RandomCodeGenerator, SystemClock>;

pub type InMemoryProofCodeStore<K = SystemClock> =
    CacheProofCodeStore<HashMapProofCache<K>, RandomCodeGenerator, K>;

/// Entry point that ties a proof-code store to the request and verify flows
///
/// The store is cloned into each use case; clones of a store share the same
/// backing cache.
pub struct EmailProofService<S, U, E>
where
    S: ProofCodeStore + Clone,
    U: UserDirectory,
    E: EmailClient,
{
    proof_code_store: S,
    request_proof_code: RequestProofCodeUseCase<S, U, E>,
    verify_proof_code: VerifyProofCodeUseCase<S>,
}

impl<S, U, E> EmailProofService<S, U, E>
where
    S: ProofCodeStore + Clone,
    U: UserDirectory,
    E: EmailClient,
{
    /// Create a new EmailProofService
    ///
    /// # Arguments
    /// * `proof_code_store` - Store holding outstanding codes (must be Clone)
    /// * `user_directory` - Lookup for registered addresses
    /// * `email_client` - Client that delivers the codes
    pub fn new(proof_code_store: S, user_directory: U, email_client: E) -> Self {
        Self {
            request_proof_code: RequestProofCodeUseCase::new(
                proof_code_store.clone(),
                user_directory,
                email_client,
            ),
            verify_proof_code: VerifyProofCodeUseCase::new(proof_code_store.clone()),
            proof_code_store,
        }
    }

    pub fn proof_code_store(&self) -> &S {
        &self.proof_code_store
    }

    /// Issue a code for `purpose` and mail it to `email`
    pub async fn request_proof_code(
        &self,
        purpose: ProofPurpose,
        email: EmailAddress,
    ) -> Result<(), RequestProofCodeError> {
        self.request_proof_code.execute(purpose, email).await
    }

    /// Check a code typed in by the user; the code stays valid afterwards
    pub async fn verify_proof_code(
        &self,
        email: &EmailAddress,
        submitted: &str,
    ) -> Result<(), VerifyProofCodeError> {
        self.verify_proof_code.execute(email, submitted).await
    }

    /// Drop every code held for `email`, e.g. once the guarded action succeeded
    pub async fn delete_proof_code(&self, email: &str) -> Result<(), ProofCodeStoreError> {
        self.proof_code_store.delete_proof_code(email).await
    }

    pub async fn list_valid_proof_items(&self) -> Result<Vec<ProofItem>, ProofCodeStoreError> {
        self.proof_code_store.list_valid_proof_items().await
    }
}

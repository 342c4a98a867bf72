use email_proof_core::{
    EmailAddress, ProofCode, ProofCodeError, ProofCodeStore, ProofCodeStoreError,
};
use secrecy::ExposeSecret;

/// Error types for verify proof code use case
#[derive(Debug, thiserror::Error)]
pub enum VerifyProofCodeError {
    #[error("Proof code store error: {0}")]
    ProofCodeStoreError(#[from] ProofCodeStoreError),
    #[error("Malformed proof code: {0}")]
    MalformedProofCode(#[from] ProofCodeError),
    #[error("Invalid proof code")]
    InvalidProofCode,
}

/// Verify proof code use case - checks a submitted code against the store
///
/// The code stays valid after a successful check; callers that want a
/// one-shot code delete it once the guarded action has gone through.
pub struct VerifyProofCodeUseCase<S>
where
    S: ProofCodeStore,
{
    proof_code_store: S,
}

impl<S> VerifyProofCodeUseCase<S>
where
    S: ProofCodeStore,
{
    pub fn new(proof_code_store: S) -> Self {
        Self { proof_code_store }
    }

    #[tracing::instrument(name = "VerifyProofCodeUseCase::execute", skip(self, submitted))]
    pub async fn execute(
        &self,
        email: &EmailAddress,
        submitted: &str,
    ) -> Result<(), VerifyProofCodeError> {
        let code = ProofCode::parse(submitted)?;

        if !self
            .proof_code_store
            .validate_proof_code(email.as_ref().expose_secret(), code.value())
            .await?
        {
            return Err(VerifyProofCodeError::InvalidProofCode);
        }

        Ok(())
    }
}

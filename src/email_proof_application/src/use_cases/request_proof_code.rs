use email_proof_core::{
    EmailAddress, EmailClient, ProofCodeStore, ProofCodeStoreError, UserDirectory,
    UserDirectoryError,
};
use secrecy::ExposeSecret;

/// Account action a proof code is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofPurpose {
    /// Prove an address before creating an account with it.
    Registration,
    /// Prove ownership of an existing account's address.
    ChangePassword,
    /// Prove an address that is about to replace the current one.
    ChangeEmail,
}

impl ProofPurpose {
    fn requires_existing_user(self) -> bool {
        matches!(self, ProofPurpose::ChangePassword)
    }

    fn subject(self) -> &'static str {
        match self {
            ProofPurpose::Registration => "Confirm your email address",
            ProofPurpose::ChangePassword => "Password change code",
            ProofPurpose::ChangeEmail => "Confirm your new email address",
        }
    }
}

/// Error types specific to the request proof code use case
#[derive(Debug, thiserror::Error)]
pub enum RequestProofCodeError {
    #[error("A proof code was already sent to this address, try again later")]
    ResendTooSoon,
    #[error("Email address is already registered")]
    EmailAlreadyRegistered,
    #[error("User not found")]
    UserNotFound,
    #[error("Proof code store error: {0}")]
    ProofCodeStoreError(#[from] ProofCodeStoreError),
    #[error("User directory error: {0}")]
    UserDirectoryError(#[from] UserDirectoryError),
    #[error("Failed to send email: {0}")]
    EmailError(String),
}

/// Request proof code use case - issues a code and mails it to the address
pub struct RequestProofCodeUseCase<S, U, E>
where
    S: ProofCodeStore,
    U: UserDirectory,
    E: EmailClient,
{
    proof_code_store: S,
    user_directory: U,
    email_client: E,
}

impl<S, U, E> RequestProofCodeUseCase<S, U, E>
where
    S: ProofCodeStore,
    U: UserDirectory,
    E: EmailClient,
{
    pub fn new(proof_code_store: S, user_directory: U, email_client: E) -> Self {
        Self {
            proof_code_store,
            user_directory,
            email_client,
        }
    }

    /// Execute the request proof code use case
    ///
    /// # Arguments
    /// * `purpose` - Account action the code will unlock
    /// * `email` - Address that has to prove itself
    ///
    /// # Returns
    /// Ok(()) once the code is stored and handed to the email client
    #[tracing::instrument(name = "RequestProofCodeUseCase::execute", skip(self))]
    pub async fn execute(
        &self,
        purpose: ProofPurpose,
        email: EmailAddress,
    ) -> Result<(), RequestProofCodeError> {
        let address = email.as_ref().expose_secret();

        if self.proof_code_store.contains(address).await? {
            tracing::warn!("Timeout limit for email sending. Email: {address}");
            return Err(RequestProofCodeError::ResendTooSoon);
        }

        let user_exists = self.user_directory.user_exists(&email).await?;
        match (purpose.requires_existing_user(), user_exists) {
            (true, false) => {
                tracing::warn!("User with this email address does not exist. Email: {address}");
                return Err(RequestProofCodeError::UserNotFound);
            }
            (false, true) => {
                tracing::warn!("User with this email address already exists. Email: {address}");
                return Err(RequestProofCodeError::EmailAlreadyRegistered);
            }
            _ => {}
        }

        let code = self.proof_code_store.generate_proof_code(address).await?;

        if let Err(e) = self
            .email_client
            .send_email(&email, purpose.subject(), &format!("Your code: {code}"))
            .await
        {
            // An undelivered code must not hold the resend gate shut.
            if let Err(delete_error) = self.proof_code_store.delete_proof_code(address).await {
                tracing::error!(
                    "Failed to drop undelivered proof code for email {address}: {delete_error}"
                );
            }
            return Err(RequestProofCodeError::EmailError(e));
        }

        tracing::info!("Code successfully stored, Email: {address}");
        Ok(())
    }
}

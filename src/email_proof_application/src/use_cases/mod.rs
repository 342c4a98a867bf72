pub mod request_proof_code;
pub mod verify_proof_code;

pub use request_proof_code::{ProofPurpose, RequestProofCodeError, RequestProofCodeUseCase};
pub use verify_proof_code::{VerifyProofCodeError, VerifyProofCodeUseCase};

pub mod store;
pub mod use_cases;

pub use store::{CacheProofCodeStore, KeyLayout, StoreOptions, WriteMode};
pub use use_cases::{
    ProofPurpose, RequestProofCodeError, RequestProofCodeUseCase, VerifyProofCodeError,
    VerifyProofCodeUseCase,
};

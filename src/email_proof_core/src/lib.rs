pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    email_address::{EmailAddress, EmailAddressError},
    proof_code::{ProofCode, ProofCodeError},
    proof_item::{ProofItem, ProofItemCollection, emails_match},
};

pub use ports::{
    repositories::{ProofCache, ProofCacheError, ProofCodeStore, ProofCodeStoreError},
    services::{Clock, CodeGenerator, EmailClient, UserDirectory, UserDirectoryError},
};

pub mod cache_proof_code_store;
pub mod options;


pub use cache_proof_code_store::CacheProofCodeStore;
pub use options::{KeyLayout, StoreOptions, WriteMode};

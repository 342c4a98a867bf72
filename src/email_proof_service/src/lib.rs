mod email_proof_service;
pub mod helpers;
pub mod telemetry;

pub use email_proof_service::{EmailProofService, InMemoryProofCodeStore, RedisProofCodeStore};
pub use telemetry::init_tracing;

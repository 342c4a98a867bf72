//! # Email Proof - Proof-of-Email Code Library
//!
//! This is a facade crate that re-exports all public APIs from the email proof components.
//! Use this crate to issue, check and expire short numeric codes that prove control of an
//! email address.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! email_proof = { path = "../email_proof" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `ProofCode`, `ProofItem`, `ProofItemCollection`, `EmailAddress`
//! - **Ports**: `ProofCache`, `ProofCodeStore`, `CodeGenerator`, `Clock`, `EmailClient`
//! - **Store and use cases**: `CacheProofCodeStore`, `RequestProofCodeUseCase`, `VerifyProofCodeUseCase`
//! - **Adapters**: `RedisProofCache`, `HashMapProofCache`, `RandomCodeGenerator`, etc.
//! - **Service**: `EmailProofService` - The main entry point

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use email_proof_core::*;
}

pub use email_proof_core::{
    EmailAddress, EmailAddressError, ProofCode, ProofCodeError, ProofItem, ProofItemCollection,
};

// ============================================================================
// Ports
// ============================================================================

/// Cache and store traits
pub mod repositories {
    pub use email_proof_core::{ProofCache, ProofCacheError, ProofCodeStore, ProofCodeStoreError};
}

pub use email_proof_core::{
    Clock, CodeGenerator, EmailClient, ProofCache, ProofCacheError, ProofCodeStore,
    ProofCodeStoreError, UserDirectory, UserDirectoryError,
};

// ============================================================================
// Store and Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use email_proof_application::use_cases::*;
}

pub use email_proof_application::{
    CacheProofCodeStore, KeyLayout, ProofPurpose, RequestProofCodeError, RequestProofCodeUseCase,
    StoreOptions, VerifyProofCodeError, VerifyProofCodeUseCase, WriteMode,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Backing cache implementations
    pub mod persistence {
        pub use email_proof_adapters::persistence::*;
    }

    /// Code generators
    pub mod generators {
        pub use email_proof_adapters::generators::*;
    }

    /// Clocks
    pub mod clock {
        pub use email_proof_adapters::clock::*;
    }

    /// Email client implementations
    pub mod email {
        pub use email_proof_adapters::email::*;
    }

    /// User directory implementations
    pub mod directory {
        pub use email_proof_adapters::directory::*;
    }

    /// Configuration
    pub mod config {
        pub use email_proof_adapters::config::*;
    }
}

pub use email_proof_adapters::{
    EmailProofSetting, HashMapProofCache, HashSetUserDirectory, ManualClock, MockEmailClient,
    RandomCodeGenerator, RedisProofCache, SeededCodeGenerator, SystemClock,
};

// ============================================================================
// Email Proof Service (Main Entry Point)
// ============================================================================

pub use email_proof_service::{
    EmailProofService, InMemoryProofCodeStore, RedisProofCodeStore,
    helpers::{
        configure_redis, get_redis_client, in_memory_proof_code_store,
        in_memory_proof_code_store_with_clock, redis_proof_code_store,
    },
    init_tracing,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

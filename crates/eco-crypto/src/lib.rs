//! Hashing primitives for EcoLedger.
//!
//! Provides domain-separated BLAKE3 hashing of canonical JSON and a generic
//! verifier for linear hash chains.
//!
//! The only hash function is BLAKE3 from the `blake3` crate.

pub mod chain;
pub mod hasher;

pub use chain::{ChainError, ChainLinked, HashChainVerifier};
pub use hasher::{ContentHasher, HasherError};

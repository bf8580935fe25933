//! Foundation types for EcoLedger.
//!
//! This crate provides the small value types shared by every other EcoLedger
//! crate. Nothing here performs I/O beyond reading the wall clock.
//!
//! # Key Types
//!
//! - [`Digest`] — 32-byte BLAKE3 entry digest, with the genesis sentinel
//! - [`Timestamp`] — Millisecond wall-clock instant captured once per entry
//! - [`Clock`] — Injectable time source ([`SystemClock`], [`ManualClock`])
//! - [`TokenAmount`] — Exact, non-negative token balance in hundredths
//! - [`SignedAmount`] — Signed ledger delta in hundredths
//! - [`Tier`] — Ordered reward band derived from cumulative bottle count

pub mod amount;
pub mod digest;
pub mod error;
pub mod temporal;
pub mod tier;

pub use amount::{SignedAmount, TokenAmount};
pub use digest::Digest;
pub use error::TypeError;
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp};
pub use tier::Tier;

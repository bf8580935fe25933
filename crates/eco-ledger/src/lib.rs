//! Append-only hash-chained ledger for EcoLedger.
//!
//! This crate provides:
//! - The entry codec: [`EntryPayload`], [`LedgerEntry`] and the canonical
//!   digest over `(index, timestamp, payload, previous_digest)`
//! - [`Ledger`], the single-writer chain that starts at a genesis entry and
//!   only ever grows through [`Ledger::append`]
//! - Integrity checks ([`Ledger::is_valid`], [`Ledger::validate`])
//! - Audit export as flat rows, CSV, and full JSON

pub mod entry;
pub mod error;
pub mod export;
pub mod ledger;
pub mod validation;

pub use entry::{make_entry, make_entry_at, EntryPayload, LedgerEntry, GENESIS_NOTE};
pub use error::LedgerError;
pub use export::{audit_rows, from_json, to_csv, to_json, AuditRow, DigestFormat};
pub use ledger::Ledger;
pub use validation::{ValidationReport, Violation, ViolationKind};

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use eco_crypto::HashChainVerifier;
use eco_types::{Clock, Digest, SystemClock};

use crate::entry::{make_entry_at, EntryPayload, LedgerEntry};
use crate::error::LedgerError;
use crate::validation::ValidationReport;

/// Append-only, hash-chained sequence of entries owned by one session.
///
/// A ledger always holds its genesis entry. The only mutator is
/// [`Ledger::append`]; entries are never edited or removed, and readers only
/// ever receive shared references.
#[derive(Clone)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
    clock: Arc<dyn Clock>,
}

impl Ledger {
    /// A ledger holding the default genesis entry, stamped by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// A ledger with the default genesis entry and a custom clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        match Self::with_genesis_and_clock(EntryPayload::genesis(), clock) {
            Ok(ledger) => ledger,
            Err(e) => unreachable!("default genesis payload always encodes: {e}"),
        }
    }

    /// A ledger whose genesis entry records the given opening state.
    pub fn with_genesis(payload: EntryPayload) -> Result<Self, LedgerError> {
        Self::with_genesis_and_clock(payload, Arc::new(SystemClock))
    }

    pub fn with_genesis_and_clock(
        payload: EntryPayload,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, LedgerError> {
        let genesis = make_entry_at(0, clock.now(), payload, Digest::SENTINEL)?;
        debug!(digest = %genesis.digest.short_hex(), "genesis entry created");
        Ok(Self {
            entries: vec![genesis],
            clock,
        })
    }

    /// Adopt an externally supplied chain, e.g. one loaded from an export.
    ///
    /// No validation happens here; call [`Ledger::is_valid`] or
    /// [`Ledger::validate`] before trusting it.
    pub fn from_entries(entries: Vec<LedgerEntry>) -> Result<Self, LedgerError> {
        if entries.is_empty() {
            return Err(LedgerError::Empty);
        }
        Ok(Self {
            entries,
            clock: Arc::new(SystemClock),
        })
    }

    /// Append a new entry linked to the current tail and return a copy of it.
    ///
    /// On an encoding failure the ledger is left untouched.
    pub fn append(&mut self, payload: EntryPayload) -> Result<LedgerEntry, LedgerError> {
        let index = self.entries.len() as u64;
        let previous_digest = self.tail().digest;
        let entry = make_entry_at(index, self.clock.now(), payload, previous_digest)?;
        debug!(
            index,
            action = entry.action(),
            digest = %entry.digest.short_hex(),
            "ledger append"
        );
        self.entries.push(entry.clone());
        Ok(entry)
    }

    /// Number of entries, genesis included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: a ledger holds at least its genesis entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in index order. Each call starts a fresh traversal.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &LedgerEntry> + '_ {
        self.entries.iter()
    }

    pub fn get(&self, index: u64) -> Option<&LedgerEntry> {
        usize::try_from(index).ok().and_then(|i| self.entries.get(i))
    }

    pub fn genesis(&self) -> &LedgerEntry {
        &self.entries[0]
    }

    /// The most recently appended entry.
    pub fn tail(&self) -> &LedgerEntry {
        &self.entries[self.entries.len() - 1]
    }

    /// Check the whole chain, stopping at the first mismatch.
    ///
    /// Recomputes every digest from stored fields and checks every link,
    /// index and the genesis position. Never mutates the ledger.
    pub fn is_valid(&self) -> bool {
        let chain_ok = match HashChainVerifier::verify_chain(&self.entries) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "ledger integrity check failed");
                false
            }
        };
        chain_ok && self.genesis_placement_ok()
    }

    /// Full scan reporting every violation found.
    pub fn validate(&self) -> ValidationReport {
        ValidationReport::build(&self.entries)
    }

    fn genesis_placement_ok(&self) -> bool {
        let ok = self
            .entries
            .iter()
            .enumerate()
            .all(|(i, e)| e.payload.is_genesis() == (i == 0));
        if !ok {
            warn!("ledger genesis payload misplaced");
        }
        ok
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("len", &self.entries.len())
            .field("tail", &self.tail().digest)
            .finish()
    }
}

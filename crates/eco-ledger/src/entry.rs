use serde::{Deserialize, Serialize};

use eco_crypto::{ChainLinked, ContentHasher};
use eco_types::{Clock, Digest, SignedAmount, SystemClock, Timestamp, TokenAmount};

use crate::error::LedgerError;

/// Note carried by the default genesis payload.
pub const GENESIS_NOTE: &str = "EcoGuayaquil genesis";

/// The event recorded by a ledger entry.
///
/// A closed set of event kinds, each carrying only its own fields. All
/// numeric fields are integers so the JSON encoding is canonical; the
/// `action` tag is written first, then fields in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EntryPayload {
    /// Opening state of the session.
    Genesis {
        note: String,
        opening_balance: TokenAmount,
        opening_bottles: u64,
    },
    /// Bottles accepted by a collection point.
    Deposit {
        actor: String,
        quantity: u32,
        weight_grams: u64,
        tokens: TokenAmount,
        co2_grams: u64,
        location: String,
    },
    /// Catalog item paid for with tokens. `cost` is the negative delta.
    #[serde(rename = "redeem")]
    Redemption {
        actor: String,
        item: String,
        cost: SignedAmount,
    },
}

impl EntryPayload {
    /// Genesis payload with no opening balance.
    pub fn genesis() -> Self {
        Self::Genesis {
            note: GENESIS_NOTE.into(),
            opening_balance: TokenAmount::ZERO,
            opening_bottles: 0,
        }
    }

    /// Stable action name: `genesis`, `deposit` or `redeem`.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Genesis { .. } => "genesis",
            Self::Deposit { .. } => "deposit",
            Self::Redemption { .. } => "redeem",
        }
    }

    /// Signed token delta recorded by this entry. Genesis reports its
    /// opening balance.
    pub fn amount(&self) -> SignedAmount {
        match self {
            Self::Genesis {
                opening_balance, ..
            } => opening_balance.credit(),
            Self::Deposit { tokens, .. } => tokens.credit(),
            Self::Redemption { cost, .. } => *cost,
        }
    }

    pub fn is_genesis(&self) -> bool {
        matches!(self, Self::Genesis { .. })
    }
}

/// One link of the chain.
///
/// `digest` is computed once by [`make_entry_at`] and never recomputed in
/// place. Fields are public for reading; a [`crate::Ledger`] only hands out
/// shared references.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub index: u64,
    pub timestamp: Timestamp,
    pub payload: EntryPayload,
    pub previous_digest: Digest,
    pub digest: Digest,
}

/// Fields covered by the digest, in their canonical order.
#[derive(Serialize)]
struct DigestInput<'a> {
    index: u64,
    timestamp: Timestamp,
    payload: &'a EntryPayload,
    previous_digest: Digest,
}

fn digest_of(
    index: u64,
    timestamp: Timestamp,
    payload: &EntryPayload,
    previous_digest: Digest,
) -> Result<Digest, LedgerError> {
    ContentHasher::ENTRY
        .hash_json(&DigestInput {
            index,
            timestamp,
            payload,
            previous_digest,
        })
        .map_err(|e| LedgerError::Encoding(e.to_string()))
}

/// Build an entry stamped with the current wall-clock time.
pub fn make_entry(
    index: u64,
    payload: EntryPayload,
    previous_digest: Digest,
) -> Result<LedgerEntry, LedgerError> {
    make_entry_at(index, SystemClock.now(), payload, previous_digest)
}

/// Build an entry with an explicit timestamp.
pub fn make_entry_at(
    index: u64,
    timestamp: Timestamp,
    payload: EntryPayload,
    previous_digest: Digest,
) -> Result<LedgerEntry, LedgerError> {
    let digest = digest_of(index, timestamp, &payload, previous_digest)?;
    Ok(LedgerEntry {
        index,
        timestamp,
        payload,
        previous_digest,
        digest,
    })
}

impl LedgerEntry {
    /// Recompute the digest from the stored fields.
    pub fn compute_digest(&self) -> Result<Digest, LedgerError> {
        digest_of(self.index, self.timestamp, &self.payload, self.previous_digest)
    }

    /// Returns `true` if the stored digest matches the stored fields.
    pub fn verify_digest(&self) -> bool {
        self.compute_digest().is_ok_and(|d| d == self.digest)
    }

    pub fn action(&self) -> &'static str {
        self.payload.action()
    }

    pub fn amount(&self) -> SignedAmount {
        self.payload.amount()
    }
}

impl ChainLinked for LedgerEntry {
    fn position(&self) -> u64 {
        self.index
    }

    fn stored_digest(&self) -> Digest {
        self.digest
    }

    fn previous_digest(&self) -> Digest {
        self.previous_digest
    }

    fn recompute_digest(&self) -> Option<Digest> {
        self.compute_digest().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deposit(quantity: u32) -> EntryPayload {
        EntryPayload::Deposit {
            actor: "Francisco Cevallos".into(),
            quantity,
            weight_grams: u64::from(quantity) * 50,
            tokens: TokenAmount::from_cents(u64::from(quantity) * 50),
            co2_grams: u64::from(quantity) * 75,
            location: "Sensor_ITSO_01".into(),
        }
    }

    #[test]
    fn same_fields_same_digest() {
        let ts = Timestamp::from_millis(1_700_000_000_000);
        let a = make_entry_at(1, ts, deposit(10), Digest::SENTINEL).unwrap();
        let b = make_entry_at(1, ts, deposit(10), Digest::SENTINEL).unwrap();
        assert_eq!(a.digest, b.digest);
        assert!(a.verify_digest());
    }

    #[test]
    fn every_field_is_digested() {
        let ts = Timestamp::from_millis(1_700_000_000_000);
        let base = make_entry_at(1, ts, deposit(10), Digest::SENTINEL).unwrap();

        let other_index = make_entry_at(2, ts, deposit(10), Digest::SENTINEL).unwrap();
        let other_time =
            make_entry_at(1, Timestamp::from_millis(1), deposit(10), Digest::SENTINEL).unwrap();
        let other_payload = make_entry_at(1, ts, deposit(11), Digest::SENTINEL).unwrap();
        let other_prev =
            make_entry_at(1, ts, deposit(10), Digest::from_hash([7; 32])).unwrap();

        for other in [other_index, other_time, other_payload, other_prev] {
            assert_ne!(base.digest, other.digest);
        }
    }

    #[test]
    fn amount_is_part_of_the_digest() {
        let ts = Timestamp::from_millis(5);
        let redeem = |cents| EntryPayload::Redemption {
            actor: "Francisco".into(),
            item: "metrovia".into(),
            cost: SignedAmount::from_cents(cents),
        };
        let a = make_entry_at(3, ts, redeem(-300), Digest::SENTINEL).unwrap();
        let b = make_entry_at(3, ts, redeem(-800), Digest::SENTINEL).unwrap();
        assert_ne!(a.digest, b.digest);
    }

    #[test]
    fn make_entry_reads_the_clock() {
        let entry = make_entry(0, EntryPayload::genesis(), Digest::SENTINEL).unwrap();
        assert!(entry.timestamp.as_millis() > 1_577_836_800_000);
        assert!(entry.verify_digest());
    }

    #[test]
    fn tampering_breaks_verification() {
        let mut entry =
            make_entry_at(1, Timestamp::from_millis(9), deposit(5), Digest::SENTINEL).unwrap();
        if let EntryPayload::Deposit { tokens, .. } = &mut entry.payload {
            *tokens = TokenAmount::from_whole(1_000);
        }
        assert!(!entry.verify_digest());
    }

    #[test]
    fn canonical_encoding_is_tag_first_in_field_order() {
        let json = serde_json::to_string(&deposit(2)).unwrap();
        assert_eq!(
            json,
            r#"{"action":"deposit","actor":"Francisco Cevallos","quantity":2,"weight_grams":100,"tokens":100,"co2_grams":150,"location":"Sensor_ITSO_01"}"#
        );
    }

    #[test]
    fn action_and_amount() {
        assert_eq!(EntryPayload::genesis().action(), "genesis");
        assert_eq!(deposit(10).action(), "deposit");
        assert_eq!(deposit(10).amount(), SignedAmount::from_cents(500));
        let redeem = EntryPayload::Redemption {
            actor: "a".into(),
            item: "coffee".into(),
            cost: TokenAmount::from_whole(8).debit(),
        };
        assert_eq!(redeem.action(), "redeem");
        assert_eq!(redeem.amount().cents(), -800);
        assert!(EntryPayload::genesis().is_genesis());
        assert!(!redeem.is_genesis());
    }

    #[test]
    fn entry_serde_roundtrip_keeps_digest_valid() {
        let entry =
            make_entry_at(4, Timestamp::from_millis(77), deposit(3), Digest::SENTINEL).unwrap();
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: LedgerEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
        assert!(parsed.verify_digest());
    }
}

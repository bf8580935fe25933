use eco_crypto::{ChainError, HashChainVerifier};

use crate::entry::LedgerEntry;

/// Result of a full ledger scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub entry_count: u64,
    pub violations: Vec<Violation>,
}

/// A specific integrity violation detected during validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Offending entry, if the violation concerns one.
    pub index: Option<u64>,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    EmptyChain,
    IndexGap,
    GenesisLink,
    BrokenLink,
    DigestMismatch,
    Unencodable,
    MisplacedGenesis,
}

impl ValidationReport {
    /// Scan every entry without stopping at the first problem.
    pub(crate) fn build(entries: &[LedgerEntry]) -> Self {
        let mut violations: Vec<Violation> = HashChainVerifier::find_violations(entries)
            .into_iter()
            .map(Violation::from)
            .collect();

        for (i, entry) in entries.iter().enumerate() {
            let expect_genesis = i == 0;
            if entry.payload.is_genesis() != expect_genesis {
                violations.push(Violation {
                    index: Some(i as u64),
                    kind: ViolationKind::MisplacedGenesis,
                    description: if expect_genesis {
                        "first entry does not carry a genesis payload".into()
                    } else {
                        "genesis payload after the first entry".into()
                    },
                });
            }
        }
        violations.sort_by_key(|v| v.index);

        Self {
            entry_count: entries.len() as u64,
            violations,
        }
    }

    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// The violation with the lowest entry index.
    pub fn first_violation(&self) -> Option<&Violation> {
        self.violations.first()
    }
}

impl From<ChainError> for Violation {
    fn from(err: ChainError) -> Self {
        let kind = match err {
            ChainError::Empty => ViolationKind::EmptyChain,
            ChainError::PositionMismatch { .. } => ViolationKind::IndexGap,
            ChainError::GenesisNotSentinel => ViolationKind::GenesisLink,
            ChainError::BrokenLink { .. } => ViolationKind::BrokenLink,
            ChainError::DigestMismatch { .. } => ViolationKind::DigestMismatch,
            ChainError::Unencodable { .. } => ViolationKind::Unencodable,
        };
        Self {
            index: err.index().map(|i| i as u64),
            kind,
            description: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use eco_types::{Digest, SignedAmount, Timestamp, TokenAmount};

    use super::*;
    use crate::entry::{make_entry_at, EntryPayload};
    use crate::ledger::Ledger;

    fn deposit(quantity: u32) -> EntryPayload {
        EntryPayload::Deposit {
            actor: "tester".into(),
            quantity,
            weight_grams: 0,
            tokens: TokenAmount::from_cents(u64::from(quantity) * 50),
            co2_grams: 0,
            location: "Sensor_ITSO_01".into(),
        }
    }

    fn chain(len: u32) -> Vec<LedgerEntry> {
        let mut ledger = Ledger::new();
        for q in 1..len {
            ledger.append(deposit(q)).unwrap();
        }
        ledger.entries().cloned().collect()
    }

    #[test]
    fn valid_ledger_passes() {
        let report = ValidationReport::build(&chain(4));
        assert!(report.is_valid());
        assert_eq!(report.entry_count, 4);
        assert!(report.first_violation().is_none());
    }

    #[test]
    fn empty_chain_reported() {
        let report = ValidationReport::build(&[]);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].kind, ViolationKind::EmptyChain);
        assert_eq!(report.violations[0].index, None);
    }

    #[test]
    fn all_violations_are_listed_in_index_order() {
        let mut entries = chain(5);
        if let EntryPayload::Deposit { tokens, .. } = &mut entries[3].payload {
            *tokens = TokenAmount::from_whole(500);
        }
        if let EntryPayload::Deposit { quantity, .. } = &mut entries[1].payload {
            *quantity = 0;
        }
        let report = ValidationReport::build(&entries);
        let found: Vec<(Option<u64>, ViolationKind)> =
            report.violations.iter().map(|v| (v.index, v.kind)).collect();
        assert_eq!(
            found,
            vec![
                (Some(1), ViolationKind::DigestMismatch),
                (Some(3), ViolationKind::DigestMismatch),
            ]
        );
    }

    #[test]
    fn missing_genesis_payload_reported() {
        let ts = Timestamp::from_millis(1);
        let first = make_entry_at(0, ts, deposit(1), Digest::SENTINEL).unwrap();
        let report = ValidationReport::build(&[first]);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].kind, ViolationKind::MisplacedGenesis);
    }

    #[test]
    fn index_gap_reported() {
        let ts = Timestamp::from_millis(1);
        let genesis = make_entry_at(0, ts, EntryPayload::genesis(), Digest::SENTINEL).unwrap();
        let skipped = make_entry_at(
            2,
            ts,
            EntryPayload::Redemption {
                actor: "a".into(),
                item: "coffee".into(),
                cost: SignedAmount::from_cents(-800),
            },
            genesis.digest,
        )
        .unwrap();
        let report = ValidationReport::build(&[genesis, skipped]);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].kind, ViolationKind::IndexGap);
        assert_eq!(report.violations[0].index, Some(1));
    }
}

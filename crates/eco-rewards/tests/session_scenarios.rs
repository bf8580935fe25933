//! End-to-end session behaviour across the reward engine and the ledger.

use eco_ledger::{audit_rows, to_csv, DigestFormat, EntryPayload, Ledger, LedgerEntry};
use eco_rewards::{
    FixedReadings, ProfileConfig, RewardEngine, RewardError, SensorReading, Session,
};
use eco_types::{Digest, Tier, TokenAmount};
use proptest::prelude::*;

fn open(balance: &str, bottles: u64) -> (RewardEngine, Session) {
    let engine = RewardEngine::default();
    let profile = ProfileConfig {
        name: "Francisco Cevallos".into(),
        balance: balance.parse().unwrap(),
        bottles,
    };
    let session = engine.open_session(&profile).unwrap();
    (engine, session)
}

#[test]
fn explorer_deposit_scenario() {
    let (engine, mut session) = open("12.50", 120);
    assert_eq!(session.profile().tier(), Tier::Explorer);
    let len_before = session.ledger().len();
    let tail_before = session.ledger().tail().digest;

    let outcome = engine
        .record_deposit(&mut session, &SensorReading::bottles(10))
        .unwrap();

    assert_eq!(outcome.tokens_awarded, TokenAmount::from_whole(5));
    assert_eq!(session.profile().token_balance().to_string(), "17.50");
    assert_eq!(session.profile().bottle_count(), 130);
    assert_eq!(session.ledger().len(), len_before + 1);
    assert_eq!(session.ledger().tail().previous_digest, tail_before);
}

#[test]
fn short_balance_redemption_scenario() {
    let (engine, mut session) = open("2.00", 0);
    let err = engine.redeem_by_id(&mut session, "metrovia").unwrap_err();
    assert!(matches!(err, RewardError::InsufficientBalance { .. }));
    assert_eq!(session.profile().token_balance().to_string(), "2.00");
    assert_eq!(session.ledger().len(), 1);
}

#[test]
fn two_deposits_of_five_scenario() {
    let (engine, mut session) = open("0", 0);
    let mut sensor = FixedReadings::new([SensorReading::bottles(5), SensorReading::bottles(5)]);
    engine.scan(&mut session, &mut sensor).unwrap();
    engine.scan(&mut session, &mut sensor).unwrap();
    assert_eq!(session.ledger().len(), 3);
    assert!(session.ledger().is_valid());
}

#[test]
fn genesis_is_index_zero_with_sentinel() {
    let (_, session) = open("12.50", 120);
    let genesis = session.ledger().entries().next().unwrap();
    assert_eq!(genesis.index, 0);
    assert_eq!(genesis.previous_digest, Digest::SENTINEL);
    assert!(genesis.payload.is_genesis());
}

#[test]
fn tampered_copy_fails_verification() {
    let (engine, mut session) = open("12.50", 120);
    engine
        .record_deposit(&mut session, &SensorReading::bottles(10))
        .unwrap();
    engine.redeem_by_id(&mut session, "metrovia").unwrap();

    let mut entries: Vec<LedgerEntry> = session.ledger().entries().cloned().collect();
    if let EntryPayload::Deposit { tokens, .. } = &mut entries[1].payload {
        *tokens = TokenAmount::from_whole(50);
    }
    let tampered = Ledger::from_entries(entries).unwrap();
    assert!(!tampered.is_valid());
    // The live session is untouched.
    assert!(session.ledger().is_valid());
}

#[test]
fn audit_export_matches_session_history() {
    let (engine, mut session) = open("12.50", 120);
    engine
        .record_deposit(&mut session, &SensorReading::new(8, 0.4))
        .unwrap();
    engine.redeem_by_id(&mut session, "metrovia").unwrap();

    let rows = audit_rows(session.ledger(), DigestFormat::Short);
    let actions: Vec<&str> = rows.iter().map(|r| r.action).collect();
    assert_eq!(actions, vec!["genesis", "deposit", "redeem"]);
    assert_eq!(rows[2].amount.to_string(), "-3.00");
    assert_eq!(to_csv(&rows).lines().count(), session.ledger().len() + 1);
}

#[derive(Clone, Debug)]
enum Op {
    Deposit(u32),
    Redeem(&'static str),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u32..40).prop_map(Op::Deposit),
        prop_oneof![
            Just("metrovia"),
            Just("coffee"),
            Just("sweet-coffee"),
            Just("comisariato"),
        ]
        .prop_map(Op::Redeem),
    ]
}

proptest! {
    #[test]
    fn every_operation_sequence_keeps_invariants(ops in proptest::collection::vec(arb_op(), 0..60)) {
        let (engine, mut session) = open("0", 0);
        let mut last_tier = session.profile().tier();

        for op in ops {
            let balance_before = session.profile().token_balance();
            let len_before = session.ledger().len();

            match op {
                Op::Deposit(q) => {
                    engine.record_deposit(&mut session, &SensorReading::bottles(q)).unwrap();
                    prop_assert_eq!(session.ledger().len(), len_before + 1);
                }
                Op::Redeem(id) => {
                    let cost = engine.catalog().find(id).unwrap().cost;
                    match engine.redeem_by_id(&mut session, id) {
                        Ok(_) => {
                            prop_assert!(balance_before >= cost);
                            prop_assert_eq!(session.ledger().len(), len_before + 1);
                        }
                        Err(RewardError::InsufficientBalance { .. }) => {
                            prop_assert!(balance_before < cost);
                            prop_assert_eq!(session.profile().token_balance(), balance_before);
                            prop_assert_eq!(session.ledger().len(), len_before);
                        }
                        Err(e) => prop_assert!(false, "unexpected error {e}"),
                    }
                }
            }

            prop_assert!(session.ledger().is_valid());
            prop_assert!(session.profile().tier() >= last_tier);
            last_tier = session.profile().tier();
        }

        let entries: Vec<&LedgerEntry> = session.ledger().entries().collect();
        for (n, entry) in entries.iter().enumerate() {
            prop_assert_eq!(entry.index, n as u64);
            if n > 0 {
                prop_assert_eq!(entry.previous_digest, entries[n - 1].digest);
            }
        }
    }
}

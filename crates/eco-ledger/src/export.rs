use serde::Serialize;

use eco_types::{SignedAmount, Timestamp};

use crate::entry::LedgerEntry;
use crate::error::LedgerError;
use crate::ledger::Ledger;

/// How digests are rendered in audit rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DigestFormat {
    /// All 64 hex characters.
    #[default]
    Full,
    /// The first ten hex characters of every digest.
    Short,
}

/// Flat row for tabular display or CSV export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuditRow {
    pub index: u64,
    pub timestamp: Timestamp,
    pub action: &'static str,
    pub amount: SignedAmount,
    pub digest: String,
}

impl AuditRow {
    /// Render an entry. The stored digest is copied, never recomputed.
    pub fn from_entry(entry: &LedgerEntry, format: DigestFormat) -> Self {
        let digest = match format {
            DigestFormat::Full => entry.digest.to_hex(),
            DigestFormat::Short => entry.digest.short_hex(),
        };
        Self {
            index: entry.index,
            timestamp: entry.timestamp,
            action: entry.action(),
            amount: entry.amount(),
            digest,
        }
    }
}

/// One row per entry, in index order.
pub fn audit_rows(ledger: &Ledger, format: DigestFormat) -> Vec<AuditRow> {
    ledger
        .entries()
        .map(|e| AuditRow::from_entry(e, format))
        .collect()
}

/// Render rows as CSV with a header line.
pub fn to_csv(rows: &[AuditRow]) -> String {
    let mut out = String::from("index,timestamp,action,amount,digest\n");
    for row in rows {
        let fields = [
            row.index.to_string(),
            row.timestamp.to_string(),
            row.action.to_string(),
            row.amount.to_string(),
            row.digest.clone(),
        ];
        let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Full JSON export of every entry, suitable for [`from_json`].
pub fn to_json(ledger: &Ledger) -> Result<String, LedgerError> {
    let entries: Vec<&LedgerEntry> = ledger.entries().collect();
    serde_json::to_string_pretty(&entries).map_err(|e| LedgerError::Encoding(e.to_string()))
}

/// Load a JSON export. The result is not validated.
pub fn from_json(json: &str) -> Result<Ledger, LedgerError> {
    let entries: Vec<LedgerEntry> =
        serde_json::from_str(json).map_err(|e| LedgerError::Decoding(e.to_string()))?;
    Ledger::from_entries(entries)
}

#[cfg(test)]
mod tests {
    use eco_types::TokenAmount;

    use super::*;
    use crate::entry::EntryPayload;

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger
            .append(EntryPayload::Deposit {
                actor: "Francisco".into(),
                quantity: 10,
                weight_grams: 500,
                tokens: TokenAmount::from_whole(5),
                co2_grams: 750,
                location: "Sensor_ITSO_01".into(),
            })
            .unwrap();
        ledger
            .append(EntryPayload::Redemption {
                actor: "Francisco".into(),
                item: "metrovia".into(),
                cost: TokenAmount::from_whole(3).debit(),
            })
            .unwrap();
        ledger
    }

    #[test]
    fn rows_mirror_entries() {
        let ledger = sample_ledger();
        let rows = audit_rows(&ledger, DigestFormat::Full);
        assert_eq!(rows.len(), ledger.len());
        assert_eq!(rows[1].action, "deposit");
        assert_eq!(rows[1].amount.to_string(), "5.00");
        assert_eq!(rows[2].action, "redeem");
        assert_eq!(rows[2].amount.to_string(), "-3.00");
        for (row, entry) in rows.iter().zip(ledger.entries()) {
            assert_eq!(row.index, entry.index);
            assert_eq!(row.digest, entry.digest.to_hex());
        }
    }

    #[test]
    fn short_digests_are_consistent_prefixes() {
        let ledger = sample_ledger();
        for (row, entry) in audit_rows(&ledger, DigestFormat::Short)
            .iter()
            .zip(ledger.entries())
        {
            assert_eq!(row.digest.len(), 10);
            assert!(entry.digest.to_hex().starts_with(&row.digest));
        }
    }

    #[test]
    fn csv_has_header_and_one_line_per_entry() {
        let ledger = sample_ledger();
        let csv = to_csv(&audit_rows(&ledger, DigestFormat::Short));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "index,timestamp,action,amount,digest");
        assert_eq!(lines.len(), ledger.len() + 1);
        assert!(lines[3].starts_with("2,"));
        assert!(lines[3].contains(",redeem,-3.00,"));
    }

    #[test]
    fn csv_quotes_special_characters() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn json_export_reloads_as_valid_chain() {
        let ledger = sample_ledger();
        let json = to_json(&ledger).unwrap();
        let reloaded = from_json(&json).unwrap();
        assert_eq!(reloaded.len(), ledger.len());
        assert!(reloaded.is_valid());
        assert_eq!(reloaded.tail().digest, ledger.tail().digest);
    }

    #[test]
    fn edited_json_export_fails_validation() {
        let json = to_json(&sample_ledger()).unwrap();
        let edited = json.replace("\"quantity\": 10", "\"quantity\": 100");
        assert_ne!(json, edited);
        assert!(!from_json(&edited).unwrap().is_valid());
    }

    #[test]
    fn malformed_json_is_a_decoding_error() {
        assert!(matches!(from_json("not json"), Err(LedgerError::Decoding(_))));
        assert_eq!(from_json("[]").unwrap_err(), LedgerError::Empty);
    }
}

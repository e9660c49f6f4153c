use std::collections::HashSet;

use thiserror::Error;

use crate::domain::{try_compute_totals, Transaction, TransactionId};

/// Store key holding the full transaction list.
pub const SNAPSHOT_KEY: &str = "transactions";

/// Why a stored snapshot could not be restored.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("duplicate transaction id {0}")]
    DuplicateId(TransactionId),

    #[error("transaction id {0} leaves no room for new ids")]
    IdOutOfRange(TransactionId),

    #[error("income or expense total does not fit in a decimal")]
    TotalsOverflow,
}

/// Serialize the whole transaction list. Every write replaces the previous
/// snapshot entirely.
pub fn serialize_snapshot(entries: &[Transaction]) -> Result<String, serde_json::Error> {
    serde_json::to_string(entries)
}

/// Parse a stored snapshot, rejecting it as a whole if any record is invalid.
pub fn try_hydrate(raw: &str) -> Result<Vec<Transaction>, SnapshotError> {
    let entries: Vec<Transaction> = serde_json::from_str(raw)?;

    let mut seen = HashSet::with_capacity(entries.len());
    for entry in &entries {
        if entry.id == TransactionId::MAX {
            return Err(SnapshotError::IdOutOfRange(entry.id));
        }
        if !seen.insert(entry.id) {
            return Err(SnapshotError::DuplicateId(entry.id));
        }
    }

    if try_compute_totals(&entries).is_none() {
        return Err(SnapshotError::TotalsOverflow);
    }

    Ok(entries)
}

/// Restore entries from whatever the store returned. Missing or unreadable
/// content yields an empty list; the failure is logged and goes no further.
pub fn hydrate(raw: Option<&str>) -> Vec<Transaction> {
    let Some(raw) = raw else {
        tracing::debug!("no stored snapshot, starting empty");
        return Vec::new();
    };

    match try_hydrate(raw) {
        Ok(entries) => {
            tracing::debug!(count = entries.len(), "restored snapshot");
            entries
        }
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable snapshot, starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{Category, NewTransaction};

    fn sample_entries() -> Vec<Transaction> {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        vec![
            NewTransaction::income("500")
                .with_category(Category::Other)
                .with_date(day(1))
                .into_transaction(1, day(1))
                .unwrap(),
            NewTransaction::expense("120.50")
                .with_category(Category::Food)
                .with_description("Groceries")
                .with_date(day(2))
                .into_transaction(2, day(2))
                .unwrap(),
        ]
    }

    #[test]
    fn test_round_trip_preserves_order_and_fields() {
        let entries = sample_entries();
        let raw = serialize_snapshot(&entries).unwrap();
        assert_eq!(hydrate(Some(&raw)), entries);
    }

    #[test]
    fn test_absent_is_empty() {
        assert!(hydrate(None).is_empty());
    }

    #[test]
    fn test_empty_array() {
        assert!(hydrate(Some("[]")).is_empty());
    }

    #[test]
    fn test_corrupted_input_is_empty() {
        for raw in [
            "",
            "not json",
            "{\"id\": 1}",
            "42",
            "null",
            "[{\"id\": 1}]",
            "[{\"id\":1,\"type\":\"expense\",\"amount\":\"abc\",\"category\":\"Food\",\"description\":null,\"date\":\"2024-01-01\"}]",
            "[{\"id\":1,\"type\":\"expense\",\"amount\":0,\"category\":\"Food\",\"description\":null,\"date\":\"2024-01-01\"}]",
            "[{\"id\":1,\"type\":\"refund\",\"amount\":5,\"category\":\"Food\",\"description\":null,\"date\":\"2024-01-01\"}]",
            "[{\"id\":1,\"type\":\"expense\",\"amount\":5,\"category\":\"Rent\",\"description\":null,\"date\":\"2024-01-01\"}]",
            "[{\"id\":1,\"type\":\"expense\",\"amount\":5,\"category\":\"Food\",\"description\":null,\"date\":\"yesterday\"}]",
        ] {
            assert!(hydrate(Some(raw)).is_empty(), "expected empty for {raw:?}");
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut entries = sample_entries();
        entries[1].id = entries[0].id;
        let raw = serialize_snapshot(&entries).unwrap();

        assert!(matches!(
            try_hydrate(&raw),
            Err(SnapshotError::DuplicateId(1))
        ));
        assert!(hydrate(Some(&raw)).is_empty());
    }

    #[test]
    fn test_round_trip_keeps_long_amounts() {
        let mut entries = sample_entries();
        entries[0].amount = "1234567890.123456789".parse().unwrap();
        entries[1].amount = "79228162514264337593543950335".parse().unwrap();

        let raw = serialize_snapshot(&entries).unwrap();
        assert!(raw.contains("\"amount\":1234567890.123456789"));
        assert_eq!(try_hydrate(&raw).unwrap(), entries);
    }

    #[test]
    fn test_max_id_rejected() {
        let mut entries = sample_entries();
        entries[1].id = TransactionId::MAX;
        let raw = serialize_snapshot(&entries).unwrap();

        assert!(matches!(
            try_hydrate(&raw),
            Err(SnapshotError::IdOutOfRange(id)) if id == TransactionId::MAX
        ));
        assert!(hydrate(Some(&raw)).is_empty());
    }

    #[test]
    fn test_overflowing_totals_rejected() {
        let mut entries = sample_entries();
        entries[1].kind = entries[0].kind;
        entries[0].amount = "50000000000000000000000000000".parse().unwrap();
        entries[1].amount = entries[0].amount;
        let raw = serialize_snapshot(&entries).unwrap();

        assert!(matches!(try_hydrate(&raw), Err(SnapshotError::TotalsOverflow)));
        assert!(hydrate(Some(&raw)).is_empty());
    }

    #[test]
    fn test_reads_snapshot_written_by_web_tracker() {
        let raw = r#"[
            {"type":"ingreso","amount":"500","category":"Otros","description":"","date":"2024-01-01","id":1704067200000},
            {"type":"gasto","amount":"120.50","category":"Alimentación","description":"Super","date":"2024-01-02","id":1704153600000}
        ]"#;

        let entries = try_hydrate(raw).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(crate::domain::compute_balance(&entries).to_string(), "379.50");
    }

    #[test]
    fn test_missing_description_field_is_absent() {
        let raw = r#"[{"id":1,"type":"income","amount":5,"category":"Health","date":"2024-01-01"}]"#;
        let entries = try_hydrate(raw).unwrap();
        assert_eq!(entries[0].description, None);
    }
}

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::domain::{
    compute_balance, compute_totals, try_compute_totals, Amount, IdGenerator, NewTransaction,
    Totals, Transaction, TransactionId, ValidationError,
};
use crate::storage::{hydrate, serialize_snapshot, Store, SNAPSHOT_KEY};

use super::AppError;

/// The in-memory transaction list, mirrored to a [`Store`] after every change.
///
/// Construct one at startup and hand references to whatever renders it.
pub struct Ledger<S: Store> {
    entries: Vec<Transaction>,
    ids: IdGenerator,
    store: S,
    last_write_error: Option<String>,
}

impl<S: Store> Ledger<S> {
    /// Hydrate from the snapshot in `store`. A store that fails to read is
    /// treated like an empty one.
    pub fn open(store: S) -> Self {
        let raw = match store.load(SNAPSHOT_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read snapshot, starting empty");
                None
            }
        };
        let entries = hydrate(raw.as_deref());
        Self::with_entries(store, entries)
    }

    /// Build a ledger around entries that were already restored.
    pub fn with_entries(store: S, entries: Vec<Transaction>) -> Self {
        let ids = IdGenerator::seeded(entries.iter().map(|tx| tx.id));
        Self {
            entries,
            ids,
            store,
            last_write_error: None,
        }
    }

    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.entries.iter().find(|tx| tx.id == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The most recent snapshot write failure, cleared by the next
    /// successful write.
    pub fn last_write_error(&self) -> Option<&str> {
        self.last_write_error.as_deref()
    }

    /// Validate and append a transaction dated today if `date` is unset.
    pub fn add_transaction(&mut self, candidate: NewTransaction) -> Result<&Transaction, AppError> {
        self.add_transaction_on(candidate, Utc::now().date_naive())
    }

    /// Like [`Ledger::add_transaction`] with an explicit "today".
    pub fn add_transaction_on(
        &mut self,
        candidate: NewTransaction,
        today: NaiveDate,
    ) -> Result<&Transaction, AppError> {
        let amount: Amount = candidate.amount.parse()?;
        let fits = try_compute_totals(&self.entries)
            .and_then(|totals| totals.checked_add(candidate.kind, amount))
            .is_some();
        if !fits {
            return Err(ValidationError::TotalOverflow(amount.value(), candidate.kind).into());
        }

        let Some(id) = self.ids.next_id() else {
            let last = self.entries.iter().map(|tx| tx.id).max().unwrap_or_default();
            return Err(AppError::IdsExhausted(last));
        };
        let transaction = candidate.build(id, amount, today);

        tracing::info!(
            id = transaction.id,
            kind = %transaction.kind,
            amount = %transaction.amount,
            category = %transaction.category,
            "added transaction"
        );
        self.entries.push(transaction);
        self.sync();

        let index = self.entries.len() - 1;
        Ok(&self.entries[index])
    }

    /// Remove the entry with `id`. Unknown ids are a no-op and do not touch
    /// the store.
    pub fn remove_transaction(&mut self, id: TransactionId) -> Option<Transaction> {
        let position = self.entries.iter().position(|tx| tx.id == id)?;
        let removed = self.entries.remove(position);

        tracing::info!(id, "removed transaction");
        self.sync();
        Some(removed)
    }

    /// Running balance: income minus expenses.
    pub fn balance(&self) -> Decimal {
        compute_balance(&self.entries)
    }

    pub fn totals(&self) -> Totals {
        compute_totals(&self.entries)
    }

    /// Write the full snapshot, returning any failure to the caller.
    pub fn flush(&mut self) -> Result<(), AppError> {
        let raw = serialize_snapshot(&self.entries)?;
        self.store.save(SNAPSHOT_KEY, &raw)?;
        tracing::debug!(count = self.entries.len(), "snapshot written");
        Ok(())
    }

    // Mutations have already happened in memory; a failed write is logged and
    // remembered rather than rolled back.
    fn sync(&mut self) {
        match self.flush() {
            Ok(()) => self.last_write_error = None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist transactions");
                self.last_write_error = Some(e.to_string());
            }
        }
    }
}

use chrono::{NaiveDate, Utc};

use crate::domain::{Category, NewTransaction, TransactionId, TransactionKind};
use crate::storage::Store;

use super::{AppError, Ledger};

/// Entry form state between submissions.
///
/// After a successful submit only `amount` and `description` are cleared;
/// `kind`, `category` and `date` carry over so consecutive entries for the
/// same day or category need no re-typing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    pub kind: TransactionKind,
    pub amount: String,
    pub category: Category,
    pub description: String,
    pub date: NaiveDate,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self::new(Utc::now().date_naive())
    }
}

impl EntryForm {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            kind: TransactionKind::Expense,
            amount: String::new(),
            category: Category::Food,
            description: String::new(),
            date,
        }
    }

    pub fn set_kind(&mut self, value: &str) -> Result<(), AppError> {
        self.kind =
            TransactionKind::from_str(value).ok_or_else(|| AppError::UnknownKind(value.into()))?;
        Ok(())
    }

    pub fn set_category(&mut self, value: &str) -> Result<(), AppError> {
        self.category =
            Category::from_str(value).ok_or_else(|| AppError::UnknownCategory(value.into()))?;
        Ok(())
    }

    pub fn set_date(&mut self, value: &str) -> Result<(), AppError> {
        self.date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map_err(|_| AppError::InvalidDate(value.to_string()))?;
        Ok(())
    }

    pub fn to_candidate(&self) -> NewTransaction {
        NewTransaction {
            kind: self.kind,
            amount: self.amount.clone(),
            category: self.category,
            description: Some(self.description.clone()),
            date: Some(self.date),
        }
    }

    /// Add the form contents to `ledger`. On failure the form is left as is
    /// so the user can correct it.
    pub fn submit<S: Store>(&mut self, ledger: &mut Ledger<S>) -> Result<TransactionId, AppError> {
        let id = ledger.add_transaction(self.to_candidate())?.id;
        self.amount.clear();
        self.description.clear();
        Ok(id)
    }
}

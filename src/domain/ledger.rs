use rust_decimal::Decimal;

use super::{Amount, Transaction, TransactionKind};

/// Income and expense sums over a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl Totals {
    /// income - expense. Cannot overflow while both totals are non-negative.
    pub fn balance(&self) -> Decimal {
        self.income.saturating_sub(self.expense)
    }

    /// Totals after adding one more entry, or `None` if that kind's sum
    /// would no longer fit in a `Decimal`.
    pub fn checked_add(self, kind: TransactionKind, amount: Amount) -> Option<Totals> {
        let mut next = self;
        match kind {
            TransactionKind::Income => next.income = self.income.checked_add(amount.value())?,
            TransactionKind::Expense => next.expense = self.expense.checked_add(amount.value())?,
        }
        Some(next)
    }
}

/// Compute the running balance from a list of transactions.
/// Balance = sum of income - sum of expenses
pub fn compute_balance(transactions: &[Transaction]) -> Decimal {
    compute_totals(transactions).balance()
}

/// Sum the amounts of every transaction of the given kind, saturating at
/// `Decimal::MAX`.
pub fn sum_by_kind(transactions: &[Transaction], kind: TransactionKind) -> Decimal {
    transactions
        .iter()
        .filter(|tx| tx.kind == kind)
        .fold(Decimal::ZERO, |sum, tx| sum.saturating_add(tx.amount.value()))
}

pub fn compute_totals(transactions: &[Transaction]) -> Totals {
    Totals {
        income: sum_by_kind(transactions, TransactionKind::Income),
        expense: sum_by_kind(transactions, TransactionKind::Expense),
    }
}

/// Exact totals, or `None` if either sum overflows.
pub fn try_compute_totals(transactions: &[Transaction]) -> Option<Totals> {
    transactions
        .iter()
        .try_fold(Totals::default(), |totals, tx| {
            totals.checked_add(tx.kind, tx.amount)
        })
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Amount;

pub type TransactionId = i64;

/// Shown in place of an absent description.
pub const NO_DESCRIPTION: &str = "No description";

/// Direction of a transaction. Determines its sign in the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[default]
    #[serde(alias = "gasto")]
    Expense,
    #[serde(alias = "ingreso")]
    Income,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "gasto" => Some(TransactionKind::Expense),
            "income" | "ingreso" => Some(TransactionKind::Income),
            _ => None,
        }
    }

    /// "+" for income, "-" for expense.
    pub fn sign(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "-",
            TransactionKind::Income => "+",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spending category. Snapshots written by earlier versions of the tracker
/// carry the Spanish labels, which are still accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(alias = "Alimentación", alias = "food")]
    Food,
    #[serde(alias = "Transporte", alias = "transport")]
    Transport,
    #[serde(alias = "Salud", alias = "health")]
    Health,
    #[serde(alias = "Entretenimiento", alias = "entertainment")]
    Entertainment,
    #[serde(alias = "Otros", alias = "other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Transport,
        Category::Health,
        Category::Entertainment,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Health => "Health",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "food" | "alimentación" | "alimentacion" => Some(Category::Food),
            "transport" | "transporte" => Some(Category::Transport),
            "health" | "salud" => Some(Category::Health),
            "entertainment" | "entretenimiento" => Some(Category::Entertainment),
            "other" | "otros" => Some(Category::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One recorded income or expense.
/// Transactions are immutable; an edit replaces the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Always positive; `kind` carries the sign
    pub amount: Amount,
    pub category: Category,
    #[serde(default)]
    pub description: Option<String>,
    /// Calendar day the money moved
    pub date: NaiveDate,
}

impl Transaction {
    /// Signed contribution of this entry to the balance.
    pub fn signed_amount(&self) -> rust_decimal::Decimal {
        match self.kind {
            TransactionKind::Income => self.amount.value(),
            TransactionKind::Expense => -self.amount.value(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Description for display, falling back to [`NO_DESCRIPTION`].
    pub fn display_description(&self) -> &str {
        match self.description.as_deref() {
            Some(desc) if !desc.trim().is_empty() => desc,
            _ => NO_DESCRIPTION,
        }
    }
}

/// A transaction as entered, before validation and id assignment.
#[derive(Debug, Clone, Default)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    /// Raw amount text, validated on add
    pub amount: String,
    pub category: Category,
    pub description: Option<String>,
    /// Defaults to today when absent
    pub date: Option<NaiveDate>,
}

impl NewTransaction {
    pub fn new(kind: TransactionKind, amount: impl Into<String>) -> Self {
        Self {
            kind,
            amount: amount.into(),
            ..Default::default()
        }
    }

    pub fn income(amount: impl Into<String>) -> Self {
        Self::new(TransactionKind::Income, amount)
    }

    pub fn expense(amount: impl Into<String>) -> Self {
        Self::new(TransactionKind::Expense, amount)
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Validate the draft into a transaction carrying `id`.
    pub fn into_transaction(
        self,
        id: TransactionId,
        today: NaiveDate,
    ) -> Result<Transaction, super::ValidationError> {
        let amount: Amount = self.amount.parse()?;
        Ok(self.build(id, amount, today))
    }

    /// Assemble the transaction from an amount that was already validated.
    pub fn build(self, id: TransactionId, amount: Amount, today: NaiveDate) -> Transaction {
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Transaction {
            id,
            kind: self.kind,
            amount,
            category: self.category,
            description,
            date: self.date.unwrap_or(today),
        }
    }
}

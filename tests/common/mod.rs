// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use pocketbook::{Category, JsonFileStore, Ledger, MemoryStore, NewTransaction, SqliteStore};
use tempfile::TempDir;

/// Helper to create a ledger backed by a JSON file store in a temporary directory
pub fn file_ledger() -> Result<(Ledger<JsonFileStore>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let store = JsonFileStore::open(temp_dir.path())?;
    Ok((Ledger::open(store), temp_dir))
}

/// Helper to create a ledger backed by a SQLite file in a temporary directory
pub fn sqlite_ledger() -> Result<(Ledger<SqliteStore>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let store = SqliteStore::open(temp_dir.path().join("test.db"))?;
    Ok((Ledger::open(store), temp_dir))
}

pub fn memory_ledger() -> Ledger<MemoryStore> {
    Ledger::open(MemoryStore::new())
}

/// Helper to parse a date string into a NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: the two-entry January scenario
pub struct JanuaryScenario;

impl JanuaryScenario {
    pub fn salary() -> NewTransaction {
        NewTransaction::income("500")
            .with_category(Category::Other)
            .with_date(parse_date("2024-01-01"))
    }

    pub fn groceries() -> NewTransaction {
        NewTransaction::expense("120.50")
            .with_category(Category::Food)
            .with_date(parse_date("2024-01-02"))
    }
}

use anyhow::Result;
use std::io::Write;

use crate::application::Ledger;
use crate::storage::Store;

/// Exporter for converting ledger entries to various formats
pub struct Exporter<'a, S: Store> {
    ledger: &'a Ledger<S>,
}

impl<'a, S: Store> Exporter<'a, S> {
    pub fn new(ledger: &'a Ledger<S>) -> Self {
        Self { ledger }
    }

    /// Export transactions to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "type",
            "amount",
            "category",
            "description",
            "date",
        ])?;

        let mut count = 0;
        for tx in self.ledger.entries() {
            csv_writer.write_record([
                tx.id.to_string(),
                tx.kind.as_str().to_string(),
                tx.amount.value().to_string(),
                tx.category.label().to_string(),
                tx.description.clone().unwrap_or_default(),
                tx.date.format("%Y-%m-%d").to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export transactions as the same JSON the store holds, pretty printed
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let entries = self.ledger.entries();
        serde_json::to_writer_pretty(&mut writer, entries)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(entries.len())
    }
}

use chrono::Utc;

use super::TransactionId;

/// Hands out time-derived transaction ids.
///
/// Ids are the current Unix time in milliseconds, bumped past the last id
/// issued so two entries recorded within the same millisecond (or after a
/// clock step backwards) still get distinct, increasing ids. Once the last id
/// is `TransactionId::MAX` the generator is exhausted and returns `None`.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: Option<TransactionId>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start after the largest id already in use.
    pub fn seeded<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = TransactionId>,
    {
        Self {
            last: existing.into_iter().max(),
        }
    }

    pub fn next_id(&mut self) -> Option<TransactionId> {
        self.next_at(Utc::now().timestamp_millis())
    }

    pub fn next_at(&mut self, now_millis: i64) -> Option<TransactionId> {
        let id = match self.last {
            Some(last) if now_millis <= last => last.checked_add(1)?,
            _ => now_millis,
        };
        self.last = Some(id);
        Some(id)
    }
}

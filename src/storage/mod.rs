mod file;
mod snapshot;
mod sqlite;
mod store;

pub use file::*;
pub use snapshot::*;
pub use sqlite::*;
pub use store::{MemoryStore, Store, StoreError};

mod id;
mod ledger;
mod money;
mod transaction;

pub use id::*;
pub use ledger::*;
pub use money::*;
pub use transaction::*;

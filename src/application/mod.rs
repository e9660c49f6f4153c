// Application layer - the ledger service and the entry form that feeds it.
// Any front end (CLI, TUI, web) drives these types directly.

pub mod error;
pub mod form;
pub mod ledger;

pub use error::*;
pub use form::*;
pub use ledger::*;

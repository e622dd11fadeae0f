// Application layer - the ledger service and its error types.
// Every client (the interactive menu, tests, embedding code) goes through
// `LedgerService`; nothing else mutates balances.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;

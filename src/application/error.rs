use thiserror::Error;

use crate::domain::{AccountId, Cents, CustomerId, TransactionId, format_cents};

/// Structural errors: the request itself is invalid, typically because it
/// references an entity that does not exist.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Customer ID {0} does not exist.")]
    CustomerNotFound(CustomerId),

    #[error("Account ID {0} does not exist.")]
    AccountNotFound(AccountId),

    #[error("Transaction ID {0} has already been recorded.")]
    DuplicateTransaction(TransactionId),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Balance of account {0} would overflow")]
    BalanceOverflow(AccountId),

    #[error("No transaction ids are left to assign.")]
    TransactionIdsExhausted,
}

/// Business-rule failures: the request is well formed but cannot be
/// satisfied right now. Nothing is recorded when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("account {0} does not exist")]
    AccountNotFound(AccountId),

    #[error(
        "insufficient funds in account {account}: balance {}, required {}",
        money(.balance),
        money(.required)
    )]
    InsufficientFunds {
        account: AccountId,
        balance: Cents,
        required: Cents,
    },

    #[error("balance of account {0} would overflow")]
    BalanceOverflow(AccountId),

    #[error("no transaction ids are left to assign")]
    TransactionIdsExhausted,
}

fn money(cents: &Cents) -> String {
    format_cents(*cents)
}

/// Result of a money-movement request. `is_ok()` is the plain
/// success/failure answer; the `Rejection` says which rule failed.
pub type Outcome<T> = Result<T, Rejection>;

use serde::{Deserialize, Serialize};

use super::{Cents, CustomerId, format_cents};

pub type AccountId = i64;

/// Caller-supplied fields for opening an account.
/// The account type is a free-form label such as "Saving" or "Current".
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: AccountId,
    pub customer_id: CustomerId,
    pub account_type: String,
    pub opening_balance: Cents,
}

impl NewAccount {
    pub fn new(id: AccountId, customer_id: CustomerId, account_type: impl Into<String>) -> Self {
        Self {
            id,
            customer_id,
            account_type: account_type.into(),
            opening_balance: 0,
        }
    }

    pub fn with_opening_balance(mut self, opening_balance: Cents) -> Self {
        self.opening_balance = opening_balance;
        self
    }
}

/// An account as held by the ledger.
/// `balance` always equals `opening_balance` plus the signed sum of the
/// account's recorded transactions; only the ledger service changes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub customer_id: CustomerId,
    pub account_type: String,
    pub opening_balance: Cents,
    pub balance: Cents,
}

impl Account {
    pub(crate) fn open(new: NewAccount) -> Self {
        Self {
            id: new.id,
            customer_id: new.customer_id,
            account_type: new.account_type,
            opening_balance: new.opening_balance,
            balance: new.opening_balance,
        }
    }

    pub fn can_cover(&self, amount: Cents) -> bool {
        self.balance >= amount
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Account ID: {}, Customer ID: {}, Type: {}, Balance: {}",
            self.id,
            self.customer_id,
            self.account_type,
            format_cents(self.balance)
        )
    }
}

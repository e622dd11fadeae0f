// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use tellerbook::application::LedgerService;
use tellerbook::domain::{Account, Cents, Customer, NewAccount, Transaction};

/// Service with customer 1 already registered.
pub fn test_service() -> LedgerService {
    let mut service = LedgerService::new();
    service.add_customer(Customer::new(1, "Ada Lovelace", "12 St James's Sq", "555-0100"));
    service
}

/// Test fixture: Standard account setup
pub struct StandardAccounts;

impl StandardAccounts {
    /// Open account 100 (Saving) and 200 (Current) for customer 1, both empty.
    pub fn create_basic(service: &mut LedgerService) -> Result<()> {
        service.add_account(NewAccount::new(100, 1, "Saving"))?;
        service.add_account(NewAccount::new(200, 1, "Current"))?;
        Ok(())
    }

    /// Basic accounts with `amount` deposited into account 100.
    pub fn create_funded(service: &mut LedgerService, amount: Cents) -> Result<()> {
        Self::create_basic(service)?;
        service.deposit(100, amount)?;
        Ok(())
    }
}

pub fn balance(service: &LedgerService, account_id: i64) -> Cents {
    service
        .find_account(account_id)
        .map(|account| account.balance)
        .expect("account should exist")
}

/// Opening balance plus the signed sum of the account's history.
pub fn expected_balance(account: &Account, transactions: &[Transaction]) -> Cents {
    account.opening_balance
        + transactions
            .iter()
            .filter(|t| t.account_id == account.id)
            .map(|t| t.signed_amount())
            .sum::<Cents>()
}

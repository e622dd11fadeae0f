use std::collections::BTreeMap;

use crate::domain::{
    Account, AccountId, Beneficiary, BeneficiaryId, Customer, CustomerId, Transaction,
    TransactionId,
};

/// In-memory store for customers, accounts, transactions and beneficiaries.
///
/// Every kind is keyed by its identity. Saving an entity whose id is already
/// present replaces it. The store enforces no business rules; referential
/// checks and balance updates belong to the ledger service.
#[derive(Debug)]
pub struct Repository {
    customers: BTreeMap<CustomerId, Customer>,
    accounts: BTreeMap<AccountId, Account>,
    transactions: BTreeMap<TransactionId, Transaction>,
    beneficiaries: BTreeMap<BeneficiaryId, Beneficiary>,
    /// Next transaction id to hand out. Starts at 1, only ever grows;
    /// `None` once `TransactionId::MAX` has been issued or reserved.
    next_transaction_id: Option<TransactionId>,
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository {
    pub fn new() -> Self {
        Self {
            customers: BTreeMap::new(),
            accounts: BTreeMap::new(),
            transactions: BTreeMap::new(),
            beneficiaries: BTreeMap::new(),
            next_transaction_id: Some(1),
        }
    }

    // ========================
    // Customer operations
    // ========================

    pub fn save_customer(&mut self, customer: Customer) {
        self.customers.insert(customer.id, customer);
    }

    pub fn get_customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.get(&id)
    }

    pub(crate) fn customer_mut(&mut self, id: CustomerId) -> Option<&mut Customer> {
        self.customers.get_mut(&id)
    }

    pub fn has_customer(&self, id: CustomerId) -> bool {
        self.customers.contains_key(&id)
    }

    pub fn list_customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.values()
    }

    // ========================
    // Account operations
    // ========================

    pub fn save_account(&mut self, account: Account) {
        self.accounts.insert(account.id, account);
    }

    pub fn get_account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    /// Mutable access for the ledger service to apply balance deltas.
    pub(crate) fn account_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(&id)
    }

    pub fn list_accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn accounts_for_customer(&self, customer_id: CustomerId) -> impl Iterator<Item = &Account> {
        self.accounts
            .values()
            .filter(move |a| a.customer_id == customer_id)
    }

    // ========================
    // Transaction operations
    // ========================

    pub fn save_transaction(&mut self, transaction: Transaction) {
        self.transactions.insert(transaction.id, transaction);
    }

    pub fn get_transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.get(&id)
    }

    pub fn has_transaction(&self, id: TransactionId) -> bool {
        self.transactions.contains_key(&id)
    }

    pub fn list_transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.values()
    }

    /// Transactions recorded against an account, in id order.
    /// Chronological ordering is up to the caller.
    pub fn transactions_for_account(
        &self,
        account_id: AccountId,
    ) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .values()
            .filter(move |t| t.account_id == account_id)
    }

    /// Hand out the next transaction id. Ids are never reused, even when the
    /// transaction they were issued for is not recorded. Returns `None` once
    /// the id space is used up.
    pub fn next_transaction_id(&mut self) -> Option<TransactionId> {
        let id = self.next_transaction_id?;
        self.next_transaction_id = id.checked_add(1);
        Some(id)
    }

    /// Hand out two consecutive ids, or none at all if only one is left.
    pub fn next_transaction_id_pair(&mut self) -> Option<(TransactionId, TransactionId)> {
        let first = self.next_transaction_id?;
        let second = first.checked_add(1)?;
        self.next_transaction_id = second.checked_add(1);
        Some((first, second))
    }

    /// Make sure the counter will never issue `id` or anything below it.
    pub fn reserve_transaction_id(&mut self, id: TransactionId) {
        if let Some(next) = self.next_transaction_id {
            if id >= next {
                self.next_transaction_id = id.checked_add(1);
            }
        }
    }

    // ========================
    // Beneficiary operations
    // ========================

    pub fn save_beneficiary(&mut self, beneficiary: Beneficiary) {
        self.beneficiaries.insert(beneficiary.id, beneficiary);
    }

    pub fn get_beneficiary(&self, id: BeneficiaryId) -> Option<&Beneficiary> {
        self.beneficiaries.get(&id)
    }

    pub fn list_beneficiaries(&self) -> impl Iterator<Item = &Beneficiary> {
        self.beneficiaries.values()
    }

    pub fn beneficiaries_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> impl Iterator<Item = &Beneficiary> {
        self.beneficiaries
            .values()
            .filter(move |b| b.customer_id == customer_id)
    }
}

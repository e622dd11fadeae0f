use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{
    Account, AccountId, Beneficiary, BeneficiaryId, Cents, Customer, CustomerId, CustomerUpdate,
    IntegrityReport, NewAccount, Transaction, TransactionDraft, TransactionId, TransactionType,
    TransferGroupId, UNASSIGNED_TRANSACTION_ID, build_integrity_report,
};
use crate::storage::Repository;

use super::{AppError, Outcome, Rejection};

/// Application service providing every ledger operation.
/// This is the primary interface for any client (menu, tests, embedding code).
///
/// Account balances change only through the methods here, and only by
/// recording a transaction. Queries hand out owned snapshots.
#[derive(Debug, Default)]
pub struct LedgerService {
    repo: Repository,
}

/// Result of a successful transfer: both legs, tagged with the same group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub group: TransferGroupId,
    pub debit: Transaction,
    pub credit: Transaction,
}

impl LedgerService {
    /// Create a service over an empty store.
    pub fn new() -> Self {
        Self::with_repository(Repository::new())
    }

    pub fn with_repository(repo: Repository) -> Self {
        Self { repo }
    }

    // ========================
    // Customer operations
    // ========================

    /// Insert a customer, replacing any customer with the same id.
    pub fn add_customer(&mut self, customer: Customer) {
        if self.repo.has_customer(customer.id) {
            debug!(customer_id = customer.id, "Replacing customer");
        } else {
            debug!(customer_id = customer.id, "Adding customer");
        }
        self.repo.save_customer(customer);
    }

    /// Change a customer's name, address or contact details.
    pub fn update_customer(
        &mut self,
        id: CustomerId,
        update: CustomerUpdate,
    ) -> Result<Customer, AppError> {
        let customer = self
            .repo
            .customer_mut(id)
            .ok_or(AppError::CustomerNotFound(id))?;
        customer.apply(update);
        Ok(customer.clone())
    }

    pub fn find_customer(&self, id: CustomerId) -> Option<Customer> {
        self.repo.get_customer(id).cloned()
    }

    pub fn all_customers(&self) -> Vec<Customer> {
        self.repo.list_customers().cloned().collect()
    }

    // ========================
    // Account operations
    // ========================

    /// Open an account for an existing customer.
    ///
    /// Re-adding an existing account id replaces its owner, type and opening
    /// balance; the account keeps its transaction history, so the new balance
    /// is the new opening balance plus that history.
    pub fn add_account(&mut self, new: NewAccount) -> Result<Account, AppError> {
        if !self.repo.has_customer(new.customer_id) {
            warn!(
                account_id = new.id,
                customer_id = new.customer_id,
                "Rejected account for unknown customer"
            );
            return Err(AppError::CustomerNotFound(new.customer_id));
        }

        let mut account = Account::open(new);
        if self.repo.get_account(account.id).is_some() {
            let history: Cents = self
                .repo
                .transactions_for_account(account.id)
                .try_fold(account.opening_balance, |sum, t| {
                    sum.checked_add(t.signed_amount())
                })
                .ok_or(AppError::BalanceOverflow(account.id))?;
            account.balance = history;
            debug!(account_id = account.id, "Replacing account");
        } else {
            debug!(account_id = account.id, customer_id = account.customer_id, "Adding account");
        }

        self.repo.save_account(account.clone());
        Ok(account)
    }

    pub fn find_account(&self, id: AccountId) -> Option<Account> {
        self.repo.get_account(id).cloned()
    }

    pub fn accounts_by_customer(&self, customer_id: CustomerId) -> Vec<Account> {
        self.repo
            .accounts_for_customer(customer_id)
            .cloned()
            .collect()
    }

    pub fn all_accounts(&self) -> Vec<Account> {
        self.repo.list_accounts().cloned().collect()
    }

    // ========================
    // Beneficiary operations
    // ========================

    /// Register a beneficiary for an existing customer.
    pub fn add_beneficiary(&mut self, beneficiary: Beneficiary) -> Result<Beneficiary, AppError> {
        if !self.repo.has_customer(beneficiary.customer_id) {
            warn!(
                beneficiary_id = beneficiary.id,
                customer_id = beneficiary.customer_id,
                "Rejected beneficiary for unknown customer"
            );
            return Err(AppError::CustomerNotFound(beneficiary.customer_id));
        }

        debug!(beneficiary_id = beneficiary.id, "Adding beneficiary");
        self.repo.save_beneficiary(beneficiary.clone());
        Ok(beneficiary)
    }

    pub fn find_beneficiary(&self, id: BeneficiaryId) -> Option<Beneficiary> {
        self.repo.get_beneficiary(id).cloned()
    }

    pub fn beneficiaries_by_customer(&self, customer_id: CustomerId) -> Vec<Beneficiary> {
        self.repo
            .beneficiaries_for_customer(customer_id)
            .cloned()
            .collect()
    }

    pub fn all_beneficiaries(&self) -> Vec<Beneficiary> {
        self.repo.list_beneficiaries().cloned().collect()
    }

    // ========================
    // Transaction operations
    // ========================

    /// Record a transaction and apply it to its account's balance.
    ///
    /// An unassigned id is replaced by the next counter value, and that value
    /// stays consumed even if the call then fails. A missing timestamp is set
    /// to now. Either the transaction is recorded and the balance updated, or
    /// nothing changes.
    pub fn add_transaction(&mut self, draft: TransactionDraft) -> Result<Transaction, AppError> {
        let id = self.assign_transaction_id(draft.id)?;
        let timestamp = draft.timestamp.unwrap_or_else(Utc::now);

        let account = self.repo.get_account(draft.account_id).ok_or_else(|| {
            warn!(
                transaction_id = id,
                account_id = draft.account_id,
                "Rejected transaction for unknown account"
            );
            AppError::AccountNotFound(draft.account_id)
        })?;

        if draft.amount <= 0 {
            return Err(AppError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }

        let new_balance = apply_delta(account, draft.kind, draft.amount)
            .ok_or(AppError::BalanceOverflow(draft.account_id))?;

        let transaction = Transaction {
            id,
            account_id: draft.account_id,
            kind: draft.kind,
            amount: draft.amount,
            timestamp,
            transfer_group: draft.transfer_group,
        };
        Ok(self.commit(transaction, new_balance))
    }

    /// Put money into an account.
    pub fn deposit(&mut self, account_id: AccountId, amount: Cents) -> Outcome<Transaction> {
        let account = self.checked_account(account_id, amount)?;
        let new_balance = apply_delta(account, TransactionType::Deposit, amount)
            .ok_or(Rejection::BalanceOverflow(account_id))?;

        let id = self.issue_transaction_id()?;
        let transaction = fresh_transaction(id, account_id, TransactionType::Deposit, amount, None);
        Ok(self.commit(transaction, new_balance))
    }

    /// Take money out of an account. Never takes a balance below zero.
    pub fn withdraw(&mut self, account_id: AccountId, amount: Cents) -> Outcome<Transaction> {
        let account = self.checked_account(account_id, amount)?;
        ensure_covers(account, amount)?;
        let new_balance = account.balance - amount;

        let id = self.issue_transaction_id()?;
        let transaction =
            fresh_transaction(id, account_id, TransactionType::Withdrawal, amount, None);
        Ok(self.commit(transaction, new_balance))
    }

    /// Move money between two accounts.
    ///
    /// Both sides are validated before anything is recorded; then the
    /// Transfer-Out leg on `from` and the Transfer-In leg on `to` are applied
    /// together, sharing one transfer group id.
    pub fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Cents,
    ) -> Outcome<TransferReceipt> {
        let source = self.checked_account(from, amount)?;
        let destination = self
            .repo
            .get_account(to)
            .ok_or_else(|| reject(Rejection::AccountNotFound(to)))?;
        ensure_covers(source, amount)?;

        let source_balance = source.balance - amount;
        // Crediting the source itself restores the balance it had before the debit
        let credited = if from == to {
            Some(source.balance)
        } else {
            destination.balance.checked_add(amount)
        };
        let destination_balance =
            credited.ok_or_else(|| reject(Rejection::BalanceOverflow(to)))?;

        let (debit_id, credit_id) = self
            .repo
            .next_transaction_id_pair()
            .ok_or_else(|| reject(Rejection::TransactionIdsExhausted))?;
        let group = Uuid::new_v4();
        let debit = fresh_transaction(
            debit_id,
            from,
            TransactionType::TransferOut,
            amount,
            Some(group),
        );
        let credit =
            fresh_transaction(credit_id, to, TransactionType::TransferIn, amount, Some(group));

        let debit = self.commit(debit, source_balance);
        let credit = self.commit(credit, destination_balance);

        info!(%group, from, to, amount, "Recorded transfer");
        Ok(TransferReceipt {
            group,
            debit,
            credit,
        })
    }

    pub fn find_transaction(&self, id: TransactionId) -> Option<Transaction> {
        self.repo.get_transaction(id).cloned()
    }

    /// Transactions for an account, oldest first. Transactions with equal
    /// timestamps keep their id order.
    pub fn transactions_by_account(&self, account_id: AccountId) -> Vec<Transaction> {
        let mut transactions: Vec<Transaction> = self
            .repo
            .transactions_for_account(account_id)
            .cloned()
            .collect();
        transactions.sort_by_key(|t| (t.timestamp, t.id));
        transactions
    }

    pub fn all_transactions(&self) -> Vec<Transaction> {
        self.repo.list_transactions().cloned().collect()
    }

    // ========================
    // Integrity operations
    // ========================

    /// Check ledger integrity and return a report.
    pub fn check_integrity(&self) -> IntegrityReport {
        build_integrity_report(
            &self.all_customers(),
            &self.all_accounts(),
            &self.all_transactions(),
            &self.all_beneficiaries(),
        )
    }

    // ========================
    // Internals
    // ========================

    fn assign_transaction_id(
        &mut self,
        requested: TransactionId,
    ) -> Result<TransactionId, AppError> {
        if requested == UNASSIGNED_TRANSACTION_ID {
            return self.repo.next_transaction_id().ok_or_else(|| {
                warn!("Rejected transaction: no ids left");
                AppError::TransactionIdsExhausted
            });
        }
        if self.repo.has_transaction(requested) {
            return Err(AppError::DuplicateTransaction(requested));
        }
        self.repo.reserve_transaction_id(requested);
        Ok(requested)
    }

    /// Common checks for deposit, withdraw and the source side of a transfer.
    fn checked_account(&self, account_id: AccountId, amount: Cents) -> Outcome<&Account> {
        if amount <= 0 {
            return Err(reject(Rejection::NonPositiveAmount));
        }
        self.repo
            .get_account(account_id)
            .ok_or_else(|| reject(Rejection::AccountNotFound(account_id)))
    }

    fn issue_transaction_id(&mut self) -> Outcome<TransactionId> {
        self.repo
            .next_transaction_id()
            .ok_or_else(|| reject(Rejection::TransactionIdsExhausted))
    }

    /// Record an already validated transaction together with its account's new balance.
    fn commit(&mut self, transaction: Transaction, new_balance: Cents) -> Transaction {
        debug_assert!(
            !self.repo.has_transaction(transaction.id),
            "transaction id {} issued twice",
            transaction.id
        );
        if let Some(account) = self.repo.account_mut(transaction.account_id) {
            account.balance = new_balance;
        }
        info!(
            transaction_id = transaction.id,
            account_id = transaction.account_id,
            kind = %transaction.kind,
            amount = transaction.amount,
            balance = new_balance,
            "Recorded transaction"
        );
        self.repo.save_transaction(transaction.clone());
        transaction
    }
}

fn fresh_transaction(
    id: TransactionId,
    account_id: AccountId,
    kind: TransactionType,
    amount: Cents,
    transfer_group: Option<TransferGroupId>,
) -> Transaction {
    Transaction {
        id,
        account_id,
        kind,
        amount,
        timestamp: Utc::now(),
        transfer_group,
    }
}

fn apply_delta(account: &Account, kind: TransactionType, amount: Cents) -> Option<Cents> {
    account.balance.checked_add(kind.sign() * amount)
}

fn ensure_covers(account: &Account, amount: Cents) -> Outcome<()> {
    if account.can_cover(amount) {
        Ok(())
    } else {
        Err(reject(Rejection::InsufficientFunds {
            account: account.id,
            balance: account.balance,
            required: amount,
        }))
    }
}

fn reject(rejection: Rejection) -> Rejection {
    warn!(%rejection, "Request rejected");
    rejection
}

use std::collections::{BTreeMap, HashMap, HashSet};

use super::{
    Account, AccountId, Beneficiary, BeneficiaryId, Cents, Customer, CustomerId, Transaction,
    TransactionId, TransferGroupId, UNASSIGNED_TRANSACTION_ID, format_cents,
};

/// Compute the balance for a single account from its opening balance and
/// the transactions recorded against it. Transactions for other accounts
/// are ignored. Returns `None` if the sum does not fit in `Cents`.
pub fn compute_balance(
    account_id: AccountId,
    opening_balance: Cents,
    transactions: &[Transaction],
) -> Option<Cents> {
    transactions
        .iter()
        .filter(|t| t.account_id == account_id)
        .try_fold(opening_balance, |balance, t| {
            balance.checked_add(t.signed_amount())
        })
}

/// Something the integrity check found wrong with the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    BalanceDrift {
        account: AccountId,
        recorded: Cents,
        expected: Option<Cents>,
    },
    OrphanAccount {
        account: AccountId,
        customer: CustomerId,
    },
    OrphanTransaction {
        transaction: TransactionId,
        account: AccountId,
    },
    OrphanBeneficiary {
        beneficiary: BeneficiaryId,
        customer: CustomerId,
    },
    UnassignedTransactionId {
        account: AccountId,
    },
    UnbalancedTransfer {
        group: TransferGroupId,
    },
}

impl std::fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrityIssue::BalanceDrift {
                account,
                recorded,
                expected: Some(expected),
            } => write!(
                f,
                "Account {} balance is {} but its history sums to {}",
                account,
                format_cents(*recorded),
                format_cents(*expected)
            ),
            IntegrityIssue::BalanceDrift {
                account,
                recorded,
                expected: None,
            } => write!(
                f,
                "Account {} balance is {} but its history overflows",
                account,
                format_cents(*recorded)
            ),
            IntegrityIssue::OrphanAccount { account, customer } => {
                write!(f, "Account {} references unknown customer {}", account, customer)
            }
            IntegrityIssue::OrphanTransaction {
                transaction,
                account,
            } => write!(
                f,
                "Transaction {} references unknown account {}",
                transaction, account
            ),
            IntegrityIssue::OrphanBeneficiary {
                beneficiary,
                customer,
            } => write!(
                f,
                "Beneficiary {} references unknown customer {}",
                beneficiary, customer
            ),
            IntegrityIssue::UnassignedTransactionId { account } => {
                write!(f, "Transaction on account {} was recorded without an id", account)
            }
            IntegrityIssue::UnbalancedTransfer { group } => {
                write!(f, "Transfer {} does not have matching legs", group)
            }
        }
    }
}

/// Summary of a full consistency pass over the ledger.
#[derive(Debug, Clone)]
pub struct IntegrityReport {
    pub customer_count: usize,
    pub account_count: usize,
    pub transaction_count: usize,
    pub beneficiary_count: usize,
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check every ledger invariant against a snapshot of the store.
pub fn build_integrity_report(
    customers: &[Customer],
    accounts: &[Account],
    transactions: &[Transaction],
    beneficiaries: &[Beneficiary],
) -> IntegrityReport {
    let mut issues = Vec::new();

    let customer_ids: HashSet<CustomerId> = customers.iter().map(|c| c.id).collect();
    let account_ids: HashSet<AccountId> = accounts.iter().map(|a| a.id).collect();

    for account in accounts {
        if !customer_ids.contains(&account.customer_id) {
            issues.push(IntegrityIssue::OrphanAccount {
                account: account.id,
                customer: account.customer_id,
            });
        }

        let expected = compute_balance(account.id, account.opening_balance, transactions);
        if expected != Some(account.balance) {
            issues.push(IntegrityIssue::BalanceDrift {
                account: account.id,
                recorded: account.balance,
                expected,
            });
        }
    }

    for transaction in transactions {
        if transaction.id == UNASSIGNED_TRANSACTION_ID {
            issues.push(IntegrityIssue::UnassignedTransactionId {
                account: transaction.account_id,
            });
        }
        if !account_ids.contains(&transaction.account_id) {
            issues.push(IntegrityIssue::OrphanTransaction {
                transaction: transaction.id,
                account: transaction.account_id,
            });
        }
    }

    for beneficiary in beneficiaries {
        if !customer_ids.contains(&beneficiary.customer_id) {
            issues.push(IntegrityIssue::OrphanBeneficiary {
                beneficiary: beneficiary.id,
                customer: beneficiary.customer_id,
            });
        }
    }

    for group in unbalanced_transfer_groups(transactions) {
        issues.push(IntegrityIssue::UnbalancedTransfer { group });
    }

    IntegrityReport {
        customer_count: customers.len(),
        account_count: accounts.len(),
        transaction_count: transactions.len(),
        beneficiary_count: beneficiaries.len(),
        issues,
    }
}

/// A transfer group is balanced when it holds exactly one Transfer-Out and
/// one Transfer-In of the same amount, and nothing else.
fn unbalanced_transfer_groups(transactions: &[Transaction]) -> Vec<TransferGroupId> {
    let mut groups: HashMap<TransferGroupId, Vec<&Transaction>> = HashMap::new();
    for transaction in transactions {
        if let Some(group) = transaction.transfer_group {
            groups.entry(group).or_default().push(transaction);
        }
    }

    // BTreeMap only to report groups in a stable order
    let ordered: BTreeMap<TransferGroupId, Vec<&Transaction>> = groups.into_iter().collect();
    ordered
        .into_iter()
        .filter(|(_, legs)| !is_balanced_pair(legs))
        .map(|(group, _)| group)
        .collect()
}

fn is_balanced_pair(legs: &[&Transaction]) -> bool {
    match legs {
        [a, b] => {
            a.kind.is_transfer_leg()
                && b.kind.is_transfer_leg()
                && a.kind != b.kind
                && a.amount == b.amount
        }
        _ => false,
    }
}

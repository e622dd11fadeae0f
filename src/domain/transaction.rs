use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AccountId, Cents, format_cents};

pub type TransactionId = u64;

/// Shared by the two legs of one transfer.
pub type TransferGroupId = Uuid;

/// Id value meaning "let the ledger assign one".
pub const UNASSIGNED_TRANSACTION_ID: TransactionId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "Deposit")]
    Deposit,
    #[serde(rename = "Withdrawal")]
    Withdrawal,
    #[serde(rename = "Transfer-In")]
    TransferIn,
    #[serde(rename = "Transfer-Out")]
    TransferOut,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdrawal => "Withdrawal",
            TransactionType::TransferIn => "Transfer-In",
            TransactionType::TransferOut => "Transfer-Out",
        }
    }

    /// Case-insensitive; surrounding whitespace is ignored.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "deposit" => Some(TransactionType::Deposit),
            "withdrawal" => Some(TransactionType::Withdrawal),
            "transfer-in" => Some(TransactionType::TransferIn),
            "transfer-out" => Some(TransactionType::TransferOut),
            _ => None,
        }
    }

    /// +1 for money entering the account, -1 for money leaving it.
    pub fn sign(&self) -> Cents {
        match self {
            TransactionType::Deposit | TransactionType::TransferIn => 1,
            TransactionType::Withdrawal | TransactionType::TransferOut => -1,
        }
    }

    pub fn is_transfer_leg(&self) -> bool {
        matches!(
            self,
            TransactionType::TransferIn | TransactionType::TransferOut
        )
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction as submitted to the ledger, before identity and time are fixed.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    /// `UNASSIGNED_TRANSACTION_ID` asks the ledger to assign the next id.
    pub id: TransactionId,
    pub account_id: AccountId,
    pub kind: TransactionType,
    /// Always positive; the sign comes from `kind`.
    pub amount: Cents,
    /// Filled with the current time when absent.
    pub timestamp: Option<DateTime<Utc>>,
    pub transfer_group: Option<TransferGroupId>,
}

impl TransactionDraft {
    pub fn new(account_id: AccountId, kind: TransactionType, amount: Cents) -> Self {
        Self {
            id: UNASSIGNED_TRANSACTION_ID,
            account_id,
            kind,
            amount,
            timestamp: None,
            transfer_group: None,
        }
    }

    pub fn with_id(mut self, id: TransactionId) -> Self {
        self.id = id;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_transfer_group(mut self, group: TransferGroupId) -> Self {
        self.transfer_group = Some(group);
        self
    }
}

/// A recorded transaction. Transactions are append-only: once recorded
/// they are never changed or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub account_id: AccountId,
    pub kind: TransactionType,
    pub amount: Cents,
    pub timestamp: DateTime<Utc>,
    pub transfer_group: Option<TransferGroupId>,
}

impl Transaction {
    /// Amount with the sign implied by the transaction type.
    pub fn signed_amount(&self) -> Cents {
        self.kind.sign() * self.amount
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Transaction ID: {}, Account ID: {}, Type: {}, Amount: {}, Timestamp: {}",
            self.id,
            self.account_id,
            self.kind,
            format_cents(self.amount),
            self.timestamp.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

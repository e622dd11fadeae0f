use serde::{Deserialize, Serialize};

use super::CustomerId;

pub type BeneficiaryId = i64;

/// An external payee registered by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub id: BeneficiaryId,
    pub customer_id: CustomerId,
    pub name: String,
    pub account_number: String,
    pub bank_details: String,
}

impl Beneficiary {
    pub fn new(
        id: BeneficiaryId,
        customer_id: CustomerId,
        name: impl Into<String>,
        account_number: impl Into<String>,
        bank_details: impl Into<String>,
    ) -> Self {
        Self {
            id,
            customer_id,
            name: name.into(),
            account_number: account_number.into(),
            bank_details: bank_details.into(),
        }
    }
}

impl std::fmt::Display for Beneficiary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Beneficiary ID: {}, Customer ID: {}, Name: {}, Account No.: {}, Bank: {}",
            self.id, self.customer_id, self.name, self.account_number, self.bank_details
        )
    }
}

use serde::{Deserialize, Serialize};

pub type CustomerId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub address: String,
    pub contact: String,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        name: impl Into<String>,
        address: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
            contact: contact.into(),
        }
    }

    /// Apply the attributes present in `update`, leaving the others untouched.
    pub fn apply(&mut self, update: CustomerUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(contact) = update.contact {
            self.contact = contact;
        }
    }
}

impl std::fmt::Display for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Customer ID: {}, Name: {}, Address: {}, Contact: {}",
            self.id, self.name, self.address, self.contact
        )
    }
}

/// Partial replacement of a customer's mutable attributes.
#[derive(Debug, Clone, Default)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact: Option<String>,
}

impl CustomerUpdate {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }
}

use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use crate::domain::{Account, Beneficiary, Customer, Transaction, format_cents};

/// How lists of entities are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One human-readable line per entry
    #[default]
    Table,
    /// A pretty-printed JSON array
    Json,
    /// CSV with a header row
    Csv,
}

/// An entity that can appear in a rendered list.
pub trait Listing: Serialize {
    const CSV_HEADER: &'static [&'static str];

    fn text_line(&self) -> String;
    fn csv_record(&self) -> Vec<String>;
}

impl Listing for Customer {
    const CSV_HEADER: &'static [&'static str] = &["id", "name", "address", "contact"];

    fn text_line(&self) -> String {
        format!("Customer ID: {}, Name: {}", self.id, self.name)
    }

    fn csv_record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.address.clone(),
            self.contact.clone(),
        ]
    }
}

impl Listing for Account {
    const CSV_HEADER: &'static [&'static str] =
        &["id", "customer_id", "type", "opening_balance", "balance"];

    fn text_line(&self) -> String {
        format!("Account ID: {}, Balance: {}", self.id, format_cents(self.balance))
    }

    fn csv_record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.customer_id.to_string(),
            self.account_type.clone(),
            format_cents(self.opening_balance),
            format_cents(self.balance),
        ]
    }
}

impl Listing for Transaction {
    const CSV_HEADER: &'static [&'static str] = &[
        "id",
        "account_id",
        "type",
        "amount",
        "timestamp",
        "transfer_group",
    ];

    fn text_line(&self) -> String {
        self.to_string()
    }

    fn csv_record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.account_id.to_string(),
            self.kind.to_string(),
            format_cents(self.amount),
            self.timestamp.to_rfc3339(),
            self.transfer_group
                .map(|group| group.to_string())
                .unwrap_or_default(),
        ]
    }
}

impl Listing for Beneficiary {
    const CSV_HEADER: &'static [&'static str] =
        &["id", "customer_id", "name", "account_number", "bank_details"];

    fn text_line(&self) -> String {
        format!("Beneficiary ID: {}, Name: {}", self.id, self.name)
    }

    fn csv_record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.customer_id.to_string(),
            self.name.clone(),
            self.account_number.clone(),
            self.bank_details.clone(),
        ]
    }
}

/// Write `items` in the requested format. An empty text listing prints `(none)`.
pub fn write_listing<T: Listing, W: Write>(
    out: &mut W,
    items: &[T],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                writeln!(out, "(none)")?;
            }
            for item in items {
                writeln!(out, "{}", item.text_line())?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, items).context("Failed to write JSON")?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(&mut *out);
            csv_writer.write_record(T::CSV_HEADER)?;
            for item in items {
                csv_writer.write_record(item.csv_record())?;
            }
            csv_writer.flush().context("Failed to write CSV")?;
        }
    }
    Ok(())
}

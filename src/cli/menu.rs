use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::application::LedgerService;
use crate::domain::{
    AccountId, Beneficiary, Cents, Customer, NewAccount, TransactionType, format_cents,
    parse_cents,
};

use super::render::{OutputFormat, write_listing};

/// Raised when the input stream ends in the middle of the menu.
#[derive(Debug, thiserror::Error)]
#[error("input closed")]
struct InputClosed;

const MENU: &str = "
Banking System
1. Add Customers
2. Add Accounts
3. Add Beneficiary
4. Add Transaction (Deposit/Withdrawal)
5. Find Customer by Id
6. List all Accounts of specific Customer
7. List all transactions of specific Account
8. List all beneficiaries of specific customer
9. Transfer Money
10. Exit
11. Check ledger integrity";

/// Line-oriented teller menu over a ledger service.
///
/// Reads choices and fields from `input`, writes prompts and results to
/// `output`. Holds no business logic: every choice maps to one service call.
pub struct Menu<R, W> {
    service: LedgerService,
    input: R,
    output: W,
    format: OutputFormat,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(service: LedgerService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
            format: OutputFormat::default(),
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn into_service(self) -> LedgerService {
        self.service
    }

    /// Run until the user picks Exit or the input ends. Running out of
    /// input is treated as choosing Exit.
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.run_once() {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(err) if err.is::<InputClosed>() => {
                    tracing::debug!("Input closed, leaving menu");
                    writeln!(self.output)?;
                    return self.farewell();
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn farewell(&mut self) -> Result<()> {
        writeln!(self.output, "Thank you!")?;
        self.output.flush().context("Failed to flush output")
    }

    /// Show the menu and handle one choice. Returns false once the user exits.
    fn run_once(&mut self) -> Result<bool> {
        writeln!(self.output, "{}", MENU)?;
        self.prompt("Enter your choice : ")?;

        match self.read_int()? {
            1 => self.add_customer_flow()?,
            2 => self.add_account_flow()?,
            3 => self.add_beneficiary_flow()?,
            4 => self.add_transaction_flow()?,
            5 => self.find_customer_flow()?,
            6 => self.list_accounts_of_customer_flow()?,
            7 => self.list_transactions_of_account_flow()?,
            8 => self.list_beneficiaries_of_customer_flow()?,
            9 => self.transfer_money_flow()?,
            10 => {
                self.farewell()?;
                return Ok(false);
            }
            11 => self.check_integrity_flow()?,
            _ => writeln!(self.output, "Invalid option. Try again.")?,
        }
        Ok(true)
    }

    // ========================
    // Flows
    // ========================

    fn add_customer_flow(&mut self) -> Result<()> {
        writeln!(self.output, "\nEnter Customer Details")?;
        let id = self.ask_int("Customer Id : ")?;
        let name = self.ask_text("Name : ")?;
        let address = self.ask_text("Address : ")?;
        let contact = self.ask_text("Contact No. : ")?;

        self.service
            .add_customer(Customer::new(id, name, address, contact));
        writeln!(self.output, "Customer added.")?;
        Ok(())
    }

    fn add_account_flow(&mut self) -> Result<()> {
        writeln!(self.output, "\nEnter Account Details")?;
        let account_id = self.ask_int("Account Id : ")?;
        let customer_id = self.ask_int("Customer Id : ")?;
        let account_type = self.ask_text("Account Type Saving/ Current : ")?;
        let balance = self.ask_amount("Balance : ")?;

        let new = NewAccount::new(account_id, customer_id, account_type)
            .with_opening_balance(balance);
        match self.service.add_account(new) {
            Ok(_) => writeln!(self.output, "Account added.")?,
            Err(err) => writeln!(self.output, "Error: {}", err)?,
        }
        Ok(())
    }

    fn add_beneficiary_flow(&mut self) -> Result<()> {
        writeln!(self.output, "\nEnter Beneficiary Details")?;
        let customer_id = self.ask_int("Customer Id : ")?;
        let beneficiary_id = self.ask_int("Beneficiary Id : ")?;
        let name = self.ask_text("Beneficiary Name : ")?;
        let account_number = self.ask_text("Beneficiary Account No. : ")?;
        let bank_details = self.ask_text("Beneficiary Bank details : ")?;

        let beneficiary = Beneficiary::new(
            beneficiary_id,
            customer_id,
            name,
            account_number,
            bank_details,
        );
        match self.service.add_beneficiary(beneficiary) {
            Ok(_) => writeln!(self.output, "Beneficiary added.")?,
            Err(err) => writeln!(self.output, "Error: {}", err)?,
        }
        Ok(())
    }

    fn add_transaction_flow(&mut self) -> Result<()> {
        writeln!(self.output, "\nEnter Transaction Details")?;
        let account_id = self.ask_int("Account Id : ")?;
        let kind = self.ask_text("Type (Deposit/Withdrawal) : ")?;
        let amount = self.ask_amount("Amount : ")?;

        let outcome = match TransactionType::from_str(&kind) {
            Some(TransactionType::Deposit) => self.service.deposit(account_id, amount),
            Some(TransactionType::Withdrawal) => self.service.withdraw(account_id, amount),
            _ => {
                writeln!(self.output, "Invalid type.")?;
                return Ok(());
            }
        };

        match outcome {
            Ok(_) => writeln!(self.output, "Transaction successful.")?,
            Err(rejection) => writeln!(self.output, "Transaction failed: {}", rejection)?,
        }
        Ok(())
    }

    fn find_customer_flow(&mut self) -> Result<()> {
        let customers = self.service.all_customers();
        write_listing(&mut self.output, &customers, self.format)?;

        let id = self.ask_int("\nCustomer Id : ")?;
        match self.service.find_customer(id) {
            Some(customer) => writeln!(self.output, "\nCustomer: {}", customer.name)?,
            None => writeln!(self.output, "Customer not found.")?,
        }
        Ok(())
    }

    fn list_accounts_of_customer_flow(&mut self) -> Result<()> {
        for account in self.service.all_accounts() {
            writeln!(
                self.output,
                "Account ID: {}, Customer ID : {}, Balance: {}",
                account.id,
                account.customer_id,
                format_cents(account.balance)
            )?;
        }

        let id = self.ask_int("\nCustomer Id : ")?;
        writeln!(self.output, "\nAccounts for Customer ID :{}", id)?;
        let accounts = self.service.accounts_by_customer(id);
        write_listing(&mut self.output, &accounts, self.format)
    }

    fn list_transactions_of_account_flow(&mut self) -> Result<()> {
        let id: AccountId = self.ask_int("\nAccount Id : ")?;
        writeln!(self.output, "\nTransactions for Account ID :{}", id)?;
        let transactions = self.service.transactions_by_account(id);
        write_listing(&mut self.output, &transactions, self.format)
    }

    fn list_beneficiaries_of_customer_flow(&mut self) -> Result<()> {
        let id = self.ask_int("\nCustomer Id : ")?;
        writeln!(self.output, "\nBeneficiaries for Customer ID :{}", id)?;
        let beneficiaries = self.service.beneficiaries_by_customer(id);
        write_listing(&mut self.output, &beneficiaries, self.format)
    }

    fn transfer_money_flow(&mut self) -> Result<()> {
        writeln!(self.output, "\nTransfer Money")?;
        let from = self.ask_int("From Account Id : ")?;
        let to = self.ask_int("To Account Id : ")?;
        let amount = self.ask_amount("Amount : ")?;

        match self.service.transfer(from, to, amount) {
            Ok(_) => writeln!(self.output, "Transfer successful.")?,
            Err(rejection) => writeln!(self.output, "Transfer failed: {}", rejection)?,
        }
        Ok(())
    }

    fn check_integrity_flow(&mut self) -> Result<()> {
        writeln!(self.output, "\nChecking ledger integrity...\n")?;
        let report = self.service.check_integrity();

        writeln!(self.output, "Customers:     {}", report.customer_count)?;
        writeln!(self.output, "Accounts:      {}", report.account_count)?;
        writeln!(self.output, "Transactions:  {}", report.transaction_count)?;
        writeln!(self.output, "Beneficiaries: {}", report.beneficiary_count)?;
        writeln!(self.output)?;

        if report.is_healthy() {
            writeln!(self.output, "Ledger is consistent.")?;
        } else {
            writeln!(self.output, "Issues found:")?;
            for issue in &report.issues {
                writeln!(self.output, "  - {}", issue)?;
            }
        }
        Ok(())
    }

    // ========================
    // Input helpers
    // ========================

    fn prompt(&mut self, text: &str) -> Result<()> {
        write!(self.output, "{}", text)?;
        self.output.flush().context("Failed to flush output")
    }

    fn ask_int(&mut self, text: &str) -> Result<i64> {
        self.prompt(text)?;
        self.read_int()
    }

    fn ask_amount(&mut self, text: &str) -> Result<Cents> {
        self.prompt(text)?;
        loop {
            match parse_cents(&self.read_line()?) {
                Ok(cents) => return Ok(cents),
                Err(_) => self.prompt("Please enter a valid number: ")?,
            }
        }
    }

    fn ask_text(&mut self, text: &str) -> Result<String> {
        self.prompt(text)?;
        self.read_line()
    }

    /// Re-prompts until the line parses as an integer.
    fn read_int(&mut self) -> Result<i64> {
        loop {
            match self.read_line()?.parse::<i64>() {
                Ok(value) => return Ok(value),
                Err(_) => self.prompt("Please enter a valid integer: ")?,
            }
        }
    }

    /// Next input line with surrounding whitespace removed.
    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Err(InputClosed.into());
        }
        Ok(line.trim().to_string())
    }
}

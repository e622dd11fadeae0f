use tellerbook::application::LedgerService;
use tellerbook::cli::{Menu, OutputFormat};

/// Feed `script` to a fresh menu and return what it printed plus the final ledger.
fn run_menu(script: &str, format: OutputFormat) -> (String, LedgerService) {
    let mut output = Vec::new();
    let mut menu =
        Menu::new(LedgerService::new(), script.as_bytes(), &mut output).with_format(format);
    menu.run().expect("menu should not fail on in-memory I/O");
    let service = menu.into_service();
    (String::from_utf8(output).expect("menu output is UTF-8"), service)
}

const SETUP: &str = "\
1
1
  Ada Lovelace
12 St James's Sq
555-0100
2
100
1
Saving
0
2
200
1
Current
0
";

#[test]
fn test_full_session() {
    let script = format!(
        "{SETUP}\
4
100
deposit
50
4
100
Withdrawal
100
9
100
200
30
7
100
10
"
    );

    let (output, service) = run_menu(&script, OutputFormat::Table);

    assert_eq!(service.find_customer(1).unwrap().name, "Ada Lovelace");
    assert_eq!(service.find_account(100).unwrap().balance, 2000);
    assert_eq!(service.find_account(200).unwrap().balance, 3000);

    assert!(output.contains("Transaction successful."));
    assert!(output.contains(
        "Transaction failed: insufficient funds in account 100: balance 50.00, required 100.00"
    ));
    assert!(output.contains("Transfer successful."));
    assert!(output.contains("Transactions for Account ID :100"));
    assert!(output.contains("Type: Deposit, Amount: 50.00"));
    assert!(output.contains("Type: Transfer-Out, Amount: 30.00"));
    assert!(output.trim_end().ends_with("Thank you!"));
}

#[test]
fn test_account_for_unknown_customer_shows_error() {
    let (output, service) = run_menu("2\n100\n7\nSaving\n0\n10\n", OutputFormat::Table);

    assert!(output.contains("Error: Customer ID 7 does not exist."));
    assert!(service.all_accounts().is_empty());
}

#[test]
fn test_beneficiary_flow() {
    let script = format!("{SETUP}3\n1\n5\nBob\nGB00 1234\nBarclays\n8\n1\n8\n2\n10\n");
    let (output, service) = run_menu(&script, OutputFormat::Table);

    assert_eq!(service.beneficiaries_by_customer(1).len(), 1);
    assert!(output.contains("Beneficiary ID: 5, Name: Bob"));
    assert!(output.contains("Beneficiaries for Customer ID :2\n(none)"));
}

#[test]
fn test_invalid_transaction_type() {
    let script = format!("{SETUP}4\n100\nTransfer-In\n10\n4\n100\nrefund\n10\n10\n");
    let (output, service) = run_menu(&script, OutputFormat::Table);

    assert_eq!(output.matches("Invalid type.").count(), 2);
    assert!(service.all_transactions().is_empty());
}

#[test]
fn test_amount_reprompt_and_non_positive_amount() {
    let script = format!("{SETUP}4\n100\nDeposit\nfifty\n-5\n10\n");
    let (output, service) = run_menu(&script, OutputFormat::Table);

    assert!(output.contains("Please enter a valid number: "));
    assert!(output.contains("Transaction failed: amount must be positive"));
    assert!(service.all_transactions().is_empty());
}

#[test]
fn test_find_customer() {
    let script = format!("{SETUP}5\n1\n5\n9\n10\n");
    let (output, _) = run_menu(&script, OutputFormat::Table);

    assert!(output.contains("Customer ID: 1, Name: Ada Lovelace"));
    assert!(output.contains("\nCustomer: Ada Lovelace"));
    assert!(output.contains("Customer not found."));
}

#[test]
fn test_list_accounts_of_customer() {
    let script = format!("{SETUP}6\n1\n6\n3\n10\n");
    let (output, _) = run_menu(&script, OutputFormat::Table);

    assert!(output.contains("Account ID: 100, Customer ID : 1, Balance: 0.00"));
    assert!(output.contains(
        "Accounts for Customer ID :1\nAccount ID: 100, Balance: 0.00\nAccount ID: 200, Balance: 0.00"
    ));
    assert!(output.contains("Accounts for Customer ID :3\n(none)"));
}

#[test]
fn test_failed_transfer_reports_reason() {
    let script = format!("{SETUP}9\n100\n999\n10\n10\n");
    let (output, _) = run_menu(&script, OutputFormat::Table);

    assert!(output.contains("Transfer failed: account 999 does not exist"));
}

#[test]
fn test_integrity_check() {
    let script = format!("{SETUP}4\n100\nDeposit\n10\n11\n10\n");
    let (output, _) = run_menu(&script, OutputFormat::Table);

    assert!(output.contains("Accounts:      2"));
    assert!(output.contains("Transactions:  1"));
    assert!(output.contains("Ledger is consistent."));
}

#[test]
fn test_csv_statement() {
    let script = format!("{SETUP}4\n100\nDeposit\n12.5\n7\n100\n10\n");
    let (output, _) = run_menu(&script, OutputFormat::Csv);

    assert!(output.contains(
        "id,account_id,type,amount,timestamp,transfer_group\n1,100,Deposit,12.50,"
    ));
}

#[test]
fn test_json_accounts() {
    let script = format!("{SETUP}6\n3\n10\n");
    let (output, _) = run_menu(&script, OutputFormat::Json);

    assert!(output.contains("Accounts for Customer ID :3\n[]"));
}

#[test]
fn test_json_customers_before_lookup() {
    let script = format!("{SETUP}5\n9\n10\n");
    let (output, _) = run_menu(&script, OutputFormat::Json);

    assert!(output.contains("\"name\": \"Ada Lovelace\""));
    assert!(output.contains("Customer not found."));
}

#[test]
fn test_end_of_input_mid_flow_exits() {
    let script = format!("{SETUP}4\n100\nDeposit\n");
    let (output, service) = run_menu(&script, OutputFormat::Table);

    assert!(output.trim_end().ends_with("Thank you!"));
    assert!(service.all_transactions().is_empty());
}

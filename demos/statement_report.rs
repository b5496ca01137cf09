//! End-to-end walk-through: log in, pick an account, print its statement
//! for the last 30 days and the running-balance report over it.
//!
//! Requires `FINTRACK_EMAIL` and `FINTRACK_PASSWORD` environment variables
//! and a ledger server (`FINTRACK_API_URL`, default `http://127.0.0.1:8002`).
//!
//! Run: `cargo run --example statement_report --features cli`

use std::process::ExitCode;

use chrono::{Days, Local};
use fintrack_ledger::client::DEFAULT_BASE_URL;
use fintrack_ledger::ledger::LedgerBlocking;
use fintrack_ledger::statement::{DateRange, format_amount};
use fintrack_ledger::storage::InMemoryStorage;
use secrecy::SecretString;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let _dotenv = dotenvy::dotenv();

    let email = std::env::var("FINTRACK_EMAIL")
        .map_err(|_| "FINTRACK_EMAIL environment variable not set")?;
    let password = std::env::var("FINTRACK_PASSWORD")
        .map_err(|_| "FINTRACK_PASSWORD environment variable not set")?;
    let base_url =
        std::env::var("FINTRACK_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());

    // The session lives only for this run.
    let ledger = LedgerBlocking::builder()
        .base_url(base_url)
        .storage(InMemoryStorage::new())
        .build()?;

    println!("Logging in as {email}...");
    ledger.login(&email, SecretString::from(password))?;

    let listing = ledger.user_accounts()?;
    let account = listing.accounts.first().ok_or("user has no accounts")?;
    println!("Using account: {} ({})", account.name, account.account_urn);

    let today = Local::now().date_naive();
    let month_ago = today.checked_sub_days(Days::new(30)).ok_or("date underflow")?;
    let range = DateRange::from_dates(month_ago, today)?;

    let summary = ledger.statement(&account.account_urn, "", range)?;
    let currency = summary.currency.as_deref();
    println!();
    println!("Statement {}", summary.range);
    for tx in &summary.filtered {
        println!(
            "  {}  {:<6}  {:>12}  {}",
            tx.transaction_timestamp,
            tx.transaction_type,
            format_amount(currency, tx.amount),
            tx.purpose_preview()
        );
    }
    println!(
        "  in range: credit {}, debit {}, net {}",
        format_amount(currency, summary.filtered_totals.credit),
        format_amount(currency, summary.filtered_totals.debit),
        format_amount(currency, summary.filtered_totals.net)
    );

    let mut view = ledger.report(&account.account_urn, "")?;
    let state = view.apply_filter(Some(month_ago), Some(today), today)?;
    if let Some(err) = state.error() {
        return Err(err.to_string().into());
    }
    if let Some(report) = state.report() {
        println!();
        println!("Running balance");
        for point in &report.chart {
            println!(
                "  {}  +{:>10}  -{:>10}  = {}",
                point.date,
                format_amount(None, point.credit),
                format_amount(None, point.debit),
                format_amount(report.currency.as_deref(), point.balance)
            );
        }
    }

    ledger.logout()?;
    println!();
    println!("Logged out.");
    Ok(())
}

//! CLI front end for the `FinTrack` ledger API.

use std::io::{self, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use fintrack_ledger::client::DEFAULT_BASE_URL;
use fintrack_ledger::error::LedgerError;
use fintrack_ledger::ledger::LedgerBlocking;
use fintrack_ledger::models::{
    AccountDetails, AccountUrn, CreateAccountRequest, CreateTransactionRequest, CurrencyCode,
    RejectedRecord, Transaction, TransactionType,
};
use fintrack_ledger::report::{ChartPoint, Report, ViewKind, validate_range};
use fintrack_ledger::statement::{StatementSummary, Totals, format_amount};
use fintrack_ledger::storage::{BlockingSessionStore, FileStorage};
use fintrack_ledger::validation;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use rust_decimal::Decimal;
use secrecy::SecretString;

/// Environment variable overriding the API base URL.
const API_URL_ENV: &str = "FINTRACK_API_URL";

/// Environment variable holding the password for `register` and `login`.
const PASSWORD_ENV: &str = "FINTRACK_PASSWORD";

/// Placeholder for empty table cells.
const DASH: &str = "\u{2014}";

/// `FinTrack` ledger CLI: accounts, transfers, statements and reports.
#[derive(Debug, Parser)]
#[command(name = "fintrack", version, about)]
struct Cli {
    /// API base URL (default: $FINTRACK_API_URL, then http://127.0.0.1:8002).
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,
    /// Override the session directory (default: XDG data dir).
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Register a new user. The password is read from $FINTRACK_PASSWORD.
    Register {
        /// Email address of the new user.
        #[arg(long)]
        email: String,
    },
    /// Log in and store the session. The password is read from
    /// $FINTRACK_PASSWORD.
    Login {
        /// Email address of the user.
        #[arg(long)]
        email: String,
    },
    /// Log out and forget the stored session.
    Logout {
        /// Only drop the local session, without contacting the server.
        #[arg(long)]
        local: bool,
    },
    /// List the logged-in user's accounts.
    Accounts,
    /// Show one account with its balances.
    Account(FetchArgs),
    /// Open a new account.
    CreateAccount(CreateAccountArgs),
    /// Move money from one account to another.
    CreateTransaction(CreateTransactionArgs),
    /// Show an account statement for a date range, in server order.
    Statement(RangeArgs),
    /// Show a chronological report with running balance for a date range.
    Report(RangeArgs),
}

/// Identifies an account on the command line.
#[derive(Debug, Args)]
struct AccountTarget {
    /// Account URN (or account name with --by-name).
    #[arg(value_name = "ACCOUNT")]
    account: String,
    /// Treat ACCOUNT as an account name (case-insensitive) instead of a URN.
    #[arg(long)]
    by_name: bool,
}

/// Arguments for the `account` subcommand.
#[derive(Debug, Args)]
struct FetchArgs {
    /// Account to fetch.
    #[command(flatten)]
    target: AccountTarget,
    /// Why the account is viewed (at most 30 characters).
    #[arg(long, default_value_t)]
    purpose: String,
    /// Consent to fetching the account.
    #[arg(long)]
    consent: bool,
}

/// Arguments for the `create-account` subcommand.
#[derive(Debug, Args)]
struct CreateAccountArgs {
    /// Account name (letters and spaces only).
    #[arg(long)]
    name: String,
    /// Currency code: USD, EUR, GBP, INR, JPY, AUD, NZD or CAD.
    #[arg(long, value_parser = parse_currency)]
    currency: CurrencyCode,
    /// Why the account is opened (at most 30 characters).
    #[arg(long, default_value_t)]
    purpose: String,
    /// Consent to creating the account.
    #[arg(long)]
    consent: bool,
}

/// Arguments for the `create-transaction` subcommand.
#[derive(Debug, Args)]
struct CreateTransactionArgs {
    /// URN of the account the money leaves.
    #[arg(long, value_name = "URN")]
    payer: String,
    /// URN of the account the money reaches.
    #[arg(long, value_name = "URN")]
    payee: String,
    /// Positive amount to transfer.
    #[arg(long, value_parser = parse_amount)]
    amount: Decimal,
    /// Why the money is moved (at most 30 characters).
    #[arg(long, default_value_t)]
    purpose: String,
    /// Consent to creating the transaction.
    #[arg(long)]
    consent: bool,
}

/// Arguments for the `statement` and `report` subcommands.
#[derive(Debug, Args)]
struct RangeArgs {
    /// Account whose statement is fetched.
    #[command(flatten)]
    target: AccountTarget,
    /// Start date (inclusive, YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,
    /// End date (inclusive, YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,
    /// Why the statement is viewed (at most 30 characters).
    #[arg(long, default_value_t)]
    purpose: String,
    /// Consent to fetching the statement.
    #[arg(long)]
    consent: bool,
}

/// Parses a date string in `YYYY-MM-DD` format for clap.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|err| format!("{err}"))
}

/// Parses a decimal amount for clap.
fn parse_amount(s: &str) -> Result<Decimal, String> {
    s.trim().parse::<Decimal>().map_err(|err| format!("{err}"))
}

/// Parses a currency code for clap.
fn parse_currency(s: &str) -> Result<CurrencyCode, String> {
    s.parse::<CurrencyCode>().map_err(|err| format!("{err}"))
}

/// Picks the base URL: flag, then environment, then the default.
fn resolve_api_url(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var(API_URL_ENV).ok().filter(|url| !url.is_empty()))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned())
}

/// Reads the password from the environment.
fn read_password() -> io::Result<Option<SecretString>> {
    match std::env::var(PASSWORD_ENV) {
        Ok(val) if !val.is_empty() => Ok(Some(SecretString::from(val))),
        _ => {
            let mut err = io::stderr().lock();
            writeln!(
                err,
                "{} {} environment variable is not set",
                "error:".red().bold(),
                PASSWORD_ENV.bold()
            )?;
            writeln!(
                err,
                "  {} export it or add {}=<password> to a .env file",
                "hint:".cyan(),
                PASSWORD_ENV
            )?;
            Ok(None)
        }
    }
}

/// Returns the current local date, the upper bound for date ranges.
fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    let _dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let storage = match create_storage(cli.data_dir) {
        Ok(storage) => storage,
        Err(err) => return fail("failed to initialize session storage", &err),
    };

    let ledger = match LedgerBlocking::builder()
        .base_url(resolve_api_url(cli.api_url))
        .storage(storage)
        .build()
    {
        Ok(ledger) => ledger,
        Err(err) => return fail("failed to build client", &err),
    };

    dispatch(&ledger, cli.command)
}

/// Creates the session store, using `data_dir` if provided or the
/// default XDG data directory otherwise.
fn create_storage(data_dir: Option<PathBuf>) -> fintrack_ledger::error::Result<FileStorage> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => FileStorage::default_dir()?,
    };
    FileStorage::new(dir)
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch<S: BlockingSessionStore>(
    ledger: &LedgerBlocking<S>,
    command: Command,
) -> io::Result<ExitCode> {
    match command {
        Command::Register { email } => cmd_register(ledger, &email),
        Command::Login { email } => cmd_login(ledger, &email),
        Command::Logout { local } => cmd_logout(ledger, local),
        Command::Accounts => cmd_accounts(ledger),
        Command::Account(args) => cmd_account(ledger, &args),
        Command::CreateAccount(args) => cmd_create_account(ledger, &args),
        Command::CreateTransaction(args) => cmd_create_transaction(ledger, &args),
        Command::Statement(args) => cmd_statement(ledger, &args),
        Command::Report(args) => cmd_report(ledger, &args),
    }
}

/// Prints a red `error:` line (plus a hint for a missing session) and
/// returns a failure exit code.
fn fail(context: &str, err: &LedgerError) -> io::Result<ExitCode> {
    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{} {context}: {err}", "error:".red().bold())?;
    if matches!(*err, LedgerError::NotLoggedIn) {
        writeln!(
            stderr,
            "  {} run {} first",
            "hint:".cyan(),
            "fintrack login --email <EMAIL>".bold()
        )?;
    }
    Ok(ExitCode::FAILURE)
}

/// Executes the `register` subcommand.
fn cmd_register<S: BlockingSessionStore>(
    ledger: &LedgerBlocking<S>,
    email: &str,
) -> io::Result<ExitCode> {
    let Some(password) = read_password()? else {
        return Ok(ExitCode::FAILURE);
    };
    let spinner = make_spinner("Registering...");
    let result = ledger.register(email, password);
    spinner.finish_and_clear();

    match result {
        Ok(user) => {
            let mut out = io::stdout().lock();
            writeln!(out, "{} {}", "Registered".green().bold(), user.user_email)?;
            writeln!(out, "  {} {}", "User URN:".bold(), user.user_urn)?;
            writeln!(out, "  {} {}", "Created:".bold(), user.created_at)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("registration failed", &err),
    }
}

/// Executes the `login` subcommand.
fn cmd_login<S: BlockingSessionStore>(
    ledger: &LedgerBlocking<S>,
    email: &str,
) -> io::Result<ExitCode> {
    let Some(password) = read_password()? else {
        return Ok(ExitCode::FAILURE);
    };
    let spinner = make_spinner("Logging in...");
    let result = ledger.login(email, password);
    spinner.finish_and_clear();

    match result {
        Ok(()) => {
            writeln!(
                io::stdout().lock(),
                "{} as {email}",
                "Logged in".green().bold()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("login failed", &err),
    }
}

/// Executes the `logout` subcommand.
fn cmd_logout<S: BlockingSessionStore>(
    ledger: &LedgerBlocking<S>,
    local: bool,
) -> io::Result<ExitCode> {
    let result = if local {
        ledger.forget_session()
    } else {
        let spinner = make_spinner("Logging out...");
        let remote = ledger.logout();
        spinner.finish_and_clear();
        remote
    };

    match result {
        Ok(()) => {
            writeln!(io::stdout().lock(), "{}", "Logged out".green().bold())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("logout failed", &err),
    }
}

/// Executes the `accounts` subcommand: lists the user's accounts.
fn cmd_accounts<S: BlockingSessionStore>(ledger: &LedgerBlocking<S>) -> io::Result<ExitCode> {
    let spinner = make_spinner("Fetching accounts...");
    let result = ledger.user_accounts();
    spinner.finish_and_clear();

    match result {
        Ok(listing) => {
            print_accounts_table(&listing.accounts)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("failed to fetch accounts", &err),
    }
}

/// Resolves a named entity, printing an error on failure.
///
/// Returns `Ok(Some(value))` on success, `Ok(None)` if the entity was not
/// found or the lookup failed (error already printed), or `Err` on I/O
/// failure.
fn resolve_name<T, F>(label: &str, name: &str, lookup: F) -> io::Result<Option<T>>
where
    F: FnOnce(&str) -> fintrack_ledger::error::Result<Option<T>>,
{
    match lookup(name) {
        Ok(Some(value)) => Ok(Some(value)),
        Ok(None) => {
            writeln!(
                io::stderr().lock(),
                "{} {label} not found: {name}",
                "error:".red().bold()
            )?;
            Ok(None)
        }
        Err(err) => {
            let _code = fail(&format!("failed to look up {label}"), &err)?;
            Ok(None)
        }
    }
}

/// Turns the command-line account argument into a URN, looking the name
/// up on the server when `--by-name` is given.
fn resolve_account<S: BlockingSessionStore>(
    ledger: &LedgerBlocking<S>,
    target: &AccountTarget,
) -> io::Result<Option<AccountUrn>> {
    if !target.by_name {
        return Ok(Some(AccountUrn::from(target.account.as_str())));
    }
    let found = resolve_name("account", &target.account, |name| {
        ledger.find_account_by_name(name)
    })?;
    Ok(found.map(|details| details.account_urn))
}

/// Executes the `account` subcommand: shows one account.
fn cmd_account<S: BlockingSessionStore>(
    ledger: &LedgerBlocking<S>,
    args: &FetchArgs,
) -> io::Result<ExitCode> {
    if let Err(err) = validation::require_consent(args.consent, "fetch the account") {
        return fail("account", &LedgerError::from(err));
    }
    let Some(account) = resolve_account(ledger, &args.target)? else {
        return Ok(ExitCode::FAILURE);
    };

    let spinner = make_spinner("Fetching account...");
    let result = ledger.account(&account, &args.purpose);
    spinner.finish_and_clear();

    match result {
        Ok(details) => {
            print_account_details("Account", &details)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("failed to fetch account", &err),
    }
}

/// Executes the `create-account` subcommand.
fn cmd_create_account<S: BlockingSessionStore>(
    ledger: &LedgerBlocking<S>,
    args: &CreateAccountArgs,
) -> io::Result<ExitCode> {
    let request =
        match CreateAccountRequest::new(&args.name, args.currency, &args.purpose, args.consent) {
            Ok(request) => request,
            Err(err) => return fail("invalid account", &LedgerError::from(err)),
        };

    let spinner = make_spinner("Creating account...");
    let result = ledger.create_account(&request);
    spinner.finish_and_clear();

    match result {
        Ok(details) => {
            print_account_details("Account created", &details)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("failed to create account", &err),
    }
}

/// Executes the `create-transaction` subcommand.
fn cmd_create_transaction<S: BlockingSessionStore>(
    ledger: &LedgerBlocking<S>,
    args: &CreateTransactionArgs,
) -> io::Result<ExitCode> {
    let request = match CreateTransactionRequest::new(
        AccountUrn::from(args.payer.as_str()),
        AccountUrn::from(args.payee.as_str()),
        args.amount,
        &args.purpose,
        args.consent,
    ) {
        Ok(request) => request,
        Err(err) => return fail("invalid transaction", &LedgerError::from(err)),
    };

    let spinner = make_spinner("Creating transaction...");
    let result = ledger.create_transaction(&request);
    spinner.finish_and_clear();

    match result {
        Ok(created) => {
            let mut out = io::stdout().lock();
            writeln!(out, "{}", "Transaction created".green().bold())?;
            writeln!(out, "  {} {}", "URN:".bold(), created.transaction_urn)?;
            writeln!(
                out,
                "  {} {} {}",
                "Amount:".bold(),
                format_amount(None, created.amount),
                created.currency
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("failed to create transaction", &err),
    }
}

/// Executes the `statement` subcommand: fetches the statement and
/// summarizes it over the requested range.
fn cmd_statement<S: BlockingSessionStore>(
    ledger: &LedgerBlocking<S>,
    args: &RangeArgs,
) -> io::Result<ExitCode> {
    if let Err(err) = validation::require_consent(args.consent, "fetch the statement") {
        return fail("statement", &LedgerError::from(err));
    }
    let range = match validate_range(args.from, args.to, today(), ViewKind::Statement) {
        Ok(range) => range,
        Err(err) => return fail("invalid date range", &LedgerError::from(err)),
    };
    let Some(account) = resolve_account(ledger, &args.target)? else {
        return Ok(ExitCode::FAILURE);
    };

    let spinner = make_spinner("Fetching statement...");
    let result = ledger.fetch_statement(&account, &args.purpose);
    spinner.finish_and_clear();

    let statement = match result {
        Ok(statement) => statement,
        Err(err) => return fail("failed to fetch statement", &err),
    };
    print_rejected(&statement.rejected)?;

    match StatementSummary::compute(&statement.transactions, range) {
        Ok(summary) => {
            print_statement(&summary, statement.transactions.len())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("cannot summarize statement", &err),
    }
}

/// Executes the `report` subcommand: fetches the statement and runs the
/// report filter over it.
fn cmd_report<S: BlockingSessionStore>(
    ledger: &LedgerBlocking<S>,
    args: &RangeArgs,
) -> io::Result<ExitCode> {
    if let Err(err) = validation::require_consent(args.consent, "fetch the statement") {
        return fail("report", &LedgerError::from(err));
    }
    if let Err(err) = validate_range(args.from, args.to, today(), ViewKind::Report) {
        return fail("invalid date range", &LedgerError::from(err));
    }
    let Some(account) = resolve_account(ledger, &args.target)? else {
        return Ok(ExitCode::FAILURE);
    };

    let spinner = make_spinner("Fetching statement...");
    let result = ledger.report(&account, &args.purpose);
    spinner.finish_and_clear();

    let mut view = match result {
        Ok(view) => view,
        Err(err) => return fail("failed to build report", &err),
    };

    let state = match view.apply_filter(args.from, args.to, today()) {
        Ok(state) => state,
        Err(err) => return fail("cannot build report", &err),
    };
    if let Some(err) = state.error() {
        return fail("invalid date range", &LedgerError::from(err.clone()));
    }
    if let Some(report) = state.report() {
        print_report(report)?;
    }
    Ok(ExitCode::SUCCESS)
}

// ── Output formatting ────────────────────────────────────────────────

/// Creates a table with the shared preset and cyan header cells.
fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(
        headers
            .iter()
            .map(|header| Cell::new(header).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

/// Builds the accounts table.
fn accounts_table(accounts: &[AccountDetails]) -> Table {
    let mut table = new_table(&["Name", "URN", "Currency", "Balance", "Credit", "Debit"]);
    for acc in accounts {
        let balance = acc.balances.total_balance;
        let balance_cell = Cell::new(format_amount(None, balance)).fg(if balance.is_sign_negative() {
            Color::Red
        } else {
            Color::Green
        });
        _ = table.add_row(vec![
            Cell::new(&acc.name),
            Cell::new(&acc.account_urn),
            Cell::new(&acc.currency),
            balance_cell,
            Cell::new(format_amount(None, acc.balances.total_credit_balance)),
            Cell::new(format_amount(None, acc.balances.total_debit_balance)),
        ]);
    }
    table
}

/// Prints accounts in a table.
fn print_accounts_table(accounts: &[AccountDetails]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if accounts.is_empty() {
        writeln!(out, "{}", "No accounts found.".dimmed())?;
        return Ok(());
    }

    writeln!(
        out,
        "{} {}",
        "Accounts".green().bold(),
        format_args!("({})", accounts.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{}", accounts_table(accounts))?;
    Ok(())
}

/// Prints one account with its balances.
fn print_account_details(title: &str, details: &AccountDetails) -> io::Result<()> {
    let currency = Some(details.currency.as_str());
    let mut out = io::stdout().lock();
    writeln!(out, "{}", title.green().bold())?;
    writeln!(out, "  {} {}", "Name:".bold(), details.name)?;
    writeln!(out, "  {} {}", "URN:".bold(), details.account_urn)?;
    writeln!(out, "  {} {}", "Currency:".bold(), details.currency)?;
    writeln!(
        out,
        "  {} {}",
        "Balance:".bold(),
        format_amount(currency, details.balances.total_balance)
    )?;
    writeln!(
        out,
        "  {} {}",
        "Credited:".bold(),
        format_amount(currency, details.balances.total_credit_balance).green()
    )?;
    writeln!(
        out,
        "  {} {}",
        "Debited:".bold(),
        format_amount(currency, details.balances.total_debit_balance).red()
    )?;
    Ok(())
}

/// Returns the display name of one side of a transfer.
fn party<'tx>(name: Option<&'tx String>, urn: Option<&'tx AccountUrn>) -> &'tx str {
    name.map(String::as_str)
        .or_else(|| urn.map(AccountUrn::as_inner))
        .unwrap_or(DASH)
}

/// Builds the transaction table shared by statements and reports.
fn transactions_table(transactions: &[Transaction], currency: Option<&str>) -> Table {
    let code = currency.unwrap_or_default();
    let mut table = new_table(&[
        "Date",
        "Transaction",
        "From",
        "To",
        "Purpose",
        &format!("Credit {code}"),
        &format!("Debit {code}"),
    ]);

    for tx in transactions {
        let date = tx.timestamp().map_or_else(
            || tx.transaction_timestamp.clone(),
            |ts| ts.format("%Y-%m-%d %H:%M").to_string(),
        );
        let amount = format_amount(None, tx.amount);
        let (credit_cell, debit_cell) = match tx.transaction_type {
            TransactionType::Credit => (
                Cell::new(amount).fg(Color::Green),
                Cell::new(DASH).fg(Color::DarkGrey),
            ),
            TransactionType::Debit => (
                Cell::new(DASH).fg(Color::DarkGrey),
                Cell::new(amount).fg(Color::Red),
            ),
        };
        _ = table.add_row(vec![
            Cell::new(date),
            Cell::new(&tx.transaction_urn),
            Cell::new(party(
                tx.payer_account_name.as_ref(),
                tx.payer_account_urn.as_ref(),
            )),
            Cell::new(party(
                tx.payee_account_name.as_ref(),
                tx.payee_account_urn.as_ref(),
            )),
            Cell::new(tx.purpose_preview()),
            credit_cell,
            debit_cell,
        ]);
    }
    table
}

/// Builds the chart table of a report.
fn chart_table(points: &[ChartPoint], currency: Option<&str>) -> Table {
    let mut table = new_table(&["Date", "Credit", "Debit", "Balance"]);
    for point in points {
        let balance_cell =
            Cell::new(format_amount(currency, point.balance)).fg(if point.balance.is_sign_negative() {
                Color::Red
            } else {
                Color::Green
            });
        _ = table.add_row(vec![
            Cell::new(point.date),
            Cell::new(format_amount(currency, point.credit)),
            Cell::new(format_amount(currency, point.debit)),
            balance_cell,
        ]);
    }
    table
}

/// Writes a credit/debit/net line.
fn write_totals<W: io::Write>(
    out: &mut W,
    label: &str,
    totals: &Totals,
    currency: Option<&str>,
) -> io::Result<()> {
    writeln!(
        out,
        "  {} credit {}  debit {}  net {}",
        label.bold(),
        format_amount(currency, totals.credit).green(),
        format_amount(currency, totals.debit).red(),
        format_amount(currency, totals.net).bold()
    )
}

/// Prints a statement summary.
fn print_statement(summary: &StatementSummary, total: usize) -> io::Result<()> {
    let currency = summary.currency.as_deref();
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "{} {} {}",
        "Statement".green().bold(),
        summary.range,
        format_args!("({} of {total} transactions)", summary.filtered.len()).dimmed()
    )?;
    writeln!(out)?;
    if summary.filtered.is_empty() {
        writeln!(out, "{}", "No transactions in this range.".dimmed())?;
    } else {
        writeln!(out, "{}", transactions_table(&summary.filtered, currency))?;
    }
    writeln!(out)?;
    write_totals(&mut out, "In range:", &summary.filtered_totals, currency)?;
    write_totals(&mut out, "Overall: ", &summary.overall_totals, currency)?;
    if summary.skipped > 0 {
        writeln!(
            out,
            "  {} {} record(s) skipped: unreadable timestamp",
            "warning:".yellow().bold(),
            summary.skipped
        )?;
    }
    Ok(())
}

/// Prints a validated report: transactions, chart data and totals.
fn print_report(report: &Report) -> io::Result<()> {
    let currency = report.currency.as_deref();
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "{} {} {}",
        "Report".green().bold(),
        report.range,
        format_args!("({} transactions)", report.transactions.len()).dimmed()
    )?;
    writeln!(out)?;
    if report.transactions.is_empty() {
        writeln!(out, "{}", "No transactions in this range.".dimmed())?;
    } else {
        writeln!(out, "{}", transactions_table(&report.transactions, currency))?;
        writeln!(out)?;
        writeln!(out, "{}", "Balance chart".cyan().bold())?;
        writeln!(out, "{}", chart_table(&report.chart, currency))?;
    }
    writeln!(out)?;
    write_totals(&mut out, "Totals:", &report.totals, currency)?;
    Ok(())
}

/// Warns about statement records the client could not decode.
fn print_rejected(rejected: &[RejectedRecord]) -> io::Result<()> {
    let mut err = io::stderr().lock();
    for record in rejected {
        writeln!(
            err,
            "{} record #{} ignored: {}",
            "warning:".yellow().bold(),
            record.index,
            record.reason
        )?;
    }
    Ok(())
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(core::time::Duration::from_millis(80));
    spinner
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // stderr itself may be gone; nothing left to report to.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}

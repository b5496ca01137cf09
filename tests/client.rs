//! HTTP client tests against a mocked ledger service.
#![cfg(feature = "async")]

use chrono::NaiveDate;
use fintrack_ledger::client::LedgerClient;
use fintrack_ledger::error::{LedgerError, ValidationError};
use fintrack_ledger::ledger::Ledger;
use fintrack_ledger::models::{
    AccountRequest, AccountUrn, CreateAccountRequest, CreateTransactionRequest,
    CredentialsRequest, CurrencyCode,
};
use fintrack_ledger::session::Session;
use fintrack_ledger::statement::DateRange;
use fintrack_ledger::storage::{InMemoryStorage, SessionStore};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "jwt-token-123";

fn secret(value: &str) -> SecretString {
    SecretString::from(value.to_owned())
}

fn session() -> Session {
    Session::new(secret(TOKEN))
}

fn envelope(data: Value) -> Value {
    json!({
        "transaction_urn": null,
        "status": "SUCCESS",
        "response_message": "ok",
        "response_key": "success",
        "data": data,
        "error": null
    })
}

fn failed(status_code: u16, key: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status_code).set_body_json(json!({
        "status": "FAILED",
        "response_message": message,
        "response_key": key,
        "data": {},
        "error": null
    }))
}

fn account_json(urn: &str, name: &str) -> Value {
    json!({
        "account_urn": urn,
        "user_urn": "user-1",
        "name": name,
        "currency": "USD",
        "balances": {
            "total_balance": 150.25,
            "total_credit_balance": 200.25,
            "total_debit_balance": 50
        }
    })
}

fn statement_json() -> Value {
    json!([
        {
            "transaction_urn": "tx-1",
            "payer_account_urn": "acc-2",
            "payer_account_name": "Salary",
            "payee_account_urn": "acc-1",
            "payee_account_name": "Savings",
            "amount": 100.10,
            "transaction_type": "CREDIT",
            "currency_code": "USD",
            "transaction_timestamp": "2024-01-05 09:30:00.123456",
            "purpose": "salary"
        },
        {
            "transaction_urn": "tx-2",
            "payer_account_urn": "acc-1",
            "payee_account_urn": "acc-3",
            "amount": 40.05,
            "transaction_type": "DEBIT",
            "currency_code": "USD",
            "transaction_timestamp": "2024-02-10 18:00:00",
            "purpose": "groceries"
        },
        {
            "transaction_urn": "tx-3",
            "amount": 5,
            "transaction_type": "REFUND",
            "transaction_timestamp": "2024-01-06 10:00:00"
        }
    ])
}

async fn client(server: &MockServer) -> LedgerClient {
    LedgerClient::builder().base_url(server.uri()).build().unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── Low-level client ────────────────────────────────────────────────────

#[tokio::test]
async fn register_posts_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/register"))
        .and(body_partial_json(json!({
            "email": "jane@example.com",
            "password": "Str0ng!pass"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(json!({
            "user_urn": "user-1",
            "user_email": "jane@example.com",
            "created_at": "2024-01-01 00:00:00"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let request = CredentialsRequest::register("jane@example.com", secret("Str0ng!pass")).unwrap();
    let user = client(&server).await.register(&request).await.unwrap();
    assert_eq!(user.user_urn.as_inner(), "user-1");
    assert_eq!(user.user_email, "jane@example.com");
}

#[tokio::test]
async fn login_returns_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!({ "status": true, "token": TOKEN }))),
        )
        .mount(&server)
        .await;

    let request = CredentialsRequest::login("jane@example.com", secret("whatever")).unwrap();
    let issued = client(&server).await.login(&request).await.unwrap();
    assert_eq!(issued, session());
}

#[tokio::test]
async fn login_failure_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(failed(401, "error_invalid_credentials", "Invalid credentials."))
        .mount(&server)
        .await;

    let request = CredentialsRequest::login("jane@example.com", secret("wrong")).unwrap();
    let err = client(&server).await.login(&request).await.unwrap_err();
    match err {
        LedgerError::Api {
            status,
            key,
            message,
        } => {
            assert_eq!(status, 401);
            assert_eq!(key.as_deref(), Some("error_invalid_credentials"));
            assert_eq!(message, "Invalid credentials.");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn non_envelope_error_body_is_kept_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apis/fetch/usr-account"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client(&server)
        .await
        .fetch_user_accounts(&session())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Api { status: 502, key: None, ref message } if message == "Bad Gateway"
    ));
}

#[tokio::test]
async fn failed_envelope_with_ok_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/logout"))
        .respond_with(failed(200, "error_logout", "Logout failed."))
        .mount(&server)
        .await;

    let err = client(&server).await.logout(&session()).await.unwrap_err();
    assert!(matches!(err, LedgerError::Api { status: 200, .. }));
}

#[tokio::test]
async fn authenticated_calls_send_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apis/fetch/usr-account"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "user_urn": "user-1",
            "accounts": [account_json("acc-1", "Savings"), account_json("acc-2", "Travel")]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let listing = client(&server)
        .await
        .fetch_user_accounts(&session())
        .await
        .unwrap();
    assert_eq!(listing.accounts.len(), 2);
    assert_eq!(
        listing.find_by_name("travel").unwrap().account_urn,
        AccountUrn::from("acc-2")
    );
}

#[tokio::test]
async fn create_account_sends_form_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/apis/create/account"))
        .and(body_partial_json(json!({
            "consent": true,
            "purpose": "holiday money",
            "account_name": "Travel",
            "currency_code": "EUR"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(envelope(account_json("acc-9", "Travel"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request =
        CreateAccountRequest::new("Travel", CurrencyCode::Eur, "holiday money", true).unwrap();
    let account = client(&server)
        .await
        .create_account(&session(), &request)
        .await
        .unwrap();
    assert_eq!(account.name, "Travel");
    assert_eq!(account.balances.total_balance, Decimal::new(15025, 2));
}

#[tokio::test]
async fn create_transaction_sends_amount_as_number() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/apis/create/transaction"))
        .and(body_partial_json(json!({
            "payer_account_urn": "acc-1",
            "payee_account_urn": "acc-2",
            "amount": 12.5
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(json!({
            "transaction_urn": "tx-42",
            "user_urn": "user-1",
            "payee_account_urn": "acc-2",
            "payer_account_urn": "acc-1",
            "currency": "USD",
            "amount": 12.5
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let request = CreateTransactionRequest::new(
        AccountUrn::from("acc-1"),
        AccountUrn::from("acc-2"),
        Decimal::new(125, 1),
        "rent",
        true,
    )
    .unwrap();
    let created = client(&server)
        .await
        .create_transaction(&session(), &request)
        .await
        .unwrap();
    assert_eq!(created.transaction_urn.as_inner(), "tx-42");
    assert_eq!(created.amount, Decimal::new(125, 1));
}

#[tokio::test]
async fn fetch_account_uses_default_purpose() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/apis/fetch/account"))
        .and(body_partial_json(json!({
            "account_urn": "acc-1",
            "purpose": "viewing the account details",
            "consent": true
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(account_json("acc-1", "Savings"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = AccountRequest::fetch_account(AccountUrn::from("acc-1"), "", true).unwrap();
    let account = client(&server)
        .await
        .fetch_account(&session(), &request)
        .await
        .unwrap();
    assert_eq!(account.account_urn.as_inner(), "acc-1");
}

#[tokio::test]
async fn fetch_statement_rejects_bad_records_individually() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/apis/fetch/statement"))
        .and(body_partial_json(json!({ "purpose": "viewing the statement" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(statement_json())))
        .mount(&server)
        .await;

    let request = AccountRequest::fetch_statement(AccountUrn::from("acc-1"), "", true).unwrap();
    let statement = client(&server)
        .await
        .fetch_statement(&session(), &request)
        .await
        .unwrap();
    assert_eq!(statement.transactions.len(), 2);
    assert_eq!(statement.rejected.len(), 1);
    assert_eq!(statement.rejected.first().unwrap().index, 2);
    assert_eq!(
        statement.transactions.first().unwrap().amount,
        Decimal::new(10010, 2)
    );
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ledger/user/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!({ "status": true, "token": TOKEN }))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let prefixed = LedgerClient::builder()
        .base_url(format!("{}/ledger", server.uri()))
        .build()
        .unwrap();
    let request = CredentialsRequest::login("jane@example.com", secret("pw")).unwrap();
    assert!(prefixed.login(&request).await.is_ok());
}

// ── High-level ledger ───────────────────────────────────────────────────

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!({ "status": true, "token": TOKEN }))),
        )
        .mount(server)
        .await;
}

fn ledger(server: &MockServer) -> Ledger<InMemoryStorage> {
    Ledger::builder()
        .base_url(server.uri())
        .storage(InMemoryStorage::new())
        .build()
        .unwrap()
}

#[tokio::test]
async fn login_persists_and_logout_clears_session() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/user/logout"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({ "status": true }))))
        .expect(1)
        .mount(&server)
        .await;

    let ledger = ledger(&server);
    ledger.login("jane@example.com", secret("pw")).await.unwrap();
    assert_eq!(
        ledger.storage().load_session().await.unwrap(),
        Some(session())
    );

    ledger.logout().await.unwrap();
    assert!(!ledger.is_logged_in().await.unwrap());
}

#[tokio::test]
async fn rejected_logout_keeps_session() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/user/logout"))
        .respond_with(failed(500, "error_logout", "Logout failed."))
        .mount(&server)
        .await;

    let ledger = ledger(&server);
    ledger.login("jane@example.com", secret("pw")).await.unwrap();
    assert!(ledger.logout().await.is_err());
    assert!(ledger.is_logged_in().await.unwrap());
}

#[tokio::test]
async fn statement_summarizes_fetched_records() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/apis/fetch/statement"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(statement_json())))
        .mount(&server)
        .await;

    let ledger = ledger(&server);
    ledger.login("jane@example.com", secret("pw")).await.unwrap();

    let range = DateRange::from_dates(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
    let summary = ledger
        .statement(&AccountUrn::from("acc-1"), "", range)
        .await
        .unwrap();
    assert_eq!(summary.filtered.len(), 1);
    assert_eq!(summary.filtered_totals.credit, Decimal::new(10010, 2));
    assert_eq!(summary.filtered_totals.debit, Decimal::ZERO);
    assert_eq!(summary.overall_totals.net, Decimal::new(6005, 2));
    assert_eq!(summary.currency.as_deref(), Some("USD"));
}

#[tokio::test]
async fn report_view_filters_fetched_records() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/apis/fetch/statement"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(statement_json())))
        .mount(&server)
        .await;

    let ledger = ledger(&server);
    ledger.login("jane@example.com", secret("pw")).await.unwrap();

    let mut view = ledger
        .report(&AccountUrn::from("acc-1"), "")
        .await
        .unwrap();
    let today = date(2024, 3, 1);

    let state = view
        .apply_filter(Some(date(2024, 1, 1)), Some(date(2024, 2, 29)), today)
        .unwrap();
    let report = state.report().unwrap();
    assert_eq!(report.balance_series, vec![Decimal::new(10010, 2), Decimal::new(6005, 2)]);

    let state = view
        .apply_filter(Some(date(2024, 2, 1)), Some(date(2024, 1, 1)), today)
        .unwrap();
    assert_eq!(
        state.error(),
        Some(&ValidationError::ToBeforeFrom {
            view: fintrack_ledger::report::ViewKind::Report
        })
    );
    assert!(state.report().is_none());
}

#[tokio::test]
async fn ledger_without_login_never_hits_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let ledger = ledger(&server);
    let result = ledger.account(&AccountUrn::from("acc-1"), "").await;
    assert!(matches!(result, Err(LedgerError::NotLoggedIn)));
}

//! Request bodies for the ledger endpoints.
//!
//! Every constructor generates a fresh [`ReferenceNumber`] and runs the
//! client-side checks from [`crate::validation`], so a request value that
//! exists has already passed form validation.

use rust_decimal::Decimal;
use secrecy::{ExposeSecret as _, SecretString};
use serde::Serialize;

use super::{AccountUrn, CurrencyCode, ReferenceNumber};
use crate::error::ValidationError;
use crate::validation;

/// Purpose sent with an account fetch when the caller leaves it blank.
pub const DEFAULT_ACCOUNT_PURPOSE: &str = "viewing the account details";

/// Purpose sent with a statement fetch when the caller leaves it blank.
pub const DEFAULT_STATEMENT_PURPOSE: &str = "viewing the statement";

/// Body of `/user/register` and `/user/login`.
#[derive(Debug, Serialize)]
pub struct CredentialsRequest {
    /// Client-generated request identifier.
    pub reference_number: ReferenceNumber,
    /// Account email.
    pub email: String,
    /// Account password; redacted in `Debug`.
    #[serde(serialize_with = "crate::session::serialize_secret")]
    pub password: SecretString,
}

impl CredentialsRequest {
    /// Builds a registration request, checking email format and password
    /// strength.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEmail`] or
    /// [`ValidationError::WeakPassword`].
    pub fn register(email: &str, password: SecretString) -> Result<Self, ValidationError> {
        let email = email.trim();
        validation::validate_email(email)?;
        validation::validate_password(password.expose_secret())?;
        Ok(Self {
            reference_number: ReferenceNumber::generate(),
            email: email.to_owned(),
            password,
        })
    }

    /// Builds a login request. Only the email format is checked; password
    /// rules are enforced at registration.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEmail`].
    pub fn login(email: &str, password: SecretString) -> Result<Self, ValidationError> {
        let email = email.trim();
        validation::validate_email(email)?;
        Ok(Self {
            reference_number: ReferenceNumber::generate(),
            email: email.to_owned(),
            password,
        })
    }
}

/// Body of `/user/logout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutRequest {
    /// Client-generated request identifier.
    pub reference_number: ReferenceNumber,
}

impl LogoutRequest {
    /// Builds a logout request with a fresh reference number.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reference_number: ReferenceNumber::generate(),
        }
    }
}

impl Default for LogoutRequest {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Body of `/apis/create/account`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateAccountRequest {
    /// Client-generated request identifier.
    pub reference_number: ReferenceNumber,
    /// User consent flag (always `true` once constructed).
    pub consent: bool,
    /// Why the account is opened.
    pub purpose: String,
    /// Display name: letters and spaces only.
    pub account_name: String,
    /// Account currency.
    pub currency_code: CurrencyCode,
}

impl CreateAccountRequest {
    /// Builds an account creation request.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if consent is missing, the name is not
    /// letters and spaces, or the purpose is too long.
    pub fn new(
        account_name: &str,
        currency_code: CurrencyCode,
        purpose: &str,
        consent: bool,
    ) -> Result<Self, ValidationError> {
        validation::require_consent(consent, "create the account")?;
        let account_name = account_name.trim();
        validation::validate_account_name(account_name)?;
        validation::validate_purpose(purpose)?;
        Ok(Self {
            reference_number: ReferenceNumber::generate(),
            consent,
            purpose: purpose.to_owned(),
            account_name: account_name.to_owned(),
            currency_code,
        })
    }
}

/// Body of `/apis/create/transaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTransactionRequest {
    /// Client-generated request identifier.
    pub reference_number: ReferenceNumber,
    /// User consent flag (always `true` once constructed).
    pub consent: bool,
    /// Why the money is moved.
    pub purpose: String,
    /// Receiving account.
    pub payee_account_urn: Option<AccountUrn>,
    /// Sending account.
    pub payer_account_urn: Option<AccountUrn>,
    /// Positive amount, sent as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl CreateTransactionRequest {
    /// Builds a transfer request from `payer` to `payee`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if consent is missing, either URN is
    /// blank, both URNs are equal, the amount is not positive, or the
    /// purpose is too long.
    pub fn new(
        payer: AccountUrn,
        payee: AccountUrn,
        amount: Decimal,
        purpose: &str,
        consent: bool,
    ) -> Result<Self, ValidationError> {
        validation::require_consent(consent, "create the transaction")?;
        validation::require_account_urn(&payer)?;
        validation::require_account_urn(&payee)?;
        validation::validate_distinct_accounts(&payer, &payee)?;
        validation::validate_amount(amount)?;
        validation::validate_purpose(purpose)?;
        Ok(Self {
            reference_number: ReferenceNumber::generate(),
            consent,
            purpose: purpose.to_owned(),
            payee_account_urn: Some(payee),
            payer_account_urn: Some(payer),
            amount,
        })
    }
}

/// Body of `/apis/fetch/account` and `/apis/fetch/statement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountRequest {
    /// Client-generated request identifier.
    pub reference_number: ReferenceNumber,
    /// User consent flag (always `true` once constructed).
    pub consent: bool,
    /// Why the data is requested.
    pub purpose: String,
    /// Account to read.
    pub account_urn: AccountUrn,
}

impl AccountRequest {
    /// Builds an account-details request. A blank purpose becomes
    /// [`DEFAULT_ACCOUNT_PURPOSE`].
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if consent is missing, the URN is blank,
    /// or the purpose is too long.
    pub fn fetch_account(
        account_urn: AccountUrn,
        purpose: &str,
        consent: bool,
    ) -> Result<Self, ValidationError> {
        Self::build(
            account_urn,
            purpose,
            consent,
            "fetch the account",
            DEFAULT_ACCOUNT_PURPOSE,
        )
    }

    /// Builds a statement request. A blank purpose becomes
    /// [`DEFAULT_STATEMENT_PURPOSE`].
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if consent is missing, the URN is blank,
    /// or the purpose is too long.
    pub fn fetch_statement(
        account_urn: AccountUrn,
        purpose: &str,
        consent: bool,
    ) -> Result<Self, ValidationError> {
        Self::build(
            account_urn,
            purpose,
            consent,
            "fetch the statement",
            DEFAULT_STATEMENT_PURPOSE,
        )
    }

    /// Shared constructor for both fetch requests.
    fn build(
        account_urn: AccountUrn,
        purpose: &str,
        consent: bool,
        action: &'static str,
        default_purpose: &str,
    ) -> Result<Self, ValidationError> {
        validation::require_consent(consent, action)?;
        validation::require_account_urn(&account_urn)?;
        let purpose = match purpose.trim() {
            "" => default_purpose,
            given => given,
        };
        validation::validate_purpose(purpose)?;
        Ok(Self {
            reference_number: ReferenceNumber::generate(),
            consent,
            purpose: purpose.to_owned(),
            account_urn,
        })
    }
}

//! Data models for the ledger API.
//!
//! This module contains strongly-typed representations of the ledger's
//! request and response bodies, newtype URN wrappers, and enumeration
//! types for constrained values.

mod account;
mod enums;
mod envelope;
mod ids;
mod requests;
mod statement;
mod transaction;
mod user;

pub use account::{AccountBalances, AccountDetails, UserAccounts};
pub use enums::{ApiStatus, CurrencyCode, TransactionType};
pub use envelope::ApiResponse;
pub use ids::{AccountUrn, ReferenceNumber, TransactionUrn, UserUrn};
pub use requests::{
    AccountRequest, CreateAccountRequest, CreateTransactionRequest, CredentialsRequest,
    DEFAULT_ACCOUNT_PURPOSE, DEFAULT_STATEMENT_PURPOSE, LogoutRequest,
};
pub use statement::{RejectedRecord, Statement};
pub use transaction::{CreatedTransaction, PURPOSE_PREVIEW_CHARS, Transaction, parse_timestamp};
pub use user::{LoginData, LogoutData, RegisteredUser};

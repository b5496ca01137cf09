//! Transaction models.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AccountUrn, TransactionType, TransactionUrn, UserUrn};

/// Number of characters of `purpose` shown in statement tables.
pub const PURPOSE_PREVIEW_CHARS: usize = 30;

/// Timestamp layouts accepted besides RFC 3339.
const NAIVE_TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A statement line: one transaction seen from the statement's account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier.
    pub transaction_urn: TransactionUrn,
    /// Account the money left.
    pub payer_account_urn: Option<AccountUrn>,
    /// Display name of the payer account.
    #[serde(default)]
    pub payer_account_name: Option<String>,
    /// Account the money reached.
    pub payee_account_urn: Option<AccountUrn>,
    /// Display name of the payee account.
    #[serde(default)]
    pub payee_account_name: Option<String>,
    /// Transferred amount (>= 0).
    pub amount: Decimal,
    /// Whether the amount is credited to or debited from the account.
    pub transaction_type: TransactionType,
    /// ISO currency code of the statement's account.
    #[serde(default)]
    pub currency_code: Option<String>,
    /// Creation time as sent by the server, e.g. `2024-01-05 09:30:00.123456`.
    pub transaction_timestamp: String,
    /// Free-text purpose.
    #[serde(default)]
    pub purpose: Option<String>,
}

impl Transaction {
    /// Parses [`Self::transaction_timestamp`].
    ///
    /// Returns `None` if the timestamp is in none of the accepted layouts.
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.transaction_timestamp)
    }

    /// Returns the calendar date of the transaction, if the timestamp parses.
    #[inline]
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp().map(|ts| ts.date())
    }

    /// Returns the purpose truncated to [`PURPOSE_PREVIEW_CHARS`] characters.
    #[inline]
    #[must_use]
    pub fn purpose_preview(&self) -> String {
        self.purpose
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(PURPOSE_PREVIEW_CHARS)
            .collect()
    }

    /// Returns the amount with its sign relative to the account balance.
    #[inline]
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.transaction_type {
            TransactionType::Credit => self.amount,
            TransactionType::Debit => -self.amount,
        }
    }
}

/// Parses a server timestamp.
///
/// Accepts RFC 3339 (converted to UTC), `YYYY-MM-DD HH:MM:SS[.f]`,
/// `YYYY-MM-DDTHH:MM:SS[.f]`, `YYYY-MM-DD HH:MM` and a bare date
/// (midnight).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(with_offset.naive_utc());
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Payload returned after creating a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedTransaction {
    /// Identifier of the new transaction.
    pub transaction_urn: TransactionUrn,
    /// User who created it.
    pub user_urn: UserUrn,
    /// Receiving account.
    pub payee_account_urn: Option<AccountUrn>,
    /// Sending account.
    pub payer_account_urn: Option<AccountUrn>,
    /// Currency name of the accounts involved.
    pub currency: String,
    /// Transferred amount.
    pub amount: Decimal,
}

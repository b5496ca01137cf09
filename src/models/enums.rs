//! Enumeration types for constrained API values.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Direction of a transaction relative to the statement's account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money received; increases the balance.
    Credit,
    /// Money sent; decreases the balance.
    Debit,
}

impl TransactionType {
    /// Returns the wire name (`CREDIT` / `DEBIT`).
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "CREDIT",
            Self::Debit => "DEBIT",
        }
    }
}

impl core::fmt::Display for TransactionType {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome status reported in every response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiStatus {
    /// The call succeeded.
    Success,
    /// The call failed; see `response_message`.
    Failed,
    /// The call was accepted but not completed.
    Pending,
}

/// Currencies a new ledger account can be opened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrencyCode {
    /// United States Dollar.
    #[serde(rename = "USD")]
    Usd,
    /// Euro.
    #[serde(rename = "EUR")]
    Eur,
    /// British Pound Sterling.
    #[serde(rename = "GBP")]
    Gbp,
    /// Indian Rupee.
    #[serde(rename = "INR")]
    Inr,
    /// Japanese Yen.
    #[serde(rename = "JPY")]
    Jpy,
    /// Australian Dollar.
    #[serde(rename = "AUD")]
    Aud,
    /// New Zealand Dollar.
    #[serde(rename = "NZD")]
    Nzd,
    /// Canadian Dollar.
    #[serde(rename = "CAD")]
    Cad,
}

impl CurrencyCode {
    /// Every supported currency, in display order.
    pub const ALL: [Self; 8] = [
        Self::Usd,
        Self::Eur,
        Self::Gbp,
        Self::Inr,
        Self::Jpy,
        Self::Aud,
        Self::Nzd,
        Self::Cad,
    ];

    /// Returns the ISO 4217 code.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Inr => "INR",
            Self::Jpy => "JPY",
            Self::Aud => "AUD",
            Self::Nzd => "NZD",
            Self::Cad => "CAD",
        }
    }

    /// Returns the English currency name.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Usd => "United States Dollar",
            Self::Eur => "Euro",
            Self::Gbp => "British Pound Sterling",
            Self::Inr => "Indian Rupee",
            Self::Jpy => "Japanese Yen",
            Self::Aud => "Australian Dollar",
            Self::Nzd => "New Zealand Dollar",
            Self::Cad => "Canadian Dollar",
        }
    }
}

impl core::fmt::Display for CurrencyCode {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for CurrencyCode {
    type Err = ValidationError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnsupportedCurrency {
                code: wanted.to_owned(),
                allowed: Self::ALL.map(Self::as_str).join(", "),
            })
    }
}

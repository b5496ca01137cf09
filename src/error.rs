//! Error types for the ledger client library.

use chrono::NaiveDate;

use crate::report::ViewKind;

/// All errors that can occur when using the ledger client.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// HTTP transport failed.
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Machine-readable `response_key` from the envelope, if any.
        key: Option<String>,
        /// Human-readable `response_message`, or the raw body.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The configured base URL is not a valid URL.
    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Session storage backend failed.
    #[error("storage error: {0}")]
    Storage(Box<dyn core::error::Error + Send + Sync>),

    /// An authenticated call was made without a stored session.
    #[error("not logged in: no session credential is available")]
    NotLoggedIn,

    /// Client-side input validation rejected the request.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A transaction list mixes currencies and cannot be aggregated.
    #[error("cannot aggregate transactions in different currencies: {first} and {second}")]
    MixedCurrency {
        /// First currency code encountered.
        first: String,
        /// Conflicting currency code.
        second: String,
    },

    /// Adding up transaction amounts left the representable decimal range.
    #[error("transaction amounts are too large to add up")]
    AmountOverflow,

    /// The API answered with a body the client does not understand.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Input validation failures, each carrying the message shown to the user.
///
/// Validation errors are local and synchronous: they block the
/// computation or request they guard and leave no partial result behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// One or both ends of a date range are missing.
    #[error("Please select both From and To dates.")]
    MissingDateRange,

    /// The range end lies before its start.
    #[error("{}", .view.inverted_range_message())]
    ToBeforeFrom {
        /// View the range was entered in; selects the message wording.
        view: ViewKind,
    },

    /// A range endpoint lies after the current date.
    #[error("Dates in the future are not allowed: {date}.")]
    FutureDate {
        /// Offending endpoint.
        date: NaiveDate,
    },

    /// Email address does not look like `local@domain.tld`.
    #[error("Invalid email format.")]
    InvalidEmail,

    /// Password does not meet the strength rules.
    #[error(
        "Password must be at least 8 characters long, contain at least one uppercase letter, one lowercase letter, one number, and one special character."
    )]
    WeakPassword,

    /// Account name contains characters other than letters and spaces.
    #[error("Account name may only contain letters and spaces.")]
    InvalidAccountName,

    /// Purpose text exceeds the allowed length.
    #[error("Purpose must be at most {max} characters.")]
    PurposeTooLong {
        /// Maximum number of characters.
        max: usize,
    },

    /// The user did not consent to the operation.
    #[error("Please provide consent to {action}.")]
    MissingConsent {
        /// Operation that requires consent, e.g. `"fetch the statement"`.
        action: &'static str,
    },

    /// Transaction amount is zero or negative.
    #[error("Invalid amount.")]
    InvalidAmount,

    /// Payer and payee are the same account.
    #[error("Payer and Payee account URNs cannot be the same.")]
    SameAccount,

    /// Account URN is blank.
    #[error("Account URN cannot be empty or none.")]
    MissingAccountUrn,

    /// Currency code is not one of the supported codes.
    #[error("Invalid currency code provided: {code}. Allowed values are {allowed}")]
    UnsupportedCurrency {
        /// Code that was supplied.
        code: String,
        /// Comma-separated list of supported codes.
        allowed: String,
    },
}

/// Convenience alias for results with [`LedgerError`].
pub type Result<T> = core::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_serde_json() {
        let serde_err = serde_json::from_str::<String>("not json").unwrap_err();
        let err = LedgerError::from(serde_err);
        assert!(matches!(err, LedgerError::Serialization(_)));
        assert!(err.to_string().contains("serialization error"));
    }

    #[test]
    fn error_storage_display() {
        let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = LedgerError::Storage(Box::new(inner));
        let msg = err.to_string();
        assert!(msg.contains("storage error"));
        assert!(msg.contains("file missing"));
    }

    #[test]
    fn error_api_display() {
        let err = LedgerError::Api {
            status: 400,
            key: Some("error_invalid_amount".to_owned()),
            message: "Invalid amount.".to_owned(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 400): Invalid amount.");
    }

    #[test]
    fn validation_error_is_transparent() {
        let err = LedgerError::from(ValidationError::InvalidEmail);
        assert_eq!(err.to_string(), "Invalid email format.");
    }

    #[test]
    fn inverted_range_message_depends_on_view() {
        let report = ValidationError::ToBeforeFrom {
            view: ViewKind::Report,
        };
        let statement = ValidationError::ToBeforeFrom {
            view: ViewKind::Statement,
        };
        assert_eq!(
            report.to_string(),
            "To Date should be greater than or equal to From Date."
        );
        assert_eq!(
            statement.to_string(),
            "To Date should not be earlier than From Date."
        );
    }

    #[test]
    fn consent_message_names_action() {
        let err = ValidationError::MissingConsent {
            action: "fetch the statement",
        };
        assert_eq!(
            err.to_string(),
            "Please provide consent to fetch the statement."
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LedgerError>();
    }
}

//! Client-side form validation.
//!
//! These checks run before any request leaves the process. Each returns the
//! [`ValidationError`] carrying the message shown to the user.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::models::AccountUrn;

/// Maximum number of characters allowed in a purpose field.
pub const MAX_PURPOSE_CHARS: usize = 30;

/// Minimum password length in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

/// `local@domain.tld` with no whitespace and a single `@` per part.
static EMAIL_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));

/// ASCII letters and whitespace only.
static ACCOUNT_NAME_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+$"));

/// Returns `true` if the compiled pattern matches `input`.
fn matches(pattern: &LazyLock<Result<Regex, regex::Error>>, input: &str) -> bool {
    pattern.as_ref().is_ok_and(|re| re.is_match(input))
}

/// Checks that `email` looks like `local@domain.tld`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidEmail`].
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if matches(&EMAIL_PATTERN, email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Checks password strength: at least [`MIN_PASSWORD_CHARS`] characters
/// with a lowercase letter, an uppercase letter, a digit and a character
/// that is not an ASCII letter or digit.
///
/// # Errors
///
/// Returns [`ValidationError::WeakPassword`].
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_CHARS;
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_ascii_alphanumeric());
    if long_enough && has_lower && has_upper && has_digit && has_special {
        Ok(())
    } else {
        Err(ValidationError::WeakPassword)
    }
}

/// Checks that an account name is non-blank and made of letters and spaces.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidAccountName`].
pub fn validate_account_name(name: &str) -> Result<(), ValidationError> {
    if !name.trim().is_empty() && matches(&ACCOUNT_NAME_PATTERN, name) {
        Ok(())
    } else {
        Err(ValidationError::InvalidAccountName)
    }
}

/// Checks that a purpose is at most [`MAX_PURPOSE_CHARS`] characters.
///
/// # Errors
///
/// Returns [`ValidationError::PurposeTooLong`].
pub fn validate_purpose(purpose: &str) -> Result<(), ValidationError> {
    if purpose.chars().count() <= MAX_PURPOSE_CHARS {
        Ok(())
    } else {
        Err(ValidationError::PurposeTooLong {
            max: MAX_PURPOSE_CHARS,
        })
    }
}

/// Checks that the user consented to `action`.
///
/// # Errors
///
/// Returns [`ValidationError::MissingConsent`] naming the action.
pub const fn require_consent(consent: bool, action: &'static str) -> Result<(), ValidationError> {
    if consent {
        Ok(())
    } else {
        Err(ValidationError::MissingConsent { action })
    }
}

/// Checks that a transfer amount is strictly positive.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidAmount`].
pub fn validate_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::InvalidAmount)
    }
}

/// Checks that payer and payee are different accounts.
///
/// # Errors
///
/// Returns [`ValidationError::SameAccount`].
pub fn validate_distinct_accounts(
    payer: &AccountUrn,
    payee: &AccountUrn,
) -> Result<(), ValidationError> {
    if payer.as_inner().trim() == payee.as_inner().trim() {
        Err(ValidationError::SameAccount)
    } else {
        Ok(())
    }
}

/// Checks that an account URN is not blank.
///
/// # Errors
///
/// Returns [`ValidationError::MissingAccountUrn`].
pub fn require_account_urn(urn: &AccountUrn) -> Result<(), ValidationError> {
    if urn.as_inner().trim().is_empty() {
        Err(ValidationError::MissingAccountUrn)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── email ───────────────────────────────────────────────────────

    #[test]
    fn email_accepts_common_addresses() {
        assert_eq!(validate_email("ann@example.com"), Ok(()));
        assert_eq!(validate_email("a.b+c@mail.co.uk"), Ok(()));
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        for bad in ["", "ann", "ann@example", "ann @example.com", "a@b@c.com"] {
            assert_eq!(
                validate_email(bad),
                Err(ValidationError::InvalidEmail),
                "{bad}"
            );
        }
    }

    // ── password ────────────────────────────────────────────────────

    #[test]
    fn password_accepts_strong_values() {
        assert_eq!(validate_password("Str0ng!pass"), Ok(()));
        assert_eq!(validate_password("Abcdef1_"), Ok(()));
    }

    #[test]
    fn password_rejects_each_missing_class() {
        for weak in ["Sh0rt!", "lower0!case", "UPPER0!CASE", "NoDigits!!", "NoSpecial1"] {
            assert_eq!(
                validate_password(weak),
                Err(ValidationError::WeakPassword),
                "{weak}"
            );
        }
    }

    // ── account name / purpose ──────────────────────────────────────

    #[test]
    fn account_name_allows_letters_and_spaces() {
        assert_eq!(validate_account_name("Holiday Fund"), Ok(()));
        assert_eq!(
            validate_account_name("Fund 2"),
            Err(ValidationError::InvalidAccountName)
        );
        assert_eq!(
            validate_account_name("   "),
            Err(ValidationError::InvalidAccountName)
        );
    }

    #[test]
    fn purpose_length_is_counted_in_characters() {
        assert_eq!(validate_purpose(&"é".repeat(MAX_PURPOSE_CHARS)), Ok(()));
        assert_eq!(
            validate_purpose(&"x".repeat(MAX_PURPOSE_CHARS + 1)),
            Err(ValidationError::PurposeTooLong {
                max: MAX_PURPOSE_CHARS
            })
        );
    }

    // ── transfer checks ─────────────────────────────────────────────

    #[test]
    fn amount_must_be_positive() {
        assert_eq!(validate_amount(Decimal::new(1, 2)), Ok(()));
        assert_eq!(
            validate_amount(Decimal::ZERO),
            Err(ValidationError::InvalidAmount)
        );
        assert_eq!(
            validate_amount(Decimal::NEGATIVE_ONE),
            Err(ValidationError::InvalidAmount)
        );
    }

    #[test]
    fn accounts_must_differ() {
        let a = AccountUrn::from("acc-1");
        let b = AccountUrn::from("acc-2");
        assert_eq!(validate_distinct_accounts(&a, &b), Ok(()));
        assert_eq!(
            validate_distinct_accounts(&a, &AccountUrn::from(" acc-1 ")),
            Err(ValidationError::SameAccount)
        );
    }

    #[test]
    fn consent_and_urn_checks() {
        assert_eq!(require_consent(true, "x"), Ok(()));
        assert_eq!(
            require_consent(false, "fetch the account"),
            Err(ValidationError::MissingConsent {
                action: "fetch the account"
            })
        );
        assert_eq!(
            require_account_urn(&AccountUrn::from("")),
            Err(ValidationError::MissingAccountUrn)
        );
    }
}

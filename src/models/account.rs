//! Ledger account models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AccountUrn, UserUrn};

/// Running balances the server keeps for an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalances {
    /// Credits minus debits.
    pub total_balance: Decimal,
    /// Sum of all credits.
    pub total_credit_balance: Decimal,
    /// Sum of all debits.
    pub total_debit_balance: Decimal,
}

/// A ledger account with its balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDetails {
    /// Unique account identifier.
    pub account_urn: AccountUrn,
    /// Owner; absent in the per-user account listing.
    #[serde(default)]
    pub user_urn: Option<UserUrn>,
    /// Display name.
    pub name: String,
    /// Currency name, e.g. `"Euro"`.
    pub currency: String,
    /// Current balances.
    pub balances: AccountBalances,
}

/// All accounts owned by the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccounts {
    /// Owner.
    pub user_urn: UserUrn,
    /// Owned accounts.
    pub accounts: Vec<AccountDetails>,
}

impl UserAccounts {
    /// Finds an account by name (case-insensitive).
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&AccountDetails> {
        let lower = name.to_lowercase();
        self.accounts
            .iter()
            .find(|acc| acc.name.to_lowercase() == lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_json() -> &'static str {
        r#"{
            "user_urn": "u-1",
            "accounts": [
                {
                    "account_urn": "acc-1",
                    "name": "Everyday",
                    "currency": "United States Dollar",
                    "balances": {
                        "total_balance": 70.0,
                        "total_credit_balance": 110.0,
                        "total_debit_balance": 40.0
                    }
                },
                {
                    "account_urn": "acc-2",
                    "name": "Holiday Fund",
                    "currency": "United States Dollar",
                    "balances": {
                        "total_balance": 0,
                        "total_credit_balance": 0,
                        "total_debit_balance": 0
                    }
                }
            ]
        }"#
    }

    #[test]
    fn deserialize_user_accounts() {
        let listing: UserAccounts = serde_json::from_str(listing_json()).unwrap();
        assert_eq!(listing.accounts.len(), 2);
        assert!(listing.accounts[0].user_urn.is_none());
        assert_eq!(
            listing.accounts[0].balances.total_balance,
            Decimal::new(70, 0)
        );
    }

    #[test]
    fn find_by_name_is_case_insensitive() {
        let listing: UserAccounts = serde_json::from_str(listing_json()).unwrap();
        let found = listing.find_by_name("holiday fund").unwrap();
        assert_eq!(found.account_urn, AccountUrn::from("acc-2"));
        assert!(listing.find_by_name("Missing").is_none());
    }

    #[test]
    fn deserialize_single_account_with_owner() {
        let json = r#"{
            "account_urn": "acc-9",
            "user_urn": "u-7",
            "name": "Travel",
            "currency": "Euro",
            "balances": {
                "total_balance": 12.34,
                "total_credit_balance": 12.34,
                "total_debit_balance": 0
            }
        }"#;
        let account: AccountDetails = serde_json::from_str(json).unwrap();
        assert_eq!(account.user_urn, Some(UserUrn::from("u-7")));
        assert_eq!(account.balances.total_credit_balance, Decimal::new(1234, 2));
    }
}

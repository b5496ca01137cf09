//! Newtype wrappers for resource names.
//!
//! The ledger identifies users, accounts and transactions by opaque URN
//! strings. Wrapping them prevents passing an account URN where a
//! transaction URN is expected.

use serde::{Deserialize, Serialize};

/// Macro to define a newtype URN wrapping a `String`.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from the given string.
            #[inline]
            #[must_use]
            pub const fn new(value: String) -> Self {
                Self(value)
            }

            /// Returns a reference to the inner string.
            #[inline]
            #[must_use]
            pub fn as_inner(&self) -> &str {
                &self.0
            }

            /// Consumes the wrapper and returns the inner string.
            #[inline]
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

define_string_id! {
    /// Unique resource name of a registered user.
    UserUrn
}

define_string_id! {
    /// Unique resource name of a ledger account.
    AccountUrn
}

define_string_id! {
    /// Unique resource name of a ledger transaction.
    ///
    /// Response envelopes also carry one of these to identify the API call.
    TransactionUrn
}

define_string_id! {
    /// Client-generated correlation ID sent with every request.
    ReferenceNumber
}

impl ReferenceNumber {
    /// Generates a fresh random (UUID v4) reference number.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

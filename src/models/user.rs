//! User registration and login models.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::UserUrn;

/// Payload returned after a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    /// Identifier of the new user.
    pub user_urn: UserUrn,
    /// Registered email address.
    pub user_email: String,
    /// Server-side creation time.
    pub created_at: String,
}

/// Payload returned by the login endpoint.
///
/// The token is kept in a [`SecretString`] so it never shows up in
/// `Debug` output or logs.
#[derive(Debug, Deserialize)]
pub struct LoginData {
    /// Whether the user is now marked as logged in.
    pub status: bool,
    /// Bearer token for subsequent calls.
    #[serde(deserialize_with = "crate::session::deserialize_secret")]
    pub token: SecretString,
}

/// Payload returned by the logout endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutData {
    /// Logged-in flag after logout (expected `false`).
    pub status: bool,
}

//! Session credential passed to every authenticated call.

use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};

use crate::models::LoginData;

/// Bearer credential obtained from a successful login.
///
/// The token never appears in `Debug` output. It is exposed only when the
/// HTTP client builds the `Authorization` header or a store persists it.
#[derive(Debug, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token issued by the server.
    #[serde(
        serialize_with = "serialize_secret",
        deserialize_with = "deserialize_secret"
    )]
    token: SecretString,
}

impl Session {
    /// Wraps a bearer token.
    #[inline]
    #[must_use]
    pub const fn new(token: SecretString) -> Self {
        Self { token }
    }

    /// Returns the raw bearer token.
    #[inline]
    pub(crate) fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

impl Clone for Session {
    #[inline]
    fn clone(&self) -> Self {
        Self::new(SecretString::from(self.token().to_owned()))
    }
}

impl From<LoginData> for Session {
    #[inline]
    fn from(data: LoginData) -> Self {
        Self::new(data.token)
    }
}

impl PartialEq for Session {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.token() == other.token()
    }
}

impl Eq for Session {}

/// Writes a secret as a plain string. Used for request bodies and the
/// persisted session file only.
pub(crate) fn serialize_secret<S: serde::Serializer>(
    secret: &SecretString,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Reads a plain string straight into a [`SecretString`].
pub(crate) fn deserialize_secret<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(token: &str) -> Session {
        Session::new(SecretString::from(token.to_owned()))
    }

    #[test]
    fn debug_is_redacted() {
        let debug = format!("{:?}", session("super-secret-jwt"));
        assert!(!debug.contains("super-secret-jwt"));
    }

    #[test]
    fn serde_roundtrip_keeps_token() {
        let json = serde_json::to_string(&session("abc")).unwrap();
        assert_eq!(json, r#"{"token":"abc"}"#);
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session("abc"));
    }

    #[test]
    fn clone_keeps_token() {
        let original = session("xyz");
        assert_eq!(original.clone().token(), "xyz");
    }

    #[test]
    fn from_login_data() {
        let data: LoginData = serde_json::from_str(r#"{"status": true, "token": "t-1"}"#).unwrap();
        assert_eq!(Session::from(data).token(), "t-1");
    }
}

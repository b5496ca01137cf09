//! Response envelope shared by every ledger endpoint.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{ApiStatus, TransactionUrn};
use crate::error::{LedgerError, Result};

/// Envelope wrapping every API response.
///
/// `data` defaults to [`serde_json::Value`] so that the envelope can be
/// inspected before its payload is decoded into a concrete type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    /// Server-side identifier of the request.
    #[serde(default)]
    pub transaction_urn: Option<TransactionUrn>,
    /// Outcome of the call.
    pub status: ApiStatus,
    /// Human-readable message.
    #[serde(default)]
    pub response_message: Option<String>,
    /// Machine-readable message key.
    #[serde(default)]
    pub response_key: Option<String>,
    /// Payload.
    #[serde(default)]
    pub data: T,
    /// Error detail, if the server attached one.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl<T> ApiResponse<T> {
    /// Returns `true` if the envelope reports [`ApiStatus::Success`].
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ApiStatus::Success
    }

    /// Builds the [`LedgerError::Api`] describing this envelope.
    #[must_use]
    pub fn to_error(&self, http_status: u16) -> LedgerError {
        LedgerError::Api {
            status: http_status,
            key: self.response_key.clone(),
            message: self
                .response_message
                .clone()
                .unwrap_or_else(|| "request failed".to_owned()),
        }
    }

    /// Returns the payload unless the envelope reports a failure.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Api`] when the status is [`ApiStatus::Failed`].
    pub fn into_data(self, http_status: u16) -> Result<T> {
        match self.status {
            ApiStatus::Failed => Err(self.to_error(http_status)),
            ApiStatus::Pending => {
                tracing::debug!(
                    key = self.response_key.as_deref().unwrap_or_default(),
                    "request accepted but still pending"
                );
                Ok(self.data)
            }
            ApiStatus::Success => Ok(self.data),
        }
    }
}

impl ApiResponse {
    /// Checks the status and decodes the payload into `D`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Api`] for a failed envelope, or
    /// [`LedgerError::Serialization`] if the payload has the wrong shape.
    pub fn decode<D: DeserializeOwned>(self, http_status: u16) -> Result<D> {
        let data = self.into_data(http_status)?;
        Ok(serde_json::from_value(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogoutData;

    #[test]
    fn deserialize_success_envelope() {
        let json = r#"{
            "transaction_urn": "req-1",
            "status": "SUCCESS",
            "response_message": "Logged out",
            "response_key": "success_logout",
            "data": {"status": false},
            "error": {}
        }"#;
        let resp: ApiResponse = serde_json::from_str(json).unwrap();
        assert!(resp.is_success());
        let data: LogoutData = resp.decode(200).unwrap();
        assert!(!data.status);
    }

    #[test]
    fn missing_optional_fields_default() {
        let resp: ApiResponse = serde_json::from_str(r#"{"status": "SUCCESS"}"#).unwrap();
        assert!(resp.transaction_urn.is_none());
        assert!(resp.data.is_null());
        assert!(resp.error.is_none());
    }

    #[test]
    fn failed_envelope_becomes_api_error() {
        let json = r#"{
            "status": "FAILED",
            "response_message": "Invalid amount.",
            "response_key": "error_invalid_amount"
        }"#;
        let resp: ApiResponse = serde_json::from_str(json).unwrap();
        let err = resp.decode::<LogoutData>(200).unwrap_err();
        match err {
            LedgerError::Api {
                status,
                key,
                message,
            } => {
                assert_eq!(status, 200);
                assert_eq!(key.as_deref(), Some("error_invalid_amount"));
                assert_eq!(message, "Invalid amount.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn pending_envelope_yields_data() {
        let resp: ApiResponse =
            serde_json::from_str(r#"{"status": "PENDING", "data": {"status": true}}"#).unwrap();
        let data: LogoutData = resp.decode(202).unwrap();
        assert!(data.status);
    }

    #[test]
    fn wrong_payload_shape_is_serialization_error() {
        let resp: ApiResponse =
            serde_json::from_str(r#"{"status": "SUCCESS", "data": [1, 2]}"#).unwrap();
        let err = resp.decode::<LogoutData>(200).unwrap_err();
        assert!(matches!(err, LedgerError::Serialization(_)));
    }
}

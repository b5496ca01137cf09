//! Statement payload decoded record by record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Transaction;

/// A statement record that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRecord {
    /// Position of the record in the server's list.
    pub index: usize,
    /// Why the record was rejected.
    pub reason: String,
}

/// All transactions of one account, as returned by the statement endpoint.
///
/// Records are decoded individually so that one malformed line does not
/// make the whole statement unusable; such lines end up in
/// [`Statement::rejected`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Successfully decoded transactions, in server order.
    pub transactions: Vec<Transaction>,
    /// Records that failed to decode.
    pub rejected: Vec<RejectedRecord>,
}

impl Statement {
    /// Decodes a list of raw JSON records.
    #[must_use]
    pub fn from_records(records: Vec<serde_json::Value>) -> Self {
        let mut statement = Self::default();
        for (index, record) in records.into_iter().enumerate() {
            match decode_record(record) {
                Ok(tx) => statement.transactions.push(tx),
                Err(reason) => {
                    tracing::warn!(index, reason = %reason, "rejecting statement record");
                    statement.rejected.push(RejectedRecord { index, reason });
                }
            }
        }
        statement
    }

    /// Decodes the `data` member of a statement response.
    ///
    /// The server sends an array of records; an empty object or `null`
    /// is treated as an empty statement.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::LedgerError::UnexpectedResponse`] for any
    /// other JSON shape.
    pub fn from_data(data: serde_json::Value) -> crate::error::Result<Self> {
        match data {
            serde_json::Value::Array(records) => Ok(Self::from_records(records)),
            serde_json::Value::Null => Ok(Self::default()),
            serde_json::Value::Object(map) if map.is_empty() => Ok(Self::default()),
            serde_json::Value::Object(_)
            | serde_json::Value::Bool(_)
            | serde_json::Value::Number(_)
            | serde_json::Value::String(_) => Err(crate::error::LedgerError::UnexpectedResponse(
                "statement data is not a list of transactions".to_owned(),
            )),
        }
    }

    /// Returns `true` if the statement holds no decoded transactions.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Decodes and sanity-checks one statement record.
fn decode_record(record: serde_json::Value) -> Result<Transaction, String> {
    let tx: Transaction = serde_json::from_value(record).map_err(|err| err.to_string())?;
    if tx.amount < Decimal::ZERO {
        return Err(format!("negative amount {}", tx.amount));
    }
    Ok(tx)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::TransactionUrn;

    fn record(urn: &str, amount: serde_json::Value) -> serde_json::Value {
        json!({
            "transaction_urn": urn,
            "payer_account_urn": "acc-1",
            "payer_account_name": "Main",
            "payee_account_urn": "acc-2",
            "payee_account_name": "Savings",
            "amount": amount,
            "currency_code": "USD",
            "transaction_timestamp": "2024-01-01 10:00:00",
            "transaction_type": "DEBIT",
            "purpose": "rent"
        })
    }

    #[test]
    fn decodes_valid_records_in_order() {
        let statement =
            Statement::from_records(vec![record("t-1", json!(10)), record("t-2", json!(20.5))]);
        assert_eq!(statement.transactions.len(), 2);
        assert_eq!(
            statement.transactions[1].transaction_urn,
            TransactionUrn::from("t-2")
        );
        assert!(statement.rejected.is_empty());
    }

    #[test]
    fn malformed_record_is_isolated() {
        let statement = Statement::from_records(vec![
            record("t-1", json!(10)),
            record("t-2", json!("lots")),
            record("t-3", json!(-4)),
            json!({"unexpected": true}),
        ]);
        assert_eq!(statement.transactions.len(), 1);
        let indices: Vec<usize> = statement.rejected.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert!(statement.rejected[1].reason.contains("negative amount"));
    }

    #[test]
    fn from_data_accepts_empty_shapes() {
        assert!(Statement::from_data(json!(null)).unwrap().is_empty());
        assert!(Statement::from_data(json!({})).unwrap().is_empty());
        assert!(Statement::from_data(json!([])).unwrap().is_empty());
    }

    #[test]
    fn from_data_rejects_other_shapes() {
        assert!(Statement::from_data(json!({"accounts": []})).is_err());
        assert!(Statement::from_data(json!("oops")).is_err());
    }
}

//! Response envelopes
//!
//! Serialized field names follow the wire protocol, not Rust convention.

use serde::Serialize;
use serde_json::Value;

use crate::errors::TableError;

/// Successful response: echoed draw, both counts, and the serialized page
#[derive(Debug, Clone, Serialize)]
pub struct TableResponse {
    pub draw: i64,
    #[serde(rename = "recordsTotal")]
    pub records_total: u64,
    #[serde(rename = "recordsFiltered")]
    pub records_filtered: u64,
    pub data: Vec<Value>,
}

/// Failure response: one human-readable message, no partial data
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<TableError> for ErrorResponse {
    fn from(err: TableError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Outcome of one request, ready to serialize with the caller's framework
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TableReply {
    Success(TableResponse),
    Failure(ErrorResponse),
}

impl TableReply {
    /// Serialize into a JSON value
    pub fn to_value(&self) -> Value {
        // Both envelope shapes are plain string-keyed structs
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<TableError> for TableReply {
    fn from(err: TableError) -> Self {
        TableReply::Failure(err.into())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_success_serialization_uses_protocol_keys() {
        let reply = TableReply::Success(TableResponse {
            draw: 3,
            records_total: 10,
            records_filtered: 4,
            data: vec![json!({"id": 1})],
        });

        let value = reply.to_value();
        assert_eq!(value["draw"], 3);
        assert_eq!(value["recordsTotal"], 10);
        assert_eq!(value["recordsFiltered"], 4);
        assert_eq!(value["data"][0]["id"], 1);
    }

    #[test]
    fn test_failure_serialization_is_single_field() {
        let reply = TableReply::from(TableError::missing("start"));

        let value = reply.to_value();
        assert_eq!(value, json!({"error": "Parameter start is missing"}));
    }
}

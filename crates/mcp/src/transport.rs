//! JSON-RPC 2.0 envelope types and error codes.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub const JSONRPC_VERSION: &str = "2.0";

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, Error, PartialEq)]
pub enum EnvelopeError {
    #[error("request is not a JSON object")]
    NotAnObject,
    #[error("request has no method")]
    MissingMethod { id: Option<Value> },
}

/// A decoded request. `id` is `None` for notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Pull the envelope fields out of one decoded value, one field at a time.
    pub fn from_value(value: Value) -> Result<Self, EnvelopeError> {
        let Value::Object(mut fields) = value else {
            return Err(EnvelopeError::NotAnObject);
        };

        let id = fields.remove("id");
        let params = fields.remove("params");

        match fields.remove("method") {
            Some(Value::String(method)) => Ok(Self { id, method, params }),
            _ => Err(EnvelopeError::MissingMethod { id }),
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i32, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data,
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Empty object, used for `ping` and other acknowledgements.
pub fn empty_result() -> Value {
    Value::Object(Map::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_full_envelope() {
        let req = JsonRpcRequest::from_value(json!({
            "jsonrpc": "2.0",
            "id": "abc",
            "method": "tools/list",
            "params": { "cursor": null }
        }))
        .unwrap();

        assert_eq!(req.id, Some(json!("abc")));
        assert_eq!(req.method, "tools/list");
        assert_eq!(req.params, Some(json!({ "cursor": null })));
        assert!(!req.is_notification());
    }

    #[test]
    fn absent_id_is_notification_but_null_id_is_not() {
        let note =
            JsonRpcRequest::from_value(json!({ "method": "notifications/initialized" })).unwrap();
        assert!(note.is_notification());

        let null_id = JsonRpcRequest::from_value(json!({ "id": null, "method": "ping" })).unwrap();
        assert_eq!(null_id.id, Some(Value::Null));
        assert!(!null_id.is_notification());
    }

    #[test]
    fn rejects_non_objects() {
        assert_eq!(
            JsonRpcRequest::from_value(json!([1, 2])),
            Err(EnvelopeError::NotAnObject)
        );
        assert_eq!(
            JsonRpcRequest::from_value(json!("ping")),
            Err(EnvelopeError::NotAnObject)
        );
    }

    #[test]
    fn missing_or_non_string_method_keeps_id() {
        assert_eq!(
            JsonRpcRequest::from_value(json!({ "id": 4 })),
            Err(EnvelopeError::MissingMethod { id: Some(json!(4)) })
        );
        assert_eq!(
            JsonRpcRequest::from_value(json!({ "method": 12 })),
            Err(EnvelopeError::MissingMethod { id: None })
        );
    }

    #[test]
    fn response_channels_are_exclusive() {
        let ok = serde_json::to_value(JsonRpcResponse::success(json!(1), empty_result())).unwrap();
        assert_eq!(ok, json!({ "jsonrpc": "2.0", "id": 1, "result": {} }));

        let err = serde_json::to_value(JsonRpcResponse::error(
            json!(2),
            METHOD_NOT_FOUND,
            "method not found",
            Some(json!("bogus")),
        ))
        .unwrap();
        assert_eq!(
            err,
            json!({
                "jsonrpc": "2.0",
                "id": 2,
                "error": { "code": -32601, "message": "method not found", "data": "bogus" }
            })
        );
    }
}

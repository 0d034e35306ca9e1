//! Standard response envelope
//!
//! Every endpoint answers with `{success, message, data}` plus a status code
//! conveying the outcome class.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

/// Wire shape of every response body.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
    pub data: Value,
}

/// Build a success response with a payload.
pub fn success(status: StatusCode, message: &str, data: Value) -> Response {
    let envelope = Envelope {
        success: true,
        message: message.to_string(),
        data,
    };
    (status, Json(envelope)).into_response()
}

/// Build a success response with no payload.
pub fn success_empty(status: StatusCode, message: &str) -> Response {
    success(status, message, Value::Object(Default::default()))
}

/// Build a failure response. `data` is always empty on failure.
pub fn failure(status: StatusCode, message: &str) -> Response {
    let envelope = Envelope {
        success: false,
        message: message.to_string(),
        data: Value::Object(Default::default()),
    };
    (status, Json(envelope)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_serialization() {
        let envelope = Envelope {
            success: true,
            message: "ok".to_string(),
            data: json!({"user_id": "u1"}),
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "message": "ok", "data": {"user_id": "u1"}})
        );
    }

    #[test]
    fn test_success_status_code() {
        let response = success_empty(StatusCode::CREATED, "created");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_failure_status_code() {
        let response = failure(StatusCode::BAD_REQUEST, "nope");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

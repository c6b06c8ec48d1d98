use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Wrapper for API responses that automatically adds the success envelope.
///
/// The payload's fields are flattened next to `ok`, so a handler returning
/// `SyncedAccount { role, profile }` serializes as
/// `{"ok": true, "role": ..., "profile": ...}`.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: None, // Default to 200 OK
        }
    }

    /// Create an API response with custom status code
    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            data,
            status_code: Some(status_code),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Erro ao montar resposta" })),
                )
                    .into_response();
            }
        };

        let envelope = match data_value {
            Value::Object(fields) => {
                let mut body = Map::new();
                body.insert("ok".to_string(), Value::Bool(true));
                body.extend(fields);
                Value::Object(body)
            }
            // Non-object payloads keep the envelope well-formed under "data"
            other => json!({ "ok": true, "data": other }),
        };

        (status, Json(envelope)).into_response()
    }
}

/// Convenience result alias for route handlers.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Payload {
        role: &'static str,
    }

    fn body_of<T: Serialize>(response: ApiResponse<T>) -> Value {
        // Envelope construction mirrors IntoResponse without needing a server
        let value = serde_json::to_value(&response.data).expect("serializable");
        match value {
            Value::Object(fields) => {
                let mut body = Map::new();
                body.insert("ok".to_string(), Value::Bool(true));
                body.extend(fields);
                Value::Object(body)
            }
            other => json!({ "ok": true, "data": other }),
        }
    }

    #[test]
    fn object_payload_is_flattened_next_to_ok() {
        let body = body_of(ApiResponse::success(Payload { role: "instructor" }));
        assert_eq!(body, json!({ "ok": true, "role": "instructor" }));
    }

    #[test]
    fn scalar_payload_nests_under_data() {
        let body = body_of(ApiResponse::success(42));
        assert_eq!(body, json!({ "ok": true, "data": 42 }));
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Success envelope for mutating endpoints:
/// `{ "status": "success", "message": ..., "note": ... }`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub message: String,
    pub note: Option<T>,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK with a note attached
    pub fn success(message: impl Into<String>, note: T) -> Self {
        Self {
            message: message.into(),
            note: Some(note),
            status_code: None,
        }
    }

    /// 201 Created with a note attached
    pub fn created(message: impl Into<String>, note: T) -> Self {
        Self {
            status_code: Some(StatusCode::CREATED),
            ..Self::success(message, note)
        }
    }
}

impl ApiResponse<()> {
    /// 200 OK carrying only a message
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            note: None,
            status_code: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let mut envelope = json!({
            "status": "success",
            "message": self.message,
        });

        if let Some(note) = &self.note {
            match serde_json::to_value(note) {
                Ok(value) => envelope["note"] = value,
                Err(e) => {
                    tracing::error!("Failed to serialize response data: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "status": "error",
                            "message": "Failed to serialize response data"
                        })),
                    )
                        .into_response();
                }
            }
        }

        (status, Json::<Value>(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

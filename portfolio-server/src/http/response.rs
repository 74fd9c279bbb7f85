//! Success envelope: `{"success": true, "data": ..., "message": ...}`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use super::error::ApiError;

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

#[derive(Debug, Serialize)]
struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    data: Option<T>,
    message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// 200 with data
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data: Some(data),
            message: None,
        }
    }

    /// 201 with the created document
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::ok(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// 200 with only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            data: None,
            message: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            success: true,
            data: self.data,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Uniform JSON envelope returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
        }
    }

    pub fn failure(message: impl Into<String>, errors: Option<Vec<String>>) -> Self {
        ApiResponse {
            success: false,
            message: message.into(),
            data: None,
            errors,
        }
    }
}

/// Envelope plus status code, the return type of most handlers.
pub struct Reply<T: Serialize> {
    status: StatusCode,
    body: ApiResponse<T>,
}

impl<T: Serialize> Reply<T> {
    /// 200 with data.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Reply {
            status: StatusCode::OK,
            body: ApiResponse::success(message, data),
        }
    }

    /// 201 with data.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Reply {
            status: StatusCode::CREATED,
            body: ApiResponse::success(message, data),
        }
    }
}

impl Reply<()> {
    /// 200 without data.
    pub fn message(message: impl Into<String>) -> Self {
        Reply {
            status: StatusCode::OK,
            body: ApiResponse {
                success: true,
                message: message.into(),
                data: None,
                errors: None,
            },
        }
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

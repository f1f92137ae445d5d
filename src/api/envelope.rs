//! Success half of the response envelope: `{status: "success", message?, data}`.
//! Errors are rendered by `AppError`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SuccessBody<T> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    data: T,
}

#[derive(Debug)]
pub struct ApiResponse<T> {
    status_code: StatusCode,
    message: Option<&'static str>,
    data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status_code: StatusCode::OK,
            message: None,
            data,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            ..Self::ok(data)
        }
    }

    pub fn with_message(self, message: &'static str) -> Self {
        Self {
            message: Some(message),
            ..self
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = SuccessBody {
            status: "success",
            message: self.message,
            data: self.data,
        };
        (self.status_code, Json(body)).into_response()
    }
}

use crate::controller::ActionReply;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Standard API response wrapper
///
/// Provides a consistent JSON envelope for CRUD controller actions.
///
/// # Example
/// ```
/// use axle::common::ApiResponse;
/// use axum::http::StatusCode;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Book {
///     id: String,
///     title: String,
/// }
///
/// fn found(book: Book) -> ApiResponse<Book> {
///     ApiResponse::success(book)
/// }
///
/// fn missing() -> ApiResponse<Book> {
///     ApiResponse::error(StatusCode::NOT_FOUND, "book not found")
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,

    pub success: bool,

    #[serde(skip)]
    pub http_status: StatusCode,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful response with data
    ///
    /// Defaults to HTTP 200 OK.
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            success: true,
            http_status: StatusCode::OK,
        }
    }

    /// Create an error response
    ///
    /// The error `code` is derived from the canonical reason phrase of the
    /// status, falling back to the numeric code.
    pub fn error(status: StatusCode, message: impl Into<String>) -> ApiResponse<T> {
        let code = status
            .canonical_reason()
            .map(|reason| reason.replace(' ', ""))
            .unwrap_or_else(|| status.as_u16().to_string());
        ApiResponse {
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
            success: false,
            http_status: status,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.http_status, Json(self)).into_response()
    }
}

impl<T: Serialize> From<ApiResponse<T>> for ActionReply {
    fn from(response: ApiResponse<T>) -> Self {
        ActionReply::Response(response.into_response())
    }
}

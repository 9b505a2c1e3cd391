use thiserror::Error;

pub type Result<T> = std::result::Result<T, AxleError>;

#[derive(Debug, Error)]
pub enum AxleError {
    #[error("malformed route token '{token}': use 'Controller:action' format")]
    MalformedToken { token: String },

    #[error("HTTP method '{method}' is not allowed")]
    DisallowedMethod { method: String },

    #[error("controller '{key}' is not registered")]
    UnknownController { key: String },

    #[error("controller '{key}' is missing required actions: {missing}")]
    MissingCapability { key: String, missing: String },

    #[error("controller '{key}' has no action '{action}'")]
    UnknownAction { key: String, action: String },

    #[error("missing positional argument {index}")]
    MissingArgument { index: usize },

    #[error("route name '{name}' is not registered")]
    UnknownRouteName { name: String },

    #[error("dependency not found: {type_name}")]
    DependencyNotFound { type_name: String },

    #[error("failed to downcast type: {type_name}")]
    DowncastFailed { type_name: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AxleError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AxleError::UnknownAction { .. } => axum::http::StatusCode::NOT_FOUND,
            AxleError::MissingArgument { .. } => axum::http::StatusCode::BAD_REQUEST,
            AxleError::MalformedToken { .. }
            | AxleError::DisallowedMethod { .. }
            | AxleError::UnknownController { .. }
            | AxleError::MissingCapability { .. }
            | AxleError::UnknownRouteName { .. }
            | AxleError::DependencyNotFound { .. }
            | AxleError::DowncastFailed { .. }
            | AxleError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

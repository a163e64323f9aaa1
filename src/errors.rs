use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("{0}")]
    Validation(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    NoMatch(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for AlertError {
    fn from(err: reqwest::Error) -> Self {
        AlertError::Upstream(err.to_string())
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<AlertError> for AppError {
    fn from(err: AlertError) -> Self {
        let status = match &err {
            AlertError::Validation(_) | AlertError::Parse(_) => StatusCode::BAD_REQUEST,
            AlertError::NotFound(_) => StatusCode::NOT_FOUND,
            AlertError::NoMatch(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AlertError::Upstream(_) | AlertError::Storage(_) | AlertError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

// Malformed bodies and query strings keep axum's status but use the JSON error shape.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Every error the API emits has this single-field body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub erro: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    /// Same text for unknown e-mail and wrong password.
    pub fn invalid_credentials() -> Self {
        ApiError::Unauthorized("Usuário ou senha incorretos.".into())
    }

    /// Log the underlying failure server-side; the caller only ever sees the
    /// endpoint's generic message.
    pub fn internal(e: anyhow::Error, mensagem: &str) -> Self {
        tracing::error!(error = %e, "request failed");
        ApiError::Internal(mensagem.to_string())
    }

    fn body(message: &str) -> Json<ErrorBody> {
        Json(ErrorBody {
            erro: message.to_string(),
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::body(&msg)).into_response()
            }
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, ApiError::body(&msg)).into_response()
            }
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ApiError::body(&msg)).into_response()
            }
            ApiError::Conflict(msg) => {
                (StatusCode::CONFLICT, ApiError::body(&msg)).into_response()
            }
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ApiError::body(&msg)).into_response()
            }
        }
    }
}

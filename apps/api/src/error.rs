use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use marquee_core::{AppError, AuthError};
use serde::Serialize;

/// API error payload: `{"success": false, "error": <status>, "message": ...}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    success: bool,
    error: u16,
    message: String,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        Self(AppError::Auth(value))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AppError::Auth(auth) => match auth {
                AuthError::MissingHeader
                | AuthError::MalformedHeader(_)
                | AuthError::TokenExpired
                | AuthError::InvalidClaims => StatusCode::UNAUTHORIZED,
                AuthError::MalformedToken
                | AuthError::KeyResolutionFailed(_)
                | AuthError::MissingClaim => StatusCode::BAD_REQUEST,
                AuthError::Forbidden => StatusCode::FORBIDDEN,
            },
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Internal details stay in the logs, not in the response body.
        let message = match self.0 {
            AppError::Internal(details) => {
                tracing::error!(%details, "internal error");
                "internal server error".to_owned()
            }
            AppError::BadRequest(message)
            | AppError::NotFound(message)
            | AppError::Unprocessable(message)
            | AppError::Forbidden(message)
            | AppError::Upstream { message, .. } => message,
            AppError::Auth(auth) => auth.to_string(),
        };

        let payload = Json(ErrorResponse {
            success: false,
            error: status.as_u16(),
            message,
        });

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

//! Shared primitives for all Rust crates in Marquee.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across Marquee crates.
pub type AppResult<T> = Result<T, AppError>;

/// Failure modes produced while authenticating and authorizing a request.
///
/// Callers rely on these variants staying distinguishable: a token without a
/// permissions claim (`MissingClaim`) must not collapse into `Forbidden`, and
/// an expired token must not collapse into a generic parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum AuthError {
    /// No `Authorization` header was present on the request.
    #[error("authorization header is expected")]
    MissingHeader,

    /// The `Authorization` header is not exactly `Bearer <token>`.
    #[error("malformed authorization header: {0}")]
    MalformedHeader(String),

    /// The bearer credential could not be parsed as a token.
    #[error("unable to parse authentication token")]
    MalformedToken,

    /// The token signature is valid but the token has expired.
    #[error("token expired")]
    TokenExpired,

    /// Audience or issuer claims do not match the configured values.
    #[error("incorrect claims, check the audience and issuer")]
    InvalidClaims,

    /// The signing key set could not be fetched or holds no matching key.
    #[error("unable to resolve a signing key: {0}")]
    KeyResolutionFailed(String),

    /// The verified token carries no permissions claim at all.
    #[error("permissions not included in token")]
    MissingClaim,

    /// The permissions claim exists but lacks the required permission.
    #[error("you are not authorized to perform this action")]
    Forbidden,
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Well-formed request that cannot be processed.
    #[error("unprocessable: {0}")]
    Unprocessable(String),

    /// Caller is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Identity-provider call failed; the original status code is preserved.
    #[error("upstream error ({status}): {message}")]
    Upstream {
        /// Status code returned by the provider, surfaced unchanged.
        status: u16,
        /// Human-readable description, free of provider secrets.
        message: String,
    },

    /// Authentication or authorization failure from the access gate.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::{AppError, AuthError};

    #[test]
    fn auth_error_nests_into_app_error() {
        let error = AppError::from(AuthError::TokenExpired);
        assert!(matches!(error, AppError::Auth(AuthError::TokenExpired)));
    }

    #[test]
    fn missing_claim_and_forbidden_stay_distinct() {
        assert_ne!(AuthError::MissingClaim, AuthError::Forbidden);
    }

    #[test]
    fn upstream_error_preserves_status() {
        let error = AppError::Upstream {
            status: 404,
            message: "user not found".to_owned(),
        };
        assert_eq!(error.to_string(), "upstream error (404): user not found");
    }
}

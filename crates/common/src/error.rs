//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::SealFailure`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed — the credential id is not a UUID.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No credential exists under the requested id.
    #[error("not found: {0}")]
    NotFound(String),

    /// Sealing the credential into a capsule failed.
    #[error("seal failure: {0}")]
    SealFailure(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::SealFailure(_) => 500,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code for the JSON error body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::SealFailure(_) => "seal_failure",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).http_status(), 400);
        assert_eq!(ServiceError::NotFound("x".into()).http_status(), 404);
        assert_eq!(ServiceError::SealFailure("x".into()).http_status(), 500);
        assert_eq!(ServiceError::Internal("x".into()).http_status(), 500);
    }

    #[test]
    fn codes_match_variants() {
        assert_eq!(ServiceError::BadRequest("x".into()).code(), "bad_request");
        assert_eq!(ServiceError::NotFound("x".into()).code(), "not_found");
        assert_eq!(ServiceError::SealFailure("x".into()).code(), "seal_failure");
    }

    #[test]
    fn display_includes_message() {
        let e = ServiceError::BadRequest("credential id must be a UUID".into());
        assert!(e.to_string().contains("credential id must be a UUID"));
    }
}

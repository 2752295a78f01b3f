use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;

use crate::auth::AuthError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Too many login attempts")]
    RateLimitExceeded,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn invalid_payload() -> Self {
        ApiError::BadRequest("Invalid request payload".to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Auth(AuthError::TokenIssuanceFailed) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(
                AuthError::InvalidCredentials
                | AuthError::MissingToken
                | AuthError::MalformedToken
                | AuthError::ExpiredToken,
            ) => StatusCode::UNAUTHORIZED,
            ApiError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_response = ErrorResponse {
            success: false,
            error: self.to_string(),
        };

        HttpResponse::build(status).json(error_response)
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_maps_to_one_status() {
        let cases = [
            (ApiError::from(AuthError::InvalidCredentials), StatusCode::UNAUTHORIZED),
            (ApiError::from(AuthError::TokenIssuanceFailed), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::from(AuthError::MissingToken), StatusCode::UNAUTHORIZED),
            (ApiError::from(AuthError::MalformedToken), StatusCode::UNAUTHORIZED),
            (ApiError::from(AuthError::ExpiredToken), StatusCode::UNAUTHORIZED),
            (ApiError::from(StoreError::NotFound), StatusCode::NOT_FOUND),
            (ApiError::invalid_payload(), StatusCode::BAD_REQUEST),
            (ApiError::RateLimitExceeded, StatusCode::TOO_MANY_REQUESTS),
            (ApiError::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(error.status_code(), status, "{error}");
        }
    }

    #[test]
    fn messages_are_single_line() {
        assert_eq!(
            ApiError::from(AuthError::MissingToken).to_string(),
            "Authorization header is missing"
        );
        assert_eq!(ApiError::from(StoreError::NotFound).to_string(), "Book not found");
    }
}

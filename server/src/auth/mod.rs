//! Bearer token authentication.
//!
//! [`Authenticator`] checks a username/password pair through a
//! [`PrincipalVerifier`] and hands out HS256 tokens signed by a
//! [`TokenSigner`]. Verification is stateless: any token carrying a valid
//! signature and an unexpired `exp` claim is admitted.

pub mod principal;
pub mod token;

use std::sync::Arc;

use chrono::{DateTime, Utc};

pub use principal::{PrincipalVerifier, StaticPrincipal};
pub use token::{Claims, TokenKeyError, TokenSigner, MIN_SECRET_LEN};

const BEARER_SCHEME: &str = "bearer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Failed to generate token")]
    TokenIssuanceFailed,

    #[error("Authorization header is missing")]
    MissingToken,

    #[error("Invalid token")]
    MalformedToken,

    #[error("Token has expired")]
    ExpiredToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct Authenticator {
    signer: TokenSigner,
    principals: Arc<dyn PrincipalVerifier>,
}

impl Authenticator {
    pub fn new(signer: TokenSigner, principals: Arc<dyn PrincipalVerifier>) -> Self {
        Self { signer, principals }
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    pub fn issue(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        self.issue_at(username, password, Utc::now())
    }

    pub fn issue_at(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        if !self.principals.verify(username, password) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.signer.issue_for(username, now)?;
        let claims = self.signer.verify(&token, now)?;
        let expires_at = claims.expires_at().ok_or(AuthError::TokenIssuanceFailed)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verifies the raw value of an `Authorization` header.
    pub fn verify(&self, authorization: Option<&str>) -> Result<Claims, AuthError> {
        self.verify_at(authorization, Utc::now())
    }

    pub fn verify_at(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Claims, AuthError> {
        let token = authorization
            .map(strip_bearer_scheme)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;

        self.signer.verify(token, now)
    }
}

/// Accepts both `Bearer <token>` and a bare token.
fn strip_bearer_scheme(header: &str) -> &str {
    let header = header.trim();
    if header.eq_ignore_ascii_case(BEARER_SCHEME) {
        return "";
    }
    match header.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => rest.trim(),
        _ => header,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::TimeZone;

    use super::*;

    fn authenticator() -> Authenticator {
        let signer = TokenSigner::new(
            b"01234567890123456789012345678901".to_vec(),
            Duration::from_secs(3600),
        )
        .expect("valid signer");
        Authenticator::new(signer, Arc::new(StaticPrincipal::new("user", "password")))
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
    }

    #[test]
    fn issue_then_verify_returns_same_principal() {
        let auth = authenticator();
        let issued = auth.issue_at("user", "password", at(100)).expect("issue");

        assert_eq!(issued.expires_at, at(3_700));
        let claims = auth
            .verify_at(Some(&issued.token), at(101))
            .expect("verify");
        assert_eq!(claims.username, "user");
    }

    #[test]
    fn wrong_password_is_rejected() {
        let auth = authenticator();
        assert_eq!(
            auth.issue_at("user", "nope", at(0)),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn bearer_prefix_is_optional() {
        let auth = authenticator();
        let issued = auth.issue_at("user", "password", at(0)).expect("issue");

        let prefixed = format!("Bearer {}", issued.token);
        let lowercase = format!("bearer   {}", issued.token);
        assert!(auth.verify_at(Some(&prefixed), at(1)).is_ok());
        assert!(auth.verify_at(Some(&lowercase), at(1)).is_ok());
        assert!(auth.verify_at(Some(&issued.token), at(1)).is_ok());
    }

    #[test]
    fn missing_header_and_empty_bearer_are_missing_token() {
        let auth = authenticator();
        assert_eq!(auth.verify_at(None, at(0)), Err(AuthError::MissingToken));
        assert_eq!(auth.verify_at(Some(""), at(0)), Err(AuthError::MissingToken));
        assert_eq!(
            auth.verify_at(Some("Bearer "), at(0)),
            Err(AuthError::MissingToken)
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = authenticator();
        let issued = auth.issue_at("user", "password", at(0)).expect("issue");
        assert_eq!(
            auth.verify_at(Some(&issued.token), at(3_600)),
            Err(AuthError::ExpiredToken)
        );
    }
}

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{AuthError, Authenticator},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// `POST /login`. Registered as a resource so the login throttle can wrap it.
pub async fn login(
    req: web::Json<LoginRequest>,
    authenticator: web::Data<Authenticator>,
) -> Result<HttpResponse> {
    let issued = authenticator
        .issue(&req.username, &req.password)
        .inspect_err(|err| match err {
            AuthError::InvalidCredentials => {
                log::warn!("Failed login attempt for user: {}", req.username)
            }
            other => log::error!("Token issuance for {} failed: {}", req.username, other),
        })?;

    log::info!(
        "Successful login for user: {} (token expires {})",
        req.username,
        issued.expires_at
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

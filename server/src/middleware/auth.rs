use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::header::AUTHORIZATION,
    middleware::Next,
    web, HttpMessage,
};

use crate::auth::{AuthError, Authenticator, Claims};
use crate::error::ApiError;

/// Rejects requests without a valid bearer token before any handler runs.
///
/// Rejections are answered here with the usual JSON error body. Admitted
/// requests carry their [`Claims`](crate::auth::Claims) in the request
/// extensions.
pub async fn auth_middleware<B: MessageBody>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, actix_web::Error> {
    let verified = match req.app_data::<web::Data<Authenticator>>() {
        Some(authenticator) => authenticate(&req, authenticator),
        None => Err(ApiError::Config("Authenticator not available".to_string())),
    };

    match verified {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.call(req).await.map(ServiceResponse::map_into_left_body)
        }
        Err(err) => {
            log::debug!("Rejected {} {}: {}", req.method(), req.path(), err);
            Ok(req.error_response(err).map_into_right_body())
        }
    }
}

fn authenticate(req: &ServiceRequest, authenticator: &Authenticator) -> Result<Claims, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| AuthError::MalformedToken))
        .transpose()?;

    Ok(authenticator.verify(header)?)
}

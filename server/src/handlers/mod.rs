pub mod auth;
pub mod books;
pub mod health;

use actix_web::{middleware::from_fn, web};

use crate::error::ApiError;
use crate::middleware::{auth_middleware, login_throttle_middleware};

pub use auth::login;
pub use books::{create_book, delete_book, get_book, list_books, update_book};
pub use health::health_check;

/// Body extractor settings that turn decode failures into the JSON error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected request body: {}", err);
        ApiError::invalid_payload().into()
    })
}

/// Registers every route. Shared state (`Authenticator`, `BookStore` and
/// optionally `LoginThrottle`) is expected as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(health_check)
        .service(
            web::resource("/login")
                .wrap(from_fn(login_throttle_middleware))
                .route(web::post().to(login)),
        )
        .service(
            web::scope("/api")
                .wrap(from_fn(auth_middleware))
                .service(list_books)
                .service(get_book)
                .service(create_book)
                .service(update_book)
                .service(delete_book),
        );
}

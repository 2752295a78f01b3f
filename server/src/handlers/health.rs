use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::{error::Result, store::BookStore};

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub books: usize,
}

#[get("/health")]
pub async fn health_check(store: web::Data<BookStore>) -> Result<HttpResponse> {
    let response = HealthCheckResponse {
        status: "healthy".to_string(),
        books: store.len(),
    };

    Ok(HttpResponse::Ok().json(response))
}

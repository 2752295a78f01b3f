use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Serialize;

use crate::{
    auth::Claims,
    error::{ApiError, Result},
    store::{Book, BookId, BookInput, BookStore},
};

#[derive(Debug, Serialize)]
pub struct BookListResponse {
    pub books: Vec<Book>,
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub book: Book,
}

/// Non-numeric ids are refused outright rather than looked up.
pub fn parse_book_id(raw: &str) -> Result<BookId> {
    raw.trim()
        .parse::<BookId>()
        .map_err(|_| ApiError::BadRequest("Invalid book id".to_string()))
}

#[get("/books")]
pub async fn list_books(store: web::Data<BookStore>) -> Result<HttpResponse> {
    let books = store.list();
    log::debug!("Listed {} books", books.len());

    Ok(HttpResponse::Ok().json(BookListResponse { books }))
}

#[get("/books/{id}")]
pub async fn get_book(
    path: web::Path<String>,
    store: web::Data<BookStore>,
) -> Result<HttpResponse> {
    let id = parse_book_id(&path)?;
    let book = store.get(id)?;

    Ok(HttpResponse::Ok().json(BookResponse { book }))
}

#[post("/books")]
pub async fn create_book(
    input: web::Json<BookInput>,
    store: web::Data<BookStore>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let book = store.create(input.into_inner());
    log::info!("Book {} created by {}", book.id, claims.username);

    Ok(HttpResponse::Created().json(BookResponse { book }))
}

#[put("/books/{id}")]
pub async fn update_book(
    path: web::Path<String>,
    input: web::Json<BookInput>,
    store: web::Data<BookStore>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let id = parse_book_id(&path)?;
    let book = store.update(id, input.into_inner())?;
    log::info!("Book {} updated by {}", book.id, claims.username);

    Ok(HttpResponse::Ok().json(BookResponse { book }))
}

#[delete("/books/{id}")]
pub async fn delete_book(
    path: web::Path<String>,
    store: web::Data<BookStore>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let id = parse_book_id(&path)?;
    let book = store.delete(id)?;
    log::info!("Book {} deleted by {}", book.id, claims.username);

    Ok(HttpResponse::Ok().json(BookResponse { book }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_ids() {
        assert_eq!(parse_book_id("7").unwrap(), 7);
        assert_eq!(parse_book_id("-3").unwrap(), -3);
    }

    #[test]
    fn rejects_non_numeric_ids() {
        for raw in ["abc", "", "1.5", "12abc"] {
            assert!(matches!(parse_book_id(raw), Err(ApiError::BadRequest(_))), "{raw}");
        }
    }
}

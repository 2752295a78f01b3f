pub mod models;
pub mod repository;

pub use models::{seed_books, Book, BookId, BookInput};
pub use repository::{BookStore, StoreError, StoreResult};

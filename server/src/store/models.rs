use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type BookId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub isbn: String,
    pub author: String,
    pub price: f64,
    pub cover_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    pub fn from_input(id: BookId, input: BookInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            isbn: input.isbn,
            author: input.author,
            price: input.price,
            cover_image: input.cover_image,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites every client-owned field, keeping `id` and `created_at`.
    pub fn replace_with(&mut self, input: BookInput, now: DateTime<Utc>) {
        self.title = input.title;
        self.isbn = input.isbn;
        self.author = input.author;
        self.price = input.price;
        self.cover_image = input.cover_image;
        self.updated_at = now;
    }
}

/// Client-supplied book fields for create and update.
///
/// Missing fields fall back to their zero value. `id`, `created_at` and
/// `updated_at` in a request body are ignored since unknown keys are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookInput {
    pub title: String,
    pub isbn: String,
    pub author: String,
    pub price: f64,
    pub cover_image: String,
}

impl BookInput {
    pub fn new(
        title: impl Into<String>,
        isbn: impl Into<String>,
        author: impl Into<String>,
        price: f64,
        cover_image: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            isbn: isbn.into(),
            author: author.into(),
            price,
            cover_image: cover_image.into(),
        }
    }
}

/// Records present when the process starts.
pub fn seed_books() -> Vec<BookInput> {
    vec![
        BookInput::new("Book 1", "1234567890", "Author 1", 29.99, "cover1.png"),
        BookInput::new("Book 2", "0987654321", "Author 2", 39.99, "cover2.png"),
    ]
}

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};

use super::models::{Book, BookId, BookInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Book not found")]
    NotFound,
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug)]
struct BookShelf {
    // Insertion order is listing order.
    books: Vec<Book>,
    // Only ever grows, so ids freed by deletes are never handed out again.
    next_id: BookId,
}

impl BookShelf {
    fn position(&self, id: BookId) -> StoreResult<usize> {
        self.books
            .iter()
            .position(|book| book.id == id)
            .ok_or(StoreError::NotFound)
    }
}

/// In-memory book collection shared by every request handler.
///
/// All operations take the same lock, so id assignment and mutations never
/// interleave.
#[derive(Debug, Clone)]
pub struct BookStore {
    shelf: Arc<Mutex<BookShelf>>,
}

impl BookStore {
    pub fn new() -> Self {
        Self {
            shelf: Arc::new(Mutex::new(BookShelf {
                books: Vec::new(),
                next_id: 1,
            })),
        }
    }

    pub fn with_seed(seed: impl IntoIterator<Item = BookInput>) -> Self {
        let store = Self::new();
        for input in seed {
            store.create(input);
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, BookShelf> {
        // A panicking writer cannot leave the shelf half-updated, so a poisoned lock is still usable.
        self.shelf.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn list(&self) -> Vec<Book> {
        self.lock().books.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().books.is_empty()
    }

    pub fn get(&self, id: BookId) -> StoreResult<Book> {
        let shelf = self.lock();
        let index = shelf.position(id)?;
        Ok(shelf.books[index].clone())
    }

    pub fn create(&self, input: BookInput) -> Book {
        let mut shelf = self.lock();
        let id = shelf.next_id;
        shelf.next_id += 1;

        let book = Book::from_input(id, input, Utc::now());
        shelf.books.push(book.clone());

        log::info!("Created book {} ({})", book.id, book.title);
        book
    }

    pub fn update(&self, id: BookId, input: BookInput) -> StoreResult<Book> {
        let mut shelf = self.lock();
        let index = shelf.position(id)?;

        let book = &mut shelf.books[index];
        let now = strictly_after(book.updated_at, Utc::now());
        book.replace_with(input, now);

        log::info!("Updated book {}", id);
        Ok(book.clone())
    }

    pub fn delete(&self, id: BookId) -> StoreResult<Book> {
        let mut shelf = self.lock();
        let index = shelf.position(id)?;
        let removed = shelf.books.remove(index);

        log::info!("Deleted book {}", id);
        Ok(removed)
    }
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}

// Clock readings can repeat within the same tick.
fn strictly_after(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

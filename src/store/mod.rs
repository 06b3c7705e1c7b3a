//! Book store module
//!
//! Keeps the book collection in memory and mirrors every change to a single
//! JSON file. Each mutation rewrites the whole file before the new collection
//! becomes visible, so memory and disk agree even when a write fails.

mod file;
mod model;

pub use file::StoreError;
pub use model::{Book, BookPatch};

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// In-memory collection plus the untouched remainder of the document
struct Collection {
    books: Vec<Book>,
    rest: Map<String, Value>,
}

/// JSON-file backed book collection
pub struct Store {
    path: PathBuf,
    state: RwLock<Collection>,
}

impl Store {
    /// Open the store at `path`.
    ///
    /// A missing file, or a document without a `books` array, is initialised
    /// to an empty collection and written back. A file that is not valid JSON
    /// is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let document = file::read_document(&path)?.unwrap_or_default();

        let (books, needs_write) = match document.books {
            Some(books) => (books, false),
            None => (Vec::new(), true),
        };

        if needs_write {
            file::write_document(&path, &books, &document.rest)?;
            crate::logger::log_info(&format!(
                "Initialized empty book collection in {}",
                path.display()
            ));
        }

        Ok(Self {
            path,
            state: RwLock::new(Collection {
                books,
                rest: document.rest,
            }),
        })
    }

    /// The full collection in insertion order
    pub async fn all(&self) -> Vec<Book> {
        self.state.read().await.books.clone()
    }

    /// First book whose `isbn` equals `isbn`
    pub async fn find_by_key(&self, isbn: &str) -> Option<Book> {
        self.state
            .read()
            .await
            .books
            .iter()
            .find(|b| b.has_key(isbn))
            .cloned()
    }

    /// Append `book` and persist. Duplicate keys are accepted.
    pub async fn append(&self, book: Book) -> Result<Book, StoreError> {
        let mut state = self.state.write().await;
        let mut books = state.books.clone();
        books.push(book.clone());

        file::write_document(&self.path, &books, &state.rest)?;
        state.books = books;
        Ok(book)
    }

    /// Merge `patch` into the first book matching `isbn` and persist.
    ///
    /// Returns the merged record, or `None` when nothing matched (the file is
    /// not touched in that case).
    pub async fn merge_by_key(
        &self,
        isbn: &str,
        patch: &BookPatch,
    ) -> Result<Option<Book>, StoreError> {
        let mut state = self.state.write().await;
        let Some(index) = state.books.iter().position(|b| b.has_key(isbn)) else {
            return Ok(None);
        };

        let mut books = state.books.clone();
        books[index].apply(patch);
        let merged = books[index].clone();

        file::write_document(&self.path, &books, &state.rest)?;
        state.books = books;
        Ok(Some(merged))
    }

    /// Remove every book matching `isbn` and persist.
    ///
    /// Returns how many records were removed; zero leaves the file untouched.
    pub async fn remove_by_key(&self, isbn: &str) -> Result<usize, StoreError> {
        let mut state = self.state.write().await;
        let books: Vec<Book> = state
            .books
            .iter()
            .filter(|b| !b.has_key(isbn))
            .cloned()
            .collect();

        let removed = state.books.len() - books.len();
        if removed == 0 {
            return Ok(0);
        }

        file::write_document(&self.path, &books, &state.rest)?;
        state.books = books;
        Ok(removed)
    }

    /// Number of records currently held
    pub async fn count(&self) -> usize {
        self.state.read().await.books.len()
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

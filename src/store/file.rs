// Backing file access
// Reads and atomically rewrites the `{ "books": [...] }` document

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use super::model::Book;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// On-disk layout. Top-level keys other than `books` are carried through
/// rewrites untouched.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub books: Option<Vec<Book>>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Serialize-only view so a rewrite does not need to clone the collection
#[derive(Serialize)]
struct DocumentRef<'a> {
    books: &'a [Book],
    #[serde(flatten)]
    rest: &'a Map<String, Value>,
}

/// Read the document, `None` if the file does not exist
pub fn read_document(path: &Path) -> Result<Option<Document>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let document = serde_json::from_str(&content).map_err(|e| StoreError::json(path, e))?;
    Ok(Some(document))
}

/// Rewrite the whole document via a temporary sibling and rename
pub fn write_document(
    path: &Path,
    books: &[Book],
    rest: &Map<String, Value>,
) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
    }

    let content = serde_json::to_string_pretty(&DocumentRef { books, rest })
        .map_err(|e| StoreError::json(path, e))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content).map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))?;
    Ok(())
}

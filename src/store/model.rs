// Book record and partial-update types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single book in the collection.
///
/// Neither field is validated; a record created without `name` is stored
/// without it. Fields other than `isbn` and `name` that a record picked up
/// through an update are kept in `extra` and written back as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Book {
    /// Client-supplied identifier, expected (not enforced) to be unique
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub isbn: Option<Value>,
    /// The book title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub name: Option<Value>,
    #[serde(flatten)]
    #[schemars(skip)]
    pub extra: Map<String, Value>,
}

impl Book {
    #[cfg(test)]
    pub fn new(isbn: &str, name: &str) -> Self {
        Self {
            isbn: Some(Value::from(isbn)),
            name: Some(Value::from(name)),
            extra: Map::new(),
        }
    }

    /// Whether this record is addressed by `key`.
    ///
    /// Numeric ids written by older clients match their decimal form.
    pub fn has_key(&self, key: &str) -> bool {
        match &self.isbn {
            Some(Value::String(isbn)) => isbn == key,
            Some(Value::Number(isbn)) => isbn.to_string() == key,
            _ => false,
        }
    }

    /// Shallow merge: fields present in the patch overwrite, absent ones stay
    pub fn apply(&mut self, patch: &BookPatch) {
        if let Some(isbn) = &patch.isbn {
            self.isbn = Some(isbn.clone());
        }
        if let Some(name) = &patch.name {
            self.name = Some(name.clone());
        }
        for (key, value) in &patch.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}

/// Request body of a create or update.
///
/// Only a JSON object is accepted; arrays and scalars fail to decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPatch {
    #[serde(default)]
    pub isbn: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BookPatch {
    /// The record a create stores: `isbn` and `name` only
    pub fn into_book(self) -> Book {
        Book {
            isbn: self.isbn,
            name: self.name,
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patch(body: Value) -> BookPatch {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_apply_overwrites_present_fields_only() {
        let mut book = Book::new("X1", "Foo");
        book.apply(&patch(json!({"name": "New"})));
        assert_eq!(book, Book::new("X1", "New"));
    }

    #[test]
    fn test_apply_can_change_isbn() {
        let mut book = Book::new("X1", "Foo");
        book.apply(&patch(json!({"isbn": "X2"})));
        assert!(book.has_key("X2"));
        assert!(!book.has_key("X1"));
        assert_eq!(book.name, Some(json!("Foo")));
    }

    #[test]
    fn test_apply_adds_other_fields() {
        let mut book = Book::new("X1", "Foo");
        book.apply(&patch(json!({"author": "Rooney"})));
        assert_eq!(
            serde_json::to_value(&book).unwrap(),
            json!({"isbn": "X1", "name": "Foo", "author": "Rooney"})
        );
    }

    #[test]
    fn test_into_book_keeps_isbn_and_name_only() {
        let book = patch(json!({"isbn": "X1", "name": "Foo", "author": "Rooney"})).into_book();
        assert_eq!(book, Book::new("X1", "Foo"));
    }

    #[test]
    fn test_patch_must_be_an_object() {
        assert!(serde_json::from_str::<BookPatch>(r#"["a","b"]"#).is_err());
        assert!(serde_json::from_str::<BookPatch>(r#""X1""#).is_err());
        assert!(serde_json::from_str::<BookPatch>("{}").is_ok());
    }

    #[test]
    fn test_missing_fields_are_not_serialized() {
        let book: Book = serde_json::from_str(r#"{"isbn":"X1"}"#).unwrap();
        assert_eq!(book.name, None);
        assert_eq!(serde_json::to_string(&book).unwrap(), r#"{"isbn":"X1"}"#);
    }

    #[test]
    fn test_numeric_isbn_matches_its_decimal_form() {
        let book: Book = serde_json::from_str(r#"{"isbn":9780141,"name":"One"}"#).unwrap();
        assert!(book.has_key("9780141"));
        assert!(!book.has_key("978014"));
        assert_eq!(serde_json::to_value(&book).unwrap()["isbn"], json!(9_780_141));
    }

    #[test]
    fn test_record_without_isbn_matches_nothing() {
        let book = Book {
            name: Some(json!("Anonymous")),
            ..Book::default()
        };
        assert!(!book.has_key(""));
    }
}

//! Request path helpers

use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// Decode `%XX` escapes in a path segment.
///
/// Malformed escapes are kept verbatim; invalid UTF-8 yields `None`.
pub fn percent_decode(segment: &str) -> Option<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}

/// Split a path under `prefix` into the remaining segment.
///
/// `"/books"` and `"/books/"` give `Some("")`, `"/books/x1"` gives
/// `Some("x1")`, anything outside the prefix or nested deeper gives `None`.
pub fn strip_collection<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() {
        return Some("");
    }
    let rest = rest.strip_prefix('/')?;
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    if rest.contains('/') {
        return None;
    }
    Some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("d5fEasz098712").as_deref(), Some("d5fEasz098712"));
        assert_eq!(percent_decode("978%2D0%201").as_deref(), Some("978-0 1"));
        assert_eq!(percent_decode("caf%C3%A9").as_deref(), Some("café"));
    }

    #[test]
    fn test_percent_decode_malformed() {
        assert_eq!(percent_decode("100%").as_deref(), Some("100%"));
        assert_eq!(percent_decode("%zz1").as_deref(), Some("%zz1"));
        assert_eq!(percent_decode("%FF"), None);
    }

    #[test]
    fn test_strip_collection() {
        assert_eq!(strip_collection("/books", "/books"), Some(""));
        assert_eq!(strip_collection("/books/", "/books"), Some(""));
        assert_eq!(strip_collection("/books/x1", "/books"), Some("x1"));
        assert_eq!(strip_collection("/books/x1/", "/books"), Some("x1"));
        assert_eq!(strip_collection("/books/x1/pages", "/books"), None);
        assert_eq!(strip_collection("/bookshelf", "/books"), None);
        assert_eq!(strip_collection("/authors", "/books"), None);
    }
}

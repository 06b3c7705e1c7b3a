// Book resource handlers
// One function per operation; each maps a store call to a response

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::store::{BookPatch, StoreError};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// GET /books
pub async fn list_books(state: &AppState) -> Response<Full<Bytes>> {
    let books = state.store.all().await;
    http::build_json_response(StatusCode::OK, &books)
}

/// GET /books/{id}
pub async fn get_book(state: &AppState, id: &str) -> Response<Full<Bytes>> {
    match state.store.find_by_key(id).await {
        Some(book) => http::build_json_response(StatusCode::OK, &book),
        None => book_not_found(id),
    }
}

/// POST /books
///
/// Only `isbn` and `name` are taken from the body; nothing is validated.
/// A body that is not a JSON object is rejected.
pub async fn create_book<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let body: BookPatch = match read_json(req, state.config.http.max_body_size).await {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    match state.store.append(body.into_book()).await {
        Ok(book) => http::build_json_response(StatusCode::OK, &book),
        Err(e) => storage_failure("create", &e),
    }
}

/// PUT /books/{id}
///
/// Shallow-merges the body into the matching book and echoes the result.
pub async fn update_book<B>(req: Request<B>, state: &AppState, id: &str) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let patch: BookPatch = match read_json(req, state.config.http.max_body_size).await {
        Ok(patch) => patch,
        Err(resp) => return resp,
    };

    match state.store.merge_by_key(id, &patch).await {
        Ok(Some(book)) => http::build_json_response(StatusCode::OK, &book),
        Ok(None) => book_not_found(id),
        Err(e) => storage_failure("update", &e),
    }
}

/// DELETE /books/{id}
pub async fn delete_book(state: &AppState, id: &str) -> Response<Full<Bytes>> {
    match state.store.remove_by_key(id).await {
        Ok(0) => book_not_found(id),
        Ok(removed) => {
            logger::log_debug(&format!("Removed {removed} book(s) with isbn '{id}'"));
            http::build_empty_response(StatusCode::OK)
        }
        Err(e) => storage_failure("delete", &e),
    }
}

/// Collect the body (bounded by `max_body_size`) and parse it as JSON.
///
/// An empty body reads as `{}`.
async fn read_json<B, T>(req: Request<B>, max_body_size: u64) -> Result<T, Response<Full<Bytes>>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
    T: DeserializeOwned,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let bytes = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!("Request body exceeds {max_body_size} bytes"));
            return Err(http::build_413_response());
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return Err(http::build_error_response(
                StatusCode::BAD_REQUEST,
                "Failed to read request body",
            ));
        }
    };

    let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        &bytes
    };

    serde_json::from_slice(raw).map_err(|e| {
        http::build_error_response(StatusCode::BAD_REQUEST, &format!("Invalid JSON: {e}"))
    })
}

fn book_not_found(id: &str) -> Response<Full<Bytes>> {
    logger::log_debug(&format!("No book with isbn '{id}'"));
    http::build_error_response(StatusCode::NOT_FOUND, "Book not found")
}

/// Details stay in the error log; the client gets a generic 500
fn storage_failure(operation: &str, err: &StoreError) -> Response<Full<Bytes>> {
    logger::log_error(&format!("Failed to {operation} book: {err}"));
    http::build_error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

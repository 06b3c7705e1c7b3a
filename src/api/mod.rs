// API module entry
// REST routes for the books collection

mod handlers;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};

use crate::config::AppState;
use crate::http;

pub use handlers::{create_book, delete_book, get_book, list_books, update_book};

pub const BOOKS_PATH: &str = "/books";

/// Book route handler
///
/// Dispatches on method and path under `/books`. Returns `None` for paths
/// outside the collection so the caller can try other routes.
pub async fn handle_books<B>(req: Request<B>, state: &AppState) -> Option<Response<Full<Bytes>>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let segment = http::path::strip_collection(req.uri().path(), BOOKS_PATH)?.to_string();
    let method = req.method().clone();

    if segment.is_empty() {
        let resp = match method {
            Method::GET | Method::HEAD => list_books(state).await,
            Method::POST => create_book(req, state).await,
            _ => http::build_405_response("GET, HEAD, POST, OPTIONS"),
        };
        return Some(resp);
    }

    let Some(id) = http::percent_decode(&segment) else {
        return Some(http::build_error_response(
            StatusCode::BAD_REQUEST,
            "Book id is not valid UTF-8",
        ));
    };

    let resp = match method {
        Method::GET | Method::HEAD => get_book(state, &id).await,
        Method::PUT => update_book(req, state, &id).await,
        Method::DELETE => delete_book(state, &id).await,
        _ => http::build_405_response("GET, HEAD, PUT, DELETE, OPTIONS"),
    };
    Some(resp)
}

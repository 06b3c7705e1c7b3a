//! HTTP response building module
//!
//! Builders for the responses the server produces, decoupled from the book
//! handlers. Builders never panic; a failed build is logged and replaced by a
//! bare response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::config::HttpConfig;

pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

/// Methods advertised in CORS preflight responses
const CORS_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// Serialize `body` as JSON with the given status
pub fn build_json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(json) => Response::builder()
            .status(status)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .body(Full::new(Bytes::from(json)))
            .unwrap_or_else(|e| {
                log_build_error(status.as_str(), &e);
                Response::new(Full::new(Bytes::new()))
            }),
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            build_error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// `{"error": {"code": .., "message": ..}}` with the given status
pub fn build_error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": {
            "code": status.as_u16(),
            "message": message
        }
    });
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_error_response(StatusCode::NOT_FOUND, "Not Found")
}

/// Build 405 Method Not Allowed response listing the accepted methods
pub fn build_405_response(allow: &str) -> Response<Full<Bytes>> {
    let mut resp = build_error_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
    if let Ok(value) = HeaderValue::from_str(allow) {
        resp.headers_mut().insert(ALLOW, value);
    }
    resp
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_error_response(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large")
}

/// 200 with no body, used to acknowledge deletes
pub fn build_empty_response(status: StatusCode) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, CORS_METHODS);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Methods", CORS_METHODS)
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build generic HTML response
pub fn build_html_response(content: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header("Cache-Control", "no-cache")
        .body(Full::new(Bytes::from(content)))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Stamp the headers every response carries: `Server`, and CORS when enabled
pub fn apply_common_headers(resp: &mut Response<Full<Bytes>>, http: &HttpConfig) {
    let headers = resp.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&http.server_name) {
        headers.insert("Server", value);
    }
    if http.enable_cors {
        headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    }
}

fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn http_config(enable_cors: bool) -> HttpConfig {
        HttpConfig {
            server_name: "books-api/test".to_string(),
            enable_cors,
            max_body_size: 1024,
        }
    }

    #[tokio::test]
    async fn test_error_response_shape() {
        let resp = build_error_response(StatusCode::BAD_REQUEST, "Invalid JSON");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers()[CONTENT_TYPE], CONTENT_TYPE_JSON);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], 400);
        assert_eq!(body["error"]["message"], "Invalid JSON");
    }

    #[test]
    fn test_405_sets_allow() {
        let resp = build_405_response("GET, POST");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[ALLOW], "GET, POST");
    }

    #[test]
    fn test_options_response() {
        let resp = build_options_response(true);
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()["Access-Control-Allow-Methods"], CORS_METHODS);

        let resp = build_options_response(false);
        assert!(resp.headers().get("Access-Control-Allow-Methods").is_none());
    }

    #[test]
    fn test_common_headers() {
        let mut resp = build_empty_response(StatusCode::OK);
        apply_common_headers(&mut resp, &http_config(true));
        assert_eq!(resp.headers()["Server"], "books-api/test");
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");

        let mut resp = build_empty_response(StatusCode::OK);
        apply_common_headers(&mut resp, &http_config(false));
        assert!(resp.headers().get("Access-Control-Allow-Origin").is_none());
    }
}

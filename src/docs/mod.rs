//! API documentation module
//!
//! Builds the OpenAPI document for the books routes and serves it together
//! with a Swagger UI page under `/api-docs`.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response, StatusCode};
use serde_json::{json, Value};

use crate::config::Config;
use crate::http;
use crate::store::Book;

pub const DOCS_PATH: &str = "/api-docs";
pub const SPEC_PATH: &str = "/api-docs/openapi.json";

/// Prebuilt documentation, rendered once at startup
pub struct ApiDocs {
    spec: Value,
    page: String,
}

impl ApiDocs {
    pub fn new(config: &Config) -> Self {
        Self {
            spec: openapi_document(config),
            page: render_page(&config.docs.title),
        }
    }

    /// Serve a request under `/api-docs`, `None` if the path is not ours
    pub fn handle(&self, method: &Method, path: &str) -> Option<Response<Full<Bytes>>> {
        let resource = match path {
            DOCS_PATH | "/api-docs/" | "/api-docs/index.html" => Resource::Page,
            SPEC_PATH => Resource::Spec,
            _ => return None,
        };

        if method != Method::GET && method != Method::HEAD {
            return Some(http::build_405_response("GET, HEAD"));
        }

        Some(match resource {
            Resource::Page => http::build_html_response(self.page.clone()),
            Resource::Spec => http::build_json_response(StatusCode::OK, &self.spec),
        })
    }
}

enum Resource {
    Page,
    Spec,
}

fn render_page(title: &str) -> String {
    include_str!("swagger.html")
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{SPEC_URL}}", SPEC_PATH)
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// JSON Schema of [`Book`] as an OpenAPI component
fn book_schema() -> Value {
    let schema = schemars::schema_for!(Book);
    let mut value = serde_json::to_value(&schema).unwrap_or_else(|e| {
        crate::logger::log_error(&format!("Failed to render Book schema: {e}"));
        json!({ "type": "object" })
    });
    if let Some(obj) = value.as_object_mut() {
        obj.remove("$schema");
        obj.insert("required".to_string(), json!(["isbn", "name"]));
        obj.insert(
            "example".to_string(),
            json!({ "isbn": "d5fEasz098712", "name": "Normal People" }),
        );
    }
    value
}

fn id_parameter(description: &str) -> Value {
    json!({
        "in": "path",
        "name": "id",
        "schema": { "type": "string" },
        "required": true,
        "description": description
    })
}

fn book_content() -> Value {
    json!({ "application/json": { "schema": { "$ref": "#/components/schemas/Book" } } })
}

/// The OpenAPI 3.1 description of every books route
pub fn openapi_document(config: &Config) -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": config.docs.title,
            "version": config.docs.version,
            "description": config.docs.description
        },
        "servers": [ { "url": config.docs_server_url() } ],
        "tags": [ { "name": "Books", "description": "The books managing API" } ],
        "components": {
            "schemas": { "Book": book_schema() }
        },
        "paths": {
            "/books": {
                "get": {
                    "summary": "Returns the list of all the books",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "The list of the books",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            }
                        }
                    }
                },
                "post": {
                    "summary": "Creates a new book",
                    "tags": ["Books"],
                    "requestBody": { "required": true, "content": book_content() },
                    "responses": {
                        "200": { "description": "The book was successfully created", "content": book_content() },
                        "400": { "description": "The request body is not valid JSON" },
                        "500": { "description": "Server error" }
                    }
                }
            },
            "/books/{id}": {
                "get": {
                    "summary": "Get a specific book by isbn id",
                    "tags": ["Books"],
                    "parameters": [ id_parameter("The book id") ],
                    "responses": {
                        "200": { "description": "The book description by isbn id", "content": book_content() },
                        "404": { "description": "The book was not found" }
                    }
                },
                "put": {
                    "summary": "Update the book by the id",
                    "tags": ["Books"],
                    "parameters": [ id_parameter("The book isbn id") ],
                    "requestBody": { "required": true, "content": book_content() },
                    "responses": {
                        "200": { "description": "The book was updated", "content": book_content() },
                        "400": { "description": "The request body is not valid JSON" },
                        "404": { "description": "The book was not found" },
                        "500": { "description": "Some error happened" }
                    }
                },
                "delete": {
                    "summary": "Remove the book by id",
                    "tags": ["Books"],
                    "parameters": [ id_parameter("The book id") ],
                    "responses": {
                        "200": { "description": "The book was deleted" },
                        "404": { "description": "The book was not found" },
                        "500": { "description": "Some error happened" }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn test_config() -> Config {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::load_from(dir.path().join("missing").to_str().unwrap()).unwrap();
        cfg.server.port = 5000;
        cfg.docs.server_url = None;
        cfg
    }

    #[test]
    fn test_document_lists_all_operations() {
        let doc = openapi_document(&test_config());
        assert_eq!(doc["info"]["title"], "Darse Books API");
        assert_eq!(doc["servers"][0]["url"], "http://localhost:5000");

        let books = &doc["paths"]["/books"];
        assert!(books.get("get").is_some());
        assert!(books.get("post").is_some());

        let book = &doc["paths"]["/books/{id}"];
        for op in ["get", "put", "delete"] {
            assert!(book.get(op).is_some(), "missing {op}");
        }
        assert!(book["get"]["responses"].get("404").is_some());
    }

    #[test]
    fn test_book_schema_generated_from_type() {
        let schema = book_schema();
        assert!(schema.get("$schema").is_none());
        assert!(schema["properties"].get("isbn").is_some());
        assert!(schema["properties"].get("name").is_some());
        assert_eq!(schema["example"]["name"], "Normal People");
    }

    #[tokio::test]
    async fn test_handle_routes() {
        let docs = ApiDocs::new(&test_config());

        let page = docs.handle(&Method::GET, "/api-docs").unwrap();
        assert_eq!(page.status(), StatusCode::OK);
        let html = page.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(html.to_vec()).unwrap();
        assert!(html.contains("<title>Darse Books API</title>"));
        assert!(html.contains(SPEC_PATH));

        let spec = docs.handle(&Method::GET, SPEC_PATH).unwrap();
        let bytes = spec.into_body().collect().await.unwrap().to_bytes();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, docs.spec);

        let post = docs.handle(&Method::POST, "/api-docs").unwrap();
        assert_eq!(post.status(), StatusCode::METHOD_NOT_ALLOWED);

        assert!(docs.handle(&Method::GET, "/books").is_none());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<Books & \"Co\">"), "&lt;Books &amp; &quot;Co&quot;&gt;");
    }
}

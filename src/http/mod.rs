//! HTTP protocol layer module
//!
//! Response builders and path helpers shared by the book handlers, the docs
//! routes and the dispatcher.

pub mod path;
pub mod response;

// Re-export commonly used types
pub use path::percent_decode;
pub use response::{
    apply_common_headers, build_404_response, build_405_response, build_413_response,
    build_empty_response, build_error_response, build_html_response, build_json_response,
    build_options_response,
};

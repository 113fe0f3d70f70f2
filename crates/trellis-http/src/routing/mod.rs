//! Route paths, method negotiation and the shared module router

pub mod negotiation;
pub mod path;
pub mod router;

pub use negotiation::MethodNegotiator;
pub use path::{join_paths, normalize_path};
pub use router::{ModuleRouter, Mount};

use axum::http::Method;
use axum::routing::MethodFilter;
use serde::{Deserialize, Serialize};

/// HTTP methods supported by controller routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
    TRACE,
}

impl HttpMethod {
    /// Get the method as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::TRACE => "TRACE",
        }
    }

    pub fn filter(&self) -> MethodFilter {
        match self {
            HttpMethod::GET => MethodFilter::GET,
            HttpMethod::POST => MethodFilter::POST,
            HttpMethod::PUT => MethodFilter::PUT,
            HttpMethod::DELETE => MethodFilter::DELETE,
            HttpMethod::PATCH => MethodFilter::PATCH,
            HttpMethod::HEAD => MethodFilter::HEAD,
            HttpMethod::OPTIONS => MethodFilter::OPTIONS,
            HttpMethod::TRACE => MethodFilter::TRACE,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::GET => Method::GET,
            HttpMethod::POST => Method::POST,
            HttpMethod::PUT => Method::PUT,
            HttpMethod::DELETE => Method::DELETE,
            HttpMethod::PATCH => Method::PATCH,
            HttpMethod::HEAD => Method::HEAD,
            HttpMethod::OPTIONS => Method::OPTIONS,
            HttpMethod::TRACE => Method::TRACE,
        }
    }
}

use crate::routing::HttpMethod;
use axum::http::{header, StatusCode};
use axum::routing::options;
use axum::Router;
use std::collections::{BTreeMap, BTreeSet};

/// Allowed methods per route path
///
/// A controller records paths relative to its mount point; the module
/// router records full route paths across controllers. When applied, every
/// path without an explicit `OPTIONS` route answers `OPTIONS` with
/// `204 No Content` and an `Allow` header. Requests with other unregistered
/// methods keep the router's `405 Method Not Allowed`.
#[derive(Debug, Clone, Default)]
pub struct MethodNegotiator {
    allowed: BTreeMap<String, BTreeSet<HttpMethod>>,
}

impl MethodNegotiator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `path` accepts `method`; returns false if it already did
    pub fn allow(&mut self, path: &str, method: HttpMethod) -> bool {
        self.allowed
            .entry(path.to_string())
            .or_default()
            .insert(method)
    }

    pub fn allowed(&self, path: &str) -> Vec<HttpMethod> {
        self.allowed
            .get(path)
            .map(|methods| methods.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.allowed.keys().map(String::as_str)
    }

    /// Value of the `Allow` header for `path`
    ///
    /// Includes `OPTIONS`, and `HEAD` whenever `GET` is allowed since GET
    /// routes also answer HEAD requests.
    pub fn allow_header(&self, path: &str) -> Option<String> {
        let mut methods = self.allowed.get(path)?.clone();
        if methods.contains(&HttpMethod::GET) {
            methods.insert(HttpMethod::HEAD);
        }
        methods.insert(HttpMethod::OPTIONS);
        let names: Vec<&str> = methods.iter().map(HttpMethod::as_str).collect();
        Some(names.join(", "))
    }

    /// Add `OPTIONS` responders to `router` for every recorded path
    pub fn apply(&self, mut router: Router) -> Router {
        for (path, methods) in &self.allowed {
            if methods.contains(&HttpMethod::OPTIONS) {
                continue;
            }
            let Some(allow) = self.allow_header(path) else {
                continue;
            };
            router = router.route(
                path,
                options(move || {
                    let allow = allow.clone();
                    async move { (StatusCode::NO_CONTENT, [(header::ALLOW, allow)]) }
                }),
            );
        }
        router
    }
}

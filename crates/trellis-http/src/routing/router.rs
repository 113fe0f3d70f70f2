use crate::errors::{HttpError, HttpResult};
use crate::routing::negotiation::MethodNegotiator;
use crate::routing::{join_paths, HttpMethod};
use axum::Router;
use std::collections::BTreeMap;
use tower_http::trace::TraceLayer;
use trellis_core::CompositionConfig;

/// One controller mounted on the module router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub path: String,
    pub controller: String,
}

/// Shared router accumulating controller mounts across a module tree
///
/// Routes are tracked by their full path so that controllers mounted at
/// different paths can still share a route path, as long as they register
/// different methods on it. `OPTIONS` responders are added once per full
/// path when the handler is built.
#[derive(Debug)]
pub struct ModuleRouter {
    inner: Router,
    mounts: Vec<Mount>,
    /// Owning controller of every (full path, method) pair
    owners: BTreeMap<(String, HttpMethod), String>,
    allowed: MethodNegotiator,
    method_negotiation: bool,
    trace_requests: bool,
}

impl ModuleRouter {
    /// Create a new router
    pub fn new() -> Self {
        Self::with_config(&CompositionConfig::default())
    }

    pub fn with_config(config: &CompositionConfig) -> Self {
        Self {
            inner: Router::new(),
            mounts: Vec::new(),
            owners: BTreeMap::new(),
            allowed: MethodNegotiator::new(),
            method_negotiation: config.method_negotiation,
            trace_requests: config.trace_requests,
        }
    }

    /// Mount `handlers` at `path`, recording the negotiator's allowed methods
    ///
    /// `path` must already be normalized. Mounting at `/` merges the handlers
    /// into the root; any other path nests them. A path that is already
    /// mounted is rejected, and so is any method another controller already
    /// serves on the same full route path.
    pub fn mount(
        &mut self,
        path: &str,
        controller: &str,
        handlers: Router,
        negotiator: &MethodNegotiator,
    ) -> HttpResult<()> {
        if let Some(existing) = self.mounts.iter().find(|mount| mount.path == path) {
            return Err(HttpError::RouteConflict {
                path: path.to_string(),
                controller: controller.to_string(),
                existing: existing.controller.clone(),
            });
        }

        let mut routes = Vec::new();
        for relative in negotiator.paths() {
            let full = join_paths(path, relative);
            for method in negotiator.allowed(relative) {
                if let Some(existing) = self.owners.get(&(full.clone(), method)) {
                    return Err(HttpError::RouteConflict {
                        path: full,
                        controller: controller.to_string(),
                        existing: existing.clone(),
                    });
                }
                routes.push((full.clone(), method));
            }
        }

        let inner = std::mem::take(&mut self.inner);
        self.inner = if path == "/" {
            inner.merge(handlers)
        } else {
            inner.nest(path, handlers)
        };

        tracing::debug!(
            target: "trellis::composer",
            path,
            controller,
            routes = ?routes,
            "Mounted controller routes"
        );

        for (full, method) in routes {
            self.allowed.allow(&full, method);
            self.owners.insert((full, method), controller.to_string());
        }
        self.mounts.push(Mount {
            path: path.to_string(),
            controller: controller.to_string(),
        });
        Ok(())
    }

    /// Mounted paths in mount order
    pub fn mounts(&self) -> &[Mount] {
        &self.mounts
    }

    pub fn is_mounted(&self, path: &str) -> bool {
        self.mounts.iter().any(|mount| mount.path == path)
    }

    /// Methods served on a full route path, across all controllers
    pub fn allowed(&self, path: &str) -> Vec<HttpMethod> {
        self.allowed.allowed(path)
    }

    /// The composed request handler
    pub fn into_handler(self) -> Router {
        let router = if self.method_negotiation {
            self.allowed.apply(self.inner)
        } else {
            self.inner
        };

        if self.trace_requests {
            router.layer(TraceLayer::new_for_http())
        } else {
            router
        }
    }
}

impl Default for ModuleRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    #[test]
    fn test_duplicate_mount_is_rejected() {
        let mut router = ModuleRouter::new();
        let negotiator = MethodNegotiator::new();

        router
            .mount("/a", "First", Router::new().route("/", get(|| async { "a" })), &negotiator)
            .unwrap();
        let error = router
            .mount("/a", "Second", Router::new().route("/", get(|| async { "b" })), &negotiator)
            .unwrap_err();

        assert!(matches!(error, HttpError::RouteConflict { ref existing, .. } if existing == "First"));
        assert_eq!(router.mounts().len(), 1);
        assert!(router.is_mounted("/a"));
    }

    fn allowing(path: &str, methods: &[HttpMethod]) -> MethodNegotiator {
        let mut negotiator = MethodNegotiator::new();
        for method in methods {
            negotiator.allow(path, *method);
        }
        negotiator
    }

    #[test]
    fn test_controllers_share_a_route_path_with_distinct_methods() {
        let mut router = ModuleRouter::new();

        router
            .mount(
                "/users",
                "Users",
                Router::new().route("/admin", get(|| async { "list" })),
                &allowing("/admin", &[HttpMethod::GET]),
            )
            .unwrap();
        router
            .mount(
                "/users/admin",
                "Admin",
                Router::new().route("/", axum::routing::post(|| async { "create" })),
                &allowing("/", &[HttpMethod::POST]),
            )
            .unwrap();

        assert_eq!(router.allowed("/users/admin"), vec![HttpMethod::GET, HttpMethod::POST]);
    }

    #[test]
    fn test_same_method_on_a_shared_route_path_conflicts() {
        let mut router = ModuleRouter::new();

        router
            .mount(
                "/users",
                "Users",
                Router::new().route("/admin", get(|| async { "list" })),
                &allowing("/admin", &[HttpMethod::GET]),
            )
            .unwrap();
        let error = router
            .mount(
                "/users/admin",
                "Admin",
                Router::new().route("/", get(|| async { "other" })),
                &allowing("/", &[HttpMethod::GET]),
            )
            .unwrap_err();

        assert!(matches!(
            error,
            HttpError::RouteConflict { ref path, ref existing, .. }
                if path == "/users/admin" && existing == "Users"
        ));
        assert!(!router.is_mounted("/users/admin"));
    }
}

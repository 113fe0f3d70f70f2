//! Route registration for a single controller instance

use crate::decorators::{middleware_for, params_for, ParamDescriptor};
use crate::errors::{HttpError, HttpResult};
use crate::routing::{normalize_path, HttpMethod, MethodNegotiator};
use axum::body::Body;
use axum::extract::{Path, Request};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method, Uri};
use axum::middleware::{from_fn, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{on, MethodRouter};
use axum::{RequestPartsExt, Router};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use trellis_core::MetadataStore;

/// Request bodies read through [`RouteContext::json`] are capped at 2 MiB
const JSON_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Per-request data handed to controller route handlers
pub struct RouteContext {
    parts: Parts,
    body: Body,
    path_params: HashMap<String, String>,
    custom: BTreeMap<usize, Value>,
}

impl RouteContext {
    /// Split the request and run the method's custom parameter extractors
    pub async fn from_request(request: Request, params: &[ParamDescriptor]) -> Self {
        let (mut parts, body) = request.into_parts();
        let path_params = parts
            .extract::<Path<HashMap<String, String>>>()
            .await
            .map(|Path(params)| params)
            .unwrap_or_default();
        let custom = params
            .iter()
            .map(|param| (param.parameter_index, param.extract(&parts)))
            .collect();

        Self {
            parts,
            body,
            path_params,
            custom,
        }
    }

    pub fn parts(&self) -> &Parts {
        &self.parts
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// A captured path parameter, e.g. `id` for `/:id`
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    /// Query string decoded into key/value pairs
    pub fn query(&self) -> HashMap<String, String> {
        self.parts
            .uri
            .query()
            .and_then(|query| serde_urlencoded::from_str(query).ok())
            .unwrap_or_default()
    }

    /// Value produced by the custom parameter registered at `index`
    pub fn custom(&self, index: usize) -> Option<&Value> {
        self.custom.get(&index)
    }

    /// Consume the body as JSON
    pub async fn json<T: DeserializeOwned>(self) -> HttpResult<T> {
        let bytes = axum::body::to_bytes(self.body, JSON_BODY_LIMIT)
            .await
            .map_err(|error| HttpError::bad_request(format!("Failed to read body: {}", error)))?;
        serde_json::from_slice(&bytes)
            .map_err(|error| HttpError::bad_request(format!("Invalid JSON body: {}", error)))
    }

    pub fn into_body(self) -> Body {
        self.body
    }
}

impl std::fmt::Debug for RouteContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteContext")
            .field("method", &self.parts.method)
            .field("uri", &self.parts.uri)
            .field("path_params", &self.path_params)
            .field("custom", &self.custom)
            .finish()
    }
}

/// Collects the routes of controller `C`
///
/// Route paths are relative to the controller's mount point. Each route is
/// registered under a method name; middleware and custom parameters
/// registered for that method name are applied to it.
pub struct ControllerRoutes<'a, C> {
    controller: Arc<C>,
    controller_name: String,
    metadata: &'a MetadataStore,
    routes: BTreeMap<String, MethodRouter>,
    negotiator: MethodNegotiator,
    duplicates: Vec<(HttpMethod, String)>,
}

impl<'a, C: Send + Sync + 'static> ControllerRoutes<'a, C> {
    pub fn new(controller: Arc<C>, controller_name: impl Into<String>, metadata: &'a MetadataStore) -> Self {
        Self {
            controller,
            controller_name: controller_name.into(),
            metadata,
            routes: BTreeMap::new(),
            negotiator: MethodNegotiator::new(),
            duplicates: Vec::new(),
        }
    }

    /// The controller instance the routes are bound to
    pub fn controller(&self) -> &Arc<C> {
        &self.controller
    }

    /// Register `handler` for `method` requests to `path`
    pub fn route<H, Fut, R>(
        &mut self,
        method: HttpMethod,
        path: &str,
        name: &'static str,
        handler: H,
    ) -> &mut Self
    where
        H: Fn(Arc<C>, RouteContext) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        let path = normalize_path(path);
        if !self.negotiator.allow(&path, method) {
            self.duplicates.push((method, path));
            return self;
        }

        let controller = Arc::clone(&self.controller);
        let params: Arc<[ParamDescriptor]> = params_for::<C>(self.metadata, name).into();
        let endpoint = move |request: Request| {
            let controller = Arc::clone(&controller);
            let params = Arc::clone(&params);
            let handler = handler.clone();
            async move {
                let context = RouteContext::from_request(request, &params).await;
                handler(controller, context).await.into_response()
            }
        };

        let mut method_router: MethodRouter = on(method.filter(), endpoint);
        // Layers wrap what was added before them, so the first registered
        // middleware is applied last to end up outermost.
        for middleware in middleware_for::<C>(self.metadata, name).iter().rev() {
            let middleware = Arc::clone(middleware);
            method_router = method_router.layer(from_fn(move |request: Request, next: Next| {
                let middleware = Arc::clone(&middleware);
                async move { middleware.handle(request, next).await }
            }));
        }

        tracing::trace!(
            target: "trellis::instantiator",
            controller = %self.controller_name,
            %method,
            path = %path,
            handler = name,
            "Registered route"
        );

        let merged = match self.routes.remove(&path) {
            Some(existing) => existing.merge(method_router),
            None => method_router,
        };
        self.routes.insert(path, merged);
        self
    }

    pub fn get<H, Fut, R>(&mut self, path: &str, name: &'static str, handler: H) -> &mut Self
    where
        H: Fn(Arc<C>, RouteContext) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        self.route(HttpMethod::GET, path, name, handler)
    }

    pub fn post<H, Fut, R>(&mut self, path: &str, name: &'static str, handler: H) -> &mut Self
    where
        H: Fn(Arc<C>, RouteContext) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        self.route(HttpMethod::POST, path, name, handler)
    }

    pub fn put<H, Fut, R>(&mut self, path: &str, name: &'static str, handler: H) -> &mut Self
    where
        H: Fn(Arc<C>, RouteContext) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        self.route(HttpMethod::PUT, path, name, handler)
    }

    pub fn patch<H, Fut, R>(&mut self, path: &str, name: &'static str, handler: H) -> &mut Self
    where
        H: Fn(Arc<C>, RouteContext) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        self.route(HttpMethod::PATCH, path, name, handler)
    }

    pub fn delete<H, Fut, R>(&mut self, path: &str, name: &'static str, handler: H) -> &mut Self
    where
        H: Fn(Arc<C>, RouteContext) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        self.route(HttpMethod::DELETE, path, name, handler)
    }

    /// Finish registration: the controller's sub-router and its method negotiator
    pub fn build(self) -> HttpResult<(Router, MethodNegotiator)> {
        if let Some((method, path)) = self.duplicates.into_iter().next() {
            return Err(HttpError::DuplicateRoute {
                controller: self.controller_name,
                method: method.to_string(),
                path,
            });
        }

        let router = self
            .routes
            .into_iter()
            .fold(Router::new(), |router, (path, method_router)| {
                router.route(&path, method_router)
            });
        Ok((router, self.negotiator))
    }
}

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use std::any::TypeId;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use trellis_core::{MetadataKey, MetadataStore};

/// Metadata key holding the ordered middleware list of a controller method
pub const MIDDLEWARE: MetadataKey = MetadataKey::new("trellis:middleware");

/// Type alias for the boxed future returned by middleware
pub type NextFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Middleware attached to a single controller method
///
/// Runs before the route handler with the `handle(request, next)` pattern;
/// call `next.run(request)` to continue the chain.
pub trait RouteMiddleware: Send + Sync + fmt::Debug {
    fn handle(&self, request: Request, next: Next) -> NextFuture;

    /// Optional middleware name for debugging
    fn name(&self) -> &'static str {
        "RouteMiddleware"
    }
}

/// Middleware backed by a closure
pub struct FnMiddleware<F> {
    name: &'static str,
    handler: F,
}

impl<F, Fut> RouteMiddleware for FnMiddleware<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn handle(&self, request: Request, next: Next) -> NextFuture {
        Box::pin((self.handler)(request, next))
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

impl<F> fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMiddleware").field("name", &self.name).finish()
    }
}

/// Wrap a closure as [`RouteMiddleware`]
pub fn middleware_fn<F, Fut>(name: &'static str, handler: F) -> FnMiddleware<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send + 'static,
{
    FnMiddleware { name, handler }
}

/// Append `middleware` to the list of controller `C`'s `method`
///
/// Middleware runs in registration order, first registered outermost.
pub fn use_middleware<C, M>(store: &mut MetadataStore, method: &'static str, middleware: M)
where
    C: 'static,
    M: RouteMiddleware + 'static,
{
    let middleware: Arc<dyn RouteMiddleware> = Arc::new(middleware);
    store.append(MIDDLEWARE, middleware, TypeId::of::<C>(), Some(method));
}

/// Middleware registered for controller `C`'s `method`
pub fn middleware_for<'a, C: 'static>(
    store: &'a MetadataStore,
    method: &'static str,
) -> &'a [Arc<dyn RouteMiddleware>] {
    store.list::<Arc<dyn RouteMiddleware>>(MIDDLEWARE, TypeId::of::<C>(), Some(method))
}

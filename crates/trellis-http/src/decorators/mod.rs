//! Registration helpers for per-method decorations
//!
//! Decorations are written into a [`MetadataStore`](trellis_core::MetadataStore)
//! while modules are declared and read back when a controller's routes are
//! built.

pub mod middleware;
pub mod params;

pub use middleware::{middleware_fn, middleware_for, use_middleware, FnMiddleware, NextFuture, RouteMiddleware, MIDDLEWARE};
pub use params::{custom_param, params_for, CustomParam, ParamDecorator, ParamDescriptor, ParamExtractor, ParamKind, ROUTE_PARAMS};

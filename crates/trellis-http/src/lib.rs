//! # trellis-http
//!
//! Composes a declarative module tree into a single `axum` router.
//!
//! Each [`Module`] declares controllers, the providers its controllers may be
//! injected with, an optional route prefix and nested modules. Composition
//! walks the tree from a root module, resolves every controller's constructor
//! requirements against its module's providers, constructs the controller
//! once, and mounts its routes under the computed path.
//!
//! ```rust,no_run
//! use trellis_core::{CoreError, Injected, MetadataStore};
//! use trellis_http::{compose_routes_for_module, Controller, ControllerRoutes, Module, ModuleDeclaration};
//!
//! struct HealthController;
//!
//! impl Controller for HealthController {
//!     fn base_path() -> &'static str {
//!         "health"
//!     }
//!
//!     fn construct(_injected: Injected) -> Result<Self, CoreError> {
//!         Ok(HealthController)
//!     }
//!
//!     fn routes(routes: &mut ControllerRoutes<'_, Self>) {
//!         routes.get("/", "check", |_controller, _context| async { "ok" });
//!     }
//! }
//!
//! struct AppModule;
//!
//! impl Module for AppModule {
//!     fn declare() -> ModuleDeclaration {
//!         ModuleDeclaration::new()
//!             .route_prefix("api")
//!             .controller::<HealthController>()
//!     }
//! }
//!
//! let app: axum::Router = compose_routes_for_module::<AppModule>(&MetadataStore::new()).unwrap();
//! ```

pub mod controller;
pub mod decorators;
pub mod errors;
pub mod logging;
pub mod module;
pub mod routing;

pub use controller::{
    Controller, ControllerDescriptor, ControllerInstantiator, ControllerRoutes,
    InitializedController, RouteContext,
};
pub use decorators::{
    custom_param, middleware_fn, use_middleware, NextFuture, ParamDescriptor, ParamKind,
    RouteMiddleware,
};
pub use errors::{HttpError, HttpResult};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use module::{
    compose_routes_for_module, compose_routes_with_config, Module, ModuleDeclaration, ModuleRef,
    ModuleWalker, RouterComposer,
};
pub use routing::{join_paths, HttpMethod, MethodNegotiator, ModuleRouter};

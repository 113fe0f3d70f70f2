//! Controller contract and type-erased controller descriptors

pub mod instantiator;
pub mod routes;

pub use instantiator::{ControllerInstantiator, InitializedController};
pub use routes::{ControllerRoutes, RouteContext};

use crate::errors::HttpResult;
use std::any::TypeId;
use std::fmt;
use trellis_core::container::descriptor::short_type_name;
use trellis_core::{CoreError, Dependencies, Injected, MetadataStore};

/// A request-handling unit constructed from injected providers
///
/// Controllers are constructed once per composition pass and shared by all
/// of their route handlers through an `Arc`.
pub trait Controller: Send + Sync + Sized + 'static {
    /// Path segment this controller mounts under, relative to its module prefix
    fn base_path() -> &'static str;

    /// Constructor parameters; none by default
    fn dependencies() -> Dependencies {
        Dependencies::none()
    }

    /// Build the controller from its resolved providers, in parameter order
    fn construct(injected: Injected) -> Result<Self, CoreError>;

    /// Register the controller's routes, relative to its mount point
    fn routes(routes: &mut ControllerRoutes<'_, Self>);

    /// Controller name used in logs and error messages
    fn name() -> String {
        short_type_name(std::any::type_name::<Self>())
    }
}

type Activator = fn(Injected, &str, &MetadataStore) -> HttpResult<InitializedController>;

/// Type-erased controller declaration stored in a module
#[derive(Clone)]
pub struct ControllerDescriptor {
    name: String,
    type_id: TypeId,
    base_path: &'static str,
    dependencies: Dependencies,
    activate: Activator,
}

impl ControllerDescriptor {
    pub fn of<C: Controller>() -> Self {
        Self {
            name: C::name(),
            type_id: TypeId::of::<C>(),
            base_path: C::base_path(),
            dependencies: C::dependencies(),
            activate: instantiator::activate::<C>,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn base_path(&self) -> &'static str {
        self.base_path
    }

    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }

    pub(crate) fn activator(&self) -> Activator {
        self.activate
    }
}

impl fmt::Debug for ControllerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerDescriptor")
            .field("name", &self.name)
            .field("base_path", &self.base_path)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

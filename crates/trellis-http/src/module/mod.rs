//! Declarative module tree and its composition into a router
//!
//! A module bundles controllers, the providers those controllers may be
//! injected with, an optional route prefix and nested modules. The
//! [`ModuleWalker`] descends the tree and hands every module to the
//! [`RouterComposer`], which mounts the module's controllers on one shared
//! [`ModuleRouter`](crate::routing::ModuleRouter).

pub mod composer;
pub mod walker;

pub use composer::RouterComposer;
pub use walker::{compose_routes_for_module, compose_routes_with_config, ModuleWalker};

use crate::controller::{Controller, ControllerDescriptor};
use std::any::TypeId;
use std::fmt;
use trellis_core::container::descriptor::short_type_name;
use trellis_core::ProviderDescriptor;

/// A declarative bundle of controllers, providers and nested modules
pub trait Module: 'static {
    fn declare() -> ModuleDeclaration;

    /// Module name used in logs
    fn name() -> String {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// What a module contributes to composition
#[derive(Debug, Clone, Default)]
pub struct ModuleDeclaration {
    pub controllers: Vec<ControllerDescriptor>,
    /// Candidates for this module's controllers, in resolution order
    pub providers: Vec<ProviderDescriptor>,
    pub route_prefix: Option<String>,
    pub modules: Vec<ModuleRef>,
}

impl ModuleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn controller<C: Controller>(mut self) -> Self {
        self.controllers.push(ControllerDescriptor::of::<C>());
        self
    }

    pub fn provider(mut self, provider: impl Into<ProviderDescriptor>) -> Self {
        self.providers.push(provider.into());
        self
    }

    pub fn route_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.route_prefix = Some(prefix.into());
        self
    }

    pub fn module<M: Module>(mut self) -> Self {
        self.modules.push(ModuleRef::of::<M>());
        self
    }

    /// The module's own prefix segment, empty when none is declared
    pub fn prefix(&self) -> &str {
        self.route_prefix.as_deref().unwrap_or("")
    }
}

/// Reference to a nested module
///
/// The declaration is read through the reference each time it is walked, so
/// every composition pass sees a fresh provider list.
#[derive(Clone, Copy)]
pub struct ModuleRef {
    type_id: TypeId,
    name: fn() -> String,
    declare: fn() -> ModuleDeclaration,
}

impl ModuleRef {
    pub fn of<M: Module>() -> Self {
        Self {
            type_id: TypeId::of::<M>(),
            name: M::name,
            declare: M::declare,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> String {
        (self.name)()
    }

    pub fn declaration(&self) -> ModuleDeclaration {
        (self.declare)()
    }
}

impl PartialEq for ModuleRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ModuleRef {}

impl fmt::Debug for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModuleRef").field(&self.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Clock;

    struct BillingModule;

    impl Module for BillingModule {
        fn declare() -> ModuleDeclaration {
            ModuleDeclaration::new()
                .route_prefix("billing")
                .provider(ProviderDescriptor::of::<Clock>())
        }
    }

    struct AppModule;

    impl Module for AppModule {
        fn declare() -> ModuleDeclaration {
            ModuleDeclaration::new().module::<BillingModule>()
        }
    }

    #[test]
    fn test_declaration_builder() {
        let declaration = AppModule::declare();
        assert_eq!(declaration.prefix(), "");
        assert_eq!(declaration.modules, vec![ModuleRef::of::<BillingModule>()]);

        let nested = declaration.modules[0].declaration();
        assert_eq!(nested.prefix(), "billing");
        assert_eq!(nested.providers.len(), 1);
        assert_eq!(declaration.modules[0].name(), "BillingModule");
    }
}

use crate::errors::HttpResult;
use crate::module::{Module, ModuleRef, RouterComposer};
use crate::routing::{join_paths, ModuleRouter};
use trellis_core::{AppConfigTrait, CompositionConfig, CoreError, MetadataStore, PrefixStrategy};

/// Descends a module tree, composing every module onto one router
///
/// Each module is composed under its own prefix joined onto the prefix it
/// was reached with. What nested modules are reached with depends on the
/// [`PrefixStrategy`]: the full path composed so far (`Accumulated`) or only
/// the current module's own prefix (`SingleLevel`). Module cycles are not
/// detected.
#[derive(Debug)]
pub struct ModuleWalker<'a> {
    config: &'a CompositionConfig,
    composer: RouterComposer<'a>,
}

impl<'a> ModuleWalker<'a> {
    pub fn new(config: &'a CompositionConfig, metadata: &'a MetadataStore) -> Self {
        Self {
            config,
            composer: RouterComposer::new(metadata),
        }
    }

    /// Compose `module` and its nested modules onto `router`
    pub fn walk(&self, module: &ModuleRef, router: &mut ModuleRouter, prefix: &str) -> HttpResult<()> {
        let declaration = module.declaration();
        let module_prefix = join_paths(prefix, declaration.prefix());

        let mounted = self.composer.compose(&declaration, router, &module_prefix)?;
        tracing::debug!(
            target: "trellis::walker",
            module = %module.name(),
            prefix = %module_prefix,
            controllers = mounted,
            nested = declaration.modules.len(),
            "Composed module"
        );

        let nested_prefix = match self.config.prefix_strategy {
            PrefixStrategy::Accumulated => module_prefix.as_str(),
            PrefixStrategy::SingleLevel => declaration.prefix(),
        };

        for nested in &declaration.modules {
            self.walk(nested, router, nested_prefix)?;
        }

        Ok(())
    }

    /// Walk the tree rooted at `root` onto a fresh router
    pub fn compose(&self, root: &ModuleRef) -> HttpResult<ModuleRouter> {
        let mut router = ModuleRouter::with_config(self.config);
        self.walk(root, &mut router, "")?;

        tracing::info!(
            target: "trellis::walker",
            module = %root.name(),
            strategy = %self.config.prefix_strategy,
            mounts = router.mounts().len(),
            "Composed routes for module tree"
        );

        Ok(router)
    }
}

/// Compose the module tree rooted at `M` into a request handler
///
/// Configuration is read from the environment.
pub fn compose_routes_for_module<M: Module>(metadata: &MetadataStore) -> HttpResult<axum::Router> {
    let config = CompositionConfig::from_env().map_err(CoreError::from)?;
    compose_routes_with_config::<M>(&config, metadata)
}

/// Compose the module tree rooted at `M` with explicit configuration
pub fn compose_routes_with_config<M: Module>(
    config: &CompositionConfig,
    metadata: &MetadataStore,
) -> HttpResult<axum::Router> {
    let router = ModuleWalker::new(config, metadata).compose(&ModuleRef::of::<M>())?;
    Ok(router.into_handler())
}

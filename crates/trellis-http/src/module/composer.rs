use crate::controller::ControllerInstantiator;
use crate::errors::HttpResult;
use crate::module::ModuleDeclaration;
use crate::routing::ModuleRouter;
use trellis_core::{MetadataStore, ProviderResolver};

/// Mounts one module's controllers on the shared router
#[derive(Debug, Clone, Copy)]
pub struct RouterComposer<'a> {
    instantiator: ControllerInstantiator<'a>,
}

impl<'a> RouterComposer<'a> {
    pub fn new(metadata: &'a MetadataStore) -> Self {
        Self {
            instantiator: ControllerInstantiator::new(metadata),
        }
    }

    /// Instantiate every controller of `declaration` under `prefix` and mount it
    ///
    /// Controllers resolve only against the module's own providers. The first
    /// failure aborts the pass; controllers mounted before it stay on `router`
    /// but the caller discards it.
    pub fn compose(
        &self,
        declaration: &ModuleDeclaration,
        router: &mut ModuleRouter,
        prefix: &str,
    ) -> HttpResult<usize> {
        let resolver = ProviderResolver::new(&declaration.providers);

        for descriptor in &declaration.controllers {
            let controller = self.instantiator.instantiate(descriptor, &resolver, prefix)?;
            router.mount(
                &controller.path,
                &controller.name,
                controller.route,
                &controller.negotiator,
            )?;

            tracing::info!(
                target: "trellis::composer",
                controller = %controller.name,
                path = %controller.path,
                routes = controller.negotiator.paths().count(),
                "Mounted controller"
            );
        }

        Ok(declaration.controllers.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Controller, ControllerRoutes};
    use trellis_core::{CoreError, Injected};

    struct PingController;

    impl Controller for PingController {
        fn base_path() -> &'static str {
            "ping"
        }

        fn construct(_injected: Injected) -> Result<Self, CoreError> {
            Ok(PingController)
        }

        fn routes(routes: &mut ControllerRoutes<'_, Self>) {
            routes.get("/", "ping", |_controller, _context| async { "pong" });
        }
    }

    struct PongController;

    impl Controller for PongController {
        fn base_path() -> &'static str {
            "pong"
        }

        fn construct(_injected: Injected) -> Result<Self, CoreError> {
            Ok(PongController)
        }

        fn routes(routes: &mut ControllerRoutes<'_, Self>) {
            routes.get("/", "pong", |_controller, _context| async { "ping" });
        }
    }

    #[test]
    fn test_compose_mounts_controllers_in_order() {
        let metadata = MetadataStore::new();
        let declaration = ModuleDeclaration::new()
            .controller::<PingController>()
            .controller::<PongController>();
        let mut router = ModuleRouter::new();

        let mounted = RouterComposer::new(&metadata)
            .compose(&declaration, &mut router, "/games")
            .unwrap();

        assert_eq!(mounted, 2);
        let paths: Vec<&str> = router.mounts().iter().map(|mount| mount.path.as_str()).collect();
        assert_eq!(paths, vec!["/games/ping", "/games/pong"]);
    }

    #[test]
    fn test_same_controller_twice_conflicts() {
        let metadata = MetadataStore::new();
        let declaration = ModuleDeclaration::new()
            .controller::<PingController>()
            .controller::<PingController>();
        let mut router = ModuleRouter::new();

        let error = RouterComposer::new(&metadata)
            .compose(&declaration, &mut router, "")
            .unwrap_err();

        assert!(matches!(error, crate::errors::HttpError::RouteConflict { ref path, .. } if path == "/ping"));
    }
}

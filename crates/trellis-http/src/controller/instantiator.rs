use crate::controller::{Controller, ControllerDescriptor, ControllerRoutes};
use crate::errors::HttpResult;
use crate::routing::{join_paths, MethodNegotiator};
use axum::Router;
use std::sync::Arc;
use trellis_core::{Injected, MetadataStore, ProviderId, ProviderResolver};

/// A constructed controller, ready to be mounted
#[derive(Debug)]
pub struct InitializedController {
    pub name: String,
    /// Full mount path: parent prefix followed by the controller's own segment
    pub path: String,
    /// The controller's sub-router
    pub route: Router,
    pub negotiator: MethodNegotiator,
    /// Providers injected into the constructor, in parameter order
    pub providers: Vec<ProviderId>,
}

/// Construct `C` from `injected` and initialize it under `prefix`
pub(crate) fn activate<C: Controller>(
    injected: Injected,
    prefix: &str,
    metadata: &MetadataStore,
) -> HttpResult<InitializedController> {
    let name = C::name();
    let providers = injected.provider_ids();
    let controller = Arc::new(C::construct(injected)?);

    let path = join_paths(prefix, C::base_path());
    let mut routes = ControllerRoutes::new(controller, name.clone(), metadata);
    C::routes(&mut routes);
    let (route, negotiator) = routes.build()?;

    Ok(InitializedController {
        name,
        path,
        route,
        negotiator,
        providers,
    })
}

/// Builds controllers from a module's provider list
#[derive(Debug, Clone, Copy)]
pub struct ControllerInstantiator<'a> {
    metadata: &'a MetadataStore,
}

impl<'a> ControllerInstantiator<'a> {
    pub fn new(metadata: &'a MetadataStore) -> Self {
        Self { metadata }
    }

    /// Resolve the controller's requirements, construct it once and
    /// initialize it under `prefix`
    pub fn instantiate(
        &self,
        descriptor: &ControllerDescriptor,
        resolver: &ProviderResolver<'_>,
        prefix: &str,
    ) -> HttpResult<InitializedController> {
        let name = descriptor.name();
        let dependencies = descriptor.dependencies();
        let requirements = dependencies.plan(name)?;
        let resolved = resolver.instantiate_all(&requirements, name)?;
        let injected = Injected::new(name, resolved);

        let controller = (descriptor.activator())(injected, prefix, self.metadata)?;

        tracing::debug!(
            target: "trellis::instantiator",
            controller = name,
            strategy = ?dependencies.strategy(),
            path = %controller.path,
            providers = ?controller.providers.iter().map(ProviderId::short_name).collect::<Vec<_>>(),
            "Instantiated controller"
        );

        Ok(controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::{CoreError, Dependencies, InjectableToken, ProviderDescriptor};

    #[derive(Default)]
    struct Ledger;

    struct AccountsController {
        _ledger: Arc<Ledger>,
    }

    impl Controller for AccountsController {
        fn base_path() -> &'static str {
            "accounts"
        }

        fn dependencies() -> Dependencies {
            Dependencies::with_arity(1).inject(0, "ledger")
        }

        fn construct(injected: Injected) -> Result<Self, CoreError> {
            Ok(Self {
                _ledger: injected.get::<Ledger>(0)?,
            })
        }

        fn routes(routes: &mut ControllerRoutes<'_, Self>) {
            routes
                .get("/", "index", |_controller, _context| async { "accounts" })
                .post("/", "create", |_controller, _context| async { "created" });
        }
    }

    #[test]
    fn test_instantiate_computes_path_and_records_providers() {
        let metadata = MetadataStore::new();
        let providers = vec![ProviderDescriptor::of::<Ledger>()
            .provides(InjectableToken::named("ledger"))
            .build()];
        let resolver = ProviderResolver::new(&providers);

        let controller = ControllerInstantiator::new(&metadata)
            .instantiate(
                &ControllerDescriptor::of::<AccountsController>(),
                &resolver,
                "/finance",
            )
            .unwrap();

        assert_eq!(controller.name, "AccountsController");
        assert_eq!(controller.path, "/finance/accounts");
        assert_eq!(controller.providers, vec![ProviderId::of::<Ledger>()]);
        assert_eq!(controller.negotiator.allow_header("/").unwrap(), "GET, POST, HEAD, OPTIONS");
    }

    #[test]
    fn test_missing_provider_aborts_instantiation() {
        let metadata = MetadataStore::new();
        let providers: Vec<ProviderDescriptor> = Vec::new();

        let error = ControllerInstantiator::new(&metadata)
            .instantiate(
                &ControllerDescriptor::of::<AccountsController>(),
                &ProviderResolver::new(&providers),
                "",
            )
            .unwrap_err();

        assert!(error.as_core().unwrap().is_provider_not_found());
    }
}

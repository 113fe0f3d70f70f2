use crate::container::descriptor::ProviderId;
use crate::container::provider::{ProviderDescriptor, ResolvedProvider};
use crate::container::requirement::Requirement;
use crate::container::tokens::InjectableToken;
use crate::errors::CoreError;

/// Resolve a single requirement against `candidates`
///
/// Returns the first candidate, in declared order, that is the required
/// type, declares it among its implemented types, is referenced by the
/// token, or lists the token among its capabilities. Further matches are
/// not inspected.
pub fn resolve<'a>(
    required: Option<&ProviderId>,
    token: Option<&InjectableToken>,
    candidates: &'a [ProviderDescriptor],
    controller: &str,
) -> Result<&'a ProviderDescriptor, CoreError> {
    let requirement = Requirement {
        required: required.copied(),
        token: token.cloned(),
    };
    ProviderResolver::new(candidates).resolve(&requirement, controller)
}

/// Matches requirements against one module's provider list
#[derive(Debug, Clone, Copy)]
pub struct ProviderResolver<'a> {
    candidates: &'a [ProviderDescriptor],
}

impl<'a> ProviderResolver<'a> {
    pub fn new(candidates: &'a [ProviderDescriptor]) -> Self {
        Self { candidates }
    }

    /// First candidate satisfying `requirement`
    pub fn resolve(
        &self,
        requirement: &Requirement,
        controller: &str,
    ) -> Result<&'a ProviderDescriptor, CoreError> {
        let provider = self
            .candidates
            .iter()
            .find(|candidate| candidate.satisfies(requirement))
            .ok_or_else(|| CoreError::provider_not_found(requirement.describe(), controller))?;

        tracing::debug!(
            target: "trellis::resolver",
            controller,
            requirement = %requirement.describe(),
            provider = %provider.id(),
            "Resolved requirement"
        );

        Ok(provider)
    }

    /// Resolve every requirement, preserving order
    pub fn resolve_all(
        &self,
        requirements: &[Requirement],
        controller: &str,
    ) -> Result<Vec<&'a ProviderDescriptor>, CoreError> {
        requirements
            .iter()
            .map(|requirement| self.resolve(requirement, controller))
            .collect()
    }

    /// Resolve every requirement and construct the selected providers
    pub fn instantiate_all(
        &self,
        requirements: &[Requirement],
        controller: &str,
    ) -> Result<Vec<ResolvedProvider>, CoreError> {
        self.resolve_all(requirements, controller)?
            .into_iter()
            .map(ProviderDescriptor::instantiate)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    trait Store: Send + Sync {}

    #[derive(Default)]
    struct MemoryStore;
    impl Store for MemoryStore {}

    #[derive(Default)]
    struct Clock;

    fn store_provider() -> ProviderDescriptor {
        ProviderDescriptor::of::<MemoryStore>()
            .implements::<dyn Store>(|store| store as Arc<dyn Store>)
            .build()
    }

    #[test]
    fn test_resolve_by_identity() {
        let providers = vec![ProviderDescriptor::of::<Clock>().build(), store_provider()];
        let found = resolve(Some(&ProviderId::of::<Clock>()), None, &providers, "Home").unwrap();
        assert_eq!(found.id(), ProviderId::of::<Clock>());
    }

    #[test]
    fn test_resolve_by_ancestry() {
        let providers = vec![ProviderDescriptor::of::<Clock>().build(), store_provider()];
        let found = resolve(Some(&ProviderId::of::<dyn Store>()), None, &providers, "Home").unwrap();
        assert_eq!(found.id(), ProviderId::of::<MemoryStore>());
    }

    #[test]
    fn test_missing_provider_names_token() {
        let providers = vec![ProviderDescriptor::of::<Clock>().build()];
        let error = resolve(None, Some(&InjectableToken::named("ledger")), &providers, "Home")
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "No provider satisfies 'ledger' required by controller 'Home'"
        );
    }

    #[test]
    fn test_empty_requirement_never_matches() {
        let providers = vec![ProviderDescriptor::of::<Clock>().build()];
        assert!(resolve(None, None, &providers, "Home")
            .unwrap_err()
            .is_provider_not_found());
    }

    #[test]
    fn test_instantiate_all_keeps_order() {
        let providers = vec![store_provider(), ProviderDescriptor::of::<Clock>().build()];
        let requirements = vec![
            Requirement::of_type(ProviderId::of::<Clock>()),
            Requirement::of_type(ProviderId::of::<dyn Store>()),
        ];
        let resolved = ProviderResolver::new(&providers)
            .instantiate_all(&requirements, "Home")
            .unwrap();

        let ids: Vec<_> = resolved.iter().map(ResolvedProvider::id).collect();
        assert_eq!(ids, vec![ProviderId::of::<Clock>(), ProviderId::of::<MemoryStore>()]);
    }
}

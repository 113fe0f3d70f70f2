use crate::container::descriptor::ProviderId;
use crate::container::provider::ResolvedProvider;
use crate::errors::CoreError;
use std::sync::Arc;

/// Ordered resolved providers handed to a controller constructor
///
/// Position `i` holds the provider resolved for constructor parameter `i`.
#[derive(Debug)]
pub struct Injected {
    controller: String,
    providers: Vec<ResolvedProvider>,
}

impl Injected {
    pub fn new(controller: impl Into<String>, providers: Vec<ResolvedProvider>) -> Self {
        Self {
            controller: controller.into(),
            providers,
        }
    }

    /// Name of the controller these providers were resolved for
    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider ids in parameter order
    pub fn provider_ids(&self) -> Vec<ProviderId> {
        self.providers.iter().map(ResolvedProvider::id).collect()
    }

    /// The provider injected at `index`, viewed as `Arc<I>`
    pub fn get<I>(&self, index: usize) -> Result<Arc<I>, CoreError>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let provider = self
            .providers
            .get(index)
            .ok_or_else(|| CoreError::InjectionOutOfBounds {
                controller: self.controller.clone(),
                index,
                arity: self.providers.len(),
            })?;

        provider.view::<I>().ok_or_else(|| CoreError::InjectionMismatch {
            controller: self.controller.clone(),
            index,
            expected: ProviderId::of::<I>().short_name(),
            provider: provider.id().short_name(),
        })
    }
}

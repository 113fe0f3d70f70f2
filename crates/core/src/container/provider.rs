//! Provider descriptors
//!
//! A provider is registered with its own type identity, the explicit set of
//! requirement types it can stand in for (its "implements" tags) and the
//! capability tokens it answers to. Each registration also carries typed
//! views so a resolved instance can be handed out as `Arc<dyn Trait>`.

use crate::container::descriptor::ProviderId;
use crate::container::requirement::Requirement;
use crate::container::tokens::InjectableToken;
use crate::errors::CoreError;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A constructed provider instance, type-erased
pub struct ProvidedInstance(Box<dyn Any + Send + Sync>);

/// Factory producing fresh provider instances
pub type ProviderFactory = Arc<dyn Fn() -> Result<ProvidedInstance, CoreError> + Send + Sync>;

/// Converts a provided instance into a boxed `Arc<I>` for some view type `I`
type ViewCaster =
    Arc<dyn Fn(&ProvidedInstance) -> Option<Box<dyn Any + Send + Sync>> + Send + Sync>;

/// Registration data for one provider type
#[derive(Clone)]
pub struct ProviderDescriptor {
    id: ProviderId,
    implements: Vec<ProviderId>,
    capabilities: Vec<InjectableToken>,
    factory: ProviderFactory,
    views: HashMap<TypeId, ViewCaster>,
}

impl ProviderDescriptor {
    /// Register a provider built through `Default`
    pub fn of<T>() -> ProviderBuilder<T>
    where
        T: Default + Send + Sync + 'static,
    {
        ProviderBuilder::new(|| Ok(T::default()))
    }

    /// Register a provider built by a fallible factory
    pub fn from_factory<T, F>(factory: F) -> ProviderBuilder<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T, CoreError> + Send + Sync + 'static,
    {
        ProviderBuilder::new(factory)
    }

    pub fn id(&self) -> ProviderId {
        self.id
    }

    /// Requirement types this provider declared it can stand in for
    pub fn implements(&self) -> &[ProviderId] {
        &self.implements
    }

    pub fn capabilities(&self) -> &[InjectableToken] {
        &self.capabilities
    }

    /// Identity or ancestry match against a required type
    pub fn satisfies_type(&self, required: &ProviderId) -> bool {
        self.id == *required || self.implements.contains(required)
    }

    /// Explicit token match: the token references this provider's type, or
    /// the provider declared the token as a capability
    pub fn satisfies_token(&self, token: &InjectableToken) -> bool {
        token.references(&self.id) || self.capabilities.contains(token)
    }

    /// The composite match predicate used by the resolver
    pub fn satisfies(&self, requirement: &Requirement) -> bool {
        requirement
            .required
            .as_ref()
            .is_some_and(|required| self.satisfies_type(required))
            || requirement
                .token
                .as_ref()
                .is_some_and(|token| self.satisfies_token(token))
    }

    /// Build a fresh instance of this provider
    pub fn instantiate(&self) -> Result<ResolvedProvider, CoreError> {
        let instance = (self.factory)()?;
        Ok(ResolvedProvider {
            descriptor: self.clone(),
            instance,
        })
    }
}

impl fmt::Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("id", &self.id)
            .field("implements", &self.implements)
            .field("capabilities", &self.capabilities)
            .field("views", &self.views.len())
            .finish()
    }
}

/// Builder for provider descriptors
pub struct ProviderBuilder<T> {
    implements: Vec<ProviderId>,
    capabilities: Vec<InjectableToken>,
    factory: ProviderFactory,
    views: HashMap<TypeId, ViewCaster>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> ProviderBuilder<T> {
    fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<T, CoreError> + Send + Sync + 'static,
    {
        let factory: ProviderFactory = Arc::new(move || {
            factory().map(|value| ProvidedInstance(Box::new(Arc::new(value))))
        });

        let mut builder = Self {
            implements: Vec::new(),
            capabilities: Vec::new(),
            factory,
            views: HashMap::new(),
            _phantom: PhantomData,
        };
        builder.add_view::<T>(|value| value);
        builder
    }

    fn add_view<I>(&mut self, cast: fn(Arc<T>) -> Arc<I>)
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let caster: ViewCaster = Arc::new(move |instance: &ProvidedInstance| {
            instance
                .0
                .downcast_ref::<Arc<T>>()
                .map(|value| Box::new(cast(Arc::clone(value))) as Box<dyn Any + Send + Sync>)
        });
        self.views.insert(TypeId::of::<I>(), caster);
    }

    /// Declare that this provider stands in for requirements of type `I`
    /// and can be injected as `Arc<I>`
    pub fn implements<I>(mut self, cast: fn(Arc<T>) -> Arc<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let id = ProviderId::of::<I>();
        if !self.implements.contains(&id) {
            self.implements.push(id);
        }
        self.add_view(cast);
        self
    }

    /// Declare a capability token
    pub fn provides(mut self, token: impl Into<InjectableToken>) -> Self {
        let token = token.into();
        if !self.capabilities.contains(&token) {
            self.capabilities.push(token);
        }
        self
    }

    /// Declare a capability token together with the view it is consumed through
    pub fn provides_as<I>(self, token: impl Into<InjectableToken>, cast: fn(Arc<T>) -> Arc<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let mut builder = self.provides(token);
        builder.add_view(cast);
        builder
    }

    pub fn build(self) -> ProviderDescriptor {
        ProviderDescriptor {
            id: ProviderId::of::<T>(),
            implements: self.implements,
            capabilities: self.capabilities,
            factory: self.factory,
            views: self.views,
        }
    }
}

impl<T: Send + Sync + 'static> From<ProviderBuilder<T>> for ProviderDescriptor {
    fn from(builder: ProviderBuilder<T>) -> Self {
        builder.build()
    }
}

/// A provider selected for a requirement, with its constructed instance
pub struct ResolvedProvider {
    descriptor: ProviderDescriptor,
    instance: ProvidedInstance,
}

impl ResolvedProvider {
    pub fn id(&self) -> ProviderId {
        self.descriptor.id
    }

    pub fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    /// View the instance as `Arc<I>`, if the provider registered that view
    pub fn view<I>(&self) -> Option<Arc<I>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let caster = self.descriptor.views.get(&TypeId::of::<I>())?;
        caster(&self.instance)?
            .downcast::<Arc<I>>()
            .ok()
            .map(|boxed| *boxed)
    }
}

impl fmt::Debug for ResolvedProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedProvider")
            .field("id", &self.descriptor.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    #[derive(Default)]
    struct EnglishGreeter;

    impl Greeter for EnglishGreeter {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[test]
    fn test_identity_view_is_always_registered() {
        let provider = ProviderDescriptor::of::<EnglishGreeter>().build();
        let resolved = provider.instantiate().unwrap();

        assert_eq!(resolved.id(), ProviderId::of::<EnglishGreeter>());
        assert!(resolved.view::<EnglishGreeter>().is_some());
        assert!(resolved.view::<dyn Greeter>().is_none());
    }

    #[test]
    fn test_implements_registers_tag_and_view() {
        let provider = ProviderDescriptor::of::<EnglishGreeter>()
            .implements::<dyn Greeter>(|greeter| greeter as Arc<dyn Greeter>)
            .build();

        assert!(provider.satisfies_type(&ProviderId::of::<dyn Greeter>()));
        assert!(provider.satisfies_type(&ProviderId::of::<EnglishGreeter>()));
        assert!(!provider.satisfies_type(&ProviderId::of::<String>()));

        let greeter = provider.instantiate().unwrap().view::<dyn Greeter>().unwrap();
        assert_eq!(greeter.greet(), "hello");
    }

    #[test]
    fn test_capability_tokens() {
        let token = InjectableToken::named("greeting");
        let provider = ProviderDescriptor::of::<EnglishGreeter>()
            .provides(token.clone())
            .build();

        assert!(provider.satisfies_token(&token));
        assert!(provider.satisfies_token(&InjectableToken::of::<EnglishGreeter>()));
        assert!(!provider.satisfies_token(&InjectableToken::named("farewell")));
    }

    #[test]
    fn test_factory_runs_once_per_instantiation() {
        static BUILT: AtomicUsize = AtomicUsize::new(0);

        struct Counted;
        let provider = ProviderDescriptor::from_factory(|| {
            BUILT.fetch_add(1, Ordering::SeqCst);
            Ok(Counted)
        })
        .build();

        provider.instantiate().unwrap();
        provider.instantiate().unwrap();
        assert_eq!(BUILT.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_factory_errors_propagate() {
        struct Broken;
        let provider = ProviderDescriptor::from_factory::<Broken, _>(|| {
            Err(CoreError::provider_construction("Broken", "no database"))
        })
        .build();

        let error = provider.instantiate().unwrap_err();
        assert!(matches!(error, CoreError::ProviderConstruction { .. }));
    }
}

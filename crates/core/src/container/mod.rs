pub mod descriptor;
pub mod injected;
pub mod provider;
pub mod requirement;
pub mod resolver;
pub mod tokens;

pub use descriptor::ProviderId;
pub use injected::Injected;
pub use provider::{ProvidedInstance, ProviderBuilder, ProviderDescriptor, ProviderFactory, ResolvedProvider};
pub use requirement::{Dependencies, PlanStrategy, Requirement};
pub use resolver::{resolve, ProviderResolver};
pub use tokens::{InjectableToken, ServiceToken};

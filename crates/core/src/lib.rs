//! Provider resolution and injection primitives for trellis.
//!
//! Controllers declare their constructor parameters statically
//! ([`Dependencies`]); modules list the providers available to them
//! ([`ProviderDescriptor`]). The [`ProviderResolver`] matches each
//! requirement to the first provider that satisfies it, and the selected
//! providers are handed to the controller constructor as [`Injected`].

pub mod config;
pub mod container;
pub mod errors;
pub mod metadata;

pub use config::{AppConfigTrait, CompositionConfig, ConfigError, ConfigSource, PrefixStrategy};
pub use container::{
    Dependencies, InjectableToken, Injected, ProviderDescriptor, ProviderId, ProviderResolver,
    Requirement, ResolvedProvider, ServiceToken,
};
pub use errors::{CoreError, CoreResult};
pub use metadata::{MetadataKey, MetadataStore};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Injectable tokens for explicit provider lookup
//!
//! A requirement can name the provider it wants instead of (or as well as)
//! its type. Tokens come in three shapes:
//!
//! - [`InjectableToken::Tag`]: a unique opaque tag, minted once and shared
//! - [`InjectableToken::Name`]: a plain string name
//! - [`InjectableToken::Type`]: a reference to a type, usually a zero-sized
//!   [`ServiceToken`] or the provider type itself
//!
//! A provider is selected by a token when the token references the provider's
//! own type, or when the provider declared the token among its capabilities.
//!
//! ```rust
//! use trellis_core::container::{InjectableToken, ServiceToken};
//!
//! struct MailerToken;
//! impl ServiceToken for MailerToken {}
//!
//! let audit = InjectableToken::tag("audit-sink");
//! assert_ne!(audit, InjectableToken::tag("audit-sink"));
//! assert_eq!(MailerToken::token(), InjectableToken::of::<MailerToken>());
//! ```

use crate::container::descriptor::ProviderId;
use std::fmt;
use uuid::Uuid;

/// Identifier used for explicit provider lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InjectableToken {
    /// Unique opaque tag; two tags with the same description are different tokens
    Tag { id: Uuid, description: &'static str },
    /// Plain name
    Name(String),
    /// Type reference
    Type(ProviderId),
}

impl InjectableToken {
    /// Mint a new unique tag
    pub fn tag(description: &'static str) -> Self {
        Self::Tag {
            id: Uuid::new_v4(),
            description,
        }
    }

    /// Create a name token
    pub fn named(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Create a type reference token
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Type(ProviderId::of::<T>())
    }

    /// Check whether this token is a type reference to `provider`
    pub fn references(&self, provider: &ProviderId) -> bool {
        matches!(self, Self::Type(id) if id == provider)
    }
}

impl fmt::Display for InjectableToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag { description, .. } => write!(f, "Tag({})", description),
            Self::Name(name) => f.write_str(name),
            Self::Type(id) => write!(f, "{}", id),
        }
    }
}

impl From<&str> for InjectableToken {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for InjectableToken {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// Zero-sized marker types that act as type-reference tokens
///
/// Service tokens should follow the naming convention of ending with `Token`
/// (e.g. `MailerToken`), which keeps them apart from provider types in
/// declarations and error messages.
pub trait ServiceToken: 'static {
    /// The token value for this marker type
    fn token() -> InjectableToken {
        InjectableToken::of::<Self>()
    }

    /// Token type name, for debugging
    fn token_type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CacheToken;
    impl ServiceToken for CacheToken {}

    struct RedisCache;

    #[test]
    fn test_tags_are_unique() {
        let first = InjectableToken::tag("cache");
        let second = InjectableToken::tag("cache");
        assert_ne!(first, second);
        assert_eq!(first, first.clone());
        assert_eq!(first.to_string(), "Tag(cache)");
    }

    #[test]
    fn test_names_compare_by_value() {
        assert_eq!(InjectableToken::named("cache"), InjectableToken::from("cache"));
        assert_eq!(InjectableToken::named("cache").to_string(), "cache");
    }

    #[test]
    fn test_type_tokens_reference_their_type() {
        let token = CacheToken::token();
        assert!(token.references(&ProviderId::of::<CacheToken>()));
        assert!(!token.references(&ProviderId::of::<RedisCache>()));
        assert_eq!(token.to_string(), "CacheToken");
        assert!(CacheToken::token_type_name().ends_with("CacheToken"));
    }
}

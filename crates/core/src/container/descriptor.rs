use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a provider or requirement type
///
/// Equality and hashing only consider the `TypeId`; the type name is kept
/// for error messages and logs.
#[derive(Debug, Clone, Copy)]
pub struct ProviderId {
    type_id: TypeId,
    type_name: &'static str,
}

impl ProviderId {
    /// Create a provider ID for a type (trait objects included)
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified type name
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type name without its module path, e.g. `dyn Mailer` or `SmtpMailer`
    pub fn short_name(&self) -> String {
        short_type_name(self.type_name)
    }

    /// Check whether this ID identifies `T`
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl PartialEq for ProviderId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ProviderId {}

impl Hash for ProviderId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

/// Strip module paths from a type name produced by `std::any::type_name`.
///
/// Generic arguments are left untouched past the first `<`.
pub fn short_type_name(type_name: &str) -> String {
    let (marker, rest) = match type_name.strip_prefix("dyn ") {
        Some(rest) => ("dyn ", rest),
        None => ("", type_name),
    };
    let head_end = rest.find('<').unwrap_or(rest.len());
    let start = rest[..head_end].rfind("::").map(|index| index + 2).unwrap_or(0);
    format!("{}{}", marker, &rest[start..])
}

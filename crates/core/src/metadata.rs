//! Typed side table for decoration data
//!
//! Values are keyed by a decoration key, a target type and optionally a
//! member name (a controller method). The store is filled while modules are
//! being declared and only read during composition.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Key naming one kind of decoration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MetadataKey(&'static str);

impl MetadataKey {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

type EntryKey = (MetadataKey, TypeId, Option<&'static str>);

#[derive(Default)]
pub struct MetadataStore {
    entries: HashMap<EntryKey, Box<dyn Any + Send + Sync>>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the value stored under `(key, target, member)`
    ///
    /// Absent entries and entries stored with a different value type both
    /// read as `None`.
    pub fn get<V: 'static>(
        &self,
        key: MetadataKey,
        target: TypeId,
        member: Option<&'static str>,
    ) -> Option<&V> {
        self.entries
            .get(&(key, target, member))
            .and_then(|value| value.downcast_ref::<V>())
    }

    /// Store `value`, replacing any previous entry
    pub fn set<V: Send + Sync + 'static>(
        &mut self,
        key: MetadataKey,
        value: V,
        target: TypeId,
        member: Option<&'static str>,
    ) {
        self.entries.insert((key, target, member), Box::new(value));
    }

    /// Append to an ordered list entry, creating it on first use
    ///
    /// An existing entry of another type is replaced by a fresh list.
    pub fn append<V: Send + Sync + 'static>(
        &mut self,
        key: MetadataKey,
        value: V,
        target: TypeId,
        member: Option<&'static str>,
    ) {
        let entry = self
            .entries
            .entry((key, target, member))
            .or_insert_with(|| Box::new(Vec::<V>::new()));

        if !entry.is::<Vec<V>>() {
            *entry = Box::new(Vec::<V>::new());
        }

        if let Some(list) = entry.downcast_mut::<Vec<V>>() {
            list.push(value);
        }
    }

    /// Read an ordered list entry, empty when absent
    pub fn list<V: 'static>(
        &self,
        key: MetadataKey,
        target: TypeId,
        member: Option<&'static str>,
    ) -> &[V] {
        self.get::<Vec<V>>(key, target, member)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for MetadataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataStore")
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUARDS: MetadataKey = MetadataKey::new("guards");
    const LABEL: MetadataKey = MetadataKey::new("label");

    struct Target;

    #[test]
    fn test_get_and_set() {
        let mut store = MetadataStore::new();
        let target = TypeId::of::<Target>();

        assert!(store.get::<String>(LABEL, target, None).is_none());
        store.set(LABEL, "admin".to_string(), target, None);

        assert_eq!(store.get::<String>(LABEL, target, None).unwrap(), "admin");
        assert!(store.get::<String>(LABEL, target, Some("index")).is_none());
        assert!(store.get::<u32>(LABEL, target, None).is_none());
    }

    #[test]
    fn test_append_keeps_order_per_member() {
        let mut store = MetadataStore::new();
        let target = TypeId::of::<Target>();

        store.append(GUARDS, "auth", target, Some("index"));
        store.append(GUARDS, "audit", target, Some("index"));
        store.append(GUARDS, "auth", target, Some("show"));

        assert_eq!(store.list::<&str>(GUARDS, target, Some("index")), &["auth", "audit"]);
        assert_eq!(store.list::<&str>(GUARDS, target, Some("show")), &["auth"]);
        assert!(store.list::<&str>(GUARDS, target, None).is_empty());
        assert_eq!(store.len(), 2);
    }
}

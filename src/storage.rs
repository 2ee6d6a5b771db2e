//! Key/value persistence used for the anchor history and session flags.

use std::collections::HashMap;

/// String key/value store supplied by the host.
///
/// Writes are fire-and-forget: a host that cannot persist should log and
/// carry on, since losing history only costs re-placing some markers.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn delete(&mut self, key: &str);
}

/// In-process store, used in tests and by hosts without persistence.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn delete(&mut self, key: &str) {
        self.values.remove(key);
    }
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for &mut K {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &str) {
        (**self).delete(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_delete() {
        let mut store = MemoryStore::new();
        assert!(store.get("k").is_none());

        store.set("k", "v".to_string());
        assert_eq!(store.get("k").as_deref(), Some("v"));
        assert!(store.contains("k"));

        store.set("k", "w".to_string());
        assert_eq!(store.get("k").as_deref(), Some("w"));
        assert_eq!(store.len(), 1);

        store.delete("k");
        assert!(store.is_empty());
    }

    #[test]
    fn works_through_a_mutable_reference() {
        fn write(mut store: impl KeyValueStore) {
            store.set("flag", "true".to_string());
        }

        let mut store = MemoryStore::new();
        write(&mut store);
        assert_eq!(store.get("flag").as_deref(), Some("true"));
    }
}

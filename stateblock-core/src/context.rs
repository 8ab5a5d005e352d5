//! The dependency bag handed to effects factories
//!
//! Effects need impure collaborators: clocks, API clients, dispatch
//! handles. [`Context`] carries them as named, type-erased entries; an
//! effects factory pulls out what it needs by key and type. The context is
//! passed exactly once, when the effects middleware is constructed, and is
//! never stored by the core: per-action data travels in action payloads.
//!
//! No schema validation happens here. A missing or wrongly-typed entry
//! surfaces at the point of first use, as a lookup failure.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A named bag of type-erased dependencies.
#[derive(Clone, Default)]
pub struct Context {
    entries: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, returning the context for chaining.
    pub fn with<T: Send + Sync + 'static>(mut self, key: impl Into<String>, value: T) -> Self {
        self.entries.insert(key.into(), Arc::new(value));
        self
    }

    /// Add an already-shared entry without re-wrapping it.
    pub fn with_shared<T: Send + Sync + 'static>(
        mut self,
        key: impl Into<String>,
        value: Arc<T>,
    ) -> Self {
        self.entries.insert(key.into(), value);
        self
    }

    /// Look up an entry by key and type.
    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Option<Arc<T>> {
        self.entries
            .get(key)
            .and_then(|entry| entry.clone().downcast::<T>().ok())
    }

    /// Look up an entry, panicking if it is missing or has the wrong type.
    ///
    /// This is the "shape mismatch surfaces at first use" policy: effects
    /// declare their dependencies by using them.
    pub fn expect<T: Send + Sync + 'static>(&self, key: &str) -> Arc<T> {
        match self.get(key) {
            Some(value) => value,
            None => panic!("context entry {key:?} is missing or has an unexpected type"),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Entries are type-erased, so only the keys are showable.
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("Context").field("keys", &keys).finish()
    }
}

//! Field accessor registry.
//!
//! A [`FieldRegistry`] maps every queryable field name of a record type to a
//! pure extraction function. It is built once per type from
//! [`Seekable::describe`] and reused across calls.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::traits::Seekable;
use crate::value::Value;

/// A pure function extracting one field's value from a record.
pub type Accessor<T> = Arc<dyn for<'a> Fn(&'a T) -> Value<'a> + Send + Sync>;

fn accessor<T, F>(f: F) -> Accessor<T>
where
    F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Builder handed to [`Seekable::describe`].
///
/// Collects field names, aliases and accessors in registration order.
pub struct FieldSet<T> {
    entries: Vec<(String, Accessor<T>)>,
    depth: usize,
    max_depth: usize,
}

impl<T: 'static> FieldSet<T> {
    fn new(depth: usize, max_depth: usize) -> Self {
        FieldSet {
            entries: Vec::new(),
            depth,
            max_depth,
        }
    }

    /// Registers a field under its canonical name.
    pub fn field<F>(&mut self, name: &str, get: F) -> &mut Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        self.entries.push((name.to_string(), accessor(get)));
        self
    }

    /// Registers a field under its canonical name and a serialization alias.
    pub fn field_with_alias<F>(&mut self, name: &str, alias: &str, get: F) -> &mut Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        let get = accessor(get);
        self.entries.push((name.to_string(), get.clone()));
        if alias != name {
            self.entries.push((alias.to_string(), get));
        }
        self
    }

    /// Expands a struct-typed member into dotted `name.child` keys.
    ///
    /// `get` returns `None` when the member is absent, in which case every
    /// nested accessor yields [`Value::None`]. Members below the configured
    /// maximum depth are not expanded.
    pub fn nested<U: Seekable>(
        &mut self,
        name: &str,
        alias: Option<&str>,
        get: for<'a> fn(&'a T) -> Option<&'a U>,
    ) -> &mut Self {
        if self.depth >= self.max_depth {
            return self;
        }

        let mut inner = FieldSet::<U>::new(self.depth + 1, self.max_depth);
        U::describe(&mut inner);

        let prefixes = std::iter::once(name).chain(alias.filter(|a| *a != name));
        for prefix in prefixes {
            for (key, child) in &inner.entries {
                let child = child.clone();
                self.entries.push((
                    format!("{prefix}.{key}"),
                    accessor(move |record: &T| match get(record) {
                        Some(member) => child(member),
                        None => Value::None,
                    }),
                ));
            }
        }
        self
    }

    /// Nesting depth of the type being described (0 for the root).
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Name → accessor map for one record type.
///
/// Lookup is exact first, then case-insensitive: every key whose lowercase
/// form differs also answers to that lowercase form, unless another field
/// already owns it.
///
/// # Example
///
/// ```
/// use sift::{FieldRegistry, Seekable, Value};
///
/// #[derive(Seekable)]
/// struct Person {
///     #[serde(rename = "fullName")]
///     name: String,
/// }
///
/// let registry = FieldRegistry::<Person>::build(1);
/// let person = Person { name: "Ann".into() };
///
/// for key in ["name", "fullName", "fullname"] {
///     let get = registry.resolve(key).unwrap();
///     assert_eq!(get(&person), Value::Text("Ann"));
/// }
/// assert!(registry.resolve("ghost_field").is_none());
/// ```
pub struct FieldRegistry<T> {
    keys: Vec<String>,
    accessors: Vec<Accessor<T>>,
    index: HashMap<String, usize>,
    max_depth: usize,
}

type SharedRegistries = RwLock<HashMap<(TypeId, usize), Arc<dyn Any + Send + Sync>>>;

static SHARED: Lazy<SharedRegistries> = Lazy::new(|| RwLock::new(HashMap::new()));

impl<T: Seekable> FieldRegistry<T> {
    /// Builds a registry, expanding nested members up to `max_depth` levels.
    pub fn build(max_depth: usize) -> Self {
        let mut fields = FieldSet::new(0, max_depth);
        T::describe(&mut fields);
        FieldRegistry::from_entries(fields.entries, max_depth)
    }

    /// Returns the process-wide registry for `T` at this depth, building it
    /// on first use.
    pub fn shared(max_depth: usize) -> Arc<Self>
    where
        T: Send + Sync,
    {
        let key = (TypeId::of::<T>(), max_depth);

        let cached = SHARED
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if let Some(registry) = cached.and_then(|any| any.downcast::<Self>().ok()) {
            return registry;
        }

        let built: Arc<dyn Any + Send + Sync> = Arc::new(Self::build(max_depth));
        let stored = SHARED
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(built)
            .clone();

        match stored.downcast::<Self>() {
            Ok(registry) => registry,
            // The key embeds T's TypeId, so the stored value is always a FieldRegistry<T>.
            Err(_) => Arc::new(Self::build(max_depth)),
        }
    }
}

impl<T> FieldRegistry<T> {
    fn from_entries(entries: Vec<(String, Accessor<T>)>, max_depth: usize) -> Self {
        let mut keys = Vec::with_capacity(entries.len());
        let mut accessors = Vec::with_capacity(entries.len());
        let mut index = HashMap::with_capacity(entries.len() * 2);

        for (key, get) in entries {
            if index.contains_key(&key) {
                continue;
            }
            index.insert(key.clone(), accessors.len());
            keys.push(key);
            accessors.push(get);
        }

        // Exact keys are all in place before any lowercase alias is claimed.
        for (slot, key) in keys.iter().enumerate() {
            let lower = key.to_lowercase();
            if lower != *key {
                index.entry(lower).or_insert(slot);
            }
        }

        FieldRegistry {
            keys,
            accessors,
            index,
            max_depth,
        }
    }

    /// Resolves a field name to its accessor.
    pub fn resolve(&self, name: &str) -> Option<&Accessor<T>> {
        let slot = match self.index.get(name) {
            Some(slot) => Some(*slot),
            None => self.index.get(&name.to_lowercase()).copied(),
        };
        slot.map(|slot| &self.accessors[slot])
    }

    /// Returns `true` if `name` resolves to an accessor.
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Registered names (canonical names and declared aliases), in
    /// registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no field is registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The nesting depth this registry was built with.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl<T> fmt::Debug for FieldRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("keys", &self.keys)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

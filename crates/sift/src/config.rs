//! Engine configuration.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Default nesting depth for dotted field keys.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Default collection size above which the store path is chosen.
pub const DEFAULT_STORE_THRESHOLD: usize = 10_000;

/// What to do with a predicate or sort key naming a field the record type
/// does not have.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
    /// Drop it and log at debug level.
    #[default]
    Skip,
    /// Fail the query with [`SiftError::UnknownField`](crate::SiftError::UnknownField).
    Reject,
}

/// Tunables for an [`Engine`](crate::Engine).
///
/// Every field has a default, so a partial JSON object deserializes:
///
/// ```
/// use sift::{EngineConfig, UnknownFieldPolicy};
///
/// let config: EngineConfig = serde_json::from_str(r#"{"unknownFields": "reject"}"#).unwrap();
/// assert_eq!(config.max_depth, 3);
/// assert_eq!(config.unknown_fields, UnknownFieldPolicy::Reject);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// How many levels of nested members are expanded into dotted keys.
    pub max_depth: usize,
    /// Worker count for filtering. `None` uses the available parallelism.
    pub parallelism: Option<NonZeroUsize>,
    /// Handling of unresolvable field names.
    pub unknown_fields: UnknownFieldPolicy,
    /// Collections larger than this are routed to the store path.
    pub store_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            parallelism: None,
            unknown_fields: UnknownFieldPolicy::Skip,
            store_threshold: DEFAULT_STORE_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Sets the nesting depth for dotted keys.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Pins the worker count. Zero restores the automatic choice.
    pub fn parallelism(mut self, workers: usize) -> Self {
        self.parallelism = NonZeroUsize::new(workers);
        self
    }

    /// Sets the unknown-field policy.
    pub fn unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// Sets the store-path threshold.
    pub fn store_threshold(mut self, threshold: usize) -> Self {
        self.store_threshold = threshold;
        self
    }

    /// The worker count filtering will use.
    pub fn workers(&self) -> usize {
        self.parallelism
            .or_else(|| std::thread::available_parallelism().ok())
            .map_or(1, NonZeroUsize::get)
    }
}

//! Ordering types for result sorting.
//!
//! Provides [`Dir`] for sort direction, [`SortKey`] for field-based ordering
//! and the multi-key comparator used by the engine.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::UnknownFieldPolicy;
use crate::error::{Result, SiftError};
use crate::registry::{Accessor, FieldRegistry};
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    #[serde(alias = "ASC", alias = "ascending")]
    Asc,
    /// Descending order (largest first).
    #[serde(alias = "DESC", alias = "descending")]
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single sort key: a field name and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    pub dir: Dir,
}

impl SortKey {
    /// Creates a new ascending key for the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        SortKey::new(field, Dir::Asc)
    }

    /// Creates a new descending key for the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        SortKey::new(field, Dir::Desc)
    }

    /// Creates a new key with the given direction.
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        SortKey {
            field: field.into(),
            dir,
        }
    }
}

/// Compares two field values.
///
/// Coercions are attempted in a fixed order (number, text, boolean, date,
/// time). The first one that succeeds for both sides decides; if none does,
/// the values are equal. Text compares case-insensitively. A missing value
/// sorts after every present value.
///
/// ```
/// use std::cmp::Ordering;
/// use sift::{compare_values, Number, Value};
///
/// // Numeric text compares as a number, not lexically.
/// assert_eq!(compare_values(&Value::Text("9"), &Value::Number(Number::U64(10))), Ordering::Less);
/// assert_eq!(compare_values(&Value::Text("b"), &Value::Text("A")), Ordering::Greater);
/// assert_eq!(compare_values(&Value::Bool(true), &Value::None), Ordering::Less);
/// ```
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a.is_none(), b.is_none()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }
    if let (Some(x), Some(y)) = (a.coerce_number(), b.coerce_number()) {
        return x.total_cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.coerce_text(), b.coerce_text()) {
        return x.to_lowercase().cmp(&y.to_lowercase());
    }
    if let (Some(x), Some(y)) = (a.coerce_bool(), b.coerce_bool()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.coerce_datetime(), b.coerce_datetime()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.coerce_time(), b.coerce_time()) {
        return x.cmp(&y);
    }
    Ordering::Equal
}

/// Compares two records by a list of sort keys.
///
/// Uses the first key as the primary sort key, the second to break ties, etc.
/// Keys naming unknown fields are ignored. Missing values go last under
/// either direction. If all keys compare equal, returns `Equal`.
pub fn compare_records<T>(a: &T, b: &T, keys: &[SortKey], registry: &FieldRegistry<T>) -> Ordering {
    let resolved: Vec<_> = keys
        .iter()
        .filter_map(|key| registry.resolve(&key.field).map(|get| (get, key.dir)))
        .collect();
    compare_resolved(a, b, &resolved)
}

fn compare_resolved<T>(a: &T, b: &T, keys: &[(&Accessor<T>, Dir)]) -> Ordering {
    for (get, dir) in keys {
        let (x, y) = (get(a), get(b));
        let ordering = match (x.is_none(), y.is_none()) {
            (false, false) => dir.apply(compare_values(&x, &y)),
            _ => compare_values(&x, &y),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Sorts matched records in place.
///
/// The sort is stable: records that compare equal on every key keep their
/// relative order.
pub fn sort_records<T>(
    records: &mut [&T],
    keys: &[SortKey],
    registry: &FieldRegistry<T>,
    policy: UnknownFieldPolicy,
) -> Result<()> {
    let mut resolved = Vec::with_capacity(keys.len());
    for key in keys {
        match registry.resolve(&key.field) {
            Some(get) => resolved.push((get, key.dir)),
            None if policy == UnknownFieldPolicy::Reject => {
                return Err(SiftError::UnknownField {
                    field: key.field.clone(),
                });
            }
            None => debug!(field = %key.field, "skipping sort key on unknown field"),
        }
    }

    if !resolved.is_empty() {
        records.sort_by(|a, b| compare_resolved(*a, *b, &resolved));
    }
    Ok(())
}

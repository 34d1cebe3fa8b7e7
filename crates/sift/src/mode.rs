//! Comparison modes and declared data types.
//!
//! The [`Mode`] enum defines every supported comparison, and [`DataType`]
//! decides which of them are valid for a predicate. Not all modes are valid
//! for all types.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Comparison mode for a predicate.
///
/// Modes are grouped by the data types they support:
/// - **Universal**: `Eq`, `Ne`
/// - **Ordered** (number, date, time): `Gt`, `Gte`, `Lt`, `Lte`, `Range`
/// - **Date/time aliases**: `Before` (alias for `Lt`), `After` (alias for `Gt`)
/// - **Text**: `Contains`, `NotContains`, `StartsWith`, `EndsWith`,
///   `IsEmpty`, `IsNotEmpty`, `Matches`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    // Universal modes
    /// Equal.
    #[serde(alias = "equals", alias = "equal")]
    Eq,
    /// Not equal.
    #[serde(alias = "notEquals", alias = "notEqual", alias = "not_equals")]
    Ne,

    // Ordered modes
    /// Greater than.
    #[serde(alias = "greaterThan", alias = "greater_than")]
    Gt,
    /// Greater than or equal.
    #[serde(alias = "greaterThanOrEqual", alias = "greater_than_or_equal")]
    Gte,
    /// Less than.
    #[serde(alias = "lessThan", alias = "less_than")]
    Lt,
    /// Less than or equal.
    #[serde(alias = "lessThanOrEqual", alias = "less_than_or_equal")]
    Lte,
    /// Between two bounds, inclusive on both ends.
    #[serde(alias = "between")]
    Range,

    // Date/time aliases
    /// Earlier than (alias for `Lt`).
    Before,
    /// Later than (alias for `Gt`).
    After,

    // Text modes
    /// Text contains substring.
    Contains,
    /// Text does not contain substring.
    #[serde(alias = "not_contains")]
    NotContains,
    /// Text starts with prefix.
    #[serde(alias = "starts_with")]
    StartsWith,
    /// Text ends with suffix.
    #[serde(alias = "ends_with")]
    EndsWith,
    /// Text is missing or blank.
    #[serde(alias = "is_empty")]
    IsEmpty,
    /// Text is present and not blank.
    #[serde(alias = "is_not_empty")]
    IsNotEmpty,
    /// Text matches a regular expression.
    #[serde(alias = "regex")]
    Matches,
}

impl Mode {
    /// Returns `true` if this mode is valid for numeric comparisons.
    pub fn is_number_mode(self) -> bool {
        matches!(
            self,
            Mode::Eq | Mode::Ne | Mode::Gt | Mode::Gte | Mode::Lt | Mode::Lte | Mode::Range
        )
    }

    /// Returns `true` if this mode is valid for text comparisons.
    pub fn is_text_mode(self) -> bool {
        matches!(
            self,
            Mode::Eq
                | Mode::Ne
                | Mode::Contains
                | Mode::NotContains
                | Mode::StartsWith
                | Mode::EndsWith
                | Mode::IsEmpty
                | Mode::IsNotEmpty
                | Mode::Matches
        )
    }

    /// Returns `true` if this mode is valid for boolean comparisons.
    pub fn is_bool_mode(self) -> bool {
        matches!(self, Mode::Eq | Mode::Ne)
    }

    /// Returns `true` if this mode is valid for date and time-of-day comparisons.
    pub fn is_temporal_mode(self) -> bool {
        self.is_number_mode() || matches!(self, Mode::Before | Mode::After)
    }

    /// Returns `true` if the mode takes a `{from, to}` pair rather than a single literal.
    pub fn is_range(self) -> bool {
        matches!(self, Mode::Range)
    }

    /// Returns `true` if the mode takes no literal at all.
    pub fn is_emptiness(self) -> bool {
        matches!(self, Mode::IsEmpty | Mode::IsNotEmpty)
    }

    /// Normalizes date aliases to their canonical form.
    ///
    /// - `Before` -> `Lt`
    /// - `After` -> `Gt`
    /// - Others unchanged
    pub fn normalize(self) -> Mode {
        match self {
            Mode::Before => Mode::Lt,
            Mode::After => Mode::Gt,
            other => other,
        }
    }

    /// Evaluates a comparison given an ordering result.
    ///
    /// Used for number, date and time comparisons where the record value
    /// has already been compared against the literal.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self.normalize() {
            Mode::Eq => ordering == Ordering::Equal,
            Mode::Ne => ordering != Ordering::Equal,
            Mode::Gt => ordering == Ordering::Greater,
            Mode::Gte => ordering != Ordering::Less,
            Mode::Lt => ordering == Ordering::Less,
            Mode::Lte => ordering != Ordering::Greater,
            _ => false, // Not an ordering-based mode
        }
    }

    /// Returns the wire name of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Eq => "eq",
            Mode::Ne => "ne",
            Mode::Gt => "gt",
            Mode::Gte => "gte",
            Mode::Lt => "lt",
            Mode::Lte => "lte",
            Mode::Range => "range",
            Mode::Before => "before",
            Mode::After => "after",
            Mode::Contains => "contains",
            Mode::NotContains => "notContains",
            Mode::StartsWith => "startsWith",
            Mode::EndsWith => "endsWith",
            Mode::IsEmpty => "isEmpty",
            Mode::IsNotEmpty => "isNotEmpty",
            Mode::Matches => "matches",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The data type a predicate declares for its field.
///
/// The declared type, not the record's runtime value, selects the
/// comparison rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Any signed, unsigned or floating-point number.
    #[serde(alias = "numeric", alias = "int", alias = "float")]
    Number,
    /// Text, compared case-insensitively.
    #[serde(alias = "string")]
    Text,
    /// Boolean.
    #[serde(alias = "boolean")]
    Bool,
    /// Calendar date, optionally with a time of day.
    #[serde(alias = "datetime")]
    Date,
    /// Time of day only.
    Time,
}

impl DataType {
    /// All data types, in dispatch-table order.
    pub const ALL: [DataType; 5] = [
        DataType::Number,
        DataType::Text,
        DataType::Bool,
        DataType::Date,
        DataType::Time,
    ];

    /// Returns `true` if `mode` may be used with this data type.
    pub fn supports(self, mode: Mode) -> bool {
        match self {
            DataType::Number => mode.is_number_mode(),
            DataType::Text => mode.is_text_mode(),
            DataType::Bool => mode.is_bool_mode(),
            DataType::Date | DataType::Time => mode.is_temporal_mode(),
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            DataType::Number => 0,
            DataType::Text => 1,
            DataType::Bool => 2,
            DataType::Date => 3,
            DataType::Time => 4,
        }
    }

    /// Returns the wire name of this data type.
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Number => "number",
            DataType::Text => "text",
            DataType::Bool => "bool",
            DataType::Date => "date",
            DataType::Time => "time",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

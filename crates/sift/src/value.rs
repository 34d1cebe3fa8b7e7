//! Runtime value types for field comparison.
//!
//! The [`Value`] enum represents the value of a field extracted from a record.
//! It covers text, numbers, booleans, dates and times of day.

use std::cmp::Ordering;

use chrono::{NaiveDateTime, NaiveTime};

use crate::parse::{parse_datetime, parse_time};
use crate::predicate::parse_bool;

/// Runtime value for comparison, borrowed from the source record.
///
/// Accessors in a [`FieldRegistry`](crate::FieldRegistry) return this type.
///
/// # Example
///
/// ```
/// use sift::{Value, Number};
///
/// struct Person {
///     name: String,
///     age: u8,
/// }
///
/// fn value_of<'a>(person: &'a Person, field: &str) -> Value<'a> {
///     match field {
///         "name" => Value::Text(&person.name),
///         "age" => Value::Number(Number::U64(person.age as u64)),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Text value (borrowed).
    Text(&'a str),
    /// Numeric value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Calendar date with time of day, zone-free.
    DateTime(NaiveDateTime),
    /// Time of day.
    Time(NaiveTime),
    /// Field absent, null, or reached through an absent parent.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Extracts the text value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the date-time value, if present.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Extracts the time-of-day value, if present.
    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Value::Time(t) => Some(*t),
            _ => None,
        }
    }

    /// Coerces to a canonical number. Numeric text is parsed.
    pub fn coerce_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.to_f64()),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Coerces to text. Only text values qualify.
    pub fn coerce_text(&self) -> Option<&'a str> {
        self.as_str()
    }

    /// Coerces to a boolean. The text forms `true` and `false` are accepted.
    pub fn coerce_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Text(s) => parse_bool(s),
            _ => None,
        }
    }

    /// Coerces to a date-time. Text is parsed with the known layouts.
    pub fn coerce_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            Value::Text(s) => parse_datetime(s),
            _ => None,
        }
    }

    /// Coerces to a time of day. Date-times keep only their time.
    pub fn coerce_time(&self) -> Option<NaiveTime> {
        match self {
            Value::Time(t) => Some(*t),
            Value::DateTime(dt) => Some(dt.time()),
            Value::Text(s) => parse_time(s),
            _ => None,
        }
    }

    /// Short name of the runtime variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::DateTime(_) => "datetime",
            Value::Time(_) => "time",
            Value::None => "null",
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// Numbers keep the width they were extracted with:
/// - `I64` for signed integers
/// - `U64` for unsigned integers
/// - `F64` for floating point
///
/// All comparisons coerce to a canonical `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to its canonical `f64` form.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers through their canonical `f64` form.
    ///
    /// Returns `None` when either side is NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        self.to_f64().partial_cmp(&other.to_f64())
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

macro_rules! number_from {
    ($variant:ident, $wide:ty: $($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number::$variant(n as $wide)
                }
            }
        )*
    };
}

number_from!(I64, i64: i8, i16, i32, i64, isize);
number_from!(U64, u64: u8, u16, u32, u64, usize);
number_from!(F64, f64: f32, f64);

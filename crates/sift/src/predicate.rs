//! Predicate types.
//!
//! A [`Predicate`] is a single filter condition: a field name, a comparison
//! mode, a declared data type and an already-decoded [`Operand`]. Literals are
//! validated when the predicate is built, so evaluation never re-checks the
//! literal's type.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Regex, RegexBuilder};
use serde_json::Value as Json;

use crate::error::{Result, SiftError};
use crate::evaluate;
use crate::mode::{DataType, Mode};
use crate::parse::{has_time_component, parse_datetime, parse_time};
use crate::value::{Number, Value};

/// A date literal together with whether it carries a time of day.
///
/// Literals without a time component stand for the whole calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateLiteral {
    at: NaiveDateTime,
    has_time: bool,
}

impl DateLiteral {
    /// Wraps a parsed date-time, detecting whether it has a time component.
    pub fn new(at: NaiveDateTime) -> Self {
        DateLiteral {
            at,
            has_time: has_time_component(&at),
        }
    }

    /// The parsed instant (midnight for day literals).
    pub fn at(&self) -> NaiveDateTime {
        self.at
    }

    /// Returns `true` if the literal is an exact instant rather than a day.
    pub fn has_time(&self) -> bool {
        self.has_time
    }

    /// Orders a record value relative to this literal.
    ///
    /// Exact literals compare instants. Day literals compare calendar days,
    /// which places every instant in `[00:00, 23:59:59.999999999]` of that day
    /// as `Equal`, everything earlier as `Less` and everything later as
    /// `Greater`.
    pub fn locate(&self, value: &NaiveDateTime) -> Ordering {
        if self.has_time {
            value.cmp(&self.at)
        } else {
            value.date().cmp(&self.at.date())
        }
    }
}

/// A decoded, typed literal.
#[derive(Debug, Clone)]
pub enum Literal {
    /// Canonical numeric literal.
    Number(f64),
    /// Text; trimmed and lowercased once the predicate is built.
    Text(String),
    /// Boolean literal.
    Bool(bool),
    /// Date literal.
    Date(DateLiteral),
    /// Time-of-day literal.
    Time(NaiveTime),
    /// Compiled case-insensitive pattern.
    Pattern(Regex),
}

impl Literal {
    /// The data type this literal belongs to.
    pub fn data_type(&self) -> DataType {
        match self {
            Literal::Number(_) => DataType::Number,
            Literal::Text(_) | Literal::Pattern(_) => DataType::Text,
            Literal::Bool(_) => DataType::Bool,
            Literal::Date(_) => DataType::Date,
            Literal::Time(_) => DataType::Time,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Literal::Pattern(_) => "pattern",
            other => other.data_type().as_str(),
        }
    }

    /// Decodes a wire literal into the declared data type.
    pub fn decode(field: &str, data_type: DataType, raw: &Json) -> Result<Literal> {
        let mismatch = || SiftError::mismatch(field, data_type, json_kind(raw));
        match data_type {
            DataType::Number => match raw {
                Json::Number(n) => n.as_f64().map(Literal::Number).ok_or_else(mismatch),
                Json::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(Literal::Number)
                    .map_err(|_| mismatch()),
                _ => Err(mismatch()),
            },
            DataType::Text => match raw {
                Json::String(s) => Ok(Literal::text(s)),
                _ => Err(mismatch()),
            },
            DataType::Bool => match raw {
                Json::Bool(b) => Ok(Literal::Bool(*b)),
                Json::String(s) => parse_bool(s).map(Literal::Bool).ok_or_else(mismatch),
                _ => Err(mismatch()),
            },
            DataType::Date => match raw {
                Json::String(s) => parse_datetime(s)
                    .map(|dt| Literal::Date(DateLiteral::new(dt)))
                    .ok_or_else(mismatch),
                _ => Err(mismatch()),
            },
            DataType::Time => match raw {
                Json::String(s) => parse_time(s).map(Literal::Time).ok_or_else(mismatch),
                _ => Err(mismatch()),
            },
        }
    }

    fn text(s: &str) -> Literal {
        Literal::Text(s.to_string())
    }
}

pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn json_kind(raw: &Json) -> &'static str {
    match raw {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "unparseable text",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

// Conversions from common types to Literal

macro_rules! literal_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Literal {
                fn from(n: $ty) -> Self {
                    Literal::Number(Number::from(n).to_f64())
                }
            }
        )*
    };
}

literal_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<Number> for Literal {
    fn from(n: Number) -> Self {
        Literal::Number(n.to_f64())
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::text(s)
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::text(&s)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<NaiveDateTime> for Literal {
    fn from(dt: NaiveDateTime) -> Self {
        Literal::Date(DateLiteral::new(dt))
    }
}

impl From<NaiveDate> for Literal {
    fn from(date: NaiveDate) -> Self {
        Literal::Date(DateLiteral {
            at: date.and_time(NaiveTime::MIN),
            has_time: false,
        })
    }
}

impl From<NaiveTime> for Literal {
    fn from(t: NaiveTime) -> Self {
        Literal::Time(t)
    }
}

impl From<Regex> for Literal {
    fn from(r: Regex) -> Self {
        Literal::Pattern(r)
    }
}

/// What a predicate compares against.
#[derive(Debug, Clone)]
pub enum Operand {
    /// No literal; used by `IsEmpty` and `IsNotEmpty`.
    Absent,
    /// A single literal.
    Single(Literal),
    /// Inclusive lower and upper bounds.
    Range { lower: Literal, upper: Literal },
}

impl Operand {
    /// Builds a range operand.
    pub fn range(lower: impl Into<Literal>, upper: impl Into<Literal>) -> Self {
        Operand::Range {
            lower: lower.into(),
            upper: upper.into(),
        }
    }

    fn data_type(&self) -> Option<DataType> {
        match self {
            Operand::Absent => None,
            Operand::Single(lit) => Some(lit.data_type()),
            Operand::Range { lower, .. } => Some(lower.data_type()),
        }
    }
}

macro_rules! operand_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Operand {
                fn from(lit: $ty) -> Self {
                    Operand::Single(Literal::from(lit))
                }
            }
        )*
    };
}

operand_from!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, Number, &str, String, bool,
    NaiveDateTime, NaiveDate, NaiveTime, Regex
);

impl From<Literal> for Operand {
    fn from(lit: Literal) -> Self {
        Operand::Single(lit)
    }
}

/// A single filter predicate.
///
/// # Example
///
/// ```
/// use sift::{Predicate, Mode, DataType, Operand, Value, Number};
///
/// let adult = Predicate::new("age", Mode::Gte, 18).unwrap();
/// assert!(adult.matches(&Value::Number(Number::U64(30))).unwrap());
///
/// let thirties = Predicate::new("age", Mode::Range, Operand::range(30, 39)).unwrap();
/// assert!(thirties.matches(&Value::Number(Number::U64(39))).unwrap());
///
/// let decoded = Predicate::decode(
///     "name",
///     Mode::Contains,
///     DataType::Text,
///     &serde_json::json!("JOHN"),
/// ).unwrap();
/// assert!(decoded.matches(&Value::Text("Johnny")).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Predicate {
    field: String,
    mode: Mode,
    data_type: DataType,
    operand: Operand,
}

impl Predicate {
    /// Builds a predicate from a typed operand.
    ///
    /// The data type is taken from the operand's literal; emptiness modes
    /// with an absent operand are text predicates.
    pub fn new(field: impl Into<String>, mode: Mode, operand: impl Into<Operand>) -> Result<Self> {
        let operand = operand.into();
        let data_type = operand.data_type().unwrap_or(DataType::Text);
        Predicate::typed(field, mode, data_type, operand)
    }

    /// Builds a predicate with an explicit data type.
    pub fn typed(
        field: impl Into<String>,
        mode: Mode,
        data_type: DataType,
        operand: Operand,
    ) -> Result<Self> {
        let field = field.into();
        if !data_type.supports(mode) {
            return Err(SiftError::UnsupportedMode {
                field,
                mode,
                data_type,
            });
        }

        let operand = if mode.is_emptiness() {
            Operand::Absent
        } else {
            check_operand(&field, mode, data_type, operand)?
        };

        Ok(Predicate {
            field,
            mode,
            data_type,
            operand,
        })
    }

    /// Decodes a predicate from its wire representation.
    ///
    /// Range modes accept `{"from": .., "to": ..}` or a two-element array.
    pub fn decode(
        field: impl Into<String>,
        mode: Mode,
        data_type: DataType,
        raw: &Json,
    ) -> Result<Self> {
        let field = field.into();
        if !data_type.supports(mode) {
            return Err(SiftError::UnsupportedMode {
                field,
                mode,
                data_type,
            });
        }

        let operand = if mode.is_emptiness() {
            Operand::Absent
        } else if mode.is_range() {
            let (lower, upper) = range_bounds(&field, raw)?;
            Operand::Range {
                lower: Literal::decode(&field, data_type, lower)?,
                upper: Literal::decode(&field, data_type, upper)?,
            }
        } else {
            Operand::Single(Literal::decode(&field, data_type, raw)?)
        };

        Predicate::typed(field, mode, data_type, operand)
    }

    /// The field this predicate reads.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The comparison mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The declared data type.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// The decoded operand.
    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// Evaluates this predicate against a field value.
    ///
    /// Fails with [`SiftError::TypeMismatch`] when the record value cannot be
    /// coerced to the declared data type.
    pub fn matches(&self, value: &Value<'_>) -> Result<bool> {
        evaluate::evaluate(self, value)
    }
}

fn check_operand(field: &str, mode: Mode, data_type: DataType, operand: Operand) -> Result<Operand> {
    match (mode.is_range(), operand) {
        (true, Operand::Range { lower, upper }) => {
            let lower = check_literal(field, mode, data_type, lower)?;
            let upper = check_literal(field, mode, data_type, upper)?;
            if let (Literal::Date(lo), Literal::Date(hi)) = (&lower, &upper) {
                if lo.at() > hi.at() {
                    return Err(SiftError::malformed_range(
                        field,
                        format!("lower bound {} is after upper bound {}", lo.at(), hi.at()),
                    ));
                }
            }
            Ok(Operand::Range { lower, upper })
        }
        (true, _) => Err(SiftError::malformed_range(
            field,
            "range needs both a lower and an upper bound",
        )),
        (false, Operand::Single(lit)) => {
            Ok(Operand::Single(check_literal(field, mode, data_type, lit)?))
        }
        (false, Operand::Range { .. }) => Err(SiftError::mismatch(field, data_type, "range")),
        (false, Operand::Absent) => Err(SiftError::mismatch(field, data_type, "null")),
    }
}

fn check_literal(field: &str, mode: Mode, data_type: DataType, lit: Literal) -> Result<Literal> {
    if lit.data_type() != data_type {
        return Err(SiftError::mismatch(field, data_type, lit.kind()));
    }
    match (mode, lit) {
        (Mode::Matches, Literal::Text(pattern)) => RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map(Literal::Pattern)
            .map_err(|source| SiftError::InvalidPattern {
                field: field.to_string(),
                source,
            }),
        (Mode::Matches, lit @ Literal::Pattern(_)) => Ok(lit),
        (_, Literal::Pattern(_)) => Err(SiftError::mismatch(field, data_type, "pattern")),
        (_, Literal::Text(s)) => Ok(Literal::Text(s.trim().to_lowercase())),
        (_, lit) => Ok(lit),
    }
}

fn range_bounds<'j>(field: &str, raw: &'j Json) -> Result<(&'j Json, &'j Json)> {
    let (lower, upper) = match raw {
        Json::Object(map) => (map.get("from"), map.get("to")),
        Json::Array(items) if items.len() == 2 => (items.first(), items.get(1)),
        _ => (None, None),
    };
    match (lower, upper) {
        (Some(lo), Some(hi)) if !lo.is_null() && !hi.is_null() => Ok((lo, hi)),
        (None | Some(Json::Null), _) => Err(SiftError::malformed_range(field, "missing lower bound")),
        _ => Err(SiftError::malformed_range(field, "missing upper bound")),
    }
}

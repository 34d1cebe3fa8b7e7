//! Per-data-type predicate evaluation.
//!
//! Evaluation is a lookup table of pure functions indexed by the predicate's
//! declared [`DataType`]. Each function coerces the record value, then applies
//! the mode against the literal decoded when the predicate was built.

use crate::error::{Result, SiftError};
use crate::mode::Mode;
use crate::predicate::{Literal, Operand, Predicate};
use crate::value::Value;

type EvalFn = fn(&Predicate, &Value<'_>) -> Result<bool>;

const EVALUATORS: [EvalFn; 5] = [eval_number, eval_text, eval_bool, eval_date, eval_time];

/// Decides whether `value` satisfies `predicate`.
///
/// A missing value (`Value::None`) never matches, except under `IsEmpty`.
pub fn evaluate(predicate: &Predicate, value: &Value<'_>) -> Result<bool> {
    EVALUATORS[predicate.data_type().index()](predicate, value)
}

fn mismatch(p: &Predicate, value: &Value<'_>) -> SiftError {
    let found = match value {
        Value::Text(s) => format!("text {s:?}"),
        other => other.kind().to_string(),
    };
    SiftError::mismatch(p.field(), p.data_type(), found)
}

fn unsupported(p: &Predicate) -> SiftError {
    SiftError::UnsupportedMode {
        field: p.field().to_string(),
        mode: p.mode(),
        data_type: p.data_type(),
    }
}

fn eval_number(p: &Predicate, value: &Value<'_>) -> Result<bool> {
    if value.is_none() {
        return Ok(false);
    }
    let n = value.coerce_number().ok_or_else(|| mismatch(p, value))?;

    match p.operand() {
        Operand::Single(Literal::Number(lit)) => Ok(n
            .partial_cmp(lit)
            .is_some_and(|ordering| p.mode().eval_ordering(ordering))),
        Operand::Range {
            lower: Literal::Number(lo),
            upper: Literal::Number(hi),
        } => Ok(*lo <= n && n <= *hi),
        _ => Err(unsupported(p)),
    }
}

fn eval_text(p: &Predicate, value: &Value<'_>) -> Result<bool> {
    let raw = match value {
        Value::Text(s) => Some(*s),
        Value::None => None,
        other => return Err(mismatch(p, other)),
    };
    let text = raw.map(|s| s.trim().to_lowercase());

    match p.mode() {
        Mode::IsEmpty => return Ok(text.map_or(true, |t| t.is_empty())),
        Mode::IsNotEmpty => return Ok(text.is_some_and(|t| !t.is_empty())),
        _ => {}
    }

    let (Some(raw), Some(text)) = (raw, text) else {
        return Ok(false);
    };

    match p.operand() {
        Operand::Single(Literal::Pattern(re)) => Ok(re.is_match(raw.trim())),
        Operand::Single(Literal::Text(lit)) => match p.mode() {
            Mode::Eq => Ok(text == *lit),
            Mode::Ne => Ok(text != *lit),
            Mode::Contains => Ok(text.contains(lit.as_str())),
            Mode::NotContains => Ok(!text.contains(lit.as_str())),
            Mode::StartsWith => Ok(text.starts_with(lit.as_str())),
            Mode::EndsWith => Ok(text.ends_with(lit.as_str())),
            _ => Err(unsupported(p)),
        },
        _ => Err(unsupported(p)),
    }
}

fn eval_bool(p: &Predicate, value: &Value<'_>) -> Result<bool> {
    if value.is_none() {
        return Ok(false);
    }
    let b = value.coerce_bool().ok_or_else(|| mismatch(p, value))?;

    match (p.mode(), p.operand()) {
        (Mode::Eq, Operand::Single(Literal::Bool(lit))) => Ok(b == *lit),
        (Mode::Ne, Operand::Single(Literal::Bool(lit))) => Ok(b != *lit),
        _ => Err(unsupported(p)),
    }
}

fn eval_date(p: &Predicate, value: &Value<'_>) -> Result<bool> {
    if value.is_none() {
        return Ok(false);
    }
    let at = value.coerce_datetime().ok_or_else(|| mismatch(p, value))?;

    match p.operand() {
        Operand::Single(Literal::Date(lit)) => Ok(p.mode().eval_ordering(lit.locate(&at))),
        Operand::Range {
            lower: Literal::Date(lo),
            upper: Literal::Date(hi),
        } => Ok(Mode::Gte.eval_ordering(lo.locate(&at)) && Mode::Lte.eval_ordering(hi.locate(&at))),
        _ => Err(unsupported(p)),
    }
}

fn eval_time(p: &Predicate, value: &Value<'_>) -> Result<bool> {
    if value.is_none() {
        return Ok(false);
    }
    let t = value.coerce_time().ok_or_else(|| mismatch(p, value))?;

    match p.operand() {
        Operand::Single(Literal::Time(lit)) => Ok(p.mode().eval_ordering(t.cmp(lit))),
        Operand::Range {
            lower: Literal::Time(lo),
            upper: Literal::Time(hi),
        } => Ok(*lo <= t && t <= *hi),
        _ => Err(unsupported(p)),
    }
}

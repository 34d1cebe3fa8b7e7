//! Parallel filter executor.
//!
//! Predicates are resolved against the registry once, then the record slice
//! is split into contiguous chunks evaluated on scoped worker threads. Each
//! worker owns its output buffer; the only shared mutable state is the slot
//! holding the first evaluation error.

use std::sync::{Mutex, PoisonError};
use std::thread;

use tracing::{debug, instrument, trace};

use crate::config::{EngineConfig, UnknownFieldPolicy};
use crate::error::{Result, SiftError};
use crate::filter_set::Combinator;
use crate::predicate::Predicate;
use crate::registry::{Accessor, FieldRegistry};

/// A predicate paired with the accessor for its field.
struct Bound<'r, T> {
    predicate: &'r Predicate,
    get: &'r Accessor<T>,
}

fn bind<'r, T>(
    predicates: &'r [Predicate],
    registry: &'r FieldRegistry<T>,
    policy: UnknownFieldPolicy,
) -> Result<Vec<Bound<'r, T>>> {
    let mut bound = Vec::with_capacity(predicates.len());
    for predicate in predicates {
        match registry.resolve(predicate.field()) {
            Some(get) => bound.push(Bound { predicate, get }),
            None if policy == UnknownFieldPolicy::Reject => {
                return Err(SiftError::UnknownField {
                    field: predicate.field().to_string(),
                });
            }
            None => debug!(field = predicate.field(), "skipping predicate on unknown field"),
        }
    }
    Ok(bound)
}

fn keep<T>(record: &T, bound: &[Bound<'_, T>], combinator: Combinator) -> Result<bool> {
    match combinator {
        Combinator::And => {
            for b in bound {
                if !b.predicate.matches(&(b.get)(record))? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Combinator::Or => {
            for b in bound {
                if b.predicate.matches(&(b.get)(record))? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

fn filter_chunk<'a, T>(
    chunk: &'a [T],
    bound: &[Bound<'_, T>],
    combinator: Combinator,
) -> Result<Vec<&'a T>> {
    let mut kept = Vec::with_capacity(chunk.len());
    for record in chunk {
        if keep(record, bound, combinator)? {
            kept.push(record);
        }
    }
    Ok(kept)
}

/// Returns the records matching `predicates` under `combinator`.
///
/// Predicates naming unknown fields are skipped (or rejected under
/// [`UnknownFieldPolicy::Reject`]); with none left, every record matches.
/// Matches come back in chunk order. Any evaluation error fails the whole
/// call once all workers have finished.
///
/// # Example
///
/// ```
/// use sift::{filter_records, Combinator, EngineConfig, FieldRegistry, Mode, Predicate, Seekable};
///
/// #[derive(Seekable)]
/// struct Item {
///     qty: u32,
/// }
///
/// let items: Vec<Item> = (0..100).map(|qty| Item { qty }).collect();
/// let registry = FieldRegistry::<Item>::build(0);
/// let predicates = [Predicate::new("qty", Mode::Gte, 90)?];
///
/// let kept = filter_records(&items, &predicates, Combinator::And, &registry, &EngineConfig::default())?;
/// assert_eq!(kept.len(), 10);
/// # Ok::<(), sift::SiftError>(())
/// ```
#[instrument(
    level = "debug",
    skip_all,
    fields(records = records.len(), predicates = predicates.len(), ?combinator)
)]
pub fn filter_records<'a, T: Sync>(
    records: &'a [T],
    predicates: &[Predicate],
    combinator: Combinator,
    registry: &FieldRegistry<T>,
    config: &EngineConfig,
) -> Result<Vec<&'a T>> {
    let bound = bind(predicates, registry, config.unknown_fields)?;
    if bound.is_empty() {
        return Ok(records.iter().collect());
    }

    let workers = config.workers();
    let chunk_len = records.len().div_ceil(workers).max(1);
    if workers == 1 || records.len() <= chunk_len {
        trace!("filtering sequentially");
        return filter_chunk(records, &bound, combinator);
    }

    debug!(workers, chunk_len, "filtering in parallel");
    let first_error: Mutex<Option<SiftError>> = Mutex::new(None);

    let buffers: Vec<Vec<&'a T>> = thread::scope(|scope| {
        let handles: Vec<_> = records
            .chunks(chunk_len)
            .map(|chunk| {
                let bound = &bound;
                let first_error = &first_error;
                scope.spawn(move || match filter_chunk(chunk, bound, combinator) {
                    Ok(kept) => kept,
                    Err(err) => {
                        let mut slot = first_error.lock().unwrap_or_else(PoisonError::into_inner);
                        if slot.is_none() {
                            *slot = Some(err);
                        }
                        Vec::new()
                    }
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(kept) => kept,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    if let Some(err) = first_error
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
    {
        return Err(err);
    }
    Ok(buffers.concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Mode;
    use crate::predicate::Operand;
    use crate::registry::FieldSet;
    use crate::traits::Seekable;
    use crate::value::{Number, Value};

    #[derive(Debug)]
    struct Reading {
        sensor: String,
        level: i64,
        raw: &'static str,
    }

    impl Seekable for Reading {
        fn describe(fields: &mut FieldSet<Self>) {
            fields
                .field("sensor", |r: &Reading| Value::Text(&r.sensor))
                .field("level", |r: &Reading| Value::Number(Number::from(r.level)))
                .field("raw", |r: &Reading| Value::Text(r.raw));
        }
    }

    fn readings(n: i64) -> Vec<Reading> {
        (0..n)
            .map(|i| Reading {
                sensor: format!("s{}", i % 3),
                level: i,
                raw: if i == n - 1 { "n/a" } else { "1" },
            })
            .collect()
    }

    fn config(workers: usize) -> EngineConfig {
        EngineConfig::default().parallelism(workers)
    }

    fn levels(kept: &[&Reading]) -> Vec<i64> {
        kept.iter().map(|r| r.level).collect()
    }

    #[test]
    fn and_requires_every_predicate() {
        let data = readings(30);
        let registry = FieldRegistry::<Reading>::build(0);
        let predicates = [
            Predicate::new("sensor", Mode::Eq, "S1").unwrap(),
            Predicate::new("level", Mode::Lt, 10).unwrap(),
        ];

        let kept = filter_records(&data, &predicates, Combinator::And, &registry, &config(1)).unwrap();
        assert_eq!(levels(&kept), vec![1, 4, 7]);
    }

    #[test]
    fn or_accepts_any_predicate() {
        let data = readings(30);
        let registry = FieldRegistry::<Reading>::build(0);
        let predicates = [
            Predicate::new("level", Mode::Lt, 2).unwrap(),
            Predicate::new("level", Mode::Gt, 27).unwrap(),
        ];

        let kept = filter_records(&data, &predicates, Combinator::Or, &registry, &config(1)).unwrap();
        assert_eq!(levels(&kept), vec![0, 1, 28, 29]);
    }

    #[test]
    fn or_short_circuits_before_failing_predicate() {
        let data = readings(10);
        let registry = FieldRegistry::<Reading>::build(0);
        let predicates = [
            Predicate::new("level", Mode::Gte, 0).unwrap(),
            Predicate::new("raw", Mode::Gt, 0).unwrap(),
        ];

        let kept = filter_records(&data, &predicates, Combinator::Or, &registry, &config(1)).unwrap();
        assert_eq!(kept.len(), 10);
    }

    #[test]
    fn parallel_matches_sequential() {
        let data = readings(1_003);
        let registry = FieldRegistry::<Reading>::build(0);
        let predicates = [Predicate::new("level", Mode::Range, Operand::range(100, 900)).unwrap()];

        let sequential =
            filter_records(&data, &predicates, Combinator::And, &registry, &config(1)).unwrap();
        for workers in [2, 3, 7, 16] {
            let parallel =
                filter_records(&data, &predicates, Combinator::And, &registry, &config(workers))
                    .unwrap();
            assert_eq!(levels(&parallel), levels(&sequential), "workers = {workers}");
        }
        assert_eq!(sequential.len(), 801);
    }

    #[test]
    fn more_workers_than_records() {
        let data = readings(3);
        let registry = FieldRegistry::<Reading>::build(0);
        let predicates = [Predicate::new("level", Mode::Ne, 1).unwrap()];

        let kept = filter_records(&data, &predicates, Combinator::And, &registry, &config(8)).unwrap();
        assert_eq!(levels(&kept), vec![0, 2]);
    }

    #[test]
    fn unknown_fields_are_skipped() {
        let data = readings(5);
        let registry = FieldRegistry::<Reading>::build(0);
        let predicates = [
            Predicate::new("ghost_field", Mode::Eq, "x").unwrap(),
            Predicate::new("level", Mode::Gte, 3).unwrap(),
        ];

        let kept = filter_records(&data, &predicates, Combinator::And, &registry, &config(1)).unwrap();
        assert_eq!(levels(&kept), vec![3, 4]);

        let only_ghost = &predicates[..1];
        let kept = filter_records(&data, only_ghost, Combinator::Or, &registry, &config(1)).unwrap();
        assert_eq!(kept.len(), 5);
    }

    #[test]
    fn unknown_fields_rejected_by_policy() {
        let data = readings(5);
        let registry = FieldRegistry::<Reading>::build(0);
        let predicates = [Predicate::new("ghost_field", Mode::Eq, "x").unwrap()];
        let strict = config(1).unknown_fields(UnknownFieldPolicy::Reject);

        let err = filter_records(&data, &predicates, Combinator::And, &registry, &strict).unwrap_err();
        assert!(matches!(err, SiftError::UnknownField { .. }));
    }

    #[test]
    fn empty_predicates_keep_everything() {
        let data = readings(5);
        let registry = FieldRegistry::<Reading>::build(0);
        let kept = filter_records(&data, &[], Combinator::Or, &registry, &config(4)).unwrap();
        assert_eq!(kept.len(), 5);
    }

    #[test]
    fn worker_error_fails_the_call() {
        let data = readings(400);
        let registry = FieldRegistry::<Reading>::build(0);
        let predicates = [Predicate::new("raw", Mode::Gt, 0).unwrap()];

        for workers in [1, 4] {
            let err = filter_records(&data, &predicates, Combinator::And, &registry, &config(workers))
                .unwrap_err();
            assert!(
                matches!(&err, SiftError::TypeMismatch { field, .. } if field == "raw"),
                "workers = {workers}: {err}"
            );
        }
    }
}

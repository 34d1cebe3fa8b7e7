//! Choosing between in-memory evaluation and a storage-backed query.
//!
//! The engine only evaluates in memory. A service that can also push a
//! [`FilterSet`] down to a store implements [`StoreBackend`] and asks
//! [`choose_path`] which route to take. A backend must reproduce the same
//! comparison semantics so both paths agree on overlapping inputs.

use crate::filter_set::FilterSet;

/// Where a query should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPath {
    /// Evaluate with the [`Engine`](crate::Engine).
    InMemory,
    /// Delegate to a [`StoreBackend`].
    Store,
}

/// Picks a path from an estimated record count.
///
/// At or below `threshold` the query runs in memory. Larger sets, and sets
/// whose size is unknown, go to the store.
///
/// ```
/// use sift::{choose_path, ExecutionPath};
///
/// assert_eq!(choose_path(Some(500), 10_000), ExecutionPath::InMemory);
/// assert_eq!(choose_path(Some(50_000), 10_000), ExecutionPath::Store);
/// assert_eq!(choose_path(None, 10_000), ExecutionPath::Store);
/// ```
pub fn choose_path(estimate: Option<usize>, threshold: usize) -> ExecutionPath {
    match estimate {
        Some(len) if len <= threshold => ExecutionPath::InMemory,
        _ => ExecutionPath::Store,
    }
}

/// A page of records produced by a store.
#[derive(Debug, Clone, PartialEq)]
pub struct StorePage<T> {
    /// Records in the requested window.
    pub data: Vec<T>,
    /// Matches before paging.
    pub total_size: usize,
    /// Page count for the requested page size.
    pub total_page_count: usize,
}

/// A storage-backed implementation of the same query semantics.
pub trait StoreBackend<T> {
    type Error: std::error::Error;

    /// Estimated number of candidate records, if the store can tell cheaply.
    fn estimate_len(&self, query: &FilterSet) -> Option<usize>;

    /// Runs the filter set against the store.
    fn query(&self, query: &FilterSet) -> Result<StorePage<T>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::mode::Mode;
    use crate::page::PageRequest;
    use crate::Seekable;

    #[derive(Debug, Clone, PartialEq, Seekable)]
    struct Doc {
        title: String,
        words: u32,
    }

    /// A hand-written store that knows one query shape: `words >= min`,
    /// longest first, windowed with skip/take.
    struct Fixture {
        rows: Vec<Doc>,
        min_words: u32,
    }

    impl StoreBackend<Doc> for Fixture {
        type Error = std::convert::Infallible;

        fn estimate_len(&self, _query: &FilterSet) -> Option<usize> {
            Some(self.rows.len())
        }

        fn query(&self, query: &FilterSet) -> Result<StorePage<Doc>, Self::Error> {
            let mut hits: Vec<Doc> = self
                .rows
                .iter()
                .filter(|d| d.words >= self.min_words)
                .cloned()
                .collect();
            hits.sort_by(|a, b| b.words.cmp(&a.words));

            let total_size = hits.len();
            let (data, total_page_count) = match query.page_request() {
                Some(page) => (
                    hits.into_iter()
                        .skip(page.index() * page.size())
                        .take(page.size())
                        .collect(),
                    total_size.div_ceil(page.size()),
                ),
                None => (hits, usize::from(total_size > 0)),
            };
            Ok(StorePage {
                data,
                total_size,
                total_page_count,
            })
        }
    }

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(choose_path(Some(10), 10), ExecutionPath::InMemory);
        assert_eq!(choose_path(Some(11), 10), ExecutionPath::Store);
        assert_eq!(choose_path(Some(0), 0), ExecutionPath::InMemory);
    }

    #[test]
    fn both_paths_agree() {
        let rows: Vec<Doc> = (0..40)
            .map(|i| Doc {
                title: format!("doc {i}"),
                words: i * 10,
            })
            .collect();
        let store = Fixture {
            rows: rows.clone(),
            min_words: 100,
        };

        let query = FilterSet::all()
            .predicate("words", Mode::Gte, 100)
            .unwrap()
            .sort_desc("words")
            .page(PageRequest::new(1, 5).unwrap());

        let engine = Engine::default();
        let in_memory = engine.run(&rows, &query).unwrap();
        let stored = store.query(&query).unwrap();

        assert_eq!(engine.choose_path(store.estimate_len(&query)), ExecutionPath::InMemory);
        assert_eq!(stored.total_size, in_memory.total_size());
        assert_eq!(stored.total_page_count, in_memory.total_page_count());
        let expected: Vec<Doc> = in_memory.data().iter().map(|d| (*d).clone()).collect();
        assert_eq!(stored.data, expected);
        assert_eq!(
            stored.data.iter().map(|d| d.words).collect::<Vec<_>>(),
            vec![340, 330, 320, 310, 300]
        );
    }
}

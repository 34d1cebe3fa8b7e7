//! The query engine: filter, sort, paginate.

use tracing::{debug, instrument};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::executor::filter_records;
use crate::filter_set::FilterSet;
use crate::ordering::sort_records;
use crate::page::{paginate, QueryResult};
use crate::registry::FieldRegistry;
use crate::strategy::{choose_path, ExecutionPath};
use crate::traits::Seekable;

/// Runs [`FilterSet`]s over record slices.
///
/// The engine holds only configuration; it keeps no state between calls and
/// never mutates the records it evaluates.
///
/// # Example
///
/// ```
/// use sift::{Engine, FilterSet, Mode, PageRequest, Seekable};
///
/// #[derive(Seekable)]
/// struct Person {
///     name: String,
///     age: u32,
/// }
///
/// let people = vec![
///     Person { name: "John Smith".into(), age: 31 },
///     Person { name: "Jane Doe".into(), age: 45 },
///     Person { name: "Johnny Cash".into(), age: 24 },
/// ];
///
/// let query = FilterSet::all()
///     .predicate("name", Mode::Contains, "JOHN")?
///     .sort_desc("age")
///     .page(PageRequest::new(0, 10)?);
///
/// let result = Engine::default().run(&people, &query)?;
/// assert_eq!(result.total_size(), 2);
/// assert_eq!(result.data()[0].age, 31);
/// # Ok::<(), sift::SiftError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Engine { config }
    }

    /// Returns the engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs a query using the shared registry for `T`.
    pub fn run<'a, T>(&self, records: &'a [T], query: &FilterSet) -> Result<QueryResult<'a, T>>
    where
        T: Seekable + Send + Sync,
    {
        let registry = FieldRegistry::<T>::shared(self.config.max_depth);
        self.run_with_registry(records, query, &registry)
    }

    /// Runs a query with an explicit registry.
    #[instrument(
        skip_all,
        fields(record_type = std::any::type_name::<T>(), records = records.len())
    )]
    pub fn run_with_registry<'a, T: Sync>(
        &self,
        records: &'a [T],
        query: &FilterSet,
        registry: &FieldRegistry<T>,
    ) -> Result<QueryResult<'a, T>> {
        let mut matches = filter_records(
            records,
            query.predicates(),
            query.combinator(),
            registry,
            &self.config,
        )?;
        sort_records(
            &mut matches,
            query.sort_keys(),
            registry,
            self.config.unknown_fields,
        )?;

        let result = paginate(matches, query.page_request());
        debug!(
            total = result.total_size(),
            pages = result.total_page_count(),
            page = result.page_index(),
            "query complete"
        );
        Ok(result)
    }

    /// Which path a collection of `estimate` records should take.
    pub fn choose_path(&self, estimate: Option<usize>) -> ExecutionPath {
        choose_path(estimate, self.config.store_threshold)
    }
}

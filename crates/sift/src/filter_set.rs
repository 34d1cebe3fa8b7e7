//! Filter set builder.
//!
//! The [`FilterSet`] struct provides a fluent builder API for constructing
//! the complete query for one invocation: predicates, combinator, sort keys
//! and page window.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::mode::Mode;
use crate::ordering::{Dir, SortKey};
use crate::page::PageRequest;
use crate::predicate::{Operand, Predicate};

/// How a filter set's predicates combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    /// Every predicate must match.
    #[default]
    #[serde(alias = "AND", alias = "all")]
    And,
    /// At least one predicate must match.
    #[serde(alias = "OR", alias = "any")]
    Or,
}

/// The complete query for one invocation.
///
/// # Example
///
/// ```
/// use sift::{Dir, FilterSet, Mode, Operand, PageRequest};
///
/// let query = FilterSet::all()
///     .predicate("name", Mode::Contains, "john")?
///     .predicate("age", Mode::Range, Operand::range(30, 40))?
///     .sort_by("age", Dir::Desc)
///     .page(PageRequest::new(0, 20)?);
///
/// assert_eq!(query.predicates().len(), 2);
/// # Ok::<(), sift::SiftError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    predicates: Vec<Predicate>,
    combinator: Combinator,
    sort: Vec<SortKey>,
    page: Option<PageRequest>,
}

impl FilterSet {
    /// Creates an empty filter set.
    ///
    /// An empty filter set matches all records.
    pub fn new() -> Self {
        FilterSet::default()
    }

    /// Creates an empty filter set whose predicates all must match.
    pub fn all() -> Self {
        FilterSet::new().combine(Combinator::And)
    }

    /// Creates an empty filter set where any predicate may match.
    pub fn any() -> Self {
        FilterSet::new().combine(Combinator::Or)
    }

    /// Sets the combinator.
    pub fn combine(mut self, combinator: Combinator) -> Self {
        self.combinator = combinator;
        self
    }

    /// Adds a built predicate.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Builds and adds a predicate, inferring its data type from the operand.
    pub fn predicate(self, field: &str, mode: Mode, operand: impl Into<Operand>) -> Result<Self> {
        Ok(self.filter(Predicate::new(field, mode, operand)?))
    }

    /// Adds a sort key.
    pub fn sort_by(mut self, field: &str, dir: Dir) -> Self {
        self.sort.push(SortKey::new(field, dir));
        self
    }

    /// Adds an ascending sort key.
    pub fn sort_asc(self, field: &str) -> Self {
        self.sort_by(field, Dir::Asc)
    }

    /// Adds a descending sort key.
    pub fn sort_desc(self, field: &str) -> Self {
        self.sort_by(field, Dir::Desc)
    }

    /// Requests a page window.
    pub fn page(mut self, page: PageRequest) -> Self {
        self.page = Some(page);
        self
    }

    /// Returns the predicates in the order they were added.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Returns how predicates are combined.
    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    /// Returns the sort keys, primary key first.
    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort
    }

    /// Returns the requested page window, if any.
    pub fn page_request(&self) -> Option<PageRequest> {
        self.page
    }

    /// Returns `true` if there are no predicates.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

//! JSON wire format for filter sets.
//!
//! ```json
//! {
//!   "filters": [{"field": "age", "value": {"from": 30, "to": 40}, "mode": "range", "dataType": "number"}],
//!   "sortFields": [{"field": "age", "order": "desc"}],
//!   "logic": "and",
//!   "page": {"index": 0, "size": 20}
//! }
//! ```
//!
//! Literals are decoded and validated once, while converting to a
//! [`FilterSet`].

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::error::{Result, SiftError};
use crate::filter_set::{Combinator, FilterSet};
use crate::mode::{DataType, Mode};
use crate::ordering::Dir;
use crate::page::PageRequest;
use crate::predicate::Predicate;

/// A decoded but not yet validated filter request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
    #[serde(default)]
    pub sort_fields: Vec<SortSpec>,
    #[serde(default)]
    pub logic: Combinator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageSpec>,
}

/// One predicate on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub field: String,
    #[serde(default)]
    pub value: Json,
    pub mode: Mode,
    pub data_type: DataType,
}

/// One sort key on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub order: Dir,
}

/// Page window on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    pub index: usize,
    pub size: usize,
}

impl TryFrom<FilterRequest> for FilterSet {
    type Error = SiftError;

    fn try_from(request: FilterRequest) -> Result<Self> {
        let mut set = FilterSet::new().combine(request.logic);
        for spec in &request.filters {
            set = set.filter(Predicate::decode(
                spec.field.as_str(),
                spec.mode,
                spec.data_type,
                &spec.value,
            )?);
        }
        for sort in &request.sort_fields {
            set = set.sort_by(&sort.field, sort.order);
        }
        if let Some(page) = request.page {
            set = set.page(PageRequest::new(page.index, page.size)?);
        }
        Ok(set)
    }
}

impl FilterSet {
    /// Decodes and validates a filter set from its JSON wire format.
    ///
    /// ```
    /// use sift::{Combinator, FilterSet};
    ///
    /// let query = FilterSet::from_json(r#"{
    ///     "filters": [
    ///         {"field": "name", "value": "john", "mode": "contains", "dataType": "text"},
    ///         {"field": "age", "value": 25, "mode": "gte", "dataType": "number"}
    ///     ],
    ///     "sortFields": [{"field": "age", "order": "desc"}],
    ///     "logic": "and"
    /// }"#)?;
    ///
    /// assert_eq!(query.predicates().len(), 2);
    /// assert_eq!(query.combinator(), Combinator::And);
    /// # Ok::<(), sift::SiftError>(())
    /// ```
    pub fn from_json(input: &str) -> Result<Self> {
        let request: FilterRequest = serde_json::from_str(input)?;
        FilterSet::try_from(request)
    }
}

//! Sift - Generic filter, sort and paginate engine for Rust struct collections.
//!
//! Sift evaluates a declarative, client-supplied query against in-memory
//! collections of uniformly typed records. It supports:
//!
//! - Field lookup by name, including dotted keys into nested structs
//! - Typed predicates over numbers, text, booleans, dates and times of day
//! - AND / OR combination of predicates, evaluated in parallel
//! - Multi-key, stable sorting
//! - Zero-based pagination with page-count metadata
//! - A JSON wire format for the whole query
//!
//! # Quick Start
//!
//! ```rust
//! use sift::{Engine, FilterSet, Mode, Operand, PageRequest, Seekable};
//!
//! #[derive(Seekable)]
//! struct Person {
//!     name: String,
//!     age: u32,
//!     archived: bool,
//! }
//!
//! let people = vec![
//!     Person { name: "John Smith".into(), age: 35, archived: false },
//!     Person { name: "Jane Doe".into(), age: 52, archived: false },
//!     Person { name: "Old John".into(), age: 31, archived: true },
//! ];
//!
//! let query = FilterSet::all()
//!     .predicate("age", Mode::Range, Operand::range(30, 40))?
//!     .predicate("archived", Mode::Eq, false)?
//!     .sort_desc("age")
//!     .page(PageRequest::new(0, 10)?);
//!
//! let result = Engine::default().run(&people, &query)?;
//! assert_eq!(result.total_size(), 1);
//! assert_eq!(result.data()[0].name, "John Smith");
//! # Ok::<(), sift::SiftError>(())
//! ```
//!
//! # Pipeline
//!
//! ```text
//! FieldRegistry -> filter_records -> sort_records -> paginate -> QueryResult
//! ```
//!
//! - **Registry**: built once per record type from [`Seekable::describe`].
//!   Unknown field names are skipped, not errors.
//! - **Filter**: predicates combine with [`Combinator::And`] (every one must
//!   match) or [`Combinator::Or`] (at least one). No predicates means every
//!   record matches.
//! - **Sort**: keys compare after coercion (number, text, bool, date, time);
//!   ties keep their order.
//! - **Page**: page `0` is the first; a page past the end is empty.
//!
//! # Data Types and Modes
//!
//! | Type | Modes |
//! |------|-------|
//! | Number | `Eq`, `Ne`, `Gt`, `Gte`, `Lt`, `Lte`, `Range` |
//! | Text | `Eq`, `Ne`, `Contains`, `NotContains`, `StartsWith`, `EndsWith`, `IsEmpty`, `IsNotEmpty`, `Matches` |
//! | Bool | `Eq`, `Ne` |
//! | Date | number modes plus `Before`, `After` |
//! | Time | number modes plus `Before`, `After` |
//!
//! Text compares case-insensitively. A date literal without a time of day
//! matches the whole day; ranges include both bounds.

// Lets the derive's `::sift::` paths resolve inside this crate's own tests.
extern crate self as sift;

mod config;
mod engine;
mod error;
mod evaluate;
mod executor;
mod filter_set;
mod mode;
mod ordering;
mod page;
mod parse;
mod predicate;
mod registry;
mod strategy;
mod traits;
mod value;
mod wire;

// Re-export public API
pub use config::{EngineConfig, UnknownFieldPolicy, DEFAULT_MAX_DEPTH, DEFAULT_STORE_THRESHOLD};
pub use engine::Engine;
pub use error::{Result, SiftError};
pub use evaluate::evaluate;
pub use executor::filter_records;
pub use filter_set::{Combinator, FilterSet};
pub use mode::{DataType, Mode};
pub use ordering::{compare_records, compare_values, sort_records, Dir, SortKey};
pub use page::{paginate, PageRequest, PageWindow, QueryResult};
pub use parse::{parse_datetime, parse_time};
pub use predicate::{DateLiteral, Literal, Operand, Predicate};
pub use registry::{Accessor, FieldRegistry, FieldSet};
pub use strategy::{choose_path, ExecutionPath, StoreBackend, StorePage};
pub use traits::{SeekField, Seekable};
pub use value::{Number, Value};
pub use wire::{FilterRequest, FilterSpec, PageSpec, SortSpec};

pub use sift_macros::Seekable;

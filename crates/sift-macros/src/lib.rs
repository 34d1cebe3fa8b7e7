//! Proc macros for sift.
//!
//! This crate provides the [`Seekable`] derive, which generates the field
//! accessor registration for a record type so the sift engine can resolve
//! field names to values.
//!
//! For working examples, see `sift/tests/derive.rs`.

mod seeker;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Seekable` trait for query-enabled structs.
///
/// Every named field is registered under its own name unless marked
/// `#[seek(skip)]`. Leaf fields must implement `sift::SeekField`.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `skip` | Exclude this field from queries |
/// | `nested` | Expand a struct field (`U`, `Box<U>`, `Option<U>`, `Option<Box<U>>`) into dotted keys; `U` must be `Seekable` |
/// | `rename = "..."` | Also answer to a custom name |
///
/// A `#[serde(rename = "...")]` on the field is honored as an extra name too.
///
/// # Generated Code
///
/// The macro generates:
///
/// 1. Field name constants (e.g., `Task::NAME`, `Task::PRIORITY`)
/// 2. Implementation of `Seekable::describe()`
///
/// # Example
///
/// ```ignore
/// use sift::{Engine, FilterSet, Mode, Seekable};
///
/// #[derive(Seekable)]
/// struct Owner {
///     name: String,
/// }
///
/// #[derive(Seekable)]
/// struct Task {
///     #[seek(rename = "title")]
///     name: String,
///     priority: u8,
///     done: bool,
///     #[seek(nested)]
///     owner: Option<Owner>,
///     #[seek(skip)]
///     internal_id: u64,
/// }
///
/// let query = FilterSet::all()
///     .predicate(Task::PRIORITY, Mode::Gte, 3)?
///     .predicate("owner.name", Mode::StartsWith, "al")?;
///
/// let tasks: Vec<Task> = load_tasks();
/// let result = Engine::default().run(&tasks, &query)?;
/// ```
#[proc_macro_derive(Seekable, attributes(seek, serde))]
pub fn seekable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    seeker::seekable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

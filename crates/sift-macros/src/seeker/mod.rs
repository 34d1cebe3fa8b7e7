//! Implementation of the `#[derive(Seekable)]` macro.
//!
//! This module provides derive macro support for the sift engine,
//! generating field registrations and field constants from struct fields.

mod attrs;
mod derive;

pub use derive::seekable_derive_impl;

//! Traits for derive macro support.
//!
//! [`Seekable`] is implemented by `#[derive(Seekable)]` to describe a record
//! type's queryable fields, and [`SeekField`] turns a field's Rust type into a
//! comparable [`Value`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::registry::FieldSet;
use crate::value::{Number, Value};

/// Trait for record types that can be filtered and sorted.
///
/// This trait is typically derived using `#[derive(Seekable)]`, but can also
/// be implemented by hand, for instance when accessors are generated ahead of
/// time.
///
/// # Derive Usage
///
/// ```
/// use sift::{FieldRegistry, Seekable, Value};
///
/// #[derive(Seekable)]
/// struct Address {
///     city: String,
/// }
///
/// #[derive(Seekable)]
/// struct Person {
///     name: String,
///     age: u8,
///     #[seek(nested)]
///     address: Option<Address>,
///     #[seek(skip)]
///     secret: Vec<u8>,
/// }
///
/// let registry = FieldRegistry::<Person>::build(2);
/// assert!(registry.contains("address.city"));
/// assert!(!registry.contains("secret"));
///
/// let person = Person { name: "Ann".into(), age: 30, address: None, secret: vec![] };
/// let city = registry.resolve("address.city").unwrap();
/// assert_eq!(city(&person), Value::None);
/// ```
///
/// # Manual Implementation
///
/// ```
/// use sift::{FieldSet, Seekable, Value, Number};
///
/// struct Task {
///     name: String,
///     priority: u8,
/// }
///
/// impl Seekable for Task {
///     fn describe(fields: &mut FieldSet<Self>) {
///         fields
///             .field("name", |t: &Task| Value::Text(&t.name))
///             .field("priority", |t: &Task| Value::Number(Number::from(t.priority)));
///     }
/// }
/// ```
pub trait Seekable: Sized + 'static {
    /// Registers every queryable field with the builder.
    ///
    /// Called once per registry build; must be deterministic.
    fn describe(fields: &mut FieldSet<Self>);
}

/// Conversion from a field's Rust type to a comparable [`Value`].
///
/// The derive calls this for every registered leaf field. Implement it for
/// your own newtypes to make them queryable.
///
/// # Example
///
/// ```
/// use sift::{SeekField, Value};
///
/// struct Email(String);
///
/// impl SeekField for Email {
///     fn seek_value(&self) -> Value<'_> {
///         Value::Text(&self.0)
///     }
/// }
/// ```
pub trait SeekField {
    /// Returns the field's value for comparison.
    fn seek_value(&self) -> Value<'_>;
}

impl SeekField for String {
    fn seek_value(&self) -> Value<'_> {
        Value::Text(self)
    }
}

impl SeekField for str {
    fn seek_value(&self) -> Value<'_> {
        Value::Text(self)
    }
}

impl SeekField for bool {
    fn seek_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

macro_rules! seek_number {
    ($($ty:ty),*) => {
        $(
            impl SeekField for $ty {
                fn seek_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )*
    };
}

seek_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl SeekField for NaiveDateTime {
    fn seek_value(&self) -> Value<'_> {
        Value::DateTime(*self)
    }
}

impl SeekField for NaiveDate {
    fn seek_value(&self) -> Value<'_> {
        Value::DateTime(self.and_time(NaiveTime::MIN))
    }
}

impl<Tz: TimeZone> SeekField for DateTime<Tz> {
    fn seek_value(&self) -> Value<'_> {
        Value::DateTime(self.naive_utc())
    }
}

impl SeekField for NaiveTime {
    fn seek_value(&self) -> Value<'_> {
        Value::Time(*self)
    }
}

impl<F: SeekField> SeekField for Option<F> {
    fn seek_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.seek_value(),
            None => Value::None,
        }
    }
}

impl<F: SeekField + ?Sized> SeekField for &F {
    fn seek_value(&self) -> Value<'_> {
        (**self).seek_value()
    }
}

impl<F: SeekField + ?Sized> SeekField for Box<F> {
    fn seek_value(&self) -> Value<'_> {
        (**self).seek_value()
    }
}

//! Fields
//!
//! A [`Field`] names one property of a model and carries the accessors that
//! reach it. Writes through an [`Observed`](super::Observed) wrapper are
//! gated on the field's name, so the name and the accessors must describe
//! the same property.
//!
//! The [`field!`](crate::field) macro derives the name from the accessor
//! path, so the two cannot drift apart:
//!
//! ```rust
//! use glance_core::field;
//! use glance_core::model::Field;
//!
//! struct Stats {
//!     total: u32,
//! }
//!
//! struct Counter {
//!     count: i64,
//!     stats: Stats,
//! }
//!
//! impl Counter {
//!     const COUNT: Field<Self, i64> = field!(Self, count);
//!     const TOTAL: Field<Self, u32> = field!(Self, stats.total);
//! }
//!
//! assert_eq!(Counter::COUNT.name(), "count");
//! assert_eq!(Counter::TOTAL.name(), "stats.total");
//! ```

use std::any::type_name;
use std::fmt;

/// A named property of `M` holding a `T`.
pub struct Field<M, T> {
    name: &'static str,
    pub(super) get: fn(&M) -> &T,
    pub(super) get_mut: fn(&mut M) -> &mut T,
}

impl<M, T> Field<M, T> {
    /// Pair a property name with its accessors.
    ///
    /// `name` must be the property both accessors reach; it is what the
    /// declared set is checked against. Prefer [`field!`](crate::field),
    /// which builds the name from the accessor path.
    pub const fn new(
        name: &'static str,
        get: fn(&M) -> &T,
        get_mut: fn(&mut M) -> &mut T,
    ) -> Self {
        Self { name, get, get_mut }
    }

    /// The property name writes are gated on.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<M, T> Clone for Field<M, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M, T> Copy for Field<M, T> {}

impl<M, T> fmt::Debug for Field<M, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("model", &type_name::<M>())
            .field("name", &self.name)
            .field("value", &type_name::<T>())
            .finish()
    }
}

/// Build a [`Field`](crate::model::Field) from a model type and a field path.
///
/// `field!(Counter, count)` names the property `"count"`;
/// `field!(Counter, stats.total)` names `"stats.total"`, which is path-like
/// under the default configuration.
#[macro_export]
macro_rules! field {
    ($model:ty, $first:ident $(. $rest:ident)*) => {
        $crate::model::Field::<$model, _>::new(
            concat!(stringify!($first) $(, ".", stringify!($rest))*),
            |model: &$model| &model.$first $(.$rest)*,
            |model: &mut $model| &mut model.$first $(.$rest)*,
        )
    };
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

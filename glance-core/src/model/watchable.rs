//! Watchable Contract
//!
//! A model opts into observation by implementing [`Watchable`] and naming the
//! properties whose writes are allowed to count as state changes. Everything
//! else about the model (its fields, its methods) is ordinary Rust.
//!
//! # Strict Equality
//!
//! Writes and selector checks compare values with [`StrictEq`] rather than
//! `PartialEq`. Primitives and strings compare by value; shared handles
//! (`Rc`, `Arc`, observed wrappers) compare by identity. There is no deep
//! comparison: a selector that builds a fresh `Rc<Vec<_>>` on every call is
//! always judged changed.

use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexSet;
use serde_json::Value;

/// The set of property names declared observable by a model.
///
/// Built from any ordered sequence of names. Duplicates collapse and
/// membership is all that matters; iteration follows first declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservableSet {
    names: IndexSet<String>,
}

impl ObservableSet {
    /// An empty set. Nothing written through a wrapper with this set counts,
    /// except path-like keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Declare another name. Returns `false` if it was already declared.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Number of distinct declared names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Declared names in first-declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ObservableSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for ObservableSet {
    fn from(names: [S; N]) -> Self {
        names.into_iter().collect()
    }
}

/// A model whose declared properties may be observed.
///
/// # Example
///
/// ```rust
/// use glance_core::model::{ObservableSet, Watchable};
///
/// #[derive(Default)]
/// struct Counter {
///     count: i64,
///     text: String,
/// }
///
/// impl Watchable for Counter {
///     fn observable_properties(&self) -> ObservableSet {
///         ObservableSet::from(["count", "text"])
///     }
/// }
/// ```
pub trait Watchable: 'static {
    /// Names of the properties whose writes count as state changes.
    ///
    /// Called when a wrapper over this value is built, so the result may
    /// depend on the value's current contents.
    fn observable_properties(&self) -> ObservableSet;
}

/// Strict equality used for write gating and selector comparison.
pub trait StrictEq {
    /// Whether `self` and `other` are the same value (primitives) or the
    /// same object (shared handles).
    fn strict_eq(&self, other: &Self) -> bool;
}

macro_rules! strict_eq_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl StrictEq for $ty {
                #[inline]
                fn strict_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

strict_eq_by_value!(
    (), bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String,
);

impl StrictEq for &str {
    fn strict_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl<T: StrictEq> StrictEq for Option<T> {
    fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.strict_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: ?Sized> StrictEq for Rc<T> {
    fn strict_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> StrictEq for Arc<T> {
    fn strict_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

/// JSON scalars compare by value (numbers numerically, so `1` equals `1.0`).
/// Arrays and objects have no identity once copied out of a record, so they
/// never compare equal.
impl StrictEq for Value {
    fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => a == b,
            },
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

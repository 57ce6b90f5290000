//! Observed Wrapper
//!
//! An [`Observed<M>`] is the gate between a model and the code that mutates
//! it. Reads go straight through. Writes are applied only when they change
//! the value and target a declared property; every other write is dropped
//! without error, so the model never changes in a way a selector could miss.
//!
//! # How Wrappers Work
//!
//! 1. [`wrap`] moves the model into shared storage and captures its
//!    [`ObservableSet`].
//!
//! 2. [`Observed::child`] builds a wrapper over a nested watchable value.
//!    The child borrows through its parent, so both see the same storage.
//!    If the parent does not declare the key, the child gets an empty set
//!    and is effectively read-only.
//!
//! 3. [`Observed::set`] checks the field's name, compares, and assigns. It never
//!    notifies anyone. Components find out about changes by re-running their
//!    selectors during a check cycle.
//!
//! # Threading
//!
//! Wrappers are `Rc`/`RefCell` based and stay on the UI thread. Writing a
//! model while a selector on the same model is mid-read panics like any
//! other `RefCell` borrow conflict. Comparing wrappers with
//! [`Observed::ptr_eq`] or [`StrictEq`] borrows both models and is subject
//! to the same rule.

use std::any::type_name;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt::{self, Debug};
use std::rc::Rc;

use tracing::trace;

use super::config::WatchConfig;
use super::field::Field;
use super::watchable::{ObservableSet, StrictEq, Watchable};

/// Shared access to a model value, either owned or reached through a parent.
trait Slot<M> {
    fn borrow(&self) -> Ref<'_, M>;
    fn borrow_mut(&self) -> RefMut<'_, M>;
}

impl<M> Slot<M> for RefCell<M> {
    fn borrow(&self) -> Ref<'_, M> {
        RefCell::borrow(self)
    }

    fn borrow_mut(&self) -> RefMut<'_, M> {
        RefCell::borrow_mut(self)
    }
}

/// A nested value addressed through its parent's storage.
struct Projection<P, M> {
    parent: Rc<dyn Slot<P>>,
    get: fn(&P) -> &M,
    get_mut: fn(&mut P) -> &mut M,
}

impl<P: 'static, M: 'static> Slot<M> for Projection<P, M> {
    fn borrow(&self) -> Ref<'_, M> {
        Ref::map(self.parent.borrow(), self.get)
    }

    fn borrow_mut(&self) -> RefMut<'_, M> {
        RefMut::map(self.parent.borrow_mut(), self.get_mut)
    }
}

/// Result of a write through an [`Observed`] wrapper.
///
/// Dropped writes are not failures. Callers that do not care may ignore the
/// outcome entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The value changed.
    Applied,
    /// The new value was strictly equal to the current one.
    Unchanged,
    /// The key is neither declared nor path-like; the model was left alone.
    Undeclared,
}

impl WriteOutcome {
    /// Whether the model was modified.
    pub fn is_applied(self) -> bool {
        self == WriteOutcome::Applied
    }
}

/// Wrap a model for observation.
///
/// Equivalent to [`Observed::new`].
pub fn wrap<M: Watchable>(model: M) -> Observed<M> {
    Observed::new(model)
}

/// A model wrapped for observation.
///
/// Clones are handles to the same model and share its declared set.
pub struct Observed<M: Watchable> {
    slot: Rc<dyn Slot<M>>,
    observable: Rc<ObservableSet>,
    config: WatchConfig,
}

impl<M: Watchable> Observed<M> {
    /// Wrap `model` with the default configuration.
    pub fn new(model: M) -> Self {
        Self::with_config(model, WatchConfig::default())
    }

    /// Wrap `model` with an explicit configuration.
    pub fn with_config(model: M, config: WatchConfig) -> Self {
        let observable = model.observable_properties();
        trace!(
            model = type_name::<M>(),
            declared = observable.len(),
            "wrapping model"
        );
        Self {
            slot: Rc::new(RefCell::new(model)),
            observable: Rc::new(observable),
            config,
        }
    }

    /// Read from the current value.
    pub fn get<R>(&self, read: impl FnOnce(&M) -> R) -> R {
        read(&*self.slot.borrow())
    }

    /// Clone the current value out of the wrapper.
    pub fn snapshot(&self) -> M
    where
        M: Clone,
    {
        self.slot.borrow().clone()
    }

    /// Write `value` to `field`.
    ///
    /// The write is applied only if the field's name is declared or
    /// path-like and the value differs from the current one. Otherwise it is
    /// dropped and the model is untouched.
    pub fn set<T: StrictEq>(&self, field: Field<M, T>, value: T) -> WriteOutcome {
        let key = field.name();
        if !self.accepts(key) {
            return self.dropped(key, WriteOutcome::Undeclared);
        }

        if self.get(|model| (field.get)(model).strict_eq(&value)) {
            return self.dropped(key, WriteOutcome::Unchanged);
        }

        *(field.get_mut)(&mut *self.slot.borrow_mut()) = value;
        trace!(model = type_name::<M>(), key, "write applied");
        WriteOutcome::Applied
    }

    /// Compute the next value of `field` from its current value, then write
    /// it with the same rules as [`set`](Self::set).
    ///
    /// `next` runs under a shared borrow, so it may read this model or any
    /// wrapper over it. It must not write.
    pub fn update<T: StrictEq>(
        &self,
        field: Field<M, T>,
        next: impl FnOnce(&T) -> T,
    ) -> WriteOutcome {
        if !self.accepts(field.name()) {
            return self.dropped(field.name(), WriteOutcome::Undeclared);
        }

        let value = self.get(|model| next((field.get)(model)));
        self.set(field, value)
    }

    /// Build a wrapper over the nested watchable value held in `field`.
    ///
    /// When the parent declares the field, the child carries the nested
    /// value's own declared set. When it does not, the nested value is
    /// plain: the child's set is empty and only path-like writes pass
    /// through it.
    ///
    /// Each call builds a new wrapper. All of them view the same storage, so
    /// [`ptr_eq`](Self::ptr_eq) holds between them.
    pub fn child<N: Watchable>(&self, field: Field<M, N>) -> Observed<N> {
        let key = field.name();
        let observable = if self.observable.contains(key) {
            self.get(|model| (field.get)(model).observable_properties())
        } else {
            trace!(
                model = type_name::<M>(),
                key,
                "nested value read through undeclared key; treating it as plain"
            );
            ObservableSet::new()
        };

        Observed {
            slot: Rc::new(Projection {
                parent: Rc::clone(&self.slot),
                get: field.get,
                get_mut: field.get_mut,
            }),
            observable: Rc::new(observable),
            config: self.config,
        }
    }

    /// Whether a write to `key` may count as a state change.
    pub fn accepts(&self, key: &str) -> bool {
        self.observable.contains(key) || self.config.is_path(key)
    }

    /// The declared set captured when this wrapper was built.
    pub fn observable_properties(&self) -> &ObservableSet {
        &self.observable
    }

    /// The configuration this wrapper was built with.
    pub fn config(&self) -> WatchConfig {
        self.config
    }

    /// Whether both wrappers view the same underlying value.
    ///
    /// Borrows both models, so it panics if either is mutably borrowed.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        let a: *const M = &*self.slot.borrow();
        let b: *const M = &*other.slot.borrow();
        std::ptr::eq(a, b)
    }

    /// Mutable access for sibling modules that need a custom comparison.
    pub(crate) fn target_mut(&self) -> RefMut<'_, M> {
        self.slot.borrow_mut()
    }

    pub(crate) fn dropped(&self, key: &str, outcome: WriteOutcome) -> WriteOutcome {
        trace!(model = type_name::<M>(), key, ?outcome, "write dropped");
        outcome
    }
}

impl<M: Watchable> Clone for Observed<M> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
            observable: Rc::clone(&self.observable),
            config: self.config,
        }
    }
}

/// Wrappers compare by the identity of the value they view.
impl<M: Watchable> StrictEq for Observed<M> {
    fn strict_eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<M> Debug for Observed<M>
where
    M: Watchable + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observed")
            .field("value", &*self.slot.borrow())
            .field("observable", &self.observable)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Stats {
        total: u32,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Nested {
        foo: String,
        hidden: u32,
    }

    impl Nested {
        const FOO: Field<Self, String> = field!(Self, foo);
        const HIDDEN: Field<Self, u32> = field!(Self, hidden);
    }

    impl Watchable for Nested {
        fn observable_properties(&self) -> ObservableSet {
            ObservableSet::from(["foo"])
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Counter {
        count: i64,
        step: i64,
        text: String,
        secret: i64,
        stats: Stats,
        nested: Nested,
        loose: Nested,
    }

    impl Counter {
        const COUNT: Field<Self, i64> = field!(Self, count);
        const STEP: Field<Self, i64> = field!(Self, step);
        const TEXT: Field<Self, String> = field!(Self, text);
        const SECRET: Field<Self, i64> = field!(Self, secret);
        const TOTAL: Field<Self, u32> = field!(Self, stats.total);
        const NESTED: Field<Self, Nested> = field!(Self, nested);
        const LOOSE: Field<Self, Nested> = field!(Self, loose);
    }

    impl Watchable for Counter {
        fn observable_properties(&self) -> ObservableSet {
            ObservableSet::from(["count", "step", "text", "nested"])
        }
    }

    #[test]
    fn declared_write_is_applied() {
        let counter = wrap(Counter::default());
        let outcome = counter.set(Counter::COUNT, 1);
        assert_eq!(outcome, WriteOutcome::Applied);
        assert_eq!(counter.get(|m| m.count), 1);
    }

    #[test]
    fn undeclared_write_is_dropped() {
        let counter = wrap(Counter::default());
        let outcome = counter.set(Counter::SECRET, 9);
        assert_eq!(outcome, WriteOutcome::Undeclared);
        assert_eq!(counter.get(|m| m.secret), 0);
    }

    #[test]
    fn declared_name_cannot_reach_another_field() {
        let counter = wrap(Counter::default());

        // The name travels with the accessor, so the declared "count" only
        // ever reaches `count`.
        assert_eq!(Counter::COUNT.name(), "count");
        assert_eq!(Counter::SECRET.name(), "secret");
        assert_eq!(counter.set(Counter::SECRET, 9), WriteOutcome::Undeclared);
        assert_eq!(counter.update(Counter::SECRET, |s| s + 10), WriteOutcome::Undeclared);
        assert!(counter.set(Counter::COUNT, 9).is_applied());
        assert_eq!(counter.get(|m| (m.count, m.secret)), (9, 0));
    }

    #[test]
    fn dotted_names_only_come_from_dotted_paths() {
        let counter = wrap(Counter::default());
        assert!(!counter.config().is_path(Counter::SECRET.name()));
        assert!(counter.config().is_path(Counter::TOTAL.name()));

        counter.set(Counter::SECRET, 10);
        assert_eq!(counter.get(|m| m.secret), 0);
    }

    #[test]
    fn unchanged_write_is_dropped() {
        let counter = wrap(Counter::default());
        assert!(counter.set(Counter::TEXT, "x".to_string()).is_applied());
        let outcome = counter.set(Counter::TEXT, "x".to_string());
        assert_eq!(outcome, WriteOutcome::Unchanged);
    }

    #[test]
    fn path_fields_bypass_declarations() {
        let counter = wrap(Counter::default());
        let outcome = counter.set(Counter::TOTAL, 3);
        assert_eq!(outcome, WriteOutcome::Applied);
        assert_eq!(counter.get(|m| m.stats.total), 3);

        // Still gated by inequality.
        let again = counter.set(Counter::TOTAL, 3);
        assert_eq!(again, WriteOutcome::Unchanged);
    }

    #[test]
    fn custom_separator_changes_path_rule() {
        let config = WatchConfig::new().with_path_separator('/');
        let counter = Observed::with_config(Counter::default(), config);
        let slashed: Field<Counter, u32> =
            Field::new("stats/total", |m: &Counter| &m.stats.total, |m: &mut Counter| {
                &mut m.stats.total
            });

        assert!(!counter.set(Counter::TOTAL, 3).is_applied());
        assert!(counter.set(slashed, 3).is_applied());
    }

    #[test]
    fn update_uses_current_value() {
        let counter = wrap(Counter::default());
        counter.update(Counter::COUNT, |c| c + 1);
        counter.update(Counter::COUNT, |c| c + 1);
        assert_eq!(counter.get(|m| m.count), 2);

        let outcome = counter.update(Counter::SECRET, |s| s + 1);
        assert_eq!(outcome, WriteOutcome::Undeclared);
        assert_eq!(counter.get(|m| m.secret), 0);
    }

    #[test]
    fn update_may_read_the_model() {
        let counter = wrap(Counter::default());
        counter.set(Counter::COUNT, 1);
        counter.set(Counter::STEP, 5);

        let outcome = counter.update(Counter::COUNT, |c| c + counter.get(|m| m.step));
        assert_eq!(outcome, WriteOutcome::Applied);
        assert_eq!(counter.get(|m| m.count), 6);

        let nested = counter.child(Counter::NESTED);
        let outcome = nested.update(Nested::FOO, |foo| {
            format!("{foo}{}", counter.get(|m| m.count))
        });
        assert!(outcome.is_applied());
        assert_eq!(nested.get(|n| n.foo.clone()), "6");
    }

    #[test]
    fn child_through_declared_key_is_observable() {
        let counter = wrap(Counter::default());
        let nested = counter.child(Counter::NESTED);
        assert!(nested.accepts("foo"));
        assert!(!nested.accepts("hidden"));

        assert!(nested.set(Nested::FOO, "bar".into()).is_applied());
        assert_eq!(counter.get(|m| m.nested.foo.clone()), "bar");

        assert!(!nested.set(Nested::HIDDEN, 1).is_applied());
        assert_eq!(counter.get(|m| m.nested.hidden), 0);
    }

    #[test]
    fn child_through_undeclared_key_is_plain() {
        let counter = wrap(Counter::default());
        let loose = counter.child(Counter::LOOSE);
        assert!(loose.observable_properties().is_empty());

        let outcome = loose.set(Nested::FOO, "bar".into());
        assert_eq!(outcome, WriteOutcome::Undeclared);
        assert_eq!(counter.get(|m| m.loose.foo.clone()), "");
    }

    #[test]
    fn children_are_fresh_but_share_storage() {
        let counter = wrap(Counter::default());
        let a = counter.child(Counter::NESTED);
        let b = counter.child(Counter::NESTED);
        assert!(!Rc::ptr_eq(&a.observable, &b.observable));
        assert!(a.ptr_eq(&b));
        assert!(a.strict_eq(&b));

        a.set(Nested::FOO, "shared".into());
        assert_eq!(b.get(|n| n.foo.clone()), "shared");
    }

    #[test]
    fn clones_share_state() {
        let a = wrap(Counter::default());
        let b = a.clone();
        a.set(Counter::COUNT, 5);
        assert_eq!(b.get(|m| m.count), 5);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&wrap(Counter::default())));
    }

    #[test]
    fn ptr_eq_works_during_reads() {
        let counter = wrap(Counter::default());
        let nested = counter.child(Counter::NESTED);
        assert!(counter.get(|_| nested.ptr_eq(&counter.child(Counter::NESTED))));
    }

    #[test]
    #[should_panic(expected = "already mutably borrowed")]
    fn ptr_eq_panics_while_model_is_mutably_borrowed() {
        let counter = wrap(Counter::default());
        let other = counter.clone();
        let _guard = counter.target_mut();
        counter.ptr_eq(&other);
    }

    #[test]
    fn snapshot_copies_current_value() {
        let counter = wrap(Counter::default());
        counter.set(Counter::COUNT, 4);
        let snapshot = counter.snapshot();
        counter.set(Counter::COUNT, 5);
        assert_eq!(snapshot.count, 4);
    }
}

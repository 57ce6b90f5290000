//! Selector Bindings
//!
//! A selector binding caches one projected value of a model for one
//! component. It is the polling half of change detection: nothing tells a
//! binding that the model changed, so every check cycle re-runs the
//! projection and compares.
//!
//! # How Bindings Work
//!
//! 1. On the first render, the projection runs and its result is cached and
//!    returned.
//!
//! 2. On each check, the projection runs again. If the result is not
//!    strictly equal to the cache, the cache is replaced and the check
//!    reports a change.
//!
//! 3. Later renders return the cache, so a render always sees the value the
//!    last check settled on.
//!
//! Only the state at check time matters. Writes that cancel each other out
//! between two checks are never seen.

use std::any::{type_name, Any};
use std::cell::{Cell, RefCell};
use std::fmt::{self, Debug};

use tracing::{debug, trace};

use crate::model::{Observed, StrictEq, Watchable};

/// Type-erased binding stored in a component's slots.
pub(crate) trait Binding {
    /// Re-run the projection. Returns `true` if the cached value changed.
    fn check(&self) -> bool;

    fn as_any(&self) -> &dyn Any;
}

type Projection<M, P> = Box<dyn Fn(&Observed<M>) -> P>;

/// The cached projection of a model held by one component.
pub struct Selector<M, P>
where
    M: Watchable,
    P: StrictEq + Clone + 'static,
{
    model: RefCell<Observed<M>>,
    select: RefCell<Projection<M, P>>,
    cached: RefCell<P>,
    changes: Cell<usize>,
}

impl<M, P> Selector<M, P>
where
    M: Watchable,
    P: StrictEq + Clone + 'static,
{
    /// Create a binding and evaluate the projection once.
    pub fn new<F>(model: Observed<M>, select: F) -> Self
    where
        F: Fn(&Observed<M>) -> P + 'static,
    {
        let initial = select(&model);
        Self {
            model: RefCell::new(model),
            select: RefCell::new(Box::new(select)),
            cached: RefCell::new(initial),
            changes: Cell::new(0),
        }
    }

    /// The cached value.
    pub fn value(&self) -> P {
        self.cached.borrow().clone()
    }

    /// Number of changes detected since the binding was created.
    pub fn changes(&self) -> usize {
        self.changes.get()
    }

    /// Re-run the projection and update the cache if the result differs.
    pub fn check(&self) -> bool {
        let next = {
            let select = self.select.borrow();
            let model = self.model.borrow();
            (**select)(&*model)
        };

        if next.strict_eq(&*self.cached.borrow()) {
            trace!(
                model = type_name::<M>(),
                value = type_name::<P>(),
                "selected value unchanged"
            );
            return false;
        }

        *self.cached.borrow_mut() = next;
        self.changes.set(self.changes.get() + 1);
        debug!(
            model = type_name::<M>(),
            value = type_name::<P>(),
            changes = self.changes.get(),
            "selected value changed"
        );
        true
    }

    /// Swap in the model and projection passed by the latest render.
    ///
    /// The cache is kept; the new projection is first evaluated by the next
    /// check.
    pub(crate) fn rebind<F>(&self, model: &Observed<M>, select: F)
    where
        F: Fn(&Observed<M>) -> P + 'static,
    {
        *self.model.borrow_mut() = model.clone();
        *self.select.borrow_mut() = Box::new(select);
    }
}

impl<M, P> Binding for Selector<M, P>
where
    M: Watchable,
    P: StrictEq + Clone + 'static,
{
    fn check(&self) -> bool {
        Selector::check(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<M, P> Debug for Selector<M, P>
where
    M: Watchable,
    P: StrictEq + Clone + Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("model", &type_name::<M>())
            .field("cached", &*self.cached.borrow())
            .field("changes", &self.changes.get())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

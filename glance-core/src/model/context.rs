//! Model Context
//!
//! The model context makes a wrapped model reachable from code that was not
//! handed the model directly, typically components deep inside a subtree.
//!
//! # Implementation
//!
//! We use a thread-local stack of published models. Publishing pushes an
//! entry; dropping the returned guard removes that guard's entry. Lookups
//! walk the stack from the top, so a nested publish of the same model type
//! shadows the outer one until its scope ends.
//!
//! Passing the [`Observed`] handle explicitly is always preferable. The
//! context exists for call sites where threading the handle through is not
//! practical, and it is the only place a lookup can fail.

use std::any::{type_name, Any, TypeId};
use std::cell::{Cell, RefCell};
use std::marker::PhantomData;

use tracing::{debug, warn};

use super::proxy::Observed;
use super::watchable::Watchable;
use crate::error::{Error, Result};

thread_local! {
    static PUBLISHED: RefCell<Vec<ContextEntry>> = RefCell::new(Vec::new());
    static NEXT_ENTRY: Cell<u64> = const { Cell::new(0) };
}

/// A published model on the context stack.
struct ContextEntry {
    /// Identifies the guard that owns this entry.
    id: u64,
    type_id: TypeId,
    model: Box<dyn Any>,
}

/// Guard that keeps a model published until it is dropped.
///
/// Guards are normally dropped in reverse order of creation, which scoping
/// does naturally. A guard dropped early removes only its own entry.
pub struct ModelContext {
    id: u64,
    // The stack is thread-local; the guard must not leave the thread.
    _not_send: PhantomData<*const ()>,
}

impl ModelContext {
    /// Publish `model` for everything that runs on this thread until the
    /// returned guard is dropped.
    pub fn publish<M: Watchable>(model: Observed<M>) -> Self {
        let id = NEXT_ENTRY.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });
        let depth = PUBLISHED.with(|stack| {
            let mut stack = stack.borrow_mut();
            stack.push(ContextEntry {
                id,
                type_id: TypeId::of::<M>(),
                model: Box::new(model),
            });
            stack.len()
        });

        debug!(model = type_name::<M>(), id, depth, "model published");
        Self {
            id,
            _not_send: PhantomData,
        }
    }

    /// The nearest published model of type `M`.
    pub fn current<M: Watchable>() -> Result<Observed<M>> {
        Self::try_current().ok_or(Error::OutsideProvider {
            model: type_name::<M>(),
        })
    }

    /// The nearest published model of type `M`, if any.
    pub fn try_current<M: Watchable>() -> Option<Observed<M>> {
        PUBLISHED.with(|stack| {
            stack
                .borrow()
                .iter()
                .rev()
                .filter(|entry| entry.type_id == TypeId::of::<M>())
                .find_map(|entry| entry.model.downcast_ref::<Observed<M>>())
                .cloned()
        })
    }

    /// Whether a model of type `M` is published.
    pub fn is_published<M: Watchable>() -> bool {
        Self::try_current::<M>().is_some()
    }

    /// Number of models currently published on this thread.
    pub fn depth() -> usize {
        PUBLISHED.with(|stack| stack.borrow().len())
    }
}

impl Drop for ModelContext {
    fn drop(&mut self) {
        let removed = PUBLISHED.with(|stack| {
            let mut stack = stack.borrow_mut();
            let index = stack.iter().rposition(|entry| entry.id == self.id)?;
            if index + 1 != stack.len() {
                warn!(
                    id = self.id,
                    above = stack.len() - index - 1,
                    "model context dropped out of order"
                );
            }
            Some(stack.remove(index))
        });
        debug!(id = self.id, found = removed.is_some(), "model unpublished");
    }
}

/// Run `children` with `model` published, then unpublish it.
///
/// The model is unpublished even if `children` panics.
pub fn publish<M: Watchable, R>(model: Observed<M>, children: impl FnOnce() -> R) -> R {
    let _guard = ModelContext::publish(model);
    children()
}

/// The nearest published model of type `M`, or [`Error::OutsideProvider`].
pub fn current<M: Watchable>() -> Result<Observed<M>> {
    ModelContext::current()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

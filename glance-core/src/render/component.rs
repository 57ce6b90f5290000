//! Components
//!
//! A [`Component`] is the per-instance state a host keeps for one mounted UI
//! component: its selector bindings, in call order, and a version counter
//! that is bumped whenever a check finds a changed value.
//!
//! # Render and Check
//!
//! The host drives two entry points:
//!
//! - [`Component::render`] runs the component's view. Each
//!   [`RenderCx::subscribe`] call inside it claims the next binding slot and
//!   returns that binding's cached value.
//!
//! - [`Component::check`] runs after every render and after every event
//!   that may have mutated a model. It re-evaluates all bindings and, if any
//!   changed, asks the scheduler for exactly one more render.
//!
//! Subscriptions are matched to slots by call order, so a view must call
//! `subscribe` the same number of times, in the same order, on every render.

use std::any::type_name;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::{debug, warn};

use super::id::ComponentId;
use super::scheduler::RenderScheduler;
use super::selector::{Binding, Selector};
use crate::error::Result;
use crate::model::{ModelContext, Observed, StrictEq, Watchable};

/// State of one mounted component.
///
/// Dropping the component unmounts it: its bindings are discarded and never
/// evaluated again.
pub struct Component {
    id: ComponentId,
    scheduler: Rc<dyn RenderScheduler>,
    bindings: RefCell<SmallVec<[Box<dyn Binding>; 4]>>,
    cursor: Cell<usize>,
    version: Cell<u64>,
    renders: Cell<usize>,
}

impl Component {
    /// Mount a component that will ask `scheduler` for re-renders.
    pub fn mount(scheduler: Rc<dyn RenderScheduler>) -> Self {
        let id = ComponentId::new();
        debug!(%id, "component mounted");
        Self {
            id,
            scheduler,
            bindings: RefCell::new(SmallVec::new()),
            cursor: Cell::new(0),
            version: Cell::new(0),
            renders: Cell::new(0),
        }
    }

    /// This component's identifier.
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Run one render pass of the component's view.
    pub fn render<R>(&self, view: impl FnOnce(&mut RenderCx<'_>) -> R) -> R {
        self.cursor.set(0);
        self.renders.set(self.renders.get() + 1);

        let output = view(&mut RenderCx { component: self });

        let used = self.cursor.get();
        let mut bindings = self.bindings.borrow_mut();
        if bindings.len() > used {
            debug!(
                id = %self.id,
                discarded = bindings.len() - used,
                "render subscribed fewer times than before; discarding bindings"
            );
            bindings.truncate(used);
        }
        output
    }

    /// Re-evaluate every binding and request one re-render if any changed.
    ///
    /// Returns whether a render was requested.
    pub fn check(&self) -> bool {
        let changed = self
            .bindings
            .borrow()
            .iter()
            .fold(false, |changed, binding| binding.check() | changed);

        if !changed {
            return false;
        }

        self.version.set(self.version.get() + 1);
        debug!(id = %self.id, version = self.version.get(), "requesting render");
        self.scheduler.request_render(self.id);
        true
    }

    /// Unmount the component. Equivalent to dropping it.
    pub fn unmount(self) {}

    /// Number of changes detected across all checks.
    pub fn version(&self) -> u64 {
        self.version.get()
    }

    /// Number of render passes run so far.
    pub fn render_count(&self) -> usize {
        self.renders.get()
    }

    /// Number of live selector bindings.
    pub fn binding_count(&self) -> usize {
        self.bindings.borrow().len()
    }

    fn subscribe<M, P, F>(&self, model: &Observed<M>, select: F) -> P
    where
        M: Watchable,
        P: StrictEq + Clone + 'static,
        F: Fn(&Observed<M>) -> P + 'static,
    {
        let index = self.cursor.get();
        self.cursor.set(index + 1);

        {
            let bindings = self.bindings.borrow();
            if let Some(existing) = bindings.get(index) {
                if let Some(selector) = existing.as_any().downcast_ref::<Selector<M, P>>() {
                    selector.rebind(model, select);
                    return selector.value();
                }
            }
        }

        // First render of this slot, or the slot changed type. Evaluate the
        // projection before taking the slots mutably.
        let selector = Selector::new(model.clone(), select);
        let value = selector.value();

        let mut bindings = self.bindings.borrow_mut();
        if index < bindings.len() {
            warn!(
                id = %self.id,
                slot = index,
                model = type_name::<M>(),
                value = type_name::<P>(),
                "subscription changed type; replacing binding. \
                 Subscribe in the same order on every render."
            );
            bindings[index] = Box::new(selector);
        } else {
            bindings.push(Box::new(selector));
        }
        value
    }
}

impl Drop for Component {
    fn drop(&mut self) {
        debug!(
            id = %self.id,
            bindings = self.bindings.get_mut().len(),
            "component unmounted"
        );
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("bindings", &self.binding_count())
            .field("version", &self.version())
            .field("renders", &self.render_count())
            .finish()
    }
}

/// Access to the rendering component from inside its view.
pub struct RenderCx<'a> {
    component: &'a Component,
}

impl RenderCx<'_> {
    /// The component being rendered.
    pub fn id(&self) -> ComponentId {
        self.component.id
    }

    /// Subscribe to a projection of `model` and return its current value.
    ///
    /// The first call at this position evaluates `select`; later renders
    /// return the value settled by the most recent check. `select` must be
    /// deterministic and should return primitives or stable handles, since
    /// values are compared with [`StrictEq`].
    pub fn subscribe<M, P, F>(&mut self, model: &Observed<M>, select: F) -> P
    where
        M: Watchable,
        P: StrictEq + Clone + 'static,
        F: Fn(&Observed<M>) -> P + 'static,
    {
        self.component.subscribe(model, select)
    }

    /// Subscribe to a projection of the nearest published model of type `M`.
    ///
    /// Fails with [`Error::OutsideProvider`](crate::Error::OutsideProvider)
    /// when no model of that type is published.
    pub fn subscribe_current<M, P, F>(&mut self, select: F) -> Result<P>
    where
        M: Watchable,
        P: StrictEq + Clone + 'static,
        F: Fn(&Observed<M>) -> P + 'static,
    {
        let model = ModelContext::current::<M>()?;
        Ok(self.subscribe(&model, select))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;
    use crate::model::{publish, wrap, Field, ObservableSet};
    use crate::render::RenderQueue;
    use crate::Error;

    #[derive(Debug, Default)]
    struct Counter {
        count: i64,
        text: String,
    }

    impl Counter {
        const COUNT: Field<Self, i64> = field!(Self, count);
        const TEXT: Field<Self, String> = field!(Self, text);
    }

    impl Watchable for Counter {
        fn observable_properties(&self) -> ObservableSet {
            ObservableSet::from(["count", "text"])
        }
    }

    fn mount() -> (Rc<RenderQueue>, Component) {
        let queue = Rc::new(RenderQueue::new());
        let component = Component::mount(queue.clone());
        (queue, component)
    }

    #[test]
    fn first_render_evaluates_selector() {
        let (_queue, component) = mount();
        let counter = wrap(Counter::default());

        let value = component.render(|cx| cx.subscribe(&counter, |s| s.get(|m| m.count)));
        assert_eq!(value, 0);
        assert_eq!(component.binding_count(), 1);
        assert_eq!(component.render_count(), 1);
    }

    #[test]
    fn check_without_change_requests_nothing() {
        let (queue, component) = mount();
        let counter = wrap(Counter::default());

        component.render(|cx| cx.subscribe(&counter, |s| s.get(|m| m.count)));
        assert!(!component.check());
        assert!(queue.is_empty());
        assert_eq!(component.version(), 0);
    }

    #[test]
    fn change_requests_one_render_and_next_render_sees_it() {
        let (queue, component) = mount();
        let counter = wrap(Counter::default());

        component.render(|cx| cx.subscribe(&counter, |s| s.get(|m| m.count)));
        counter.set(Counter::COUNT, 1);

        assert!(component.check());
        assert_eq!(queue.drain(), vec![component.id()]);
        let value = component.render(|cx| cx.subscribe(&counter, |s| s.get(|m| m.count)));
        assert_eq!(value, 1);

        // Post-render check settles without another request.
        assert!(!component.check());
        assert_eq!(queue.total_requests(), 1);
    }

    #[test]
    fn several_changed_bindings_request_once() {
        let (queue, component) = mount();
        let counter = wrap(Counter::default());
        fn view(counter: &Observed<Counter>, cx: &mut RenderCx<'_>) -> (i64, String) {
            let count = cx.subscribe(counter, |s| s.get(|m| m.count));
            let text = cx.subscribe(counter, |s| s.get(|m| m.text.clone()));
            (count, text)
        }

        component.render(|cx| view(&counter, cx));
        counter.set(Counter::COUNT, 2);
        counter.set(Counter::TEXT, "hi".into());

        assert!(component.check());
        assert_eq!(queue.total_requests(), 1);
        assert_eq!(component.version(), 1);
        assert_eq!(component.render(|cx| view(&counter, cx)), (2, "hi".to_string()));
    }

    #[test]
    fn fewer_subscriptions_discard_bindings() {
        let (_queue, component) = mount();
        let counter = wrap(Counter::default());

        component.render(|cx| {
            cx.subscribe(&counter, |s| s.get(|m| m.count));
            cx.subscribe(&counter, |s| s.get(|m| m.text.clone()));
        });
        assert_eq!(component.binding_count(), 2);

        component.render(|cx| {
            cx.subscribe(&counter, |s| s.get(|m| m.count));
        });
        assert_eq!(component.binding_count(), 1);
    }

    #[test]
    fn slot_type_change_replaces_binding() {
        let (_queue, component) = mount();
        let counter = wrap(Counter::default());
        counter.set(Counter::TEXT, "abc".into());

        let count = component.render(|cx| cx.subscribe(&counter, |s| s.get(|m| m.count)));
        assert_eq!(count, 0);

        let text = component.render(|cx| cx.subscribe(&counter, |s| s.get(|m| m.text.clone())));
        assert_eq!(text, "abc");
        assert_eq!(component.binding_count(), 1);
    }

    #[test]
    fn subscribe_current_uses_published_model() {
        let (_queue, component) = mount();
        let counter = wrap(Counter::default());
        counter.set(Counter::COUNT, 7);

        let value = publish(counter, || {
            component.render(|cx| cx.subscribe_current::<Counter, _, _>(|s| s.get(|m| m.count)))
        });
        assert_eq!(value.unwrap(), 7);
    }

    #[test]
    fn subscribe_current_outside_provider_fails() {
        let (_queue, component) = mount();
        let result =
            component.render(|cx| cx.subscribe_current::<Counter, _, _>(|s| s.get(|m| m.count)));
        assert!(matches!(result, Err(Error::OutsideProvider { .. })));
    }

    #[test]
    fn unmounted_component_is_gone() {
        let (queue, component) = mount();
        let counter = wrap(Counter::default());
        component.render(|cx| cx.subscribe(&counter, |s| s.get(|m| m.count)));

        component.unmount();
        counter.set(Counter::COUNT, 1);
        assert!(queue.is_empty());
    }
}

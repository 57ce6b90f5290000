//! Render Scheduler Bridge
//!
//! Glance never renders anything itself. When a component's check cycle
//! finds a changed selector value, the component asks its
//! [`RenderScheduler`] for one more render and leaves the timing to the host.
//!
//! [`RenderQueue`] is a minimal scheduler for hosts that drive rendering in
//! frames, and for tests: it collects requests, deduplicates them in request
//! order, and hands them over on [`drain`](RenderQueue::drain).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indexmap::IndexSet;
use tracing::trace;

use super::id::ComponentId;

/// The host-side hook that re-renders components on request.
pub trait RenderScheduler {
    /// Ask for `component` to be rendered again.
    ///
    /// Called synchronously from [`Component::check`](super::Component::check).
    /// Implementations should queue the request rather than render
    /// re-entrantly.
    fn request_render(&self, component: ComponentId);
}

impl<S: RenderScheduler + ?Sized> RenderScheduler for Rc<S> {
    fn request_render(&self, component: ComponentId) {
        (**self).request_render(component);
    }
}

/// A queue of pending render requests.
#[derive(Debug, Default)]
pub struct RenderQueue {
    pending: RefCell<IndexSet<ComponentId>>,
    requests: Cell<usize>,
}

impl RenderQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all pending requests, oldest first.
    pub fn drain(&self) -> Vec<ComponentId> {
        self.pending.borrow_mut().drain(..).collect()
    }

    /// Whether `component` has a pending request.
    pub fn contains(&self, component: ComponentId) -> bool {
        self.pending.borrow().contains(&component)
    }

    /// Number of distinct components waiting to render.
    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Whether nothing is waiting to render.
    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Total requests received, including duplicates of pending ones.
    pub fn total_requests(&self) -> usize {
        self.requests.get()
    }
}

impl RenderScheduler for RenderQueue {
    fn request_render(&self, component: ComponentId) {
        self.requests.set(self.requests.get() + 1);
        let fresh = self.pending.borrow_mut().insert(component);
        trace!(%component, fresh, "render requested");
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

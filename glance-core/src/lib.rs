//! Glance Core
//!
//! This crate provides observed models and selector subscriptions for UI
//! frameworks that want components to re-render only when the part of the
//! state they display actually changes.
//! It implements:
//!
//! - Watchable models that declare which properties are observable
//! - Named fields that tie each write to the property it reaches
//! - Observed wrappers that drop writes which should not count as changes
//! - Per-component selector bindings checked after every render
//! - A context stack for publishing models to a subtree
//!
//! # Architecture
//!
//! The crate is organized into two modules:
//!
//! - `model`: the watchable contract, fields, observed wrappers, records,
//!   context
//! - `render`: components, selector bindings, the render scheduler bridge
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use glance_core::field;
//! use glance_core::model::{wrap, Field, ObservableSet, Watchable};
//! use glance_core::render::{Component, RenderQueue};
//!
//! #[derive(Default)]
//! struct Counter {
//!     count: i64,
//!     text: String,
//! }
//!
//! impl Counter {
//!     const COUNT: Field<Self, i64> = field!(Self, count);
//!     const TEXT: Field<Self, String> = field!(Self, text);
//! }
//!
//! impl Watchable for Counter {
//!     fn observable_properties(&self) -> ObservableSet {
//!         ObservableSet::from(["count", "text"])
//!     }
//! }
//!
//! let queue = Rc::new(RenderQueue::new());
//! let component = Component::mount(queue.clone());
//! let counter = wrap(Counter::default());
//!
//! let count = component.render(|cx| cx.subscribe(&counter, |s| s.get(|m| m.count)));
//! assert_eq!(count, 0);
//!
//! // An event handler writes a declared property...
//! counter.update(Counter::COUNT, |c| c + 1);
//!
//! // ...and the post-event check asks for one more render.
//! assert!(component.check());
//! assert_eq!(queue.drain(), vec![component.id()]);
//!
//! let count = component.render(|cx| cx.subscribe(&counter, |s| s.get(|m| m.count)));
//! assert_eq!(count, 1);
//!
//! // Writes to other properties never trigger this component.
//! counter.set(Counter::TEXT, "x".to_string());
//! assert!(!component.check());
//! ```

pub mod model;
pub mod render;

mod error;

pub use error::{Error, Result};
pub use model::{current, publish, wrap, Observed, Watchable};
pub use render::{Component, RenderCx};

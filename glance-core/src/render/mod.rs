//! Selective Re-rendering
//!
//! This module connects observed models to a host's render cycle.
//!
//! # Concepts
//!
//! ## Selectors
//!
//! A component subscribes to a projection of a model, such as
//! `|s| s.get(|m| m.count)`. The projection's result is cached per component
//! and compared with [`StrictEq`](crate::model::StrictEq).
//!
//! ## Check cycles
//!
//! Models do not announce writes. Instead, the host calls
//! [`Component::check`] after each render and after each event that may
//! have changed a model. A check re-runs every projection the component
//! subscribed to; if any result differs, the component requests one more
//! render from its [`RenderScheduler`].
//!
//! ## Scheduler bridge
//!
//! Rendering itself belongs to the host. [`RenderScheduler`] is the only
//! thing Glance needs from it; [`RenderQueue`] is a simple implementation.
//!
//! # Implementation Notes
//!
//! Polling keeps the re-render count exact: a component re-renders at most
//! once per detected change, no matter how many writes led to it.

mod component;
mod id;
mod scheduler;
mod selector;

pub use component::{Component, RenderCx};
pub use id::ComponentId;
pub use scheduler::{RenderQueue, RenderScheduler};
pub use selector::Selector;

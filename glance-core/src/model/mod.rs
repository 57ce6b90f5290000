//! Observed Models
//!
//! This module implements the model side of Glance: the watchable contract,
//! the observing wrapper that gates writes, dynamic records, and the context
//! stack that publishes models to a subtree.
//!
//! # Concepts
//!
//! ## Watchable models
//!
//! A model is any value that implements [`Watchable`] and names its
//! observable properties. Only writes to those properties (or to path-like
//! keys) are allowed to change the model once it is wrapped.
//!
//! ## Observed wrappers
//!
//! [`wrap`] turns a model into an [`Observed`] handle. Reads pass through;
//! writes name their target with a [`Field`] and are compared and gated on
//! the field's name. Writes that do not count are dropped quietly instead
//! of failing, so business logic can assign freely.
//!
//! ## Context
//!
//! [`publish`] and [`current`] let a subtree find the model without having
//! it passed down explicitly.
//!
//! # Implementation Notes
//!
//! Nothing here pushes notifications. A write only changes the model; the
//! components that care find out by re-running their selectors after each
//! render (see [`crate::render`]).

mod config;
mod context;
mod field;
mod proxy;
mod record;
mod watchable;

pub use config::WatchConfig;
pub use context::{current, publish, ModelContext};
pub use field::Field;
pub use proxy::{wrap, Observed, WriteOutcome};
pub use record::{KeyPolicy, Record};
pub use watchable::{ObservableSet, StrictEq, Watchable};

//! Error types.
//!
//! Very little in Glance can fail. Writes that are not allowed to count as
//! state changes are dropped, not rejected (see [`WriteOutcome`]), so the
//! only failures are looking up a model outside of any provider and building
//! a [`Record`] from a JSON value of the wrong shape.
//!
//! [`WriteOutcome`]: crate::model::WriteOutcome
//! [`Record`]: crate::model::Record

use thiserror::Error;

/// Errors reported by Glance.
#[derive(Debug, Error)]
pub enum Error {
    /// `current()` was called with no enclosing `publish` for that model type.
    #[error("`{model}` was requested outside of a provider; publish it for this subtree first")]
    OutsideProvider {
        /// Type name of the requested model.
        model: &'static str,
    },

    /// A record source was valid JSON but not an object.
    #[error("record source must be a JSON object, found {found}")]
    NotAnObject {
        /// The JSON kind that was found instead.
        found: &'static str,
    },

    /// A record source could not be deserialized.
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

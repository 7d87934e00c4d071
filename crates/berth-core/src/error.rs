//! Error types for Berth Core

use thiserror::Error;

/// Result type alias using Berth Error
pub type Result<T> = std::result::Result<T, Error>;

/// Berth error types
///
/// The lifecycle machinery never swallows a failure: an error returned by a
/// factory, a manager hook, or an event subscriber surfaces unchanged from
/// the host-signal call that triggered it, and the remaining steps of that
/// transition do not run.
#[derive(Error, Debug)]
pub enum Error {
    /// A manager factory failed while building its unit for a session
    #[error("Factory error: {0}")]
    Factory(String),

    /// A manager's attach or detach hook failed
    #[error("Manager error: {0}")]
    Manager(String),

    /// An event subscriber failed during a broadcast
    #[error("Subscriber error: {0}")]
    Subscriber(String),

    /// Any other failure surfaced through a callback
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

//! Framework errors.
//!
//! Install-time duplicates and unknown-name activations indicate wiring
//! bugs and are surfaced immediately. Events for unbound controls are not
//! errors; the dispatcher drops them silently.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("a view named `{0}` is already installed")]
    DuplicateView(String),

    #[error("no view named `{0}` is installed")]
    UnknownView(String),

    #[error("a mode named `{0}` is already installed")]
    DuplicateMode(String),

    #[error("no mode named `{0}` is installed")]
    UnknownMode(String),

    #[error("control {0:?} already has a command bound")]
    DuplicateBinding(crate::ControlId),
}

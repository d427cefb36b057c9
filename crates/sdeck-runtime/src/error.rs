#![forbid(unsafe_code)]

//! Runtime error type.
//!
//! Navigation itself never fails: invalid targets are silent no-ops. What can
//! fail is infrastructure, so the variants wrap the backend, the document
//! model, or a rejected configuration.

use std::fmt;

use sdeck_dom::DomError;

/// Error returned by [`crate::Presentation`] operations.
#[derive(Debug)]
pub enum Error<E> {
    /// The host backend failed.
    Backend(E),
    /// A document mutation failed (unknown container, detached node, ...).
    Dom(DomError),
    /// The configuration did not validate.
    InvalidConfig(Vec<String>),
}

impl<E> From<DomError> for Error<E> {
    fn from(err: DomError) -> Self {
        Self::Dom(err)
    }
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend(err) => write!(f, "backend error: {err}"),
            Self::Dom(err) => write!(f, "document error: {err}"),
            Self::InvalidConfig(problems) => {
                write!(f, "invalid configuration: {}", problems.join("; "))
            }
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for Error<E> {}

/// Result alias for runtime operations.
pub type Result<T, E> = std::result::Result<T, Error<E>>;

//! Errors raised by this crate: [`AdaptError`] is returned synchronously
//! when an adaption is set up wrongly, [`Rejection`] is what a deferred
//! result fails with.

use crate::{
    panic::{self, Payload},
    value::{Kind, Value},
};
use thiserror::Error;

/// An error detected while setting up an adaption, before any function is
/// called.
#[derive(Debug, Error)]
pub enum AdaptError {
    /// The source was neither an object nor a function.
    #[error("expected an object or a function to promisify, got {0}")]
    InvalidSource(Kind),

    /// A name pattern could not be compiled.
    #[error("invalid name pattern `{pattern}`: {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Why it was rejected.
        #[source]
        source: glob::PatternError,
    },
}

/// The reason a deferred result failed.
#[derive(Debug, Error)]
pub enum Rejection {
    /// The wrapped function threw this value, or passed it as the error
    /// argument of its callback. The value is kept as is.
    #[error("{0}")]
    Error(Value),

    /// The wrapped function panicked! And here is panic's payload.
    #[error("adapted function panicked: {}", panic::message(.0))]
    Panicked(Payload),

    /// Every handle able to settle the result was dropped before settling.
    #[error("deferred result cancelled")]
    Cancelled,
}

impl Rejection {
    /// The rejected value, unless the failure was a panic or a
    /// cancellation.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Rejection::Error(value) => Some(value),
            _ => None,
        }
    }

    /// Converts this rejection into the rejected value.
    pub fn into_value(self) -> Result<Value, Self> {
        match self {
            Rejection::Error(value) => Ok(value),
            other => Err(other),
        }
    }

    /// Tests whether the wrapped function panicked.
    pub fn is_panic(&self) -> bool {
        matches!(self, Rejection::Panicked(_))
    }

    /// Tests whether the result was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Rejection::Cancelled)
    }
}

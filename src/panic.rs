use std::{any::Any, panic};

/// Payload of a caught panic.
pub type Payload = Box<dyn Any + Send + 'static>;

/// Runs a function, catching a panic it might raise.
pub fn catch<F, T>(function: F) -> Result<T, Payload>
where
    F: FnOnce() -> T,
{
    panic::catch_unwind(panic::AssertUnwindSafe(function))
}

/// Best-effort description of a panic payload.
pub fn message(payload: &Payload) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "Box<dyn Any>"
    }
}

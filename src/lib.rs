//! This crate adapts functions following the callback-last, error-first
//! convention into functions returning deferred results (futures), either one
//! at a time or every selected member of an object at once.

#![warn(missing_docs)]

mod panic;

mod macros;

pub mod adapt;
pub mod all;
pub mod error;
pub mod matcher;
pub mod options;
pub mod promise;
pub mod value;

pub use adapt::{promisify, shape, Adapted};
pub use all::{
    promisify_all,
    promisify_all_by,
    promisify_all_with,
    promisify_call,
};
pub use error::{AdaptError, Rejection};
pub use matcher::{MatchOptions, Matcher, Pattern};
pub use options::{Options, Selector};
pub use panic::Payload;
pub use promise::{
    default_promise,
    set_default_promise,
    Deferred,
    LocalPromise,
    OneshotPromise,
    PromiseImpl,
};
pub use value::{Function, Kind, Object, Value};

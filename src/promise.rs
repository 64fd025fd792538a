//! This module defines deferred results: the handle returned by adapted
//! functions, and the replaceable implementations producing them.

mod local;
mod oneshot;

use crate::{error::Rejection, value::Value};
use futures::future::LocalBoxFuture;
use std::{cell::RefCell, fmt, future::Future, pin::Pin, rc::Rc, task};

pub use local::LocalPromise;
pub use oneshot::OneshotPromise;

/// What a deferred result completes with.
pub type Outcome = Result<Value, Rejection>;

/// Settles a deferred result. Dropping it without calling it cancels the
/// result.
pub type Settler = Box<dyn FnOnce(Outcome)>;

/// An implementation of deferred results.
///
/// Implementations only need to provide a oneshot channel: the settling
/// side and the future completing once the settling side was used (or
/// dropped, in which case the future must complete with
/// [`Rejection::Cancelled`]).
pub trait PromiseImpl {
    /// Name of this implementation, recorded in every [`Deferred`] it
    /// produces.
    fn name(&self) -> &str;

    /// Creates a new channel.
    fn channel(&self) -> (Settler, LocalBoxFuture<'static, Outcome>);
}

impl fmt::Debug for dyn PromiseImpl {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        write!(fmtr, "PromiseImpl({})", self.name())
    }
}

thread_local! {
    static DEFAULT: RefCell<Option<Rc<dyn PromiseImpl>>> = RefCell::new(None);
}

/// Replaces the default implementation used by adapted functions that were
/// given none, for the current thread. `None` restores [`LocalPromise`].
///
/// This is global mutable state: the last write wins, and it is read at
/// every invocation of an adapted function, not when adapting.
pub fn set_default_promise(promise: Option<Rc<dyn PromiseImpl>>) {
    DEFAULT.with(|default| *default.borrow_mut() = promise);
}

/// The implementation used when none was given explicitly.
pub fn default_promise() -> Rc<dyn PromiseImpl> {
    DEFAULT
        .with(|default| default.borrow().clone())
        .unwrap_or_else(|| Rc::new(LocalPromise))
}

/// Creates a deferred result with the given implementation, returning it
/// together with its settler.
pub fn deferred(promise: &dyn PromiseImpl) -> (Settler, Deferred) {
    let (settler, future) = promise.channel();
    let deferred = Deferred { future, promise_name: Rc::from(promise.name()) };
    (settler, deferred)
}

/// A handle to a value that might not be available yet. Await it to get
/// the value or the reason of failure.
pub struct Deferred {
    future: LocalBoxFuture<'static, Outcome>,
    promise_name: Rc<str>,
}

impl Deferred {
    /// Creates a deferred result already resolved with a value.
    pub fn resolved(promise: &dyn PromiseImpl, value: Value) -> Self {
        let (settler, deferred) = deferred(promise);
        settler(Ok(value));
        deferred
    }

    /// Creates a deferred result already rejected.
    pub fn rejected(promise: &dyn PromiseImpl, rejection: Rejection) -> Self {
        let (settler, deferred) = deferred(promise);
        settler(Err(rejection));
        deferred
    }

    /// Name of the implementation which produced this result.
    pub fn promise_name(&self) -> &str {
        &self.promise_name
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        fmtr.debug_struct("Deferred")
            .field("promise", &self.promise_name)
            .finish_non_exhaustive()
    }
}

impl Future for Deferred {
    type Output = Outcome;

    fn poll(
        mut self: Pin<&mut Self>,
        ctx: &mut task::Context<'_>,
    ) -> task::Poll<Self::Output> {
        self.future.as_mut().poll(ctx)
    }
}

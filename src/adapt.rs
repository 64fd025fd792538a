//! This module implements the single-function adapter: it turns a
//! callback-style [`Function`] into an [`Adapted`] function returning
//! [`Deferred`] results.

use crate::{
    error::Rejection,
    panic,
    promise::{self, default_promise, Deferred, Outcome, PromiseImpl, Settler},
    value::{Function, Object, Value, WeakObject},
};
use std::{cell::RefCell, fmt, rc::Rc};
use tracing::{debug, trace, warn};

/// Adapts a callback-style function. The given implementation, if any, is
/// the initial value of the adapted function's own implementation override
/// (see [`Adapted::set_promise`]).
///
/// # Examples
///
/// ```
/// use futures::executor::block_on;
/// use promisify::{promisify, Function, Value};
///
/// let read = Function::new("read", 2, |_this, args| {
///     let (args, callback) = Function::split_callback(args);
///     let path = args.first().cloned().unwrap_or_default();
///     if let Some(callback) = callback {
///         callback.invoke(vec![Value::Null, path])?;
///     }
///     Ok(Value::Undefined)
/// });
///
/// let adapted = promisify(read, None);
/// let contents = block_on(adapted.call(vec!["a.txt".into()])).unwrap();
/// assert_eq!(contents, Value::from("a.txt"));
/// ```
pub fn promisify(
    function: Function,
    promise: Option<Rc<dyn PromiseImpl>>,
) -> Adapted {
    Adapted::new(function, Receiver::CallSite, promise)
}

/// Collapses the non-error arguments a callback was called with into the
/// value a deferred result resolves to: nothing becomes `undefined`, a
/// single value stays as is, and several values become a list in callback
/// order.
pub fn shape(mut results: Vec<Value>) -> Value {
    match results.len() {
        0 => Value::Undefined,
        1 => results.pop().unwrap_or_default(),
        _ => Value::List(results),
    }
}

#[derive(Clone)]
enum Receiver {
    CallSite,
    Bound(Value),
    // Members adapted into their own source object must not keep it alive.
    Source(WeakObject),
}

struct Inner {
    function: Function,
    receiver: Receiver,
    promise: RefCell<Option<Rc<dyn PromiseImpl>>>,
}

/// A callback-style function adapted to return deferred results.
///
/// Every call appends a fresh callback to the caller's arguments and
/// invokes the wrapped function with it. The returned [`Deferred`] settles
/// with whichever happens first:
///
/// - the function returns a value other than `undefined` (or the appended
///   callback itself): resolved with that value, which covers synchronous
///   functions ignoring the callback;
/// - the function fails (returns `Err`) or panics: rejected;
/// - the callback is called: rejected with its first argument if that is
///   truthy, otherwise resolved with the rest, collapsed by [`shape`].
///
/// Anything happening after the first settlement is ignored. If the
/// function returns `undefined` and drops the callback without calling it,
/// the result is [`Rejection::Cancelled`].
///
/// Cloning an `Adapted` shares it, including its implementation override.
/// Use [`Adapted::rebind`] to get an independent one.
#[derive(Clone)]
pub struct Adapted {
    inner: Rc<Inner>,
}

impl Adapted {
    fn new(
        function: Function,
        receiver: Receiver,
        promise: Option<Rc<dyn PromiseImpl>>,
    ) -> Self {
        let inner =
            Inner { function, receiver, promise: RefCell::new(promise) };
        Self { inner: Rc::new(inner) }
    }

    /// Adapts a function so that it is always called with the given
    /// receiver, however the adapted function is called.
    pub fn bound(
        function: Function,
        receiver: Value,
        promise: Option<Rc<dyn PromiseImpl>>,
    ) -> Self {
        Self::new(function, Receiver::Bound(receiver), promise)
    }

    /// Binds to an object without keeping it alive. Once the object is
    /// gone, calls get an undefined receiver.
    pub(crate) fn bound_to_source(
        function: Function,
        source: &Object,
        promise: Option<Rc<dyn PromiseImpl>>,
    ) -> Self {
        Self::new(function, Receiver::Source(source.downgrade()), promise)
    }

    /// Adapts the wrapped function again, independently of this one. The
    /// new function is bound to `receiver` if given, otherwise it keeps this
    /// one's binding. Its own implementation override starts as `promise`.
    pub fn rebind(
        &self,
        receiver: Option<Value>,
        promise: Option<Rc<dyn PromiseImpl>>,
    ) -> Self {
        let receiver = match receiver {
            Some(receiver) => Receiver::Bound(receiver),
            None => self.inner.receiver.clone(),
        };
        Self::new(self.inner.function.clone(), receiver, promise)
    }

    /// The wrapped function.
    pub fn function(&self) -> &Function {
        &self.inner.function
    }

    /// The receiver bound at adaption time, if any. A member adapted into
    /// its own source object reports that object while it is alive.
    pub fn receiver(&self) -> Option<Value> {
        match &self.inner.receiver {
            Receiver::CallSite => None,
            Receiver::Bound(receiver) => Some(receiver.clone()),
            Receiver::Source(source) => source.upgrade().map(Value::Object),
        }
    }

    /// This function's own implementation override.
    pub fn promise(&self) -> Option<Rc<dyn PromiseImpl>> {
        self.inner.promise.borrow().clone()
    }

    /// Replaces this function's own implementation override. It takes
    /// priority over the thread default, and applies from the next call on.
    /// `None` falls back to the default again.
    pub fn set_promise(&self, promise: Option<Rc<dyn PromiseImpl>>) {
        *self.inner.promise.borrow_mut() = promise;
    }

    /// Calls the adapted function with an undefined receiver, unless one was
    /// bound.
    pub fn call(&self, args: Vec<Value>) -> Deferred {
        self.call_method(&Value::Undefined, args)
    }

    /// Calls the adapted function as a method of `this`. A receiver bound at
    /// adaption time takes precedence.
    pub fn call_method(
        &self,
        this: &Value,
        mut args: Vec<Value>,
    ) -> Deferred {
        let function = &self.inner.function;
        let promise = self.promise().unwrap_or_else(default_promise);
        let (settler, deferred) = promise::deferred(&*promise);

        let settle = Rc::new(SettleOnce::new(function.name(), settler));
        let callback = settle.callback();

        trace!(
            function = function.name(),
            supplied = args.len(),
            arity = function.arity(),
            promise = promise.name(),
            "invoking adapted function"
        );

        let receiver = match &self.inner.receiver {
            Receiver::CallSite => this.clone(),
            Receiver::Bound(receiver) => receiver.clone(),
            Receiver::Source(source) => {
                source.upgrade().map_or(Value::Undefined, Value::Object)
            },
        };
        args.push(Value::Function(callback.clone()));

        match panic::catch(|| function.call(&receiver, args)) {
            Ok(Ok(returned)) => {
                let is_callback = matches!(
                    &returned,
                    Value::Function(returned) if returned.ptr_eq(&callback)
                );
                if !returned.is_undefined() && !is_callback {
                    settle.settle(Ok(returned), "return");
                }
            },
            Ok(Err(thrown)) => {
                settle.settle(Err(Rejection::Error(thrown)), "throw");
            },
            Err(payload) => {
                warn!(
                    function = function.name(),
                    panic = panic::message(&payload),
                    "adapted function panicked"
                );
                settle.settle(Err(Rejection::Panicked(payload)), "panic");
            },
        }

        deferred
    }

    /// Tests whether both handles point to the same adapted function.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Adapted {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        fmtr.debug_struct("Adapted")
            .field("function", &self.inner.function)
            .field(
                "bound",
                &!matches!(self.inner.receiver, Receiver::CallSite),
            )
            .field("promise", &self.promise())
            .finish()
    }
}

struct SettleOnce {
    function: String,
    settler: RefCell<Option<Settler>>,
}

impl SettleOnce {
    fn new(function: &str, settler: Settler) -> Self {
        Self {
            function: function.to_owned(),
            settler: RefCell::new(Some(settler)),
        }
    }

    fn settle(&self, outcome: Outcome, via: &'static str) {
        let settler = self.settler.borrow_mut().take();
        match settler {
            Some(settler) => settler(outcome),
            None => debug!(
                function = %self.function,
                via,
                "deferred result already settled, ignoring"
            ),
        }
    }

    fn callback(self: &Rc<Self>) -> Function {
        let this = self.clone();
        Function::new("callback", 1, move |_, args| {
            let mut args = args.into_iter();
            let error = args.next().unwrap_or_default();
            if error.is_truthy() {
                this.settle(Err(Rejection::Error(error)), "callback");
            } else {
                this.settle(Ok(shape(args.collect())), "callback");
            }
            Ok(Value::Undefined)
        })
    }
}

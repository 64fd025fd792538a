//! This module implements the bulk adapter, promisifying every selected
//! member of an object at once, and the call-or-wrap entry point.

use crate::{
    adapt::{promisify, Adapted},
    error::AdaptError,
    matcher::{Matcher, Pattern},
    options::{Options, Selector},
    promise::{default_promise, Deferred},
    value::{Object, Value},
};
use tracing::debug;

/// Promisifies every function member of an object, or a single function.
///
/// # Examples
///
/// ```
/// use promisify::{object, promisify_all, Function, Value};
///
/// let double = Function::new("double", 2, |_this, args| {
///     let value = args[0].as_number().unwrap_or(0.0);
///     Ok(Value::from(value * 2.0))
/// });
/// let source = Value::from(object! { "double" => double, "limit" => 10 });
///
/// let adapted = promisify_all(&source).unwrap();
/// let adapted = adapted.as_object().unwrap();
/// assert!(adapted.get("double").unwrap().as_adapted().is_some());
/// assert_eq!(adapted.get("limit"), Some(Value::from(10)));
/// ```
pub fn promisify_all(source: &Value) -> Result<Value, AdaptError> {
    promisify_all_with(source, None, Options::default())
}

/// Promisifies the function members of an object selected either by a
/// pattern or with options. See [`Selector`].
pub fn promisify_all_by<S>(
    source: &Value,
    selector: S,
) -> Result<Value, AdaptError>
where
    S: Into<Selector>,
{
    let (pattern, options) = selector.into().into_parts();
    promisify_all_with(source, pattern, options)
}

/// Promisifies the function members of an object whose names match a
/// pattern (all of them without one).
///
/// Selected function members are replaced by [`Adapted`] functions bound to
/// `options.context`, or to the source object. When `options.dest` is the
/// source itself, members hold the source weakly. Every other member is
/// copied as is. If the source is a single function, it is adapted directly,
/// bound to `options.context` only if that is set. An already adapted
/// function is returned as is, unless `options.context` or `options.promise`
/// is set: then it is rebound with them (see [`Adapted::rebind`]), keeping
/// its binding and override for whichever is unset.
///
/// # Errors
///
/// Fails if the source is neither an object nor a function, or if the
/// pattern is not a valid glob.
pub fn promisify_all_with(
    source: &Value,
    pattern: Option<Pattern>,
    options: Options,
) -> Result<Value, AdaptError> {
    let Options { dest, context, promise, matcher } = options;

    let object = match source {
        Value::Function(function) => {
            let adapted = match context {
                Some(receiver) => {
                    Adapted::bound(function.clone(), receiver, promise)
                },
                None => promisify(function.clone(), promise),
            };
            return Ok(Value::Adapted(adapted));
        },
        Value::Adapted(adapted) => {
            if context.is_none() && promise.is_none() {
                return Ok(source.clone());
            }
            let promise = promise.or_else(|| adapted.promise());
            return Ok(Value::Adapted(adapted.rebind(context, promise)));
        },
        Value::Object(object) => object,
        other => return Err(AdaptError::InvalidSource(other.kind())),
    };

    let matcher = Matcher::new(pattern.as_ref(), matcher)?;
    let dest = dest.unwrap_or_else(Object::new);
    let in_place = dest.ptr_eq(object);

    let mut adapted = 0;
    for (key, value) in object.entries() {
        match value {
            Value::Function(function) if matcher.is_match(&key) => {
                let promise = promise.clone();
                let member = match &context {
                    Some(receiver) => {
                        Adapted::bound(function, receiver.clone(), promise)
                    },
                    None if in_place => {
                        Adapted::bound_to_source(function, object, promise)
                    },
                    None => Adapted::bound(function, source.clone(), promise),
                };
                dest.set(key, member);
                adapted += 1;
            },
            other => {
                dest.set(key, other);
            },
        }
    }

    debug!(
        members = object.len(),
        adapted,
        in_place,
        matcher = ?matcher,
        "promisified object members"
    );

    Ok(Value::Object(dest))
}

/// Calls a callback-style function with the given arguments, getting a
/// deferred result, or wraps plain values into a resolved one.
///
/// If `head` is a function it is adapted and called with `rest` (an adapted
/// function is just called). Otherwise the result resolves to `head` when
/// `rest` is empty, or to the list of all arguments, `head` included.
///
/// # Examples
///
/// ```
/// use futures::executor::block_on;
/// use promisify::{promisify_call, Value};
///
/// let single = block_on(promisify_call("foo".into(), vec![])).unwrap();
/// assert_eq!(single, Value::from("foo"));
///
/// let many = block_on(promisify_call(1.into(), vec![2.into()])).unwrap();
/// assert_eq!(many, Value::List(vec![1.into(), 2.into()]));
/// ```
pub fn promisify_call(head: Value, rest: Vec<Value>) -> Deferred {
    match head {
        Value::Function(function) => promisify(function, None).call(rest),
        Value::Adapted(adapted) => adapted.call(rest),
        value if rest.is_empty() => {
            Deferred::resolved(&*default_promise(), value)
        },
        value => {
            let mut all = Vec::with_capacity(rest.len() + 1);
            all.push(value);
            all.extend(rest);
            Deferred::resolved(&*default_promise(), Value::List(all))
        },
    }
}

//! This module defines the dynamic values flowing through adapted functions:
//! arguments, callback results, thrown errors and the objects whose members
//! get promisified.

mod function;
mod object;

use crate::adapt::Adapted;
use std::{error::Error as StdError, fmt, io, rc::Rc};

pub use function::Function;
pub use object::Object;
pub(crate) use object::WeakObject;

/// Classification of a [`Value`], used when validating inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The missing value.
    Undefined,
    /// The explicit empty value.
    Null,
    /// A boolean.
    Bool,
    /// A number.
    Number,
    /// A string.
    String,
    /// A byte buffer.
    Bytes,
    /// An ordered list.
    List,
    /// A mapping of named members.
    Object,
    /// A callback-style function.
    Function,
    /// A function already adapted to return deferred results.
    Adapted,
    /// An error value.
    Error,
}

impl fmt::Display for Kind {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Kind::Undefined => "undefined",
            Kind::Null => "null",
            Kind::Bool => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Bytes => "bytes",
            Kind::List => "list",
            Kind::Object => "object",
            Kind::Function => "function",
            Kind::Adapted => "adapted function",
            Kind::Error => "error",
        };
        fmtr.write_str(name)
    }
}

/// A dynamically typed value.
///
/// Reference-like variants ([`Object`], [`Function`], [`Adapted`] and
/// errors) are cheap to clone and clones share identity, which is what
/// [`Value::same`] checks.
#[derive(Clone, Default)]
pub enum Value {
    /// The missing value, also the result of a callback called with no
    /// results.
    #[default]
    Undefined,
    /// The explicit empty value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    String(String),
    /// A byte buffer.
    Bytes(Vec<u8>),
    /// An ordered list.
    List(Vec<Value>),
    /// A mapping of named members.
    Object(Object),
    /// A callback-style function.
    Function(Function),
    /// A function returning deferred results.
    Adapted(Adapted),
    /// An error value, usually thrown by a function or passed as the first
    /// argument of a callback.
    Error(Rc<dyn StdError>),
}

impl Value {
    /// Creates an error value from any error.
    pub fn error<E>(error: E) -> Self
    where
        E: StdError + 'static,
    {
        Value::Error(Rc::new(error))
    }

    /// Creates an error value carrying only a message.
    pub fn error_msg<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Value::error(Message(message.into()))
    }

    /// Creates a byte buffer value.
    pub fn bytes<B>(bytes: B) -> Self
    where
        B: Into<Vec<u8>>,
    {
        Value::Bytes(bytes.into())
    }

    /// Classifies this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Undefined => Kind::Undefined,
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Bytes(_) => Kind::Bytes,
            Value::List(_) => Kind::List,
            Value::Object(_) => Kind::Object,
            Value::Function(_) => Kind::Function,
            Value::Adapted(_) => Kind::Adapted,
            Value::Error(_) => Kind::Error,
        }
    }

    /// Tests whether this value counts as "set" in the error position of a
    /// callback. `undefined`, `null`, `false`, `0`, `NaN` and the empty
    /// string are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(value) => *value,
            Value::Number(number) => *number != 0.0 && !number.is_nan(),
            Value::String(string) => !string.is_empty(),
            _ => true,
        }
    }

    /// Tests whether this is [`Value::Undefined`].
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Identity comparison. Primitives compare by value, everything else by
    /// reference: two lists with the same contents are not the same value,
    /// but two clones of one object are.
    pub fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(left), Value::Bool(right)) => left == right,
            (Value::Number(left), Value::Number(right)) => left == right,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Object(left), Value::Object(right)) => left.ptr_eq(right),
            (Value::Function(left), Value::Function(right)) => {
                left.ptr_eq(right)
            },
            (Value::Adapted(left), Value::Adapted(right)) => {
                left.ptr_eq(right)
            },
            (Value::Error(left), Value::Error(right)) => {
                Rc::ptr_eq(left, right)
            },
            _ => false,
        }
    }

    /// Returns the string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(string) => Some(string),
            _ => None,
        }
    }

    /// Returns the number, if this is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns the byte buffer, if this is one.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the list elements, if this is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Returns the object, if this is one.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the callback-style function, if this is one.
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Returns the adapted function, if this is one.
    pub fn as_adapted(&self) -> Option<&Adapted> {
        match self {
            Value::Adapted(adapted) => Some(adapted),
            _ => None,
        }
    }

    /// Returns the error, if this is one.
    pub fn as_error(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Value::Error(error) => Some(&**error),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bytes(left), Value::Bytes(right)) => left == right,
            (Value::List(left), Value::List(right)) => left == right,
            (Value::Object(left), Value::Object(right)) => {
                left.ptr_eq(right) || left.entries() == right.entries()
            },
            _ => self.same(other),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Undefined => fmtr.write_str("undefined"),
            Value::Null => fmtr.write_str("null"),
            Value::Bool(value) => write!(fmtr, "{}", value),
            Value::Number(number) => write!(fmtr, "{}", number),
            Value::String(string) => write!(fmtr, "{:?}", string),
            Value::Bytes(bytes) => write!(fmtr, "<Bytes {:?}>", bytes),
            Value::List(list) => fmtr.debug_list().entries(list).finish(),
            Value::Object(object) => write!(fmtr, "{:?}", object),
            Value::Function(function) => write!(fmtr, "{:?}", function),
            Value::Adapted(adapted) => write!(fmtr, "{:?}", adapted),
            Value::Error(error) => write!(fmtr, "[Error: {}]", error),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::String(string) => fmtr.write_str(string),
            Value::Error(error) => write!(fmtr, "{}", error),
            other => write!(fmtr, "{:?}", other),
        }
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Undefined
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(number: $ty) -> Self {
                    Value::Number(number as f64)
                }
            }
        )*
    };
}

number_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<'s> From<&'s str> for Value {
    fn from(string: &'s str) -> Self {
        Value::String(string.to_owned())
    }
}

impl From<String> for Value {
    fn from(string: String) -> Self {
        Value::String(string)
    }
}

impl From<Vec<Value>> for Value {
    fn from(list: Vec<Value>) -> Self {
        Value::List(list)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Value::Function(function)
    }
}

impl From<Adapted> for Value {
    fn from(adapted: Adapted) -> Self {
        Value::Adapted(adapted)
    }
}

impl From<io::Error> for Value {
    fn from(error: io::Error) -> Self {
        Value::error(error)
    }
}

#[derive(Debug)]
struct Message(String);

impl fmt::Display for Message {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        fmtr.write_str(&self.0)
    }
}

impl StdError for Message {}

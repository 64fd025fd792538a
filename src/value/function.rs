use crate::value::Value;
use std::{fmt, rc::Rc};

type Body = dyn Fn(&Value, Vec<Value>) -> Result<Value, Value>;

struct Inner {
    name: String,
    arity: usize,
    body: Box<Body>,
}

/// A callback-style function: it receives a receiver (`this`) and positional
/// arguments, and either returns a value or fails with a thrown value.
///
/// Asynchronous functions take an error-first callback as their last
/// argument and call it once they are done; synchronous ones simply return.
/// Cloning a `Function` shares it.
#[derive(Clone)]
pub struct Function {
    inner: Rc<Inner>,
}

impl Function {
    /// Creates a function with a name, the number of declared positional
    /// parameters (callback included, if any), and a body.
    ///
    /// # Examples
    ///
    /// ```
    /// use promisify::{Function, Value};
    ///
    /// let add = Function::new("add", 3, |_this, args| {
    ///     let (args, callback) = Function::split_callback(args);
    ///     let sum: f64 = args.iter().filter_map(Value::as_number).sum();
    ///     if let Some(callback) = callback {
    ///         callback.invoke(vec![Value::Null, sum.into()])?;
    ///     }
    ///     Ok(Value::Undefined)
    /// });
    /// assert_eq!(add.arity(), 3);
    /// ```
    pub fn new<S, F>(name: S, arity: usize, body: F) -> Self
    where
        S: Into<String>,
        F: Fn(&Value, Vec<Value>) -> Result<Value, Value> + 'static,
    {
        Self {
            inner: Rc::new(Inner {
                name: name.into(),
                arity,
                body: Box::new(body),
            }),
        }
    }

    /// Name given at creation.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Number of declared positional parameters.
    pub fn arity(&self) -> usize {
        self.inner.arity
    }

    /// Calls this function with the given receiver.
    pub fn call(&self, this: &Value, args: Vec<Value>) -> Result<Value, Value> {
        (self.inner.body)(this, args)
    }

    /// Calls this function with an undefined receiver.
    pub fn invoke(&self, args: Vec<Value>) -> Result<Value, Value> {
        self.call(&Value::Undefined, args)
    }

    /// Tests whether both handles point to the same function.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Separates a trailing function from the rest of the arguments, the
    /// usual first step of a callback-style body.
    pub fn split_callback(mut args: Vec<Value>) -> (Vec<Value>, Option<Self>) {
        if matches!(args.last(), Some(Value::Function(_))) {
            if let Some(Value::Function(callback)) = args.pop() {
                return (args, Some(callback));
            }
        }
        (args, None)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        write!(fmtr, "[Function: {}/{}]", self.name(), self.arity())
    }
}

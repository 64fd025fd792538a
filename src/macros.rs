//! This module defines macros.

/// Builds an [`Object`](crate::Object) from `key => value` pairs. Syntax:
/// ```ignore
/// object! { $($key => $value),* }
/// ```
/// Keys are converted into `String`s and values into
/// [`Value`](crate::Value)s using `From`.
///
/// # Examples
///
/// ```
/// use promisify::{object, Value};
/// let object = object! { "name" => "relay", "retries" => 3 };
/// assert_eq!(object.keys(), ["name", "retries"]);
/// assert_eq!(object.get("retries"), Some(Value::from(3)));
/// ```
#[macro_export]
macro_rules! object {
    ($($key:expr => $value:expr),* $(,)?) => {
        $crate::Object::from_entries(::std::vec![
            $((
                ::std::string::String::from($key),
                $crate::Value::from($value),
            )),*
        ])
    };
}

/// Builds an argument list, a `Vec` of [`Value`](crate::Value)s, converting
/// each argument using `From`. Syntax:
/// ```ignore
/// args![$($arguments),*]
/// ```
///
/// # Examples
///
/// ```
/// use promisify::{args, Value};
/// let args = args!["path", 2, true];
/// assert_eq!(args[1], Value::from(2));
/// ```
#[macro_export]
macro_rules! args {
    ($($argument:expr),* $(,)?) => {
        ::std::vec![$($crate::Value::from($argument)),*]
    };
}

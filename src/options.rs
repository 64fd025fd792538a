//! Configuration of bulk adaptions.

use crate::{
    matcher::{MatchOptions, Pattern},
    promise::PromiseImpl,
    value::{Object, Value},
};
use regex::Regex;
use std::rc::Rc;

/// Options of [`promisify_all_with`](crate::promisify_all_with).
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Object receiving the members, instead of a fresh one. Members it
    /// already has are kept unless the source has a member of the same name.
    pub dest: Option<Object>,
    /// Receiver bound to every adapted member. Defaults to the source object
    /// itself. When the source is a single function, nothing is bound unless
    /// this is set.
    pub context: Option<Value>,
    /// Deferred result implementation of every adapted member. When unset,
    /// the thread default is read at each call.
    pub promise: Option<Rc<dyn PromiseImpl>>,
    /// Options forwarded to name matching.
    pub matcher: MatchOptions,
}

/// The second argument of
/// [`promisify_all_by`](crate::promisify_all_by): either a pattern or
/// options. Anything convertible into a [`Pattern`] is a pattern.
#[derive(Debug, Clone)]
pub enum Selector {
    /// Select members by name, with default options.
    Pattern(Pattern),
    /// Select every member, with these options.
    Options(Options),
}

impl Selector {
    /// Splits this selector into the arguments of
    /// [`promisify_all_with`](crate::promisify_all_with).
    pub fn into_parts(self) -> (Option<Pattern>, Options) {
        match self {
            Selector::Pattern(pattern) => (Some(pattern), Options::default()),
            Selector::Options(options) => (None, options),
        }
    }
}

impl From<Options> for Selector {
    fn from(options: Options) -> Self {
        Selector::Options(options)
    }
}

impl From<Pattern> for Selector {
    fn from(pattern: Pattern) -> Self {
        Selector::Pattern(pattern)
    }
}

impl<'s> From<&'s str> for Selector {
    fn from(glob: &'s str) -> Self {
        Selector::Pattern(glob.into())
    }
}

impl From<String> for Selector {
    fn from(glob: String) -> Self {
        Selector::Pattern(glob.into())
    }
}

impl<'s> From<Vec<&'s str>> for Selector {
    fn from(globs: Vec<&'s str>) -> Self {
        Selector::Pattern(globs.into())
    }
}

impl From<Vec<String>> for Selector {
    fn from(globs: Vec<String>) -> Self {
        Selector::Pattern(globs.into())
    }
}

impl From<Regex> for Selector {
    fn from(regex: Regex) -> Self {
        Selector::Pattern(regex.into())
    }
}

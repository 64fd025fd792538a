//! This module turns member name patterns into filters deciding which
//! members of an object get promisified.

use crate::error::AdaptError;
use regex::Regex;
use std::{fmt, rc::Rc};

/// A specification of member names.
#[derive(Clone)]
pub enum Pattern {
    /// A glob, such as `read*`. A leading `!` negates it.
    Glob(String),
    /// Several globs: a name matches if it matches any non-negated glob and
    /// no negated one. With only negated globs, every name not excluded
    /// matches.
    Globs(Vec<String>),
    /// A regular expression, searched for in the name.
    Regex(Regex),
    /// A custom predicate.
    Predicate(Rc<dyn Fn(&str) -> bool>),
}

impl Pattern {
    /// Creates a pattern from a custom predicate.
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + 'static,
    {
        Pattern::Predicate(Rc::new(predicate))
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Pattern::Glob(glob) => write!(fmtr, "Glob({:?})", glob),
            Pattern::Globs(globs) => write!(fmtr, "Globs({:?})", globs),
            Pattern::Regex(regex) => {
                write!(fmtr, "Regex({:?})", regex.as_str())
            },
            Pattern::Predicate(_) => fmtr.write_str("Predicate(..)"),
        }
    }
}

impl<'s> From<&'s str> for Pattern {
    fn from(glob: &'s str) -> Self {
        Pattern::Glob(glob.to_owned())
    }
}

impl From<String> for Pattern {
    fn from(glob: String) -> Self {
        Pattern::Glob(glob)
    }
}

impl<'s> From<Vec<&'s str>> for Pattern {
    fn from(globs: Vec<&'s str>) -> Self {
        Pattern::Globs(globs.into_iter().map(str::to_owned).collect())
    }
}

impl From<Vec<String>> for Pattern {
    fn from(globs: Vec<String>) -> Self {
        Pattern::Globs(globs)
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Pattern::Regex(regex)
    }
}

/// Options forwarded to glob matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Whether letter case must match. Defaults to `true`.
    pub case_sensitive: bool,
    /// Whether wildcards match a leading `.` in a name. Defaults to `false`:
    /// `*` does not match `.hidden`, but `.*` does.
    pub dot: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self { case_sensitive: true, dot: false }
    }
}

impl From<MatchOptions> for glob::MatchOptions {
    fn from(options: MatchOptions) -> Self {
        glob::MatchOptions {
            case_sensitive: options.case_sensitive,
            require_literal_separator: false,
            require_literal_leading_dot: !options.dot,
        }
    }
}

#[derive(Clone)]
enum Filter {
    All,
    Globs {
        include: Vec<glob::Pattern>,
        exclude: Vec<glob::Pattern>,
        options: glob::MatchOptions,
    },
    Regex(Regex),
    Predicate(Rc<dyn Fn(&str) -> bool>),
}

/// A compiled [`Pattern`].
#[derive(Clone)]
pub struct Matcher {
    filter: Filter,
}

impl Matcher {
    /// A matcher accepting every name.
    pub fn all() -> Self {
        Self { filter: Filter::All }
    }

    /// Compiles a pattern. Without one, every name matches.
    pub fn new(
        pattern: Option<&Pattern>,
        options: MatchOptions,
    ) -> Result<Self, AdaptError> {
        let filter = match pattern {
            None => Filter::All,
            Some(Pattern::Glob(glob)) => {
                compile_globs(std::slice::from_ref(glob), options)?
            },
            Some(Pattern::Globs(globs)) => compile_globs(globs, options)?,
            Some(Pattern::Regex(regex)) => Filter::Regex(regex.clone()),
            Some(Pattern::Predicate(predicate)) => {
                Filter::Predicate(predicate.clone())
            },
        };
        Ok(Self { filter })
    }

    /// Tests whether a member name is selected.
    pub fn is_match(&self, name: &str) -> bool {
        match &self.filter {
            Filter::All => true,
            Filter::Globs { include, exclude, options } => {
                let included = include.is_empty()
                    || include
                        .iter()
                        .any(|glob| glob.matches_with(name, *options));
                included
                    && !exclude
                        .iter()
                        .any(|glob| glob.matches_with(name, *options))
            },
            Filter::Regex(regex) => regex.is_match(name),
            Filter::Predicate(predicate) => predicate(name),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        match &self.filter {
            Filter::All => fmtr.write_str("Matcher(*)"),
            Filter::Globs { include, exclude, .. } => fmtr
                .debug_struct("Matcher")
                .field("include", include)
                .field("exclude", exclude)
                .finish(),
            Filter::Regex(regex) => write!(fmtr, "Matcher(/{}/)", regex),
            Filter::Predicate(_) => fmtr.write_str("Matcher(..)"),
        }
    }
}

fn compile_globs(
    globs: &[String],
    options: MatchOptions,
) -> Result<Filter, AdaptError> {
    let mut include = Vec::new();
    let mut exclude = Vec::new();

    for spec in globs {
        let (negated, source) = match spec.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, spec.as_str()),
        };
        let compiled = glob::Pattern::new(source).map_err(|source| {
            AdaptError::Pattern { pattern: spec.clone(), source }
        })?;
        if negated {
            exclude.push(compiled);
        } else {
            include.push(compiled);
        }
    }

    // A list made of negations only selects everything they leave out, but
    // an empty list selects nothing.
    if include.is_empty() && exclude.is_empty() {
        return Ok(Filter::Predicate(Rc::new(|_: &str| false)));
    }

    Ok(Filter::Globs { include, exclude, options: options.into() })
}

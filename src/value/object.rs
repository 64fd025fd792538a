use crate::value::Value;
use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

/// A shared mapping of named members. Members keep insertion order, and
/// replacing a member keeps its original position.
///
/// Cloning an `Object` shares it: changes through one handle are visible
/// through every other.
#[derive(Clone, Default)]
pub struct Object {
    members: Rc<RefCell<Vec<(String, Value)>>>,
}

impl Object {
    /// Creates an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an object from key-value pairs. Later duplicates replace
    /// earlier ones.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let object = Self::new();
        for (key, value) in entries {
            object.set(key, value);
        }
        object
    }

    /// Returns a member's value.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.members
            .borrow()
            .iter()
            .find(|(member, _)| member == key)
            .map(|(_, value)| value.clone())
    }

    /// Sets a member, returning the value it replaced.
    pub fn set<K, V>(&self, key: K, value: V) -> Option<Value>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let key = key.into();
        let value = value.into();
        let mut members = self.members.borrow_mut();
        match members.iter().position(|(member, _)| *member == key) {
            Some(index) => {
                Some(std::mem::replace(&mut members[index].1, value))
            },
            None => {
                members.push((key, value));
                None
            },
        }
    }

    /// Tests whether a member exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.members.borrow().iter().any(|(member, _)| member == key)
    }

    /// Member names, in order.
    pub fn keys(&self) -> Vec<String> {
        self.members.borrow().iter().map(|(key, _)| key.clone()).collect()
    }

    /// A snapshot of the members, in order. Calling functions found in the
    /// snapshot may freely modify this object.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.members.borrow().clone()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.borrow().len()
    }

    /// Tests whether there are no members.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tests whether both handles point to the same object.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.members, &other.members)
    }

    pub(crate) fn downgrade(&self) -> WeakObject {
        WeakObject { members: Rc::downgrade(&self.members) }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        let members = self.members.try_borrow().map_err(|_| fmt::Error)?;
        fmtr.debug_map()
            .entries(members.iter().map(|(key, value)| (key, value)))
            .finish()
    }
}

/// A handle to an [`Object`] that does not keep it alive.
#[derive(Clone)]
pub(crate) struct WeakObject {
    members: Weak<RefCell<Vec<(String, Value)>>>,
}

impl WeakObject {
    pub(crate) fn upgrade(&self) -> Option<Object> {
        self.members.upgrade().map(|members| Object { members })
    }
}

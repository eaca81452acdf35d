//! Typed identifiers for actions and groups

use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Identifier of a logical command, typed by the source object it acts on.
///
/// Ids are plain keys: two ids are equal iff their keys are equal, whatever
/// `T` is. They are meant to be declared once as constants by the module that
/// owns the command and shared with every contributor that extends it.
///
/// # Example
///
/// ```
/// use actionkit_core::ActionId;
///
/// struct WebApp;
///
/// pub const DEPLOY: ActionId<WebApp> = ActionId::new("resource.deploy");
/// assert_eq!(DEPLOY.key(), "resource.deploy");
/// ```
pub struct ActionId<T> {
    key: &'static str,
    _source: PhantomData<fn(&T)>,
}

impl<T> ActionId<T> {
    /// Create an id from a static key
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            _source: PhantomData,
        }
    }

    /// The key this id is registered under
    pub const fn key(&self) -> &'static str {
        self.key
    }
}

impl<T> Clone for ActionId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ActionId<T> {}

impl<T> PartialEq for ActionId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for ActionId<T> {}

impl<T> Hash for ActionId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<T> fmt::Debug for ActionId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActionId").field(&self.key).finish()
    }
}

impl<T> fmt::Display for ActionId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key)
    }
}

impl<T> Serialize for ActionId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key)
    }
}

/// Identifier of a registered [`ActionGroup`](crate::ActionGroup)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GroupId(&'static str);

impl GroupId {
    /// Create a group id from a static key
    pub const fn new(key: &'static str) -> Self {
        Self(key)
    }

    /// The key this group is registered under
    pub const fn key(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

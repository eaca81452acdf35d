//! Ordered handler lists and first-match resolution
//!
//! Every action owns one [`HandlerList`]. Contributors append
//! `(predicate, handler)` pairs without knowing about each other; resolution
//! walks the list in registration order and picks the first entry whose
//! predicate accepts the `(source, context)` pair. Registration order is part
//! of the contract: when two predicates overlap, the earlier entry wins.

use std::fmt;
use std::sync::Arc;

use crate::context::ActionContext;

/// Guard deciding whether a handler (or visibility/enablement) applies
pub type Predicate<T> = Arc<dyn Fn(&T, &ActionContext) -> bool + Send + Sync>;

/// Command body run on invocation
pub type HandlerFn<T> = Arc<dyn Fn(&T, &ActionContext) + Send + Sync>;

/// One `(predicate, handler)` contribution
pub struct HandlerEntry<T> {
    position: usize,
    predicate: Predicate<T>,
    handler: HandlerFn<T>,
}

impl<T> HandlerEntry<T> {
    /// Index of this entry in registration order
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether this entry applies to the pair
    pub fn accepts(&self, source: &T, ctx: &ActionContext) -> bool {
        (self.predicate)(source, ctx)
    }

    /// Run the handler
    pub fn invoke(&self, source: &T, ctx: &ActionContext) {
        (self.handler)(source, ctx)
    }
}

impl<T> Clone for HandlerEntry<T> {
    fn clone(&self) -> Self {
        Self {
            position: self.position,
            predicate: Arc::clone(&self.predicate),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<T> fmt::Debug for HandlerEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

/// Handlers contributed for one action, in registration order
pub struct HandlerList<T> {
    entries: Vec<HandlerEntry<T>>,
}

impl<T> Default for HandlerList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Clone for HandlerList<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T> fmt::Debug for HandlerList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerList")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl<T> HandlerList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a contribution; returns its position
    pub fn push(&mut self, predicate: Predicate<T>, handler: HandlerFn<T>) -> usize {
        let position = self.entries.len();
        self.entries.push(HandlerEntry {
            position,
            predicate,
            handler,
        });
        position
    }

    /// Append every entry of `other`, keeping their relative order
    pub fn extend(&mut self, other: HandlerList<T>) {
        for entry in other.entries {
            self.push(entry.predicate, entry.handler);
        }
    }

    /// First entry whose predicate accepts the pair
    pub fn resolve(&self, source: &T, ctx: &ActionContext) -> Option<&HandlerEntry<T>> {
        self.entries.iter().find(|entry| entry.accepts(source, ctx))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Invocation observers
//!
//! Observers see every invocation before and after the handler runs. This is
//! where a host hangs telemetry or operation tracking without the registry
//! knowing about it.

use crate::error::ActionError;
use crate::registry::Dispatched;

/// What is being invoked
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Key of the action
    pub key: &'a str,
    /// [`Source::type_name`](crate::Source::type_name) of the source
    pub source_type: &'static str,
    /// Place from the context, if any
    pub place: Option<&'a str>,
}

/// Hook called around every invocation
pub trait InvokeObserver: Send + Sync {
    /// Called before resolution
    fn before(&self, invocation: &Invocation<'_>);

    /// Called after the handler returned, or resolution failed
    fn after(&self, invocation: &Invocation<'_>, outcome: &Result<Dispatched, ActionError>);
}

/// An observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl InvokeObserver for NoopObserver {
    fn before(&self, _invocation: &Invocation<'_>) {}
    fn after(&self, _invocation: &Invocation<'_>, _outcome: &Result<Dispatched, ActionError>) {}
}

/// Observer that logs invocations
#[derive(Debug, Clone, Default)]
pub struct LoggingObserver {
    /// Whether to log before invocation
    pub log_before: bool,
    /// Whether to log after invocation
    pub log_after: bool,
}

impl LoggingObserver {
    /// Log after invocation only
    pub fn new() -> Self {
        Self {
            log_before: false,
            log_after: true,
        }
    }

    /// Log both before and after
    pub fn verbose() -> Self {
        Self {
            log_before: true,
            log_after: true,
        }
    }
}

impl InvokeObserver for LoggingObserver {
    fn before(&self, invocation: &Invocation<'_>) {
        if self.log_before {
            tracing::debug!(
                action = invocation.key,
                source = invocation.source_type,
                place = ?invocation.place,
                "Invoking action"
            );
        }
    }

    fn after(&self, invocation: &Invocation<'_>, outcome: &Result<Dispatched, ActionError>) {
        if !self.log_after {
            return;
        }
        match outcome {
            Ok(dispatched) => tracing::debug!(
                action = invocation.key,
                source = invocation.source_type,
                ?dispatched,
                "Action invoked"
            ),
            Err(err) => tracing::debug!(
                action = invocation.key,
                source = invocation.source_type,
                %err,
                "Action not invoked"
            ),
        }
    }
}

/// Runs several observers; `after` runs in reverse order
#[derive(Default)]
pub struct ComposedObserver {
    observers: Vec<Box<dyn InvokeObserver>>,
}

impl std::fmt::Debug for ComposedObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedObserver")
            .field("observers_count", &self.observers.len())
            .finish()
    }
}

impl ComposedObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<O: InvokeObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }
}

impl InvokeObserver for ComposedObserver {
    fn before(&self, invocation: &Invocation<'_>) {
        for observer in &self.observers {
            observer.before(invocation);
        }
    }

    fn after(&self, invocation: &Invocation<'_>, outcome: &Result<Dispatched, ActionError>) {
        for observer in self.observers.iter().rev() {
            observer.after(invocation, outcome);
        }
    }
}

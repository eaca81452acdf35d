//! Error type shared by registration, resolution and rendering

use thiserror::Error;

/// Errors reported by the action registry.
///
/// Most of these are developer-facing. The host is expected to recover from
/// [`ActionError::UnknownAction`] and [`ActionError::NoHandlerMatched`] by
/// hiding or ignoring the entry; neither should ever reach an end user.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Nothing was registered for the key and no host fallback took it.
    #[error("unknown action `{0}`")]
    UnknownAction(String),

    /// Invocation was attempted but no handler predicate matched.
    #[error("no handler matched action `{0}`")]
    NoHandlerMatched(String),

    /// No group was registered under the key.
    #[error("unknown action group `{0}`")]
    UnknownGroup(String),

    /// A group transitively contains itself.
    #[error("action group `{group}` contains itself: {}", path.join(" -> "))]
    CyclicGroup { group: String, path: Vec<String> },

    /// The same key was registered for two different source types.
    #[error("action `{key}` is registered for `{registered}`, not `{requested}`")]
    TypeMismatch {
        key: String,
        registered: &'static str,
        requested: &'static str,
    },

    /// A shortcut string could not be parsed.
    #[error("invalid shortcut `{0}`")]
    InvalidShortcut(String),

    /// Configuration could not be decoded.
    #[error("invalid registry config: {0}")]
    Config(#[from] serde_json::Error),

    /// The registry was shut down and no longer accepts registrations.
    #[error("action registry has been shut down")]
    ShutDown,
}

impl ActionError {
    /// Whether the host should recover by hiding or ignoring the entry.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ActionError::UnknownAction(_) | ActionError::NoHandlerMatched(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyclic_group_message_shows_path() {
        let err = ActionError::CyclicGroup {
            group: "a".into(),
            path: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(
            err.to_string(),
            "action group `a` contains itself: a -> b -> a"
        );
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(ActionError::UnknownAction("x".into()).is_recoverable());
        assert!(ActionError::NoHandlerMatched("x".into()).is_recoverable());
        assert!(!ActionError::ShutDown.is_recoverable());
        assert!(!ActionError::UnknownGroup("g".into()).is_recoverable());
    }
}

//! Invocation context passed alongside the source object

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Authentication state of the host at the time of the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    /// Nobody is signed in
    #[default]
    SignedOut,
    /// Signed in; subscriptions may or may not have been selected yet
    SignedIn { subscription_selected: bool },
}

impl AuthState {
    /// Signed in with at least one subscription selected
    pub const READY: AuthState = AuthState::SignedIn {
        subscription_selected: true,
    };

    /// Whether the user is signed in
    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthState::SignedIn { .. })
    }

    /// Whether auth-required actions may run (signed in with a subscription)
    pub fn has_selected_subscription(&self) -> bool {
        matches!(
            self,
            AuthState::SignedIn {
                subscription_selected: true
            }
        )
    }
}

/// Context passed with every resolution and invocation
///
/// Carries where the request comes from (`place`, e.g. `"explorer.tree"`),
/// the host's auth state, and arbitrary host data keyed by type.
#[derive(Default)]
pub struct ActionContext {
    place: Option<String>,
    auth: AuthState,
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionContext")
            .field("place", &self.place)
            .field("auth", &self.auth)
            .field("extensions", &self.extensions.len())
            .finish()
    }
}

impl ActionContext {
    /// Create an empty context (no place, signed out)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the place the request originates from
    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = Some(place.into());
        self
    }

    /// Set the auth state
    pub fn with_auth(mut self, auth: AuthState) -> Self {
        self.auth = auth;
        self
    }

    /// Attach a host value, replacing any previous value of the same type
    pub fn with<E: Any + Send + Sync>(mut self, value: E) -> Self {
        self.insert(value);
        self
    }

    /// The place the request originates from
    pub fn place(&self) -> Option<&str> {
        self.place.as_deref()
    }

    /// Whether the place starts with `prefix`, ignoring ASCII case
    pub fn is_in_place(&self, prefix: &str) -> bool {
        self.place
            .as_deref()
            .and_then(|place| place.get(..prefix.len()))
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    }

    /// The host's auth state
    pub fn auth(&self) -> AuthState {
        self.auth
    }

    /// Update the auth state
    pub fn set_auth(&mut self, auth: AuthState) {
        self.auth = auth;
    }

    /// Insert a host value, returning the previous value of that type
    pub fn insert<E: Any + Send + Sync>(&mut self, value: E) -> Option<E> {
        self.extensions
            .insert(TypeId::of::<E>(), Box::new(value))
            .and_then(|prev| prev.downcast::<E>().ok())
            .map(|prev| *prev)
    }

    /// Get a host value by type
    pub fn get<E: Any + Send + Sync>(&self) -> Option<&E> {
        self.extensions
            .get(&TypeId::of::<E>())
            .and_then(|value| value.downcast_ref::<E>())
    }
}

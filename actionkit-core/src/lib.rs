//! Core types for actionkit
//!
//! This crate provides the registry that lets independently written feature
//! modules contribute commands, attach competing implementations to the same
//! command, and have the host resolve at the moment of use which one applies
//! to the object in focus.
//!
//! # Core Concepts
//!
//! - **ActionId**: Typed, `const`-constructible identity of a logical command
//! - **Action**: Label, icon, shortcut, guards and ordered handlers for an id
//! - **Handler resolution**: First `(predicate, handler)` pair accepting the
//!   `(source, context)` wins; visibility and enablement follow resolution
//! - **ActionGroup**: Ordered, nestable menus of actions and separators
//! - **Contributor**: A feature module registering actions, handlers and groups
//!
//! # Basic Example
//!
//! ```
//! use actionkit_core::prelude::*;
//!
//! enum Resource {
//!     WebApp(&'static str),
//!     Registry(&'static str),
//! }
//!
//! impl Source for Resource {
//!     fn type_name(&self) -> &'static str {
//!         match self {
//!             Resource::WebApp(_) => "web_app",
//!             Resource::Registry(_) => "registry",
//!         }
//!     }
//! }
//!
//! const DEPLOY: ActionId<Resource> = ActionId::new("resource.deploy");
//! const MENU: GroupId = GroupId::new("resource.menu");
//!
//! let mut registry = ActionRegistry::new();
//! registry.register_action(Action::new(DEPLOY).label("Deploy")).unwrap();
//! registry
//!     .register_handler(
//!         DEPLOY,
//!         |r, _| matches!(r, Resource::WebApp(_)),
//!         |_, _| println!("deploying web app"),
//!     )
//!     .unwrap();
//! registry.register_group(MENU, action_group![DEPLOY]).unwrap();
//!
//! let ctx = ActionContext::new().with_auth(AuthState::READY);
//! let menu = registry.render_group(MENU, &Resource::WebApp("api"), &ctx).unwrap();
//! assert_eq!(menu.len(), 1);
//! let menu = registry.render_group(MENU, &Resource::Registry("acr"), &ctx).unwrap();
//! assert!(menu.is_empty());
//! ```
//!
//! # Handler Work
//!
//! Handlers are synchronous and return nothing. Long-running work belongs on
//! the host's runtime: capture a channel sender in the handler closure, spawn
//! the task, and feed the outcome back into the host's own event loop.

pub mod action;
pub mod config;
pub mod context;
pub mod contributor;
pub mod error;
pub mod group;
pub mod handler;
pub mod id;
pub mod observer;
pub mod registry;
pub mod shortcuts;
pub mod source;
pub mod testing;
pub mod view;

// Identity and registration
pub use action::Action;
pub use id::{ActionId, GroupId};
pub use source::Source;

// Resolution
pub use context::{ActionContext, AuthState};
pub use handler::{HandlerEntry, HandlerFn, HandlerList, Predicate};
pub use view::{expand_template, ActionView, Text, ViewFlags};

// Groups
pub use group::{normalize_separators, ActionGroup, GroupEntry, MenuItem};

// Registry and lifecycle
pub use config::{LinkedBypass, RegistryConfig, RegistryOverrides};
pub use contributor::{Contributor, INITIALIZE_ORDER};
pub use error::ActionError;
pub use registry::{ActionRegistry, Dispatched, HostFallback};

// Observers
pub use observer::{ComposedObserver, Invocation, InvokeObserver, LoggingObserver, NoopObserver};

// Shortcuts
pub use shortcuts::{parse_key_string, DefaultShortcuts, Shortcut, ShortcutOverrides};

// Testing exports
pub use testing::{char_key, ctrl_key, key, menu_lines, CallLog};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::Action;
    pub use crate::action_group;
    pub use crate::config::{LinkedBypass, RegistryConfig, RegistryOverrides};
    pub use crate::context::{ActionContext, AuthState};
    pub use crate::contributor::{Contributor, INITIALIZE_ORDER};
    pub use crate::error::ActionError;
    pub use crate::group::{ActionGroup, GroupEntry, MenuItem};
    pub use crate::id::{ActionId, GroupId};
    pub use crate::observer::{InvokeObserver, LoggingObserver};
    pub use crate::registry::{ActionRegistry, Dispatched, HostFallback};
    pub use crate::shortcuts::{DefaultShortcuts, Shortcut};
    pub use crate::source::Source;
    pub use crate::view::ActionView;
}

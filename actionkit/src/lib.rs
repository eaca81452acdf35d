//! actionkit: contributed commands resolved against the object in focus
//!
//! Feature modules register actions, attach competing handlers to the same
//! action, and compose menus. At render time the host asks which actions are
//! visible and enabled for the selected object; at invocation time the first
//! handler whose predicate accepts that object runs.
//!
//! # Example
//! ```
//! use actionkit::prelude::*;
//!
//! #[derive(Source)]
//! enum Resource {
//!     WebApp { name: String },
//!     ContainerRegistry { name: String },
//! }
//!
//! const DEPLOY: ActionId<Resource> = ActionId::new("resource.deploy");
//!
//! let mut registry = ActionRegistry::new();
//! registry
//!     .register_action(Action::new(DEPLOY).label("Deploy"))
//!     .unwrap();
//! registry
//!     .register_handler(DEPLOY, |r, _| r.is_web_app(), |_, _| {})
//!     .unwrap();
//!
//! let ctx = ActionContext::new().with_auth(AuthState::READY);
//! let app = Resource::WebApp { name: "api".into() };
//! let acr = Resource::ContainerRegistry { name: "images".into() };
//! assert!(registry.is_visible(DEPLOY, &app, &ctx));
//! assert!(!registry.is_visible(DEPLOY, &acr, &ctx));
//! ```

// Re-export everything from core
pub use actionkit_core::*;

// Re-export derive macros
pub use actionkit_macros::Source;

/// Prelude for convenient imports
pub mod prelude {
    // Registration
    pub use actionkit_core::{action_group, Action, ActionGroup, ActionId, GroupEntry, GroupId};

    // Resolution
    pub use actionkit_core::{ActionContext, ActionView, AuthState, Dispatched, MenuItem};

    // Registry and lifecycle
    pub use actionkit_core::{
        ActionError, ActionRegistry, Contributor, HostFallback, LinkedBypass, RegistryConfig,
        RegistryOverrides, INITIALIZE_ORDER,
    };

    // Shortcuts
    pub use actionkit_core::{DefaultShortcuts, Shortcut};

    // Observers
    pub use actionkit_core::{InvokeObserver, LoggingObserver};

    // Trait and derive macro
    pub use actionkit_core::Source;
    pub use actionkit_macros::Source;
}

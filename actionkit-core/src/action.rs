//! Action registrations
//!
//! An [`Action`] is the live registration behind an [`ActionId`]: display
//! metadata, guard predicates, and the ordered handler list. Actions are
//! built with a fluent builder and handed to
//! [`ActionRegistry::register_action`](crate::ActionRegistry::register_action).
//!
//! # Example
//! ```
//! use actionkit_core::{Action, ActionContext, ActionId, AuthState, LinkedBypass};
//!
//! const OPEN: ActionId<String> = ActionId::new("file.open");
//!
//! let action = Action::new(OPEN)
//!     .label("Open {}")
//!     .id_param(|path: &String| path.clone())
//!     .auth_required(false)
//!     .handler(|path, _ctx| println!("opening {path}"));
//!
//! let view = action.view(&"notes.md".to_string(), &ActionContext::new(), &LinkedBypass::All);
//! assert_eq!(view.label, "Open notes.md");
//! assert!(view.is_visible());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::config::LinkedBypass;
use crate::context::ActionContext;
use crate::handler::{HandlerEntry, HandlerFn, HandlerList, Predicate};
use crate::id::ActionId;
use crate::shortcuts::Shortcut;
use crate::source::Source;
use crate::view::{expand_template, ActionView, Text, ViewFlags};

type ParamFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Registration for one [`ActionId`]
///
/// Every metadata field is optional so that a later registration of the same
/// id can decorate an earlier one: fields it sets overwrite, fields it leaves
/// unset are kept, and its handlers are appended (see [`Action::merge`]).
pub struct Action<T: Source> {
    id: ActionId<T>,
    label: Option<Text<T>>,
    icon: Option<Text<T>>,
    id_param: Option<ParamFn<T>>,
    shortcut: Option<Shortcut>,
    auth_required: Option<bool>,
    visible_when: Option<Predicate<T>>,
    enabled_when: Option<Predicate<T>>,
    handlers: HandlerList<T>,
}

impl<T: Source> Action<T> {
    /// Start a registration for `id` with no metadata and no handlers
    pub fn new(id: ActionId<T>) -> Self {
        Self {
            id,
            label: None,
            icon: None,
            id_param: None,
            shortcut: None,
            auth_required: None,
            visible_when: None,
            enabled_when: None,
            handlers: HandlerList::new(),
        }
    }

    // ===== Builder =====

    /// Label template; `{}` is replaced by the id parameter
    pub fn label(mut self, label: impl Into<Text<T>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label computed from the source, e.g. "Pin"/"Unpin"
    pub fn label_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.label = Some(Text::Computed(Arc::new(f)));
        self
    }

    pub fn icon(mut self, icon: impl Into<Text<T>>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn icon_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.icon = Some(Text::Computed(Arc::new(f)));
        self
    }

    /// Extract the parameter shown in labels and titles (usually a name)
    pub fn id_param<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.id_param = Some(Arc::new(f));
        self
    }

    /// Bind a shortcut; `None` leaves any earlier binding in place
    pub fn shortcut(mut self, shortcut: impl Into<Option<Shortcut>>) -> Self {
        if let Some(shortcut) = shortcut.into() {
            self.shortcut = Some(shortcut);
        }
        self
    }

    /// Whether the action needs a signed-in user with a selected subscription
    pub fn auth_required(mut self, required: bool) -> Self {
        self.auth_required = Some(required);
        self
    }

    pub fn visible_when<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, &ActionContext) -> bool + Send + Sync + 'static,
    {
        self.visible_when = Some(Arc::new(f));
        self
    }

    pub fn enabled_when<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, &ActionContext) -> bool + Send + Sync + 'static,
    {
        self.enabled_when = Some(Arc::new(f));
        self
    }

    /// Add a handler that accepts every source of this type
    pub fn handler<H>(self, handler: H) -> Self
    where
        H: Fn(&T, &ActionContext) + Send + Sync + 'static,
    {
        self.handler_when(|_, _| true, handler)
    }

    /// Add a handler guarded by `predicate`
    pub fn handler_when<P, H>(mut self, predicate: P, handler: H) -> Self
    where
        P: Fn(&T, &ActionContext) -> bool + Send + Sync + 'static,
        H: Fn(&T, &ActionContext) + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(predicate), Arc::new(handler));
        self
    }

    // ===== Accessors =====

    pub fn id(&self) -> ActionId<T> {
        self.id
    }

    pub fn key(&self) -> &'static str {
        self.id.key()
    }

    pub fn shortcut_binding(&self) -> Option<&Shortcut> {
        self.shortcut.as_ref()
    }

    /// Defaults to `true` when never set
    pub fn requires_auth(&self) -> bool {
        self.auth_required.unwrap_or(true)
    }

    pub fn handlers(&self) -> &HandlerList<T> {
        &self.handlers
    }

    /// Append a `(predicate, handler)` pair
    pub fn push_handler(&mut self, predicate: Predicate<T>, handler: HandlerFn<T>) -> usize {
        self.handlers.push(predicate, handler)
    }

    /// Decorate this registration with a later one for the same id
    pub fn merge(&mut self, other: Action<T>) {
        let Action {
            id: _,
            label,
            icon,
            id_param,
            shortcut,
            auth_required,
            visible_when,
            enabled_when,
            handlers,
        } = other;

        if label.is_some() {
            self.label = label;
        }
        if icon.is_some() {
            self.icon = icon;
        }
        if id_param.is_some() {
            self.id_param = id_param;
        }
        if shortcut.is_some() {
            self.shortcut = shortcut;
        }
        if auth_required.is_some() {
            self.auth_required = auth_required;
        }
        if visible_when.is_some() {
            self.visible_when = visible_when;
        }
        if enabled_when.is_some() {
            self.enabled_when = enabled_when;
        }
        self.handlers.extend(handlers);
    }

    // ===== Resolution =====

    /// First handler accepting the pair
    pub fn resolve(&self, source: &T, ctx: &ActionContext) -> Option<&HandlerEntry<T>> {
        self.handlers.resolve(source, ctx)
    }

    /// Auth gate: passes when auth is not required, when a subscription is
    /// selected, or for linked sources covered by the bypass policy
    pub fn passes_auth(&self, source: &T, ctx: &ActionContext, bypass: &LinkedBypass) -> bool {
        !self.requires_auth()
            || ctx.auth().has_selected_subscription()
            || (source.is_linked() && bypass.covers(self.key()))
    }

    pub fn is_visible(&self, source: &T, ctx: &ActionContext, bypass: &LinkedBypass) -> bool {
        self.passes_auth(source, ctx, bypass)
            && self.visible_when.as_ref().is_none_or(|f| f(source, ctx))
            && self.resolve(source, ctx).is_some()
    }

    pub fn is_enabled(&self, source: &T, ctx: &ActionContext, bypass: &LinkedBypass) -> bool {
        self.passes_auth(source, ctx, bypass)
            && self.enabled_when.as_ref().is_none_or(|f| f(source, ctx))
            && self.resolve(source, ctx).is_some()
    }

    /// Compute the view state against a source
    pub fn view(&self, source: &T, ctx: &ActionContext, bypass: &LinkedBypass) -> ActionView {
        let param = self.id_param.as_ref().map(|f| f(source));
        let template = match &self.label {
            Some(text) => text.render(source),
            None => self.key().to_string(),
        };
        let label = expand_template(&template, param.as_deref());
        let title = param.as_ref().map(|param| {
            let quoted = format!("'{param}'");
            if template.contains("{}") {
                expand_template(&template, Some(&quoted))
            } else {
                format!("{template} {quoted}")
            }
        });

        let mut flags = ViewFlags::empty();
        flags.set(ViewFlags::VISIBLE, self.is_visible(source, ctx, bypass));
        flags.set(ViewFlags::ENABLED, self.is_enabled(source, ctx, bypass));

        ActionView {
            key: self.key(),
            label,
            title,
            icon: self.icon.as_ref().map(|icon| icon.render(source)),
            shortcut: self.shortcut.clone(),
            flags,
        }
    }
}

impl<T: Source> fmt::Debug for Action<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("shortcut", &self.shortcut)
            .field("auth_required", &self.requires_auth())
            .field("handlers", &self.handlers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AuthState;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    enum Node {
        Site(&'static str),
        Linked(&'static str),
    }

    impl Source for Node {
        fn type_name(&self) -> &'static str {
            match self {
                Node::Site(_) => "site",
                Node::Linked(_) => "linked",
            }
        }

        fn is_linked(&self) -> bool {
            matches!(self, Node::Linked(_))
        }
    }

    fn name(node: &Node) -> String {
        match node {
            Node::Site(name) | Node::Linked(name) => name.to_string(),
        }
    }

    const REFRESH: ActionId<Node> = ActionId::new("node.refresh");

    fn ready() -> ActionContext {
        ActionContext::new().with_auth(AuthState::READY)
    }

    #[test]
    fn test_no_handler_means_hidden() {
        let action = Action::new(REFRESH).label("Refresh").auth_required(false);
        let view = action.view(&Node::Site("a"), &ready(), &LinkedBypass::All);
        assert!(!view.is_visible());
        assert!(!view.is_enabled());
    }

    #[test]
    fn test_label_template_and_title() {
        let action = Action::new(REFRESH)
            .label("Refresh {}")
            .id_param(name)
            .handler(|_, _| {});
        let view = action.view(&Node::Site("api"), &ready(), &LinkedBypass::All);
        assert_eq!(view.label, "Refresh api");
        assert_eq!(view.title.as_deref(), Some("Refresh 'api'"));
        assert!(view.is_visible());
    }

    #[test]
    fn test_computed_label() {
        let action = Action::new(REFRESH)
            .label_with(|node| match node {
                Node::Linked(_) => "Unpin".into(),
                Node::Site(_) => "Pin".into(),
            })
            .handler(|_, _| {});
        let ctx = ready();
        assert_eq!(action.view(&Node::Site("a"), &ctx, &LinkedBypass::All).label, "Pin");
        assert_eq!(action.view(&Node::Linked("a"), &ctx, &LinkedBypass::All).label, "Unpin");
    }

    #[test]
    fn test_auth_gate() {
        let action = Action::new(REFRESH).handler(|_, _| {});
        let signed_out = ActionContext::new();

        assert!(!action.is_visible(&Node::Site("a"), &signed_out, &LinkedBypass::All));
        assert!(action.is_visible(&Node::Site("a"), &ready(), &LinkedBypass::All));
    }

    #[test]
    fn test_linked_bypass() {
        let action = Action::new(REFRESH).handler(|_, _| {});
        let no_subs = ActionContext::new().with_auth(AuthState::SignedIn {
            subscription_selected: false,
        });

        assert!(action.is_visible(&Node::Linked("a"), &no_subs, &LinkedBypass::All));
        assert!(!action.is_visible(&Node::Linked("a"), &no_subs, &LinkedBypass::Disabled));
        assert!(!action.is_visible(&Node::Site("a"), &no_subs, &LinkedBypass::All));

        let only = LinkedBypass::Only(["node.refresh".to_string()].into());
        assert!(action.is_visible(&Node::Linked("a"), &no_subs, &only));
    }

    #[test]
    fn test_bypass_still_needs_handler() {
        let action = Action::new(REFRESH)
            .handler_when(|node, _| matches!(node, Node::Site(_)), |_, _| {});
        let ctx = ActionContext::new();
        assert!(!action.is_visible(&Node::Linked("a"), &ctx, &LinkedBypass::All));
    }

    #[test]
    fn test_visible_but_disabled() {
        let action = Action::new(REFRESH)
            .enabled_when(|node, _| matches!(node, Node::Site(_)))
            .handler(|_, _| {});
        let view = action.view(&Node::Linked("a"), &ready(), &LinkedBypass::All);
        assert!(view.is_visible());
        assert!(!view.is_enabled());
    }

    #[test]
    fn test_merge_decorates() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut base = Action::new(REFRESH)
            .label("Refresh")
            .icon("icons/refresh")
            .handler_when(|node, _| matches!(node, Node::Site(_)), |_, _| {});
        let decoration = Action::new(REFRESH)
            .label("Reload")
            .handler(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        base.merge(decoration);
        let ctx = ready();
        let view = base.view(&Node::Linked("a"), &ctx, &LinkedBypass::All);
        assert_eq!(view.label, "Reload");
        assert_eq!(view.icon.as_deref(), Some("icons/refresh"));
        assert_eq!(base.handlers().len(), 2);

        let linked = Node::Linked("a");
        if let Some(entry) = base.resolve(&linked, &ctx) {
            entry.invoke(&linked, &ctx);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_merge_keeps_auth_when_unset() {
        let mut base = Action::new(REFRESH).auth_required(false);
        base.merge(Action::new(REFRESH).label("Refresh"));
        assert!(!base.requires_auth());
    }
}

//! The action registry
//!
//! Holds every [`Action`] and [`ActionGroup`] contributed at startup, and
//! answers the host's questions at render and invocation time: what does this
//! action look like for the focused source, which handler runs, and what does
//! this menu contain.
//!
//! Actions for different source types live side by side. The registry stores
//! them type-erased and recovers the concrete type on lookup; a key is bound
//! to exactly one source type, fixed by its first registration.

use crossterm::event::KeyEvent;
use std::any::{type_name, Any};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use crate::action::Action;
use crate::config::{LinkedBypass, RegistryConfig};
use crate::context::ActionContext;
use crate::contributor::Contributor;
use crate::error::ActionError;
use crate::group::{normalize_separators, ActionGroup, GroupEntry, MenuItem};
use crate::handler::HandlerEntry;
use crate::id::{ActionId, GroupId};
use crate::observer::{ComposedObserver, Invocation, InvokeObserver};
use crate::shortcuts::{DefaultShortcuts, Shortcut};
use crate::source::Source;
use crate::view::ActionView;

/// How an invocation was carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// A registered handler ran; `position` is its registration index
    Handler { position: usize },
    /// The key was unknown and the host fallback took it
    Fallback,
}

/// Host adapter consulted for keys nothing was registered under
///
/// Lets an IDE surface its own built-in commands (copy, paste, find usages)
/// through the same groups as contributed actions.
pub trait HostFallback: Send + Sync {
    /// View for a host command, or `None` when the host does not know `key`
    fn view(&self, key: &'static str, ctx: &ActionContext) -> Option<ActionView>;

    /// Run a host command; returns `false` when the host does not know `key`
    fn invoke(&self, key: &str, source: &dyn Any, ctx: &ActionContext) -> bool;
}

/// Object-safe view of an `Action<T>` for some `T`
trait ErasedAction: Send + Sync {
    fn key(&self) -> &'static str;
    fn source_type(&self) -> &'static str;
    fn shortcut(&self) -> Option<&Shortcut>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn view_erased(
        &self,
        source: &dyn Any,
        ctx: &ActionContext,
        bypass: &LinkedBypass,
    ) -> Option<ActionView>;
    fn invoke_erased(
        &self,
        source: &dyn Any,
        requested: &'static str,
        ctx: &ActionContext,
    ) -> Result<Dispatched, ActionError>;
}

impl<T: Source> ErasedAction for Action<T> {
    fn key(&self) -> &'static str {
        Action::key(self)
    }

    fn source_type(&self) -> &'static str {
        type_name::<T>()
    }

    fn shortcut(&self) -> Option<&Shortcut> {
        self.shortcut_binding()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn view_erased(
        &self,
        source: &dyn Any,
        ctx: &ActionContext,
        bypass: &LinkedBypass,
    ) -> Option<ActionView> {
        let source = source.downcast_ref::<T>()?;
        Some(self.view(source, ctx, bypass))
    }

    fn invoke_erased(
        &self,
        source: &dyn Any,
        requested: &'static str,
        ctx: &ActionContext,
    ) -> Result<Dispatched, ActionError> {
        let source = source
            .downcast_ref::<T>()
            .ok_or_else(|| ActionError::TypeMismatch {
                key: self.key().to_string(),
                registered: type_name::<T>(),
                requested,
            })?;
        let entry = self
            .resolve(source, ctx)
            .ok_or_else(|| ActionError::NoHandlerMatched(self.key().to_string()))?;
        entry.invoke(source, ctx);
        Ok(Dispatched::Handler {
            position: entry.position(),
        })
    }
}

/// Registry of actions, handlers and groups
///
/// Build one with [`ActionRegistry::init`] from a list of contributors, or
/// populate it by hand with the `register_*` methods.
///
/// # Example
/// ```
/// use actionkit_core::{Action, ActionContext, ActionId, ActionRegistry, AuthState};
///
/// const GREET: ActionId<String> = ActionId::new("greet");
///
/// let mut registry = ActionRegistry::new();
/// registry
///     .register_action(Action::new(GREET).label("Greet {}").id_param(|s: &String| s.clone()))
///     .unwrap();
/// registry
///     .register_handler(GREET, |_, _| true, |name, _| println!("hello {name}"))
///     .unwrap();
///
/// let ctx = ActionContext::new().with_auth(AuthState::READY);
/// let who = "world".to_string();
/// assert!(registry.is_visible(GREET, &who, &ctx));
/// assert!(registry.invoke(GREET, &who, &ctx).is_ok());
/// ```
#[derive(Default)]
pub struct ActionRegistry {
    config: RegistryConfig,
    actions: HashMap<&'static str, Box<dyn ErasedAction>>,
    /// Action keys in first-registration order
    order: Vec<&'static str>,
    groups: HashMap<&'static str, ActionGroup>,
    fallback: Option<Box<dyn HostFallback>>,
    observers: ComposedObserver,
    shut_down: bool,
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.order)
            .field("groups", &self.groups.len())
            .field("fallback", &self.fallback.is_some())
            .field("observers", &self.observers.len())
            .field("shut_down", &self.shut_down)
            .finish()
    }
}

impl ActionRegistry {
    /// Create an empty registry with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with `config`
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Build a registry from contributors
    ///
    /// Contributors are stable-sorted by [`Contributor::order`], then every
    /// contributor registers its actions, then every contributor its
    /// handlers, then every contributor its groups. Groups are validated
    /// last: a cycle fails initialization, a dangling reference is logged.
    pub fn init(
        config: RegistryConfig,
        contributors: &[&dyn Contributor],
    ) -> Result<Self, ActionError> {
        let mut registry = Self::with_config(config);

        let mut ordered = contributors.to_vec();
        ordered.sort_by_key(|contributor| contributor.order());

        for contributor in &ordered {
            tracing::debug!(
                contributor = contributor.name(),
                order = contributor.order(),
                "Registering actions"
            );
            contributor.register_actions(&mut registry)?;
        }
        for contributor in &ordered {
            tracing::debug!(contributor = contributor.name(), "Registering handlers");
            contributor.register_handlers(&mut registry)?;
        }
        for contributor in &ordered {
            tracing::debug!(contributor = contributor.name(), "Registering groups");
            contributor.register_groups(&mut registry)?;
        }

        registry.validate_groups()?;

        tracing::info!(
            contributors = ordered.len(),
            actions = registry.order.len(),
            groups = registry.groups.len(),
            "Action registry initialized"
        );
        Ok(registry)
    }

    /// Drop every registration; later registrations fail with
    /// [`ActionError::ShutDown`]
    pub fn shutdown(&mut self) {
        tracing::info!(
            actions = self.order.len(),
            groups = self.groups.len(),
            "Action registry shut down"
        );
        self.actions.clear();
        self.order.clear();
        self.groups.clear();
        self.fallback = None;
        self.observers = ComposedObserver::new();
        self.shut_down = true;
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Shortcuts contributors bind common commands to
    pub fn default_shortcuts(&self) -> &DefaultShortcuts {
        &self.config.shortcuts
    }

    /// Install the host fallback for unregistered keys
    pub fn set_fallback(&mut self, fallback: impl HostFallback + 'static) {
        self.fallback = Some(Box::new(fallback));
    }

    /// Add an observer called around every invocation
    pub fn add_observer(&mut self, observer: impl InvokeObserver + 'static) {
        self.observers.add(observer);
    }

    fn ensure_open(&self) -> Result<(), ActionError> {
        if self.shut_down {
            Err(ActionError::ShutDown)
        } else {
            Ok(())
        }
    }

    // ===== Registration =====

    /// Register an action, or decorate the existing registration for its id
    ///
    /// Decoration overwrites the metadata the new registration sets and
    /// appends its handlers after the existing ones.
    pub fn register_action<T: Source>(&mut self, action: Action<T>) -> Result<(), ActionError> {
        self.ensure_open()?;
        let key = action.key();

        match self.actions.get_mut(key) {
            Some(existing) => {
                let registered = existing.source_type();
                let existing = existing
                    .as_any_mut()
                    .downcast_mut::<Action<T>>()
                    .ok_or_else(|| ActionError::TypeMismatch {
                        key: key.to_string(),
                        registered,
                        requested: type_name::<T>(),
                    })?;
                existing.merge(action);
                tracing::debug!(action = key, "Decorated action");
            }
            None => {
                self.actions.insert(key, Box::new(action));
                self.order.push(key);
                tracing::debug!(action = key, source = type_name::<T>(), "Registered action");
            }
        }
        Ok(())
    }

    /// Append a `(predicate, handler)` pair to a registered action
    ///
    /// Returns the handler's position in resolution order.
    pub fn register_handler<T, P, H>(
        &mut self,
        id: ActionId<T>,
        predicate: P,
        handler: H,
    ) -> Result<usize, ActionError>
    where
        T: Source,
        P: Fn(&T, &ActionContext) -> bool + Send + Sync + 'static,
        H: Fn(&T, &ActionContext) + Send + Sync + 'static,
    {
        self.ensure_open()?;
        let position = self
            .action_mut(id)?
            .push_handler(std::sync::Arc::new(predicate), std::sync::Arc::new(handler));
        tracing::debug!(action = id.key(), position, "Registered handler");
        Ok(position)
    }

    /// Register a group; the first registration for an id wins
    ///
    /// Use [`group_mut`](Self::group_mut) to extend a registered group.
    pub fn register_group(&mut self, id: GroupId, group: ActionGroup) -> Result<(), ActionError> {
        self.ensure_open()?;
        match self.groups.entry(id.key()) {
            Entry::Occupied(_) => {
                tracing::warn!(group = id.key(), "Ignoring duplicate action group");
            }
            Entry::Vacant(slot) => {
                slot.insert(group);
                tracing::debug!(group = id.key(), "Registered action group");
            }
        }
        Ok(())
    }

    // ===== Lookup =====

    /// The registration for `id`
    pub fn action<T: Source>(&self, id: ActionId<T>) -> Result<&Action<T>, ActionError> {
        let erased = self
            .actions
            .get(id.key())
            .ok_or_else(|| ActionError::UnknownAction(id.key().to_string()))?;
        erased
            .as_any()
            .downcast_ref::<Action<T>>()
            .ok_or_else(|| ActionError::TypeMismatch {
                key: id.key().to_string(),
                registered: erased.source_type(),
                requested: type_name::<T>(),
            })
    }

    /// The registration for `id`, for in-place changes
    pub fn action_mut<T: Source>(
        &mut self,
        id: ActionId<T>,
    ) -> Result<&mut Action<T>, ActionError> {
        let erased = self
            .actions
            .get_mut(id.key())
            .ok_or_else(|| ActionError::UnknownAction(id.key().to_string()))?;
        let registered = erased.source_type();
        erased
            .as_any_mut()
            .downcast_mut::<Action<T>>()
            .ok_or_else(|| ActionError::TypeMismatch {
                key: id.key().to_string(),
                registered,
                requested: type_name::<T>(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.actions.contains_key(key)
    }

    /// Registered action keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn group(&self, id: GroupId) -> Result<&ActionGroup, ActionError> {
        self.groups
            .get(id.key())
            .ok_or_else(|| ActionError::UnknownGroup(id.key().to_string()))
    }

    /// A registered group, for extension by later contributors
    pub fn group_mut(&mut self, id: GroupId) -> Result<&mut ActionGroup, ActionError> {
        self.ensure_open()?;
        self.groups
            .get_mut(id.key())
            .ok_or_else(|| ActionError::UnknownGroup(id.key().to_string()))
    }

    // ===== Resolution =====

    /// First handler accepting `(source, ctx)`, or `None`
    pub fn resolve<T: Source>(
        &self,
        id: ActionId<T>,
        source: &T,
        ctx: &ActionContext,
    ) -> Option<&HandlerEntry<T>> {
        self.action(id).ok()?.resolve(source, ctx)
    }

    pub fn is_visible<T: Source>(&self, id: ActionId<T>, source: &T, ctx: &ActionContext) -> bool {
        match self.action(id) {
            Ok(action) => action.is_visible(source, ctx, &self.config.linked_bypass),
            Err(_) => self
                .fallback_view(id.key(), ctx)
                .is_some_and(|view| view.is_visible()),
        }
    }

    pub fn is_enabled<T: Source>(&self, id: ActionId<T>, source: &T, ctx: &ActionContext) -> bool {
        match self.action(id) {
            Ok(action) => action.is_enabled(source, ctx, &self.config.linked_bypass),
            Err(_) => self
                .fallback_view(id.key(), ctx)
                .is_some_and(|view| view.is_enabled()),
        }
    }

    /// View state of `id` against `source`
    pub fn view<T: Source>(
        &self,
        id: ActionId<T>,
        source: &T,
        ctx: &ActionContext,
    ) -> Result<ActionView, ActionError> {
        if self.contains(id.key()) {
            let action = self.action(id)?;
            return Ok(action.view(source, ctx, &self.config.linked_bypass));
        }
        self.fallback_view(id.key(), ctx)
            .ok_or_else(|| ActionError::UnknownAction(id.key().to_string()))
    }

    /// View state by key, for hosts holding a source of unknown type
    ///
    /// Unknown keys and sources of another type render hidden.
    pub fn view_key<S: Source>(
        &self,
        key: &'static str,
        source: &S,
        ctx: &ActionContext,
    ) -> ActionView {
        self.erased_view(key, source, ctx)
    }

    fn fallback_view(&self, key: &'static str, ctx: &ActionContext) -> Option<ActionView> {
        self.fallback.as_ref()?.view(key, ctx)
    }

    fn erased_view(&self, key: &'static str, source: &dyn Any, ctx: &ActionContext) -> ActionView {
        match self.actions.get(key) {
            Some(action) => action
                .view_erased(source, ctx, &self.config.linked_bypass)
                .unwrap_or_else(|| {
                    tracing::debug!(
                        action = key,
                        registered = action.source_type(),
                        "Source type does not match, hiding action"
                    );
                    ActionView::hidden(key)
                }),
            None => self.fallback_view(key, ctx).unwrap_or_else(|| {
                tracing::debug!(action = key, "Unknown action, hiding");
                ActionView::hidden(key)
            }),
        }
    }

    // ===== Groups =====

    /// Render a registered group against `source`
    ///
    /// Unlabelled nested groups are flattened, labelled ones become submenus,
    /// hidden actions are dropped and separators are normalized once per
    /// menu level, after flattening.
    pub fn render_group<S: Source>(
        &self,
        id: GroupId,
        source: &S,
        ctx: &ActionContext,
    ) -> Result<Vec<MenuItem>, ActionError> {
        let group = self.group(id)?;
        let mut stack = vec![id.key()];
        let items = self.render_entries(group, source, ctx, &mut stack)?;
        Ok(normalize_separators(items))
    }

    /// Items of one group with nested unlabelled groups spliced in;
    /// separators are left as written

    fn render_entries(
        &self,
        group: &ActionGroup,
        source: &dyn Any,
        ctx: &ActionContext,
        stack: &mut Vec<&'static str>,
    ) -> Result<Vec<MenuItem>, ActionError> {
        let mut items = Vec::with_capacity(group.len());
        for entry in group.entries() {
            match entry {
                GroupEntry::Action(key) => {
                    let view = self.erased_view(*key, source, ctx);
                    if view.is_visible() {
                        items.push(MenuItem::Action(view));
                    }
                }
                GroupEntry::Group(nested) => {
                    self.render_nested(nested, source, ctx, stack, &mut items)?;
                }
                GroupEntry::Ref(id) => {
                    if stack.contains(&id.key()) {
                        return Err(cycle_error(stack, id.key()));
                    }
                    let Some(nested) = self.groups.get(id.key()) else {
                        tracing::debug!(group = id.key(), "Skipping unknown group reference");
                        continue;
                    };
                    stack.push(id.key());
                    let rendered = self.render_nested(nested, source, ctx, stack, &mut items);
                    stack.pop();
                    rendered?;
                }
                GroupEntry::Separator(title) => items.push(MenuItem::Separator {
                    title: title.clone(),
                }),
            }
        }
        Ok(items)
    }

    fn render_nested(
        &self,
        nested: &ActionGroup,
        source: &dyn Any,
        ctx: &ActionContext,
        stack: &mut Vec<&'static str>,
        items: &mut Vec<MenuItem>,
    ) -> Result<(), ActionError> {
        let rendered = self.render_entries(nested, source, ctx, stack)?;
        match nested.label() {
            Some(label) => {
                let submenu = normalize_separators(rendered);
                if !submenu.is_empty() {
                    items.push(MenuItem::Submenu {
                        label: label.to_string(),
                        icon: nested.icon().map(str::to_string),
                        items: submenu,
                    });
                }
            }
            None => items.extend(rendered),
        }
        Ok(())
    }

    /// Check every group for cycles and dangling references
    ///
    /// A cycle is an error; references to unregistered groups are logged and
    /// skipped at render time.
    pub fn validate_groups(&self) -> Result<(), ActionError> {
        let mut ids: Vec<_> = self.groups.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            if let Some(group) = self.groups.get(id) {
                let mut stack = vec![id];
                self.check_group(group, &mut stack)?;
            }
        }
        Ok(())
    }

    fn check_group(
        &self,
        group: &ActionGroup,
        stack: &mut Vec<&'static str>,
    ) -> Result<(), ActionError> {
        for key in group.action_keys() {
            if !self.contains(key) && self.fallback.is_none() {
                tracing::debug!(action = key, "Action group names an unknown action");
            }
        }
        for id in group.references() {
            if stack.contains(&id.key()) {
                return Err(cycle_error(stack, id.key()));
            }
            match self.groups.get(id.key()) {
                Some(nested) => {
                    stack.push(id.key());
                    let checked = self.check_group(nested, stack);
                    stack.pop();
                    checked?;
                }
                None => tracing::warn!(
                    group = stack.last().copied().unwrap_or_default(),
                    missing = id.key(),
                    "Action group references an unknown group"
                ),
            }
        }
        Ok(())
    }

    // ===== Invocation =====

    /// Resolve and run the handler for `id` against `source`
    ///
    /// Guards are not re-checked; hosts invoke what they rendered enabled.
    pub fn invoke<T: Source>(
        &self,
        id: ActionId<T>,
        source: &T,
        ctx: &ActionContext,
    ) -> Result<Dispatched, ActionError> {
        self.invoke_key(id.key(), source, ctx)
    }

    /// Invoke by key, for hosts dispatching from rendered menus
    pub fn invoke_key<S: Source>(
        &self,
        key: &str,
        source: &S,
        ctx: &ActionContext,
    ) -> Result<Dispatched, ActionError> {
        let invocation = Invocation {
            key,
            source_type: source.type_name(),
            place: ctx.place(),
        };
        self.observers.before(&invocation);

        let outcome = match self.actions.get(key) {
            Some(action) => action.invoke_erased(source, type_name::<S>(), ctx),
            None => match &self.fallback {
                Some(fallback) if fallback.invoke(key, source, ctx) => Ok(Dispatched::Fallback),
                _ => Err(ActionError::UnknownAction(key.to_string())),
            },
        };

        if let Err(err) = &outcome {
            tracing::warn!(
                action = key,
                source = source.type_name(),
                %err,
                "Action invocation failed"
            );
        }
        self.observers.after(&invocation, &outcome);
        outcome
    }

    // ===== Shortcuts =====

    /// First action, in registration order, bound to `key`
    pub fn action_for_key(&self, key: &KeyEvent) -> Option<&'static str> {
        self.order.iter().copied().find(|k| {
            self.actions
                .get(k)
                .and_then(|action| action.shortcut())
                .is_some_and(|shortcut| shortcut.matches(key))
        })
    }

    /// First action bound to `key` that is enabled for `source`
    pub fn shortcut_target<S: Source>(
        &self,
        key: &KeyEvent,
        source: &S,
        ctx: &ActionContext,
    ) -> Option<&'static str> {
        self.order.iter().copied().find(|k| {
            let Some(action) = self.actions.get(k) else {
                return false;
            };
            action.shortcut().is_some_and(|s| s.matches(key))
                && action
                    .view_erased(source, ctx, &self.config.linked_bypass)
                    .is_some_and(|view| view.is_visible() && view.is_enabled())
        })
    }
}

fn cycle_error(stack: &[&'static str], repeated: &'static str) -> ActionError {
    let mut path: Vec<String> = stack.iter().map(|s| s.to_string()).collect();
    path.push(repeated.to_string());
    tracing::error!(group = repeated, path = %path.join(" -> "), "Cyclic action group");
    ActionError::CyclicGroup {
        group: repeated.to_string(),
        path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action_group;
    use crate::context::AuthState;
    use crate::testing::{key, menu_lines, CallLog};

    #[derive(Debug)]
    enum Res {
        Web(&'static str),
        Func(&'static str),
    }

    impl Source for Res {
        fn type_name(&self) -> &'static str {
            match self {
                Res::Web(_) => "web",
                Res::Func(_) => "func",
            }
        }
    }

    const START: ActionId<Res> = ActionId::new("res.start");
    const STOP: ActionId<Res> = ActionId::new("res.stop");
    const OPEN: ActionId<String> = ActionId::new("file.open");
    const MENU: GroupId = GroupId::new("menu");

    fn ready() -> ActionContext {
        ActionContext::new().with_auth(AuthState::READY)
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = ActionRegistry::new();
        registry
            .register_action(Action::new(START).label("Start"))
            .unwrap();
        registry
            .register_handler(START, |r, _| matches!(r, Res::Web(_)), |_, _| {})
            .unwrap();

        let ctx = ready();
        assert!(registry.resolve(START, &Res::Web("a"), &ctx).is_some());
        assert!(registry.resolve(START, &Res::Func("a"), &ctx).is_none());
        assert!(registry.is_visible(START, &Res::Web("a"), &ctx));
        assert!(!registry.is_visible(START, &Res::Func("a"), &ctx));
    }

    #[test]
    fn test_handler_for_unknown_action() {
        let mut registry = ActionRegistry::new();
        let err = registry
            .register_handler(START, |_, _| true, |_, _| {})
            .unwrap_err();
        assert!(matches!(err, ActionError::UnknownAction(key) if key == "res.start"));
    }

    #[test]
    fn test_type_mismatch() {
        let mut registry = ActionRegistry::new();
        registry.register_action(Action::new(START)).unwrap();

        const CLASH: ActionId<String> = ActionId::new("res.start");
        let err = registry.register_action(Action::new(CLASH)).unwrap_err();
        assert!(matches!(err, ActionError::TypeMismatch { .. }));
        assert!(registry.action(CLASH).is_err());
    }

    #[test]
    fn test_invoke_records_position() {
        let log = CallLog::new();
        let mut registry = ActionRegistry::new();
        registry
            .register_action(
                Action::new(START)
                    .handler_when(|r, _| matches!(r, Res::Func(_)), log.handler("func"))
                    .handler(log.handler("any")),
            )
            .unwrap();

        let ctx = ready();
        assert_eq!(
            registry.invoke(START, &Res::Web("a"), &ctx).unwrap(),
            Dispatched::Handler { position: 1 }
        );
        assert_eq!(
            registry.invoke(START, &Res::Func("b"), &ctx).unwrap(),
            Dispatched::Handler { position: 0 }
        );
        assert_eq!(log.calls(), vec!["any", "func"]);
    }

    #[test]
    fn test_invoke_without_match() {
        let mut registry = ActionRegistry::new();
        registry
            .register_action(Action::new(START).handler_when(|_, _| false, |_, _| {}))
            .unwrap();
        let err = registry
            .invoke(START, &Res::Web("a"), &ready())
            .unwrap_err();
        assert!(matches!(err, ActionError::NoHandlerMatched(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_invoke_key_with_wrong_source_type() {
        let mut registry = ActionRegistry::new();
        registry
            .register_action(Action::new(START).handler(|_, _| {}))
            .unwrap();
        let err = registry
            .invoke_key("res.start", &"file".to_string(), &ready())
            .unwrap_err();
        assert!(matches!(err, ActionError::TypeMismatch { .. }));
    }

    #[test]
    fn test_render_skips_other_source_types() {
        let mut registry = ActionRegistry::new();
        registry
            .register_action(Action::new(START).label("Start").handler(|_, _| {}))
            .unwrap();
        registry
            .register_action(
                Action::new(OPEN)
                    .label("Open")
                    .auth_required(false)
                    .handler(|_, _| {}),
            )
            .unwrap();
        registry
            .register_group(MENU, action_group![START, OPEN])
            .unwrap();

        let ctx = ready();
        let lines = menu_lines(&registry.render_group(MENU, &Res::Web("a"), &ctx).unwrap());
        assert_eq!(lines, vec!["Start"]);
        let lines = menu_lines(
            &registry
                .render_group(MENU, &"a.txt".to_string(), &ctx)
                .unwrap(),
        );
        assert_eq!(lines, vec!["Open"]);
    }

    #[test]
    fn test_unknown_group() {
        let registry = ActionRegistry::new();
        assert!(matches!(
            registry.render_group(MENU, &(), &ActionContext::new()),
            Err(ActionError::UnknownGroup(_))
        ));
    }

    #[test]
    fn test_submenus_and_references() {
        const MORE: GroupId = GroupId::new("more");
        let mut registry = ActionRegistry::new();
        for id in [START, STOP] {
            registry
                .register_action(Action::new(id).label(id.key()).handler(|_, _| {}))
                .unwrap();
        }
        registry
            .register_group(MORE, ActionGroup::labelled("More").with(STOP))
            .unwrap();
        registry
            .register_group(MENU, action_group![START, "---", MORE])
            .unwrap();

        let items = registry
            .render_group(MENU, &Res::Web("a"), &ready())
            .unwrap();
        assert_eq!(menu_lines(&items), vec!["res.start", "---", "More >", "  res.stop"]);
    }

    #[test]
    fn test_first_group_registration_wins() {
        let mut registry = ActionRegistry::new();
        for id in [START, STOP] {
            registry
                .register_action(Action::new(id).label(id.key()).handler(|_, _| {}))
                .unwrap();
        }
        registry.register_group(MENU, action_group![START]).unwrap();
        registry.register_group(MENU, action_group![STOP]).unwrap();

        let items = registry
            .render_group(MENU, &Res::Web("a"), &ready())
            .unwrap();
        assert_eq!(menu_lines(&items), vec!["res.start"]);

        registry.group_mut(MENU).unwrap().add(STOP);
        let items = registry
            .render_group(MENU, &Res::Web("a"), &ready())
            .unwrap();
        assert_eq!(menu_lines(&items), vec!["res.start", "res.stop"]);
    }

    #[test]
    fn test_validate_follows_references_in_literal_groups() {
        const SHARED: GroupId = GroupId::new("shared");
        const OUTER: GroupId = GroupId::new("outer");
        let mut registry = ActionRegistry::new();
        registry.register_group(SHARED, action_group![START]).unwrap();
        // the same group referenced twice is not a cycle
        registry
            .register_group(OUTER, action_group![SHARED, action_group![SHARED]])
            .unwrap();
        registry.validate_groups().unwrap();

        registry
            .group_mut(SHARED)
            .unwrap()
            .add(action_group![action_group![OUTER]]);
        match registry.validate_groups() {
            Err(ActionError::CyclicGroup { path, .. }) => {
                assert_eq!(path.first(), path.last());
                assert_eq!(path.len(), 3);
            }
            other => panic!("expected a cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_shutdown_rejects_registration() {
        let mut registry = ActionRegistry::new();
        registry.register_action(Action::new(START)).unwrap();
        registry.shutdown();

        assert!(registry.is_empty());
        assert!(matches!(
            registry.register_action(Action::new(STOP)),
            Err(ActionError::ShutDown)
        ));
        assert!(matches!(
            registry.register_group(MENU, ActionGroup::new()),
            Err(ActionError::ShutDown)
        ));
    }

    #[test]
    fn test_action_for_key() {
        let mut registry = ActionRegistry::new();
        registry
            .register_action(Action::new(START).shortcut(Shortcut::parse("ctrl+s").ok()))
            .unwrap();
        registry
            .register_action(Action::new(STOP).shortcut(Shortcut::parse("ctrl+s").ok()))
            .unwrap();

        assert_eq!(registry.action_for_key(&key("ctrl+s")), Some("res.start"));
        assert_eq!(registry.action_for_key(&key("ctrl+x")), None);
    }

    #[test]
    fn test_shortcut_target_skips_disabled() {
        let mut registry = ActionRegistry::new();
        registry
            .register_action(
                Action::new(START)
                    .shortcut(Shortcut::parse("f5").ok())
                    .handler_when(|r, _| matches!(r, Res::Func(_)), |_, _| {}),
            )
            .unwrap();
        registry
            .register_action(
                Action::new(STOP)
                    .shortcut(Shortcut::parse("f5").ok())
                    .handler(|_, _| {}),
            )
            .unwrap();

        let ctx = ready();
        assert_eq!(
            registry.shortcut_target(&key("f5"), &Res::Web("a"), &ctx),
            Some("res.stop")
        );
        assert_eq!(
            registry.shortcut_target(&key("f5"), &Res::Func("a"), &ctx),
            Some("res.start")
        );
    }

    struct Builtins;

    impl HostFallback for Builtins {
        fn view(&self, key: &'static str, _ctx: &ActionContext) -> Option<ActionView> {
            (key == "host.copy").then(|| ActionView {
                label: "Copy".into(),
                flags: crate::view::ViewFlags::all(),
                ..ActionView::hidden(key)
            })
        }

        fn invoke(&self, key: &str, _source: &dyn Any, _ctx: &ActionContext) -> bool {
            key == "host.copy"
        }
    }

    #[test]
    fn test_host_fallback() {
        let mut registry = ActionRegistry::new();
        registry.set_fallback(Builtins);
        registry
            .register_group(MENU, action_group!["host.copy", "host.paste"])
            .unwrap();

        let ctx = ready();
        let items = registry.render_group(MENU, &(), &ctx).unwrap();
        assert_eq!(menu_lines(&items), vec!["Copy"]);
        assert_eq!(
            registry.invoke_key("host.copy", &(), &ctx).unwrap(),
            Dispatched::Fallback
        );
        assert!(matches!(
            registry.invoke_key("host.paste", &(), &ctx),
            Err(ActionError::UnknownAction(_))
        ));
    }
}

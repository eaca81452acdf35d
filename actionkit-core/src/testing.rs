//! Test utilities for applications built on actionkit
//!
//! - [`key`]: Create a `KeyEvent` from a string (e.g., `key("ctrl+p")`)
//! - [`CallLog`]: Record which handlers ran, in order
//! - [`menu_lines`]: Flatten rendered menus into comparable strings
//! - [`assert_menu!`](crate::assert_menu): Compare a rendered menu against expected lines
//!
//! # Example
//!
//! ```
//! use actionkit_core::testing::{menu_lines, CallLog};
//! use actionkit_core::{action_group, Action, ActionContext, ActionId, ActionRegistry, GroupId};
//!
//! const SAVE: ActionId<()> = ActionId::new("file.save");
//! const MENU: GroupId = GroupId::new("menu");
//!
//! let log = CallLog::new();
//! let mut registry = ActionRegistry::new();
//! registry
//!     .register_action(Action::new(SAVE).label("Save").auth_required(false).handler(log.handler("save")))
//!     .unwrap();
//! registry.register_group(MENU, action_group![SAVE]).unwrap();
//!
//! let ctx = ActionContext::new();
//! let items = registry.render_group(MENU, &(), &ctx).unwrap();
//! assert_eq!(menu_lines(&items), vec!["Save"]);
//!
//! registry.invoke(SAVE, &(), &ctx).unwrap();
//! assert_eq!(log.calls(), vec!["save"]);
//! ```

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::{Arc, Mutex};

use crate::context::ActionContext;
use crate::group::MenuItem;
use crate::shortcuts::parse_key_string;

/// Create a `KeyEvent` from a key string.
///
/// This is a convenience wrapper around [`parse_key_string`] that panics
/// if the key string is invalid, making it suitable for use in tests.
///
/// # Examples
///
/// ```
/// use actionkit_core::testing::key;
/// use crossterm::event::{KeyCode, KeyModifiers};
///
/// let k = key("ctrl+alt+d");
/// assert_eq!(k.code, KeyCode::Char('d'));
/// assert!(k.modifiers.contains(KeyModifiers::CONTROL | KeyModifiers::ALT));
///
/// let k = key("control alt O");
/// assert_eq!(k.code, KeyCode::Char('o'));
/// ```
///
/// # Panics
///
/// Panics if the key string cannot be parsed.
pub fn key(s: &str) -> KeyEvent {
    parse_key_string(s).unwrap_or_else(|| panic!("Invalid key string: {:?}", s))
}

/// Create a `KeyEvent` for a character with no modifiers.
pub fn char_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

/// Create a `KeyEvent` for Ctrl+character.
pub fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

/// Shared, ordered record of handler invocations
///
/// Clones share the same log, so a handler closure can own one while the
/// test keeps another.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn record(&self, entry: impl Into<String>) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(entry.into());
        }
    }

    /// A handler that records `name` each time it runs
    pub fn handler<T: 'static>(
        &self,
        name: impl Into<String>,
    ) -> impl Fn(&T, &ActionContext) + Send + Sync + 'static {
        let log = self.clone();
        let name = name.into();
        move |_, _| log.record(name.clone())
    }

    /// Snapshot of the recorded entries
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Take the recorded entries, leaving the log empty
    pub fn drain(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|mut calls| std::mem::take(&mut *calls))
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.calls().is_empty()
    }
}

/// Flatten rendered menu items into one string per line
///
/// Actions render as their label (with ` (disabled)` when not enabled),
/// separators as `---` or `--- Title`, submenus as `Label >` followed by
/// their items indented by two spaces.
pub fn menu_lines(items: &[MenuItem]) -> Vec<String> {
    let mut lines = Vec::new();
    push_lines(items, 0, &mut lines);
    lines
}

fn push_lines(items: &[MenuItem], depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for item in items {
        match item {
            MenuItem::Action(view) if view.is_enabled() => {
                lines.push(format!("{indent}{}", view.label));
            }
            MenuItem::Action(view) => {
                lines.push(format!("{indent}{} (disabled)", view.label));
            }
            MenuItem::Separator { title: None } => lines.push(format!("{indent}---")),
            MenuItem::Separator { title: Some(title) } => {
                lines.push(format!("{indent}--- {title}"));
            }
            MenuItem::Submenu { label, items, .. } => {
                lines.push(format!("{indent}{label} >"));
                push_lines(items, depth + 1, lines);
            }
        }
    }
}

/// Assert that rendered menu items match the expected lines
///
/// # Example
///
/// ```ignore
/// assert_menu!(registry.render_group(MENU, &source, &ctx)?, ["Start", "---", "Stop"]);
/// ```
#[macro_export]
macro_rules! assert_menu {
    ($items:expr, [$($line:expr),* $(,)?]) => {{
        let lines = $crate::testing::menu_lines(&$items);
        let expected: Vec<String> = vec![$($line.to_string()),*];
        assert_eq!(
            lines, expected,
            "Rendered menu does not match"
        );
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{ActionView, ViewFlags};

    fn view(label: &str, flags: ViewFlags) -> MenuItem {
        MenuItem::Action(ActionView {
            label: label.into(),
            flags,
            ..ActionView::hidden("test")
        })
    }

    #[test]
    fn test_key() {
        let k = key("f5");
        assert_eq!(k.code, KeyCode::F(5));
        assert_eq!(ctrl_key('n').modifiers, KeyModifiers::CONTROL);
        assert_eq!(char_key('q').code, KeyCode::Char('q'));
    }

    #[test]
    fn test_call_log_shared_between_clones() {
        let log = CallLog::new();
        let handler = log.handler::<u32>("run");
        let ctx = ActionContext::new();
        handler(&1, &ctx);
        handler(&2, &ctx);

        assert_eq!(log.calls(), vec!["run", "run"]);
        assert_eq!(log.drain().len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_menu_lines() {
        let items = vec![
            view("Start", ViewFlags::all()),
            MenuItem::Separator {
                title: Some("Deploy".into()),
            },
            MenuItem::Submenu {
                label: "More".into(),
                icon: None,
                items: vec![view("Stop", ViewFlags::VISIBLE)],
            },
        ];
        assert_menu!(items, ["Start", "--- Deploy", "More >", "  Stop (disabled)"]);
    }
}

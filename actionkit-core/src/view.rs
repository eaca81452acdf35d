//! Presentation state computed for an action against a source

use bitflags::bitflags;
use std::fmt;
use std::sync::Arc;

use crate::shortcuts::Shortcut;

bitflags! {
    /// Visibility and enablement of a rendered action
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ViewFlags: u8 {
        const VISIBLE = 1;
        const ENABLED = 1 << 1;
    }
}

/// A string that is either fixed or computed from the source
pub enum Text<T> {
    Fixed(String),
    Computed(Arc<dyn Fn(&T) -> String + Send + Sync>),
}

impl<T> Text<T> {
    /// Produce the text for a source
    pub fn render(&self, source: &T) -> String {
        match self {
            Text::Fixed(text) => text.clone(),
            Text::Computed(f) => f(source),
        }
    }
}

impl<T> Clone for Text<T> {
    fn clone(&self) -> Self {
        match self {
            Text::Fixed(text) => Text::Fixed(text.clone()),
            Text::Computed(f) => Text::Computed(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for Text<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Text::Fixed(text) => f.debug_tuple("Fixed").field(text).finish(),
            Text::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<T> From<&str> for Text<T> {
    fn from(text: &str) -> Self {
        Text::Fixed(text.to_string())
    }
}

impl<T> From<String> for Text<T> {
    fn from(text: String) -> Self {
        Text::Fixed(text)
    }
}

/// Fill a label template with the action's id parameter
///
/// `{}` is replaced by the parameter. Templates without a placeholder are
/// returned unchanged, and so is any template when there is no parameter.
pub fn expand_template(template: &str, param: Option<&str>) -> String {
    match param {
        Some(param) if template.contains("{}") => template.replacen("{}", param, 1),
        _ => template.to_string(),
    }
}

/// Everything a host needs to draw one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionView {
    /// Key of the action this view was computed for
    pub key: &'static str,
    /// Label with the template already expanded
    pub label: String,
    /// Longer description naming the source, e.g. `Start 'api-prod'`
    pub title: Option<String>,
    pub icon: Option<String>,
    pub shortcut: Option<Shortcut>,
    pub flags: ViewFlags,
}

impl ActionView {
    /// A hidden, disabled view for `key`
    pub fn hidden(key: &'static str) -> Self {
        Self {
            key,
            label: key.to_string(),
            title: None,
            icon: None,
            shortcut: None,
            flags: ViewFlags::empty(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(ViewFlags::VISIBLE)
    }

    pub fn is_enabled(&self) -> bool {
        self.flags.contains(ViewFlags::ENABLED)
    }
}

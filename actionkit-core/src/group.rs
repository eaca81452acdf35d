//! Action groups and rendered menus
//!
//! A group is an ordered list of entries: action keys, literal sub-groups,
//! references to other registered groups and separators. Construction order
//! is rendering order.

use crate::id::{ActionId, GroupId};
use crate::view::ActionView;

/// One entry of an [`ActionGroup`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupEntry {
    /// An action, by key
    Action(&'static str),
    /// A literal nested group
    Group(ActionGroup),
    /// A group registered elsewhere, looked up at render time
    Ref(GroupId),
    /// A separator with an optional title
    Separator(Option<String>),
}

impl GroupEntry {
    pub fn separator(title: impl Into<String>) -> Self {
        GroupEntry::Separator(Some(title.into()))
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, GroupEntry::Separator(_))
    }
}

/// Strings starting with `-` are separators (`"---"`, `"--- Deploy"`); any
/// other string is an action key.
impl From<&'static str> for GroupEntry {
    fn from(raw: &'static str) -> Self {
        match raw.strip_prefix('-') {
            Some(rest) => {
                let title = rest.trim_start_matches('-').trim();
                if title.is_empty() {
                    GroupEntry::Separator(None)
                } else {
                    GroupEntry::separator(title)
                }
            }
            None => GroupEntry::Action(raw),
        }
    }
}

impl<T> From<ActionId<T>> for GroupEntry {
    fn from(id: ActionId<T>) -> Self {
        GroupEntry::Action(id.key())
    }
}

impl From<ActionGroup> for GroupEntry {
    fn from(group: ActionGroup) -> Self {
        GroupEntry::Group(group)
    }
}

impl From<GroupId> for GroupEntry {
    fn from(id: GroupId) -> Self {
        GroupEntry::Ref(id)
    }
}

/// Ordered, nestable composition of actions
///
/// Unlabelled groups are flattened into their parent when rendered; labelled
/// groups become submenus.
///
/// # Example
/// ```
/// use actionkit_core::action_group;
///
/// let group = action_group!["resource.start", "resource.stop", "---", "resource.refresh"];
/// assert_eq!(group.len(), 4);
/// assert!(group.entries()[2].is_separator());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionGroup {
    label: Option<String>,
    icon: Option<String>,
    entries: Vec<GroupEntry>,
}

impl ActionGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// A group rendered as a submenu titled `label`
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn from_entries<I, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<GroupEntry>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Append an entry (builder form)
    pub fn with(mut self, entry: impl Into<GroupEntry>) -> Self {
        self.add(entry);
        self
    }

    /// Append an entry
    pub fn add(&mut self, entry: impl Into<GroupEntry>) {
        self.entries.push(entry.into());
    }

    /// Insert an entry before the first occurrence of action `before`, or
    /// append when `before` is not in this group
    pub fn insert_before(&mut self, before: &str, entry: impl Into<GroupEntry>) {
        let index = self
            .entries
            .iter()
            .position(|e| matches!(e, GroupEntry::Action(key) if *key == before))
            .unwrap_or(self.entries.len());
        self.entries.insert(index, entry.into());
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn entries(&self) -> &[GroupEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every group reference in this group, including inside literal
    /// sub-groups
    pub fn references(&self) -> Vec<GroupId> {
        let mut refs = Vec::new();
        self.collect_references(&mut refs);
        refs
    }

    fn collect_references(&self, refs: &mut Vec<GroupId>) {
        for entry in &self.entries {
            match entry {
                GroupEntry::Ref(id) => refs.push(*id),
                GroupEntry::Group(group) => group.collect_references(refs),
                GroupEntry::Action(_) | GroupEntry::Separator(_) => {}
            }
        }
    }

    /// Every action key in this group, including inside literal sub-groups
    pub fn action_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        self.collect_keys(&mut keys);
        keys
    }

    fn collect_keys(&self, keys: &mut Vec<&'static str>) {
        for entry in &self.entries {
            match entry {
                GroupEntry::Action(key) => keys.push(*key),
                GroupEntry::Group(group) => group.collect_keys(keys),
                GroupEntry::Ref(_) | GroupEntry::Separator(_) => {}
            }
        }
    }
}

/// Build an [`ActionGroup`] from entries
///
/// Accepts anything convertible into a [`GroupEntry`]: action ids, string
/// keys, separator strings, nested groups and group ids.
#[macro_export]
macro_rules! action_group {
    () => {
        $crate::ActionGroup::new()
    };
    ($($entry:expr),+ $(,)?) => {{
        let mut group = $crate::ActionGroup::new();
        $(group.add($entry);)+
        group
    }};
}

/// A rendered menu entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Action(ActionView),
    Separator { title: Option<String> },
    Submenu {
        label: String,
        icon: Option<String>,
        items: Vec<MenuItem>,
    },
}

impl MenuItem {
    pub fn is_separator(&self) -> bool {
        matches!(self, MenuItem::Separator { .. })
    }

    /// The action view, for action items
    pub fn as_action(&self) -> Option<&ActionView> {
        match self {
            MenuItem::Action(view) => Some(view),
            _ => None,
        }
    }
}

/// Drop leading, trailing and consecutive separators
///
/// When separators collapse, the first titled one is kept.
pub fn normalize_separators(items: Vec<MenuItem>) -> Vec<MenuItem> {
    let mut out: Vec<MenuItem> = Vec::with_capacity(items.len());
    for item in items {
        match item {
            MenuItem::Separator { title } => match out.last_mut() {
                None => {}
                Some(MenuItem::Separator { title: prev }) => {
                    if prev.is_none() {
                        *prev = title;
                    }
                }
                Some(_) => out.push(MenuItem::Separator { title }),
            },
            other => out.push(other),
        }
    }
    if out.last().is_some_and(MenuItem::is_separator) {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewFlags;

    fn item(key: &'static str) -> MenuItem {
        MenuItem::Action(ActionView {
            flags: ViewFlags::VISIBLE | ViewFlags::ENABLED,
            ..ActionView::hidden(key)
        })
    }

    fn sep() -> MenuItem {
        MenuItem::Separator { title: None }
    }

    #[test]
    fn test_separator_strings() {
        assert_eq!(GroupEntry::from("---"), GroupEntry::Separator(None));
        assert_eq!(GroupEntry::from("-"), GroupEntry::Separator(None));
        assert_eq!(
            GroupEntry::from("--- Deploy"),
            GroupEntry::Separator(Some("Deploy".into()))
        );
        assert_eq!(GroupEntry::from("app.start"), GroupEntry::Action("app.start"));
    }

    #[test]
    fn test_group_preserves_order() {
        const START: ActionId<()> = ActionId::new("app.start");
        let mut group = action_group![START, "---", "app.stop"];
        group.add("app.restart");

        let keys: Vec<_> = group.action_keys();
        assert_eq!(keys, vec!["app.start", "app.stop", "app.restart"]);
        assert!(group.entries()[1].is_separator());
    }

    #[test]
    fn test_insert_before() {
        let mut group = action_group!["a", "c"];
        group.insert_before("c", "b");
        group.insert_before("missing", "d");
        assert_eq!(group.action_keys(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_references_include_nested_groups() {
        const EXTRA: GroupId = GroupId::new("extra");
        const MORE: GroupId = GroupId::new("more");
        let group = action_group!["a", EXTRA, action_group!["b", MORE]];
        assert_eq!(group.references(), vec![EXTRA, MORE]);
    }

    #[test]
    fn test_normalize_separators() {
        let items = vec![sep(), item("a"), sep(), sep(), item("b"), sep()];
        let normalized = normalize_separators(items);
        assert_eq!(normalized, vec![item("a"), sep(), item("b")]);
    }

    #[test]
    fn test_normalize_keeps_titled_separator() {
        let titled = MenuItem::Separator {
            title: Some("Deploy".into()),
        };
        let normalized = normalize_separators(vec![item("a"), sep(), titled.clone(), item("b")]);
        assert_eq!(normalized, vec![item("a"), titled, item("b")]);
    }

    #[test]
    fn test_normalize_only_separators() {
        assert!(normalize_separators(vec![sep(), sep()]).is_empty());
    }
}

//! Keyboard shortcuts attached to actions
//!
//! Shortcuts are written either in `ctrl+alt+o` form or in the space
//! separated IDE form (`control alt O`). Both parse to the same key.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ActionError;

/// A parsed keyboard shortcut
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl Shortcut {
    /// Parse a shortcut string like `"ctrl+p"`, `"shift+tab"` or `"control alt O"`
    pub fn parse(s: &str) -> Result<Self, ActionError> {
        parse_key_string(s)
            .map(|key| Self {
                code: key.code,
                modifiers: key.modifiers,
            })
            .ok_or_else(|| ActionError::InvalidShortcut(s.to_string()))
    }

    /// The key code
    pub fn code(&self) -> KeyCode {
        self.code
    }

    /// The modifiers that must be held
    pub fn modifiers(&self) -> KeyModifiers {
        self.modifiers
    }

    /// Whether a key press triggers this shortcut
    ///
    /// Character keys compare case-insensitively; kind and state are ignored.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        let codes_match = match (&self.code, &key.code) {
            (KeyCode::Char(c1), KeyCode::Char(c2)) => c1.eq_ignore_ascii_case(c2),
            _ => self.code == key.code,
        };
        codes_match && self.modifiers == key.modifiers
    }

    /// The key event this shortcut stands for
    pub fn key_event(&self) -> KeyEvent {
        KeyEvent {
            code: self.code,
            modifiers: self.modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }
}

impl FromStr for Shortcut {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code == KeyCode::BackTab {
            return f.write_str("Shift+Tab");
        }
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("^")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            f.write_str("Shift+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("Alt+")?;
        }
        match self.code {
            KeyCode::Esc => f.write_str("Esc"),
            KeyCode::Enter => f.write_str("Enter"),
            KeyCode::Tab => f.write_str("Tab"),
            KeyCode::Backspace => f.write_str("Backspace"),
            KeyCode::Up => f.write_str("Up"),
            KeyCode::Down => f.write_str("Down"),
            KeyCode::Left => f.write_str("Left"),
            KeyCode::Right => f.write_str("Right"),
            KeyCode::Home => f.write_str("Home"),
            KeyCode::End => f.write_str("End"),
            KeyCode::PageUp => f.write_str("PgUp"),
            KeyCode::PageDown => f.write_str("PgDn"),
            KeyCode::Delete => f.write_str("Del"),
            KeyCode::Insert => f.write_str("Ins"),
            KeyCode::F(n) => write!(f, "F{}", n),
            KeyCode::Char(' ') => f.write_str("Space"),
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Parse a shortcut string into a `KeyEvent`
///
/// Accepts `+` or whitespace between parts, so `"ctrl+alt+o"` and
/// `"control alt O"` are equivalent.
pub fn parse_key_string(key_str: &str) -> Option<KeyEvent> {
    let key_str = key_str.trim().to_lowercase();

    if key_str.is_empty() {
        return None;
    }

    // "+" alone is a key, not a separator
    let parts: Vec<&str> = if key_str == "+" {
        vec!["+"]
    } else {
        key_str
            .split(|c: char| c == '+' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect()
    };

    let (key_part, modifier_parts) = parts.split_last()?;
    let mut modifiers = KeyModifiers::empty();
    for part in modifier_parts {
        match *part {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" | "meta" => modifiers |= KeyModifiers::ALT,
            _ => return None,
        }
    }

    let code = match *key_part {
        "tab" if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
        "backtab" => {
            modifiers |= KeyModifiers::SHIFT;
            KeyCode::BackTab
        }
        "esc" | "escape" => KeyCode::Esc,
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" | "back_space" => KeyCode::Backspace,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "page_up" => KeyCode::PageUp,
        "pagedown" | "page_down" => KeyCode::PageDown,
        "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "space" => KeyCode::Char(' '),
        f if f.len() > 1 && f.starts_with('f') => {
            let n: u8 = f[1..].parse().ok()?;
            if !(1..=12).contains(&n) {
                return None;
            }
            KeyCode::F(n)
        }
        c if c.chars().count() == 1 => KeyCode::Char(c.chars().next()?),
        _ => return None,
    };

    Some(KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    })
}

/// IDE default shortcuts that contributors bind common commands to
///
/// Values are shortcut strings; an empty string leaves the command unbound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultShortcuts {
    pub add: String,
    pub delete: String,
    pub edit: String,
    pub view: String,
    pub refresh: String,
    pub start: String,
    pub stop: String,
    pub restart: String,
    pub deploy: String,
}

impl Default for DefaultShortcuts {
    fn default() -> Self {
        Self {
            add: "ctrl+n".into(),
            delete: "delete".into(),
            edit: "f4".into(),
            view: "f3".into(),
            refresh: "f5".into(),
            start: "ctrl+alt+s".into(),
            stop: "ctrl+alt+x".into(),
            restart: "ctrl+alt+r".into(),
            deploy: "ctrl+alt+d".into(),
        }
    }
}

impl DefaultShortcuts {
    fn bound(raw: &str) -> Option<Shortcut> {
        if raw.trim().is_empty() {
            return None;
        }
        match Shortcut::parse(raw) {
            Ok(shortcut) => Some(shortcut),
            Err(err) => {
                tracing::warn!(%err, "Ignoring default shortcut");
                None
            }
        }
    }

    pub fn add(&self) -> Option<Shortcut> {
        Self::bound(&self.add)
    }

    pub fn delete(&self) -> Option<Shortcut> {
        Self::bound(&self.delete)
    }

    pub fn edit(&self) -> Option<Shortcut> {
        Self::bound(&self.edit)
    }

    pub fn view(&self) -> Option<Shortcut> {
        Self::bound(&self.view)
    }

    pub fn refresh(&self) -> Option<Shortcut> {
        Self::bound(&self.refresh)
    }

    pub fn start(&self) -> Option<Shortcut> {
        Self::bound(&self.start)
    }

    pub fn stop(&self) -> Option<Shortcut> {
        Self::bound(&self.stop)
    }

    pub fn restart(&self) -> Option<Shortcut> {
        Self::bound(&self.restart)
    }

    pub fn deploy(&self) -> Option<Shortcut> {
        Self::bound(&self.deploy)
    }

    /// Overlay user shortcuts onto defaults; every value the user set wins,
    /// including one equal to the built-in default
    pub fn merge(defaults: Self, user: ShortcutOverrides) -> Self {
        Self {
            add: user.add.unwrap_or(defaults.add),
            delete: user.delete.unwrap_or(defaults.delete),
            edit: user.edit.unwrap_or(defaults.edit),
            view: user.view.unwrap_or(defaults.view),
            refresh: user.refresh.unwrap_or(defaults.refresh),
            start: user.start.unwrap_or(defaults.start),
            stop: user.stop.unwrap_or(defaults.stop),
            restart: user.restart.unwrap_or(defaults.restart),
            deploy: user.deploy.unwrap_or(defaults.deploy),
        }
    }
}

/// Shortcuts a user configured; absent fields keep the defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortcutOverrides {
    pub add: Option<String>,
    pub delete: Option<String>,
    pub edit: Option<String>,
    pub view: Option<String>,
    pub refresh: Option<String>,
    pub start: Option<String>,
    pub stop: Option<String>,
    pub restart: Option<String>,
    pub deploy: Option<String>,
}

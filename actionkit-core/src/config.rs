//! Registry configuration

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ActionError;
use crate::shortcuts::{DefaultShortcuts, ShortcutOverrides};

/// Which auth-required actions stay visible for linked sources while no
/// subscription is selected
///
/// Handler matching still applies; this only lifts the subscription gate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkedBypass {
    /// Linked sources are gated like any other source
    Disabled,
    /// Every auth-required action may bypass the gate for linked sources
    #[default]
    All,
    /// Only the listed action keys may bypass the gate
    Only(HashSet<String>),
}

impl LinkedBypass {
    /// Whether the policy covers the action with `key`
    pub fn covers(&self, key: &str) -> bool {
        match self {
            LinkedBypass::Disabled => false,
            LinkedBypass::All => true,
            LinkedBypass::Only(keys) => keys.contains(key),
        }
    }
}

/// Configuration for an [`ActionRegistry`](crate::ActionRegistry)
///
/// # Example
/// ```
/// use actionkit_core::{LinkedBypass, RegistryConfig};
///
/// let config = RegistryConfig::from_json(r#"{
///     "shortcuts": { "deploy": "F9" },
///     "linked_bypass": { "only": ["resource.refresh"] }
/// }"#).unwrap();
///
/// assert!(config.linked_bypass.covers("resource.refresh"));
/// assert!(!config.linked_bypass.covers("resource.delete"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Default shortcuts handed to contributors
    pub shortcuts: DefaultShortcuts,
    /// Linked-source policy for the auth gate
    pub linked_bypass: LinkedBypass,
}

impl RegistryConfig {
    /// Decode a config from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ActionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Overlay user settings onto this config; every field the user set wins
    pub fn merge(self, user: RegistryOverrides) -> Self {
        Self {
            shortcuts: DefaultShortcuts::merge(self.shortcuts, user.shortcuts),
            linked_bypass: user.linked_bypass.unwrap_or(self.linked_bypass),
        }
    }
}

/// Settings from a user config file; absent fields leave the base config alone
///
/// # Example
/// ```
/// use actionkit_core::{LinkedBypass, RegistryConfig, RegistryOverrides};
///
/// let base = RegistryConfig {
///     linked_bypass: LinkedBypass::Disabled,
///     ..Default::default()
/// };
/// let user = RegistryOverrides::from_json(r#"{"linked_bypass": "all"}"#).unwrap();
/// assert_eq!(base.merge(user).linked_bypass, LinkedBypass::All);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryOverrides {
    pub shortcuts: ShortcutOverrides,
    pub linked_bypass: Option<LinkedBypass>,
}

impl RegistryOverrides {
    /// Decode user settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ActionError> {
        Ok(serde_json::from_str(json)?)
    }
}

//! Source trait for objects actions operate on

use std::path::PathBuf;

/// An object an action can be invoked on (the thing in focus).
///
/// Sources are usually a tagged enum of everything a tree node or editor can
/// hold, so handler predicates stay simple variant checks. Use
/// `#[derive(Source)]` from `actionkit-macros` to generate `type_name()`,
/// the linked marker and one `is_<variant>()` predicate per variant.
///
/// # Example
/// ```
/// use actionkit_core::Source;
///
/// enum Resource {
///     WebApp(String),
///     LinkedStorage(String),
/// }
///
/// impl Source for Resource {
///     fn type_name(&self) -> &'static str {
///         match self {
///             Resource::WebApp(_) => "web_app",
///             Resource::LinkedStorage(_) => "linked_storage",
///         }
///     }
///
///     fn is_linked(&self) -> bool {
///         matches!(self, Resource::LinkedStorage(_))
///     }
/// }
///
/// assert!(Resource::LinkedStorage("acct".into()).is_linked());
/// ```
pub trait Source: Send + Sync + 'static {
    /// Short name of the runtime kind of this source, used in logs
    fn type_name(&self) -> &'static str;

    /// Whether the source is attached from outside the selected
    /// subscriptions (e.g. through a connection string)
    ///
    /// Linked sources can skip the subscription gate on auth-required actions
    /// when the registry's linked-bypass policy allows it.
    fn is_linked(&self) -> bool {
        false
    }
}

impl Source for () {
    fn type_name(&self) -> &'static str {
        "unit"
    }
}

impl Source for String {
    fn type_name(&self) -> &'static str {
        "string"
    }
}

impl Source for PathBuf {
    fn type_name(&self) -> &'static str {
        "path"
    }
}

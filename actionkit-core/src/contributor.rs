//! Contributors: feature modules that populate the registry

use crate::error::ActionError;
use crate::registry::ActionRegistry;

/// Order of the contributor that declares the shared, cross-cutting actions
pub const INITIALIZE_ORDER: i32 = 0;

/// A feature module registering actions, handlers and groups
///
/// [`ActionRegistry::init`] sorts contributors by [`order`](Self::order)
/// (lower first, ties keep their given order) and runs each phase across all
/// of them before starting the next: every contributor's actions, then every
/// contributor's handlers, then every contributor's groups. A contributor can
/// therefore attach handlers to actions declared by any other contributor,
/// and extend any group, regardless of order within a phase.
///
/// # Example
/// ```
/// use actionkit_core::{
///     Action, ActionError, ActionId, ActionRegistry, Contributor, INITIALIZE_ORDER,
/// };
///
/// const REFRESH: ActionId<()> = ActionId::new("common.refresh");
///
/// struct Common;
///
/// impl Contributor for Common {
///     fn name(&self) -> &str {
///         "common"
///     }
///
///     fn order(&self) -> i32 {
///         INITIALIZE_ORDER
///     }
///
///     fn register_actions(&self, registry: &mut ActionRegistry) -> Result<(), ActionError> {
///         registry.register_action(Action::new(REFRESH).label("Refresh"))
///     }
/// }
/// ```
pub trait Contributor {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Priority; contributors with lower values register first
    fn order(&self) -> i32 {
        INITIALIZE_ORDER + 1
    }

    fn register_actions(&self, _registry: &mut ActionRegistry) -> Result<(), ActionError> {
        Ok(())
    }

    fn register_handlers(&self, _registry: &mut ActionRegistry) -> Result<(), ActionError> {
        Ok(())
    }

    fn register_groups(&self, _registry: &mut ActionRegistry) -> Result<(), ActionError> {
        Ok(())
    }
}

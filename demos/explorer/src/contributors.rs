//! Feature modules contributing actions to the explorer

use actionkit::prelude::*;
use crossterm::event::KeyEvent;
use std::any::Any;

use crate::command::{self, Command, Commands, Operation};
use crate::resources::Resource;

pub const DEPLOY: ActionId<Resource> = ActionId::new("resource.deploy");
pub const START: ActionId<Resource> = ActionId::new("resource.start");
pub const STOP: ActionId<Resource> = ActionId::new("resource.stop");
pub const RESTART: ActionId<Resource> = ActionId::new("resource.restart");
pub const REFRESH: ActionId<Resource> = ActionId::new("resource.refresh");
pub const OPEN_PORTAL: ActionId<Resource> = ActionId::new("resource.open_portal");
pub const PIN: ActionId<Resource> = ActionId::new("resource.pin");
pub const PUSH_IMAGE: ActionId<Resource> = ActionId::new("registry.push_image");
pub const TOGGLE_ADMIN: ActionId<Resource> = ActionId::new("registry.toggle_admin");

/// Built into the host rather than contributed
pub const COPY_NAME: &str = "host.copy_name";

pub const RESOURCE_MENU: GroupId = GroupId::new("resource.menu");
pub const LIFECYCLE: GroupId = GroupId::new("resource.lifecycle");
pub const REGISTRY_MENU: GroupId = GroupId::new("registry.menu");

fn name(resource: &Resource) -> String {
    resource.name().to_string()
}

fn run(op: Operation) -> impl Fn(&Resource, &ActionContext) + Send + Sync + 'static {
    move |resource, ctx| {
        command::send(
            ctx,
            Command::Run {
                op,
                name: name(resource),
            },
        )
    }
}

/// Shared actions and the resource context menu
pub struct Common;

impl Contributor for Common {
    fn name(&self) -> &str {
        "common"
    }

    fn order(&self) -> i32 {
        INITIALIZE_ORDER
    }

    fn register_actions(&self, registry: &mut ActionRegistry) -> Result<(), ActionError> {
        let shortcuts = registry.default_shortcuts().clone();

        registry.register_action(
            Action::new(DEPLOY)
                .label("Deploy")
                .icon("rocket")
                .id_param(name)
                .shortcut(shortcuts.deploy()),
        )?;
        registry.register_action(
            Action::new(START)
                .label("Start")
                .id_param(name)
                .shortcut(shortcuts.start())
                .enabled_when(|r, _| !r.is_running()),
        )?;
        registry.register_action(
            Action::new(STOP)
                .label("Stop")
                .id_param(name)
                .shortcut(shortcuts.stop())
                .enabled_when(|r, _| r.is_running()),
        )?;
        registry.register_action(
            Action::new(RESTART)
                .label("Restart")
                .id_param(name)
                .shortcut(shortcuts.restart())
                .enabled_when(|r, _| r.is_running()),
        )?;
        registry.register_action(
            Action::new(REFRESH)
                .label("Refresh")
                .id_param(name)
                .shortcut(shortcuts.refresh())
                .handler(run(Operation::Refresh)),
        )?;
        registry.register_action(
            Action::new(OPEN_PORTAL)
                .label("Open in Portal")
                .auth_required(false)
                .shortcut(Shortcut::parse("ctrl+o").ok())
                .handler(|r, ctx| command::send(ctx, Command::OpenPortal(name(r)))),
        )?;
        registry.register_action(
            Action::new(PIN)
                .label_with(|r| if r.is_pinned() { "Unpin" } else { "Pin" }.to_string())
                .icon_with(|r| if r.is_pinned() { "pin-off" } else { "pin" }.to_string())
                .shortcut(Shortcut::parse("ctrl+p").ok())
                .handler_when(
                    |r, _| r.is_linked(),
                    |r, ctx| command::send(ctx, Command::TogglePin(name(r))),
                ),
        )
    }

    fn register_groups(&self, registry: &mut ActionRegistry) -> Result<(), ActionError> {
        registry.register_group(LIFECYCLE, action_group![START, STOP, RESTART])?;
        registry.register_group(
            RESOURCE_MENU,
            action_group![
                DEPLOY,
                "---",
                LIFECYCLE,
                "---",
                PIN,
                REFRESH,
                "--- Host",
                OPEN_PORTAL,
                COPY_NAME,
            ],
        )
    }
}

/// Web and function apps: deploy and lifecycle
pub struct AppService;

impl Contributor for AppService {
    fn name(&self) -> &str {
        "app-service"
    }

    fn register_handlers(&self, registry: &mut ActionRegistry) -> Result<(), ActionError> {
        registry.register_handler(DEPLOY, |r, _| r.is_web_app(), run(Operation::Deploy))?;
        registry.register_handler(DEPLOY, |r, _| r.is_function_app(), run(Operation::Deploy))?;
        for (id, op) in [
            (START, Operation::Start),
            (STOP, Operation::Stop),
            (RESTART, Operation::Restart),
        ] {
            registry.register_handler(id, |r, _| r.is_app(), run(op))?;
        }
        Ok(())
    }
}

/// Container registries: their own actions, spliced into the shared menu
pub struct Containers;

impl Contributor for Containers {
    fn name(&self) -> &str {
        "containers"
    }

    fn register_actions(&self, registry: &mut ActionRegistry) -> Result<(), ActionError> {
        registry.register_action(
            Action::new(PUSH_IMAGE)
                .label("Push Image to {}")
                .id_param(name)
                .handler_when(|r, _| r.is_container_registry(), run(Operation::PushImage)),
        )?;
        registry.register_action(
            Action::new(TOGGLE_ADMIN)
                .label_with(|r| match r {
                    Resource::ContainerRegistry {
                        admin_enabled: true,
                        ..
                    } => "Disable Admin User".to_string(),
                    _ => "Enable Admin User".to_string(),
                })
                .handler_when(
                    |r, _| r.is_container_registry(),
                    |r, ctx| command::send(ctx, Command::ToggleAdmin(name(r))),
                ),
        )
    }

    fn register_groups(&self, registry: &mut ActionRegistry) -> Result<(), ActionError> {
        registry.register_group(
            REGISTRY_MENU,
            ActionGroup::labelled("Registry")
                .with(PUSH_IMAGE)
                .with(TOGGLE_ADMIN),
        )?;
        registry
            .group_mut(RESOURCE_MENU)?
            .insert_before(PIN.key(), REGISTRY_MENU);
        Ok(())
    }
}

fn copy_name_shortcut() -> Option<Shortcut> {
    Shortcut::parse("ctrl+c").ok()
}

/// Host command bound to `key`, for keys no registered action claims
pub fn host_shortcut(key: &KeyEvent) -> Option<&'static str> {
    copy_name_shortcut()
        .is_some_and(|shortcut| shortcut.matches(key))
        .then_some(COPY_NAME)
}

/// Host-provided commands surfaced through the same menus
pub struct Builtins {
    commands: Commands,
}

impl Builtins {
    pub fn new(commands: Commands) -> Self {
        Self { commands }
    }
}

impl HostFallback for Builtins {
    fn view(&self, key: &'static str, _ctx: &ActionContext) -> Option<ActionView> {
        (key == COPY_NAME).then(|| ActionView {
            key,
            label: "Copy Name".into(),
            title: None,
            icon: None,
            shortcut: copy_name_shortcut(),
            flags: actionkit::ViewFlags::all(),
        })
    }

    fn invoke(&self, key: &str, source: &dyn Any, _ctx: &ActionContext) -> bool {
        if key != COPY_NAME {
            return false;
        }
        match source.downcast_ref::<Resource>() {
            Some(resource) => {
                self.commands.send(Command::CopyName(resource.name().to_string()));
                true
            }
            None => false,
        }
    }
}

/// Build the explorer's registry
pub fn build_registry(
    config: RegistryConfig,
    commands: Commands,
) -> Result<ActionRegistry, ActionError> {
    let mut registry = ActionRegistry::init(config, &[&AppService, &Containers, &Common])?;
    registry.set_fallback(Builtins::new(commands));
    registry.add_observer(LoggingObserver::new());
    Ok(registry)
}

//! Explorer state and key handling, independent of the terminal

use std::collections::{HashSet, VecDeque};

use actionkit::prelude::*;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::command::{Command, Commands, Operation};
use crate::contributors::RESOURCE_MENU;
use crate::resources::Resource;

/// Where requests from the tree originate
pub const PLACE: &str = "explorer.tree";

const STATUS_LINES: usize = 6;

/// One line of an open context menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuRow {
    Action { depth: usize, view: ActionView },
    Separator { depth: usize, title: Option<String> },
    Submenu { depth: usize, label: String },
}

impl MenuRow {
    fn selectable(&self) -> bool {
        matches!(self, MenuRow::Action { view, .. } if view.is_enabled())
    }
}

/// Flatten rendered items into rows, indenting submenu children
pub fn menu_rows(items: &[MenuItem]) -> Vec<MenuRow> {
    fn walk(items: &[MenuItem], depth: usize, rows: &mut Vec<MenuRow>) {
        for item in items {
            match item {
                MenuItem::Action(view) => rows.push(MenuRow::Action {
                    depth,
                    view: view.clone(),
                }),
                MenuItem::Separator { title } => rows.push(MenuRow::Separator {
                    depth,
                    title: title.clone(),
                }),
                MenuItem::Submenu { label, items, .. } => {
                    rows.push(MenuRow::Submenu {
                        depth,
                        label: label.clone(),
                    });
                    walk(items, depth + 1, rows);
                }
            }
        }
    }

    let mut rows = Vec::new();
    walk(items, 0, &mut rows);
    rows
}

#[derive(Debug, Clone)]
pub struct MenuState {
    pub rows: Vec<MenuRow>,
    pub cursor: usize,
}

impl MenuState {
    fn new(rows: Vec<MenuRow>) -> Self {
        let cursor = rows.iter().position(MenuRow::selectable).unwrap_or(0);
        Self { rows, cursor }
    }

    fn step(&mut self, forward: bool) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let mut next = self.cursor;
        for _ in 0..len {
            next = if forward {
                (next + 1) % len
            } else {
                (next + len - 1) % len
            };
            if self.rows[next].selectable() {
                self.cursor = next;
                return;
            }
        }
    }

    /// Key of the action under the cursor, if it can run
    pub fn current(&self) -> Option<&'static str> {
        match self.rows.get(self.cursor) {
            Some(MenuRow::Action { view, .. }) if view.is_enabled() => Some(view.key),
            _ => None,
        }
    }
}

pub struct App {
    registry: ActionRegistry,
    commands: Commands,
    resources: Vec<Resource>,
    selected: usize,
    menu: Option<MenuState>,
    auth: AuthState,
    status: VecDeque<String>,
    busy: HashSet<String>,
    should_quit: bool,
}

impl App {
    pub fn new(registry: ActionRegistry, commands: Commands, resources: Vec<Resource>) -> Self {
        Self {
            registry,
            commands,
            resources,
            selected: 0,
            menu: None,
            auth: AuthState::READY,
            status: VecDeque::new(),
            busy: HashSet::new(),
            should_quit: false,
        }
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn selected(&self) -> Option<&Resource> {
        self.resources.get(self.selected)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn menu(&self) -> Option<&MenuState> {
        self.menu.as_ref()
    }

    pub fn auth(&self) -> AuthState {
        self.auth
    }

    pub fn set_auth(&mut self, auth: AuthState) {
        self.auth = auth;
    }

    pub fn status(&self) -> impl Iterator<Item = &str> {
        self.status.iter().map(String::as_str)
    }

    pub fn is_busy(&self, name: &str) -> bool {
        self.busy.contains(name)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Context for requests made from the tree
    pub fn context(&self) -> ActionContext {
        ActionContext::new()
            .with_place(PLACE)
            .with_auth(self.auth)
            .with(self.commands.clone())
    }

    pub fn push_status(&mut self, line: impl Into<String>) {
        if self.status.len() == STATUS_LINES {
            self.status.pop_front();
        }
        self.status.push_back(line.into());
    }

    /// React to a key press; returns true when the screen should be redrawn
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.menu.is_some() {
            return self.handle_menu_key(key);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc if key.modifiers.is_empty() => {
                self.should_quit = true;
                false
            }
            KeyCode::Char('j') | KeyCode::Down if !key.modifiers.contains(KeyModifiers::ALT) => {
                self.move_selection(true)
            }
            KeyCode::Char('k') | KeyCode::Up if !key.modifiers.contains(KeyModifiers::ALT) => {
                self.move_selection(false)
            }
            KeyCode::Enter | KeyCode::Char('m') if key.modifiers.is_empty() => {
                self.open_menu();
                true
            }
            KeyCode::Char('a') if key.modifiers.is_empty() => {
                self.cycle_auth();
                true
            }
            _ => self.dispatch_shortcut(key),
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> bool {
        let Some(menu) = self.menu.as_mut() else {
            return false;
        };
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.menu = None;
            }
            KeyCode::Char('j') | KeyCode::Down => menu.step(true),
            KeyCode::Char('k') | KeyCode::Up => menu.step(false),
            KeyCode::Enter => {
                if let Some(action) = menu.current() {
                    self.menu = None;
                    self.invoke(action);
                }
            }
            _ => return false,
        }
        true
    }

    fn move_selection(&mut self, forward: bool) -> bool {
        let len = self.resources.len();
        if len == 0 {
            return false;
        }
        self.selected = if forward {
            (self.selected + 1).min(len - 1)
        } else {
            self.selected.saturating_sub(1)
        };
        true
    }

    fn cycle_auth(&mut self) {
        self.auth = match self.auth {
            AuthState::SignedOut => AuthState::SignedIn {
                subscription_selected: false,
            },
            AuthState::SignedIn {
                subscription_selected: false,
            } => AuthState::READY,
            AuthState::SignedIn { .. } => AuthState::SignedOut,
        };
        let line = match self.auth {
            AuthState::SignedOut => "Signed out",
            AuthState::SignedIn {
                subscription_selected: false,
            } => "Signed in, no subscription selected",
            AuthState::SignedIn { .. } => "Signed in",
        };
        self.push_status(line);
    }

    /// Render the context menu for the selected resource
    pub fn open_menu(&mut self) {
        let ctx = self.context();
        let Some(resource) = self.resources.get(self.selected) else {
            return;
        };
        match self.registry.render_group(RESOURCE_MENU, resource, &ctx) {
            Ok(items) if items.is_empty() => {
                let line = format!("No actions for {}", resource.name());
                self.push_status(line);
            }
            Ok(items) => self.menu = Some(MenuState::new(menu_rows(&items))),
            Err(err) => self.push_status(format!("Menu unavailable: {err}")),
        }
    }

    fn dispatch_shortcut(&mut self, key: KeyEvent) -> bool {
        let ctx = self.context();
        let Some(resource) = self.resources.get(self.selected) else {
            return false;
        };
        let target = self.registry.shortcut_target(&key, resource, &ctx).or_else(|| {
            // host commands are not registered actions
            crate::contributors::host_shortcut(&key)
        });
        match target {
            Some(action) => {
                self.invoke(action);
                true
            }
            None => false,
        }
    }

    /// Invoke an action on the selected resource
    pub fn invoke(&mut self, action: &str) {
        let ctx = self.context();
        let Some(resource) = self.resources.get(self.selected) else {
            return;
        };
        if let Err(err) = self.registry.invoke_key(action, resource, &ctx) {
            self.push_status(format!("{action}: {err}"));
        }
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut Resource> {
        self.resources.iter_mut().find(|r| r.name() == name)
    }

    /// Apply a command sent by a handler
    ///
    /// Quick commands change state right away. Long-running ones mark the
    /// resource busy and are returned for the host loop to run.
    pub fn apply(&mut self, command: Command) -> Option<(Operation, String)> {
        match command {
            Command::Run { op, name } => {
                if !self.busy.insert(name.clone()) {
                    self.push_status(format!("{name} is busy"));
                    return None;
                }
                self.push_status(format!("{} {}...", op.verb(), name));
                return Some((op, name));
            }
            Command::OpenPortal(name) => {
                self.push_status(format!("Opening {name} in the portal"));
            }
            Command::CopyName(name) => {
                self.push_status(format!("Copied '{name}'"));
            }
            Command::TogglePin(name) => {
                if let Some(Resource::LinkedStorageAccount { pinned, .. }) = self.find_mut(&name)
                {
                    *pinned = !*pinned;
                    let line = if *pinned { "Pinned" } else { "Unpinned" };
                    self.push_status(format!("{line} {name}"));
                }
            }
            Command::ToggleAdmin(name) => {
                if let Some(Resource::ContainerRegistry { admin_enabled, .. }) =
                    self.find_mut(&name)
                {
                    *admin_enabled = !*admin_enabled;
                    let line = if *admin_enabled { "enabled" } else { "disabled" };
                    self.push_status(format!("Admin user {line} on {name}"));
                }
            }
        }
        None
    }

    /// Record the end of a long-running operation
    pub fn finish(&mut self, op: Operation, name: &str) {
        self.busy.remove(name);
        if let Some(resource) = self.find_mut(name) {
            match (op, resource) {
                (
                    Operation::Start | Operation::Restart | Operation::Deploy,
                    Resource::WebApp { running, .. } | Resource::FunctionApp { running, .. },
                ) => *running = true,
                (
                    Operation::Stop,
                    Resource::WebApp { running, .. } | Resource::FunctionApp { running, .. },
                ) => *running = false,
                _ => {}
            }
        }
        tracing::info!(?op, resource = name, "Operation finished");
        self.push_status(format!("{} {} done", op.verb(), name));
    }
}

//! Explorer behavior driven through key presses, without a terminal

use actionkit::prelude::*;
use actionkit::{key, menu_lines};
use explorer_demo::contributors::{build_registry, RESOURCE_MENU};
use explorer_demo::{sample_resources, App, Command, Commands, Operation, Resource};
use tokio::sync::mpsc::{self, UnboundedReceiver};

fn explorer_with(config: RegistryConfig) -> (App, UnboundedReceiver<Command>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let commands = Commands::new(tx);
    let registry = build_registry(config, commands.clone()).unwrap();
    (App::new(registry, commands, sample_resources()), rx)
}

fn explorer() -> (App, UnboundedReceiver<Command>) {
    explorer_with(RegistryConfig::default())
}

fn select(app: &mut App, name: &str) {
    for _ in 0..app.resources().len() {
        if app.selected().is_some_and(|r| r.name() == name) {
            return;
        }
        app.handle_key(key("j"));
    }
    panic!("no resource named {name}");
}

fn menu_for(app: &App, name: &str) -> Vec<String> {
    let resource = app
        .resources()
        .iter()
        .find(|r| r.name() == name)
        .unwrap();
    let items = app
        .registry()
        .render_group(RESOURCE_MENU, resource, &app.context())
        .unwrap();
    menu_lines(&items)
}

#[test]
fn test_web_app_menu() {
    let (app, _rx) = explorer();
    assert_eq!(
        menu_for(&app, "api-prod"),
        vec![
            "Deploy",
            "---",
            "Start (disabled)",
            "Stop",
            "Restart",
            "---",
            "Refresh",
            "--- Host",
            "Open in Portal",
            "Copy Name",
        ]
    );
}

#[test]
fn test_registry_menu_has_submenu() {
    let (app, _rx) = explorer();
    assert_eq!(
        menu_for(&app, "images"),
        vec![
            "Registry >",
            "  Push Image to images",
            "  Enable Admin User",
            "Refresh",
            "--- Host",
            "Open in Portal",
            "Copy Name",
        ]
    );
}

#[test]
fn test_linked_storage_menu() {
    let (app, _rx) = explorer();
    assert_eq!(
        menu_for(&app, "shared-assets"),
        vec!["Pin", "Refresh", "--- Host", "Open in Portal", "Copy Name"]
    );
}

#[test]
fn test_signed_out_hides_auth_actions() {
    let (mut app, _rx) = explorer();
    app.set_auth(AuthState::SignedOut);
    assert_eq!(menu_for(&app, "api-prod"), vec!["Open in Portal", "Copy Name"]);
}

#[test]
fn test_linked_storage_skips_subscription_gate() {
    let (mut app, _rx) = explorer();
    app.set_auth(AuthState::SignedIn {
        subscription_selected: false,
    });
    let lines = menu_for(&app, "shared-assets");
    assert_eq!(lines[0], "Pin");

    let lines = menu_for(&app, "api-prod");
    assert!(!lines.contains(&"Deploy".to_string()));
}

#[test]
fn test_deploy_from_menu() {
    let (mut app, mut rx) = explorer();

    assert!(app.handle_key(key("enter")));
    let menu = app.menu().unwrap();
    assert_eq!(menu.current(), Some("resource.deploy"));

    assert!(app.handle_key(key("enter")));
    assert!(app.menu().is_none());

    let command = rx.try_recv().unwrap();
    assert_eq!(
        command,
        Command::Run {
            op: Operation::Deploy,
            name: "api-prod".into()
        }
    );
}

#[test]
fn test_menu_cursor_skips_disabled() {
    let (mut app, mut rx) = explorer();
    app.handle_key(key("m"));
    // Start is disabled on a running app
    app.handle_key(key("j"));
    assert_eq!(app.menu().unwrap().current(), Some("resource.stop"));

    app.handle_key(key("enter"));
    assert_eq!(
        rx.try_recv().unwrap(),
        Command::Run {
            op: Operation::Stop,
            name: "api-prod".into()
        }
    );
}

#[test]
fn test_escape_closes_menu_without_invoking() {
    let (mut app, mut rx) = explorer();
    app.handle_key(key("enter"));
    assert!(app.menu().is_some());
    app.handle_key(key("esc"));
    assert!(app.menu().is_none());
    assert!(!app.should_quit());
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_start_shortcut_respects_enablement() {
    let (mut app, mut rx) = explorer();
    let start = app.registry().default_shortcuts().start().unwrap().key_event();

    // api-prod is already running
    assert!(!app.handle_key(start));
    assert!(rx.try_recv().is_err());

    select(&mut app, "web-staging");
    assert!(app.handle_key(start));
    assert_eq!(
        rx.try_recv().unwrap(),
        Command::Run {
            op: Operation::Start,
            name: "web-staging".into()
        }
    );
}

#[test]
fn test_deploy_routes_to_function_app() {
    let (mut app, mut rx) = explorer();
    select(&mut app, "nightly-jobs");
    app.handle_key(key("ctrl+alt+d"));
    assert_eq!(
        rx.try_recv().unwrap(),
        Command::Run {
            op: Operation::Deploy,
            name: "nightly-jobs".into()
        }
    );
}

#[test]
fn test_shortcut_override_from_config() {
    let user = RegistryOverrides::from_json(r#"{"shortcuts": {"deploy": "f9"}}"#).unwrap();
    let (mut app, mut rx) = explorer_with(RegistryConfig::default().merge(user));

    assert!(!app.handle_key(key("ctrl+alt+d")));
    assert!(app.handle_key(key("f9")));
    assert!(matches!(
        rx.try_recv().unwrap(),
        Command::Run {
            op: Operation::Deploy,
            ..
        }
    ));
}

#[test]
fn test_copy_name_goes_through_host() {
    let (mut app, mut rx) = explorer();
    select(&mut app, "images");
    assert!(app.handle_key(key("ctrl+c")));
    assert_eq!(rx.try_recv().unwrap(), Command::CopyName("images".into()));
}

#[test]
fn test_pin_toggles_label() {
    let (mut app, mut rx) = explorer();
    select(&mut app, "shared-assets");
    app.handle_key(key("ctrl+p"));

    let command = rx.try_recv().unwrap();
    assert_eq!(command, Command::TogglePin("shared-assets".into()));
    assert!(app.apply(command).is_none());

    assert!(app.selected().unwrap().is_pinned());
    assert_eq!(menu_for(&app, "shared-assets")[0], "Unpin");
}

#[test]
fn test_pin_shortcut_ignored_for_apps() {
    let (mut app, mut rx) = explorer();
    assert!(!app.handle_key(key("ctrl+p")));
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_long_running_operation_lifecycle() {
    let (mut app, _rx) = explorer();
    let run = Command::Run {
        op: Operation::Start,
        name: "web-staging".into(),
    };

    let work = app.apply(run.clone());
    assert_eq!(work, Some((Operation::Start, "web-staging".to_string())));
    assert!(app.is_busy("web-staging"));

    // a second request while busy is refused
    assert!(app.apply(run).is_none());

    app.finish(Operation::Start, "web-staging");
    assert!(!app.is_busy("web-staging"));
    let staging = app
        .resources()
        .iter()
        .find(|r| r.name() == "web-staging")
        .unwrap();
    assert!(matches!(staging, Resource::WebApp { running: true, .. }));
}

#[test]
fn test_toggle_admin() {
    let (mut app, _rx) = explorer();
    app.apply(Command::ToggleAdmin("images".into()));
    assert_eq!(menu_for(&app, "images")[2], "  Disable Admin User");
}

#[test]
fn test_auth_cycle_and_quit() {
    let (mut app, _rx) = explorer();
    assert_eq!(app.auth(), AuthState::READY);
    app.handle_key(key("a"));
    assert_eq!(app.auth(), AuthState::SignedOut);
    assert_eq!(app.status().last(), Some("Signed out"));

    app.handle_key(key("q"));
    assert!(app.should_quit());
}

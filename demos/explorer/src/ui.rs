//! Drawing the explorer

use actionkit::AuthState;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, MenuRow, MenuState};
use crate::resources::Resource;

const HELP: &str = "j/k: move  Enter/m: menu  a: auth  q: quit";

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let [main, status, help] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Length(1),
    ])
    .areas(area);
    let [tree, details] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Fill(1)]).areas(main);

    render_tree(frame, app, tree);
    render_details(frame, app, details);
    render_status(frame, app, status);

    let help_line = Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help_line, help);

    if let Some(menu) = app.menu() {
        render_menu(frame, menu, area);
    }
}

fn render_tree(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .resources()
        .iter()
        .map(|resource| {
            let mut spans = vec![Span::raw(resource.name().to_string())];
            if resource.is_running() {
                spans.push(Span::styled(" ●", Style::default().fg(Color::Green)));
            }
            if resource.is_pinned() {
                spans.push(Span::styled(" [pinned]", Style::default().fg(Color::Yellow)));
            }
            if app.is_busy(resource.name()) {
                spans.push(Span::styled(" …", Style::default().fg(Color::Magenta)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Resources ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default().with_selected(Some(app.selected_index()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_details(frame: &mut Frame, app: &App, area: Rect) {
    let auth = match app.auth() {
        AuthState::SignedOut => "signed out",
        AuthState::SignedIn {
            subscription_selected: false,
        } => "signed in (no subscription)",
        AuthState::SignedIn { .. } => "signed in",
    };

    let mut lines = vec![Line::from(vec![
        Span::styled("Auth: ", Style::default().fg(Color::DarkGray)),
        Span::raw(auth),
    ])];
    if let Some(resource) = app.selected() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            resource.name().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::raw(resource.kind_label()));
        if let Some(state) = state_label(resource) {
            lines.push(Line::raw(state));
        }
    }

    let details = Paragraph::new(lines).block(Block::default().title(" Details ").borders(Borders::ALL));
    frame.render_widget(details, area);
}

fn state_label(resource: &Resource) -> Option<&'static str> {
    match resource {
        Resource::WebApp { running, .. } | Resource::FunctionApp { running, .. } => {
            Some(if *running { "Running" } else { "Stopped" })
        }
        Resource::ContainerRegistry { admin_enabled, .. } => Some(if *admin_enabled {
            "Admin user enabled"
        } else {
            "Admin user disabled"
        }),
        Resource::LinkedStorageAccount { .. } => None,
    }
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app.status().map(Line::raw).collect();
    let status = Paragraph::new(lines).block(Block::default().title(" Activity ").borders(Borders::ALL));
    frame.render_widget(status, area);
}

fn render_menu(frame: &mut Frame, menu: &MenuState, area: Rect) {
    let height = (menu.rows.len() as u16).saturating_add(2).min(area.height);
    let [popup] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(40)])
        .flex(Flex::Center)
        .areas(popup);

    let items: Vec<ListItem> = menu.rows.iter().map(menu_line).map(ListItem::new).collect();
    let list = List::new(items)
        .block(
            Block::default()
                .title(" Actions ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default().with_selected(Some(menu.cursor));
    frame.render_widget(Clear, popup);
    frame.render_stateful_widget(list, popup, &mut state);
}

fn menu_line(row: &MenuRow) -> Line<'static> {
    match row {
        MenuRow::Action { depth, view } => {
            let style = if view.is_enabled() {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let mut spans = vec![Span::styled(
                format!("{}{}", indent(*depth), view.label),
                style,
            )];
            if let Some(shortcut) = &view.shortcut {
                spans.push(Span::styled(
                    format!("  {shortcut}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        }
        MenuRow::Separator { depth, title } => {
            let text = match title {
                Some(title) => format!("{}── {} ──", indent(*depth), title),
                None => format!("{}──────", indent(*depth)),
            };
            Line::styled(text, Style::default().fg(Color::DarkGray))
        }
        MenuRow::Submenu { depth, label } => Line::styled(
            format!("{}{} ▸", indent(*depth), label),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

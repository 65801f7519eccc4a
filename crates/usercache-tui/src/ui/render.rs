use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use serde_json::Value;

use crate::app::{App, AppState};

use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(5),    // User list + detail
            Constraint::Length(4), // Error area, two wrapped lines
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_error_area(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  usercache";
    let source = format!("{}  [?] Help", app.config.api_url());

    let title_line = Line::from(vec![
        Span::styled(title, styles::app_title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + source.len() + 2),
        )),
        Span::styled(source, styles::hint_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::hint_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_user_list(frame, app, chunks[0]);
    render_user_detail(frame, app, chunks[1]);
}

fn render_user_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .list_items()
        .into_iter()
        .map(|name| ListItem::new(name).style(styles::user_row_style()))
        .collect();

    let title = match app.list_source {
        Some(source) => format!(" Users ({}) - from {} ", app.users.len(), source.label()),
        None => " Users - [f]etch or load [c]ached ".to_string(),
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::list_title_style(app.list_source))
                .borders(Borders::ALL)
                .border_style(styles::panel_border_style(true)),
        )
        .highlight_style(styles::selected_row_style());

    let mut state = ListState::default();
    if !app.users.is_empty() {
        state.select(Some(app.selection));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

/// Display text for a JSON field value
fn field_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

fn render_user_detail(frame: &mut Frame, app: &App, area: Rect) {
    let lines = match app.selected_user() {
        Some(user) => {
            let mut lines = vec![
                Line::from(Span::styled(user.full_name(), styles::detail_name_style())),
                Line::from(""),
            ];
            for (key, value) in user.other_fields() {
                lines.push(Line::from(vec![
                    Span::styled(format!("{:<11}", format!("{}:", key)), styles::field_key_style()),
                    Span::raw(field_display(value)),
                ]));
            }
            lines
        }
        None => vec![Line::from(Span::styled("No user selected", styles::hint_style()))],
    };

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Details ")
                .title_style(styles::hint_style())
                .borders(Borders::ALL)
                .border_style(styles::panel_border_style(false)),
        );
    frame.render_widget(paragraph, area);
}

fn render_error_area(frame: &mut Frame, app: &App, area: Rect) {
    let text = app.error_message.clone().unwrap_or_default();
    let paragraph = Paragraph::new(Line::from(Span::styled(text, styles::error_text_style())))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::error_border_style(app.error_message.is_some())),
        );
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[f]etch | [c]ached | [q]uit";

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        format!(" Updated {} ", app.cache_age_display())
    };
    let right_text = format!(" {} ", shortcuts);

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::status_text_style(app.fetch_in_progress)),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::hint_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(44, 17, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");
    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(k, styles::key_style()),
            Span::styled(desc, styles::key_desc_style()),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled("  usercache", styles::app_title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::hint_style())),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::section_style())),
        key("  f         ", "Fetch users from the API"),
        key("  c         ", "Load cached users"),
        key("  q         ", "Quit"),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::section_style())),
        key("  ↑/↓ j/k   ", "Move selection"),
        key("  PgUp/PgDn ", "Move 10 rows"),
        key("  Home/End  ", "First/last user"),
        Line::from(""),
        Line::from(vec![
            Span::styled("    Press ", styles::hint_style()),
            Span::styled("?", styles::key_style()),
            Span::styled(" or ", styles::hint_style()),
            Span::styled("Esc", styles::key_style()),
            Span::styled(" to close", styles::hint_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::dialog_border_style())
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(40, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::section_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::hint_style()),
            Span::styled("[Y]", styles::key_style()),
            Span::styled(" to quit, ", styles::hint_style()),
            Span::styled("[N]", styles::key_style()),
            Span::styled(" to cancel", styles::hint_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::dialog_border_style())
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

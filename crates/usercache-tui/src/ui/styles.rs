//! Styles for each surface of the screen: the user list, the detail panel,
//! the error area, the status bar and the dialogs.

use ratatui::style::{Color, Modifier, Style};

use crate::app::ListSource;

const BRAND: Color = Color::Rgb(86, 156, 214);
/// List came from the API just now
const LIVE: Color = Color::Rgb(106, 170, 100);
/// List came from local storage
const CACHED: Color = Color::Rgb(214, 170, 76);
const FAILURE: Color = Color::Rgb(220, 80, 72);
const DIM: Color = Color::Rgb(120, 120, 128);
const SELECTION_BG: Color = Color::Rgb(44, 50, 70);
const BAR_BG: Color = Color::Rgb(30, 30, 38);

pub fn app_title_style() -> Style {
    Style::default().fg(BRAND).add_modifier(Modifier::BOLD)
}

pub fn hint_style() -> Style {
    Style::default().fg(DIM)
}

// ===== User list =====

/// Title of the list block, colored by where the list came from
pub fn list_title_style(source: Option<ListSource>) -> Style {
    match source {
        Some(ListSource::Api) => Style::default().fg(LIVE).add_modifier(Modifier::BOLD),
        Some(ListSource::Cache) => Style::default().fg(CACHED).add_modifier(Modifier::BOLD),
        None => hint_style(),
    }
}

pub fn user_row_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn selected_row_style() -> Style {
    Style::default().bg(SELECTION_BG).add_modifier(Modifier::BOLD)
}

pub fn panel_border_style(active: bool) -> Style {
    Style::default().fg(if active { BRAND } else { DIM })
}

// ===== Detail panel =====

pub fn detail_name_style() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

pub fn field_key_style() -> Style {
    Style::default().fg(DIM).add_modifier(Modifier::ITALIC)
}

// ===== Error area =====

pub fn error_text_style() -> Style {
    Style::default().fg(FAILURE)
}

/// The error area border turns red while it holds a message
pub fn error_border_style(has_error: bool) -> Style {
    Style::default().fg(if has_error { FAILURE } else { DIM })
}

// ===== Status bar =====

pub fn status_bar_style() -> Style {
    Style::default().bg(BAR_BG).fg(Color::White)
}

/// Left status text; stands out while a fetch is in flight
pub fn status_text_style(fetch_in_progress: bool) -> Style {
    if fetch_in_progress {
        Style::default().fg(CACHED).add_modifier(Modifier::BOLD)
    } else {
        hint_style()
    }
}

// ===== Dialogs =====

pub fn key_style() -> Style {
    Style::default().fg(CACHED).add_modifier(Modifier::BOLD)
}

pub fn key_desc_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn section_style() -> Style {
    Style::default().fg(BRAND)
}

pub fn dialog_border_style() -> Style {
    Style::default().fg(BRAND)
}

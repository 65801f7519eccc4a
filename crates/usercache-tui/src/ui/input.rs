//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return false;
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('f') => app.start_fetch(),
        KeyCode::Char('c') => app.load_cached(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),
        KeyCode::Esc => app.status_message = None,
        _ => {}
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::time::Duration;
    use usercache_core::api::ApiClient;
    use usercache_core::cache::CacheManager;
    use usercache_core::config::Config;
    use usercache_core::{User, UserDirectory};

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app(dir: &std::path::Path) -> App {
        let api = ApiClient::new("http://127.0.0.1:9/api/users", Duration::from_secs(1)).unwrap();
        let cache = CacheManager::new(dir.to_path_buf()).unwrap();
        App::with_directory(Config::default(), UserDirectory::new(api, cache))
    }

    #[test]
    fn test_quit_requires_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::ConfirmingQuit);

        assert!(!press(&mut app, KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Normal);

        press(&mut app, KeyCode::Char('q'));
        assert!(press(&mut app, KeyCode::Char('y')));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.state, AppState::ShowingHelp);

        // 'c' is ignored while help is open
        press(&mut app, KeyCode::Char('c'));
        assert!(app.error_message.is_none());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Normal);
    }

    #[test]
    fn test_cached_key_loads_cache() {
        let dir = tempfile::tempdir().unwrap();
        CacheManager::new(dir.path().to_path_buf())
            .unwrap()
            .save_users(&[User::new("Emma", "Wong"), User::new("Eve", "Holt")])
            .unwrap();
        let mut app = app(dir.path());

        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.list_items(), vec!["Emma Wong", "Eve Holt"]);

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selection, 1);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selection, 0);
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Focus};
use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    FocusNext,
    FocusPrev,
    NextLink,
    PrevLink,
    FollowLink,
    ScrollDown,
    ScrollUp,
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    JumpToTop,
    JumpToBottom,
    PendingG, // First 'g' press, waiting for the second
    Submit,
    InputChar(char),
    Backspace,
    ClearInput,
    /// Esc in the input field: hand focus back to the page
    LeaveInput,
    None,
}

/// Map a key press to an action for the focused widget
pub fn handle_key_event(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match app.focus {
        Focus::CepInput => handle_input_focus(key),
        Focus::SubmitButton => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Action::Submit,
            _ => handle_with_keymap(key, app, keymap),
        },
        Focus::Page => handle_with_keymap(key, app, keymap),
    }
}

/// The CEP field takes every printable key; Enter submits
fn handle_input_focus(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Backspace, _) => Action::Backspace,
        (KeyCode::Esc, _) => Action::LeaveInput,
        (KeyCode::Tab, _) => Action::FocusNext,
        (KeyCode::BackTab, _) => Action::FocusPrev,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::ClearInput,
        (KeyCode::Char(c), m) if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            Action::InputChar(c)
        }
        _ => Action::None,
    }
}

fn handle_with_keymap(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    let binding = KeyBinding::new(key.code, key.modifiers);

    if keymap.is_g_prefix(&binding) {
        return if app.pending_key == Some('g') {
            keymap.get_pending_g_action().cloned().unwrap_or(Action::None)
        } else {
            Action::PendingG
        };
    }

    if let Some(action) = keymap.get(&binding) {
        return action.clone();
    }

    // Uppercase letters may come with or without SHIFT depending on the terminal
    if let KeyCode::Char(c) = key.code {
        if c.is_ascii_uppercase() && key.modifiers == KeyModifiers::NONE {
            if let Some(action) = keymap.get(&KeyBinding::shift(key.code)) {
                return action.clone();
            }
        }
    }

    Action::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use cepcheck_core::AppConfig;
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with_focus(focus: Focus) -> App {
        let mut app = App::new(Arc::new(AppConfig::default()), crate::page::Page::builtin());
        app.focus = focus;
        app
    }

    #[test]
    fn test_input_focus_captures_characters() {
        let app = app_with_focus(Focus::CepInput);
        let keymap = Keymap::default();

        // 'q' is typed, not quit
        assert_eq!(handle_key_event(key(KeyCode::Char('q')), &app, &keymap), Action::InputChar('q'));
        assert_eq!(handle_key_event(key(KeyCode::Char('0')), &app, &keymap), Action::InputChar('0'));
        assert_eq!(handle_key_event(key(KeyCode::Enter), &app, &keymap), Action::Submit);
        assert_eq!(handle_key_event(key(KeyCode::Esc), &app, &keymap), Action::LeaveInput);
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &app, &keymap),
            Action::Quit
        );
    }

    #[test]
    fn test_button_focus() {
        let app = app_with_focus(Focus::SubmitButton);
        let keymap = Keymap::default();

        assert_eq!(handle_key_event(key(KeyCode::Enter), &app, &keymap), Action::Submit);
        assert_eq!(handle_key_event(key(KeyCode::Char(' ')), &app, &keymap), Action::Submit);
        assert_eq!(handle_key_event(key(KeyCode::Tab), &app, &keymap), Action::FocusNext);
        assert_eq!(handle_key_event(key(KeyCode::Char('q')), &app, &keymap), Action::Quit);
    }

    #[test]
    fn test_page_focus_and_gg() {
        let mut app = app_with_focus(Focus::Page);
        let keymap = Keymap::default();

        assert_eq!(handle_key_event(key(KeyCode::Enter), &app, &keymap), Action::FollowLink);
        assert_eq!(handle_key_event(key(KeyCode::Char('n')), &app, &keymap), Action::NextLink);
        assert_eq!(handle_key_event(key(KeyCode::Char('g')), &app, &keymap), Action::PendingG);

        app.pending_key = Some('g');
        assert_eq!(handle_key_event(key(KeyCode::Char('g')), &app, &keymap), Action::JumpToTop);

        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT), &app, &keymap),
            Action::JumpToBottom
        );
        assert_eq!(handle_key_event(key(KeyCode::Char('G')), &app, &keymap), Action::JumpToBottom);
    }
}

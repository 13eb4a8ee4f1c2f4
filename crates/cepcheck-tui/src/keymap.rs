use std::collections::HashMap;

use cepcheck_core::config::KeymapConfig;
use crossterm::event::{KeyCode, KeyModifiers};
use tracing::warn;

use crate::input::Action;

/// Key code plus modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn simple(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }
}

/// Key-to-action table built from `[keymap]`
pub struct Keymap {
    bindings: HashMap<KeyBinding, Action>,
    /// Action bound to the two-key "gg" sequence
    pending_g_action: Option<Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}

impl Keymap {
    pub fn from_config(config: &KeymapConfig) -> Self {
        let mut bindings = HashMap::new();
        let mut pending_g_action = None;

        let mut add_binding = |key_str: &str, action: Action| {
            if key_str == "gg" {
                pending_g_action = Some(action);
                return;
            }

            match parse_key_binding(key_str) {
                Some(binding) => {
                    if let Some(existing) = bindings.get(&binding) {
                        warn!(
                            "Key conflict: '{}' already bound to {:?}, ignoring binding to {:?}",
                            key_str, existing, action
                        );
                    } else {
                        bindings.insert(binding, action);
                    }
                }
                None => warn!("Invalid key binding: '{}'", key_str),
            }
        };

        add_binding(&config.quit, Action::Quit);
        add_binding(&config.focus_next, Action::FocusNext);
        add_binding(&config.focus_prev, Action::FocusPrev);
        add_binding(&config.next_link, Action::NextLink);
        add_binding(&config.prev_link, Action::PrevLink);
        add_binding(&config.follow_link, Action::FollowLink);
        add_binding(&config.scroll_down, Action::ScrollDown);
        add_binding(&config.scroll_up, Action::ScrollUp);
        add_binding(&config.scroll_half_down, Action::ScrollHalfPageDown);
        add_binding(&config.scroll_half_up, Action::ScrollHalfPageUp);
        add_binding(&config.jump_to_top, Action::JumpToTop);
        add_binding(&config.jump_to_bottom, Action::JumpToBottom);

        // Not configurable
        bindings.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        bindings.entry(KeyBinding::simple(KeyCode::Down)).or_insert(Action::ScrollDown);
        bindings.entry(KeyBinding::simple(KeyCode::Up)).or_insert(Action::ScrollUp);
        // Terminals report Shift+Tab as BackTab
        bindings.entry(KeyBinding::shift(KeyCode::BackTab)).or_insert(Action::FocusPrev);

        Self {
            bindings,
            pending_g_action,
        }
    }

    pub fn get(&self, binding: &KeyBinding) -> Option<&Action> {
        self.bindings.get(binding)
    }

    pub fn get_pending_g_action(&self) -> Option<&Action> {
        self.pending_g_action.as_ref()
    }

    /// A plain 'g' while "gg" is configured
    pub fn is_g_prefix(&self, binding: &KeyBinding) -> bool {
        self.pending_g_action.is_some()
            && binding.code == KeyCode::Char('g')
            && binding.modifiers == KeyModifiers::NONE
    }
}

/// Parse Vim-style key notation
///
/// - single char: "j", "/"; uppercase means Shift: "G"
/// - Ctrl / Shift: "<C-d>", "<S-Tab>"
/// - named keys: "<CR>", "<Esc>", "<Tab>", "<Space>", "<Up>", ...
pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
    let s = s.trim();

    if s.len() > 2 && s.starts_with('<') && s.ends_with('>') {
        return parse_special_key(&s[1..s.len() - 1]);
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    if c.is_ascii_uppercase() {
        Some(KeyBinding::shift(KeyCode::Char(c)))
    } else {
        Some(KeyBinding::simple(KeyCode::Char(c)))
    }
}

fn parse_special_key(inner: &str) -> Option<KeyBinding> {
    if let Some(rest) = inner.strip_prefix("C-") {
        return parse_key_name(rest).map(KeyBinding::ctrl);
    }

    if let Some(rest) = inner.strip_prefix("S-") {
        // Shift+Tab arrives as BackTab
        return match parse_key_name(rest)? {
            KeyCode::Tab => Some(KeyBinding::shift(KeyCode::BackTab)),
            key => Some(KeyBinding::shift(key)),
        };
    }

    parse_key_name(inner).map(KeyBinding::simple)
}

fn parse_key_name(name: &str) -> Option<KeyCode> {
    match name.to_lowercase().as_str() {
        "cr" | "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "backtab" => Some(KeyCode::BackTab),
        "space" | "spc" => Some(KeyCode::Char(' ')),
        "bs" | "backspace" => Some(KeyCode::Backspace),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "pagedown" | "pgdn" => Some(KeyCode::PageDown),
        _ => {
            let mut chars = name.chars();
            let c = chars.next()?;
            if chars.next().is_none() {
                Some(KeyCode::Char(c.to_ascii_lowercase()))
            } else {
                None
            }
        }
    }
}

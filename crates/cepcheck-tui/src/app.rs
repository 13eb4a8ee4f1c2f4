use std::sync::Arc;

use cepcheck_core::AppConfig;

use crate::form::{CepForm, FormUpdate};
use crate::page::Page;
use crate::scroll::{AnchorBinder, AnchorJump, ScrollAnimator};
use crate::theme::{load_theme, Theme};

const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

/// Widget holding keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Page,
    CepInput,
    SubmitButton,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Page => Focus::CepInput,
            Focus::CepInput => Focus::SubmitButton,
            Focus::SubmitButton => Focus::Page,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Page => Focus::SubmitButton,
            Focus::CepInput => Focus::Page,
            Focus::SubmitButton => Focus::CepInput,
        }
    }
}

pub struct App {
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub page: Page,
    pub anchors: AnchorBinder,
    pub scroll: ScrollAnimator,
    /// Row the page view is drawn from this frame
    pub page_scroll: u16,
    /// Inner size of the page view, refreshed on every draw
    pub viewport_width: u16,
    pub viewport_height: u16,
    pub selected_link: Option<usize>,
    pub focus: Focus,
    pub form: CepForm,
    pub pending_key: Option<char>,
    pub status_message: Option<String>,
    spinner_frame: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Arc<AppConfig>, page: Page) -> Self {
        let theme = load_theme(&config.ui.theme);
        let anchors = AnchorBinder::bind(&page);
        let scroll = ScrollAnimator::new(config.ui.scroll.clone());

        Self {
            config,
            theme,
            page,
            anchors,
            scroll,
            page_scroll: 0,
            viewport_width: 80,
            viewport_height: 20,
            selected_link: None,
            focus: Focus::CepInput,
            form: CepForm::default(),
            pending_key: None,
            status_message: None,
            spinner_frame: 0,
            should_quit: false,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn max_scroll(&self) -> u16 {
        self.page
            .height(self.viewport_width)
            .saturating_sub(self.viewport_height)
    }

    pub fn next_link(&mut self) {
        let count = self.page.links().len();
        if count == 0 {
            return;
        }
        self.selected_link = Some(match self.selected_link {
            Some(i) => (i + 1) % count,
            None => 0,
        });
    }

    pub fn prev_link(&mut self) {
        let count = self.page.links().len();
        if count == 0 {
            return;
        }
        self.selected_link = Some(match self.selected_link {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        });
    }

    /// Follow the selected link; in-page anchors animate the page view
    pub fn follow_selected_link(&mut self) -> AnchorJump {
        let Some(link) = self.selected_link else {
            return AnchorJump::NoLink;
        };
        let max_scroll = self.max_scroll();
        self.anchors.follow(
            link,
            &self.page,
            &mut self.scroll,
            self.viewport_width,
            max_scroll,
        )
    }

    pub fn scroll_down(&mut self) {
        let max_scroll = self.max_scroll();
        self.scroll.scroll_down(max_scroll);
    }

    pub fn scroll_up(&mut self) {
        let max_scroll = self.max_scroll();
        self.scroll.scroll_up(max_scroll);
    }

    pub fn scroll_half_page_down(&mut self) {
        let max_scroll = self.max_scroll();
        self.scroll.scroll_half_page_down(self.viewport_height, max_scroll);
    }

    pub fn scroll_half_page_up(&mut self) {
        let max_scroll = self.max_scroll();
        self.scroll.scroll_half_page_up(self.viewport_height, max_scroll);
    }

    pub fn jump_to_top(&mut self) {
        let max_scroll = self.max_scroll();
        self.scroll.scroll_to(0, max_scroll);
    }

    pub fn jump_to_bottom(&mut self) {
        let max_scroll = self.max_scroll();
        self.scroll.scroll_to(max_scroll, max_scroll);
    }

    /// Advance the scroll animation for this frame
    pub fn update_scroll_animation(&mut self) {
        let max_scroll = self.max_scroll();
        self.page_scroll = self.scroll.update(max_scroll);
    }

    pub fn needs_scroll_update(&self) -> bool {
        self.scroll.needs_update()
    }

    pub fn apply_form_update(&mut self, update: FormUpdate) {
        self.form.apply(update);
    }

    /// Pasted text goes into the CEP field only while it has focus
    pub fn paste(&mut self, text: &str) {
        if self.focus == Focus::CepInput {
            self.form.input.paste(text);
        }
    }

    /// Raw input value to submit, `None` while the submit control is disabled
    pub fn take_submission(&mut self) -> Option<String> {
        if self.form.button.is_disabled() {
            return None;
        }
        self.clear_status();
        Some(self.form.input.value().to_string())
    }

    pub fn tick_spinner(&mut self) {
        if self.form.button.is_disabled() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn spinner_char(&self) -> char {
        SPINNER_FRAMES[self.spinner_frame]
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn clear_pending_key(&mut self) {
        self.pending_key = None;
    }
}

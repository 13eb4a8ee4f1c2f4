//! CEP form state: masked input field, submit control and result panel

use cepcheck_core::cep::{mask_cep, render, RenderedResult};
use cepcheck_core::{LookupView, ResultPayload};
use tokio::sync::mpsc;

/// Submit control label when idle
pub const SUBMIT_LABEL: &str = "Verificar";
/// Submit control label while a lookup runs (spinner drawn after it)
pub const CHECKING_LABEL: &str = "Verificando";

/// Input field holding the masked CEP
#[derive(Debug, Clone, Default)]
pub struct CepInput {
    value: String,
}

impl CepInput {
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Type a character; the value is re-masked like on every input event
    pub fn insert(&mut self, c: char) {
        self.value.push(c);
        self.value = mask_cep(&self.value);
    }

    pub fn backspace(&mut self) {
        self.value.pop();
        self.value = mask_cep(&self.value);
    }

    /// Append pasted text after the current value, then re-mask
    pub fn paste(&mut self, text: &str) {
        self.value.push_str(text);
        self.value = mask_cep(&self.value);
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Idle,
    Busy,
}

#[derive(Debug, Clone, Default)]
pub struct SubmitButton {
    state: ButtonState,
}

impl SubmitButton {
    pub fn is_disabled(&self) -> bool {
        self.state == ButtonState::Busy
    }

    pub fn label(&self) -> &'static str {
        match self.state {
            ButtonState::Idle => SUBMIT_LABEL,
            ButtonState::Busy => CHECKING_LABEL,
        }
    }

    pub fn set_busy(&mut self) {
        self.state = ButtonState::Busy;
    }

    pub fn set_idle(&mut self) {
        self.state = ButtonState::Idle;
    }
}

/// Result container: category style, title, message
#[derive(Debug, Clone, Default)]
pub struct ResultPanel {
    payload: Option<ResultPayload>,
    visible: bool,
}

impl ResultPanel {
    /// Replace the content and make the panel visible
    pub fn show(&mut self, payload: &ResultPayload) {
        self.payload = Some(payload.clone());
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible && self.payload.is_some()
    }

    pub fn payload(&self) -> Option<&ResultPayload> {
        self.payload.as_ref()
    }

    /// Text for the panel at the given inner width, `None` while hidden
    pub fn rendered(&self, width: u16) -> Option<RenderedResult> {
        if !self.visible {
            return None;
        }
        self.payload.as_ref().map(|p| render(p, width as usize))
    }
}

/// View changes requested by a running lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormUpdate {
    Busy,
    Idle,
    HideResult,
    ShowResult(ResultPayload),
}

/// Everything on screen that belongs to the CEP form
#[derive(Debug, Clone, Default)]
pub struct CepForm {
    pub input: CepInput,
    pub button: SubmitButton,
    pub result: ResultPanel,
}

impl CepForm {
    pub fn apply(&mut self, update: FormUpdate) {
        match update {
            FormUpdate::Busy => self.button.set_busy(),
            FormUpdate::Idle => self.button.set_idle(),
            FormUpdate::HideResult => self.result.hide(),
            FormUpdate::ShowResult(payload) => self.result.show(&payload),
        }
    }
}

/// `LookupView` for a lookup running on its own task; the UI loop drains the
/// channel and applies each update to its `CepForm`
#[derive(Debug, Clone)]
pub struct ChannelView {
    tx: mpsc::UnboundedSender<FormUpdate>,
}

impl ChannelView {
    pub fn new(tx: mpsc::UnboundedSender<FormUpdate>) -> Self {
        Self { tx }
    }

    fn send(&self, update: FormUpdate) {
        // Receiver gone means the UI is shutting down
        let _ = self.tx.send(update);
    }
}

impl LookupView for ChannelView {
    fn enter_busy(&mut self) {
        self.send(FormUpdate::Busy);
    }

    fn leave_busy(&mut self) {
        self.send(FormUpdate::Idle);
    }

    fn hide_result(&mut self) {
        self.send(FormUpdate::HideResult);
    }

    fn show_result(&mut self, payload: &ResultPayload) {
        self.send(FormUpdate::ShowResult(payload.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cepcheck_core::Category;

    #[test]
    fn test_input_masks_while_typing() {
        let mut input = CepInput::default();
        for c in "01310930".chars() {
            input.insert(c);
        }
        assert_eq!(input.value(), "01310-930");

        // Extra digits and letters are dropped
        input.insert('7');
        input.insert('x');
        assert_eq!(input.value(), "01310-930");

        input.backspace();
        input.backspace();
        input.backspace();
        assert_eq!(input.value(), "01310");
    }

    #[test]
    fn test_input_paste() {
        let mut input = CepInput::default();
        input.paste("CEP: 01310.930");
        assert_eq!(input.value(), "01310-930");
    }

    #[test]
    fn test_paste_in_pieces() {
        let mut input = CepInput::default();
        input.paste("01310");
        input.paste("930xx");
        assert_eq!(input.value(), "01310-930");
    }

    #[test]
    fn test_button_labels() {
        let mut button = SubmitButton::default();
        assert!(!button.is_disabled());
        assert_eq!(button.label(), "Verificar");

        button.set_busy();
        assert!(button.is_disabled());
        assert_eq!(button.label(), "Verificando");

        button.set_idle();
        assert!(!button.is_disabled());
        assert_eq!(button.label(), "Verificar");
    }

    #[test]
    fn test_result_panel_show_is_idempotent() {
        let payload = ResultPayload::not_found();
        let mut once = ResultPanel::default();
        once.show(&payload);
        let mut twice = ResultPanel::default();
        twice.show(&payload);
        twice.show(&payload);

        assert_eq!(once.rendered(60), twice.rendered(60));
        assert!(twice.is_visible());
        assert_eq!(twice.rendered(60).unwrap().category, Category::Error);
    }

    #[test]
    fn test_result_panel_hide() {
        let mut panel = ResultPanel::default();
        assert!(!panel.is_visible());
        panel.show(&ResultPayload::lookup_failed());
        panel.hide();
        assert!(!panel.is_visible());
        assert!(panel.rendered(60).is_none());
    }

    #[test]
    fn test_channel_view_round_trip() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut view = ChannelView::new(tx);
        let mut form = CepForm::default();

        view.enter_busy();
        view.hide_result();
        view.show_result(&ResultPayload::invalid_cep());
        view.leave_busy();

        let mut seen = Vec::new();
        while let Ok(update) = rx.try_recv() {
            seen.push(update.clone());
            form.apply(update);
        }

        assert_eq!(seen.first(), Some(&FormUpdate::Busy));
        assert_eq!(seen.last(), Some(&FormUpdate::Idle));
        assert!(!form.button.is_disabled());
        assert_eq!(form.result.payload(), Some(&ResultPayload::invalid_cep()));
    }
}

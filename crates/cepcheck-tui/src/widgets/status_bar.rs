use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let focus_str = match app.focus {
            Focus::Page => "Página",
            Focus::CepInput => "CEP",
            Focus::SubmitButton => "Verificar",
        };

        let status_text = match &app.status_message {
            Some(msg) => format!(" {}", msg),
            None => format!(" {} | UF atendida: {}", focus_str, app.config.service.supported_uf),
        };

        let help_hint = match app.focus {
            Focus::Page => " tab:foco n/p:links enter:abrir j/k:rolar q:sair ",
            Focus::CepInput => " enter:verificar esc:página tab:foco ",
            Focus::SubmitButton => " enter:verificar tab:foco q:sair ",
        };

        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg).bg(theme.bg_alt)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg_alt)),
            Span::styled(help_hint, Style::default().fg(theme.muted).bg(theme.bg_alt)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

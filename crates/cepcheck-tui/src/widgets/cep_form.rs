use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Focus};

/// Masked CEP field and its submit control, side by side
pub struct CepFormWidget;

impl CepFormWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(16), Constraint::Length(18)])
            .split(area);

        Self::render_input(frame, columns[0], app);
        Self::render_button(frame, columns[1], app);
    }

    fn render_input(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let is_focused = app.focus == Focus::CepInput;

        let block = Block::default()
            .title(" CEP ")
            .borders(Borders::ALL)
            .border_style(if is_focused {
                Style::default().fg(theme.accent)
            } else {
                Style::default().fg(theme.muted)
            })
            .style(Style::default().bg(theme.bg));

        let value = app.form.input.value();
        let line = if value.is_empty() && !is_focused {
            Line::from(Span::styled("00000-000", Style::default().fg(theme.muted)))
        } else {
            Line::from(Span::styled(value.to_string(), Style::default().fg(theme.fg)))
        };

        let inner_area = block.inner(area);
        frame.render_widget(Paragraph::new(line).block(block), area);

        if is_focused {
            let x = inner_area.x + value.len() as u16;
            frame.set_cursor_position((x.min(inner_area.right().saturating_sub(1)), inner_area.y));
        }
    }

    fn render_button(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let button = &app.form.button;
        let is_focused = app.focus == Focus::SubmitButton;

        let label = if button.is_disabled() {
            format!("{} {}", button.label(), app.spinner_char())
        } else {
            button.label().to_string()
        };

        let style = if button.is_disabled() {
            Style::default().fg(theme.muted)
        } else if is_focused {
            Style::default()
                .fg(theme.bg)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if is_focused {
                Style::default().fg(theme.accent)
            } else {
                Style::default().fg(theme.muted)
            })
            .style(Style::default().bg(theme.bg));

        let paragraph = Paragraph::new(Line::from(Span::styled(label, style)))
            .centered()
            .block(block);
        frame.render_widget(paragraph, area);
    }
}

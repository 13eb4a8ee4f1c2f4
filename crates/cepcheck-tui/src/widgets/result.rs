use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Result panel: category-colored frame, bold title, rendered message
pub struct ResultWidget;

impl ResultWidget {
    /// Rows the panel needs at `width`, zero while hidden
    pub fn height(app: &App, width: u16) -> u16 {
        match app.form.result.rendered(width.saturating_sub(2)) {
            // Borders plus title row
            Some(rendered) => (rendered.body.len() as u16).saturating_add(3),
            None => 0,
        }
    }

    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let Some(rendered) = app.form.result.rendered(area.width.saturating_sub(2)) else {
            return;
        };

        let theme = &app.theme;
        let color = theme.category_color(rendered.category);

        let block = Block::default()
            .title(format!(" {} ", rendered.category.css_class()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(theme.bg));

        let mut lines = vec![Line::from(Span::styled(
            rendered.title.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))];
        lines.extend(
            rendered
                .body
                .iter()
                .map(|line| Line::from(Span::styled(line.clone(), Style::default().fg(theme.fg)))),
        );

        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cepcheck_core::{AppConfig, ResultPayload};

    use super::*;
    use crate::form::FormUpdate;
    use crate::page::Page;

    #[test]
    fn test_height_tracks_visibility() {
        let mut app = App::new(Arc::new(AppConfig::default()), Page::builtin());
        assert_eq!(ResultWidget::height(&app, 60), 0);

        app.apply_form_update(FormUpdate::ShowResult(ResultPayload::not_found()));
        assert!(ResultWidget::height(&app, 60) >= 4);

        app.apply_form_update(FormUpdate::HideResult);
        assert_eq!(ResultWidget::height(&app, 60), 0);
    }
}

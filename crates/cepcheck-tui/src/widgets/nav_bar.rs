use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Section titles, the one at the top of the page view highlighted
pub struct NavBarWidget;

impl NavBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let current = current_section(app);

        let mut spans = vec![Span::styled(
            format!(" {} ", app.config.service.region_name),
            Style::default()
                .fg(theme.bg)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )];

        for (index, section) in app.page.sections().iter().enumerate() {
            let style = if Some(index) == current {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.muted)
            };
            spans.push(Span::styled(format!("  {}", section.title), style.bg(theme.bg_alt)));
        }

        let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bg_alt));
        frame.render_widget(paragraph, area);
    }
}

/// Last section whose heading is at or above the first visible row
fn current_section(app: &App) -> Option<usize> {
    let mut current = None;
    for (index, section) in app.page.sections().iter().enumerate() {
        match app.page.section_offset(&section.id, app.viewport_width) {
            Some(row) if row <= app.page_scroll => current = Some(index),
            _ => break,
        }
    }
    current
}

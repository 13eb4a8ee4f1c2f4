use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Focus};
use crate::page::{BlockKind, PageLine, SegmentKind};
use crate::theme::Theme;

pub struct PageViewWidget;

impl PageViewWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        let is_focused = app.focus == Focus::Page;

        let border_style = if is_focused {
            Style::default().fg(app.theme.accent)
        } else {
            Style::default().fg(app.theme.muted)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(app.theme.bg));

        let inner_area = block.inner(area);
        frame.render_widget(block, area);

        // Scroll bounds depend on the wrapped height at this size
        app.viewport_width = inner_area.width;
        app.viewport_height = inner_area.height;

        let lines: Vec<Line> = app
            .page
            .layout(inner_area.width)
            .iter()
            .map(|line| styled_line(line, &app.theme, app.selected_link))
            .collect();

        let paragraph = Paragraph::new(Text::from(lines)).scroll((app.page_scroll, 0));
        frame.render_widget(paragraph, inner_area);
    }
}

fn styled_line<'a>(line: &PageLine, theme: &Theme, selected: Option<usize>) -> Line<'a> {
    let base = match line.kind {
        BlockKind::Heading(_) => Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        BlockKind::Paragraph | BlockKind::Blank => Style::default().fg(theme.fg),
    };

    let spans: Vec<Span> = line
        .segments
        .iter()
        .map(|segment| {
            let style = match segment.kind {
                SegmentKind::Text => base,
                SegmentKind::Link(index) if Some(index) == selected => Style::default()
                    .fg(theme.bg)
                    .bg(theme.link)
                    .add_modifier(Modifier::BOLD),
                SegmentKind::Link(_) => Style::default()
                    .fg(theme.link)
                    .add_modifier(Modifier::UNDERLINED),
            };
            Span::styled(segment.text.clone(), style)
        })
        .collect();

    Line::from(spans)
}

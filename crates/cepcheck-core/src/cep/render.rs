use html2text::render::TrivialDecorator;

use super::models::{Category, ResultPayload};

/// Narrowest width handed to the markup converter
const MIN_RENDER_WIDTH: usize = 10;

/// A result payload flattened to terminal text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResult {
    pub category: Category,
    pub title: String,
    pub body: Vec<String>,
}

/// Convert a payload's message markup to wrapped plain-text lines
///
/// Pure: the same payload and width always give the same lines.
pub fn render(payload: &ResultPayload, width: usize) -> RenderedResult {
    let width = width.max(MIN_RENDER_WIDTH);
    // Plain text: no `**` around emphasis
    let text = html2text::from_read_with_decorator(
        payload.message.as_bytes(),
        width,
        TrivialDecorator::new(),
    )
    .unwrap_or_else(|_| payload.message.clone());

    let mut body: Vec<String> = text.lines().map(|line| line.trim_end().to_string()).collect();
    while body.last().is_some_and(|line| line.is_empty()) {
        body.pop();
    }

    RenderedResult {
        category: payload.category,
        title: payload.title.clone(),
        body,
    }
}

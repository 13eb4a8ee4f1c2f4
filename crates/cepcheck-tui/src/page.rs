//! Page document shown above the CEP form
//!
//! A tiny markdown-like format:
//! - `# Title {#id}` starts a section (`{#id}` optional, otherwise a slug of the title)
//! - `[label](href)` is a link; `#id` hrefs point inside the page
//! - blank lines separate paragraphs

use std::sync::OnceLock;

use regex::Regex;
use unicode_width::UnicodeWidthChar;

/// Landing page used when no `ui.page_path` is configured
pub const BUILTIN_PAGE: &str = include_str!("../assets/landing.md");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub href: String,
}

impl Link {
    /// Fragment of an in-page link (`#contato` -> `contato`)
    pub fn fragment(&self) -> Option<&str> {
        self.href.strip_prefix('#')
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub title: String,
    block: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Text,
    /// Index into `Page::links`
    Link(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub kind: SegmentKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading(u8),
    Paragraph,
    Blank,
}

#[derive(Debug, Clone)]
struct Block {
    kind: BlockKind,
    segments: Vec<Segment>,
}

/// One display row after wrapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLine {
    pub kind: BlockKind,
    pub segments: Vec<Segment>,
    block: usize,
}

#[derive(Debug, Clone)]
pub struct Page {
    blocks: Vec<Block>,
    sections: Vec<Section>,
    links: Vec<Link>,
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(#{1,3})\s+(.*?)(?:\s*\{#([A-Za-z0-9_-]+)\})?\s*$").expect("valid heading pattern")
    })
}

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").expect("valid link pattern"))
}

impl Page {
    pub fn builtin() -> Self {
        Self::parse(BUILTIN_PAGE)
    }

    pub fn parse(source: &str) -> Self {
        let mut page = Page {
            blocks: Vec::new(),
            sections: Vec::new(),
            links: Vec::new(),
        };

        for raw in source.lines() {
            let line = raw.trim_end();

            if line.trim().is_empty() {
                // Collapse runs of blank lines
                if page.blocks.last().is_some_and(|b| b.kind != BlockKind::Blank) {
                    page.blocks.push(Block {
                        kind: BlockKind::Blank,
                        segments: Vec::new(),
                    });
                }
                continue;
            }

            if let Some(caps) = heading_re().captures(line) {
                let level = caps[1].len() as u8;
                let title = caps[2].trim().to_string();
                let id = caps
                    .get(3)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| slugify(&title));

                page.sections.push(Section {
                    id,
                    title: title.clone(),
                    block: page.blocks.len(),
                });
                page.blocks.push(Block {
                    kind: BlockKind::Heading(level),
                    segments: vec![Segment {
                        text: title,
                        kind: SegmentKind::Text,
                    }],
                });
                continue;
            }

            let segments = page.parse_inline(line);
            page.blocks.push(Block {
                kind: BlockKind::Paragraph,
                segments,
            });
        }

        while page.blocks.last().is_some_and(|b| b.kind == BlockKind::Blank) {
            page.blocks.pop();
        }

        page
    }

    fn parse_inline(&mut self, line: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in link_re().captures_iter(line) {
            let Some(whole) = caps.get(0) else { continue };
            if whole.start() > last {
                segments.push(Segment {
                    text: line[last..whole.start()].to_string(),
                    kind: SegmentKind::Text,
                });
            }

            let index = self.links.len();
            self.links.push(Link {
                label: caps[1].to_string(),
                href: caps[2].to_string(),
            });
            segments.push(Segment {
                text: caps[1].to_string(),
                kind: SegmentKind::Link(index),
            });
            last = whole.end();
        }

        if last < line.len() {
            segments.push(Segment {
                text: line[last..].to_string(),
                kind: SegmentKind::Text,
            });
        }

        segments
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn find_section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Wrap every block to `width` display columns
    pub fn layout(&self, width: u16) -> Vec<PageLine> {
        let width = (width as usize).max(1);
        let mut lines = Vec::new();

        for (index, block) in self.blocks.iter().enumerate() {
            if block.kind == BlockKind::Blank {
                lines.push(PageLine {
                    kind: BlockKind::Blank,
                    segments: Vec::new(),
                    block: index,
                });
                continue;
            }

            for segments in wrap_segments(&block.segments, width) {
                lines.push(PageLine {
                    kind: block.kind,
                    segments,
                    block: index,
                });
            }
        }

        lines
    }

    pub fn height(&self, width: u16) -> u16 {
        self.layout(width).len().min(u16::MAX as usize) as u16
    }

    /// Row of a section's heading once the page is wrapped to `width`
    pub fn section_offset(&self, id: &str, width: u16) -> Option<u16> {
        let section = self.find_section(id)?;
        self.layout(width)
            .iter()
            .position(|line| line.block == section.block)
            .map(|row| row.min(u16::MAX as usize) as u16)
    }
}

/// Lowercase, alphanumerics kept, whitespace and dashes folded into `-`
fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if (c.is_whitespace() || c == '-') && !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Break styled segments into rows no wider than `width` columns
fn wrap_segments(segments: &[Segment], width: usize) -> Vec<Vec<Segment>> {
    let mut rows: Vec<Vec<Segment>> = Vec::new();
    let mut row: Vec<Segment> = Vec::new();
    let mut row_width = 0;

    for segment in segments {
        let mut piece = String::new();
        for ch in segment.text.chars() {
            let ch_width = ch.width().unwrap_or(1);
            if row_width + ch_width > width && row_width > 0 {
                if !piece.is_empty() {
                    row.push(Segment {
                        text: std::mem::take(&mut piece),
                        kind: segment.kind,
                    });
                }
                rows.push(std::mem::take(&mut row));
                row_width = 0;
                // Don't start a wrapped row with a space
                if ch == ' ' {
                    continue;
                }
            }
            piece.push(ch);
            row_width += ch_width;
        }
        if !piece.is_empty() {
            row.push(Segment {
                text: piece,
                kind: segment.kind,
            });
        }
    }

    if !row.is_empty() || rows.is_empty() {
        rows.push(row);
    }

    rows
}

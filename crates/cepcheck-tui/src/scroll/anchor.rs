use crate::page::Page;

use super::animation::ScrollAnimator;

/// What following a link did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorJump {
    /// Animating to the top edge of a section
    Scrolled { section: String, row: u16 },
    /// In-page link whose target does not exist; nothing moved
    Missing { fragment: String },
    /// Not an in-page link; left to the caller
    External { href: String },
    /// No link at that index
    NoLink,
}

/// In-page `#fragment` links, bound once when the page is loaded
#[derive(Debug, Clone, Default)]
pub struct AnchorBinder {
    /// Fragment per link index, `None` for links leaving the page
    fragments: Vec<Option<String>>,
}

impl AnchorBinder {
    pub fn bind(page: &Page) -> Self {
        let fragments: Vec<Option<String>> = page
            .links()
            .iter()
            .map(|link| link.fragment().map(str::to_string))
            .collect();

        tracing::debug!(
            "Bound {} in-page anchors out of {} links",
            fragments.iter().filter(|f| f.is_some()).count(),
            fragments.len()
        );

        Self { fragments }
    }

    pub fn is_bound(&self, link: usize) -> bool {
        matches!(self.fragments.get(link), Some(Some(_)))
    }

    pub fn bound_count(&self) -> usize {
        self.fragments.iter().filter(|f| f.is_some()).count()
    }

    /// Follow a link: bound anchors never navigate on their own, they either
    /// animate to the section or do nothing
    pub fn follow(
        &self,
        link: usize,
        page: &Page,
        animator: &mut ScrollAnimator,
        width: u16,
        max_scroll: u16,
    ) -> AnchorJump {
        let Some(slot) = self.fragments.get(link) else {
            return AnchorJump::NoLink;
        };

        let Some(fragment) = slot else {
            let href = page
                .links()
                .get(link)
                .map(|l| l.href.clone())
                .unwrap_or_default();
            return AnchorJump::External { href };
        };

        match page.section_offset(fragment, width) {
            Some(row) => {
                animator.scroll_to(row, max_scroll);
                AnchorJump::Scrolled {
                    section: fragment.clone(),
                    row,
                }
            }
            None => {
                tracing::debug!("No section for anchor #{}", fragment);
                AnchorJump::Missing {
                    fragment: fragment.clone(),
                }
            }
        }
    }
}

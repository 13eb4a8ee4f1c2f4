use std::time::{Duration, Instant};

use super::config::{ScrollConfig, ScrollConfigExt};
use super::easing::{EasingType, EasingTypeExt};
use super::timing::{is_complete, lerp_u16, progress};

#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: u16,
    to: u16,
    duration: Duration,
    easing: EasingType,
}

/// Scroll position of the page view, animated between targets
///
/// `scroll_to` / `scroll_by` set a target; `update` is called once per frame
/// and returns the row to draw.
#[derive(Debug, Clone, Default)]
pub struct ScrollAnimator {
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    current_scroll: u16,
    /// Line deltas received since the last frame
    pending_delta: i32,
}

impl ScrollAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Whether frames should come at animation rate
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.animation.is_some() || self.pending_delta != 0
    }

    /// Position the view will settle on
    pub fn target_scroll(&self) -> u16 {
        self.animation
            .as_ref()
            .map(|a| a.to)
            .unwrap_or(self.current_scroll)
    }

    #[inline]
    pub fn current_scroll(&self) -> u16 {
        self.current_scroll
    }

    /// Jump without animating
    pub fn set_scroll(&mut self, scroll: u16) {
        self.animation = None;
        self.current_scroll = scroll;
        self.pending_delta = 0;
    }

    /// Animate from the visible row to `target`
    pub fn scroll_to(&mut self, target: u16, max_scroll: u16) {
        let target = target.min(max_scroll);
        self.pending_delta = 0;

        if !self.config.is_smooth() {
            self.current_scroll = target;
            self.animation = None;
            return;
        }

        if self.current_scroll == target {
            self.animation = None;
            return;
        }

        self.start_animation(target);
    }

    /// Scroll by a delta (positive = down); deltas within one frame are batched
    pub fn scroll_by(&mut self, delta: i32, max_scroll: u16) {
        if !self.config.is_smooth() {
            self.current_scroll = clamp_scroll(self.current_scroll as i32 + delta, max_scroll);
            self.animation = None;
            return;
        }

        self.pending_delta += delta;
    }

    pub fn scroll_down(&mut self, max_scroll: u16) {
        let lines = self.step_lines();
        self.scroll_by(lines, max_scroll);
    }

    pub fn scroll_up(&mut self, max_scroll: u16) {
        let lines = self.step_lines();
        self.scroll_by(-lines, max_scroll);
    }

    pub fn scroll_half_page_down(&mut self, viewport_height: u16, max_scroll: u16) {
        let half_page = (viewport_height / 2).max(1) as i32;
        self.scroll_by(half_page, max_scroll);
    }

    pub fn scroll_half_page_up(&mut self, viewport_height: u16, max_scroll: u16) {
        let half_page = (viewport_height / 2).max(1) as i32;
        self.scroll_by(-half_page, max_scroll);
    }

    /// Advance the animation and return the row to draw
    pub fn update(&mut self, max_scroll: u16) -> u16 {
        if self.pending_delta != 0 {
            let target = clamp_scroll(self.target_scroll() as i32 + self.pending_delta, max_scroll);
            self.pending_delta = 0;

            if target != self.current_scroll {
                self.start_animation(target);
            }
        }

        if let Some(ref anim) = self.animation {
            if is_complete(anim.start, anim.duration) {
                self.current_scroll = anim.to.min(max_scroll);
                self.animation = None;
            } else {
                let eased = anim.easing.apply(progress(anim.start, anim.duration));
                self.current_scroll = lerp_u16(anim.from, anim.to, eased).min(max_scroll);
            }
        } else if self.current_scroll > max_scroll {
            // Viewport grew or content shrank
            self.current_scroll = max_scroll;
        }

        self.current_scroll
    }

    fn start_animation(&mut self, target: u16) {
        self.animation = Some(ActiveAnimation {
            start: Instant::now(),
            from: self.current_scroll,
            to: target,
            duration: self.config.animation_duration(),
            easing: self.config.easing,
        });
    }

    fn step_lines(&self) -> i32 {
        if self.config.is_smooth() {
            1
        } else {
            self.config.scroll_lines.max(1) as i32
        }
    }
}

fn clamp_scroll(value: i32, max_scroll: u16) -> u16 {
    value.clamp(0, max_scroll as i32) as u16
}

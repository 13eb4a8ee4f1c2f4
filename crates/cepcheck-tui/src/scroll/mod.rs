//! Smooth scrolling for the page view
//!
//! - `easing` / `timing` - pure curve and interpolation helpers
//! - `config` - `ScrollConfig` helpers (the type itself lives in cepcheck-core)
//! - `animation` - `ScrollAnimator`, advanced once per frame
//! - `anchor` - in-page `#fragment` links bound to animated scrolling

pub mod anchor;
pub mod animation;
pub mod config;
pub mod easing;
pub mod timing;

pub use anchor::{AnchorBinder, AnchorJump};
pub use animation::ScrollAnimator;
pub use config::{ScrollConfig, ScrollConfigExt};
pub use easing::{EasingType, EasingTypeExt};

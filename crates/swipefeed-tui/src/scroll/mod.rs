//! Viewport scrolling for the feed views
//!
//! - `config` - helpers over [`ScrollConfig`]
//! - `animation` - the offset controller: immediate user scroll, eased
//!   programmatic jumps timed on the injected clock
//!
//! ```ignore
//! let mut animator = ScrollAnimator::new(config.ui.smooth_scroll.clone(), clock);
//! animator.scroll_to(0.0, max_offset);
//! // every frame
//! let offset = animator.update(max_offset);
//! ```

pub mod config;

pub mod animation;

pub use animation::ScrollAnimator;
pub use config::{ScrollConfig, ScrollConfigExt};

//! Pull-to-refresh gesture recognition
//!
//! - `sampler` - raw pointer samples to resisted distance and velocity
//! - `pull` - the refresh lifecycle built on top of the sampler

pub mod pull;
pub mod sampler;

pub use pull::{PullPhase, PullState, PullToRefreshEngine, Release};
pub use sampler::{resisted_distance, GestureSample, GestureSampler, PullReading};

//! Infinite-scroll trigger with load coalescing and exhaustion

use serde::{Deserialize, Serialize};

use crate::source::PageOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaginationState {
    pub loading: bool,
    /// Sticky until `reset()`
    pub exhausted: bool,
}

/// Identifies one `load_more` call; stale tickets are rejected after a reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Default)]
pub struct PaginationTrigger {
    state: PaginationState,
    generation: u64,
}

/// Whether a sentinel whose top edge sits at `sentinel_top` is inside the
/// proximity zone below the viewport
#[inline]
pub fn within_proximity(offset_y: f64, viewport_height: f64, sentinel_top: f64, margin: f64) -> bool {
    sentinel_top <= offset_y + viewport_height + margin
}

impl PaginationTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> PaginationState {
        self.state
    }

    /// The bottom sentinel entered the proximity zone. Returns a ticket when
    /// the caller must start a `load_more`.
    pub fn on_sentinel_visible(&mut self) -> Option<LoadTicket> {
        if self.state.loading || self.state.exhausted {
            tracing::trace!(state = ?self.state, "Sentinel hit ignored");
            return None;
        }
        self.state.loading = true;
        Some(LoadTicket(self.generation))
    }

    /// Apply a successful page. Returns false for a stale ticket.
    pub fn complete(&mut self, ticket: LoadTicket, outcome: PageOutcome) -> bool {
        if !self.accepts(ticket) {
            return false;
        }
        self.state.loading = false;
        self.state.exhausted = outcome.exhausted;
        true
    }

    /// Apply a failed load; `exhausted` is left untouched
    pub fn fail(&mut self, ticket: LoadTicket) -> bool {
        if !self.accepts(ticket) {
            return false;
        }
        self.state.loading = false;
        true
    }

    /// Start over (e.g. after the feed was refreshed)
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = PaginationState::default();
    }

    fn accepts(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation && self.state.loading
    }
}

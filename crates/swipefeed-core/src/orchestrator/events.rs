use serde::{Deserialize, Serialize};

use super::listeners::ListenerKind;
use crate::gesture::{PullPhase, PullState};
use crate::pagination::PaginationState;
use crate::source::PageOutcome;
use crate::sticky::StickyState;

/// Raw platform input delivered by the host, in platform order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Scroll { offset_y: f64, viewport_height: f64 },
    TouchStart { y: f64, timestamp_ms: f64 },
    TouchMove { y: f64, timestamp_ms: f64 },
    TouchEnd,
    TouchCancel,
    /// The bottom sentinel entered the proximity zone
    SentinelVisible,
}

impl InputEvent {
    /// Subscription this event arrives through
    pub fn listener(&self) -> ListenerKind {
        match self {
            InputEvent::Scroll { .. } => ListenerKind::Scroll,
            InputEvent::TouchStart { .. } => ListenerKind::TouchStart,
            InputEvent::TouchMove { .. } => ListenerKind::TouchMove,
            InputEvent::TouchEnd | InputEvent::TouchCancel => ListenerKind::TouchEnd,
            InputEvent::SentinelVisible => ListenerKind::Proximity,
        }
    }
}

/// What the host must do with the native default action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventResponse {
    pub suppress_native: bool,
}

/// Notifications for hosts that prefer a stream over polling state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControllerEvent {
    PullPhaseChanged { phase: PullPhase },
    RefreshStarted,
    RefreshSucceeded,
    RefreshFailed { message: String },
    StickyChanged { active: bool },
    BadgeShown { scale: f64 },
    BadgeHidden,
    LoadMoreStarted,
    PageLoaded { exhausted: bool },
    LoadMoreFailed { message: String },
}

/// Result of applying one settled async operation
#[derive(Debug)]
pub enum Settled {
    Refresh(crate::Result<()>),
    LoadMore(crate::Result<PageOutcome>),
    /// Arrived after a reset or explicit completion and was dropped
    Stale,
}

impl Settled {
    pub fn error(&self) -> Option<&crate::Error> {
        match self {
            Settled::Refresh(Err(e)) | Settled::LoadMore(Err(e)) => Some(e),
            _ => None,
        }
    }
}

/// Everything a view layer reads after an event
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ControllerSnapshot {
    pub pull: PullState,
    pub sticky: StickyState,
    pub pagination: PaginationState,
}

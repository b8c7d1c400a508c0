pub mod clock;
pub mod config;
pub mod error;
pub mod gesture;
pub mod orchestrator;
pub mod pagination;
pub mod source;
pub mod sticky;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ControllerConfig, EasingType, ScrollConfig};
pub use error::{Error, Result};
pub use gesture::{PullPhase, PullState};
pub use orchestrator::{
    ControllerEvent, ControllerSnapshot, EventResponse, HeadlessSurface, InputEvent, InputSurface,
    ListenerHandle, ListenerKind, ScrollOrchestrator, Settled,
};
pub use pagination::PaginationState;
pub use source::{FeedSource, PageOutcome};
pub use sticky::StickyState;

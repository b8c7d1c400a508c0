use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};

/// Application events
#[derive(Debug, PartialEq)]
pub enum AppEvent {
    Key(KeyEvent),
    /// Mouse press, drag, release or wheel
    Mouse(MouseEvent),
    Resize(u16, u16),
    /// Terminal lost focus, possibly mid-drag
    FocusLost,
    /// Nothing arrived within one frame
    Tick,
}

/// Blocks for at most one frame waiting for terminal input
pub struct EventHandler {
    frame: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            frame: Duration::from_millis(tick_rate_ms.max(1)),
        }
    }

    /// Next event, `Tick` after an idle frame, `None` for ignored input
    pub fn next(&self) -> Result<Option<AppEvent>> {
        if !event::poll(self.frame)? {
            return Ok(Some(AppEvent::Tick));
        }
        Ok(translate(event::read()?))
    }
}

/// Keep the terminal events the feed screen reacts to
pub fn translate(event: Event) -> Option<AppEvent> {
    match event {
        // Some terminals also report key release and repeat
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Mouse(mouse) => Some(AppEvent::Mouse(mouse)),
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::FocusLost => Some(AppEvent::FocusLost),
        _ => None,
    }
}

//! Terminal implementation of the controller's input surface
//!
//! Touch and scroll subscriptions on a terminal mean mouse reporting. The
//! surface turns mouse capture on with the first live subscription and off
//! again when the last one is released, so a disposed view hands the mouse
//! back to the terminal.

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use swipefeed_core::{Error, InputSurface, ListenerHandle, ListenerKind, Result};
use tracing::{debug, warn};

struct SurfaceState<W> {
    writer: W,
    next_id: u64,
    attached: HashMap<u64, ListenerKind>,
    capturing: bool,
}

/// Shared between every view drawn on the same terminal
pub struct TerminalSurface<W: Write + Send> {
    inner: Arc<Mutex<SurfaceState<W>>>,
}

impl<W: Write + Send> Clone for TerminalSurface<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SurfaceState {
                writer,
                next_id: 0,
                attached: HashMap::new(),
                capturing: false,
            })),
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.state().capturing
    }

    pub fn attached_count(&self) -> usize {
        self.state().attached.len()
    }

    fn state(&self) -> MutexGuard<'_, SurfaceState<W>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> InputSurface for TerminalSurface<W> {
    fn attach(&mut self, kind: ListenerKind) -> Result<ListenerHandle> {
        let mut state = self.state();
        if !state.capturing {
            execute!(state.writer, EnableMouseCapture).map_err(|e| Error::Attach {
                kind,
                message: e.to_string(),
            })?;
            state.capturing = true;
            debug!("Mouse capture enabled");
        }
        state.next_id += 1;
        let id = state.next_id;
        state.attached.insert(id, kind);
        Ok(ListenerHandle(id))
    }

    fn detach(&mut self, handle: ListenerHandle) {
        let mut state = self.state();
        if state.attached.remove(&handle.0).is_none() {
            return;
        }
        if state.attached.is_empty() && state.capturing {
            if let Err(e) = execute!(state.writer, DisableMouseCapture) {
                warn!("Failed to disable mouse capture: {}", e);
            }
            state.capturing = false;
            debug!("Mouse capture disabled");
        }
    }
}

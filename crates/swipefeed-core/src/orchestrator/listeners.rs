//! Listener subscriptions owned by a mounted controller

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerKind {
    Scroll,
    TouchStart,
    TouchMove,
    /// Touch end and touch cancel share one subscription
    TouchEnd,
    /// Bottom sentinel proximity (intersection) notifications
    Proximity,
}

impl ListenerKind {
    pub const ALL: [ListenerKind; 5] = [
        ListenerKind::Scroll,
        ListenerKind::TouchStart,
        ListenerKind::TouchMove,
        ListenerKind::TouchEnd,
        ListenerKind::Proximity,
    ];

    #[inline]
    pub fn is_touch(self) -> bool {
        matches!(
            self,
            ListenerKind::TouchStart | ListenerKind::TouchMove | ListenerKind::TouchEnd
        )
    }
}

impl fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ListenerKind::Scroll => "scroll",
            ListenerKind::TouchStart => "touch-start",
            ListenerKind::TouchMove => "touch-move",
            ListenerKind::TouchEnd => "touch-end",
            ListenerKind::Proximity => "proximity",
        };
        f.write_str(name)
    }
}

/// Opaque id handed out by an [`InputSurface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u64);

/// The platform side of a scrollable viewport: where listeners get registered
pub trait InputSurface: Send {
    fn attach(&mut self, kind: ListenerKind) -> Result<ListenerHandle>;

    fn detach(&mut self, handle: ListenerHandle);
}

/// Scoped set of subscriptions; dropping it detaches everything it acquired
pub(crate) struct ListenerSet {
    surface: Box<dyn InputSurface>,
    handles: Vec<(ListenerKind, ListenerHandle)>,
}

impl ListenerSet {
    /// Subscribe once to every [`ListenerKind`]. A failure part-way releases
    /// the handles acquired so far.
    pub(crate) fn acquire(surface: Box<dyn InputSurface>) -> Result<Self> {
        let mut set = Self {
            surface,
            handles: Vec::with_capacity(ListenerKind::ALL.len()),
        };
        for kind in ListenerKind::ALL {
            let handle = set.surface.attach(kind)?;
            set.handles.push((kind, handle));
        }
        tracing::debug!(count = set.handles.len(), "Listeners attached");
        Ok(set)
    }

    pub(crate) fn is_attached(&self, kind: ListenerKind) -> bool {
        self.handles.iter().any(|(k, _)| *k == kind)
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        for (kind, handle) in self.handles.drain(..) {
            tracing::trace!(%kind, "Detaching listener");
            self.surface.detach(handle);
        }
    }
}

/// In-memory surface for headless hosts and tests. Clones share the same
/// registry so attachment can be observed after the controller owns it.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    inner: Arc<Mutex<HeadlessRegistry>>,
}

#[derive(Debug, Default)]
struct HeadlessRegistry {
    next_id: u64,
    attached: HashMap<u64, ListenerKind>,
    fail_on: Option<ListenerKind>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future attach of `kind` fail
    pub fn failing_on(kind: ListenerKind) -> Self {
        let surface = Self::default();
        surface.refuse(kind);
        surface
    }

    /// Start refusing `kind` on this surface and all its clones
    pub fn refuse(&self, kind: ListenerKind) {
        self.registry().fail_on = Some(kind);
    }

    /// Number of live subscriptions
    pub fn attached_count(&self) -> usize {
        self.registry().attached.len()
    }

    pub fn is_attached(&self, kind: ListenerKind) -> bool {
        self.registry().attached.values().any(|k| *k == kind)
    }

    fn registry(&self) -> std::sync::MutexGuard<'_, HeadlessRegistry> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl InputSurface for HeadlessSurface {
    fn attach(&mut self, kind: ListenerKind) -> Result<ListenerHandle> {
        let mut registry = self.registry();
        if registry.fail_on == Some(kind) {
            return Err(crate::Error::Attach {
                kind,
                message: "surface refused subscription".to_string(),
            });
        }
        registry.next_id += 1;
        let id = registry.next_id;
        registry.attached.insert(id, kind);
        Ok(ListenerHandle(id))
    }

    fn detach(&mut self, handle: ListenerHandle) {
        self.registry().attached.remove(&handle.0);
    }
}

//! Session events and listener registration.

use scribble_core::Prediction;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Something that happened on a drawing session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The surface was repainted from a store of `segments` entries.
    Repainted { segments: usize },
    /// A press started capturing.
    CaptureStarted,
    /// A release ended capturing.
    CaptureEnded,
    /// An export was queued.
    ExportStarted { export_id: Uuid },
    /// The classifier answered.
    PredictionReceived {
        export_id: Uuid,
        prediction: Prediction,
    },
    /// The export failed at any step.
    ExportFailed { export_id: Uuid, message: String },
}

/// Handle returned by [`Listeners::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

#[derive(Default)]
struct ListenerList {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

/// Registered observers of one session.
///
/// Cloning shares the registry, so export tasks can notify the same
/// listeners after the call that started them returned.
#[derive(Clone, Default)]
pub struct Listeners {
    inner: Arc<RwLock<ListenerList>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It is called for every later event.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        let mut list = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let id = ListenerId(list.next_id);
        list.next_id += 1;
        list.entries.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut list = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let before = list.entries.len();
        list.entries.retain(|(entry_id, _)| *entry_id != id);
        list.entries.len() != before
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver an event to every listener, in registration order.
    pub fn emit(&self, event: &SessionEvent) {
        // Listeners run outside the lock so they may subscribe or unsubscribe.
        let listeners: Vec<Listener> = self
            .inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }
}

//! History port: the navigation primitives the router needs, plus an
//! in-memory implementation.
//!
//! The port mirrors the browser model. `push_state` and `replace_state` change
//! the session history silently; `back` and `forward` move through it and
//! announce the move as a pop-state event. [`MemoryHistory`] queues those
//! events and delivers them from [`MemoryHistory::dispatch_pending`], one per
//! simulated event-loop turn.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::error::Result;

// ---------------------------------------------------------------------------
// HistoryState
// ---------------------------------------------------------------------------

/// The payload the router writes with every history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState {
    /// Path of the route the entry was written for.
    pub path: String,
    /// Id of that route's component. Diagnostic only.
    #[serde(default)]
    pub component_id: String,
    /// Index of the entry within the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    /// Mount session that wrote `position`. Positions from another session
    /// are not comparable with the current one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<u64>,
}

impl HistoryState {
    pub fn new(path: impl Into<String>, component_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            component_id: component_id.into(),
            position: None,
            session: None,
        }
    }

    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_session(mut self, session: u64) -> Self {
        self.session = Some(session);
        self
    }

    /// Serialise into the opaque payload stored by the port.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Read a payload back. Entries written by other code that do not carry a
    /// `path` yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        HistoryState::deserialize(value).ok()
    }
}

// ---------------------------------------------------------------------------
// Events and subscriptions
// ---------------------------------------------------------------------------

/// Announces that the current history entry changed through back/forward.
#[derive(Debug, Clone, PartialEq)]
pub struct PopStateEvent {
    /// Payload of the entry that became current, if it has one.
    pub state: Option<Value>,
}

/// Listener for pop-state events.
pub type PopStateListener = Rc<dyn Fn(&PopStateEvent) -> Result<()>>;

/// Handle returned by [`History::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

// ---------------------------------------------------------------------------
// History trait
// ---------------------------------------------------------------------------

/// Navigation port used by the router.
pub trait History {
    /// URL of the current entry.
    fn location(&self) -> String;

    /// Add an entry after the current one, discarding any forward entries.
    fn push_state(&self, state: Value, url: &str);

    /// Replace the current entry's payload, keeping its URL.
    fn replace_state(&self, state: Value);

    /// Move to the previous entry, if any, and announce it.
    fn back(&self);

    /// Move to the next entry, if any, and announce it.
    fn forward(&self);

    fn subscribe(&self, listener: PopStateListener) -> SubscriptionId;

    /// Returns `false` if `id` was not subscribed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

// ---------------------------------------------------------------------------
// MemoryHistory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Entry {
    url: String,
    state: Value,
}

struct Inner {
    entries: Vec<Entry>,
    index: usize,
    pending: VecDeque<PopStateEvent>,
    listeners: Vec<(SubscriptionId, PopStateListener)>,
    next_subscription: u64,
}

impl Inner {
    fn announce(&mut self) {
        let state = match &self.entries[self.index].state {
            Value::Null => None,
            state => Some(state.clone()),
        };
        self.pending.push_back(PopStateEvent { state });
    }
}

/// In-memory session history. Clones share the same history.
#[derive(Clone)]
pub struct MemoryHistory {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryHistory {
    /// A session with a single entry at `initial_url` and no payload.
    pub fn new(initial_url: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                entries: vec![Entry {
                    url: initial_url.into(),
                    state: Value::Null,
                }],
                index: 0,
                pending: VecDeque::new(),
                listeners: Vec::new(),
                next_subscription: 0,
            })),
        }
    }

    /// Deliver queued pop-state events to the listeners, oldest first.
    ///
    /// No borrow of the history is held while a listener runs, so listeners
    /// may push, replace or move through the history. Stops at the first
    /// listener error; undelivered events stay queued. Returns the number of
    /// events delivered.
    pub fn dispatch_pending(&self) -> Result<usize> {
        let mut delivered = 0;
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                inner.pending.pop_front().map(|event| {
                    let listeners: Vec<PopStateListener> =
                        inner.listeners.iter().map(|(_, l)| Rc::clone(l)).collect();
                    (event, listeners)
                })
            };
            let Some((event, listeners)) = next else {
                return Ok(delivered);
            };
            trace!(listeners = listeners.len(), "dispatching pop-state event");
            for listener in listeners {
                listener(&event)?;
            }
            delivered += 1;
        }
    }

    /// Number of entries in the session.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Index of the current entry.
    pub fn index(&self) -> usize {
        self.inner.borrow().index
    }

    /// URLs of every entry, oldest first.
    pub fn urls(&self) -> Vec<String> {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|e| e.url.clone())
            .collect()
    }

    /// Payload of the current entry.
    pub fn state(&self) -> Option<Value> {
        let inner = self.inner.borrow();
        match &inner.entries[inner.index].state {
            Value::Null => None,
            state => Some(state.clone()),
        }
    }

    /// Pop-state events queued but not yet delivered.
    pub fn pending_events(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        let inner = self.inner.borrow();
        inner.entries[inner.index].url.clone()
    }

    fn push_state(&self, state: Value, url: &str) {
        let mut inner = self.inner.borrow_mut();
        let next = inner.index + 1;
        inner.entries.truncate(next);
        inner.entries.push(Entry {
            url: url.to_owned(),
            state,
        });
        inner.index = next;
    }

    fn replace_state(&self, state: Value) {
        let mut inner = self.inner.borrow_mut();
        let index = inner.index;
        inner.entries[index].state = state;
    }

    fn back(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.index > 0 {
            inner.index -= 1;
            inner.announce();
        }
    }

    fn forward(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.index + 1 < inner.entries.len() {
            inner.index += 1;
            inner.announce();
        }
    }

    fn subscribe(&self, listener: PopStateListener) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        inner.next_subscription += 1;
        let id = SubscriptionId(inner.next_subscription);
        inner.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(sid, _)| *sid != id);
        inner.listeners.len() != before
    }
}

impl fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("MemoryHistory")
            .field("entries", &inner.entries)
            .field("index", &inner.index)
            .field("pending", &inner.pending.len())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

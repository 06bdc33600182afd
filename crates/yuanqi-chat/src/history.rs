//! Bounded conversation history.
//!
//! An ordered sequence of [`Message`]s capped at a configurable limit.
//! Appends past the limit evict the oldest entries, in one batch.

use tracing::debug;

use crate::Message;

/// Hard floor for the history limit; [`History::set_limit`] never goes
/// below it.
pub const MIN_HISTORY_LIMIT: usize = 4;

/// Limit used by a fresh store until `set_limit` is called.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Ordered, capacity-bounded message history.
#[derive(Debug, Clone)]
pub struct History {
    messages: Vec<Message>,
    limit: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create a store bounded to `limit` messages (floor of 4 applies).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            messages: Vec::new(),
            limit: limit.max(MIN_HISTORY_LIMIT),
        }
    }

    /// Change the limit (clamped to the floor) and re-trim immediately.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(MIN_HISTORY_LIMIT);
        debug!(limit = self.limit, "history limit set");
        self.trim();
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Append to the tail, evicting the oldest entries when over limit.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.trim();
        debug!(len = self.messages.len(), "message appended to history");
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Independent copy of the current contents. Later mutations are not
    /// visible through a snapshot taken earlier.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Remove the oldest `len - limit` entries as a single batch. No-op
    /// when already within the limit.
    fn trim(&mut self) {
        let excess = self.messages.len().saturating_sub(self.limit);
        if excess > 0 {
            self.messages.drain(0..excess);
            debug!(
                evicted = excess,
                len = self.messages.len(),
                "history trimmed"
            );
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

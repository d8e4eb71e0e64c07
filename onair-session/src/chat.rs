use std::sync::{Arc, RwLock, RwLockReadGuard};
use tokio::sync::broadcast;

/// Append-only, in-memory log of chat lines received from other participants.
#[derive(Clone)]
pub struct ChatLog {
    entries: Arc<RwLock<Vec<String>>>,
    notify: broadcast::Sender<String>,
}

impl ChatLog {
    pub fn new() -> Self {
        let (notify, _) = broadcast::channel(64);
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            notify,
        }
    }

    pub(crate) fn push(&self, content: String) {
        match self.entries.write() {
            Ok(mut entries) => entries.push(content.clone()),
            Err(poisoned) => poisoned.into_inner().push(content.clone()),
        }
        let _ = self.notify.send(content);
    }

    /// Copy of all lines in arrival order.
    pub fn snapshot(&self) -> Vec<String> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Lines appended after this call. Slow subscribers may lag; the log itself never drops.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.notify.subscribe()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<String>> {
        match self.entries.read() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}

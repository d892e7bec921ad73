// ── Typed observable settings store ──
//
// An observer container over a fixed settings schema. The schema is a
// plain struct, so field access is checked at compile time; subscribers
// get push-based change notification via a `watch` channel.

use tokio::sync::watch;

/// Observable holder for one settings schema `S`.
///
/// Every mutation broadcasts the full new value to subscribers.
/// `send_modify` updates unconditionally, even with zero receivers, so
/// the store works the same whether or not anyone is watching.
pub struct SettingsStore<S: Clone + Send + Sync + 'static> {
    tx: watch::Sender<S>,
}

impl<S: Clone + Send + Sync + 'static> SettingsStore<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Current value (cheap clone of the schema struct).
    pub fn get(&self) -> S {
        self.tx.borrow().clone()
    }

    /// Replace the whole value.
    pub fn set(&self, value: S) {
        self.tx.send_modify(|current| *current = value);
    }

    /// Mutate in place; subscribers see the result as one change.
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.tx.send_modify(f);
    }

    /// Subscribe to changes. The receiver yields the full schema value.
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }
}

impl<S: Clone + Send + Sync + Default + 'static> Default for SettingsStore<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

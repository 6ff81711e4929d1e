use std::fmt;

use indexmap::IndexMap;

use super::value::DomainValue;

/// Callback invoked when a scale's state changes.
pub type UpdateCallback = Box<dyn FnMut() + 'static>;
/// Callback invoked when a domain value is highlighted.
pub type HighlightCallback = Box<dyn FnMut(&DomainValue) + 'static>;
/// Callback invoked when an active highlight is dismissed.
pub type HighlightDestroyCallback = Box<dyn FnMut() + 'static>;

/// Per-scale publish/subscribe hub with three topics: `update`,
/// `highlight`, and `highlight-destroy`.
///
/// Each topic keeps at most one callback per subscriber id. Re-registering
/// under the same id replaces the callback in place, keeping the original
/// registration order. Emission is synchronous and iterates subscribers in
/// registration order. A callback must not re-enter `emit_*` on the same
/// topic; the hub does not guard against that recursion.
#[derive(Default)]
pub struct UpdateDispatcher {
    update: IndexMap<String, UpdateCallback>,
    highlight: IndexMap<String, HighlightCallback>,
    highlight_destroy: IndexMap<String, HighlightDestroyCallback>,
}

impl UpdateDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_update(&mut self, subscriber: impl Into<String>, callback: impl FnMut() + 'static) {
        self.update.insert(subscriber.into(), Box::new(callback));
    }

    pub fn on_highlight(
        &mut self,
        subscriber: impl Into<String>,
        callback: impl FnMut(&DomainValue) + 'static,
    ) {
        self.highlight.insert(subscriber.into(), Box::new(callback));
    }

    pub fn on_highlight_destroy(
        &mut self,
        subscriber: impl Into<String>,
        callback: impl FnMut() + 'static,
    ) {
        self.highlight_destroy
            .insert(subscriber.into(), Box::new(callback));
    }

    /// Removes one subscriber's `update` callback. Returns `false` when the
    /// id was never registered.
    pub fn off_update(&mut self, subscriber: &str) -> bool {
        self.update.shift_remove(subscriber).is_some()
    }

    pub fn off_highlight(&mut self, subscriber: &str) -> bool {
        self.highlight.shift_remove(subscriber).is_some()
    }

    pub fn off_highlight_destroy(&mut self, subscriber: &str) -> bool {
        self.highlight_destroy.shift_remove(subscriber).is_some()
    }

    /// Removes a subscriber from every topic at once.
    pub fn unsubscribe(&mut self, subscriber: &str) {
        self.update.shift_remove(subscriber);
        self.highlight.shift_remove(subscriber);
        self.highlight_destroy.shift_remove(subscriber);
    }

    pub fn emit_update(&mut self) {
        for callback in self.update.values_mut() {
            callback();
        }
    }

    pub fn emit_highlight(&mut self, value: &DomainValue) {
        for callback in self.highlight.values_mut() {
            callback(value);
        }
    }

    pub fn emit_highlight_destroy(&mut self) {
        for callback in self.highlight_destroy.values_mut() {
            callback();
        }
    }

    #[must_use]
    pub fn update_subscribers(&self) -> usize {
        self.update.len()
    }

    #[must_use]
    pub fn highlight_subscribers(&self) -> usize {
        self.highlight.len()
    }

    #[must_use]
    pub fn highlight_destroy_subscribers(&self) -> usize {
        self.highlight_destroy.len()
    }
}

impl fmt::Debug for UpdateDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateDispatcher")
            .field("update", &self.update.keys().collect::<Vec<_>>())
            .field("highlight", &self.highlight.keys().collect::<Vec<_>>())
            .field(
                "highlight_destroy",
                &self.highlight_destroy.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

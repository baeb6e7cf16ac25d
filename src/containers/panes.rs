//! In-memory containers for embedding and tests.

use super::resolve::{ScrollContainer, ViewportSignals};
use crate::types::{ScrollCallback, SubscriptionId};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Registration-ordered list of scroll subscribers.
struct SubscriberList {
    entries: RwLock<Vec<(SubscriptionId, ScrollCallback)>>,
    next_id: AtomicU64,
}

impl SubscriberList {
    fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn add(&self, callback: ScrollCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.entries.write().push((id, callback));
        id
    }

    fn remove(&self, id: SubscriptionId) {
        self.entries.write().retain(|(entry_id, _)| *entry_id != id);
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Invoke every subscriber in registration order.
    ///
    /// Callbacks are cloned out before invocation so a callback may
    /// unsubscribe itself mid-dispatch (one-shot observers do).
    fn notify(&self) {
        let callbacks: Vec<ScrollCallback> = self
            .entries
            .read()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback();
        }
    }
}

/// An element-like scrollable container held entirely in memory.
///
/// Hosts drive it with [`scroll_to`](VirtualPane::scroll_to); subscribers
/// are notified synchronously on each move.
pub struct VirtualPane {
    offset: RwLock<f64>,
    subscribers: SubscriberList,
}

impl VirtualPane {
    pub fn new() -> Self {
        Self {
            offset: RwLock::new(0.0),
            subscribers: SubscriberList::new(),
        }
    }

    /// Current scroll offset.
    pub fn offset(&self) -> f64 {
        *self.offset.read()
    }

    /// Move the scroll offset and notify subscribers.
    pub fn scroll_to(&self, offset: f64) {
        *self.offset.write() = offset;
        self.subscribers.notify();
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for VirtualPane {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollContainer for VirtualPane {
    fn scroll_top(&self) -> Option<f64> {
        Some(*self.offset.read())
    }

    fn subscribe(&self, callback: ScrollCallback) -> SubscriptionId {
        self.subscribers.add(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.remove(id)
    }
}

/// A window-like viewport container held entirely in memory.
///
/// Reports no element offset; its position is read through
/// [`ViewportSignals`]. [`scroll_to`](VirtualViewport::scroll_to) writes
/// the primary signal, [`set_signals`](VirtualViewport::set_signals)
/// replaces the whole signal set for hosts exercising the fallbacks.
pub struct VirtualViewport {
    signals: RwLock<ViewportSignals>,
    subscribers: SubscriberList,
}

impl VirtualViewport {
    pub fn new() -> Self {
        Self {
            signals: RwLock::new(ViewportSignals::default()),
            subscribers: SubscriberList::new(),
        }
    }

    /// Set the primary scroll offset and notify subscribers.
    pub fn scroll_to(&self, offset: f64) {
        self.signals.write().scroll_y = Some(offset);
        self.subscribers.notify();
    }

    /// Replace the full signal set and notify subscribers.
    pub fn set_signals(&self, signals: ViewportSignals) {
        *self.signals.write() = signals;
        self.subscribers.notify();
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for VirtualViewport {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollContainer for VirtualViewport {
    fn scroll_top(&self) -> Option<f64> {
        None
    }

    fn viewport_signals(&self) -> ViewportSignals {
        *self.signals.read()
    }

    fn subscribe(&self, callback: ScrollCallback) -> SubscriptionId {
        self.subscribers.add(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.remove(id)
    }
}

/// Process-wide default viewport, the stand-in for the document-level
/// scrollable root when no container is configured.
pub fn default_viewport() -> Arc<VirtualViewport> {
    static ROOT: OnceLock<Arc<VirtualViewport>> = OnceLock::new();
    ROOT.get_or_init(|| Arc::new(VirtualViewport::new())).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::Container;
    use std::sync::atomic::AtomicUsize;

    fn counting_callback() -> (ScrollCallback, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let callback: ScrollCallback = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (callback, count)
    }

    #[test]
    fn test_pane_notifies_subscribers() {
        let pane = VirtualPane::new();
        let (callback, count) = counting_callback();

        pane.subscribe(callback);
        pane.scroll_to(10.0);
        pane.scroll_to(20.0);

        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(pane.offset(), 20.0);
    }

    #[test]
    fn test_pane_unsubscribe_stops_notifications() {
        let pane = VirtualPane::new();
        let (callback, count) = counting_callback();

        let id = pane.subscribe(callback);
        pane.scroll_to(10.0);
        pane.unsubscribe(id);
        pane.scroll_to(20.0);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(pane.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribe_unknown_id_is_noop() {
        let pane = VirtualPane::new();
        pane.unsubscribe(SubscriptionId(99));
        assert_eq!(pane.subscriber_count(), 0);
    }

    #[test]
    fn test_pane_resolves_as_element() {
        let pane: Arc<dyn ScrollContainer> = Arc::new(VirtualPane::new());
        let container = Container::resolve(pane);
        assert!(matches!(container, Container::Element(_)));
    }

    #[test]
    fn test_viewport_resolves_through_signals() {
        let viewport = Arc::new(VirtualViewport::new());
        let container = Container::resolve(viewport.clone());
        assert!(matches!(container, Container::Viewport(_)));

        viewport.set_signals(ViewportSignals {
            body_scroll_top: Some(30.0),
            root_scroll_top: Some(12.0),
            ..Default::default()
        });
        assert_eq!(container.scroll_offset(), 42.0);

        viewport.scroll_to(100.0);
        assert_eq!(container.scroll_offset(), 100.0);
    }

    #[test]
    fn test_callback_may_unsubscribe_itself() {
        let pane = Arc::new(VirtualPane::new());
        let (callback, count) = counting_callback();

        let slot: Arc<RwLock<Option<SubscriptionId>>> = Arc::new(RwLock::new(None));
        let slot_clone = Arc::clone(&slot);
        let pane_clone = Arc::clone(&pane);
        let id = pane.subscribe(Arc::new(move || {
            callback();
            if let Some(id) = slot_clone.write().take() {
                pane_clone.unsubscribe(id);
            }
        }));
        *slot.write() = Some(id);

        pane.scroll_to(10.0);
        pane.scroll_to(20.0);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(pane.subscriber_count(), 0);
    }
}

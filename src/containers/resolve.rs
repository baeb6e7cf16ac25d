//! The container seam and capability resolution.

use crate::types::{ScrollCallback, SubscriptionId};
use std::fmt;
use std::sync::Arc;

/// Host-side view of a scrollable container.
///
/// The host environment supplies two things per container: the current
/// scroll offset and a scroll notification stream. A container that
/// behaves like a scrollable element reports its own offset through
/// [`scroll_top`](ScrollContainer::scroll_top); a top-level viewport
/// returns `None` there and is read through its
/// [`viewport_signals`](ScrollContainer::viewport_signals) instead.
pub trait ScrollContainer: Send + Sync {
    /// Element-scoped scroll offset. `None` marks a viewport-like root.
    fn scroll_top(&self) -> Option<f64>;

    /// Window-level offset signals, used when no element offset exists.
    fn viewport_signals(&self) -> ViewportSignals {
        ViewportSignals::default()
    }

    /// Subscribe a callback to scroll notifications.
    fn subscribe(&self, callback: ScrollCallback) -> SubscriptionId;

    /// Remove a previously-subscribed callback. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Window-level scroll offset sources.
///
/// Mirrors the signals a browser-like host exposes for the top-level
/// viewport. Resolution order: primary, then the legacy fallback, then
/// the body and root offsets summed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportSignals {
    /// Primary offset (`scrollY` in a browser host).
    pub scroll_y: Option<f64>,
    /// Legacy fallback (`pageYOffset`).
    pub page_y_offset: Option<f64>,
    /// Body-level offset.
    pub body_scroll_top: Option<f64>,
    /// Root-element offset.
    pub root_scroll_top: Option<f64>,
}

impl ViewportSignals {
    /// Resolve the signals to a single offset.
    pub fn resolve(&self) -> f64 {
        self.scroll_y.or(self.page_y_offset).unwrap_or_else(|| {
            self.body_scroll_top.unwrap_or(0.0) + self.root_scroll_top.unwrap_or(0.0)
        })
    }
}

/// A container resolved to its scroll-offset capability.
///
/// Resolution happens once, when the container is configured: a container
/// exposing an element offset becomes `Element`, anything else is treated
/// as the top-level `Viewport`. Both variants answer a uniform
/// [`scroll_offset`](Container::scroll_offset).
#[derive(Clone)]
pub enum Container {
    Element(Arc<dyn ScrollContainer>),
    Viewport(Arc<dyn ScrollContainer>),
}

impl Container {
    /// Capability-check a raw container into its resolved variant.
    pub fn resolve(container: Arc<dyn ScrollContainer>) -> Self {
        if container.scroll_top().is_some() {
            Container::Element(container)
        } else {
            Container::Viewport(container)
        }
    }

    /// Current scroll offset, read through the resolved capability.
    pub fn scroll_offset(&self) -> f64 {
        match self {
            Container::Element(c) => c.scroll_top().unwrap_or(0.0),
            Container::Viewport(c) => c.viewport_signals().resolve(),
        }
    }

    pub fn subscribe(&self, callback: ScrollCallback) -> SubscriptionId {
        self.raw().subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.raw().unsubscribe(id)
    }

    fn raw(&self) -> &Arc<dyn ScrollContainer> {
        match self {
            Container::Element(c) | Container::Viewport(c) => c,
        }
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Element(_) => write!(f, "Container::Element"),
            Container::Viewport(_) => write!(f, "Container::Viewport"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signals_prefer_primary() {
        let signals = ViewportSignals {
            scroll_y: Some(120.0),
            page_y_offset: Some(80.0),
            body_scroll_top: Some(10.0),
            root_scroll_top: Some(5.0),
        };
        assert_eq!(signals.resolve(), 120.0);
    }

    #[test]
    fn test_signals_legacy_fallback() {
        let signals = ViewportSignals {
            page_y_offset: Some(80.0),
            body_scroll_top: Some(10.0),
            ..Default::default()
        };
        assert_eq!(signals.resolve(), 80.0);
    }

    #[test]
    fn test_signals_sum_body_and_root() {
        let signals = ViewportSignals {
            body_scroll_top: Some(10.0),
            root_scroll_top: Some(5.0),
            ..Default::default()
        };
        assert_eq!(signals.resolve(), 15.0);

        let partial = ViewportSignals {
            root_scroll_top: Some(5.0),
            ..Default::default()
        };
        assert_eq!(partial.resolve(), 5.0);
    }

    #[test]
    fn test_signals_empty_resolve_to_zero() {
        assert_eq!(ViewportSignals::default().resolve(), 0.0);
    }
}

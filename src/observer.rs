//! The scroll observer: configuration, activation, and evaluation.

use crate::conditions::{CheckReport, ConditionSet, ConditionSpec};
use crate::containers::{default_viewport, Container, ScrollContainer};
use crate::throttle::Throttle;
use crate::types::SubscriptionId;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Default throttle interval in milliseconds.
pub const DEFAULT_THROTTLING_MS: u64 = 200;

/// Action invoked with the pass report when every condition holds.
pub type ActionFn = Arc<dyn Fn(&CheckReport) + Send + Sync>;

/// Options accepted by [`ScrollObserver::create`].
#[derive(Clone, Default)]
pub struct ObserverOptions {
    /// Scroll container. Defaults to the process-wide viewport.
    pub container: Option<Arc<dyn ScrollContainer>>,
    /// Action invoked on a pass. Unset actions warn instead of running.
    pub action: Option<ActionFn>,
    /// Initial condition set.
    pub conditions: ConditionSpec,
    /// Throttle interval in milliseconds. Zero or missing falls back to
    /// [`DEFAULT_THROTTLING_MS`].
    pub throttling: Option<u64>,
    /// Deactivate after the first successful invocation.
    pub once: bool,
}

/// The action slot. Unset is an explicit state, not a substitute no-op.
enum Action {
    Unset,
    Run(ActionFn),
}

/// Observer internals, shared with the subscribed callback.
struct ObserverState {
    container: RwLock<Container>,
    action: RwLock<Action>,
    conditions: RwLock<ConditionSet>,
    throttling: RwLock<Duration>,
    once: AtomicBool,
    /// Offset recorded at the previous direction check.
    last_offset: Mutex<f64>,
    /// Live subscription, paired with the container it was made on so a
    /// later `set_container` cannot strand it.
    subscription: Mutex<Option<(Container, SubscriptionId)>>,
}

impl ObserverState {
    /// Evaluate all conditions and run the action on a pass.
    ///
    /// Invoked through the throttled callback, so at most once per
    /// interval while subscribed.
    fn evaluate_and_act(&self) {
        let container = self.container.read().clone();

        let report = {
            let conditions = self.conditions.read().clone();
            let mut last_offset = self.last_offset.lock();
            conditions.check(&container, &mut last_offset)
        };

        let Some(report) = report else { return };

        // Clone the action out of the lock so it can reconfigure the
        // observer without deadlocking.
        let action = match &*self.action.read() {
            Action::Unset => None,
            Action::Run(action) => Some(Arc::clone(action)),
        };
        match action {
            Some(action) => action(&report),
            None => warn!("no action configured for scroll trigger"),
        }

        if self.once.load(Ordering::SeqCst) {
            self.revoke();
        }
    }

    fn revoke(&self) {
        if let Some((container, id)) = self.subscription.lock().take() {
            container.unsubscribe(id);
        }
    }
}

/// A throttled scroll observer.
///
/// Holds the configuration (container, action, conditions, throttle
/// interval, one-shot flag) and the direction tracking state. Configure
/// through the fluent setters, activate with [`listen`](Self::listen),
/// deactivate with [`revoke`](Self::revoke); the observer may be
/// reconfigured and reactivated any number of times.
///
/// Conditions accumulate: every [`set_conditions`](Self::set_conditions)
/// call appends, and earlier conditions keep the values they captured
/// when added.
#[derive(Clone)]
pub struct ScrollObserver {
    inner: Arc<ObserverState>,
}

impl ScrollObserver {
    /// Create an observer from options.
    pub fn create(options: ObserverOptions) -> Self {
        let raw: Arc<dyn ScrollContainer> = match options.container {
            Some(container) => container,
            None => default_viewport(),
        };
        let container = Container::resolve(raw);

        let mut conditions = ConditionSet::default();
        conditions.append(options.conditions);

        let action = match options.action {
            Some(action) => Action::Run(action),
            None => Action::Unset,
        };

        let last_offset = container.scroll_offset();

        Self {
            inner: Arc::new(ObserverState {
                container: RwLock::new(container),
                action: RwLock::new(action),
                conditions: RwLock::new(conditions),
                throttling: RwLock::new(normalize_interval(options.throttling)),
                once: AtomicBool::new(options.once),
                last_offset: Mutex::new(last_offset),
                subscription: Mutex::new(None),
            }),
        }
    }

    /// Create an observer with all defaults.
    pub fn new() -> Self {
        Self::create(ObserverOptions::default())
    }

    /// Set the scroll container.
    ///
    /// The container is capability-resolved once, here, and the direction
    /// tracking offset is reseeded from it. An already-live subscription
    /// stays on the container it was made on until revoked.
    pub fn set_container(&self, container: Arc<dyn ScrollContainer>) -> &Self {
        let container = Container::resolve(container);
        *self.inner.last_offset.lock() = container.scroll_offset();
        *self.inner.container.write() = container;
        self
    }

    /// Set the action invoked when every condition passes.
    pub fn set_action(&self, action: impl Fn(&CheckReport) + Send + Sync + 'static) -> &Self {
        *self.inner.action.write() = Action::Run(Arc::new(action));
        self
    }

    /// Validate and append conditions from a spec.
    ///
    /// Invalid direction labels and non-positive thresholds add nothing.
    /// Appended conditions capture the spec's values as-is; calling this
    /// again appends more conditions without touching earlier ones.
    pub fn set_conditions(&self, spec: ConditionSpec) -> &Self {
        self.inner.conditions.write().append(spec);
        self
    }

    /// Set the minimum interval between evaluations, in milliseconds.
    ///
    /// Zero falls back to [`DEFAULT_THROTTLING_MS`]. Takes effect at the
    /// next [`listen`](Self::listen).
    pub fn set_throttling(&self, ms: u64) -> &Self {
        *self.inner.throttling.write() = normalize_interval(Some(ms));
        self
    }

    /// Deactivate after the first successful action invocation.
    pub fn set_once(&self, once: bool) -> &Self {
        self.inner.once.store(once, Ordering::SeqCst);
        self
    }

    /// Subscribe a throttled evaluate-and-act callback to the container.
    ///
    /// Calling `listen` while already listening replaces the previous
    /// subscription rather than stacking a second one.
    pub fn listen(&self) -> &Self {
        self.revoke();

        let state = Arc::clone(&self.inner);
        let interval = *self.inner.throttling.read();
        let callback = Throttle::callback(interval, move || state.evaluate_and_act());

        let container = self.inner.container.read().clone();
        let id = container.subscribe(callback);
        *self.inner.subscription.lock() = Some((container, id));
        self
    }

    /// Remove the live subscription. No-op when not listening.
    pub fn revoke(&self) -> &Self {
        self.inner.revoke();
        self
    }

    /// Whether a subscription is currently live.
    pub fn is_listening(&self) -> bool {
        self.inner.subscription.lock().is_some()
    }

    /// Number of configured conditions.
    pub fn condition_count(&self) -> usize {
        self.inner.conditions.read().len()
    }
}

impl Default for ScrollObserver {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_interval(ms: Option<u64>) -> Duration {
    match ms {
        Some(ms) if ms > 0 => Duration::from_millis(ms),
        _ => Duration::from_millis(DEFAULT_THROTTLING_MS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::VirtualPane;

    #[test]
    fn test_defaults() {
        let observer = ScrollObserver::new();
        assert_eq!(observer.condition_count(), 0);
        assert!(!observer.is_listening());
        assert_eq!(*observer.inner.throttling.read(), Duration::from_millis(200));
    }

    #[test]
    fn test_zero_throttling_falls_back_to_default() {
        let observer = ScrollObserver::new();
        observer.set_throttling(0);
        assert_eq!(*observer.inner.throttling.read(), Duration::from_millis(200));

        observer.set_throttling(50);
        assert_eq!(*observer.inner.throttling.read(), Duration::from_millis(50));
    }

    #[test]
    fn test_revoke_before_listen_is_noop() {
        let observer = ScrollObserver::new();
        observer.revoke().revoke();
        assert!(!observer.is_listening());
    }

    #[test]
    fn test_listen_replaces_previous_subscription() {
        let pane = Arc::new(VirtualPane::new());
        let observer = ScrollObserver::new();
        observer.set_container(pane.clone());

        observer.listen().listen();
        assert_eq!(pane.subscriber_count(), 1);

        observer.revoke();
        assert_eq!(pane.subscriber_count(), 0);
        assert!(!observer.is_listening());
    }

    #[test]
    fn test_revoke_targets_original_container() {
        let first = Arc::new(VirtualPane::new());
        let second = Arc::new(VirtualPane::new());
        let observer = ScrollObserver::new();

        observer.set_container(first.clone()).listen();
        observer.set_container(second.clone());
        observer.revoke();

        assert_eq!(first.subscriber_count(), 0);
        assert_eq!(second.subscriber_count(), 0);
    }
}

//! # Scrollwatch
//!
//! A throttled scroll observer that runs a configured action when every
//! configured condition holds.
//!
//! ## Core Concepts
//!
//! - **Containers**: element-like or viewport-like scroll sources, each
//!   supplying an offset and a scroll notification stream
//! - **Conditions**: direction, offset-threshold, and custom predicates,
//!   accumulated append-only and checked in registration order
//! - **Throttling**: the evaluate/act routine runs at most once per
//!   configured interval
//! - **One-shot**: optionally deactivate after the first successful run
//!
//! ## Example
//!
//! ```
//! use scrollwatch::{ConditionSpec, ObserverOptions, ScrollObserver, VirtualPane};
//! use std::sync::Arc;
//!
//! let pane = Arc::new(VirtualPane::new());
//! let observer = ScrollObserver::create(ObserverOptions {
//!     container: Some(pane.clone()),
//!     ..Default::default()
//! });
//!
//! observer
//!     .set_conditions(ConditionSpec::offset(200.0))
//!     .set_action(|report| println!("scrolled past: {:?}", report.get("offset")))
//!     .listen();
//!
//! pane.scroll_to(250.0); // action runs here
//! observer.revoke();
//! ```

pub mod conditions;
pub mod containers;
pub mod error;
pub mod observer;
pub mod throttle;
pub mod types;

// Re-exports
pub use conditions::{
    CheckReport, Condition, ConditionOutcome, ConditionSet, ConditionSpec, CustomPredicate,
};
pub use containers::{
    default_viewport, Container, ScrollContainer, ViewportSignals, VirtualPane, VirtualViewport,
};
pub use error::{ObserverError, Result};
pub use observer::{ActionFn, ObserverOptions, ScrollObserver, DEFAULT_THROTTLING_MS};
pub use throttle::Throttle;
pub use types::{ScrollCallback, ScrollDirection, SubscriptionId};

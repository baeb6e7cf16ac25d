//! Scroll containers: where offsets are read and scroll notifications
//! come from.

pub mod panes;
pub mod resolve;

pub use panes::{default_viewport, VirtualPane, VirtualViewport};
pub use resolve::{Container, ScrollContainer, ViewportSignals};

//! jrefresh animation
//!
//! Timed snaps for the pull-to-refresh offset.
//!
//! # Features
//!
//! - **Easing**: the decelerating quadratic curve used by every snap
//! - **Snaps**: single-value transforms with a fixed duration
//! - **Offset animator**: one in-flight snap plus a reentrancy counter, ticked
//!   by the host's frame clock

pub mod animator;
pub mod easing;
pub mod snap;

pub use animator::{OffsetAnimator, SnapFrame, SnapTarget, StartReason};
pub use easing::Easing;
pub use snap::SnapAnimation;

//! jrefresh layout
//!
//! The pull-to-refresh controller and the pieces it is built from.
//!
//! # Features
//!
//! - **Gesture tracking**: single-owner drag recognition with touch slop,
//!   damping and multi-touch ownership transfer
//! - **Nested scrolling**: over-scroll of a nested-scrolling child turns into
//!   a pull, chained to an optional outer parent
//! - **State machine**: the pull lifecycle with header callbacks
//! - **Header**: the [`HeaderHandler`] callback trait and a presentation-free
//!   [`DefaultHeader`] model
//!
//! # Example
//!
//! ```rust
//! use jrefresh_layout::prelude::*;
//!
//! let mut layout = RefreshLayout::new();
//! layout.set_header_height(60.0);
//! layout.set_on_refresh_listener(|| println!("refreshing"));
//!
//! layout.dispatch_touch_event(&TouchEvent::down(0, 0.0));
//! layout.dispatch_touch_event(&TouchEvent::move_to(0, 20.0));
//! layout.dispatch_touch_event(&TouchEvent::move_to(0, 100.0));
//! assert_eq!(layout.state(), PullState::Pulling);
//! layout.dispatch_touch_event(&TouchEvent::move_to(0, 400.0));
//! assert_eq!(layout.state(), PullState::ReadyToRefresh);
//!
//! layout.dispatch_touch_event(&TouchEvent::up(0, 400.0));
//! while layout.tick(16.0) {}
//! assert_eq!(layout.state(), PullState::Refreshing);
//! ```

pub mod geometry;
pub mod gesture;
pub mod header;
pub mod machine;
pub mod nested;
pub mod refresh_layout;

pub use geometry::{PullGeometry, OFFSET_EPSILON};
pub use gesture::{DragSession, DragUpdate, GestureTracker};
pub use header::{
    ArrowDirection, Clock, DefaultHeader, HeaderHandler, HeaderStatus, LastRefresh, SystemClock,
};
pub use machine::{OffsetUpdate, PullStateMachine};
pub use nested::{NestedScrollCoordinator, NestedScrollParent, PreScroll};
pub use refresh_layout::{LayoutFrame, RefreshLayout, ScrollableContent};

/// Commonly used types for hosting a refresh layout
pub mod prelude {
    pub use crate::header::{DefaultHeader, HeaderHandler};
    pub use crate::nested::NestedScrollParent;
    pub use crate::refresh_layout::{LayoutFrame, RefreshLayout, ScrollableContent};
    pub use jrefresh_core::{
        PullState, RefreshConfig, ScrollAxes, ScrollDelta, TouchEvent, TouchPointer,
    };
}

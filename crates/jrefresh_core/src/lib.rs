//! jrefresh core
//!
//! Foundational types shared by the pull-to-refresh crates:
//!
//! - **Events**: abstracted touch pointers and nested-scroll deltas
//! - **State machine**: the pull lifecycle and its transition table
//! - **Configuration**: damping, distances, snap durations and touch slop
//!
//! # Example
//!
//! ```rust
//! use jrefresh_core::{PullEvent, PullState};
//!
//! let state = PullState::Idle;
//! assert_eq!(state.on_event(PullEvent::Pulled), Some(PullState::Pulling));
//!
//! // Skipping `Pulling` is not a legal transition
//! assert_eq!(state.on_event(PullEvent::ReachedTrigger), None);
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod fsm;

pub use config::RefreshConfig;
pub use error::{ConfigError, Result};
pub use events::{PointerId, Pointers, ScrollAxes, ScrollDelta, TouchEvent, TouchPointer};
pub use fsm::{PullEvent, PullState, Transition};

//! Pull-to-refresh state machine
//!
//! The transition table lives in [`PullState::on_event`]. Anything the table
//! does not list is an illegal transition and is dropped by the caller, which
//! lets racing events (a stale drag arriving after a refresh started, a second
//! completion signal) fall through without corrupting state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a pull-to-refresh container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullState {
    /// At rest, offset 0
    #[default]
    Idle,
    /// Being pulled, offset below the trigger distance
    Pulling,
    /// Pulled past the trigger distance; releasing commits to a refresh
    ReadyToRefresh,
    /// Refresh in progress, offset pinned at the trigger distance
    Refreshing,
    /// Refresh finished; transient, collapses to `Idle` immediately
    Completed,
}

/// Events that drive [`PullState`] transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullEvent {
    /// Offset moved into `(0, trigger)`
    Pulled,
    /// Offset reached or passed the trigger distance
    ReachedTrigger,
    /// Snap to the trigger position finished
    TriggerSnapFinished,
    /// Snap back to the start position finished after a released pull
    StartSnapFinished,
    /// Snap back to the start position finished after a refresh
    RefreshFinished,
    /// `Completed` collapsing back to `Idle`
    Settled,
}

impl PullState {
    /// Handle an event and return the new state, or None if no transition
    ///
    /// `Pulling -> Pulling` is the only self-transition in the table; it is
    /// how percent updates are reported while the user keeps dragging.
    pub fn on_event(&self, event: PullEvent) -> Option<Self> {
        use PullEvent::*;
        use PullState::*;
        match (self, event) {
            (Idle | Pulling | ReadyToRefresh, Pulled) => Some(Pulling),
            (Pulling, ReachedTrigger) => Some(ReadyToRefresh),
            (Idle | Pulling | ReadyToRefresh, TriggerSnapFinished) => Some(Refreshing),
            (Pulling | ReadyToRefresh, StartSnapFinished) => Some(Idle),
            (Refreshing, RefreshFinished) => Some(Completed),
            (Completed, Settled) => Some(Idle),
            _ => None,
        }
    }

    /// Check if a user pull is in progress
    pub fn is_pulling(&self) -> bool {
        matches!(self, PullState::Pulling | PullState::ReadyToRefresh)
    }

    /// Check if a refresh is running
    pub fn is_refreshing(&self) -> bool {
        matches!(self, PullState::Refreshing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PullState::Idle => "idle",
            PullState::Pulling => "pulling",
            PullState::ReadyToRefresh => "ready_to_refresh",
            PullState::Refreshing => "refreshing",
            PullState::Completed => "completed",
        }
    }
}

impl fmt::Display for PullState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: PullState,
    pub event: PullEvent,
    pub to: PullState,
}

impl Transition {
    pub fn new(from: PullState, event: PullEvent, to: PullState) -> Self {
        Self { from, event, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [PullState; 5] = [
        PullState::Idle,
        PullState::Pulling,
        PullState::ReadyToRefresh,
        PullState::Refreshing,
        PullState::Completed,
    ];

    #[test]
    fn test_full_refresh_cycle() {
        let mut state = PullState::Idle;

        for event in [
            PullEvent::Pulled,
            PullEvent::Pulled,
            PullEvent::ReachedTrigger,
            PullEvent::TriggerSnapFinished,
            PullEvent::RefreshFinished,
            PullEvent::Settled,
        ] {
            state = state.on_event(event).expect("legal transition");
        }

        assert_eq!(state, PullState::Idle);
    }

    #[test]
    fn test_ready_requires_pulling() {
        assert_eq!(PullState::Idle.on_event(PullEvent::ReachedTrigger), None);
        assert_eq!(
            PullState::Refreshing.on_event(PullEvent::ReachedTrigger),
            None
        );
        assert_eq!(
            PullState::ReadyToRefresh.on_event(PullEvent::ReachedTrigger),
            None
        );
        assert_eq!(
            PullState::Pulling.on_event(PullEvent::ReachedTrigger),
            Some(PullState::ReadyToRefresh)
        );
    }

    #[test]
    fn test_pulling_guard() {
        assert_eq!(PullState::Refreshing.on_event(PullEvent::Pulled), None);
        assert_eq!(PullState::Completed.on_event(PullEvent::Pulled), None);
        assert_eq!(
            PullState::ReadyToRefresh.on_event(PullEvent::Pulled),
            Some(PullState::Pulling)
        );
    }

    #[test]
    fn test_is_pulling() {
        let pulling: Vec<_> = ALL_STATES.into_iter().filter(|s| s.is_pulling()).collect();
        assert_eq!(pulling, vec![PullState::Pulling, PullState::ReadyToRefresh]);
    }

    #[test]
    fn test_refresh_finished_only_from_refreshing() {
        for state in ALL_STATES {
            let next = state.on_event(PullEvent::RefreshFinished);
            if state == PullState::Refreshing {
                assert_eq!(next, Some(PullState::Completed));
            } else {
                assert_eq!(next, None, "{state} should ignore RefreshFinished");
            }
        }
    }

    #[test]
    fn test_only_pulling_refires_itself() {
        let events = [
            PullEvent::Pulled,
            PullEvent::ReachedTrigger,
            PullEvent::TriggerSnapFinished,
            PullEvent::StartSnapFinished,
            PullEvent::RefreshFinished,
            PullEvent::Settled,
        ];
        for state in ALL_STATES {
            for event in events {
                if state.on_event(event) == Some(state) {
                    assert_eq!((state, event), (PullState::Pulling, PullEvent::Pulled));
                }
            }
        }
    }

    #[test]
    fn test_start_snap_never_interrupts_refresh() {
        assert_eq!(
            PullState::Refreshing.on_event(PullEvent::StartSnapFinished),
            None
        );
    }
}

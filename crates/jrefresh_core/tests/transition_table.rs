//! Integration tests for the pull state machine and config loading
//!
//! These tests verify that:
//! - Every (state, event) pair outside the documented table is dropped
//! - No sequence of events reaches `Idle` straight from `Refreshing`
//! - Config files are loaded and errors surface with the right variant

use jrefresh_core::{ConfigError, PullEvent, PullState, RefreshConfig};
use std::path::Path;

const STATES: [PullState; 5] = [
    PullState::Idle,
    PullState::Pulling,
    PullState::ReadyToRefresh,
    PullState::Refreshing,
    PullState::Completed,
];

const EVENTS: [PullEvent; 6] = [
    PullEvent::Pulled,
    PullEvent::ReachedTrigger,
    PullEvent::TriggerSnapFinished,
    PullEvent::StartSnapFinished,
    PullEvent::RefreshFinished,
    PullEvent::Settled,
];

#[test]
fn test_table_is_exactly_the_documented_one() {
    use PullEvent::*;
    use PullState::*;

    let mut legal = 0;
    for from in STATES {
        for event in EVENTS {
            let expected = match (from, event) {
                (Idle | Pulling | ReadyToRefresh, Pulled) => Some(Pulling),
                (Pulling, ReachedTrigger) => Some(ReadyToRefresh),
                (Idle | Pulling | ReadyToRefresh, TriggerSnapFinished) => Some(Refreshing),
                (Pulling | ReadyToRefresh, StartSnapFinished) => Some(Idle),
                (Refreshing, RefreshFinished) => Some(Completed),
                (Completed, Settled) => Some(Idle),
                _ => None,
            };
            assert_eq!(from.on_event(event), expected, "{from} on {event:?}");
            legal += expected.is_some() as usize;
        }
    }
    assert_eq!(legal, 11);
}

#[test]
fn test_only_pulling_repeats_itself() {
    for state in STATES {
        for event in EVENTS {
            if state.on_event(event) == Some(state) {
                assert_eq!(state, PullState::Pulling, "{state} repeats on {event:?}");
            }
        }
    }
}

#[test]
fn test_refreshing_never_jumps_to_idle() {
    for event in EVENTS {
        assert_ne!(PullState::Refreshing.on_event(event), Some(PullState::Idle));
    }
}

#[test]
fn test_missing_config_file_is_io_error() {
    let err = RefreshConfig::from_path(Path::new("does/not/exist/refresh.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
    assert!(err.to_string().starts_with("Failed to read config"));
}

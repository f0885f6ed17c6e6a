//! Assertion helpers for scenario steps

use jrefresh_core::PullState;

/// Observable controller state at the time of an assertion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub state: PullState,
    pub offset: f32,
    pub refresh_count: u32,
}

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

pub fn evaluate_assert_state(expected: PullState, snapshot: &Snapshot) -> AssertionResult {
    if snapshot.state == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::Failed {
            code: "state_mismatch".to_string(),
            message: format!("expected state {expected}, got {}", snapshot.state),
        }
    }
}

pub fn evaluate_assert_offset(expected: f32, tolerance: f32, snapshot: &Snapshot) -> AssertionResult {
    if (snapshot.offset - expected).abs() <= tolerance {
        AssertionResult::Passed
    } else {
        AssertionResult::Failed {
            code: "offset_mismatch".to_string(),
            message: format!(
                "expected offset {expected:.1} (±{tolerance}), got {:.1}",
                snapshot.offset
            ),
        }
    }
}

pub fn evaluate_assert_refresh_count(expected: u32, snapshot: &Snapshot) -> AssertionResult {
    if snapshot.refresh_count == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::Failed {
            code: "refresh_count_mismatch".to_string(),
            message: format!(
                "expected {expected} refreshes, got {}",
                snapshot.refresh_count
            ),
        }
    }
}

//! Scenario definition for headless pull-to-refresh runs

use anyhow::Result;
use jrefresh_core::{PointerId, PullState, ScrollAxes};
use serde::Deserialize;
use std::path::Path;

/// A scripted sequence of input, frames and assertions
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Header height reported before the first step; None leaves the layout
    /// unmeasured until a `measure` step
    #[serde(default = "default_header_height")]
    pub header_height: Option<f32>,
    /// Complete each refresh this many milliseconds after it starts
    #[serde(default)]
    pub auto_complete_ms: Option<u64>,
    pub steps: Vec<ScenarioStep>,
}

fn default_header_height() -> Option<f32> {
    Some(60.0)
}

impl Scenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}

/// Axes offered when a nested scroll session starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAxes {
    #[default]
    Vertical,
    Horizontal,
    Both,
}

impl From<StepAxes> for ScrollAxes {
    fn from(axes: StepAxes) -> Self {
        match axes {
            StepAxes::Vertical => ScrollAxes::VERTICAL,
            StepAxes::Horizontal => ScrollAxes::HORIZONTAL,
            StepAxes::Both => ScrollAxes::VERTICAL.union(ScrollAxes::HORIZONTAL),
        }
    }
}

/// One scenario step
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// First pointer touches down
    Down {
        #[serde(default)]
        pointer: PointerId,
        y: f32,
    },
    /// Another pointer touches down
    PointerDown { pointer: PointerId, y: f32 },
    /// A pointer moves
    Move {
        #[serde(default)]
        pointer: PointerId,
        y: f32,
    },
    /// A non-final pointer lifts
    PointerUp { pointer: PointerId },
    /// The last pointer lifts
    Up {
        #[serde(default)]
        pointer: PointerId,
    },
    Cancel,
    /// Report a (re)measured header height
    Measure { header_height: f32 },
    /// Whether the content can still scroll toward its top
    ContentScroll { can_scroll_up: bool },
    NestedStart {
        #[serde(default)]
        axes: StepAxes,
    },
    NestedPreScroll { dy: f32 },
    NestedScroll {
        #[serde(default)]
        dy_consumed: f32,
        dy_unconsumed: f32,
    },
    NestedStop,
    StartRefreshing,
    CompleteRefresh,
    Tick { frames: u32 },
    Wait { ms: u64 },
    AssertState { state: PullState },
    AssertOffset {
        offset: f32,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
    AssertRefreshCount { count: u32 },
}

fn default_tolerance() -> f32 {
    0.5
}

impl ScenarioStep {
    /// Assertion name used in reports, for assertion steps
    pub fn assertion_name(&self) -> Option<&'static str> {
        match self {
            ScenarioStep::AssertState { .. } => Some("assert_state"),
            ScenarioStep::AssertOffset { .. } => Some("assert_offset"),
            ScenarioStep::AssertRefreshCount { .. } => Some("assert_refresh_count"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let scenario = Scenario::from_json(
            r#"{
                "auto_complete_ms": 2000,
                "steps": [
                    { "type": "down", "y": 0 },
                    { "type": "move", "pointer": 0, "y": 120 },
                    { "type": "nested_start" },
                    { "type": "nested_scroll", "dy_unconsumed": -40 },
                    { "type": "assert_state", "state": "ready_to_refresh" },
                    { "type": "assert_offset", "offset": 100 }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(scenario.header_height, Some(60.0));
        assert_eq!(scenario.auto_complete_ms, Some(2000));
        assert_eq!(scenario.steps.len(), 6);
        assert!(matches!(
            scenario.steps[2],
            ScenarioStep::NestedStart {
                axes: StepAxes::Vertical
            }
        ));
        assert!(matches!(
            scenario.steps[4],
            ScenarioStep::AssertState {
                state: PullState::ReadyToRefresh
            }
        ));
        match scenario.steps[5] {
            ScenarioStep::AssertOffset { offset, tolerance } => {
                assert_eq!(offset, 100.0);
                assert_eq!(tolerance, 0.5);
            }
            ref other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_unmeasured_scenario() {
        let scenario = Scenario::from_json(r#"{ "header_height": null, "steps": [] }"#).unwrap();
        assert_eq!(scenario.header_height, None);
    }

    #[test]
    fn test_unknown_step_is_rejected() {
        assert!(Scenario::from_json(r#"{ "steps": [{ "type": "fling" }] }"#).is_err());
    }
}

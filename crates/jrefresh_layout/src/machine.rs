//! Pull state and content offset
//!
//! [`PullStateMachine`] owns the only copy of the lifecycle state and the
//! content offset. Drag updates, nested-scroll updates and animation frames
//! all go through [`PullStateMachine::offset_to`]; snap completions and
//! refresh signals go through [`PullStateMachine::send`]. Header callbacks
//! fire from here, synchronously, right after the state changes.

use jrefresh_core::{PullEvent, PullState, Transition};

use crate::geometry::PullGeometry;
use crate::header::HeaderHandler;

/// Result of moving the content offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetUpdate {
    /// Offset actually applied
    pub offset: f32,
    /// The requested distance reached `max_pull_distance` and was clamped
    pub over_pulled: bool,
}

/// Lifecycle state, content offset and header notifications
pub struct PullStateMachine {
    state: PullState,
    offset: f32,
    geometry: Option<PullGeometry>,
    header: Option<Box<dyn HeaderHandler>>,
    history: Vec<Transition>,
}

impl PullStateMachine {
    pub fn new() -> Self {
        Self {
            state: PullState::Idle,
            offset: 0.0,
            geometry: None,
            header: None,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> PullState {
        self.state
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn geometry(&self) -> Option<&PullGeometry> {
        self.geometry.as_ref()
    }

    pub fn set_geometry(&mut self, geometry: PullGeometry) {
        tracing::debug!(
            "Pull geometry: trigger={:.1} max={:.1}",
            geometry.trigger_distance,
            geometry.max_pull_distance
        );
        self.geometry = Some(geometry);
    }

    pub fn set_header(&mut self, header: Option<Box<dyn HeaderHandler>>) {
        self.header = header;
    }

    /// Every state change so far, oldest first
    pub fn history(&self) -> &[Transition] {
        &self.history
    }

    /// Move the content to `distance`
    ///
    /// The state is checked against the unclamped distance first, then the
    /// offset is clamped into `[0, max_pull_distance)`. A positive offset
    /// from Idle always leaves Idle, even when it lands past the trigger.
    /// Returns None while the geometry is unknown.
    pub fn offset_to(&mut self, distance: f32) -> Option<OffsetUpdate> {
        let geometry = self.geometry?;
        self.check_pull_distance(&geometry, distance);

        self.offset = geometry.clamp_offset(distance);
        tracing::trace!("Content offset {:.1} (requested {:.1})", self.offset, distance);

        Some(OffsetUpdate {
            offset: self.offset,
            over_pulled: distance >= geometry.max_pull_distance,
        })
    }

    /// Feed an event to the transition table
    ///
    /// Returns the new state, or None when the event is illegal in the
    /// current state and was dropped.
    pub fn send(&mut self, event: PullEvent) -> Option<PullState> {
        self.send_with_percent(event, 0)
    }

    fn send_with_percent(&mut self, event: PullEvent, percent: u8) -> Option<PullState> {
        let from = self.state;
        let Some(to) = from.on_event(event) else {
            tracing::trace!("Dropped {:?} in state {}", event, from);
            return None;
        };

        self.state = to;
        if from != to {
            tracing::debug!("Pull state {} -> {} ({:?})", from, to, event);
            self.history.push(Transition::new(from, event, to));
        }

        match to {
            PullState::Pulling => {
                if let Some(header) = self.header.as_mut() {
                    header.on_pulling(percent);
                }
            }
            PullState::ReadyToRefresh => {
                if let Some(header) = self.header.as_mut() {
                    header.on_pulling(100);
                    header.on_refresh_ready();
                }
            }
            PullState::Refreshing => {
                if let Some(header) = self.header.as_mut() {
                    header.on_refreshing();
                }
            }
            PullState::Completed => {
                // Completed is transient; settle before telling the header
                self.send(PullEvent::Settled);
                if let Some(header) = self.header.as_mut() {
                    header.on_refresh_completed();
                }
            }
            PullState::Idle => {}
        }

        Some(self.state)
    }

    fn check_pull_distance(&mut self, geometry: &PullGeometry, distance: f32) {
        if distance > 0.0 && distance < geometry.trigger_distance {
            self.send_with_percent(PullEvent::Pulled, geometry.percent(distance));
        } else if distance >= geometry.trigger_distance {
            // A jump straight past the trigger still goes through Pulling
            if self.state == PullState::Idle {
                self.send_with_percent(PullEvent::Pulled, 100);
            }
            self.send(PullEvent::ReachedTrigger);
        }
    }
}

impl Default for PullStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::OFFSET_EPSILON;
    use jrefresh_core::RefreshConfig;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl HeaderHandler for Recorder {
        fn on_pulling(&mut self, percent: u8) {
            self.calls.push(format!("pulling {}", percent));
        }

        fn on_refresh_ready(&mut self) {
            self.calls.push("ready".to_string());
        }

        fn on_refreshing(&mut self) {
            self.calls.push("refreshing".to_string());
        }

        fn on_refresh_completed(&mut self) {
            self.calls.push("completed".to_string());
        }
    }

    fn machine() -> (PullStateMachine, Rc<RefCell<Recorder>>) {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut machine = PullStateMachine::new();
        machine.set_geometry(PullGeometry::new(60.0, &RefreshConfig::default()));
        machine.set_header(Some(Box::new(recorder.clone())));
        (machine, recorder)
    }

    #[test]
    fn test_no_geometry_no_offset() {
        let mut machine = PullStateMachine::new();
        assert_eq!(machine.offset_to(50.0), None);
        assert_eq!(machine.state(), PullState::Idle);
    }

    #[test]
    fn test_percent_reported_while_pulling() {
        let (mut machine, recorder) = machine();

        machine.offset_to(0.0);
        assert_eq!(machine.state(), PullState::Idle);

        machine.offset_to(50.0);
        machine.offset_to(75.0);
        assert_eq!(machine.state(), PullState::Pulling);
        assert_eq!(recorder.borrow().calls, vec!["pulling 50", "pulling 75"]);
        // Pulling -> Pulling is not a state change
        assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn test_ready_fires_once() {
        let (mut machine, recorder) = machine();
        machine.offset_to(50.0);
        machine.offset_to(100.0);
        machine.offset_to(120.0);

        assert_eq!(machine.state(), PullState::ReadyToRefresh);
        assert_eq!(
            recorder.borrow().calls,
            vec!["pulling 50", "pulling 100", "ready"]
        );

        machine.offset_to(99.0);
        assert_eq!(machine.state(), PullState::Pulling);
    }

    #[test]
    fn test_jump_from_idle_passes_through_pulling() {
        let (mut machine, recorder) = machine();
        machine.offset_to(120.0);

        assert_eq!(machine.state(), PullState::ReadyToRefresh);
        assert_eq!(machine.offset(), 120.0);
        assert_eq!(
            recorder.borrow().calls,
            vec!["pulling 100", "pulling 100", "ready"]
        );

        let states: Vec<_> = machine.history().iter().map(|t| t.to).collect();
        assert_eq!(states, vec![PullState::Pulling, PullState::ReadyToRefresh]);
    }

    #[test]
    fn test_ready_event_from_idle_is_dropped() {
        let (mut machine, recorder) = machine();

        assert_eq!(machine.send(PullEvent::ReachedTrigger), None);
        assert_eq!(machine.state(), PullState::Idle);
        assert!(recorder.borrow().calls.is_empty());
    }

    #[test]
    fn test_positive_offset_never_idle() {
        for distance in [0.5, 99.9, 100.0, 149.5, 400.0] {
            let (mut machine, _) = machine();
            machine.offset_to(distance);
            assert!(machine.offset() > 0.0);
            assert!(
                machine.state().is_pulling(),
                "{distance} left the machine in {}",
                machine.state()
            );
        }
    }

    #[test]
    fn test_offset_is_clamped() {
        let (mut machine, _) = machine();

        let update = machine.offset_to(-20.0).unwrap();
        assert_eq!(update.offset, 0.0);
        assert!(!update.over_pulled);

        let update = machine.offset_to(400.0).unwrap();
        assert_eq!(update.offset, 150.0 - OFFSET_EPSILON);
        assert!(update.over_pulled);

        // Just below the max still clamps, so the offset never drops back
        let update = machine.offset_to(149.5).unwrap();
        assert_eq!(update.offset, 150.0 - OFFSET_EPSILON);
        assert!(!update.over_pulled);
    }

    #[test]
    fn test_completion_settles_before_callback() {
        let (mut machine, recorder) = machine();
        machine.offset_to(50.0);
        machine.offset_to(100.0);
        machine.send(PullEvent::TriggerSnapFinished);
        assert_eq!(machine.state(), PullState::Refreshing);

        // Stale drag updates do not leave Refreshing
        machine.offset_to(40.0);
        assert_eq!(machine.state(), PullState::Refreshing);

        assert_eq!(machine.send(PullEvent::RefreshFinished), Some(PullState::Idle));
        assert_eq!(machine.send(PullEvent::RefreshFinished), None);

        let calls = recorder.borrow().calls.clone();
        assert_eq!(calls.last().map(String::as_str), Some("completed"));
        assert_eq!(calls.iter().filter(|c| *c == "completed").count(), 1);

        let states: Vec<_> = machine.history().iter().map(|t| t.to).collect();
        assert_eq!(
            states,
            vec![
                PullState::Pulling,
                PullState::ReadyToRefresh,
                PullState::Refreshing,
                PullState::Completed,
                PullState::Idle,
            ]
        );
    }
}

//! Scenario runner that replays steps against a `RefreshLayout`

use std::cell::Cell;
use std::rc::Rc;

use anyhow::{bail, Result};
use jrefresh_core::{
    PointerId, Pointers, RefreshConfig, ScrollAxes, ScrollDelta, TouchEvent, TouchPointer,
};
use jrefresh_layout::RefreshLayout;

use crate::assert::{
    evaluate_assert_offset, evaluate_assert_refresh_count, evaluate_assert_state, AssertionResult,
    Snapshot,
};
use crate::report::{RunReport, RunSummary};
use crate::scenario::{Scenario, ScenarioStep};

/// Frame clock settings for a run
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Simulated duration of one frame
    pub tick_ms: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { tick_ms: 16 }
    }
}

/// Execute a loaded scenario
///
/// Returns an error for a malformed scenario (e.g. lifting a pointer that is
/// not down); failed assertions produce a failed report instead.
pub fn run_scenario(
    scenario: &Scenario,
    config: RefreshConfig,
    options: RunOptions,
) -> Result<RunReport> {
    let mut runner = Runner::new(scenario, config, options)?;

    for (step_index, step) in scenario.steps.iter().enumerate() {
        tracing::debug!("Step {}: {:?}", step_index, step);
        if let AssertionResult::Failed { code, message } = runner.apply(step_index, step)? {
            let assertion = step.assertion_name().unwrap_or("step");
            tracing::info!("Step {} failed ({}): {}", step_index, code, message);
            return Ok(RunReport::failed(
                assertion,
                step_index,
                message,
                runner.summary(),
            ));
        }
    }

    Ok(RunReport::passed(runner.summary()))
}

struct Runner {
    layout: RefreshLayout,
    pointers: Vec<TouchPointer>,
    content_scrolls_up: Rc<Cell<bool>>,
    refresh_started: Rc<Cell<bool>>,
    auto_complete_ms: Option<u64>,
    completion_due_ms: Option<u64>,
    tick_ms: u64,
    elapsed_frames: u64,
    elapsed_ms: u64,
}

impl Runner {
    fn new(scenario: &Scenario, config: RefreshConfig, options: RunOptions) -> Result<Self> {
        let mut layout = RefreshLayout::with_config(config)?;

        let content_scrolls_up = Rc::new(Cell::new(false));
        let scrolls_up = content_scrolls_up.clone();
        layout.set_scrollable_content(move || scrolls_up.get());

        let refresh_started = Rc::new(Cell::new(false));
        let flag = refresh_started.clone();
        layout.set_on_refresh_listener(move || flag.set(true));

        if let Some(height) = scenario.header_height {
            layout.set_header_height(height);
        }

        Ok(Self {
            layout,
            pointers: Vec::new(),
            content_scrolls_up,
            refresh_started,
            auto_complete_ms: scenario.auto_complete_ms,
            completion_due_ms: None,
            tick_ms: options.tick_ms.max(1),
            elapsed_frames: 0,
            elapsed_ms: 0,
        })
    }

    fn apply(&mut self, step_index: usize, step: &ScenarioStep) -> Result<AssertionResult> {
        match *step {
            ScenarioStep::Down { pointer, y } => {
                let down = TouchPointer::new(pointer, 0.0, y);
                self.pointers = vec![down];
                self.dispatch(TouchEvent::Down { pointer: down });
            }
            ScenarioStep::PointerDown { pointer, y } => {
                let down = TouchPointer::new(pointer, 0.0, y);
                self.pointers.retain(|p| p.id != pointer);
                self.pointers.push(down);
                let pointers = self.current_pointers();
                self.dispatch(TouchEvent::PointerDown {
                    pointer: down,
                    pointers,
                });
            }
            ScenarioStep::Move { pointer, y } => {
                let known = self
                    .pointers
                    .iter_mut()
                    .find(|p| p.id == pointer)
                    .map(|p| p.y = y)
                    .is_some();
                if known {
                    let pointers = self.current_pointers();
                    self.dispatch(TouchEvent::Move { pointers });
                } else {
                    tracing::warn!("Step {}: moving pointer {} that is not down", step_index, pointer);
                    self.dispatch(TouchEvent::move_to(pointer, y));
                }
            }
            ScenarioStep::PointerUp { pointer } => {
                let Some(lifted) = self.find_pointer(pointer) else {
                    bail!("step {step_index}: pointer {pointer} is not down");
                };
                let pointers = self.current_pointers();
                self.pointers.retain(|p| p.id != pointer);
                self.dispatch(TouchEvent::PointerUp {
                    pointer: lifted,
                    pointers,
                });
            }
            ScenarioStep::Up { pointer } => {
                let lifted = self
                    .find_pointer(pointer)
                    .unwrap_or(TouchPointer::new(pointer, 0.0, 0.0));
                self.pointers.clear();
                self.dispatch(TouchEvent::Up { pointer: lifted });
            }
            ScenarioStep::Cancel => {
                self.pointers.clear();
                self.dispatch(TouchEvent::Cancel);
            }
            ScenarioStep::Measure { header_height } => {
                self.layout.set_header_height(header_height);
            }
            ScenarioStep::ContentScroll { can_scroll_up } => {
                self.content_scrolls_up.set(can_scroll_up);
            }
            ScenarioStep::NestedStart { axes } => {
                let axes: ScrollAxes = axes.into();
                if self.layout.on_start_nested_scroll(axes) {
                    self.layout.on_nested_scroll_accepted(axes);
                } else {
                    tracing::debug!("Step {}: nested scroll rejected", step_index);
                }
            }
            ScenarioStep::NestedPreScroll { dy } => {
                let consumed = self.layout.on_nested_pre_scroll(ScrollDelta::new(0.0, dy));
                tracing::trace!("Nested pre-scroll consumed {:.1}", consumed.y);
            }
            ScenarioStep::NestedScroll {
                dy_consumed,
                dy_unconsumed,
            } => {
                self.layout.on_nested_scroll(
                    ScrollDelta::new(0.0, dy_consumed),
                    ScrollDelta::new(0.0, dy_unconsumed),
                );
            }
            ScenarioStep::NestedStop => self.layout.on_stop_nested_scroll(),
            ScenarioStep::StartRefreshing => self.layout.start_refreshing(),
            ScenarioStep::CompleteRefresh => self.layout.set_refresh_completed(),
            ScenarioStep::Tick { frames } => {
                for _ in 0..frames {
                    self.frame(self.tick_ms);
                }
            }
            ScenarioStep::Wait { ms } => {
                let mut remaining = ms;
                while remaining > 0 {
                    let dt = remaining.min(self.tick_ms);
                    remaining -= dt;
                    self.frame(dt);
                }
            }
            ScenarioStep::AssertState { state } => {
                return Ok(evaluate_assert_state(state, &self.snapshot()));
            }
            ScenarioStep::AssertOffset { offset, tolerance } => {
                return Ok(evaluate_assert_offset(offset, tolerance, &self.snapshot()));
            }
            ScenarioStep::AssertRefreshCount { count } => {
                return Ok(evaluate_assert_refresh_count(count, &self.snapshot()));
            }
        }

        self.poll_refresh_started();
        Ok(AssertionResult::Passed)
    }

    fn dispatch(&mut self, event: TouchEvent) {
        let handled = self.layout.dispatch_touch_event(&event);
        tracing::trace!("{:?} handled: {}", event, handled);
    }

    fn frame(&mut self, dt_ms: u64) {
        self.layout.tick(dt_ms as f32);
        self.elapsed_frames = self.elapsed_frames.saturating_add(1);
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        self.poll_refresh_started();

        if let Some(due) = self.completion_due_ms {
            if self.elapsed_ms >= due {
                self.completion_due_ms = None;
                tracing::debug!("Auto-completing refresh at {}ms", self.elapsed_ms);
                self.layout.set_refresh_completed();
            }
        }
    }

    fn poll_refresh_started(&mut self) {
        if !self.refresh_started.replace(false) {
            return;
        }
        tracing::info!("Refresh started at {}ms", self.elapsed_ms);
        if let Some(delay) = self.auto_complete_ms {
            self.completion_due_ms = Some(self.elapsed_ms.saturating_add(delay));
        }
    }

    fn find_pointer(&self, id: PointerId) -> Option<TouchPointer> {
        self.pointers.iter().copied().find(|p| p.id == id)
    }

    fn current_pointers(&self) -> Pointers {
        self.pointers.iter().copied().collect()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.layout.state(),
            offset: self.layout.content_offset(),
            refresh_count: self.layout.refresh_count(),
        }
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            elapsed_frames: self.elapsed_frames,
            elapsed_ms: self.elapsed_ms,
            refresh_count: self.layout.refresh_count(),
            final_state: self.layout.state(),
            final_offset: self.layout.content_offset(),
            transitions: self.layout.history().to_vec(),
        }
    }
}

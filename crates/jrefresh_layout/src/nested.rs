//! Nested scroll cooperation
//!
//! When the content is itself a nested-scrolling child, it reports its scroll
//! deltas here instead of raw pointer events. Downward over-scroll at the top
//! of the content accumulates into a pull; scrolling back up first unwinds
//! that pull before the content scrolls again. Anything left over is chained
//! to an optional outer parent.

use jrefresh_core::{ScrollAxes, ScrollDelta};

/// An ancestor that takes part in nested scrolling
///
/// Every method has a pass-through default, so implementors only override
/// what they care about.
pub trait NestedScrollParent {
    /// Returns true to accept a nested scroll session on `axes`
    fn on_start_nested_scroll(&mut self, axes: ScrollAxes) -> bool {
        let _ = axes;
        false
    }

    /// Returns the portion of `delta` consumed before the child scrolls
    fn on_nested_pre_scroll(&mut self, delta: ScrollDelta) -> ScrollDelta {
        let _ = delta;
        ScrollDelta::ZERO
    }

    /// Returns how far the caller moved in window coordinates
    fn on_nested_scroll(&mut self, consumed: ScrollDelta, unconsumed: ScrollDelta) -> ScrollDelta {
        let _ = (consumed, unconsumed);
        ScrollDelta::ZERO
    }

    fn on_stop_nested_scroll(&mut self) {}

    fn on_nested_pre_fling(&mut self, velocity_x: f32, velocity_y: f32) -> bool {
        let _ = (velocity_x, velocity_y);
        false
    }

    fn on_nested_fling(&mut self, velocity_x: f32, velocity_y: f32, consumed: bool) -> bool {
        let _ = (velocity_x, velocity_y, consumed);
        false
    }
}

/// Result of a pre-scroll pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreScroll {
    /// Portion of the delta consumed here and by the outer parent
    pub consumed: ScrollDelta,
    /// New pull distance, when the local pull changed
    pub pull: Option<f32>,
}

/// Accumulates nested over-scroll into a pull distance
pub struct NestedScrollCoordinator {
    damping_ratio: f32,
    total_unconsumed: f32,
    in_progress: bool,
    /// The current session has moved the offset at least once
    pulled: bool,
    parent: Option<Box<dyn NestedScrollParent>>,
    parent_active: bool,
}

impl NestedScrollCoordinator {
    pub fn new(damping_ratio: f32) -> Self {
        Self {
            damping_ratio,
            total_unconsumed: 0.0,
            in_progress: false,
            pulled: false,
            parent: None,
            parent_active: false,
        }
    }

    pub fn set_parent(&mut self, parent: Option<Box<dyn NestedScrollParent>>) {
        self.parent = parent;
        self.parent_active = false;
    }

    /// Check if a nested scroll session is active
    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    /// Distance scrolled past the top of the content and not yet unwound
    pub fn total_unconsumed(&self) -> f32 {
        self.total_unconsumed
    }

    /// Only vertical sessions are of interest
    pub fn accepts(&self, axes: ScrollAxes) -> bool {
        axes.vertical()
    }

    /// Begin a session; also starts one on the outer parent
    pub fn accept(&mut self, axes: ScrollAxes) {
        self.total_unconsumed = 0.0;
        self.in_progress = true;
        self.pulled = false;
        self.parent_active = match self.parent.as_mut() {
            Some(parent) => parent.on_start_nested_scroll(axes.vertical_only()),
            None => false,
        };
        tracing::trace!("Nested scroll accepted (parent active: {})", self.parent_active);
    }

    /// Unwind an existing pull before the child scrolls
    ///
    /// `max_pull_distance` is None when the pull must not change locally
    /// (geometry unknown, snap in flight, refreshing); the delta is then only
    /// offered to the outer parent.
    pub fn pre_scroll(&mut self, delta: ScrollDelta, max_pull_distance: Option<f32>) -> PreScroll {
        let mut consumed = ScrollDelta::ZERO;
        let mut pull = None;

        if let Some(max) = max_pull_distance {
            if delta.y > 0.0 && self.total_unconsumed > 0.0 {
                let taken = delta.y.min(self.total_unconsumed);
                self.total_unconsumed -= taken;
                consumed.y = taken;
                pull = Some(self.claim(max));
            }
        }

        if self.parent_active {
            if let Some(parent) = self.parent.as_mut() {
                let remaining = ScrollDelta::new(delta.x - consumed.x, delta.y - consumed.y);
                let by_parent = parent.on_nested_pre_scroll(remaining);
                consumed.x += by_parent.x;
                consumed.y += by_parent.y;
            }
        }

        PreScroll { consumed, pull }
    }

    /// Accumulate what the child could not scroll
    ///
    /// Returns the new pull distance when the local pull changed.
    pub fn scroll(
        &mut self,
        consumed: ScrollDelta,
        unconsumed: ScrollDelta,
        can_child_scroll_up: bool,
        max_pull_distance: Option<f32>,
    ) -> Option<f32> {
        let parent_offset = match self.parent.as_mut() {
            Some(parent) if self.parent_active => parent.on_nested_scroll(consumed, unconsumed),
            _ => ScrollDelta::ZERO,
        };

        let dy = unconsumed.y + parent_offset.y;
        let max = max_pull_distance?;
        if dy < 0.0 && !can_child_scroll_up {
            self.total_unconsumed += dy.abs();
            return Some(self.claim(max));
        }
        None
    }

    /// End the session
    ///
    /// Returns true when the session pulled and the pull should be finished.
    pub fn stop(&mut self) -> bool {
        let release = self.total_unconsumed > 0.0 || self.pulled;
        self.in_progress = false;
        self.total_unconsumed = 0.0;
        self.pulled = false;

        if self.parent_active {
            if let Some(parent) = self.parent.as_mut() {
                parent.on_stop_nested_scroll();
            }
            self.parent_active = false;
        }
        release
    }

    pub fn pre_fling(&mut self, velocity_x: f32, velocity_y: f32) -> bool {
        match self.parent.as_mut() {
            Some(parent) if self.parent_active => parent.on_nested_pre_fling(velocity_x, velocity_y),
            _ => false,
        }
    }

    pub fn fling(&mut self, velocity_x: f32, velocity_y: f32, consumed: bool) -> bool {
        match self.parent.as_mut() {
            Some(parent) if self.parent_active => {
                parent.on_nested_fling(velocity_x, velocity_y, consumed)
            }
            _ => false,
        }
    }

    /// Convert the accumulator to a pull, feeding any excess back
    fn claim(&mut self, max_pull_distance: f32) -> f32 {
        self.pulled = true;
        let pull = self.total_unconsumed * self.damping_ratio;
        if pull > max_pull_distance {
            self.total_unconsumed = max_pull_distance / self.damping_ratio;
            return max_pull_distance;
        }
        pull
    }
}

impl Default for NestedScrollCoordinator {
    fn default() -> Self {
        Self::new(jrefresh_core::RefreshConfig::default().damping_ratio)
    }
}

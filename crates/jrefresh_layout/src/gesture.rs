//! Pointer gesture tracking
//!
//! Resolves raw touch events (possibly multi-touch) into a single owning
//! pointer and a damped pull distance. The tracker runs in two phases that
//! mirror parent/child event dispatch:
//!
//! - [`GestureTracker::intercept`] watches a gesture that is still flowing to
//!   the content and decides when it becomes a pull (past the touch slop).
//! - [`GestureTracker::track`] consumes a claimed gesture and reports pull
//!   distances and the final release.
//!
//! Gating (disabled input, refresh in progress, snaps in flight, nested
//! scrolling) is the caller's job; the tracker only ever sees events it is
//! allowed to interpret.

use jrefresh_core::{PointerId, TouchEvent, TouchPointer};

/// Per-gesture tracking state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragSession {
    /// Pointer that owns the drag; None when no gesture is being tracked
    pub active_pointer: Option<PointerId>,
    /// Reference coordinate for delta computation
    pub start_y: f32,
    /// Set once the pointer has travelled past the touch slop
    pub is_dragging: bool,
}

/// Outcome of feeding a claimed gesture event to the tracker
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragUpdate {
    /// Bookkeeping only (down, pointer transfer)
    Tracked,
    /// Event could not be interpreted (unknown or stale pointer)
    Ignored,
    /// New damped pull distance, with the raw coordinate that produced it
    Pull { distance: f32, motion_y: f32 },
    /// The gesture ended; the pull should be finished
    Release,
}

/// Single-owner drag tracker
#[derive(Debug, Clone)]
pub struct GestureTracker {
    session: DragSession,
    touch_slop: f32,
    damping_ratio: f32,
}

impl GestureTracker {
    pub fn new(touch_slop: f32, damping_ratio: f32) -> Self {
        Self {
            session: DragSession::default(),
            touch_slop,
            damping_ratio,
        }
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging
    }

    /// Drop the session entirely
    pub fn reset(&mut self) {
        self.session = DragSession::default();
    }

    /// Forget the owning pointer (e.g. when a nested scroll takes over)
    pub fn clear_active_pointer(&mut self) {
        self.session.active_pointer = None;
    }

    /// Watch an event that has not been claimed yet
    ///
    /// Returns true once the gesture should be claimed as a pull.
    pub fn intercept(&mut self, event: &TouchEvent) -> bool {
        match event {
            TouchEvent::Down { pointer } => {
                self.session = DragSession {
                    active_pointer: Some(pointer.id),
                    start_y: pointer.y,
                    is_dragging: false,
                };
            }
            TouchEvent::Move { .. } => {
                let Some(y) = self.active_y(event) else {
                    return false;
                };
                let delta = y - self.session.start_y;
                if delta > self.touch_slop && !self.session.is_dragging {
                    // Start the visible drag at the slop boundary instead of jumping
                    self.session.start_y += self.touch_slop;
                    self.session.is_dragging = true;
                    tracing::trace!("Drag recognized at y={:.1}", y);
                }
            }
            TouchEvent::PointerUp { pointer, pointers } => {
                self.on_secondary_pointer_up(pointer, pointers);
            }
            TouchEvent::Up { .. } | TouchEvent::Cancel => {
                self.reset();
            }
            TouchEvent::PointerDown { .. } => {}
        }
        self.session.is_dragging
    }

    /// Consume an event of a claimed gesture
    pub fn track(&mut self, event: &TouchEvent) -> DragUpdate {
        match event {
            TouchEvent::Down { pointer } => {
                self.session.active_pointer = Some(pointer.id);
                self.session.start_y = pointer.y;
                DragUpdate::Tracked
            }
            TouchEvent::Move { .. } => match self.active_y(event) {
                Some(y) => DragUpdate::Pull {
                    distance: (y - self.session.start_y) * self.damping_ratio,
                    motion_y: y,
                },
                None => DragUpdate::Ignored,
            },
            TouchEvent::PointerDown { pointer, .. } => {
                // The newest pointer takes over; rebase so the offset does not jump
                let Some(old_y) = self.active_y(event) else {
                    return DragUpdate::Ignored;
                };
                self.session.start_y += pointer.y - old_y;
                self.session.active_pointer = Some(pointer.id);
                DragUpdate::Tracked
            }
            TouchEvent::PointerUp { pointer, pointers } => {
                self.on_secondary_pointer_up(pointer, pointers);
                DragUpdate::Tracked
            }
            TouchEvent::Up { .. } | TouchEvent::Cancel => {
                self.reset();
                DragUpdate::Release
            }
        }
    }

    /// Move the reference point so that `motion_y` maps exactly to
    /// `max_pull_distance`, discarding any distance dragged beyond it
    pub fn rebase_over_pull(&mut self, motion_y: f32, max_pull_distance: f32) {
        self.session.start_y = motion_y - max_pull_distance / self.damping_ratio;
    }

    /// Y of the owning pointer in `event`, or None for a stale/unknown pointer
    fn active_y(&self, event: &TouchEvent) -> Option<f32> {
        let Some(id) = self.session.active_pointer else {
            tracing::warn!("Got touch move but don't have an active pointer id");
            return None;
        };
        let y = event.pointer_y(id);
        if y.is_none() {
            tracing::warn!("Got touch event with an invalid active pointer id {}", id);
        }
        y
    }

    fn on_secondary_pointer_up(&mut self, lifted: &TouchPointer, pointers: &[TouchPointer]) {
        if self.session.active_pointer != Some(lifted.id) {
            return;
        }
        match pointers.iter().find(|p| p.id != lifted.id) {
            Some(next) => {
                self.session.start_y += next.y - lifted.y;
                self.session.active_pointer = Some(next.id);
            }
            None => self.session.active_pointer = None,
        }
    }
}

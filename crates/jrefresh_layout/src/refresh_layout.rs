//! Pull-to-refresh container controller
//!
//! [`RefreshLayout`] composes the gesture tracker, the nested scroll
//! coordinator, the state machine and the offset animator behind the surface
//! a host view talks to. The host feeds it touch events, nested-scroll
//! callbacks and frame ticks, and reads back the state and the content
//! offset to position its header and content.
//!
//! Every entry point runs to completion on the caller's thread; callbacks
//! (header, refresh listener) fire synchronously from inside them.

use jrefresh_core::{
    PullEvent, PullState, RefreshConfig, ScrollAxes, ScrollDelta, TouchEvent, Transition,
};
use jrefresh_animation::{OffsetAnimator, SnapFrame, SnapTarget, StartReason};

use crate::geometry::PullGeometry;
use crate::gesture::{DragUpdate, GestureTracker};
use crate::header::HeaderHandler;
use crate::machine::PullStateMachine;
use crate::nested::{NestedScrollCoordinator, NestedScrollParent};

/// The scrollable content hosted below the header
pub trait ScrollableContent {
    /// Whether the content can still scroll toward its top
    fn can_scroll_up(&self) -> bool;
}

impl<F: Fn() -> bool> ScrollableContent for F {
    fn can_scroll_up(&self) -> bool {
        self()
    }
}

/// Vertical placement of the header and the content
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutFrame {
    /// Top edge of the header; it sits directly above the content
    pub header_top: f32,
    /// Top edge of the content, equal to the content offset
    pub content_top: f32,
}

/// Pull-to-refresh controller
pub struct RefreshLayout {
    config: RefreshConfig,
    enabled: bool,
    machine: PullStateMachine,
    tracker: GestureTracker,
    nested: NestedScrollCoordinator,
    animator: OffsetAnimator,
    content: Option<Box<dyn ScrollableContent>>,
    refresh_listener: Option<Box<dyn FnMut()>>,
    /// The current gesture was claimed by `dispatch_touch_event`
    intercepting: bool,
    /// `start_refreshing` arrived before the header was measured
    pending_start: bool,
    refresh_count: u32,
}

impl RefreshLayout {
    pub fn new() -> Self {
        Self::from_valid_config(RefreshConfig::default())
    }

    /// Build a layout for `config`, rejecting it if it fails validation
    pub fn with_config(config: RefreshConfig) -> jrefresh_core::Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: RefreshConfig) -> Self {
        Self {
            config,
            enabled: true,
            machine: PullStateMachine::new(),
            tracker: GestureTracker::new(config.touch_slop, config.damping_ratio),
            nested: NestedScrollCoordinator::new(config.damping_ratio),
            animator: OffsetAnimator::new(),
            content: None,
            refresh_listener: None,
            intercepting: false,
            pending_start: false,
            refresh_count: 0,
        }
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Install the header that receives lifecycle callbacks
    ///
    /// Pass an `Rc<RefCell<_>>` to keep a handle to it.
    pub fn set_header_handler<H: HeaderHandler + 'static>(&mut self, handler: H) {
        self.machine.set_header(Some(Box::new(handler)));
    }

    /// Called once every time a refresh starts
    ///
    /// The listener runs synchronously while the layout is still inside
    /// `tick` (or whichever call settled the trigger snap). It must not call
    /// back into the layout; record the request and call
    /// [`set_refresh_completed`](Self::set_refresh_completed) later, for
    /// example on the next frame. A host that keeps the layout in a
    /// `RefCell` would otherwise hit a `BorrowMutError`.
    pub fn set_on_refresh_listener<F: FnMut() + 'static>(&mut self, listener: F) {
        self.refresh_listener = Some(Box::new(listener));
    }

    pub fn set_scrollable_content<C: ScrollableContent + 'static>(&mut self, content: C) {
        self.content = Some(Box::new(content));
    }

    /// Outer parent that nested scrolling is chained to
    pub fn set_nested_scroll_parent<P: NestedScrollParent + 'static>(&mut self, parent: P) {
        self.nested.set_parent(Some(Box::new(parent)));
    }

    /// Report the measured header height
    ///
    /// Pull handling stays disabled until the first call.
    pub fn set_header_height(&mut self, height: f32) {
        let geometry = PullGeometry::new(height, &self.config);
        self.machine.set_geometry(geometry);

        if self.state().is_refreshing() && !self.animator.is_animating() {
            self.machine.offset_to(geometry.trigger_distance);
        }

        if self.pending_start {
            self.pending_start = false;
            tracing::debug!("Running deferred start_refreshing");
            self.start_refreshing();
        }
    }

    // =========================================================================
    // Programmatic refresh
    // =========================================================================

    /// Snap to the trigger position and start a refresh
    ///
    /// Deferred until the header height is known. Ignored while a refresh is
    /// already running or about to start.
    pub fn start_refreshing(&mut self) {
        if self.machine.geometry().is_none() {
            tracing::debug!("start_refreshing before layout, deferring");
            self.pending_start = true;
            return;
        }

        match self.animator.active_target() {
            Some(SnapTarget::Trigger) => return,
            None if self.state().is_refreshing() => return,
            _ => {}
        }
        self.animate_to_trigger();
    }

    /// Signal that the refresh finished; snaps the content back to rest
    ///
    /// Safe to call more than once: only the first call of a refresh cycle
    /// has an effect.
    pub fn set_refresh_completed(&mut self) {
        if self.pending_start {
            tracing::debug!("Refresh completed before it started, dropping deferred start");
            self.pending_start = false;
            return;
        }

        match self.animator.active_target() {
            Some(SnapTarget::Start(StartReason::RefreshCompleted)) => return,
            Some(SnapTarget::Trigger) => self.settle_in_flight_snap(),
            _ => {}
        }

        if !self.state().is_refreshing() {
            tracing::trace!("set_refresh_completed ignored in state {}", self.state());
            return;
        }
        self.animate_to_start(StartReason::RefreshCompleted);
    }

    // =========================================================================
    // Touch handling
    // =========================================================================

    /// Route one touch event the way a view hierarchy would
    ///
    /// Events are watched through [`on_intercept_touch_event`] until the
    /// gesture is claimed, then consumed by [`on_touch_event`] until it ends.
    /// Returns true when the layout consumed the event.
    ///
    /// [`on_intercept_touch_event`]: Self::on_intercept_touch_event
    /// [`on_touch_event`]: Self::on_touch_event
    pub fn dispatch_touch_event(&mut self, event: &TouchEvent) -> bool {
        if matches!(event, TouchEvent::Down { .. }) {
            self.intercepting = false;
        }

        let handled = if self.intercepting {
            self.on_touch_event(event)
        } else {
            self.intercepting = self.on_intercept_touch_event(event);
            self.intercepting
        };

        if event.is_terminal() {
            self.intercepting = false;
        }
        handled
    }

    /// Watch a gesture still flowing to the content
    ///
    /// Returns true once the gesture should be claimed as a pull.
    pub fn on_intercept_touch_event(&mut self, event: &TouchEvent) -> bool {
        if !self.accepts_touch() {
            return false;
        }
        self.tracker.intercept(event)
    }

    /// Consume an event of a claimed gesture
    pub fn on_touch_event(&mut self, event: &TouchEvent) -> bool {
        if !self.accepts_touch() {
            return false;
        }

        match self.tracker.track(event) {
            DragUpdate::Tracked => true,
            DragUpdate::Ignored => false,
            DragUpdate::Pull { distance, motion_y } => {
                if let Some(update) = self.machine.offset_to(distance) {
                    if update.over_pulled {
                        if let Some(geometry) = self.machine.geometry() {
                            let max = geometry.max_pull_distance;
                            self.tracker.rebase_over_pull(motion_y, max);
                        }
                    }
                }
                distance >= 0.0
            }
            DragUpdate::Release => {
                self.finish_pull();
                true
            }
        }
    }

    // =========================================================================
    // Nested scrolling
    // =========================================================================

    pub fn on_start_nested_scroll(&mut self, axes: ScrollAxes) -> bool {
        self.enabled
            && !self.state().is_refreshing()
            && !self.animator.is_animating()
            && self.nested.accepts(axes)
    }

    pub fn on_nested_scroll_accepted(&mut self, axes: ScrollAxes) {
        self.nested.accept(axes);
    }

    /// Returns the portion of `delta` consumed by the layout and its parent
    pub fn on_nested_pre_scroll(&mut self, delta: ScrollDelta) -> ScrollDelta {
        let limit = self.nested_pull_limit();
        let result = self.nested.pre_scroll(delta, limit);
        if let Some(pull) = result.pull {
            self.machine.offset_to(pull);
        }
        result.consumed
    }

    pub fn on_nested_scroll(&mut self, consumed: ScrollDelta, unconsumed: ScrollDelta) {
        let limit = self.nested_pull_limit();
        let can_scroll_up = self.can_child_scroll_up();
        if let Some(pull) = self.nested.scroll(consumed, unconsumed, can_scroll_up, limit) {
            self.machine.offset_to(pull);
        }
    }

    pub fn on_stop_nested_scroll(&mut self) {
        self.tracker.clear_active_pointer();
        let release = self.nested.stop();
        if release && !self.animator.is_animating() && !self.state().is_refreshing() {
            self.finish_pull();
        }
    }

    pub fn on_nested_pre_fling(&mut self, velocity_x: f32, velocity_y: f32) -> bool {
        self.nested.pre_fling(velocity_x, velocity_y)
    }

    pub fn on_nested_fling(&mut self, velocity_x: f32, velocity_y: f32, consumed: bool) -> bool {
        self.nested.fling(velocity_x, velocity_y, consumed)
    }

    // =========================================================================
    // Animation
    // =========================================================================

    /// Advance the in-flight snap by `dt_ms`
    ///
    /// Returns true when a frame was applied.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        match self.animator.tick(dt_ms) {
            Some(frame) => {
                self.apply_frame(frame);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> PullState {
        self.machine.state()
    }

    pub fn content_offset(&self) -> f32 {
        self.machine.offset()
    }

    pub fn geometry(&self) -> Option<&PullGeometry> {
        self.machine.geometry()
    }

    pub fn layout(&self) -> LayoutFrame {
        let offset = self.machine.offset();
        let header_height = self.geometry().map_or(0.0, |g| g.header_height);
        LayoutFrame {
            header_top: offset - header_height,
            content_top: offset,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    pub fn progressing_animation_count(&self) -> u32 {
        self.animator.progressing_count()
    }

    pub fn history(&self) -> &[Transition] {
        self.machine.history()
    }

    /// Number of refreshes started so far
    pub fn refresh_count(&self) -> u32 {
        self.refresh_count
    }

    pub fn is_nested_scroll_in_progress(&self) -> bool {
        self.nested.is_in_progress()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn can_child_scroll_up(&self) -> bool {
        self.content.as_ref().is_some_and(|c| c.can_scroll_up())
    }

    fn accepts_touch(&self) -> bool {
        self.enabled
            && !self.state().is_refreshing()
            && !self.can_child_scroll_up()
            && !self.nested.is_in_progress()
            && !self.animator.is_animating()
            && self.machine.geometry().is_some()
    }

    /// Max pull for nested updates, or None when the pull must not move
    fn nested_pull_limit(&self) -> Option<f32> {
        if self.animator.is_animating() || self.state().is_refreshing() {
            return None;
        }
        self.machine.geometry().map(|g| g.max_pull_distance)
    }

    fn finish_pull(&mut self) {
        if self.state() == PullState::ReadyToRefresh {
            self.animate_to_trigger();
        } else {
            self.animate_to_start(StartReason::PullFinished);
        }
    }

    fn animate_to_trigger(&mut self) {
        self.settle_in_flight_snap();
        let Some(trigger) = self.machine.geometry().map(|g| g.trigger_distance) else {
            return;
        };
        self.animator.start(
            SnapTarget::Trigger,
            self.machine.offset(),
            trigger,
            self.config.animate_to_trigger_ms,
        );
    }

    fn animate_to_start(&mut self, reason: StartReason) {
        self.settle_in_flight_snap();
        self.animator.start(
            SnapTarget::Start(reason),
            self.machine.offset(),
            0.0,
            self.config.animate_to_start_ms,
        );
    }

    /// Jump the in-flight snap to its end so its completion is observed
    fn settle_in_flight_snap(&mut self) {
        if let Some(frame) = self.animator.finish() {
            self.apply_frame(frame);
        }
    }

    fn apply_frame(&mut self, frame: SnapFrame) {
        self.machine.offset_to(frame.offset);
        if let Some(target) = frame.finished {
            self.on_snap_finished(target);
        }
    }

    fn on_snap_finished(&mut self, target: SnapTarget) {
        match target {
            SnapTarget::Trigger => {
                if self.machine.send(PullEvent::TriggerSnapFinished) == Some(PullState::Refreshing) {
                    self.refresh_count += 1;
                    if let Some(listener) = self.refresh_listener.as_mut() {
                        listener();
                    }
                }
            }
            SnapTarget::Start(StartReason::PullFinished) => {
                self.machine.send(PullEvent::StartSnapFinished);
            }
            SnapTarget::Start(StartReason::RefreshCompleted) => {
                self.machine.send(PullEvent::RefreshFinished);
            }
        }
    }
}

impl Default for RefreshLayout {
    fn default() -> Self {
        Self::new()
    }
}

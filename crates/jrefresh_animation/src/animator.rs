//! Offset animator
//!
//! Owns the single in-flight snap of a refresh container and reports, frame by
//! frame, the offset to apply and which snap (if any) just completed. The
//! caller decides what a completion means; the animator only keeps time and
//! the reentrancy counter.

use crate::easing::Easing;
use crate::snap::SnapAnimation;

/// Why a snap back to offset 0 was started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartReason {
    /// The user released a pull that had not committed to a refresh
    PullFinished,
    /// The refresh finished
    RefreshCompleted,
}

/// Which terminal position a snap is heading to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapTarget {
    /// The trigger position; completion enters `Refreshing`
    Trigger,
    /// Offset 0
    Start(StartReason),
}

/// One animation frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapFrame {
    /// Offset to apply for this frame
    pub offset: f32,
    /// Set on the frame that completes a snap
    pub finished: Option<SnapTarget>,
}

#[derive(Debug)]
struct ActiveSnap {
    target: SnapTarget,
    animation: SnapAnimation,
}

/// Drives the content offset toward a snap target
#[derive(Debug)]
pub struct OffsetAnimator {
    active: Option<ActiveSnap>,
    progressing_animation_count: u32,
    easing: Easing,
}

impl OffsetAnimator {
    pub fn new() -> Self {
        Self::with_easing(Easing::EaseOutQuad)
    }

    pub fn with_easing(easing: Easing) -> Self {
        Self {
            active: None,
            progressing_animation_count: 0,
            easing,
        }
    }

    /// Number of snaps started but not yet ended
    pub fn progressing_count(&self) -> u32 {
        self.progressing_animation_count
    }

    /// Check if a snap is in flight
    pub fn is_animating(&self) -> bool {
        self.progressing_animation_count > 0
    }

    /// Target of the in-flight snap
    pub fn active_target(&self) -> Option<SnapTarget> {
        self.active.as_ref().map(|snap| snap.target)
    }

    /// Start a snap from `from` to `to`
    ///
    /// Callers finish any in-flight snap first (see [`finish`](Self::finish))
    /// so its completion is observed. A snap still running here is dropped
    /// without a completion.
    pub fn start(&mut self, target: SnapTarget, from: f32, to: f32, duration_ms: u32) {
        if let Some(previous) = self.active.take() {
            tracing::warn!(
                "Dropping in-flight {:?} snap without completion",
                previous.target
            );
            self.end();
        }

        let mut animation = SnapAnimation::new(from, to, duration_ms, self.easing);
        animation.start();
        self.active = Some(ActiveSnap { target, animation });
        self.progressing_animation_count += 1;

        tracing::debug!(
            "Snap {:?} started: {:.1} -> {:.1} over {}ms",
            target,
            from,
            to,
            duration_ms
        );
    }

    /// Advance the in-flight snap by `dt_ms`
    ///
    /// Returns None when nothing is animating.
    pub fn tick(&mut self, dt_ms: f32) -> Option<SnapFrame> {
        let snap = self.active.as_mut()?;
        snap.animation.tick(dt_ms);
        let offset = snap.animation.value();

        if snap.animation.is_playing() {
            return Some(SnapFrame {
                offset,
                finished: None,
            });
        }

        let target = snap.target;
        self.active = None;
        self.end();
        tracing::debug!("Snap {:?} finished at {:.1}", target, offset);

        Some(SnapFrame {
            offset,
            finished: Some(target),
        })
    }

    /// Complete the in-flight snap immediately
    ///
    /// Returns its final frame, or None when nothing is animating.
    pub fn finish(&mut self) -> Option<SnapFrame> {
        let mut snap = self.active.take()?;
        snap.animation.finish();
        self.end();
        tracing::debug!("Snap {:?} finished early", snap.target);

        Some(SnapFrame {
            offset: snap.animation.value(),
            finished: Some(snap.target),
        })
    }

    fn end(&mut self) {
        self.progressing_animation_count = self.progressing_animation_count.saturating_sub(1);
    }
}

impl Default for OffsetAnimator {
    fn default() -> Self {
        Self::new()
    }
}

//! Timed snap animations
//!
//! A snap moves one value from `from` to `to` over a fixed duration.

use crate::easing::Easing;

/// A single-value timed transform
#[derive(Clone, Debug)]
pub struct SnapAnimation {
    from: f32,
    to: f32,
    duration_ms: u32,
    easing: Easing,
    current_time: f32,
    playing: bool,
}

impl SnapAnimation {
    pub fn new(from: f32, to: f32, duration_ms: u32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(1),
            easing,
            current_time: 0.0,
            playing: false,
        }
    }

    pub fn start(&mut self) {
        self.current_time = 0.0;
        self.playing = true;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn progress(&self) -> f32 {
        (self.current_time / self.duration_ms as f32).clamp(0.0, 1.0)
    }

    /// Get the current interpolated value
    pub fn value(&self) -> f32 {
        let progress = self.progress();
        if progress >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * self.easing.apply(progress)
    }

    /// Advance the animation by delta time (in milliseconds)
    pub fn tick(&mut self, dt_ms: f32) {
        if !self.playing {
            return;
        }

        self.current_time += dt_ms.max(0.0);

        if self.current_time >= self.duration_ms as f32 {
            self.current_time = self.duration_ms as f32;
            self.playing = false;
        }
    }

    /// Jump straight to the end value
    pub fn finish(&mut self) {
        self.current_time = self.duration_ms as f32;
        self.playing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaches_target_after_duration() {
        let mut snap = SnapAnimation::new(140.0, 0.0, 200, Easing::EaseOutQuad);
        snap.start();

        snap.tick(100.0);
        assert!(snap.is_playing());
        // Ease-out quad at t=0.5 covers 75% of the distance
        assert!((snap.value() - 35.0).abs() < 1e-3);

        snap.tick(100.0);
        assert!(!snap.is_playing());
        assert_eq!(snap.value(), 0.0);
    }

    #[test]
    fn test_tick_before_start_is_ignored() {
        let mut snap = SnapAnimation::new(0.0, 100.0, 200, Easing::Linear);
        snap.tick(150.0);
        assert_eq!(snap.progress(), 0.0);
        assert_eq!(snap.value(), 0.0);
    }

    #[test]
    fn test_overshooting_tick_clamps() {
        let mut snap = SnapAnimation::new(0.0, 100.0, 200, Easing::Linear);
        snap.start();
        snap.tick(10_000.0);
        assert_eq!(snap.progress(), 1.0);
        assert_eq!(snap.value(), 100.0);
    }

    #[test]
    fn test_finish_jumps_to_end() {
        let mut snap = SnapAnimation::new(20.0, 100.0, 200, Easing::EaseOutQuad);
        snap.start();
        snap.tick(16.0);
        snap.finish();
        assert!(!snap.is_playing());
        assert_eq!(snap.value(), 100.0);
    }
}

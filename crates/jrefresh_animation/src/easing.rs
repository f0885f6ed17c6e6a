//! Easing functions for snaps

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    Linear,
    /// Decelerating quadratic: `1 - (1 - t)^2`
    #[default]
    EaseOutQuad,
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_exact() {
        for easing in [Easing::Linear, Easing::EaseOutQuad] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
    }

    #[test]
    fn test_ease_out_quad_decelerates() {
        let e = Easing::EaseOutQuad;
        assert!((e.apply(0.5) - 0.75).abs() < 1e-6);
        // Covers more ground in the first half than in the second
        assert!(e.apply(0.5) - e.apply(0.0) > e.apply(1.0) - e.apply(0.5));
    }

    #[test]
    fn test_out_of_range_progress_is_clamped() {
        assert_eq!(Easing::EaseOutQuad.apply(-0.5), 0.0);
        assert_eq!(Easing::EaseOutQuad.apply(1.5), 1.0);
    }
}

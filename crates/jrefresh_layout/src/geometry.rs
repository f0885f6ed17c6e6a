//! Pull geometry derived from the measured header height

use jrefresh_core::RefreshConfig;

/// Gap kept between the largest reachable offset and `max_pull_distance`
pub const OFFSET_EPSILON: f32 = 1.0;

/// Distances that bound a pull
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PullGeometry {
    /// Natural height of the header
    pub header_height: f32,
    /// Offset at which releasing commits to a refresh
    pub trigger_distance: f32,
    /// Exclusive upper bound of the content offset
    pub max_pull_distance: f32,
}

impl PullGeometry {
    /// Derive geometry from a measured header height
    ///
    /// Negative or non-finite heights are treated as 0, so the trigger falls
    /// back to `config.min_trigger_distance`.
    pub fn new(header_height: f32, config: &RefreshConfig) -> Self {
        let header_height = if header_height.is_finite() {
            header_height.max(0.0)
        } else {
            0.0
        };
        let trigger_distance = header_height.max(config.min_trigger_distance);
        Self {
            header_height,
            trigger_distance,
            max_pull_distance: trigger_distance + config.max_over_pull,
        }
    }

    /// Largest offset the content may take
    pub fn max_offset(&self) -> f32 {
        (self.max_pull_distance - OFFSET_EPSILON).max(self.trigger_distance)
    }

    /// Clamp a pull distance into `[0, max_pull_distance)`
    pub fn clamp_offset(&self, distance: f32) -> f32 {
        if distance.is_nan() || distance <= 0.0 {
            0.0
        } else {
            distance.min(self.max_offset())
        }
    }

    /// Pull progress toward the trigger, as a whole percentage
    pub fn percent(&self, offset: f32) -> u8 {
        let ratio = (offset / self.trigger_distance).clamp(0.0, 1.0);
        (ratio * 100.0) as u8
    }
}

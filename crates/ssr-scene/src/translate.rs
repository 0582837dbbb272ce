//! Discrete/continuous translation for source parameters
//!
//! The plugin host automates normalized values in [0, 1] while the scene
//! model stores meters, linear gain and radians. These maps convert between
//! the two representations. All functions are pure; out-of-domain input is
//! clamped instead of rejected.

use std::f32::consts::PI;

/// Full circle in radians.
const TWO_PI: f32 = 2.0 * PI;

/// Map an x coordinate in meters to the normalized [0, 1] range.
///
/// `scene_range` is the number of meters covered by the full normalized
/// range, so the representable interval is [-scene_range/2, +scene_range/2].
pub fn x_position_discrete_to_continuous(position: f32, scene_range: f32) -> f32 {
    (0.5 / (scene_range / 2.0) * position + 0.5).clamp(0.0, 1.0)
}

/// Map a normalized [0, 1] value back to an x coordinate in meters.
pub fn x_position_continuous_to_discrete(relative: f32, scene_range: f32) -> f32 {
    (scene_range * relative - scene_range / 2.0).clamp(-scene_range / 2.0, scene_range / 2.0)
}

/// Map a y coordinate in meters to the normalized [0, 1] range.
///
/// The y axis points the opposite way on screen, so the discrete value is
/// negated before the linear map.
pub fn y_position_discrete_to_continuous(position: f32, scene_range: f32) -> f32 {
    x_position_discrete_to_continuous(-position, scene_range)
}

/// Map a normalized [0, 1] value back to a y coordinate in meters.
pub fn y_position_continuous_to_discrete(relative: f32, scene_range: f32) -> f32 {
    -x_position_continuous_to_discrete(relative, scene_range)
}

/// Map linear gain to the normalized [0, 1] range (4.0 linear is full scale).
pub fn gain_discrete_to_continuous(gain: f32) -> f32 {
    (gain / 4.0).clamp(0.0, 1.0)
}

/// Map a normalized gain back to linear amplitude.
///
/// No inverse clamp: continuous values outside [0, 1] map to gain outside
/// the normal range.
pub fn gain_continuous_to_discrete(relative: f32) -> f32 {
    relative * 4.0
}

/// Map an azimuth in radians to the normalized [0, 1] range.
pub fn orientation_discrete_to_continuous(azimuth: f32) -> f32 {
    (azimuth / TWO_PI).clamp(0.0, 1.0)
}

/// Map a normalized orientation back to radians, wrapped to [0, 2π).
pub fn orientation_continuous_to_discrete(relative: f32) -> f32 {
    (relative * TWO_PI) % TWO_PI
}

/// Map a flag to its normalized representation.
pub fn bool_discrete_to_continuous(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}

/// Map a normalized value back to a flag. Only exactly 1.0 reads as set.
pub fn bool_continuous_to_discrete(relative: f32) -> bool {
    relative == 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const RANGE: f32 = 20.0;

    #[test]
    fn x_position_hits_bounds_exactly() {
        assert_eq!(x_position_discrete_to_continuous(RANGE / 2.0, RANGE), 1.0);
        assert_eq!(x_position_discrete_to_continuous(-RANGE / 2.0, RANGE), 0.0);
        assert_eq!(x_position_discrete_to_continuous(0.0, RANGE), 0.5);
    }

    #[test]
    fn x_position_clamps_outside_the_scene() {
        assert_eq!(x_position_discrete_to_continuous(RANGE, RANGE), 1.0);
        assert_eq!(x_position_discrete_to_continuous(-RANGE, RANGE), 0.0);
        assert_eq!(x_position_continuous_to_discrete(1.5, RANGE), RANGE / 2.0);
        assert_eq!(x_position_continuous_to_discrete(-0.5, RANGE), -RANGE / 2.0);
    }

    #[test]
    fn x_position_round_trips_inside_the_scene() {
        for position in [-10.0, -3.75, 0.0, 1.25, 10.0] {
            let relative = x_position_discrete_to_continuous(position, RANGE);
            assert_relative_eq!(
                x_position_continuous_to_discrete(relative, RANGE),
                position,
                epsilon = 1e-4
            );
        }
    }

    #[test]
    fn y_position_is_inverted() {
        assert_eq!(y_position_discrete_to_continuous(RANGE / 2.0, RANGE), 0.0);
        assert_eq!(y_position_discrete_to_continuous(-RANGE / 2.0, RANGE), 1.0);
        let relative = y_position_discrete_to_continuous(3.0, RANGE);
        assert_relative_eq!(
            y_position_continuous_to_discrete(relative, RANGE),
            3.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn gain_clamps_towards_continuous_only() {
        assert_eq!(gain_discrete_to_continuous(2.0), 0.5);
        assert_eq!(gain_discrete_to_continuous(8.0), 1.0);
        assert_eq!(gain_discrete_to_continuous(-1.0), 0.0);
        // The inverse is unclamped.
        assert_eq!(gain_continuous_to_discrete(1.5), 6.0);
        assert_eq!(gain_continuous_to_discrete(-0.25), -1.0);
    }

    #[test]
    fn orientation_wraps_at_full_circle() {
        assert_eq!(orientation_continuous_to_discrete(0.0), 0.0);
        assert_eq!(orientation_continuous_to_discrete(1.0), 0.0);
        assert_relative_eq!(orientation_continuous_to_discrete(0.5), PI, epsilon = 1e-6);
        assert_relative_eq!(orientation_discrete_to_continuous(PI), 0.5, epsilon = 1e-6);
        assert_eq!(orientation_discrete_to_continuous(-1.0), 0.0);
    }

    #[test]
    fn flags_map_to_unit_values() {
        assert_eq!(bool_discrete_to_continuous(true), 1.0);
        assert_eq!(bool_discrete_to_continuous(false), 0.0);
        assert!(bool_continuous_to_discrete(1.0));
        assert!(!bool_continuous_to_discrete(0.99));
        assert!(!bool_continuous_to_discrete(0.0));
    }
}

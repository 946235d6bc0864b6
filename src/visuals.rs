//! Speed-based particle tint.
//!
//! Particle color is derived state: after every step each particle is
//! tinted from its base color toward a highlight as it speeds up. Nothing in
//! the solver reads it back.

use glam::Vec4;

/// How far toward white a particle at the speed cap is tinted.
pub const SPEED_HIGHLIGHT: f32 = 0.6;

/// Tint `base` by `speed` normalized against `speed_cap`.
///
/// The alpha channel keeps the base value. A non-positive cap leaves the
/// base color unchanged.
pub fn speed_tint(base: Vec4, speed: f32, speed_cap: f32) -> Vec4 {
    if speed_cap <= 0.0 || !speed.is_finite() {
        return base;
    }
    let t = (speed / speed_cap).clamp(0.0, 1.0) * SPEED_HIGHLIGHT;
    let highlight = Vec4::new(1.0, 1.0, 1.0, base.w);
    base.lerp(highlight, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: Vec4 = Vec4::new(0.2, 0.5, 0.95, 0.8);

    #[test]
    fn test_rest_keeps_base() {
        assert_eq!(speed_tint(BLUE, 0.0, 100.0), BLUE);
    }

    #[test]
    fn test_faster_is_brighter() {
        let slow = speed_tint(BLUE, 20.0, 100.0);
        let fast = speed_tint(BLUE, 80.0, 100.0);
        assert!(fast.x > slow.x);
        assert!(fast.y > slow.y);
        assert_eq!(fast.w, BLUE.w);
    }

    #[test]
    fn test_saturates_at_cap() {
        assert_eq!(speed_tint(BLUE, 100.0, 100.0), speed_tint(BLUE, 1e6, 100.0));
    }

    #[test]
    fn test_degenerate_inputs_keep_base() {
        assert_eq!(speed_tint(BLUE, f32::NAN, 100.0), BLUE);
        assert_eq!(speed_tint(BLUE, 10.0, 0.0), BLUE);
    }
}

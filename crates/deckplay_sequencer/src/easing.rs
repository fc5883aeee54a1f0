// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing curves for step progress.

use deckplay_model::Easing;

/// Curve evaluation utilities
pub struct Interpolation;

impl Interpolation {
    /// Cubic bezier interpolation
    pub fn bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        p0 * mt3 + 3.0 * p1 * mt2 * t + 3.0 * p2 * mt * t2 + p3 * t3
    }

    /// Derivative of [`Interpolation::bezier`] with respect to `t`
    fn bezier_slope(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
        let mt = 1.0 - t;
        3.0 * mt * mt * (p1 - p0) + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (p3 - p2)
    }

    /// CSS-style `cubic-bezier(x1, y1, x2, y2)` evaluated at horizontal position `x`
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
        let x1 = x1.clamp(0.0, 1.0);
        let x2 = x2.clamp(0.0, 1.0);

        // Newton iterations first, bisection when the slope flattens out
        let mut t = x;
        for _ in 0..8 {
            let err = Self::bezier(0.0, x1, x2, 1.0, t) - x;
            if err.abs() < 1e-5 {
                return Self::bezier(0.0, y1, y2, 1.0, t);
            }
            let slope = Self::bezier_slope(0.0, x1, x2, 1.0, t);
            if slope.abs() < 1e-6 {
                break;
            }
            t = (t - err / slope).clamp(0.0, 1.0);
        }

        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        t = x;
        for _ in 0..32 {
            let value = Self::bezier(0.0, x1, x2, 1.0, t);
            if (value - x).abs() < 1e-5 {
                break;
            }
            if value < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) * 0.5;
        }
        Self::bezier(0.0, y1, y2, 1.0, t)
    }
}

/// Apply an easing curve to linear progress `t` (clamped to `0.0..=1.0`)
pub fn ease(easing: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match easing {
        Easing::Linear => t,
        Easing::EaseIn => t * t,
        Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
        Easing::EaseInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
            }
        }
        Easing::CubicBezier([x1, y1, x2, y2]) => Interpolation::cubic_bezier(x1, y1, x2, y2, t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::CubicBezier([0.25, 0.1, 0.25, 1.0]),
        ] {
            assert!(ease(easing, 0.0).abs() < 1e-3, "{easing:?} at 0");
            assert!((ease(easing, 1.0) - 1.0).abs() < 1e-3, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_clamps_input() {
        assert_eq!(ease(Easing::Linear, -1.0), 0.0);
        assert_eq!(ease(Easing::Linear, 2.0), 1.0);
    }

    #[test]
    fn test_linear_bezier_matches_identity() {
        let v = Interpolation::cubic_bezier(0.0, 0.0, 1.0, 1.0, 0.3);
        assert!((v - 0.3).abs() < 1e-3);
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let a = ease(Easing::EaseInOut, 0.25);
        let b = ease(Easing::EaseInOut, 0.75);
        assert!((a + b - 1.0).abs() < 1e-5);
    }
}

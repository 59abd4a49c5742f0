//! Easing curves used by the tween engine.
//!
//! The power family follows the usual web-animation naming: `Power1` is
//! quadratic, `Power2` cubic and `Power3` quartic.

use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    PowerIn(u8),
    PowerOut(u8),
    PowerInOut(u8),
    SineInOut,
}

impl Ease {
    pub const POWER2_IN_OUT: Ease = Ease::PowerInOut(2);

    /// Evaluates the curve at progress `t`, clamped to `[0, 1]`.
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Ease::Linear => t,
            Ease::PowerIn(power) => power_in(t, power),
            Ease::PowerOut(power) => 1.0 - power_in(1.0 - t, power),
            Ease::PowerInOut(power) => {
                if t < 0.5 {
                    power_in(t * 2.0, power) * 0.5
                } else {
                    1.0 - power_in((1.0 - t) * 2.0, power) * 0.5
                }
            }
            Ease::SineInOut => -((PI * t).cos() - 1.0) * 0.5,
        }
    }
}

impl Default for Ease {
    fn default() -> Self {
        Self::POWER2_IN_OUT
    }
}

fn power_in(t: f32, power: u8) -> f32 {
    t.powi(power as i32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 8] = [
        Ease::Linear,
        Ease::PowerIn(1),
        Ease::PowerOut(1),
        Ease::PowerInOut(1),
        Ease::PowerIn(2),
        Ease::PowerOut(2),
        Ease::PowerInOut(2),
        Ease::SineInOut,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for ease in ALL {
            assert!(ease.evaluate(0.0).abs() < 1e-6, "{:?} at 0", ease);
            assert!((ease.evaluate(1.0) - 1.0).abs() < 1e-6, "{:?} at 1", ease);
        }
    }

    #[test]
    fn power2_is_cubic() {
        assert!((Ease::PowerIn(2).evaluate(0.5) - 0.125).abs() < 1e-6);
        assert!((Ease::PowerOut(2).evaluate(0.5) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn in_out_curves_are_symmetric() {
        for ease in [Ease::PowerInOut(1), Ease::PowerInOut(2), Ease::SineInOut] {
            assert!((ease.evaluate(0.5) - 0.5).abs() < 1e-6);
            for t in [0.1, 0.25, 0.4] {
                let sum = ease.evaluate(t) + ease.evaluate(1.0 - t);
                assert!((sum - 1.0).abs() < 1e-5, "{:?} at {}", ease, t);
            }
        }
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(Ease::POWER2_IN_OUT.evaluate(-1.0), 0.0);
        assert_eq!(Ease::POWER2_IN_OUT.evaluate(2.0), 1.0);
    }

    #[test]
    fn in_out_starts_slow() {
        let ease = Ease::POWER2_IN_OUT;
        assert!(ease.evaluate(0.1) < 0.1);
        assert!(ease.evaluate(0.9) > 0.9);
    }
}

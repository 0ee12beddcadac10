//! Easing curves
//!
//! Each curve maps linear progress in [0, 1] to eased progress with
//! `f(0) = 0` and `f(1) = 1`. Back and Bounce curves overshoot transiently.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Plain function pointer form of an easing curve
pub type EasingFn = fn(f32) -> f32;

const BACK_C1: f32 = 1.70158;
const BACK_C2: f32 = BACK_C1 * 1.525;
const BACK_C3: f32 = BACK_C1 + 1.0;

const BOUNCE_N1: f32 = 7.5625;
const BOUNCE_D1: f32 = 2.75;

pub fn linear(t: f32) -> f32 {
    t
}

pub fn in_quad(t: f32) -> f32 {
    t * t
}

pub fn out_quad(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

pub fn in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

pub fn in_cubic(t: f32) -> f32 {
    t * t * t
}

pub fn out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

pub fn in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

pub fn in_expo(t: f32) -> f32 {
    if t <= 0.0 {
        0.0
    } else {
        2f32.powf(10.0 * t - 10.0)
    }
}

pub fn out_expo(t: f32) -> f32 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2f32.powf(-10.0 * t)
    }
}

pub fn in_out_expo(t: f32) -> f32 {
    if t <= 0.0 {
        0.0
    } else if t >= 1.0 {
        1.0
    } else if t < 0.5 {
        2f32.powf(20.0 * t - 10.0) / 2.0
    } else {
        (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
    }
}

pub fn in_sine(t: f32) -> f32 {
    1.0 - (t * PI / 2.0).cos()
}

pub fn out_sine(t: f32) -> f32 {
    (t * PI / 2.0).sin()
}

pub fn in_out_sine(t: f32) -> f32 {
    -((PI * t).cos() - 1.0) / 2.0
}

pub fn in_back(t: f32) -> f32 {
    BACK_C3 * t * t * t - BACK_C1 * t * t
}

pub fn out_back(t: f32) -> f32 {
    let u = t - 1.0;
    1.0 + BACK_C3 * u * u * u + BACK_C1 * u * u
}

pub fn in_out_back(t: f32) -> f32 {
    if t < 0.5 {
        ((2.0 * t).powi(2) * ((BACK_C2 + 1.0) * 2.0 * t - BACK_C2)) / 2.0
    } else {
        ((2.0 * t - 2.0).powi(2) * ((BACK_C2 + 1.0) * (t * 2.0 - 2.0) + BACK_C2) + 2.0) / 2.0
    }
}

pub fn out_bounce(t: f32) -> f32 {
    if t < 1.0 / BOUNCE_D1 {
        BOUNCE_N1 * t * t
    } else if t < 2.0 / BOUNCE_D1 {
        let u = t - 1.5 / BOUNCE_D1;
        BOUNCE_N1 * u * u + 0.75
    } else if t < 2.5 / BOUNCE_D1 {
        let u = t - 2.25 / BOUNCE_D1;
        BOUNCE_N1 * u * u + 0.9375
    } else {
        let u = t - 2.625 / BOUNCE_D1;
        BOUNCE_N1 * u * u + 0.984375
    }
}

pub fn in_bounce(t: f32) -> f32 {
    1.0 - out_bounce(1.0 - t)
}

pub fn in_out_bounce(t: f32) -> f32 {
    if t < 0.5 {
        (1.0 - out_bounce(1.0 - 2.0 * t)) / 2.0
    } else {
        (1.0 + out_bounce(2.0 * t - 1.0)) / 2.0
    }
}

/// Clamp t to [0, 1]
#[inline]
pub fn clamp(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Linear interpolation (t is not clamped)
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate with an easing curve applied to the clamped t
#[inline]
pub fn lerp_with_easing(a: f32, b: f32, t: f32, ease: EasingFn) -> f32 {
    lerp(a, b, ease(clamp(t)))
}

/// Named easing curve, serializable for transition configs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InExpo,
    OutExpo,
    InOutExpo,
    InSine,
    OutSine,
    InOutSine,
    InBack,
    OutBack,
    InOutBack,
    InBounce,
    OutBounce,
    InOutBounce,
}

impl Easing {
    pub const ALL: [Easing; 19] = [
        Easing::Linear,
        Easing::InQuad,
        Easing::OutQuad,
        Easing::InOutQuad,
        Easing::InCubic,
        Easing::OutCubic,
        Easing::InOutCubic,
        Easing::InExpo,
        Easing::OutExpo,
        Easing::InOutExpo,
        Easing::InSine,
        Easing::OutSine,
        Easing::InOutSine,
        Easing::InBack,
        Easing::OutBack,
        Easing::InOutBack,
        Easing::InBounce,
        Easing::OutBounce,
        Easing::InOutBounce,
    ];

    pub fn func(self) -> EasingFn {
        match self {
            Easing::Linear => linear,
            Easing::InQuad => in_quad,
            Easing::OutQuad => out_quad,
            Easing::InOutQuad => in_out_quad,
            Easing::InCubic => in_cubic,
            Easing::OutCubic => out_cubic,
            Easing::InOutCubic => in_out_cubic,
            Easing::InExpo => in_expo,
            Easing::OutExpo => out_expo,
            Easing::InOutExpo => in_out_expo,
            Easing::InSine => in_sine,
            Easing::OutSine => out_sine,
            Easing::InOutSine => in_out_sine,
            Easing::InBack => in_back,
            Easing::OutBack => out_back,
            Easing::InOutBack => in_out_back,
            Easing::InBounce => in_bounce,
            Easing::OutBounce => out_bounce,
            Easing::InOutBounce => in_out_bounce,
        }
    }

    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        (self.func())(t)
    }

    /// Monotonic curves (everything except Back and Bounce)
    pub fn is_standard(self) -> bool {
        !matches!(
            self,
            Easing::InBack
                | Easing::OutBack
                | Easing::InOutBack
                | Easing::InBounce
                | Easing::OutBounce
                | Easing::InOutBounce
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_endpoints() {
        for easing in Easing::ALL {
            assert!(easing.apply(0.0).abs() < EPS, "{easing:?}(0) = {}", easing.apply(0.0));
            assert!((easing.apply(1.0) - 1.0).abs() < EPS, "{easing:?}(1) = {}", easing.apply(1.0));
        }
    }

    #[test]
    fn test_standard_curves_monotonic() {
        for easing in Easing::ALL.into_iter().filter(|e| e.is_standard()) {
            let mut prev = easing.apply(0.0);
            for i in 1..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!(v >= prev - 1e-6, "{easing:?} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn test_in_out_quad_symmetry() {
        assert!((in_out_quad(0.25) + in_out_quad(0.75) - 1.0).abs() < EPS);
        assert!((in_out_quad(0.5) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_back_overshoots() {
        assert!(in_back(0.2) < 0.0);
        assert!(out_back(0.8) > 1.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 100.0, 0.5), 50.0);
        assert_eq!(lerp_with_easing(0.0, 100.0, 1.5, linear), 100.0);
        assert_eq!(lerp_with_easing(0.0, 100.0, -0.5, linear), 0.0);
        assert_eq!(clamp(2.0), 1.0);
    }

    proptest! {
        #[test]
        fn prop_standard_curves_stay_in_unit_range(t in 0.0f32..=1.0) {
            for easing in Easing::ALL.into_iter().filter(|e| e.is_standard()) {
                let v = easing.apply(t);
                prop_assert!((-EPS..=1.0 + EPS).contains(&v));
            }
        }
    }
}

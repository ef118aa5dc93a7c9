#![forbid(unsafe_code)]

//! Time-based values for the floating representation and the wiggle cue.
//!
//! This is deliberately not an animation engine: a [`Tween`] is a pure
//! function of an [`Instant`], and an [`Oscillation`] is a pure function of
//! elapsed time. Hosts sample them when they draw.

use web_time::{Duration, Instant};

use crate::geometry::Point;

/// Easing function mapping normalized time `[0, 1]` to progress.
pub type EasingFn = fn(f64) -> f64;

/// Constant speed.
#[inline]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in-out.
#[inline]
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Values that can be interpolated.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    #[inline]
    fn lerp(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Point {
    #[inline]
    fn lerp(self, to: Self, t: f64) -> Self {
        Point::new(self.x.lerp(to.x, t), self.y.lerp(to.y, t))
    }
}

/// A transition from one value to another over a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    start: Instant,
    duration: Duration,
    easing: EasingFn,
}

impl<T: Lerp> Tween<T> {
    /// A tween already at rest on `value`.
    pub fn fixed(value: T, now: Instant) -> Self {
        Self {
            from: value,
            to: value,
            start: now,
            duration: Duration::ZERO,
            easing: linear,
        }
    }

    pub fn new(from: T, to: T, start: Instant, duration: Duration, easing: EasingFn) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            easing,
        }
    }

    /// Value at `now`. Instants before the start clamp to `from`.
    pub fn value_at(&self, now: Instant) -> T {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.start);
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        if t >= 1.0 {
            self.to
        } else {
            self.from.lerp(self.to, (self.easing)(t))
        }
    }

    /// Retarget from wherever the tween is at `now`.
    pub fn retarget(&mut self, to: T, now: Instant, duration: Duration, easing: EasingFn) {
        *self = Self::new(self.value_at(now), to, now, duration, easing);
    }

    /// Jump to `value` immediately.
    pub fn set(&mut self, value: T, now: Instant) {
        *self = Self::fixed(value, now);
    }

    /// Final value.
    #[inline]
    pub fn target(&self) -> T {
        self.to
    }

    #[inline]
    pub fn is_complete(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) >= self.duration
    }
}

/// A looping two-keyframe oscillation between `+amplitude` and `-amplitude`
/// that auto-reverses, so one full cycle takes `2 * half_period`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillation {
    pub amplitude: f64,
    /// Time to travel from `+amplitude` to `-amplitude`.
    pub half_period: Duration,
}

impl Oscillation {
    /// Sample at `elapsed` since the animation was applied.
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        let half = self.half_period.as_secs_f64();
        if half <= 0.0 {
            return self.amplitude;
        }
        let phase = (elapsed.as_secs_f64() / half) % 2.0;
        let t = if phase <= 1.0 { phase } else { 2.0 - phase };
        self.amplitude.lerp(-self.amplitude, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);
    const MS_400: Duration = Duration::from_millis(400);

    #[test]
    fn tween_clamps_and_completes() {
        let t0 = Instant::now();
        let tw = Tween::new(1.0, 2.0, t0, MS_400, linear);
        assert_eq!(tw.value_at(t0), 1.0);
        assert!((tw.value_at(t0 + Duration::from_millis(200)) - 1.5).abs() < 1e-9);
        assert_eq!(tw.value_at(t0 + MS_400), 2.0);
        assert_eq!(tw.value_at(t0 + Duration::from_secs(5)), 2.0);
        assert!(!tw.is_complete(t0 + MS_100));
        assert!(tw.is_complete(t0 + MS_400));
    }

    #[test]
    fn fixed_tween_is_complete() {
        let t0 = Instant::now();
        let tw = Tween::fixed(Point::new(3.0, 4.0), t0);
        assert!(tw.is_complete(t0));
        assert_eq!(tw.value_at(t0), Point::new(3.0, 4.0));
    }

    #[test]
    fn retarget_starts_from_current_value() {
        let t0 = Instant::now();
        let mut tw = Tween::new(0.0, 10.0, t0, MS_400, linear);
        let mid = t0 + Duration::from_millis(200);
        tw.retarget(0.0, mid, MS_400, linear);
        assert!((tw.value_at(mid) - 5.0).abs() < 1e-9);
        assert_eq!(tw.target(), 0.0);
    }

    #[test]
    fn point_tween_interpolates_both_axes() {
        let t0 = Instant::now();
        let tw = Tween::new(Point::ZERO, Point::new(10.0, -20.0), t0, MS_400, linear);
        let mid = tw.value_at(t0 + Duration::from_millis(200));
        assert!((mid.x - 5.0).abs() < 1e-9);
        assert!((mid.y + 10.0).abs() < 1e-9);
    }

    #[test]
    fn easing_functions_are_monotonic() {
        for easing in [linear as EasingFn, ease_in_out] {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = easing(i as f64 / 100.0);
                assert!(v >= prev - 1e-12);
                prev = v;
            }
            assert!((easing(1.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn oscillation_reverses() {
        let osc = Oscillation {
            amplitude: 2.0,
            half_period: MS_100,
        };
        assert_eq!(osc.value_at(Duration::ZERO), 2.0);
        assert!(osc.value_at(Duration::from_millis(50)).abs() < 1e-9);
        assert!((osc.value_at(MS_100) + 2.0).abs() < 1e-9);
        assert!((osc.value_at(Duration::from_millis(200)) - 2.0).abs() < 1e-9);
        for ms in 0..1000 {
            assert!(osc.value_at(Duration::from_millis(ms)).abs() <= 2.0 + 1e-9);
        }
    }
}

//! Property-based invariants for the geometry helpers and the deciders.
//!
//! 1. Distance is symmetric and non-negative
//! 2. NaN in either sample never scrolls or swaps
//! 3. Samples at least the jitter distance apart never scroll or swap
//! 4. A drag never swaps onto its own slot
//! 5. Planned scroll steps stay inside the content
//! 6. Wiggle oscillations stay within their amplitude

use dragsort_core::animation::Oscillation;
use dragsort_core::autoscroll::{StepPlan, plan_step};
use dragsort_core::{
    AutoScrollConfig, Point, Rect, ScrollAxis, ScrollDecision, ScrollDirection, Size, Slot,
    SwapConfig, SwapDecision, decide_scroll, decide_swap, distance,
};
use proptest::prelude::*;
use web_time::Duration;

// ── Strategies ──────────────────────────────────────────────────────────

fn coord() -> impl Strategy<Value = f64> {
    -2000.0f64..2000.0
}

fn point() -> impl Strategy<Value = Point> {
    (coord(), coord()).prop_map(|(x, y)| Point::new(x, y))
}

fn axis() -> impl Strategy<Value = ScrollAxis> {
    prop_oneof![Just(ScrollAxis::Vertical), Just(ScrollAxis::Horizontal)]
}

fn direction() -> impl Strategy<Value = ScrollDirection> {
    prop_oneof![
        Just(ScrollDirection::TowardOrigin),
        Just(ScrollDirection::AwayFromOrigin)
    ]
}

const FRAME: Rect = Rect::new(0.0, 0.0, 320.0, 400.0);
const CONTENT: Size = Size::new(320.0, 1000.0);

fn rows(p: Point) -> Option<Slot> {
    (p.y >= 0.0 && p.y < 1000.0).then(|| Slot::item(p.y as usize / 100))
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn distance_is_symmetric(a in point(), b in point()) {
        let d = distance(a, b);
        prop_assert!(d >= 0.0);
        prop_assert_eq!(d, distance(b, a));
        prop_assert_eq!(distance(a, a), 0.0);
    }

    #[test]
    fn nan_never_scrolls(p in point(), ax in axis(), nan_x in any::<bool>()) {
        let bad = if nan_x { Point::new(f64::NAN, p.y) } else { Point::new(p.x, f64::NAN) };
        let config = AutoScrollConfig::default();
        prop_assert_eq!(decide_scroll(bad, p, FRAME, CONTENT, ax, &config), ScrollDecision::Hold);
        prop_assert_eq!(decide_scroll(p, bad, FRAME, CONTENT, ax, &config), ScrollDecision::Hold);
    }

    #[test]
    fn nan_never_swaps(p in point(), dragged in 0usize..10) {
        let bad = Point::new(f64::NAN, f64::NAN);
        let d = decide_swap(bad, p, Slot::item(dragged), rows, |c| c, &SwapConfig::default());
        prop_assert_eq!(d, SwapDecision::Stay);
    }

    #[test]
    fn jumps_never_scroll(p in point(), angle in 0.0f64..std::f64::consts::TAU, extra in 0.0f64..500.0, ax in axis()) {
        let config = AutoScrollConfig::default();
        let len = config.jitter_distance + extra;
        let q = Point::new(p.x + len * angle.cos(), p.y + len * angle.sin());
        prop_assume!(distance(p, q) >= config.jitter_distance);
        prop_assert_eq!(decide_scroll(p, q, FRAME, CONTENT, ax, &config), ScrollDecision::Hold);
    }

    #[test]
    fn jumps_never_swap(p in point(), dx in 21.0f64..500.0, dragged in 0usize..10) {
        let q = Point::new(p.x + dx, p.y);
        let d = decide_swap(p, q, Slot::item(dragged), rows, |c| c, &SwapConfig::default());
        prop_assert_eq!(d, SwapDecision::Stay);
    }

    #[test]
    fn never_swaps_onto_itself(p in point(), offset in point(), redirect in 0usize..10) {
        let q = Point::new(p.x + offset.x / 1000.0, p.y + offset.y / 1000.0);
        let dragged = rows(q).unwrap_or_default();
        let d = decide_swap(p, q, dragged, rows, |_| Slot::item(redirect), &SwapConfig::default());
        if let SwapDecision::Swap(to) = d {
            prop_assert_ne!(to, dragged);
        }
    }

    #[test]
    fn steps_stay_in_bounds(
        start in 0u32..40,
        dir in direction(),
        ax in axis(),
        content in 0.0f64..4000.0,
        viewport in 1.0f64..1000.0,
    ) {
        let mut offset = ax.vector((f64::from(start) * 25.0).min((content - viewport).max(0.0)));
        for _ in 0..200 {
            match plan_step(dir, offset, content, viewport, ax, 50.0) {
                StepPlan::Stop => break,
                StepPlan::Advance { offset: next, shift } => {
                    prop_assert_eq!(ax.along(shift).abs(), 50.0);
                    prop_assert!(ax.along(next) >= 0.0);
                    prop_assert!(ax.along(next) <= content - viewport);
                    offset = next;
                }
            }
        }
    }

    #[test]
    fn oscillation_is_bounded(amp in 0.0f64..10.0, half_ms in 1u64..500, t_ms in 0u64..100_000) {
        let osc = Oscillation { amplitude: amp, half_period: Duration::from_millis(half_ms) };
        let v = osc.value_at(Duration::from_millis(t_ms));
        prop_assert!(v.abs() <= amp + 1e-9);
    }
}

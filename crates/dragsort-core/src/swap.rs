#![forbid(unsafe_code)]

//! Swap decisions: should the dragged item move to a new slot?

use crate::config::SwapConfig;
use crate::geometry::{Point, distance};
use crate::host::Slot;

/// Outcome of [`decide_swap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDecision {
    Stay,
    Swap(Slot),
}

impl SwapDecision {
    #[inline]
    #[must_use]
    pub fn should_swap(self) -> bool {
        matches!(self, Self::Swap(_))
    }

    #[inline]
    #[must_use]
    pub fn new_slot(self) -> Option<Slot> {
        match self {
            Self::Stay => None,
            Self::Swap(slot) => Some(slot),
        }
    }
}

/// Decide whether the item at `dragged` should move.
///
/// Both samples are in content space. `hit_test` maps a point to the slot
/// under it; `approve` lets the host redirect the candidate, and its answer
/// is final. An approved slot equal to `dragged` is treated as a veto.
/// `approve` is only called when a real candidate exists.
pub fn decide_swap(
    previous: Point,
    current: Point,
    dragged: Slot,
    hit_test: impl FnOnce(Point) -> Option<Slot>,
    approve: impl FnOnce(Slot) -> Slot,
    config: &SwapConfig,
) -> SwapDecision {
    if !previous.is_valid() || !current.is_valid() {
        return SwapDecision::Stay;
    }
    if distance(previous, current) >= config.jitter_distance {
        return SwapDecision::Stay;
    }
    let Some(candidate) = hit_test(current) else {
        return SwapDecision::Stay;
    };
    if candidate == dragged {
        return SwapDecision::Stay;
    }

    let target = approve(candidate);
    if target == dragged {
        SwapDecision::Stay
    } else {
        SwapDecision::Swap(target)
    }
}

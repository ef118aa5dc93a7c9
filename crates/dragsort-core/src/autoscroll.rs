#![forbid(unsafe_code)]

//! Auto-scroll loop bookkeeping.
//!
//! The loop itself is driven by [`DragSession`](crate::session::DragSession)
//! timers: each step animates the content by one increment, and the step's
//! completion re-runs [`decide_scroll`](crate::scroll::decide_scroll) to decide
//! whether to continue. This module holds the per-session flag and the pure
//! step planning.
//!
//! # Invariants
//!
//! 1. At most one loop is active: [`AutoScroller::begin`] refuses while active.
//! 2. Every terminating path goes through [`AutoScroller::finish`].
//! 3. A step never moves the offset outside `[0, content_extent - viewport_extent]`.

use crate::geometry::Point;
use crate::scroll::{ScrollAxis, ScrollDirection};

/// Result of planning one auto-scroll step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepPlan {
    /// The next increment would leave the content; the loop ends.
    Stop,
    /// Move to `offset`; content and floating view shift by `shift`.
    Advance { offset: Point, shift: Point },
}

/// Plan the next step from `offset`.
///
/// `increment` is the unsigned step length; `direction` picks its sign.
pub fn plan_step(
    direction: ScrollDirection,
    offset: Point,
    content_extent: f64,
    viewport_extent: f64,
    axis: ScrollAxis,
    increment: f64,
) -> StepPlan {
    let shift = axis.vector(direction.signed(increment));
    let next = offset + shift;
    let along = axis.along(next);
    let max = content_extent - viewport_extent;
    if along < 0.0 || along > max {
        StepPlan::Stop
    } else {
        StepPlan::Advance {
            offset: next,
            shift,
        }
    }
}

/// Tracks whether an auto-scroll loop is running for the current drag.
#[derive(Debug, Clone, Default)]
pub struct AutoScroller {
    active: bool,
    steps: u32,
}

impl AutoScroller {
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Steps taken by the current (or last) loop.
    #[inline]
    #[must_use]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Arm a new loop. Returns `false` if one is already running.
    pub fn begin(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.steps = 0;
        true
    }

    /// Record a committed step.
    pub fn record_step(&mut self) {
        self.steps = self.steps.saturating_add(1);
    }

    /// End the loop.
    pub fn finish(&mut self) {
        self.active = false;
    }
}

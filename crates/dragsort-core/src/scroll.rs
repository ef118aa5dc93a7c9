#![forbid(unsafe_code)]

//! Edge-triggered auto-scroll decisions.
//!
//! [`decide_scroll`] compares two touch samples against fixed-thickness hot
//! zones at the leading and trailing edges of the container frame.
//!
//! # Invariants
//!
//! 1. A NaN coordinate in either sample always yields [`ScrollDecision::Hold`].
//! 2. Samples at least `jitter_distance` apart always yield `Hold`; a large
//!    jump between ticks is treated as noise.
//! 3. The trailing zone wins if the zones overlap (frames thinner than two
//!    hot zones).

use crate::config::AutoScrollConfig;
use crate::geometry::{Point, Rect, Size, distance};

/// The axis a container scrolls along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAxis {
    #[default]
    Vertical,
    Horizontal,
}

impl ScrollAxis {
    /// Component of `p` along this axis.
    #[inline]
    pub fn along(self, p: Point) -> f64 {
        match self {
            Self::Vertical => p.y,
            Self::Horizontal => p.x,
        }
    }

    /// Component of `s` along this axis.
    #[inline]
    pub fn extent(self, s: Size) -> f64 {
        match self {
            Self::Vertical => s.height,
            Self::Horizontal => s.width,
        }
    }

    /// A displacement of `amount` along this axis.
    #[inline]
    pub fn vector(self, amount: f64) -> Point {
        match self {
            Self::Vertical => Point::new(0.0, amount),
            Self::Horizontal => Point::new(amount, 0.0),
        }
    }
}

/// Which way content should move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Toward offset 0 (up / left).
    TowardOrigin,
    /// Toward the end of content (down / right).
    AwayFromOrigin,
}

impl ScrollDirection {
    /// Signed step for a positive `increment`.
    #[inline]
    pub fn signed(self, increment: f64) -> f64 {
        match self {
            Self::TowardOrigin => -increment,
            Self::AwayFromOrigin => increment,
        }
    }
}

/// Outcome of [`decide_scroll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDecision {
    Hold,
    Scroll(ScrollDirection),
}

impl ScrollDecision {
    #[inline]
    #[must_use]
    pub fn should_scroll(self) -> bool {
        matches!(self, Self::Scroll(_))
    }

    #[inline]
    #[must_use]
    pub fn direction(self) -> Option<ScrollDirection> {
        match self {
            Self::Hold => None,
            Self::Scroll(dir) => Some(dir),
        }
    }
}

/// The two hot zones of `frame` for `axis`, as `(leading, trailing)`.
pub fn hot_zones(frame: Rect, axis: ScrollAxis, thickness: f64) -> (Rect, Rect) {
    match axis {
        ScrollAxis::Vertical => (
            Rect::new(frame.x, frame.y, frame.width, thickness),
            Rect::new(frame.x, frame.bottom() - thickness, frame.width, thickness),
        ),
        ScrollAxis::Horizontal => (
            Rect::new(frame.x, frame.y, thickness, frame.height),
            Rect::new(frame.right() - thickness, frame.y, thickness, frame.height),
        ),
    }
}

/// Decide whether the container should start (or keep) auto-scrolling.
///
/// `previous` and `current` are in the same space as `frame` (the
/// container's parent). `content_size` is part of the contract but the zone
/// test does not depend on it; bounds are enforced by the scroller.
pub fn decide_scroll(
    previous: Point,
    current: Point,
    frame: Rect,
    _content_size: Size,
    axis: ScrollAxis,
    config: &AutoScrollConfig,
) -> ScrollDecision {
    if !previous.is_valid() || !current.is_valid() {
        return ScrollDecision::Hold;
    }
    if distance(previous, current) >= config.jitter_distance {
        return ScrollDecision::Hold;
    }

    let (leading, trailing) = hot_zones(frame, axis, config.hot_zone_thickness);
    if trailing.contains(current) {
        ScrollDecision::Scroll(ScrollDirection::AwayFromOrigin)
    } else if leading.contains(current) {
        ScrollDecision::Scroll(ScrollDirection::TowardOrigin)
    } else {
        ScrollDecision::Hold
    }
}

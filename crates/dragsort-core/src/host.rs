#![forbid(unsafe_code)]

//! Collaborator interfaces.
//!
//! The core never owns the container, the backing collection, or the
//! delegate. They are borrowed for the duration of each call into
//! [`DragSession`](crate::session::DragSession) or
//! [`WiggleController`](crate::wiggle::WiggleController).
//!
//! # Coordinate spaces
//!
//! - **Viewport space**: the container's parent. [`CollectionHost::frame`]
//!   and every drag event position live here.
//! - **Content space**: the scrollable content. Hit testing, cell centres,
//!   and the floating representation live here.
//!
//! `content = viewport - frame.origin + content_offset`.

use crate::geometry::{Point, Rect, Size};
use crate::scroll::ScrollAxis;
use crate::wiggle::WiggleAnimation;

/// An item's place in the ordered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Slot {
    pub section: usize,
    pub item: usize,
}

impl Slot {
    #[inline]
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }

    /// A slot in section 0.
    #[inline]
    pub const fn item(item: usize) -> Self {
        Self::new(0, item)
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.section, self.item)
    }
}

/// Work that produces a snapshot of a cell, run off the owner thread.
pub type SnapshotJob<S> = Box<dyn FnOnce() -> S + Send + 'static>;

/// The scrollable container and its backing collection.
pub trait CollectionHost {
    /// Owned image type produced by [`snapshot_job`](Self::snapshot_job).
    type Snapshot: Send + 'static;

    /// Slot of the cell under `point` (content space).
    fn hit_test(&self, point: Point) -> Option<Slot>;

    /// Centre of the cell at `slot` (content space), if it is laid out.
    fn cell_center(&self, slot: Slot) -> Option<Point>;

    /// Size of the cell at `slot`, if it is laid out. Read once at lift
    /// and reported through [`Appearance::size`](crate::session::Appearance::size).
    fn cell_bounds(&self, slot: Slot) -> Option<Size>;

    /// Move the item at `from` to `to` in the backing collection.
    fn move_item(&mut self, from: Slot, to: Slot);

    /// Show or hide the cell at `slot`. Returns `false` if no cell is
    /// currently realised for it.
    ///
    /// The session unhides the old slot before every
    /// [`move_item`](Self::move_item) and hides the new one after it, so
    /// tracking hidden state per slot or per item both work.
    fn set_cell_hidden(&mut self, slot: Slot, hidden: bool) -> bool;

    fn content_offset(&self) -> Point;

    /// Move the content. `animated` asks for a linear animation lasting the
    /// configured scroll step duration.
    fn set_content_offset(&mut self, offset: Point, animated: bool);

    fn content_size(&self) -> Size;

    /// Container frame in viewport space.
    fn frame(&self) -> Rect;

    fn scroll_axis(&self) -> ScrollAxis;

    /// Capture whatever is needed on the owner thread and return the work
    /// that rasterizes it. `None` if the cell is not available.
    fn snapshot_job(&self, slot: Slot) -> Option<SnapshotJob<Self::Snapshot>>;

    /// Content length along the scroll axis.
    fn content_extent(&self) -> f64 {
        self.scroll_axis().extent(self.content_size())
    }

    /// Visible length along the scroll axis.
    fn viewport_extent(&self) -> f64 {
        self.scroll_axis().extent(self.frame().size())
    }

    /// Convert a viewport-space point into content space.
    fn to_content(&self, viewport: Point) -> Point {
        viewport - self.frame().origin() + self.content_offset()
    }

    /// Convert a content-space point into viewport space.
    fn to_viewport(&self, content: Point) -> Point {
        content - self.content_offset() + self.frame().origin()
    }
}

/// Host policy and notifications for a drag.
pub trait ReorderDelegate {
    /// Final say on where a swap lands. Return `candidate` to accept it,
    /// another slot to redirect, or the dragged slot to veto.
    fn approve_target(&mut self, candidate: Slot) -> Slot;

    /// A swap was committed.
    fn on_moved(&mut self, from: Slot, to: Slot);

    /// Gate for starting a drag on `slot`.
    fn should_begin_drag(&mut self, _slot: Slot) -> bool {
        true
    }

    /// The drag finished settling on `slot`.
    fn on_drag_ended(&mut self, _slot: Slot) {}
}

/// Delegate used when the host has none: approves every candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelegate;

impl ReorderDelegate for NoDelegate {
    fn approve_target(&mut self, candidate: Slot) -> Slot {
        candidate
    }

    fn on_moved(&mut self, _from: Slot, _to: Slot) {}
}

/// Cells that can carry the wiggle cue.
pub trait WiggleHost {
    /// Slots of the cells currently on screen.
    fn visible_slots(&self) -> Vec<Slot>;

    /// Start (or restart) the looping wiggle on `slot`.
    fn apply_wiggle(&mut self, slot: Slot, animation: WiggleAnimation);

    /// Remove any wiggle from `slot`.
    fn remove_wiggle(&mut self, slot: Slot);
}

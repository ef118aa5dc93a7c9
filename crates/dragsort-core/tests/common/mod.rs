//! Shared fixtures: a single-column list host and a recording delegate.

#![allow(dead_code)]

use std::collections::BTreeSet;

use dragsort_core::{
    CollectionHost, DragEvent, DragSession, NoDelegate, Point, Rect, ReorderConfig,
    ReorderDelegate, ScrollAxis, SessionState, Size, Slot, SnapshotJob,
};
use web_time::{Duration, Instant};

pub const ROW: f64 = 100.0;
pub const WIDTH: f64 = 320.0;
pub const WAIT: Duration = Duration::from_secs(5);

/// A column of `ROW`-tall cells. Items are ids; hidden state follows the id,
/// the way a realised cell keeps its hidden flag when the collection moves it.
#[derive(Debug)]
pub struct ListHost {
    pub items: Vec<u32>,
    pub frame: Rect,
    pub offset: Point,
    pub offsets: Vec<f64>,
    pub moves: Vec<(Slot, Slot)>,
    pub hidden: BTreeSet<u32>,
}

impl ListHost {
    /// `len` items in a viewport `viewport_height` tall at the parent origin.
    pub fn new(len: u32, viewport_height: f64) -> Self {
        Self {
            items: (0..len).collect(),
            frame: Rect::new(0.0, 0.0, WIDTH, viewport_height),
            offset: Point::ZERO,
            offsets: Vec::new(),
            moves: Vec::new(),
            hidden: BTreeSet::new(),
        }
    }

    pub fn scrolled_to(mut self, y: f64) -> Self {
        self.offset = Point::new(0.0, y);
        self
    }

    pub fn is_hidden(&self, slot: Slot) -> bool {
        self.items
            .get(slot.item)
            .is_some_and(|id| self.hidden.contains(id))
    }
}

impl CollectionHost for ListHost {
    type Snapshot = u32;

    fn hit_test(&self, p: Point) -> Option<Slot> {
        let content = self.items.len() as f64 * ROW;
        if p.x < 0.0 || p.x >= WIDTH || p.y < 0.0 || p.y >= content {
            return None;
        }
        Some(Slot::item((p.y / ROW) as usize))
    }

    fn cell_center(&self, slot: Slot) -> Option<Point> {
        (slot.section == 0 && slot.item < self.items.len())
            .then(|| Point::new(WIDTH / 2.0, slot.item as f64 * ROW + ROW / 2.0))
    }

    fn cell_bounds(&self, slot: Slot) -> Option<Size> {
        self.cell_center(slot).map(|_| Size::new(WIDTH, ROW))
    }

    fn move_item(&mut self, from: Slot, to: Slot) {
        let item = self.items.remove(from.item);
        self.items.insert(to.item, item);
        self.moves.push((from, to));
    }

    fn set_cell_hidden(&mut self, slot: Slot, hidden: bool) -> bool {
        let Some(&id) = self.items.get(slot.item) else {
            return false;
        };
        if hidden {
            self.hidden.insert(id);
        } else {
            self.hidden.remove(&id);
        }
        true
    }

    fn content_offset(&self) -> Point {
        self.offset
    }

    fn set_content_offset(&mut self, offset: Point, _animated: bool) {
        self.offset = offset;
        self.offsets.push(offset.y);
    }

    fn content_size(&self) -> Size {
        Size::new(WIDTH, self.items.len() as f64 * ROW)
    }

    fn frame(&self) -> Rect {
        self.frame
    }

    fn scroll_axis(&self) -> ScrollAxis {
        ScrollAxis::Vertical
    }

    fn snapshot_job(&self, slot: Slot) -> Option<SnapshotJob<u32>> {
        let id = *self.items.get(slot.item)?;
        Some(Box::new(move || id))
    }
}

/// Delegate that records every call.
#[derive(Debug, Default)]
pub struct Recorder {
    pub candidates: Vec<Slot>,
    pub moved: Vec<(Slot, Slot)>,
    pub ended: Vec<Slot>,
    /// Answer every approval with this slot.
    pub redirect_to: Option<Slot>,
    /// Refuse to start drags on these slots.
    pub locked: Vec<Slot>,
}

impl ReorderDelegate for Recorder {
    fn approve_target(&mut self, candidate: Slot) -> Slot {
        self.candidates.push(candidate);
        self.redirect_to.unwrap_or(candidate)
    }

    fn on_moved(&mut self, from: Slot, to: Slot) {
        self.moved.push((from, to));
    }

    fn should_begin_drag(&mut self, slot: Slot) -> bool {
        !self.locked.contains(&slot)
    }

    fn on_drag_ended(&mut self, slot: Slot) {
        self.ended.push(slot);
    }
}

pub fn session() -> DragSession<u32> {
    DragSession::new(ReorderConfig::default())
}

/// Begin at `(x, y)` and block until the cell is lifted.
pub fn lift(
    session: &mut DragSession<u32>,
    host: &mut ListHost,
    delegate: &mut dyn ReorderDelegate,
    at: Point,
    now: Instant,
) {
    session.handle(DragEvent::begin(at.x, at.y), now, host, delegate);
    assert_eq!(session.state(), SessionState::Armed);
    assert!(session.wait_for_lift(WAIT), "snapshot worker never answered");
    session.poll(now, host, delegate);
    assert_eq!(session.state(), SessionState::Dragging);
}

pub fn lift_plain(session: &mut DragSession<u32>, host: &mut ListHost, at: Point, now: Instant) {
    lift(session, host, &mut NoDelegate, at, now);
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

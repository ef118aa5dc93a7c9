#![forbid(unsafe_code)]

//! Drag session: the reorder state machine.
//!
//! [`DragSession`] consumes [`DragEvent`]s (position + phase) and periodic
//! [`poll`](DragSession::poll) calls, and drives the host collection through
//! [`CollectionHost`] and [`ReorderDelegate`].
//!
//! # State Machine
//!
//! ```text
//! Idle --Begin--> Armed --snapshot ready--> Dragging --End/Cancel--> Settling --settled--> Idle
//!                   \--End/Cancel / cell gone-------------------------------------------> Idle
//! ```
//!
//! - **Armed**: the cell snapshot is being rasterized on a worker thread.
//! - **Dragging**: the floating view follows the touch; each Change schedules
//!   one scroll check and one swap check a tick later (at most one pending of
//!   each kind).
//! - **Settling**: the floating view animates home; nothing else runs.
//!
//! # Invariants
//!
//! 1. Every phase transition bumps the epoch. Timers carry the epoch they
//!    were scheduled in and are dropped if it no longer matches, so an
//!    auto-scroll loop never outlives its drag.
//! 2. At most one auto-scroll loop runs per drag.
//! 3. A check re-reads the latest touch when it fires; only `previous` is
//!    captured at scheduling time.
//! 4. `on_drag_ended` fires exactly once per drag that reached Dragging, and
//!    never for a drag that was vetoed or ended while Armed.
//!
//! # Failure Modes
//!
//! - Missing cell lookups abort only the step that needed them.
//! - NaN positions are ignored.
//! - Begin while not Idle is ignored; End while Idle or Settling is a no-op.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use web_time::{Duration, Instant};

use crate::animation::{Tween, ease_in_out, linear};
use crate::autoscroll::{AutoScroller, StepPlan, plan_step};
use crate::config::{LiftConfig, ReorderConfig};
use crate::geometry::{Point, Size};
use crate::host::{CollectionHost, ReorderDelegate, Slot};
use crate::scroll::{ScrollDecision, ScrollDirection, decide_scroll};
use crate::swap::{SwapDecision, decide_swap};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Gesture phase reported by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Begin,
    Change,
    End,
    Cancel,
}

/// One input sample. `position` is in viewport space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEvent {
    pub phase: DragPhase,
    pub position: Point,
}

impl DragEvent {
    #[inline]
    pub const fn new(phase: DragPhase, position: Point) -> Self {
        Self { phase, position }
    }

    #[inline]
    pub const fn begin(x: f64, y: f64) -> Self {
        Self::new(DragPhase::Begin, Point::new(x, y))
    }

    #[inline]
    pub const fn change(x: f64, y: f64) -> Self {
        Self::new(DragPhase::Change, Point::new(x, y))
    }

    #[inline]
    pub const fn end(x: f64, y: f64) -> Self {
        Self::new(DragPhase::End, Point::new(x, y))
    }

    #[inline]
    pub const fn cancel(x: f64, y: f64) -> Self {
        Self::new(DragPhase::Cancel, Point::new(x, y))
    }
}

/// Coarse session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Armed,
    Dragging,
    Settling,
}

// ---------------------------------------------------------------------------
// Floating representation
// ---------------------------------------------------------------------------

/// How the floating view should be drawn at an instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    /// Centre in content space.
    pub center: Point,
    /// Unscaled size of the lifted cell.
    pub size: Size,
    pub scale: f64,
    pub alpha: f64,
}

/// The lifted stand-in for the dragged cell. Owned by the session and
/// dropped when the drag settles.
pub struct FloatingView<S> {
    snapshot: S,
    size: Size,
    center: Tween<Point>,
    scale: Tween<f64>,
    alpha: Tween<f64>,
}

impl<S> std::fmt::Debug for FloatingView<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloatingView")
            .field("size", &self.size)
            .field("center", &self.center.target())
            .field("scale", &self.scale.target())
            .field("alpha", &self.alpha.target())
            .finish_non_exhaustive()
    }
}

impl<S> FloatingView<S> {
    fn lifted(snapshot: S, size: Size, center: Point, now: Instant, lift: &LiftConfig) -> Self {
        Self {
            snapshot,
            size,
            center: Tween::fixed(center, now),
            scale: Tween::new(1.0, lift.scale, now, lift.lift_duration, ease_in_out),
            alpha: Tween::new(1.0, lift.opacity, now, lift.lift_duration, ease_in_out),
        }
    }

    fn settle(&mut self, home: Option<Point>, now: Instant, duration: Duration) {
        self.scale.retarget(1.0, now, duration, ease_in_out);
        self.alpha.retarget(1.0, now, duration, ease_in_out);
        if let Some(home) = home {
            self.center.retarget(home, now, duration, ease_in_out);
        }
    }

    /// The rasterized cell.
    #[inline]
    pub fn snapshot(&self) -> &S {
        &self.snapshot
    }

    /// Sample centre, scale, and opacity at `now`.
    pub fn appearance(&self, now: Instant) -> Appearance {
        Appearance {
            center: self.center.value_at(now),
            size: self.size,
            scale: self.scale.value_at(now),
            alpha: self.alpha.value_at(now),
        }
    }

    /// Size of the cell at lift time, before scaling.
    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Where the centre is heading (or resting).
    #[inline]
    pub fn center_target(&self) -> Point {
        self.center.target()
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        !(self.center.is_complete(now) && self.scale.is_complete(now) && self.alpha.is_complete(now))
    }
}

// ---------------------------------------------------------------------------
// Timers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum TimerKind {
    /// `previous` is the content-space touch at scheduling time.
    ScrollCheck { previous: Point },
    SwapCheck { previous: Point },
    ScrollStepDone { touch_at_start: Point, shift: Point },
    ScrollGrace,
    Settled,
}

#[derive(Debug)]
struct Timer {
    due: Instant,
    seq: u64,
    epoch: u64,
    kind: TimerKind,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    // Reversed: BinaryHeap is a max-heap and we want the earliest first,
    // ties broken by scheduling order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

struct Armed<S> {
    slot: Slot,
    /// Latest viewport-space touch.
    touch: Point,
    /// Content-space touch at Begin.
    touch_at_begin: Point,
    rx: Receiver<S>,
    ready: Option<S>,
}

struct Drag<S> {
    slot: Slot,
    floating: FloatingView<S>,
    touch_offset: Point,
    /// Latest viewport-space touch.
    touch: Point,
    scroller: AutoScroller,
    scroll_check_pending: bool,
    swap_check_pending: bool,
}

enum Phase<S> {
    Idle,
    Armed(Armed<S>),
    Dragging(Drag<S>),
    Settling { slot: Slot, floating: FloatingView<S> },
}

// ---------------------------------------------------------------------------
// DragSession
// ---------------------------------------------------------------------------

/// Reorder state machine for one container.
///
/// Call [`handle`](Self::handle) for each input sample and
/// [`poll`](Self::poll) on every frame or tick; timers only fire from these
/// two entry points, and the lift only from `poll`. [`next_deadline`](Self::next_deadline) tells the host
/// when the next poll is needed.
pub struct DragSession<S> {
    config: ReorderConfig,
    phase: Phase<S>,
    epoch: u64,
    seq: u64,
    timers: BinaryHeap<Timer>,
    enabled: bool,
}

impl<S> std::fmt::Debug for DragSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragSession")
            .field("state", &self.state())
            .field("slot", &self.dragged_slot())
            .field("epoch", &self.epoch)
            .field("timers", &self.timers.len())
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl<S> DragSession<S> {
    #[must_use]
    pub fn new(config: ReorderConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            epoch: 0,
            seq: 0,
            timers: BinaryHeap::new(),
            enabled: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ReorderConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect for timers scheduled later.
    pub fn set_config(&mut self, config: ReorderConfig) {
        self.config = config;
    }

    /// Allow or refuse new drags. A drag already in progress is unaffected.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::Idle => SessionState::Idle,
            Phase::Armed(_) => SessionState::Armed,
            Phase::Dragging(_) => SessionState::Dragging,
            Phase::Settling { .. } => SessionState::Settling,
        }
    }

    /// Slot of the lifted item, if any.
    #[must_use]
    pub fn dragged_slot(&self) -> Option<Slot> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Armed(armed) => Some(armed.slot),
            Phase::Dragging(drag) => Some(drag.slot),
            Phase::Settling { slot, .. } => Some(*slot),
        }
    }

    /// The floating view, once lifted and until settled.
    #[must_use]
    pub fn floating(&self) -> Option<&FloatingView<S>> {
        match &self.phase {
            Phase::Dragging(drag) => Some(&drag.floating),
            Phase::Settling { floating, .. } => Some(floating),
            _ => None,
        }
    }

    /// Vector from the initial touch to the lifted cell's centre.
    #[must_use]
    pub fn touch_offset(&self) -> Option<Point> {
        match &self.phase {
            Phase::Dragging(drag) => Some(drag.touch_offset),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_auto_scrolling(&self) -> bool {
        matches!(&self.phase, Phase::Dragging(drag) if drag.scroller.is_active())
    }

    /// Generation counter; changes on every transition.
    #[inline]
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Earliest pending timer. May belong to a stale epoch, in which case
    /// polling at that instant simply discards it.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.peek().map(|t| t.due)
    }

    fn transition(&mut self, phase: Phase<S>) {
        self.epoch = self.epoch.wrapping_add(1);
        self.phase = phase;
        if matches!(self.phase, Phase::Idle) {
            self.timers.clear();
        }
    }

    fn schedule(&mut self, due: Instant, kind: TimerKind) {
        self.seq = self.seq.wrapping_add(1);
        self.timers.push(Timer {
            due,
            seq: self.seq,
            epoch: self.epoch,
            kind,
        });
    }

    fn pop_due(&mut self, now: Instant) -> Option<Timer> {
        if self.timers.peek().is_some_and(|t| t.due <= now) {
            self.timers.pop()
        } else {
            None
        }
    }
}

impl<S: Send + 'static> DragSession<S> {
    /// Feed one input sample.
    ///
    /// Timers due at or before `now` fire first, so the event sees the
    /// state it would have seen in real time. A pending lift is left for
    /// [`poll`](Self::poll).
    pub fn handle<H>(
        &mut self,
        event: DragEvent,
        now: Instant,
        host: &mut H,
        delegate: &mut dyn ReorderDelegate,
    ) where
        H: CollectionHost<Snapshot = S>,
    {
        let _span = tracing::debug_span!("dragsort.session", epoch = self.epoch).entered();
        self.fire_timers(now, host, delegate);

        match event.phase {
            DragPhase::Begin => self.begin(event.position, now, host, delegate),
            DragPhase::Change => self.change(event.position, now, host),
            DragPhase::End | DragPhase::Cancel => self.end(event.phase, now, host),
        }
    }

    /// Pick up a finished snapshot and fire due timers.
    pub fn poll<H>(&mut self, now: Instant, host: &mut H, delegate: &mut dyn ReorderDelegate)
    where
        H: CollectionHost<Snapshot = S>,
    {
        let _span = tracing::trace_span!("dragsort.session", epoch = self.epoch).entered();
        self.try_lift(now, host);
        self.fire_timers(now, host, delegate);
    }

    /// Block until the pending snapshot arrives or `timeout` elapses.
    ///
    /// Returns `true` if a snapshot is ready; the lift itself happens on
    /// the next [`poll`](Self::poll) or [`handle`](Self::handle).
    pub fn wait_for_lift(&mut self, timeout: Duration) -> bool {
        let Phase::Armed(armed) = &mut self.phase else {
            return false;
        };
        if armed.ready.is_some() {
            return true;
        }
        match armed.rx.recv_timeout(timeout) {
            Ok(snapshot) => {
                armed.ready = Some(snapshot);
                true
            }
            Err(_) => false,
        }
    }

    fn fire_timers<H>(&mut self, now: Instant, host: &mut H, delegate: &mut dyn ReorderDelegate)
    where
        H: CollectionHost<Snapshot = S>,
    {
        while let Some(timer) = self.pop_due(now) {
            if timer.epoch != self.epoch {
                tracing::trace!(kind = ?timer.kind, "dropping stale timer");
                continue;
            }
            // Fire at the scheduled instant so a late poll replays the
            // same sequence as a punctual one.
            let at = timer.due;
            match timer.kind {
                TimerKind::ScrollCheck { previous } => self.on_scroll_check(previous, at, host),
                TimerKind::SwapCheck { previous } => self.on_swap_check(previous, host, delegate),
                TimerKind::ScrollStepDone {
                    touch_at_start,
                    shift,
                } => self.on_scroll_step_done(touch_at_start + shift, at, host),
                TimerKind::ScrollGrace => {
                    if let Phase::Dragging(drag) = &mut self.phase {
                        drag.scroller.finish();
                        tracing::debug!("auto-scroll released");
                    }
                }
                TimerKind::Settled => self.finish_settle(host, delegate),
            }
        }
    }

    // --- Begin -----------------------------------------------------------

    fn begin<H>(&mut self, position: Point, now: Instant, host: &mut H, delegate: &mut dyn ReorderDelegate)
    where
        H: CollectionHost<Snapshot = S>,
    {
        if !self.enabled {
            tracing::trace!("dragging disabled; ignoring begin");
            return;
        }
        if !matches!(self.phase, Phase::Idle) {
            tracing::warn!(state = ?self.state(), "begin while a drag is active; ignoring");
            return;
        }
        if !position.is_valid() {
            return;
        }

        let touch_at_begin = host.to_content(position);
        let Some(slot) = host.hit_test(touch_at_begin) else {
            tracing::trace!(x = position.x, y = position.y, "begin missed every cell");
            return;
        };
        if !delegate.should_begin_drag(slot) {
            tracing::debug!(%slot, "drag vetoed by delegate");
            return;
        }
        let Some(job) = host.snapshot_job(slot) else {
            tracing::warn!(%slot, "no cell to snapshot; drag not started");
            return;
        };

        let (tx, rx) = mpsc::channel();
        let spawned = std::thread::Builder::new()
            .name("dragsort-snapshot".into())
            .spawn(move || {
                // The receiver is gone if the drag ended first.
                let _ = tx.send(job());
            });
        if let Err(err) = spawned {
            tracing::warn!(%err, "failed to spawn snapshot worker; drag not started");
            return;
        }

        self.transition(Phase::Armed(Armed {
            slot,
            touch: position,
            touch_at_begin,
            rx,
            ready: None,
        }));
        tracing::debug!(%slot, ?now, "armed");
    }

    fn try_lift<H>(&mut self, now: Instant, host: &mut H)
    where
        H: CollectionHost<Snapshot = S>,
    {
        let Phase::Armed(armed) = &mut self.phase else {
            return;
        };
        let snapshot = match armed.ready.take() {
            Some(snapshot) => snapshot,
            None => match armed.rx.try_recv() {
                Ok(snapshot) => snapshot,
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!(slot = %armed.slot, "snapshot worker exited without a result");
                    self.transition(Phase::Idle);
                    return;
                }
            },
        };
        let (slot, touch, touch_at_begin) = (armed.slot, armed.touch, armed.touch_at_begin);

        let Some(center) = host.cell_center(slot) else {
            tracing::warn!(%slot, "cell vanished before lift; drag dropped");
            self.transition(Phase::Idle);
            return;
        };
        host.set_cell_hidden(slot, true);
        let size = host.cell_bounds(slot).unwrap_or_default();

        // Changes seen while armed already moved the touch away from the cell.
        let touch_offset = center - touch_at_begin;
        let lifted_at = host.to_content(touch) + touch_offset;
        let floating = FloatingView::lifted(snapshot, size, lifted_at, now, &self.config.lift);
        self.transition(Phase::Dragging(Drag {
            slot,
            floating,
            touch_offset,
            touch,
            scroller: AutoScroller::default(),
            scroll_check_pending: false,
            swap_check_pending: false,
        }));
        tracing::debug!(%slot, "lifted");
    }

    // --- Change ----------------------------------------------------------

    fn change<H>(&mut self, position: Point, now: Instant, host: &mut H)
    where
        H: CollectionHost<Snapshot = S>,
    {
        if !position.is_valid() {
            tracing::trace!("ignoring NaN touch");
            return;
        }
        let drag = match &mut self.phase {
            Phase::Dragging(drag) => drag,
            Phase::Armed(armed) => {
                armed.touch = position;
                return;
            }
            _ => return,
        };

        drag.touch = position;
        let content = host.to_content(position);
        drag.floating.center.set(content + drag.touch_offset, now);

        let schedule_scroll = !drag.scroller.is_active() && !drag.scroll_check_pending;
        drag.scroll_check_pending |= schedule_scroll;
        let schedule_swap = !drag.swap_check_pending;
        drag.swap_check_pending = true;

        let due = now + self.config.scroll.tick_interval;
        if schedule_scroll {
            self.schedule(due, TimerKind::ScrollCheck { previous: content });
        }
        if schedule_swap {
            self.schedule(due, TimerKind::SwapCheck { previous: content });
        }
    }

    fn on_scroll_check<H>(&mut self, previous: Point, at: Instant, host: &mut H)
    where
        H: CollectionHost<Snapshot = S>,
    {
        let Phase::Dragging(drag) = &mut self.phase else {
            return;
        };
        drag.scroll_check_pending = false;
        if drag.scroller.is_active() {
            return;
        }

        let decision = decide_scroll(
            host.to_viewport(previous),
            drag.touch,
            host.frame(),
            host.content_size(),
            host.scroll_axis(),
            &self.config.scroll,
        );
        tracing::trace!(?decision, "scroll check");
        if let ScrollDecision::Scroll(direction) = decision {
            drag.scroller.begin();
            tracing::debug!(?direction, "auto-scroll started");
            self.scroll_step(direction, at, host);
        }
    }

    fn scroll_step<H>(&mut self, direction: ScrollDirection, at: Instant, host: &mut H)
    where
        H: CollectionHost<Snapshot = S>,
    {
        let Phase::Dragging(drag) = &mut self.phase else {
            return;
        };
        let axis = host.scroll_axis();
        let plan = plan_step(
            direction,
            host.content_offset(),
            host.content_extent(),
            host.viewport_extent(),
            axis,
            self.config.scroll.increment,
        );

        match plan {
            StepPlan::Stop => {
                tracing::debug!(steps = drag.scroller.steps(), "auto-scroll reached content bound");
                let due = at + self.config.scroll.grace_delay;
                self.schedule(due, TimerKind::ScrollGrace);
            }
            StepPlan::Advance { offset, shift } => {
                let touch_at_start = host.to_content(drag.touch);
                host.set_content_offset(offset, true);

                let step = self.config.scroll.step_duration;
                let target = drag.floating.center.target() + shift;
                drag.floating.center.retarget(target, at, step, linear);
                drag.scroller.record_step();
                tracing::trace!(offset = axis.along(offset), "auto-scroll step");

                self.schedule(
                    at + step,
                    TimerKind::ScrollStepDone {
                        touch_at_start,
                        shift,
                    },
                );
            }
        }
    }

    fn on_scroll_step_done<H>(&mut self, previous: Point, at: Instant, host: &mut H)
    where
        H: CollectionHost<Snapshot = S>,
    {
        let Phase::Dragging(drag) = &self.phase else {
            return;
        };
        let decision = decide_scroll(
            host.to_viewport(previous),
            drag.touch,
            host.frame(),
            host.content_size(),
            host.scroll_axis(),
            &self.config.scroll,
        );

        if let Some(direction) = decision.direction() {
            self.scroll_step(direction, at, host);
        } else if let Phase::Dragging(drag) = &mut self.phase {
            drag.scroller.finish();
            tracing::debug!(steps = drag.scroller.steps(), "auto-scroll stopped");
        }
    }

    fn on_swap_check<H>(&mut self, previous: Point, host: &mut H, delegate: &mut dyn ReorderDelegate)
    where
        H: CollectionHost<Snapshot = S>,
    {
        let Phase::Dragging(drag) = &mut self.phase else {
            return;
        };
        drag.swap_check_pending = false;

        let from = drag.slot;
        let current = host.to_content(drag.touch);
        let decision = decide_swap(
            previous,
            current,
            from,
            |p| host.hit_test(p),
            |candidate| delegate.approve_target(candidate),
            &self.config.swap,
        );
        let SwapDecision::Swap(to) = decision else {
            return;
        };

        // Hosts may track hidden state per slot.
        host.set_cell_hidden(from, false);
        host.move_item(from, to);
        if !host.set_cell_hidden(to, true) {
            tracing::warn!(%to, "relocated cell not realised; left visible");
        }
        delegate.on_moved(from, to);
        drag.slot = to;
        tracing::debug!(%from, %to, "swapped");
    }

    // --- End -------------------------------------------------------------

    fn end<H>(&mut self, phase: DragPhase, now: Instant, host: &mut H)
    where
        H: CollectionHost<Snapshot = S>,
    {
        match self.state() {
            SessionState::Idle | SessionState::Settling => {
                tracing::trace!(?phase, "stray end ignored");
            }
            SessionState::Armed => {
                // Dropping the receiver discards the late snapshot.
                self.transition(Phase::Idle);
                tracing::debug!(?phase, "drag ended before lift");
            }
            SessionState::Dragging => {
                let Phase::Dragging(drag) = std::mem::replace(&mut self.phase, Phase::Idle) else {
                    return;
                };
                let Drag {
                    slot, mut floating, ..
                } = drag;

                let home = host.cell_center(slot);
                if home.is_none() {
                    tracing::warn!(%slot, "cell not realised at end; settling in place");
                }
                let settle = self.config.lift.settle_duration;
                floating.settle(home, now, settle);

                self.transition(Phase::Settling { slot, floating });
                self.schedule(now + settle, TimerKind::Settled);
                tracing::debug!(%slot, ?phase, "settling");
            }
        }
    }

    fn finish_settle<H>(&mut self, host: &mut H, delegate: &mut dyn ReorderDelegate)
    where
        H: CollectionHost<Snapshot = S>,
    {
        let Phase::Settling { slot, .. } = &self.phase else {
            return;
        };
        let slot = *slot;
        self.transition(Phase::Idle);
        if !host.set_cell_hidden(slot, false) {
            tracing::trace!(%slot, "final cell not realised");
        }
        delegate.on_drag_ended(slot);
        tracing::debug!(%slot, "drag ended");
    }
}

#![forbid(unsafe_code)]

//! Drag-to-reorder for scrollable grids.
//!
//! # Role
//! `dragsort-core` is the interaction logic behind long-press reordering in a
//! scrolling collection: lifting a cell into a floating representation,
//! swapping it through the backing collection as the touch moves, scrolling
//! the container while the touch rests near an edge, and the "wiggle" cue of
//! reorder mode. Rendering and input recognition stay with the host.
//!
//! # Primary responsibilities
//! - **DragSession**: the drag state machine, driven by [`DragEvent`]s and
//!   [`DragSession::poll`].
//! - **Deciders**: pure [`decide_scroll`] and [`decide_swap`] functions.
//! - **WiggleController**: reorder-mode cue, independent of any drag.
//! - **ReorderConfig**: every tunable, loadable from TOML or JSON with the
//!   `config` feature.
//!
//! # How it fits in a host
//! The host implements [`CollectionHost`] over its container and
//! [`ReorderDelegate`] for policy, forwards long-press samples to
//! [`DragSession::handle`], polls on each frame, and draws the
//! [`FloatingView`] from [`FloatingView::appearance`].
//!
//! ```
//! use dragsort_core::{DragSession, ReorderConfig};
//!
//! let session: DragSession<Vec<u8>> = DragSession::new(ReorderConfig::default());
//! assert!(session.dragged_slot().is_none());
//! ```

pub mod animation;
pub mod autoscroll;
pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod scroll;
pub mod session;
pub mod swap;
pub mod wiggle;

pub use config::{AutoScrollConfig, LiftConfig, ReorderConfig, SwapConfig, WiggleConfig};
pub use error::{ConfigError, Result};
pub use geometry::{Point, Rect, Size, distance, rect_contains};
pub use host::{CollectionHost, NoDelegate, ReorderDelegate, Slot, SnapshotJob, WiggleHost};
pub use scroll::{ScrollAxis, ScrollDecision, ScrollDirection, decide_scroll};
pub use session::{Appearance, DragEvent, DragPhase, DragSession, FloatingView, SessionState};
pub use swap::{SwapDecision, decide_swap};
pub use wiggle::{WiggleAnimation, WiggleController};

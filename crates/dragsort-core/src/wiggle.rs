#![forbid(unsafe_code)]

//! The reorder-mode wiggle cue.
//!
//! [`WiggleController`] decides which cells wiggle and with what parameters;
//! drawing is the host's job (see [`WiggleHost`]). It is independent of any
//! drag session and its state persists across drags.

use ahash::AHashSet;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use web_time::Duration;

use crate::animation::Oscillation;
use crate::config::WiggleConfig;
use crate::host::{Slot, WiggleHost};

/// Parameters for one cell's looping wiggle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WiggleAnimation {
    /// Rotation about the cell centre, radians.
    pub rotation: Oscillation,
    /// Vertical translation.
    pub bounce: Oscillation,
}

/// Toggles the wiggle cue on visible cells.
#[derive(Debug)]
pub struct WiggleController {
    config: WiggleConfig,
    excluded: AHashSet<Slot>,
    wiggling: bool,
    rng: SmallRng,
}

impl WiggleController {
    #[must_use]
    pub fn new(config: WiggleConfig) -> Self {
        Self::with_rng(config, SmallRng::from_os_rng())
    }

    /// Deterministic jitter, for tests and replays.
    #[must_use]
    pub fn with_seed(config: WiggleConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: WiggleConfig, rng: SmallRng) -> Self {
        Self {
            config,
            excluded: AHashSet::new(),
            wiggling: false,
            rng,
        }
    }

    /// Whether reorder mode is showing the cue.
    #[inline]
    #[must_use]
    pub fn is_wiggling(&self) -> bool {
        self.wiggling
    }

    /// Wiggle every visible cell that is not excluded.
    pub fn enter(&mut self, host: &mut impl WiggleHost) {
        for slot in host.visible_slots() {
            self.apply(slot, host);
        }
        self.wiggling = true;
        tracing::debug!(excluded = self.excluded.len(), "wiggle on");
    }

    /// Stop the cue on every visible cell.
    pub fn exit(&mut self, host: &mut impl WiggleHost) {
        for slot in host.visible_slots() {
            host.remove_wiggle(slot);
        }
        self.wiggling = false;
        tracing::debug!("wiggle off");
    }

    /// Bring a cell that just scrolled into view in line with the current state.
    pub fn cell_will_appear(&mut self, slot: Slot, host: &mut impl WiggleHost) {
        if self.wiggling {
            self.apply(slot, host);
        } else {
            host.remove_wiggle(slot);
        }
    }

    /// Exempt `slot` from future wiggle applications.
    pub fn exclude(&mut self, slot: Slot) -> bool {
        self.excluded.insert(slot)
    }

    /// Undo [`exclude`](Self::exclude).
    pub fn include(&mut self, slot: Slot) -> bool {
        self.excluded.remove(&slot)
    }

    /// Replace the whole exclusion set.
    pub fn set_excluded(&mut self, slots: impl IntoIterator<Item = Slot>) {
        self.excluded = slots.into_iter().collect();
    }

    #[must_use]
    pub fn is_excluded(&self, slot: Slot) -> bool {
        self.excluded.contains(&slot)
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &WiggleConfig {
        &self.config
    }

    /// Build a fresh animation with per-activation duration jitter.
    pub fn next_animation(&mut self) -> WiggleAnimation {
        let rotation = Oscillation {
            amplitude: self.config.rotation_amplitude,
            half_period: self.jittered(self.config.rotation_duration),
        };
        let bounce = Oscillation {
            amplitude: self.config.bounce_amplitude,
            half_period: self.jittered(self.config.bounce_duration),
        };
        WiggleAnimation { rotation, bounce }
    }

    fn jittered(&mut self, base: Duration) -> Duration {
        if self.config.jitter <= 0.0 {
            return base;
        }
        let factor = 1.0 + self.config.jitter * self.rng.random_range(-1.0..=1.0);
        base.mul_f64(factor)
    }

    fn apply(&mut self, slot: Slot, host: &mut impl WiggleHost) {
        if self.excluded.contains(&slot) {
            return;
        }
        let animation = self.next_animation();
        host.apply_wiggle(slot, animation);
    }
}

impl Default for WiggleController {
    fn default() -> Self {
        Self::new(WiggleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashMap;

    #[derive(Default)]
    struct Cells {
        visible: Vec<Slot>,
        wiggling: AHashMap<Slot, WiggleAnimation>,
    }

    impl WiggleHost for Cells {
        fn visible_slots(&self) -> Vec<Slot> {
            self.visible.clone()
        }

        fn apply_wiggle(&mut self, slot: Slot, animation: WiggleAnimation) {
            self.wiggling.insert(slot, animation);
        }

        fn remove_wiggle(&mut self, slot: Slot) {
            self.wiggling.remove(&slot);
        }
    }

    fn cells(n: usize) -> Cells {
        Cells {
            visible: (0..n).map(Slot::item).collect(),
            ..Cells::default()
        }
    }

    #[test]
    fn enter_and_exit() {
        let mut host = cells(4);
        let mut w = WiggleController::with_seed(WiggleConfig::default(), 7);
        w.enter(&mut host);
        assert!(w.is_wiggling());
        assert_eq!(host.wiggling.len(), 4);
        w.exit(&mut host);
        assert!(!w.is_wiggling());
        assert!(host.wiggling.is_empty());
    }

    #[test]
    fn recycled_cell_follows_state() {
        let mut host = cells(3);
        let mut w = WiggleController::with_seed(WiggleConfig::default(), 7);
        w.enter(&mut host);
        w.cell_will_appear(Slot::item(8), &mut host);
        assert!(host.wiggling.contains_key(&Slot::item(8)));

        w.exit(&mut host);
        host.wiggling.insert(Slot::item(9), w.next_animation());
        w.cell_will_appear(Slot::item(9), &mut host);
        assert!(!host.wiggling.contains_key(&Slot::item(9)));
    }

    #[test]
    fn excluded_slot_never_wiggles() {
        let mut host = cells(4);
        let mut w = WiggleController::with_seed(WiggleConfig::default(), 7);
        assert!(w.exclude(Slot::item(2)));
        w.enter(&mut host);
        assert!(!host.wiggling.contains_key(&Slot::item(2)));
        assert_eq!(host.wiggling.len(), 3);

        w.cell_will_appear(Slot::item(2), &mut host);
        assert!(!host.wiggling.contains_key(&Slot::item(2)));

        assert!(w.include(Slot::item(2)));
        w.cell_will_appear(Slot::item(2), &mut host);
        assert!(host.wiggling.contains_key(&Slot::item(2)));
    }

    #[test]
    fn jitter_stays_within_band() {
        let mut w = WiggleController::with_seed(WiggleConfig::default(), 42);
        for _ in 0..500 {
            let a = w.next_animation();
            let r = a.rotation.half_period.as_secs_f64();
            let b = a.bounce.half_period.as_secs_f64();
            assert!((0.0975 - 1e-12..=0.1025 + 1e-12).contains(&r), "rotation {r}");
            assert!((0.117 - 1e-12..=0.123 + 1e-12).contains(&b), "bounce {b}");
            assert_eq!(a.rotation.amplitude, 0.04);
            assert_eq!(a.bounce.amplitude, 2.0);
        }
    }

    #[test]
    fn zero_jitter_uses_base_durations() {
        let config = WiggleConfig {
            jitter: 0.0,
            ..WiggleConfig::default()
        };
        let mut w = WiggleController::with_seed(config, 1);
        let a = w.next_animation();
        assert_eq!(a.rotation.half_period, Duration::from_millis(100));
        assert_eq!(a.bounce.half_period, Duration::from_millis(120));
    }

    #[test]
    fn set_excluded_replaces() {
        let mut w = WiggleController::with_seed(WiggleConfig::default(), 1);
        w.exclude(Slot::item(1));
        w.set_excluded([Slot::item(5), Slot::item(6)]);
        assert!(!w.is_excluded(Slot::item(1)));
        assert!(w.is_excluded(Slot::item(6)));
    }
}

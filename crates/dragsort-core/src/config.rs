#![forbid(unsafe_code)]

//! Tunables for drag reordering, auto-scroll, lift, and wiggle.
//!
//! Every knob has a default matching the stock behaviour, so
//! `ReorderConfig::default()` is always a valid starting point. With the
//! `config` feature the whole tree can be loaded from TOML or JSON:
//!
//! ```toml
//! [scroll]
//! hot_zone_thickness = 64.0
//! tick_interval = 0.25
//!
//! [wiggle]
//! rotation_amplitude = 0.05
//! ```
//!
//! Durations are expressed in seconds when serialized.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::{ConfigError, Result};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// All tunables for a [`DragSession`](crate::session::DragSession) and
/// [`WiggleController`](crate::wiggle::WiggleController).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ReorderConfig {
    /// Edge auto-scroll and polling cadence.
    pub scroll: AutoScrollConfig,
    /// Swap decision thresholds.
    pub swap: SwapConfig,
    /// Lift/settle appearance of the floating representation.
    pub lift: LiftConfig,
    /// Wiggle cue parameters.
    pub wiggle: WiggleConfig,
}

/// Auto-scroll parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct AutoScrollConfig {
    /// Inter-sample movement at or above which a scroll check is suppressed.
    pub jitter_distance: f64,
    /// Thickness of the leading/trailing hot zones.
    pub hot_zone_thickness: f64,
    /// Offset change per auto-scroll step.
    pub increment: f64,
    /// Delay between a Change event and the checks it schedules.
    #[cfg_attr(feature = "config", serde(with = "duration_secs"))]
    pub tick_interval: Duration,
    /// Length of one linear scroll step.
    #[cfg_attr(feature = "config", serde(with = "duration_secs"))]
    pub step_duration: Duration,
    /// Delay before clearing the auto-scrolling flag after hitting a bound.
    #[cfg_attr(feature = "config", serde(with = "duration_secs"))]
    pub grace_delay: Duration,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            jitter_distance: 20.0,
            hot_zone_thickness: 50.0,
            increment: 50.0,
            tick_interval: Duration::from_millis(300),
            step_duration: Duration::from_millis(300),
            grace_delay: Duration::from_millis(300),
        }
    }
}

/// Swap decision parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SwapConfig {
    /// Inter-sample movement at or above which a swap check is suppressed.
    pub jitter_distance: f64,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            jitter_distance: 20.0,
        }
    }
}

/// Floating representation appearance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct LiftConfig {
    /// Scale applied while lifted.
    pub scale: f64,
    /// Opacity applied while lifted.
    pub opacity: f64,
    /// Duration of the lift tween.
    #[cfg_attr(feature = "config", serde(with = "duration_secs"))]
    pub lift_duration: Duration,
    /// Duration of the settle tween at End.
    #[cfg_attr(feature = "config", serde(with = "duration_secs"))]
    pub settle_duration: Duration,
}

impl Default for LiftConfig {
    fn default() -> Self {
        Self {
            scale: 1.3,
            opacity: 0.8,
            lift_duration: Duration::from_millis(400),
            settle_duration: Duration::from_millis(400),
        }
    }
}

/// Wiggle cue parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct WiggleConfig {
    /// Peak rotation, radians.
    pub rotation_amplitude: f64,
    /// Peak vertical displacement.
    pub bounce_amplitude: f64,
    #[cfg_attr(feature = "config", serde(with = "duration_secs"))]
    pub rotation_duration: Duration,
    #[cfg_attr(feature = "config", serde(with = "duration_secs"))]
    pub bounce_duration: Duration,
    /// Relative duration jitter per activation (0.025 = ±2.5%).
    pub jitter: f64,
}

impl Default for WiggleConfig {
    fn default() -> Self {
        Self {
            rotation_amplitude: 0.04,
            bounce_amplitude: 2.0,
            rotation_duration: Duration::from_millis(100),
            bounce_duration: Duration::from_millis(120),
            jitter: 0.025,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading and validation
// ---------------------------------------------------------------------------

impl ReorderConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of problems; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        positive(&mut errors, "scroll.jitter_distance", self.scroll.jitter_distance);
        positive(
            &mut errors,
            "scroll.hot_zone_thickness",
            self.scroll.hot_zone_thickness,
        );
        positive(&mut errors, "scroll.increment", self.scroll.increment);
        if self.scroll.tick_interval.is_zero() {
            errors.push("scroll.tick_interval must be > 0".into());
        }
        if self.scroll.step_duration.is_zero() {
            errors.push("scroll.step_duration must be > 0".into());
        }

        positive(&mut errors, "swap.jitter_distance", self.swap.jitter_distance);

        positive(&mut errors, "lift.scale", self.lift.scale);
        if !(0.0..=1.0).contains(&self.lift.opacity) {
            errors.push(format!(
                "lift.opacity must be in [0, 1], got {}",
                self.lift.opacity
            ));
        }

        if self.wiggle.rotation_amplitude < 0.0 {
            errors.push(format!(
                "wiggle.rotation_amplitude must be >= 0, got {}",
                self.wiggle.rotation_amplitude
            ));
        }
        if self.wiggle.bounce_amplitude < 0.0 {
            errors.push(format!(
                "wiggle.bounce_amplitude must be >= 0, got {}",
                self.wiggle.bounce_amplitude
            ));
        }
        if !(0.0..1.0).contains(&self.wiggle.jitter) {
            errors.push(format!(
                "wiggle.jitter must be in [0, 1), got {}",
                self.wiggle.jitter
            ));
        }
        if self.wiggle.rotation_duration.is_zero() || self.wiggle.bounce_duration.is_zero() {
            errors.push("wiggle durations must be > 0".into());
        }

        errors
    }

    /// Consume the config, returning it only if [`validate`](Self::validate)
    /// finds nothing wrong.
    pub fn validated(self) -> Result<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

fn positive(errors: &mut Vec<String>, name: &str, value: f64) {
    // Written as a negated comparison so NaN is rejected too.
    if !(value > 0.0) {
        errors.push(format!("{name} must be > 0, got {value}"));
    }
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

#[cfg(feature = "config")]
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use web_time::Duration;

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(serde::de::Error::custom(format!(
                "duration must be a non-negative number of seconds, got {secs}"
            )));
        }
        // Round to whole nanoseconds so decimal literals like 0.3 are exact.
        Ok(Duration::from_nanos((secs * 1e9).round() as u64))
    }
}

//! Controller and launcher tuning loaded from JSON.
//!
//! Every field falls back to the defaults in [`crate::constants`], so a file
//! may override a single value:
//!
//! ```
//! use skirmish::config::SkirmishConfig;
//! let config = SkirmishConfig::from_json(r#"{ "agent": { "shot_cooldown": 3.5 } }"#).unwrap();
//! assert!((config.agent.shot_cooldown - 3.5).abs() < f32::EPSILON);
//! assert!((config.agent.facing_threshold - 0.99).abs() < f32::EPSILON);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    ARRIVAL_THRESHOLD, FACING_THRESHOLD, FLEE_ANGLE_MAX_DEGREES, FLEE_ANGLE_MIN_DEGREES,
    FLEE_DISTANCE_MAX, FLEE_DISTANCE_MIN, GRAVITY, LINEAR_SPEED, MAX_CHARGE_TIME,
    MAX_LAUNCH_SPEED, MIN_LAUNCH_SPEED, MUZZLE_ELEVATION_DEGREES, MUZZLE_FORWARD, MUZZLE_HEIGHT,
    REPLAN_INTERVAL_MAX, REPLAN_INTERVAL_MIN, SHOT_COOLDOWN, SPLASH_ALLOWANCE,
    STATIONARY_EPSILON, STATIONARY_FLEE_AFTER, TURN_SPEED_DEGREES,
};

/// Failures raised while reading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The JSON document was malformed or had mistyped fields.
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// A range had its bounds the wrong way round.
    #[error("{field}: range minimum {min} exceeds maximum {max}")]
    InvertedSpan {
        /// Offending field.
        field: &'static str,
        /// Lower bound supplied.
        min: f32,
        /// Upper bound supplied.
        max: f32,
    },
    /// A value that must be strictly positive was not.
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// Offending field.
        field: &'static str,
        /// Value supplied.
        value: f32,
    },
    /// The retreat swing must turn the agent away from its target.
    #[error("agent.flee_angle_degrees must lie within [90, 180], got [{min}, {max}]")]
    FleeAngle {
        /// Lower bound supplied.
        min: f32,
        /// Upper bound supplied.
        max: f32,
    },
    /// The facing threshold is a cosine and must lie in `[-1, 1]`.
    #[error("facing_threshold must lie within [-1, 1], got {0}")]
    FacingThreshold(f32),
}

/// Inclusive `[min, max]` interval sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl Span {
    /// Creates a span from its bounds.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draws a value uniformly from the span.
    ///
    /// Degenerate spans (`min == max`) always return `min`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    /// Reports whether `value` lies inside the span.
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn check(self, field: &'static str) -> Result<Self, ConfigError> {
        if self.min > self.max || !self.min.is_finite() || !self.max.is_finite() {
            return Err(ConfigError::InvertedSpan {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(self)
    }
}

fn positive(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// How fast the agent drives and turns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Forward speed in units per second.
    pub linear_speed: f32,
    /// Turn rate in degrees per second.
    pub turn_speed_degrees: f32,
}

impl LocomotionConfig {
    /// Turn rate in radians per second.
    #[must_use]
    pub fn turn_speed(&self) -> f32 {
        self.turn_speed_degrees.to_radians()
    }
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            linear_speed: LINEAR_SPEED,
            turn_speed_degrees: TURN_SPEED_DEGREES,
        }
    }
}

/// Decision-making parameters of one agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Range the per-agent re-plan interval is drawn from.
    pub replan_interval: Span,
    /// Pause after a released shot before charging again.
    pub shot_cooldown: f32,
    /// Distance the predicted landing point may fall short of the target.
    pub splash_allowance: f32,
    /// Facing alignment (cosine) that must be exceeded to release a shot.
    pub facing_threshold: f32,
    /// Per-tick target displacement treated as standing still.
    pub stationary_epsilon: f32,
    /// Stationary time after which firing triggers a retreat.
    pub stationary_flee_after: f32,
    /// Rotation away from the target used for retreats, in degrees.
    pub flee_angle_degrees: Span,
    /// Retreat distance.
    pub flee_distance: Span,
    /// Distance at which a waypoint counts as reached.
    pub arrival_threshold: f32,
    /// Drive and turn rates.
    pub locomotion: LocomotionConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            replan_interval: Span::new(REPLAN_INTERVAL_MIN, REPLAN_INTERVAL_MAX),
            shot_cooldown: SHOT_COOLDOWN,
            splash_allowance: SPLASH_ALLOWANCE,
            facing_threshold: FACING_THRESHOLD,
            stationary_epsilon: STATIONARY_EPSILON,
            stationary_flee_after: STATIONARY_FLEE_AFTER,
            flee_angle_degrees: Span::new(FLEE_ANGLE_MIN_DEGREES, FLEE_ANGLE_MAX_DEGREES),
            flee_distance: Span::new(FLEE_DISTANCE_MIN, FLEE_DISTANCE_MAX),
            arrival_threshold: ARRIVAL_THRESHOLD,
            locomotion: LocomotionConfig::default(),
        }
    }
}

impl AgentConfig {
    /// Checks ranges and strictly positive quantities.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.replan_interval.check("agent.replan_interval")?;
        positive("agent.replan_interval.min", self.replan_interval.min)?;
        let swing = self.flee_angle_degrees.check("agent.flee_angle_degrees")?;
        if swing.min < FLEE_ANGLE_MIN_DEGREES || swing.max > FLEE_ANGLE_MAX_DEGREES {
            return Err(ConfigError::FleeAngle {
                min: swing.min,
                max: swing.max,
            });
        }
        self.flee_distance.check("agent.flee_distance")?;
        positive("agent.flee_distance.min", self.flee_distance.min)?;
        positive("agent.shot_cooldown", self.shot_cooldown)?;
        positive("agent.arrival_threshold", self.arrival_threshold)?;
        positive("agent.stationary_epsilon", self.stationary_epsilon)?;
        positive("agent.locomotion.linear_speed", self.locomotion.linear_speed)?;
        positive(
            "agent.locomotion.turn_speed_degrees",
            self.locomotion.turn_speed_degrees,
        )?;
        if !(-1.0..=1.0).contains(&self.facing_threshold) {
            return Err(ConfigError::FacingThreshold(self.facing_threshold));
        }
        Ok(())
    }
}

/// Physical parameters of the shell launcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Launch speed when released without charge.
    pub min_launch_speed: f32,
    /// Launch speed at full charge.
    pub max_launch_speed: f32,
    /// Seconds needed to reach full charge.
    pub max_charge_time: f32,
    /// Muzzle height above the hull origin.
    pub muzzle_height: f32,
    /// Muzzle offset ahead of the hull origin.
    pub muzzle_forward: f32,
    /// Barrel pitch above the horizon, in degrees.
    pub elevation_degrees: f32,
    /// Vertical acceleration acting on shells.
    pub gravity: f32,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            min_launch_speed: MIN_LAUNCH_SPEED,
            max_launch_speed: MAX_LAUNCH_SPEED,
            max_charge_time: MAX_CHARGE_TIME,
            muzzle_height: MUZZLE_HEIGHT,
            muzzle_forward: MUZZLE_FORWARD,
            elevation_degrees: MUZZLE_ELEVATION_DEGREES,
            gravity: GRAVITY,
        }
    }
}

impl LauncherConfig {
    /// Checks launch speeds and charge time.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Span::new(self.min_launch_speed, self.max_launch_speed)
            .check("launcher.launch_speed")?;
        positive("launcher.max_launch_speed", self.max_launch_speed)?;
        positive("launcher.max_charge_time", self.max_charge_time)?;
        Ok(())
    }
}

/// Complete tuning for AI-controlled tanks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkirmishConfig {
    /// Controller parameters.
    pub agent: AgentConfig,
    /// Weapon parameters.
    pub launcher: LauncherConfig,
}

impl SkirmishConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and a validation
    /// error for out-of-range values.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise
    /// the errors of [`SkirmishConfig::from_json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = path.as_ref();
        let text = fs::read_to_string(file).map_err(|source| ConfigError::Read {
            path: file.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Validates both sections.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.agent.validate()?;
        self.launcher.validate()
    }
}

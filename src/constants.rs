//! Tuning defaults used across the controller and launcher.
//!
//! Every value here seeds the matching field of
//! [`SkirmishConfig`](crate::config::SkirmishConfig), so a configuration file
//! only needs to name the values it changes.

/// Shortest re-plan interval an agent may draw at creation, in seconds.
pub const REPLAN_INTERVAL_MIN: f32 = 0.3;
/// Longest re-plan interval an agent may draw at creation, in seconds.
pub const REPLAN_INTERVAL_MAX: f32 = 0.6;
/// Time an agent waits after releasing a shot before charging again.
pub const SHOT_COOLDOWN: f32 = 2.0;
/// Distance subtracted from the target distance because shells splash.
pub const SPLASH_ALLOWANCE: f32 = 2.0;
/// Minimum facing alignment (cosine) required to release a charged shot.
pub const FACING_THRESHOLD: f32 = 0.99;
/// Target displacement per tick below which the target counts as stationary.
pub const STATIONARY_EPSILON: f32 = 1e-4;
/// Stationary time after which a firing agent retreats instead of holding.
pub const STATIONARY_FLEE_AFTER: f32 = 2.0;
/// Smallest retreat rotation away from the target, in degrees.
pub const FLEE_ANGLE_MIN_DEGREES: f32 = 90.0;
/// Largest retreat rotation away from the target, in degrees.
pub const FLEE_ANGLE_MAX_DEGREES: f32 = 180.0;
/// Shortest retreat distance.
pub const FLEE_DISTANCE_MIN: f32 = 5.0;
/// Longest retreat distance.
pub const FLEE_DISTANCE_MAX: f32 = 20.0;
/// Distance at which a waypoint counts as reached.
pub const ARRIVAL_THRESHOLD: f32 = 0.5;
/// Forward speed in units per second.
pub const LINEAR_SPEED: f32 = 12.0;
/// Turn rate in degrees per second.
pub const TURN_SPEED_DEGREES: f32 = 180.0;

/// Launch speed of a shell released without charging.
pub const MIN_LAUNCH_SPEED: f32 = 5.0;
/// Launch speed of a fully charged shell.
pub const MAX_LAUNCH_SPEED: f32 = 20.0;
/// Time needed to charge from minimum to maximum launch speed.
pub const MAX_CHARGE_TIME: f32 = 0.75;
/// Height of the muzzle above the hull origin.
pub const MUZZLE_HEIGHT: f32 = 1.7;
/// Distance of the muzzle ahead of the hull origin.
pub const MUZZLE_FORWARD: f32 = 1.35;
/// Upward pitch of the barrel, in degrees.
pub const MUZZLE_ELEVATION_DEGREES: f32 = 20.0;
/// Vertical acceleration applied to shells.
pub const GRAVITY: f32 = -9.81;

/// Movement or rotation smaller than this is not applied.
pub const MOTION_EPSILON: f32 = 1e-6;

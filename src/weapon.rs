//! Weapon seam and the charge-and-release shell launcher.
//!
//! The controller never fires shells itself. It asks a [`Weapon`] to start
//! or stop charging and queries where the current charge would land.
//! [`ShellLauncher`] is the stock implementation: holding the trigger raises
//! the launch speed linearly from minimum to maximum, releasing fires.

use glam::Vec3;
use log::debug;

use crate::ballistics::landing_point;
use crate::config::LauncherConfig;
use crate::vector_math::flat_direction;

/// Charge-and-release ranged weapon driven by the controller.
#[cfg_attr(test, mockall::automock)]
pub trait Weapon {
    /// Reports whether a shot is currently being charged.
    fn is_charging(&self) -> bool;

    /// Current charge in `[0, 1]`.
    fn charge_ratio(&self) -> f32;

    /// Begins charging a new shot.
    fn start_charging(&mut self);

    /// Releases the shot being charged. Does nothing when not charging.
    fn stop_charging(&mut self);

    /// Ground point a shot fired at `charge_ratio` would reach, ignoring
    /// obstacles.
    fn predicted_landing_point(&self, charge_ratio: f32) -> Vec3;
}

/// A shell that left the muzzle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Muzzle position at release.
    pub origin: Vec3,
    /// Initial shell velocity.
    pub velocity: Vec3,
}

/// Turret that charges launch speed while held and fires on release.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellLauncher {
    config: LauncherConfig,
    charge_rate: f32,
    launch_speed: f32,
    charging: bool,
    muzzle: Vec3,
    barrel: Vec3,
    fired: Vec<Shot>,
}

impl ShellLauncher {
    /// Creates an idle launcher aimed along +Z from the origin.
    #[must_use]
    pub fn new(config: LauncherConfig) -> Self {
        let mut launcher = Self {
            config,
            charge_rate: (config.max_launch_speed - config.min_launch_speed)
                / config.max_charge_time,
            launch_speed: config.min_launch_speed,
            charging: false,
            muzzle: Vec3::ZERO,
            barrel: Vec3::Z,
            fired: Vec::new(),
        };
        launcher.aim(Vec3::ZERO, Vec3::Z);
        launcher
    }

    /// Places the muzzle for a hull at `position` facing `facing`.
    ///
    /// The muzzle sits `muzzle_forward` ahead of and `muzzle_height` above the
    /// hull; the barrel points along the flattened facing, pitched up by the
    /// configured elevation.
    pub fn aim(&mut self, position: Vec3, facing: Vec3) {
        let flat = flat_direction(facing);
        let ahead = if flat == Vec3::ZERO { Vec3::Z } else { flat };
        let pitch = self.config.elevation_degrees.to_radians();
        self.muzzle = position + ahead * self.config.muzzle_forward + Vec3::Y * self.config.muzzle_height;
        self.barrel = (ahead * pitch.cos() + Vec3::Y * pitch.sin()).normalize_or_zero();
    }

    /// Advances charging by `dt` seconds, firing automatically at full charge.
    pub fn advance(&mut self, dt: f32) {
        if !self.charging {
            return;
        }
        self.launch_speed += self.charge_rate * dt;
        if self.launch_speed >= self.config.max_launch_speed {
            self.launch_speed = self.config.max_launch_speed;
            debug!("launcher reached full charge; firing");
            self.fire();
        }
    }

    /// Removes and returns every shot fired since the last call.
    pub fn take_shots(&mut self) -> Vec<Shot> {
        std::mem::take(&mut self.fired)
    }

    /// Current muzzle position.
    #[must_use]
    pub const fn muzzle(&self) -> Vec3 {
        self.muzzle
    }

    /// Launcher tuning.
    #[must_use]
    pub const fn config(&self) -> &LauncherConfig {
        &self.config
    }

    fn speed_for(&self, charge_ratio: f32) -> f32 {
        let ratio = charge_ratio.clamp(0.0, 1.0);
        self.config.min_launch_speed
            + (self.config.max_launch_speed - self.config.min_launch_speed) * ratio
    }

    fn fire(&mut self) {
        self.fired.push(Shot {
            origin: self.muzzle,
            velocity: self.barrel * self.launch_speed,
        });
        self.launch_speed = self.config.min_launch_speed;
        self.charging = false;
    }
}

impl Default for ShellLauncher {
    fn default() -> Self {
        Self::new(LauncherConfig::default())
    }
}

impl Weapon for ShellLauncher {
    fn is_charging(&self) -> bool {
        self.charging
    }

    fn charge_ratio(&self) -> f32 {
        let span = self.config.max_launch_speed - self.config.min_launch_speed;
        if span <= 0.0 {
            return 1.0;
        }
        ((self.launch_speed - self.config.min_launch_speed) / span).clamp(0.0, 1.0)
    }

    fn start_charging(&mut self) {
        self.charging = true;
        self.launch_speed = self.config.min_launch_speed;
    }

    fn stop_charging(&mut self) {
        if self.charging {
            self.fire();
        }
    }

    fn predicted_landing_point(&self, charge_ratio: f32) -> Vec3 {
        let velocity = self.barrel * self.speed_for(charge_ratio);
        landing_point(self.muzzle, velocity, self.config.gravity)
    }
}

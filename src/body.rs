//! Locomotion actuator seam.
//!
//! The controller reads the hull's [`Pose`] and pushes it around through
//! [`Actuator`]. A Bevy [`Transform`](bevy::prelude::Transform) is an actuator
//! (see [`crate::components`]); [`Body`] is a plain stand-in for engine-free
//! use.

use glam::{Quat, Vec3};

/// Where a hull is and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// World position.
    pub position: Vec3,
    /// Unit forward vector.
    pub facing: Vec3,
}

/// Physical body the locomotion step drives.
pub trait Actuator {
    /// Current position and facing.
    fn pose(&self) -> Pose;

    /// Translates the body by `offset`.
    fn move_by(&mut self, offset: Vec3);

    /// Rotates the body about the vertical axis by `angle` radians
    /// (counter-clockwise seen from above).
    fn rotate_by(&mut self, angle: f32);
}

/// Minimal hull: a position and a yaw, facing +Z at zero yaw.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Body {
    /// World position.
    pub position: Vec3,
    /// Rotation about +Y in radians.
    pub yaw: f32,
}

impl Body {
    /// Creates a body at `position` with the given yaw.
    #[must_use]
    pub const fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }

    /// Unit forward vector.
    #[must_use]
    pub fn facing(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw) * Vec3::Z
    }
}

impl Actuator for Body {
    fn pose(&self) -> Pose {
        Pose {
            position: self.position,
            facing: self.facing(),
        }
    }

    fn move_by(&mut self, offset: Vec3) {
        self.position += offset;
    }

    fn rotate_by(&mut self, angle: f32) {
        self.yaw += angle;
    }
}

//! Fixed-rate locomotion: steer towards a waypoint, or the target when
//! holding position.

use std::fmt::Debug;

use log::trace;

use super::Agent;
use crate::body::Actuator;
use crate::constants::MOTION_EPSILON;
use crate::roster::Roster;
use crate::vector_math::{flat_direction, flat_distance, signed_yaw_between};

impl<H: Copy + Eq + Debug> Agent<H> {
    /// Runs one physics step of `dt` seconds on `body`.
    ///
    /// While moving, the hull turns towards the current waypoint and drives
    /// forward scaled by how well it faces it. While holding, it only turns
    /// towards the live target, falling back to the waypoint when the target
    /// no longer resolves. Turning is capped at the configured turn speed.
    /// Reaching the steering point within the arrival threshold advances the
    /// waypoint index, never past the end of the path.
    pub fn drive(&mut self, dt: f32, body: &mut dyn Actuator, roster: &dyn Roster<H>) {
        if !self.enabled {
            return;
        }
        let Some(waypoint) = self.path.waypoint_clamped(self.waypoint) else {
            return;
        };
        let steer_to = if self.moving {
            waypoint
        } else {
            self.target
                .and_then(|t| roster.locate(t))
                .unwrap_or(waypoint)
        };

        let pose = body.pose();
        let facing = flat_direction(pose.facing);
        let direction = flat_direction(steer_to - pose.position);
        let locomotion = self.config.locomotion;

        if self.moving {
            let advance = facing.dot(direction).clamp(0.0, 1.0) * locomotion.linear_speed * dt;
            if advance > MOTION_EPSILON {
                body.move_by(facing * advance);
            }
        }

        let turn = signed_yaw_between(facing, direction);
        let step = turn.abs().min(locomotion.turn_speed() * dt);
        if step > MOTION_EPSILON {
            body.rotate_by(step.copysign(turn));
        }

        if flat_distance(body.pose().position, steer_to) < self.config.arrival_threshold
            && self.waypoint < self.path.len()
        {
            self.waypoint += 1;
            trace!(
                "agent {:?} reached waypoint {} of {}",
                self.myself,
                self.waypoint,
                self.path.len()
            );
        }
    }
}

//! Flee behaviour: retreat at an angle away from the current target.

use std::fmt::Debug;

use glam::Vec3;
use log::debug;
use rand::Rng;

use super::{Agent, AgentState, Surroundings};
use crate::vector_math::{flat_direction, rotate_about_up};

impl<H: Copy + Eq + Debug> Agent<H> {
    /// Plans a retreat and enters [`AgentState::Flee`] if a path exists.
    ///
    /// The direction towards the target is swung by a random angle in the
    /// configured range, to a random side, and scaled by a random distance.
    /// Without a path the agent keeps seeking.
    pub(super) fn start_fleeing(
        &mut self,
        world: &Surroundings<'_, H>,
        target_position: Vec3,
    ) -> AgentState {
        let position = world.pose.position;
        let towards = flat_direction(target_position - position);
        let swing = self.config.flee_angle_degrees.sample(&mut self.rng).to_radians();
        let side = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let distance = self.config.flee_distance.sample(&mut self.rng);
        let destination = position + rotate_about_up(towards, swing * side) * distance;

        match world.navigation.find_path(position, destination) {
            Some(path) => {
                debug!(
                    "agent {:?} fleeing to {destination} ({} waypoints)",
                    self.myself,
                    path.len()
                );
                self.adopt_path(path);
                AgentState::Flee
            }
            None => {
                debug!("agent {:?} has no retreat path; keeps seeking", self.myself);
                AgentState::Seek
            }
        }
    }

    pub(super) fn flee(&self) -> AgentState {
        if self.waypoint >= self.path.len() {
            debug!("agent {:?} finished retreating", self.myself);
            AgentState::Seek
        } else {
            AgentState::Flee
        }
    }
}

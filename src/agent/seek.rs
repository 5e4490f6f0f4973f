//! Seek behaviour: re-planning, target tracking and shot timing.

use std::fmt::Debug;

use glam::Vec3;
use log::debug;

use super::{Agent, AgentState, Surroundings};
use crate::navigation::Path;
use crate::vector_math::{flat_direction, flat_distance, flatten};
use crate::weapon::Weapon;

/// Best candidate found during a re-plan.
struct Plan<H> {
    target: H,
    destination: Vec3,
    path: Path,
}

impl<H: Copy + Eq + Debug> Agent<H> {
    pub(super) fn seek(
        &mut self,
        dt: f32,
        world: &Surroundings<'_, H>,
        weapon: &mut dyn Weapon,
    ) -> AgentState {
        if self.replan_timer > self.replan_interval {
            self.replan_timer = 0.0;
            self.replan(world);
        }

        // A destroyed target is skipped until the next re-plan replaces it.
        let Some(target_position) = self.target.and_then(|t| world.roster.locate(t)) else {
            return AgentState::Seek;
        };
        self.track_target(dt, target_position);

        let position = world.pose.position;
        let to_target = flatten(target_position - position);
        let distance = to_target.length();
        let alignment = flat_direction(world.pose.facing).dot(flat_direction(to_target));

        if weapon.is_charging() {
            let predicted = weapon.predicted_landing_point(weapon.charge_ratio());
            let reach = flat_distance(position, predicted);
            if reach >= distance - self.config.splash_allowance
                && alignment > self.config.facing_threshold
            {
                self.moving = false;
                weapon.stop_charging();
                self.shot_cooldown = self.config.shot_cooldown;
                debug!(
                    "agent {:?} released at {:?}: reach {reach:.2}, distance {distance:.2}",
                    self.myself, self.target
                );
                if self.stationary_time > self.config.stationary_flee_after {
                    return self.start_fleeing(world, target_position);
                }
            }
        } else if distance < self.max_shot_range
            && !world.navigation.raycast(position, target_position)
        {
            self.moving = false;
            if self.shot_cooldown <= 0.0 {
                debug!("agent {:?} charging at distance {distance:.2}", self.myself);
                weapon.start_charging();
            }
        }

        AgentState::Seek
    }

    /// Picks the registry entry with the shortest reachable path.
    ///
    /// Ties keep the earlier registry entry. When nothing is reachable the
    /// current target and path are left untouched.
    fn replan(&mut self, world: &Surroundings<'_, H>) {
        let from = world.pose.position;
        let mut shortest = f32::MAX;
        let mut best: Option<Plan<H>> = None;

        for &candidate in self.registry() {
            if candidate == self.myself {
                continue;
            }
            let Some(destination) = world.roster.locate(candidate) else {
                continue;
            };
            let Some(path) = world.navigation.find_path(from, destination) else {
                continue;
            };
            let length = path.length();
            if length < shortest {
                shortest = length;
                best = Some(Plan {
                    target: candidate,
                    destination,
                    path,
                });
            }
        }

        let Some(plan) = best else {
            debug!("agent {:?} found no reachable target", self.myself);
            return;
        };

        if self.target != Some(plan.target) {
            debug!(
                "agent {:?} switched target {:?} -> {:?} (path {shortest:.2})",
                self.myself, self.target, plan.target
            );
            self.target = Some(plan.target);
            self.last_target_position = plan.destination;
            self.stationary_time = 0.0;
        }
        self.adopt_path(plan.path);
    }

    fn track_target(&mut self, dt: f32, target_position: Vec3) {
        if target_position.distance(self.last_target_position) < self.config.stationary_epsilon {
            self.stationary_time += dt;
        } else {
            self.stationary_time = 0.0;
        }
        self.last_target_position = target_position;
    }
}

//! Autonomous controller for one AI tank.
//!
//! An [`Agent`] alternates between two states. In [`AgentState::Seek`] it
//! periodically plans a path to the nearest reachable opponent and decides
//! whether to drive, hold, charge or release its weapon. In
//! [`AgentState::Flee`] it follows a retreat path until the path runs out.
//! Decisions happen in [`Agent::think`] on the variable-rate frame; movement
//! happens in [`Agent::drive`] on the fixed physics step.
//!
//! Each agent draws its re-plan interval once, uniformly from the configured
//! range. The spread keeps a crowd of agents from querying the navigation
//! service on the same frame.

mod flee;
mod locomotion;
mod seek;
#[cfg(test)]
mod tests;

use std::fmt::Debug;

use glam::Vec3;
use log::debug;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::body::Pose;
use crate::config::AgentConfig;
use crate::navigation::{NavigationService, Path};
use crate::roster::Roster;
use crate::vector_math::flat_distance;
use crate::weapon::Weapon;

/// Behaviour the controller is currently running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AgentState {
    /// Hunt the nearest reachable opponent and shoot at it.
    #[default]
    Seek,
    /// Retreat along a path away from the current target.
    Flee,
}

/// What the agent can sense and query during a decision tick.
pub struct Surroundings<'a, H> {
    /// The agent's own pose.
    pub pose: Pose,
    /// Opponent positions.
    pub roster: &'a dyn Roster<H>,
    /// Path planning and line of sight.
    pub navigation: &'a dyn NavigationService,
}

/// Decision state of one AI-controlled actor.
///
/// `H` is the handle type used to refer to opponents. Handles are resolved
/// through a [`Roster`] each tick, so a destroyed opponent can never leave
/// the agent holding a dangling reference.
#[derive(Debug, Clone)]
pub struct Agent<H> {
    myself: H,
    config: AgentConfig,
    enabled: bool,
    state: AgentState,
    registry: Option<Vec<H>>,
    target: Option<H>,
    path: Path,
    waypoint: usize,
    moving: bool,
    replan_timer: f32,
    replan_interval: f32,
    shot_cooldown: f32,
    max_shot_range: f32,
    last_target_position: Vec3,
    stationary_time: f32,
    rng: SmallRng,
}

impl<H: Copy + Eq + Debug> Agent<H> {
    /// Creates an enabled agent in [`AgentState::Seek`].
    ///
    /// `myself` is the agent's own handle and is never selected as a target.
    /// The maximum shot range is measured once here, from `position` to the
    /// weapon's predicted landing point at full charge. `seed` drives the
    /// agent's private random stream: its re-plan interval and retreat
    /// jitter.
    #[must_use]
    pub fn new(
        myself: H,
        config: AgentConfig,
        weapon: &dyn Weapon,
        position: Vec3,
        seed: u64,
    ) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let replan_interval = config.replan_interval.sample(&mut rng);
        let max_shot_range = flat_distance(weapon.predicted_landing_point(1.0), position);
        debug!(
            "agent {myself:?} created: re-plan every {replan_interval:.3}s, max shot range {max_shot_range:.2}"
        );
        Self {
            myself,
            config,
            enabled: true,
            state: AgentState::Seek,
            registry: None,
            target: None,
            path: Path::empty(),
            waypoint: 0,
            moving: false,
            replan_timer: 0.0,
            replan_interval,
            shot_cooldown: 0.0,
            max_shot_range,
            last_target_position: Vec3::ZERO,
            stationary_time: 0.0,
            rng,
        }
    }

    /// Replaces the target registry with an externally supplied one.
    pub fn setup(&mut self, targets: impl IntoIterator<Item = H>) {
        self.registry = Some(targets.into_iter().collect());
    }

    /// Reports whether no registry has been supplied or discovered yet.
    #[must_use]
    pub const fn needs_discovery(&self) -> bool {
        self.registry.is_none()
    }

    /// Fills an unset registry with every handle `roster` knows.
    ///
    /// This is the fallback for standalone use; a registry supplied through
    /// [`Agent::setup`] is never overwritten.
    pub fn discover(&mut self, roster: &dyn Roster<H>) {
        if self.registry.is_none() {
            let handles = roster.handles();
            debug!("agent {:?} discovered {} targets", self.myself, handles.len());
            self.registry = Some(handles);
        }
    }

    /// Disables the controller; decisions and movement freeze.
    pub fn turn_off(&mut self) {
        self.enabled = false;
    }

    /// Re-enables the controller, starting over in [`AgentState::Seek`] with
    /// no target and no path.
    pub fn turn_on(&mut self) {
        self.enabled = true;
        self.reset();
    }

    fn reset(&mut self) {
        self.state = AgentState::Seek;
        self.target = None;
        self.path = Path::empty();
        self.waypoint = 0;
        self.moving = false;
        self.replan_timer = 0.0;
        self.shot_cooldown = 0.0;
        self.stationary_time = 0.0;
    }

    /// Runs one decision tick of `dt` seconds.
    ///
    /// Advances the shot cooldown and re-plan timer, then runs the handler
    /// of the current state, which yields the next state.
    pub fn think(&mut self, dt: f32, world: &Surroundings<'_, H>, weapon: &mut dyn Weapon) {
        if !self.enabled {
            return;
        }
        if self.shot_cooldown > 0.0 {
            self.shot_cooldown = (self.shot_cooldown - dt).max(0.0);
        }
        self.replan_timer += dt;

        self.state = match self.state {
            AgentState::Seek => self.seek(dt, world, weapon),
            AgentState::Flee => self.flee(),
        };
    }

    /// Handle of the actor this agent controls.
    #[must_use]
    pub const fn myself(&self) -> H {
        self.myself
    }

    /// Whether the controller is running.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current behaviour.
    #[must_use]
    pub const fn state(&self) -> AgentState {
        self.state
    }

    /// Opponent currently tracked, if any. The handle may no longer resolve.
    #[must_use]
    pub const fn target(&self) -> Option<H> {
        self.target
    }

    /// Registry of candidate targets, empty until supplied or discovered.
    #[must_use]
    pub fn registry(&self) -> &[H] {
        self.registry.as_deref().unwrap_or_default()
    }

    /// Path being followed.
    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }

    /// Index of the waypoint being steered towards, in `[0, path.len()]`.
    #[must_use]
    pub const fn waypoint_index(&self) -> usize {
        self.waypoint
    }

    /// Whether the agent drives along its path or holds position.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.moving
    }

    /// Seconds left before the next shot may be charged.
    #[must_use]
    pub const fn shot_cooldown(&self) -> f32 {
        self.shot_cooldown
    }

    /// Seconds the tracked target has stood still.
    #[must_use]
    pub const fn stationary_time(&self) -> f32 {
        self.stationary_time
    }

    /// This agent's fixed re-plan interval.
    #[must_use]
    pub const fn replan_interval(&self) -> f32 {
        self.replan_interval
    }

    /// Ground distance a fully charged shot covers.
    #[must_use]
    pub const fn max_shot_range(&self) -> f32 {
        self.max_shot_range
    }

    /// Tuning in use.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn adopt_path(&mut self, path: Path) {
        self.waypoint = path.len().min(1);
        self.path = path;
        self.moving = true;
    }
}

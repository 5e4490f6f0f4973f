//! ECS components and resources for AI-controlled tanks.
//! Covers targetable actors, the controller and launcher wrappers, and the
//! shared navigation service.
use bevy::prelude::*;

use crate::agent::Agent;
use crate::body::{Actuator, Pose};
use crate::navigation::{NavigationService, OpenGround};
use crate::weapon::ShellLauncher;

/// Marks an actor that pilots may select as a target.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Combatant;

/// Marks a destroyed or deactivated actor.
///
/// Inactive combatants drop out of every roster and inactive pilots stop
/// thinking and driving.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inactive;

/// The decision controller of an AI tank.
#[derive(Component, Debug, Clone, Deref, DerefMut)]
pub struct Pilot(pub Agent<Entity>);

/// The charge-and-release weapon of a tank.
#[derive(Component, Debug, Clone, Default, Deref, DerefMut)]
pub struct Launcher(pub ShellLauncher);

/// Navigation service shared by every pilot.
#[derive(Resource)]
pub struct Navigation(pub Box<dyn NavigationService + Send + Sync>);

impl Navigation {
    /// Wraps a navigation service.
    #[must_use]
    pub fn new(service: impl NavigationService + Send + Sync + 'static) -> Self {
        Self(Box::new(service))
    }

    /// The wrapped service.
    #[must_use]
    pub fn service(&self) -> &dyn NavigationService {
        &*self.0
    }
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new(OpenGround::unbounded())
    }
}

impl Actuator for Transform {
    fn pose(&self) -> Pose {
        Pose {
            position: self.translation,
            facing: self.forward().as_vec3(),
        }
    }

    fn move_by(&mut self, offset: Vec3) {
        self.translation += offset;
    }

    fn rotate_by(&mut self, angle: f32) {
        self.rotate_y(angle);
    }
}

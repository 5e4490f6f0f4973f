//! Shared fixtures for headless skirmish integration tests.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use skirmish::{Pilot, SkirmishPlugin};

/// Frame length used by every headless test app.
pub const FRAME: Duration = Duration::from_millis(16);

/// Builds an app with `MinimalPlugins`, a manual frame clock and the
/// skirmish plugin installed.
#[must_use]
pub fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
        .add_plugins(SkirmishPlugin);
    app
}

/// Runs `frames` updates.
pub fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

/// Runs updates until `done` holds or `max_frames` elapse; reports success.
pub fn run_until(app: &mut App, max_frames: usize, mut done: impl FnMut(&World) -> bool) -> bool {
    for _ in 0..max_frames {
        app.update();
        if done(app.world()) {
            return true;
        }
    }
    false
}

/// Clones the pilot of `tank`.
///
/// # Panics
/// Panics when `tank` has no pilot.
#[must_use]
pub fn pilot(app: &App, tank: Entity) -> Pilot {
    app.world()
        .get::<Pilot>(tank)
        .cloned()
        .expect("tank should carry a pilot")
}

/// Current translation of `entity`.
///
/// # Panics
/// Panics when `entity` has no transform.
#[must_use]
pub fn position(app: &App, entity: Entity) -> Vec3 {
    app.world()
        .get::<Transform>(entity)
        .map(|t| t.translation)
        .expect("entity should have a transform")
}

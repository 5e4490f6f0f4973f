//! Bevy plugin wiring pilots, launchers and locomotion into the schedule.
//!
//! Decisions run once per frame in `Update`, after launchers have been aimed
//! and charged for the frame. Locomotion runs on the fixed physics step in
//! `FixedUpdate`. Every system resolves targets through a fresh roster of
//! active [`Combatant`] positions, so destroyed actors drop out immediately.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use hashbrown::HashMap;
use log::info;

use crate::agent::Surroundings;
use crate::body::Actuator;
use crate::components::{Combatant, Inactive, Launcher, Navigation, Pilot};
use crate::weapon::Shot;

/// Filter selecting actors pilots may target.
type Targetable = (With<Combatant>, Without<Inactive>);

/// Event triggered for every shell a launcher releases.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ShotFired {
    /// Entity whose launcher fired.
    pub shooter: Entity,
    /// Muzzle position at release.
    pub origin: Vec3,
    /// Initial shell velocity.
    pub velocity: Vec3,
}

/// Running count of shots fired per entity.
#[derive(Resource, Debug, Default)]
pub struct ShotTally(HashMap<Entity, usize>);

impl ShotTally {
    /// Shots fired by `shooter` so far.
    #[must_use]
    pub fn shots_by(&self, shooter: Entity) -> usize {
        self.0.get(&shooter).copied().unwrap_or_default()
    }

    /// Shots fired by everyone.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }
}

fn roster_snapshot(targets: &Query<(Entity, &Transform), Targetable>) -> HashMap<Entity, Vec3> {
    targets
        .iter()
        .map(|(entity, transform)| (entity, transform.translation))
        .collect()
}

/// Turns pilots off when they become [`Inactive`] and back on, reset, when
/// the marker is removed.
pub fn pilot_activation_system(
    newly_inactive: Query<Entity, (With<Pilot>, Added<Inactive>)>,
    mut reactivated: RemovedComponents<Inactive>,
    mut pilots: Query<&mut Pilot>,
) {
    for entity in &newly_inactive {
        if let Ok(mut pilot) = pilots.get_mut(entity) {
            pilot.turn_off();
        }
    }
    for entity in reactivated.read() {
        if let Ok(mut pilot) = pilots.get_mut(entity) {
            pilot.turn_on();
        }
    }
}

/// Gives pilots that were never handed a registry every active combatant.
pub fn discover_targets_system(
    targets: Query<(Entity, &Transform), Targetable>,
    mut pilots: Query<&mut Pilot, Without<Inactive>>,
) {
    if !pilots.iter().any(|pilot| pilot.needs_discovery()) {
        return;
    }
    let roster = roster_snapshot(&targets);
    for mut pilot in &mut pilots {
        if pilot.needs_discovery() {
            pilot.discover(&roster);
        }
    }
}

/// Aims each launcher along its hull and advances any charge in progress.
pub fn advance_launchers_system(
    time: Res<Time>,
    mut launchers: Query<(&Transform, &mut Launcher), Without<Inactive>>,
) {
    let dt = time.delta_secs();
    for (transform, mut launcher) in &mut launchers {
        let pose = transform.pose();
        launcher.aim(pose.position, pose.facing);
        launcher.advance(dt);
    }
}

/// Runs one decision tick for every active pilot.
pub fn pilot_decision_system(
    time: Res<Time>,
    navigation: Res<Navigation>,
    targets: Query<(Entity, &Transform), Targetable>,
    mut pilots: Query<(&Transform, &mut Pilot, &mut Launcher), Without<Inactive>>,
) {
    let dt = time.delta_secs();
    let roster = roster_snapshot(&targets);
    for (transform, mut pilot, mut launcher) in &mut pilots {
        let world = Surroundings {
            pose: transform.pose(),
            roster: &roster,
            navigation: navigation.service(),
        };
        pilot.think(dt, &world, &mut launcher.0);
    }
}

/// Triggers [`ShotFired`] for every shell released this frame.
pub fn dispatch_shots_system(mut commands: Commands, mut launchers: Query<(Entity, &mut Launcher)>) {
    for (shooter, mut launcher) in &mut launchers {
        for Shot { origin, velocity } in launcher.take_shots() {
            commands.trigger(ShotFired {
                shooter,
                origin,
                velocity,
            });
        }
    }
}

/// Drives every active pilot's hull for one fixed step.
pub fn pilot_locomotion_system(
    time: Res<Time>,
    mut bodies: ParamSet<(
        Query<(Entity, &Transform), Targetable>,
        Query<(&mut Transform, &mut Pilot), Without<Inactive>>,
    )>,
) {
    let dt = time.delta_secs();
    let roster = roster_snapshot(&bodies.p0());
    for (mut transform, mut pilot) in &mut bodies.p1() {
        pilot.drive(dt, &mut *transform, &roster);
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn record_shot(event: On<ShotFired>, mut tally: ResMut<ShotTally>) {
    let ShotFired {
        shooter,
        origin,
        velocity,
    } = *event.event();
    info!(
        "{shooter:?} fired from {origin} at {:.1} u/s",
        velocity.length()
    );
    *tally.0.entry(shooter).or_default() += 1;
}

/// Bevy plugin running AI tanks.
///
/// Inserts a default [`Navigation`] (unbounded open ground) unless one is
/// already present, and a [`ShotTally`].
#[derive(Default)]
pub struct SkirmishPlugin;

impl Plugin for SkirmishPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Navigation>();
        app.init_resource::<ShotTally>();
        app.add_observer(record_shot);

        app.add_systems(
            Update,
            (
                pilot_activation_system,
                discover_targets_system,
                advance_launchers_system,
                pilot_decision_system,
                dispatch_shots_system,
            )
                .chain(),
        );
        app.add_systems(FixedUpdate, pilot_locomotion_system);
    }
}

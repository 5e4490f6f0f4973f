//! Helpers that spawn tanks and plain targets into a Bevy [`World`].

use bevy::prelude::*;

use crate::agent::Agent;
use crate::body::Actuator;
use crate::components::{Combatant, Launcher, Pilot};
use crate::config::SkirmishConfig;
use crate::weapon::ShellLauncher;

/// Spawns a targetable actor with no controller.
pub fn spawn_combatant(world: &mut World, position: Vec3) -> Entity {
    world
        .spawn((Combatant, Transform::from_translation(position)))
        .id()
}

/// Spawns an AI tank at `position`, turned `yaw` radians from Bevy's -Z
/// forward.
///
/// The tank is itself a [`Combatant`]. Its pilot has no registry and will
/// discover targets on its first frame unless [`Agent::setup`] is called.
/// `seed` feeds the pilot's private random stream.
pub fn spawn_ai_tank(
    world: &mut World,
    config: &SkirmishConfig,
    position: Vec3,
    yaw: f32,
    seed: u64,
) -> Entity {
    let transform = Transform::from_translation(position).with_rotation(Quat::from_rotation_y(yaw));
    let pose = transform.pose();
    let mut launcher = ShellLauncher::new(config.launcher);
    launcher.aim(pose.position, pose.facing);

    let entity = world.spawn((Combatant, transform)).id();
    let agent = Agent::new(entity, config.agent, &launcher, position, seed);
    world
        .entity_mut(entity)
        .insert((Pilot(agent), Launcher(launcher)));
    entity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentState;
    use rstest::rstest;

    #[rstest]
    fn tank_carries_pilot_launcher_and_marker() {
        let mut world = World::new();
        let tank = spawn_ai_tank(&mut world, &SkirmishConfig::default(), Vec3::ONE, 0.0, 3);
        let pilot = world.get::<Pilot>(tank).expect("pilot attached");
        assert_eq!(pilot.myself(), tank);
        assert_eq!(pilot.state(), AgentState::Seek);
        assert!(pilot.needs_discovery());
        assert!(pilot.max_shot_range() > 0.0);
        assert!(world.get::<Launcher>(tank).is_some());
        assert!(world.get::<Combatant>(tank).is_some());
    }

    #[rstest]
    fn combatant_has_no_pilot() {
        let mut world = World::new();
        let target = spawn_combatant(&mut world, Vec3::X);
        assert!(world.get::<Pilot>(target).is_none());
        assert_eq!(
            world.get::<Transform>(target).map(|t| t.translation),
            Some(Vec3::X)
        );
    }
}

use std::cell::Cell;

use approx::assert_relative_eq;
use glam::Vec3;
use hashbrown::HashMap;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rstest::{fixture, rstest};

use super::*;
use crate::body::{Actuator, Body};
use crate::config::Span;
use crate::navigation::{MockNavigationService, NavigationService, OpenGround};
use crate::weapon::{MockWeapon, Weapon};

const ME: u32 = 0;
const STEP: f32 = 1.0 / 60.0;

/// Weapon double with a fixed reach along +Z that records trigger use.
#[derive(Debug, Default)]
struct FakeWeapon {
    charging: bool,
    reach: f32,
    starts: usize,
    releases: usize,
}

impl FakeWeapon {
    fn with_reach(reach: f32) -> Self {
        Self {
            reach,
            ..Self::default()
        }
    }
}

impl Weapon for FakeWeapon {
    fn is_charging(&self) -> bool {
        self.charging
    }

    fn charge_ratio(&self) -> f32 {
        0.5
    }

    fn start_charging(&mut self) {
        self.charging = true;
        self.starts += 1;
    }

    fn stop_charging(&mut self) {
        if self.charging {
            self.charging = false;
            self.releases += 1;
        }
    }

    fn predicted_landing_point(&self, _charge_ratio: f32) -> Vec3 {
        Vec3::new(0.0, 0.0, self.reach)
    }
}

/// Straight-line planner that counts path queries.
#[derive(Debug, Default)]
struct CountingGround {
    queries: Cell<usize>,
}

impl NavigationService for CountingGround {
    fn find_path(&self, from: Vec3, to: Vec3) -> Option<Path> {
        self.queries.set(self.queries.get() + 1);
        OpenGround::unbounded().find_path(from, to)
    }

    fn raycast(&self, _from: Vec3, _to: Vec3) -> bool {
        false
    }
}

#[fixture]
fn config() -> AgentConfig {
    AgentConfig {
        replan_interval: Span::new(0.5, 0.5),
        ..AgentConfig::default()
    }
}

fn origin() -> Pose {
    Pose {
        position: Vec3::ZERO,
        facing: Vec3::Z,
    }
}

fn roster(entries: &[(u32, Vec3)]) -> HashMap<u32, Vec3> {
    entries.iter().copied().collect()
}

fn look<'a>(
    pose: Pose,
    roster: &'a HashMap<u32, Vec3>,
    navigation: &'a dyn NavigationService,
) -> Surroundings<'a, u32> {
    Surroundings {
        pose,
        roster,
        navigation,
    }
}

fn agent_with(config: AgentConfig, weapon: &dyn Weapon, targets: &[u32]) -> Agent<u32> {
    let mut agent = Agent::new(ME, config, weapon, Vec3::ZERO, 11);
    agent.setup(targets.iter().copied());
    agent
}

#[rstest]
#[case(vec![1, 2, 3], 2)]
#[case(vec![1, 3, 2], 3)]
fn selects_the_shortest_path_and_keeps_the_first_on_ties(
    config: AgentConfig,
    #[case] registry: Vec<u32>,
    #[case] expected: u32,
) {
    let mut weapon = FakeWeapon::with_reach(5.0);
    let mut agent = agent_with(config, &weapon, &registry);
    let roster = roster(&[
        (1, Vec3::new(0.0, 0.0, 30.0)),
        (2, Vec3::new(10.0, 0.0, 0.0)),
        (3, Vec3::new(-10.0, 0.0, 0.0)),
    ]);
    let nav = OpenGround::unbounded();

    agent.think(1.0, &look(origin(), &roster, &nav), &mut weapon);

    assert_eq!(agent.target(), Some(expected));
    assert_eq!(agent.path().len(), 2);
    assert_eq!(agent.waypoint_index(), 1);
    assert!(agent.is_moving());
    assert_eq!(weapon.starts, 0);
}

#[rstest]
fn skips_itself_and_unresolvable_handles(config: AgentConfig) {
    let mut weapon = FakeWeapon::with_reach(5.0);
    let mut agent = agent_with(config, &weapon, &[ME, 9, 4]);
    let roster = roster(&[(ME, Vec3::ZERO), (4, Vec3::new(0.0, 0.0, 40.0))]);

    agent.think(1.0, &look(origin(), &roster, &OpenGround::unbounded()), &mut weapon);

    assert_eq!(agent.target(), Some(4));
}

#[rstest]
fn keeps_the_previous_plan_when_nothing_is_reachable(config: AgentConfig) {
    let mut weapon = FakeWeapon::with_reach(5.0);
    let mut agent = agent_with(config, &weapon, &[1]);
    let roster = roster(&[(1, Vec3::new(0.0, 0.0, 30.0))]);
    agent.think(1.0, &look(origin(), &roster, &OpenGround::unbounded()), &mut weapon);
    let planned = agent.path().clone();

    let mut blocked = MockNavigationService::new();
    blocked.expect_find_path().returning(|_, _| None);
    blocked.expect_raycast().returning(|_, _| false);
    agent.think(1.0, &look(origin(), &roster, &blocked), &mut weapon);

    assert_eq!(agent.target(), Some(1));
    assert_eq!(agent.path(), &planned);
    assert_eq!(agent.state(), AgentState::Seek);
}

#[rstest]
fn fresh_agent_with_no_reachable_target_stays_idle(config: AgentConfig) {
    let mut weapon = FakeWeapon::with_reach(25.0);
    let mut agent = agent_with(config, &weapon, &[1, 2]);
    let roster = roster(&[(1, Vec3::Z), (2, Vec3::X)]);
    let mut nav = MockNavigationService::new();
    nav.expect_find_path().times(2).returning(|_, _| None);

    agent.think(1.0, &look(origin(), &roster, &nav), &mut weapon);

    assert_eq!(agent.state(), AgentState::Seek);
    assert_eq!(agent.target(), None);
    assert!(agent.path().is_empty());
    assert!(!agent.is_moving());
    assert_eq!(weapon.starts, 0);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(42)]
fn replans_no_more_often_than_its_interval(#[case] seed: u64) {
    let config = AgentConfig::default();
    let max_dt = 0.1;
    let mut weapon = FakeWeapon::with_reach(5.0);
    let mut agent = Agent::new(ME, config, &weapon, Vec3::ZERO, seed);
    agent.setup([1]);
    let interval = agent.replan_interval();
    assert!(config.replan_interval.contains(interval));

    let roster = roster(&[(1, Vec3::new(0.0, 0.0, 100.0))]);
    let nav = CountingGround::default();
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut clock = 0.0_f32;
    let mut last_replan = 0.0_f32;

    for _ in 0..500 {
        let dt = rng.gen_range(0.001..max_dt);
        clock += dt;
        let before = nav.queries.get();
        agent.think(dt, &look(origin(), &roster, &nav), &mut weapon);
        if nav.queries.get() > before {
            let gap = clock - last_replan;
            assert!(gap >= interval - 1e-4, "gap {gap} below interval {interval}");
            assert!(gap <= interval + max_dt + 1e-4, "gap {gap} overshoots {interval}");
            last_replan = clock;
        }
    }
    assert!(nav.queries.get() > 10);
}

#[rstest]
fn starts_charging_once_the_target_is_in_range(config: AgentConfig) {
    let mut weapon = MockWeapon::new();
    weapon
        .expect_predicted_landing_point()
        .returning(|_| Vec3::new(0.0, 0.0, 25.0));
    weapon.expect_is_charging().return_const(false);
    weapon.expect_start_charging().times(1).return_const(());
    let mut agent = agent_with(config, &weapon, &[1]);
    let roster = roster(&[(1, Vec3::new(0.0, 0.0, 20.0))]);

    agent.think(1.0, &look(origin(), &roster, &OpenGround::unbounded()), &mut weapon);

    assert_relative_eq!(agent.max_shot_range(), 25.0);
    assert!(!agent.is_moving());
    assert_eq!(agent.state(), AgentState::Seek);
}

#[rstest]
fn blocked_line_of_sight_keeps_the_agent_driving(config: AgentConfig) {
    let mut weapon = FakeWeapon::with_reach(25.0);
    let mut agent = agent_with(config, &weapon, &[1]);
    let roster = roster(&[(1, Vec3::new(0.0, 0.0, 20.0))]);
    let mut nav = MockNavigationService::new();
    nav.expect_find_path()
        .returning(|from, to| Some(Path::new(vec![from, to])));
    nav.expect_raycast().returning(|_, _| true);

    agent.think(1.0, &look(origin(), &roster, &nav), &mut weapon);

    assert!(agent.is_moving());
    assert_eq!(weapon.starts, 0);
}

#[rstest]
#[case(0.995, 18.0, true)]
#[case(0.98, 18.0, false)]
#[case(0.995, 16.0, false)]
fn releases_when_the_prediction_covers_the_target(
    config: AgentConfig,
    #[case] alignment: f32,
    #[case] reach: f32,
    #[case] released: bool,
) {
    let mut weapon = MockWeapon::new();
    weapon
        .expect_predicted_landing_point()
        .returning(move |ratio| Vec3::new(0.0, 0.0, if ratio >= 1.0 { 25.0 } else { reach }));
    weapon.expect_is_charging().return_const(true);
    weapon.expect_charge_ratio().return_const(0.6_f32);
    weapon
        .expect_stop_charging()
        .times(usize::from(released))
        .return_const(());
    let mut agent = agent_with(config, &weapon, &[1]);
    let roster = roster(&[(1, Vec3::new(0.0, 0.0, 19.0))]);
    let pose = Pose {
        position: Vec3::ZERO,
        facing: Vec3::new((1.0 - alignment * alignment).sqrt(), 0.0, alignment),
    };

    agent.think(1.0, &look(pose, &roster, &OpenGround::unbounded()), &mut weapon);

    if released {
        assert_relative_eq!(agent.shot_cooldown(), agent.config().shot_cooldown);
        assert!(!agent.is_moving());
    } else {
        assert_relative_eq!(agent.shot_cooldown(), 0.0);
    }
    assert_eq!(agent.state(), AgentState::Seek);
}

#[rstest]
fn cooldown_runs_down_and_blocks_recharging(config: AgentConfig) {
    let mut weapon = FakeWeapon::with_reach(25.0);
    let mut agent = agent_with(config, &weapon, &[1]);
    let roster = roster(&[(1, Vec3::new(0.0, 0.0, 19.0))]);
    let nav = OpenGround::unbounded();
    let world = look(origin(), &roster, &nav);

    agent.think(1.0, &world, &mut weapon);
    agent.think(0.1, &world, &mut weapon);
    assert_eq!(weapon.releases, 1);
    assert_relative_eq!(agent.shot_cooldown(), agent.config().shot_cooldown);

    agent.think(0.5, &world, &mut weapon);
    assert_relative_eq!(agent.shot_cooldown(), 1.5, epsilon = 1e-6);
    assert_eq!(weapon.starts, 1);
    assert!(!agent.is_moving());

    agent.think(5.0, &world, &mut weapon);
    assert_relative_eq!(agent.shot_cooldown(), 0.0);
    assert_eq!(weapon.starts, 2);
}

#[rstest]
#[case(1.5, AgentState::Flee)]
#[case(0.9, AgentState::Seek)]
fn firing_at_a_stationary_target_triggers_a_retreat(
    config: AgentConfig,
    #[case] second_tick: f32,
    #[case] expected: AgentState,
) {
    let mut weapon = FakeWeapon::with_reach(25.0);
    let mut agent = agent_with(config, &weapon, &[1]);
    let target = Vec3::new(0.0, 0.0, 19.0);
    let roster = roster(&[(1, target)]);
    let nav = OpenGround::unbounded();
    let world = look(origin(), &roster, &nav);

    agent.think(1.0, &world, &mut weapon);
    assert!(weapon.charging);
    agent.think(second_tick, &world, &mut weapon);

    assert_eq!(weapon.releases, 1);
    assert_relative_eq!(agent.stationary_time(), 1.0 + second_tick, epsilon = 1e-6);
    assert_eq!(agent.state(), expected);
    if expected == AgentState::Flee {
        let retreat = agent.path().waypoints().last().copied().unwrap_or_default();
        let distance = retreat.length();
        assert!((5.0 - 1e-4..=20.0 + 1e-4).contains(&distance), "retreat {distance}");
        assert!(retreat.normalize().dot(target.normalize()) <= 1e-4);
        assert!(agent.is_moving());
        assert_eq!(agent.waypoint_index(), 1);
    }
}

#[rstest]
fn moving_target_resets_the_stationary_clock(config: AgentConfig) {
    let mut weapon = FakeWeapon::with_reach(5.0);
    let mut agent = agent_with(config, &weapon, &[1]);
    let nav = OpenGround::unbounded();

    let first = roster(&[(1, Vec3::new(0.0, 0.0, 30.0))]);
    agent.think(1.0, &look(origin(), &first, &nav), &mut weapon);
    assert_relative_eq!(agent.stationary_time(), 1.0);

    let moved = roster(&[(1, Vec3::new(0.5, 0.0, 30.0))]);
    agent.think(0.1, &look(origin(), &moved, &nav), &mut weapon);
    assert_relative_eq!(agent.stationary_time(), 0.0);
}

#[rstest]
fn switching_targets_resets_the_stationary_clock(config: AgentConfig) {
    let mut weapon = FakeWeapon::with_reach(5.0);
    let mut agent = agent_with(config, &weapon, &[1, 2]);
    let nav = OpenGround::unbounded();

    let before = roster(&[(1, Vec3::new(0.0, 0.0, 30.0))]);
    agent.think(1.0, &look(origin(), &before, &nav), &mut weapon);
    agent.think(0.2, &look(origin(), &before, &nav), &mut weapon);
    assert_relative_eq!(agent.stationary_time(), 1.2, epsilon = 1e-6);

    let after = roster(&[
        (1, Vec3::new(0.0, 0.0, 30.0)),
        (2, Vec3::new(0.0, 0.0, 12.0)),
    ]);
    agent.think(0.4, &look(origin(), &after, &nav), &mut weapon);
    assert_eq!(agent.target(), Some(2));
    assert_relative_eq!(agent.stationary_time(), 0.4, epsilon = 1e-6);
}

#[rstest]
fn destroyed_target_is_skipped_until_the_next_replan(config: AgentConfig) {
    let mut weapon = FakeWeapon::with_reach(25.0);
    let mut agent = agent_with(config, &weapon, &[1, 2]);
    let nav = OpenGround::unbounded();

    let both = roster(&[
        (1, Vec3::new(0.0, 0.0, 40.0)),
        (2, Vec3::new(0.0, 0.0, 60.0)),
    ]);
    agent.think(1.0, &look(origin(), &both, &nav), &mut weapon);
    assert_eq!(agent.target(), Some(1));

    let survivors = roster(&[(2, Vec3::new(0.0, 0.0, 60.0))]);
    agent.think(0.1, &look(origin(), &survivors, &nav), &mut weapon);
    assert_eq!(agent.target(), Some(1));
    assert_eq!(agent.state(), AgentState::Seek);
    assert_eq!(weapon.starts, 0);

    agent.think(0.5, &look(origin(), &survivors, &nav), &mut weapon);
    assert_eq!(agent.target(), Some(2));
}

#[rstest]
fn retreat_without_a_path_keeps_seeking(config: AgentConfig) {
    let mut weapon = FakeWeapon::with_reach(25.0);
    let mut agent = agent_with(config, &weapon, &[1]);
    let target = Vec3::new(0.0, 0.0, 19.0);
    let roster = roster(&[(1, target)]);
    let mut nav = MockNavigationService::new();
    nav.expect_find_path()
        .returning(move |from, to| (to == target).then(|| Path::new(vec![from, to])));
    nav.expect_raycast().returning(|_, _| false);
    let world = look(origin(), &roster, &nav);

    agent.think(1.0, &world, &mut weapon);
    agent.think(1.5, &world, &mut weapon);

    assert_eq!(weapon.releases, 1);
    assert_eq!(agent.state(), AgentState::Seek);
    assert_eq!(agent.path().waypoints().last(), Some(&target));
}

#[rstest]
fn empty_retreat_path_ends_the_retreat_at_once(config: AgentConfig) {
    let mut weapon = FakeWeapon::with_reach(25.0);
    let mut agent = agent_with(config, &weapon, &[1]);
    let target = Vec3::new(0.0, 0.0, 19.0);
    let roster = roster(&[(1, target)]);
    let mut nav = MockNavigationService::new();
    nav.expect_find_path().returning(move |from, to| {
        Some(if to == target {
            Path::new(vec![from, to])
        } else {
            Path::empty()
        })
    });
    nav.expect_raycast().returning(|_, _| false);
    let world = look(origin(), &roster, &nav);

    agent.think(1.0, &world, &mut weapon);
    agent.think(1.5, &world, &mut weapon);
    assert_eq!(agent.state(), AgentState::Flee);
    assert_eq!(agent.waypoint_index(), 0);

    agent.think(STEP, &world, &mut weapon);
    assert_eq!(agent.state(), AgentState::Seek);
}

#[rstest]
fn retreat_ends_once_the_last_waypoint_is_reached(config: AgentConfig) {
    let mut weapon = FakeWeapon::with_reach(25.0);
    let mut agent = agent_with(config, &weapon, &[1]);
    let roster = roster(&[(1, Vec3::new(0.0, 0.0, 19.0))]);
    let nav = OpenGround::unbounded();
    let mut body = Body::default();

    agent.think(1.0, &look(body.pose(), &roster, &nav), &mut weapon);
    agent.think(1.5, &look(body.pose(), &roster, &nav), &mut weapon);
    assert_eq!(agent.state(), AgentState::Flee);
    let retreat = agent.path().waypoints().last().copied().unwrap_or_default();

    let mut steps = 0;
    while agent.state() == AgentState::Flee && steps < 900 {
        agent.drive(STEP, &mut body, &roster);
        agent.think(STEP, &look(body.pose(), &roster, &nav), &mut weapon);
        steps += 1;
    }

    assert_eq!(agent.state(), AgentState::Seek);
    assert_eq!(agent.waypoint_index(), agent.path().len());
    assert!(body.position.distance(retreat) < config.arrival_threshold + 0.25);
}

#[rstest]
fn waypoint_advances_only_within_the_arrival_threshold(config: AgentConfig) {
    let mut weapon = FakeWeapon::with_reach(5.0);
    let mut agent = agent_with(config, &weapon, &[1]);
    let roster = roster(&[(1, Vec3::new(0.0, 0.0, 10.0))]);
    agent.think(1.0, &look(origin(), &roster, &OpenGround::unbounded()), &mut weapon);

    let mut body = Body::default();
    agent.drive(STEP, &mut body, &roster);
    assert_eq!(agent.waypoint_index(), 1);
    assert_relative_eq!(body.position.z, 12.0 * STEP, epsilon = 1e-5);

    body.position = Vec3::new(0.0, 0.0, 9.8);
    agent.drive(STEP, &mut body, &roster);
    assert_eq!(agent.waypoint_index(), 2);

    agent.drive(STEP, &mut body, &roster);
    assert_eq!(agent.waypoint_index(), 2);
}

#[rstest]
fn holding_agent_turns_towards_the_live_target(config: AgentConfig) {
    let mut weapon = FakeWeapon::with_reach(25.0);
    let mut agent = agent_with(config, &weapon, &[1]);
    let mut roster = roster(&[(1, Vec3::new(10.0, 0.0, 0.0))]);
    agent.think(1.0, &look(origin(), &roster, &OpenGround::unbounded()), &mut weapon);
    assert!(!agent.is_moving());

    let mut body = Body::default();
    agent.drive(0.1, &mut body, &roster);
    assert_eq!(body.position, Vec3::ZERO);
    assert_relative_eq!(body.yaw, std::f32::consts::PI * 0.1, epsilon = 1e-5);

    roster.insert(1, Vec3::new(-10.0, 0.0, 0.0));
    let yaw = body.yaw;
    agent.drive(0.1, &mut body, &roster);
    assert!(body.yaw < yaw);
    assert_eq!(body.position, Vec3::ZERO);
}

#[rstest]
fn drive_without_a_path_does_nothing(config: AgentConfig) {
    let weapon = FakeWeapon::with_reach(5.0);
    let mut agent = agent_with(config, &weapon, &[]);
    let mut body = Body::new(Vec3::ONE, 0.3);
    agent.drive(STEP, &mut body, &roster(&[]));
    assert_eq!(body, Body::new(Vec3::ONE, 0.3));
}

#[rstest]
fn turned_off_agent_freezes_and_turning_on_starts_over(config: AgentConfig) {
    let mut weapon = FakeWeapon::with_reach(5.0);
    let mut agent = agent_with(config, &weapon, &[1]);
    let roster = roster(&[(1, Vec3::new(0.0, 0.0, 30.0))]);
    let nav = OpenGround::unbounded();
    agent.think(1.0, &look(origin(), &roster, &nav), &mut weapon);
    assert_eq!(agent.target(), Some(1));

    agent.turn_off();
    let mut idle = MockWeapon::new();
    agent.think(1.0, &look(origin(), &roster, &nav), &mut idle);
    let mut body = Body::default();
    agent.drive(STEP, &mut body, &roster);
    assert_eq!(body, Body::default());
    assert!(!agent.is_enabled());

    agent.turn_on();
    assert!(agent.is_enabled());
    assert_eq!(agent.state(), AgentState::Seek);
    assert_eq!(agent.target(), None);
    assert!(agent.path().is_empty());
    assert_eq!(agent.registry(), &[1]);
}

#[rstest]
fn discovery_fills_only_an_unset_registry(config: AgentConfig) {
    let weapon = FakeWeapon::with_reach(5.0);
    let mut agent = Agent::new(ME, config, &weapon, Vec3::ZERO, 5);
    assert!(agent.needs_discovery());
    assert!(agent.registry().is_empty());

    agent.discover(&roster(&[(ME, Vec3::ZERO), (7, Vec3::X)]));
    assert!(!agent.needs_discovery());
    assert_eq!(agent.registry(), &[ME, 7]);

    agent.discover(&roster(&[(8, Vec3::X)]));
    assert_eq!(agent.registry().len(), 2);

    agent.setup([8]);
    assert_eq!(agent.registry(), &[8]);
}

#[rstest]
fn discovered_ties_go_to_the_lowest_handle(config: AgentConfig) {
    let mut weapon = FakeWeapon::with_reach(5.0);
    let nav = OpenGround::unbounded();
    let equidistant = roster(&[
        (12, Vec3::new(-8.0, 0.0, -6.0)),
        (5, Vec3::new(6.0, 0.0, 8.0)),
        (9, Vec3::new(0.0, 0.0, -10.0)),
        (1, Vec3::new(-6.0, 0.0, 8.0)),
        (7, Vec3::new(10.0, 0.0, 0.0)),
        (3, Vec3::new(8.0, 0.0, -6.0)),
        (11, Vec3::new(-10.0, 0.0, 0.0)),
        (2, Vec3::new(0.0, 0.0, 10.0)),
    ]);

    for seed in 0..4 {
        let mut agent = Agent::new(ME, config, &weapon, Vec3::ZERO, seed);
        agent.discover(&equidistant);
        agent.think(1.0, &look(origin(), &equidistant, &nav), &mut weapon);
        assert_eq!(agent.target(), Some(1), "seed {seed}");
    }
}

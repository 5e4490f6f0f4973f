//! Headless skirmish runner.
//!
//! Places AI tanks in a ring, steps the app at a fixed frame duration and
//! reports the shots each tank fired.
use std::f32::consts::TAU;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;
use log::info;
use skirmish::vector_math::signed_yaw_between;
use skirmish::{
    init_logging, spawn_ai_tank, Navigation, OpenGround, Pilot, ShotTally, SkirmishConfig,
    SkirmishPlugin,
};

/// Headless skirmish between AI tanks
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Number of tanks
    #[arg(short, long, default_value_t = 4)]
    agents: usize,
    /// Base seed; tank `i` uses `seed + i`
    #[arg(short, long, default_value_t = 7)]
    seed: u64,
    /// Frames to simulate
    #[arg(short, long, default_value_t = 1200)]
    frames: u32,
    /// Frame duration in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Half the side length of the square arena
    #[arg(long, default_value_t = 40.0)]
    arena: f32,
    /// JSON tuning file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Places tanks evenly on a circle, each facing the centre.
fn place_tanks(world: &mut World, config: &SkirmishConfig, args: &Args) -> Vec<Entity> {
    let radius = args.arena * 0.6;
    let count = args.agents;
    (0..count)
        .map(|i| {
            #[expect(
                clippy::cast_precision_loss,
                reason = "tank counts are small enough to be exact in f32"
            )]
            let angle = TAU * i as f32 / count as f32;
            let position = Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin());
            let yaw = signed_yaw_between(Vec3::NEG_Z, -position);
            spawn_ai_tank(world, config, position, yaw, args.seed.wrapping_add(i as u64))
        })
        .collect()
}

fn report(world: &World, tanks: &[Entity]) {
    let tally = world.resource::<ShotTally>();
    for &tank in tanks {
        let Some(pilot) = world.get::<Pilot>(tank) else {
            continue;
        };
        let position = world
            .get::<Transform>(tank)
            .map(|t| t.translation)
            .unwrap_or_default();
        info!(
            "{tank:?}: {:?} target {:?} at {position:.2}, {} shots",
            pilot.state(),
            pilot.target(),
            tally.shots_by(tank)
        );
    }
    info!("{} shots fired in total", tally.total());
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => SkirmishConfig::load(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => SkirmishConfig::default(),
    };
    ensure!(args.agents >= 2, "a skirmish needs at least two tanks");
    ensure!(args.arena > 0.0, "arena half-extent must be positive");

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
            args.frame_ms,
        )))
        .insert_resource(Navigation::new(OpenGround::bounded(args.arena)))
        .add_plugins(SkirmishPlugin);

    let tanks = place_tanks(app.world_mut(), &config, &args);
    info!(
        "simulating {} tanks for {} frames of {} ms",
        tanks.len(),
        args.frames,
        args.frame_ms
    );
    for _ in 0..args.frames {
        app.update();
    }

    report(app.world(), &tanks);
    Ok(())
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Sanctuary encounter.
//!
//! Usage:
//!   sanctuary [--config settings.toml] [--variant gauntlet] [--seed 42]
//!   sanctuary --headless 90 --step-ms 16.667

mod config;
mod scene;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use sanctuary_core::{
    EncounterOutcome, EncounterVariant, Event, PlayerInput, Stage, WINDOW_TITLE,
};
use sanctuary_rendering::{visuals, FrameSimulationBreakdown, Presentation, RenderingBackend};
use sanctuary_rendering_macroquad::MacroquadBackend;
use sanctuary_system_encounter::Encounter;
use sanctuary_world::query;
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use crate::config::Settings;

/// Longest frame delta handed to the simulation in interactive runs.
const MAX_FRAME_STEP: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "sanctuary")]
#[command(about = "Bullet-hell boss encounter with phase cycling and survival interludes")]
struct CliArgs {
    /// TOML settings file with `[encounter]` and `[display]` sections
    #[arg(long)]
    config: Option<PathBuf>,
    /// Encounter variant, overriding the settings file
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,
    /// Seed for the pattern random source; drawn from entropy when absent
    #[arg(long)]
    seed: Option<u64>,
    /// Synchronise presentation with the display refresh rate
    #[arg(long, value_enum)]
    vsync: Option<Toggle>,
    /// Print frame timing once per second
    #[arg(long)]
    show_fps: bool,
    /// Simulate this many seconds without a window and print a summary
    #[arg(long)]
    headless: Option<f32>,
    /// Fixed step used by headless runs, in milliseconds
    #[arg(long, default_value_t = 16.667)]
    step_ms: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum VariantArg {
    Sanctuary,
    Gauntlet,
}

impl From<VariantArg> for EncounterVariant {
    fn from(value: VariantArg) -> Self {
        match value {
            VariantArg::Sanctuary => Self::Sanctuary,
            VariantArg::Gauntlet => Self::Gauntlet,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Toggle {
    On,
    Off,
}

/// Entry point for the Sanctuary command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = CliArgs::parse();
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(variant) = args.variant {
        settings.encounter.variant = variant.into();
    }
    if let Some(vsync) = args.vsync {
        settings.display.vsync = vsync == Toggle::On;
    }
    settings.display.show_fps |= args.show_fps;

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, variant = ?settings.encounter.variant, "starting encounter");
    let encounter = Encounter::new(settings.encounter.clone(), ChaCha8Rng::seed_from_u64(seed));

    match args.headless {
        Some(seconds) => {
            let summary = run_headless(encounter, seconds, args.step_ms)?;
            summary.print(seed);
            Ok(())
        }
        None => run_interactive(encounter, &settings),
    }
}

fn run_interactive(mut encounter: Encounter<ChaCha8Rng>, settings: &Settings) -> Result<()> {
    let scene = scene::initial_scene(encounter.world())?;
    let presentation = Presentation::new(WINDOW_TITLE, visuals::LETTERBOX, scene);
    let display = settings.display;
    let backend = MacroquadBackend::new()
        .with_vsync(display.vsync)
        .with_show_fps(display.show_fps)
        .with_window_size(display.window_width, display.window_height);

    backend.run(presentation, move |dt, input, scene| {
        let simulation_start = Instant::now();
        let _ = encounter.step(dt.min(MAX_FRAME_STEP), &PlayerInput::from(input));
        let simulation = simulation_start.elapsed();

        let population_start = Instant::now();
        scene::populate_scene(encounter.world(), scene);
        FrameSimulationBreakdown {
            simulation,
            scene_population: population_start.elapsed(),
        }
    })
}

fn run_headless(
    mut encounter: Encounter<ChaCha8Rng>,
    seconds: f32,
    step_ms: f32,
) -> Result<HeadlessSummary> {
    if !(step_ms > 0.0) {
        bail!("--step-ms must be positive (received {step_ms})");
    }
    if !(seconds >= 0.0) {
        bail!("--headless must not be negative (received {seconds})");
    }

    let step = Duration::from_secs_f32(step_ms / 1_000.0);
    let steps = (seconds * 1_000.0 / step_ms).ceil() as u64;
    let idle = PlayerInput::default();
    let mut summary = HeadlessSummary::default();

    for _ in 0..steps {
        for event in encounter.step(step, &idle) {
            summary.record(event);
        }
        summary.steps += 1;
        if query::outcome(encounter.world()).is_terminal() {
            break;
        }
    }

    let world = encounter.world();
    summary.elapsed = query::elapsed(world);
    summary.outcome = query::outcome(world);
    summary.player_health = query::player(world).health;
    summary.boss_health = query::boss(world).health;
    summary.live_projectiles = query::projectile_count(world);
    Ok(summary)
}

/// Tallies of a headless run.
#[derive(Clone, Debug, Default, PartialEq)]
struct HeadlessSummary {
    steps: u64,
    elapsed: f32,
    outcome: EncounterOutcome,
    phase_changes: u32,
    survival_interludes: u32,
    hits_taken: u32,
    shard_bursts: u32,
    turrets_placed: u32,
    player_health: f32,
    boss_health: f32,
    live_projectiles: usize,
}

impl HeadlessSummary {
    fn record(&mut self, event: &Event) {
        match event {
            Event::BossPhaseChanged { .. } => self.phase_changes += 1,
            Event::BossStageChanged {
                to: Stage::SurvivalWarning { .. },
                ..
            } => self.survival_interludes += 1,
            Event::PlayerDamaged { .. } => self.hits_taken += 1,
            Event::ShardBurst { .. } => self.shard_bursts += 1,
            Event::TurretPlaced { .. } => self.turrets_placed += 1,
            _ => {}
        }
    }

    fn print(&self, seed: u64) {
        println!("=== ENCOUNTER SUMMARY ===");
        println!("  Seed:        {seed}");
        println!("  Outcome:     {:?}", self.outcome);
        println!("  Simulated:   {:.2}s over {} steps", self.elapsed, self.steps);
        println!("  Phases:      {} changes", self.phase_changes);
        println!("  Interludes:  {}", self.survival_interludes);
        println!("  Hits taken:  {}", self.hits_taken);
        println!("  Bursts:      {}", self.shard_bursts);
        println!("  Turrets:     {}", self.turrets_placed);
        println!("  Player HP:   {:.0}", self.player_health);
        println!("  Boss HP:     {:.0}", self.boss_health);
        println!("  Projectiles: {}", self.live_projectiles);
    }
}

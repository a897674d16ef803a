#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile pattern generation keyed by the boss phase and stage.
//!
//! Every routine owns named accumulators; nothing is kept in hidden global
//! state. A tick's emissions are batched into a single
//! [`Command::SpawnProjectiles`].

mod normal;
mod sentinel;
mod survival;

use sanctuary_core::{
    ArenaTuning, BossFrame, Command, Corridor, EncounterConfig, HazardTuning, Phase,
    ProjectileSpec, RandomSource, Stage, SurvivalTier, Vec2,
};

use normal::{Muzzle, NormalCadence};
use sentinel::SentinelCadence;
use survival::{knife_corridor, SurvivalCadence};

pub use survival::tower_corners;

/// Emits projectiles and hazards for the current boss frame.
#[derive(Clone, Debug)]
pub struct PatternGenerator {
    arena: ArenaTuning,
    hazards: HazardTuning,
    cadence: f32,
    normal: NormalCadence,
    survival: SurvivalCadence,
    sentinel: SentinelCadence,
    corridor: Option<Corridor>,
}

impl PatternGenerator {
    /// Creates a generator with every accumulator and rotation at zero.
    #[must_use]
    pub fn new(config: &EncounterConfig) -> Self {
        Self {
            arena: config.arena,
            hazards: config.hazards,
            cadence: config.cycle.cadence,
            normal: NormalCadence::default(),
            survival: SurvivalCadence::default(),
            sentinel: SentinelCadence::default(),
            corridor: None,
        }
    }

    /// Returns every accumulator, rotation and the corridor flag to zero.
    pub fn reset(&mut self) {
        self.normal = NormalCadence::default();
        self.survival = SurvivalCadence::default();
        self.sentinel = SentinelCadence::default();
        self.corridor = None;
    }

    /// Runs the routine selected by `frame` for `dt` seconds.
    ///
    /// Nothing is emitted while the boss telegraphs. Entering the active stage
    /// restarts the regular cadence; entering an interlude restarts its timers.
    pub fn handle<R>(
        &mut self,
        frame: &BossFrame,
        dt: f32,
        player: Vec2,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) where
        R: RandomSource + ?Sized,
    {
        match frame.entered {
            Some(Stage::Active) => {
                self.normal.spawn_timer = 0.0;
                self.sentinel.restart();
            }
            Some(Stage::Survival { .. }) => self.survival.restart(),
            _ => {}
        }

        self.sync_corridor(frame.stage, out);

        let mut batch = Vec::new();
        match frame.stage {
            Stage::Active => self.run_phase(frame, dt, player, rng, &mut batch, out),
            Stage::Survival { tier } => self.run_survival(tier, frame, dt, rng, &mut batch),
            Stage::Warning | Stage::SurvivalWarning { .. } => {}
        }

        if !batch.is_empty() {
            tracing::trace!(count = batch.len(), phase = frame.phase.label(), "pattern emitted");
            out.push(Command::SpawnProjectiles { projectiles: batch });
        }
    }

    fn sync_corridor(&mut self, stage: Stage, out: &mut Vec<Command>) {
        let wanted = match stage {
            Stage::Survival { tier } if tier == SurvivalTier::FIRST => {
                Some(knife_corridor(&self.arena))
            }
            _ => None,
        };
        if wanted != self.corridor {
            self.corridor = wanted;
            out.push(Command::SetCorridor { corridor: wanted });
        }
    }

    fn run_phase<R>(
        &mut self,
        frame: &BossFrame,
        dt: f32,
        player: Vec2,
        rng: &mut R,
        batch: &mut Vec<ProjectileSpec>,
        out: &mut Vec<Command>,
    ) where
        R: RandomSource + ?Sized,
    {
        if frame.phase == Phase::Sentinel {
            self.sentinel
                .advance(dt, &self.arena, &self.hazards, rng, out);
            return;
        }

        self.normal.spawn_timer += dt;
        if self.normal.spawn_timer > self.cadence {
            let muzzle = Muzzle {
                boss: frame.position,
                player,
            };
            self.normal.spawn_timer =
                self.normal
                    .fire(frame.phase, muzzle, &self.arena, rng, batch);
        }
    }

    fn run_survival<R>(
        &mut self,
        tier: SurvivalTier,
        frame: &BossFrame,
        dt: f32,
        rng: &mut R,
        batch: &mut Vec<ProjectileSpec>,
    ) where
        R: RandomSource + ?Sized,
    {
        self.survival.spawn_timer += dt;
        let boss = frame.position;
        match tier.get() {
            1 => self
                .survival
                .knife_wall(dt, boss, &self.arena, rng, batch),
            2 => self
                .survival
                .cross_streams(boss, &self.arena, rng, batch),
            _ => self.survival.miasma_towers(
                frame.stage_elapsed,
                boss,
                &self.arena,
                rng,
                batch,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(u32);

    impl RandomSource for Fixed {
        fn next_below(&mut self, upper: u32) -> u32 {
            self.0.min(upper.saturating_sub(1))
        }

        fn next_unit(&mut self) -> f32 {
            0.5
        }
    }

    fn active(phase: Phase, position: Vec2) -> BossFrame {
        BossFrame {
            position,
            phase,
            stage: Stage::Active,
            phase_elapsed: 0.0,
            stage_elapsed: 0.0,
            entered: None,
        }
    }

    fn spawned(out: &[Command]) -> Vec<ProjectileSpec> {
        out.iter()
            .filter_map(|command| match command {
                Command::SpawnProjectiles { projectiles } => Some(projectiles.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    #[test]
    fn nothing_fires_before_the_cadence_elapses() {
        let mut generator = PatternGenerator::new(&EncounterConfig::default());
        let mut out = Vec::new();
        let frame = active(Phase::Spiral, Vec2::new(960.0, 540.0));
        generator.handle(&frame, 0.1, Vec2::ZERO, &mut Fixed(0), &mut out);
        assert!(out.is_empty());
        generator.handle(&frame, 0.05, Vec2::ZERO, &mut Fixed(0), &mut out);
        assert_eq!(spawned(&out).len(), 12);
    }

    #[test]
    fn telegraph_stages_emit_nothing() {
        let mut generator = PatternGenerator::new(&EncounterConfig::default());
        let mut out = Vec::new();
        let mut frame = active(Phase::Shotgun, Vec2::new(960.0, 540.0));
        frame.stage = Stage::Warning;
        for _ in 0..100 {
            generator.handle(&frame, 0.05, Vec2::ZERO, &mut Fixed(0), &mut out);
        }
        assert!(out.is_empty());
    }

    #[test]
    fn entering_active_restarts_the_cadence() {
        let mut generator = PatternGenerator::new(&EncounterConfig::default());
        let mut out = Vec::new();
        let frame = active(Phase::Cross, Vec2::new(960.0, 540.0));
        generator.handle(&frame, 0.1, Vec2::ZERO, &mut Fixed(0), &mut out);

        let entered = BossFrame {
            entered: Some(Stage::Active),
            ..frame
        };
        generator.handle(&entered, 0.05, Vec2::ZERO, &mut Fixed(0), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn knife_corridor_follows_the_first_interlude() {
        let mut generator = PatternGenerator::new(&EncounterConfig::default());
        let mut out = Vec::new();
        let tier = SurvivalTier::FIRST;
        let mut frame = active(Phase::Spiral, Vec2::new(960.0, 150.0));
        frame.stage = Stage::Survival { tier };
        frame.entered = Some(frame.stage);

        generator.handle(&frame, 0.016, Vec2::ZERO, &mut Fixed(0), &mut out);
        assert_eq!(
            out,
            vec![Command::SetCorridor {
                corridor: Some(Corridor {
                    left: 630.0,
                    right: 1290.0,
                }),
            }]
        );

        out.clear();
        frame.entered = None;
        generator.handle(&frame, 0.016, Vec2::ZERO, &mut Fixed(0), &mut out);
        assert!(out.is_empty());

        frame.stage = Stage::Warning;
        generator.handle(&frame, 0.016, Vec2::ZERO, &mut Fixed(0), &mut out);
        assert_eq!(out, vec![Command::SetCorridor { corridor: None }]);
    }
}

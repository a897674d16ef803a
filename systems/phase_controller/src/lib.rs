#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Boss phase state machine.
//!
//! Each tick the controller advances exactly one [`Stage`], moves the boss
//! and publishes the result through [`Command::SetBoss`]. Survival interludes
//! clear the arena on entry and exit through [`Command::ClearHazards`].

mod motion;

use sanctuary_core::{
    ArenaTuning, BossFrame, Command, CycleTuning, EncounterConfig, EncounterVariant, Phase,
    RandomSource, Stage, SurvivalTier, SurvivalTuning, Vec2,
};

use motion::{active_position, ease, staging_point, survival_point, MotionInput};

/// Drives the boss through its phase cycle and survival interludes.
#[derive(Clone, Debug)]
pub struct PhaseController {
    variant: EncounterVariant,
    arena: ArenaTuning,
    cycle: CycleTuning,
    survival: SurvivalTuning,
    spawn: Vec2,
    position: Vec2,
    phase: Phase,
    stage: Stage,
    cycle_elapsed: f32,
    phase_elapsed: f32,
    stage_elapsed: f32,
    next_tier: u8,
    tracked_center: Vec2,
}

impl PhaseController {
    /// Creates a controller in the opening state: first pool phase, active, at the spawn point.
    #[must_use]
    pub fn new(config: &EncounterConfig) -> Self {
        let spawn = Vec2::new(config.arena.width * 0.5, config.boss.spawn_y);
        let phase = opening_phase(config.variant);
        Self {
            variant: config.variant,
            arena: config.arena,
            cycle: config.cycle,
            survival: config.survival,
            spawn,
            position: spawn,
            phase,
            stage: Stage::Active,
            cycle_elapsed: 0.0,
            phase_elapsed: 0.0,
            stage_elapsed: 0.0,
            next_tier: 1,
            tracked_center: spawn,
        }
    }

    /// Returns every field to its opening value.
    pub fn reset(&mut self) {
        self.position = self.spawn;
        self.phase = opening_phase(self.variant);
        self.stage = Stage::Active;
        self.cycle_elapsed = 0.0;
        self.phase_elapsed = 0.0;
        self.stage_elapsed = 0.0;
        self.next_tier = 1;
        self.tracked_center = self.spawn;
    }

    /// Phase currently selected.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Stage currently active.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Snapshot of the boss without advancing time.
    #[must_use]
    pub fn frame(&self) -> BossFrame {
        BossFrame {
            position: self.position,
            phase: self.phase,
            stage: self.stage,
            phase_elapsed: self.phase_elapsed,
            stage_elapsed: self.stage_elapsed,
            entered: None,
        }
    }

    /// Advances the state machine by `dt` seconds and emits the boss update.
    ///
    /// `boss_health_ratio` drives survival escalation; `player` feeds the
    /// homing motion of the cross phase.
    pub fn handle<R>(
        &mut self,
        dt: f32,
        boss_health_ratio: f32,
        player: Vec2,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) -> BossFrame
    where
        R: RandomSource + ?Sized,
    {
        let mut entered = None;

        if let Some(tier) = self.survival_due(boss_health_ratio) {
            tracing::debug!(tier = tier.get(), ratio = boss_health_ratio, "survival telegraph");
            self.enter(Stage::SurvivalWarning { tier }, &mut entered);
            out.push(Command::ClearHazards);
        }

        if !self.stage.is_survival() {
            self.cycle_elapsed += dt;
            if self.cycle_elapsed >= self.cycle.duration_of(self.phase) {
                let next = self.select_next_phase(rng);
                tracing::debug!(from = self.phase.label(), to = next.label(), "phase selected");
                self.phase = next;
                self.cycle_elapsed = 0.0;
                self.enter(Stage::Warning, &mut entered);
            }
        }

        self.stage_elapsed += dt;
        match self.stage {
            Stage::SurvivalWarning { tier } => {
                self.position = ease(
                    self.position,
                    survival_point(tier, &self.arena),
                    self.survival.gain,
                );
                if self.stage_elapsed >= self.survival.warning_duration {
                    self.next_tier = self.next_tier.saturating_add(1);
                    tracing::debug!(tier = tier.get(), "survival started");
                    self.enter(Stage::Survival { tier }, &mut entered);
                }
            }
            Stage::Survival { tier } => {
                self.position = ease(
                    self.position,
                    survival_point(tier, &self.arena),
                    self.survival.gain,
                );
                if self.stage_elapsed >= self.survival.duration {
                    tracing::debug!(tier = tier.get(), "survival finished");
                    self.enter(Stage::Warning, &mut entered);
                    out.push(Command::ClearHazards);
                }
            }
            Stage::Warning => {
                self.position = ease(
                    self.position,
                    staging_point(self.phase, &self.arena),
                    self.cycle.warning_gain,
                );
                if self.stage_elapsed >= self.cycle.warning_duration {
                    self.phase_elapsed = 0.0;
                    self.tracked_center = self.position;
                    self.enter(Stage::Active, &mut entered);
                }
            }
            Stage::Active => {
                self.phase_elapsed += dt;
                let input = MotionInput {
                    phase: self.phase,
                    elapsed: self.phase_elapsed,
                    position: self.position,
                    player,
                    gain: self.cycle.motion_gain,
                };
                self.position = active_position(input, &mut self.tracked_center, &self.arena);
            }
        }

        out.push(Command::SetBoss {
            position: self.position,
            phase: self.phase,
            stage: self.stage,
            stage_elapsed: self.stage_elapsed,
        });

        BossFrame {
            entered,
            ..self.frame()
        }
    }

    fn enter(&mut self, stage: Stage, entered: &mut Option<Stage>) {
        self.stage = stage;
        self.stage_elapsed = 0.0;
        *entered = Some(stage);
    }

    fn survival_due(&self, boss_health_ratio: f32) -> Option<SurvivalTier> {
        if !self.variant.survival_escalation()
            || self.stage.is_survival()
            || self.next_tier > self.survival.tiers
        {
            return None;
        }
        let threshold = 1.0 - f32::from(self.next_tier) * self.survival.threshold_step;
        (boss_health_ratio < threshold).then(|| SurvivalTier::new(self.next_tier))
    }

    fn select_next_phase<R>(&self, rng: &mut R) -> Phase
    where
        R: RandomSource + ?Sized,
    {
        let pool = self.variant.phase_pool();
        let candidates: Vec<Phase> = pool
            .iter()
            .copied()
            .filter(|phase| *phase != self.phase)
            .collect();
        if candidates.is_empty() {
            return self.phase;
        }
        let upper = u32::try_from(candidates.len()).unwrap_or(u32::MAX);
        let index = rng.next_below(upper) as usize;
        candidates.get(index).copied().unwrap_or(self.phase)
    }
}

fn opening_phase(variant: EncounterVariant) -> Phase {
    variant
        .phase_pool()
        .first()
        .copied()
        .unwrap_or(Phase::Spiral)
}

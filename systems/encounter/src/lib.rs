#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-tick pipeline that drives the world with every encounter system.
//!
//! Order within a step: player movement and fire, phase controller, pattern
//! generator, world tick (hazards, projectile sweep, collisions), outcome
//! tracker. Each stage's commands are applied before the next stage reads the
//! world.

use std::time::Duration;

use sanctuary_core::{
    BossFrame, Command, EncounterConfig, Event, PlayerInput, RandomSource,
};
use sanctuary_system_armory::Armory;
use sanctuary_system_outcome::{OutcomeTracker, Vitals};
use sanctuary_system_patterns::PatternGenerator;
use sanctuary_system_phase_controller::PhaseController;
use sanctuary_world::{apply, query, World};

/// Owns the world, every system and the random source for one encounter.
#[derive(Debug)]
pub struct Encounter<R> {
    world: World,
    controller: PhaseController,
    patterns: PatternGenerator,
    armory: Armory,
    outcome: OutcomeTracker,
    rng: R,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl<R> Encounter<R>
where
    R: RandomSource,
{
    /// Builds an encounter in its start-of-encounter state.
    #[must_use]
    pub fn new(config: EncounterConfig, rng: R) -> Self {
        Self {
            controller: PhaseController::new(&config),
            patterns: PatternGenerator::new(&config),
            armory: Armory::new(&config),
            outcome: OutcomeTracker::new(&config),
            world: World::new(config),
            rng,
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Read-only access to the authoritative world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Boss state as of the last completed step.
    #[must_use]
    pub fn boss_frame(&self) -> BossFrame {
        self.controller.frame()
    }

    /// Restores every component to its start-of-encounter values.
    ///
    /// Accepted in any state, terminal outcomes included.
    pub fn reset(&mut self) {
        self.events.clear();
        self.controller.reset();
        self.patterns.reset();
        self.armory.reset();
        apply(&mut self.world, Command::Reset, &mut self.events);
    }

    /// Advances the encounter by `dt` and returns the events it produced.
    pub fn step(&mut self, dt: Duration, input: &PlayerInput) -> &[Event] {
        if input.reset {
            self.reset();
            return &self.events;
        }

        self.events.clear();
        if query::outcome(&self.world).is_terminal() {
            return &self.events;
        }

        let seconds = dt.as_secs_f32();
        let _span = tracing::trace_span!("step", dt = seconds).entered();

        self.commands.push(Command::MovePlayer {
            intent: input.movement,
            dt,
        });
        self.flush();
        let player = query::player(&self.world).position;
        self.armory
            .handle(seconds, input, player, &mut self.commands);
        self.flush();

        let ratio = query::boss_health_ratio(&self.world);
        let frame = self.controller.handle(
            seconds,
            ratio,
            player,
            &mut self.rng,
            &mut self.commands,
        );
        self.flush();

        self.patterns
            .handle(&frame, seconds, player, &mut self.rng, &mut self.commands);
        self.flush();

        self.commands.push(Command::Tick { dt });
        self.flush();

        let vitals = Vitals {
            player_health: query::player(&self.world).health,
            boss_health: query::boss(&self.world).health,
            elapsed: query::elapsed(&self.world),
        };
        self.outcome
            .handle(query::outcome(&self.world), vitals, &mut self.commands);
        self.flush();

        if let Some(Event::OutcomeDecided { outcome }) = self.events.last() {
            tracing::info!(?outcome, elapsed = query::elapsed(&self.world), "encounter over");
        }
        &self.events
    }

    fn flush(&mut self) {
        for command in self.commands.drain(..) {
            apply(&mut self.world, command, &mut self.events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
    use sanctuary_core::{EncounterOutcome, Stage};

    #[test]
    fn first_step_publishes_the_boss_and_advances_time() {
        let mut encounter =
            Encounter::new(EncounterConfig::default(), ChaCha8Rng::seed_from_u64(1));
        let events = encounter
            .step(Duration::from_millis(16), &PlayerInput::default())
            .to_vec();

        assert!(events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. })));
        assert_eq!(encounter.boss_frame().stage, Stage::Active);
        assert_eq!(
            query::boss(encounter.world()).position,
            encounter.boss_frame().position
        );
    }

    #[test]
    fn reset_input_skips_the_simulation() {
        let mut encounter =
            Encounter::new(EncounterConfig::default(), ChaCha8Rng::seed_from_u64(1));
        let _ = encounter.step(Duration::from_millis(500), &PlayerInput::default());
        let reset = PlayerInput {
            reset: true,
            ..PlayerInput::default()
        };
        let events = encounter.step(Duration::from_millis(500), &reset).to_vec();

        assert_eq!(events, vec![Event::EncounterReset]);
        assert_eq!(query::elapsed(encounter.world()), 0.0);
        assert_eq!(query::outcome(encounter.world()), EncounterOutcome::Ongoing);
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decides when the encounter ends.

use sanctuary_core::{Command, EncounterConfig, EncounterOutcome, EncounterVariant};

/// Health and clock readings the tracker decides on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vitals {
    /// Remaining player health.
    pub player_health: f32,
    /// Remaining boss health.
    pub boss_health: f32,
    /// Simulated seconds since the encounter started.
    pub elapsed: f32,
}

/// Watches player and boss health (or the survival clock) for a terminal condition.
#[derive(Clone, Debug)]
pub struct OutcomeTracker {
    variant: EncounterVariant,
    survival_goal: f32,
}

impl OutcomeTracker {
    /// Creates a tracker for the configured variant.
    #[must_use]
    pub fn new(config: &EncounterConfig) -> Self {
        Self {
            variant: config.variant,
            survival_goal: config.survival_goal,
        }
    }

    /// Outcome implied by the readings. Defeat wins when both sides fall together.
    #[must_use]
    pub fn evaluate(&self, vitals: Vitals) -> EncounterOutcome {
        if vitals.player_health <= 0.0 {
            return EncounterOutcome::Defeat;
        }
        let won = if self.variant.boss_vulnerable() {
            vitals.boss_health <= 0.0
        } else {
            vitals.elapsed >= self.survival_goal
        };
        if won {
            EncounterOutcome::Victory
        } else {
            EncounterOutcome::Ongoing
        }
    }

    /// Pushes [`Command::DeclareOutcome`] when an ongoing encounter just ended.
    pub fn handle(&self, current: EncounterOutcome, vitals: Vitals, out: &mut Vec<Command>) {
        if current.is_terminal() {
            return;
        }
        let outcome = self.evaluate(vitals);
        if outcome.is_terminal() {
            out.push(Command::DeclareOutcome { outcome });
        }
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player fire gate enforcing minimum intervals between shots.

use sanctuary_core::{heading, Command, EncounterConfig, PlayerInput, Vec2};

/// Distance from the player of the points a secondary ring is aimed at.
const RING_AIM_DISTANCE: f32 = 100.0;

/// Seconds since a weapon last fired; `None` while it has not fired yet.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Cooldown {
    since_shot: Option<f32>,
}

impl Cooldown {
    fn advance(&mut self, dt: f32) {
        if let Some(since) = self.since_shot.as_mut() {
            *since += dt;
        }
    }

    fn ready(&self, interval: f32) -> bool {
        self.since_shot.map_or(true, |since| since > interval)
    }

    fn mark(&mut self) {
        self.since_shot = Some(0.0);
    }
}

/// Translates held fire buttons into bullet commands.
#[derive(Clone, Debug)]
pub struct Armory {
    enabled: bool,
    primary_interval: f32,
    secondary_interval: f32,
    secondary_count: u32,
    primary: Cooldown,
    secondary: Cooldown,
}

impl Armory {
    /// Creates an armory for the configured variant; the gauntlet disables it.
    #[must_use]
    pub fn new(config: &EncounterConfig) -> Self {
        Self {
            enabled: config.variant.player_weapons(),
            primary_interval: config.player.primary_interval,
            secondary_interval: config.player.secondary_interval,
            secondary_count: config.player.secondary_count,
            primary: Cooldown::default(),
            secondary: Cooldown::default(),
        }
    }

    /// Makes both weapons ready again.
    pub fn reset(&mut self) {
        self.primary = Cooldown::default();
        self.secondary = Cooldown::default();
    }

    /// Emits a single [`Command::FirePlayerBullets`] for every weapon that may fire this tick.
    pub fn handle(&mut self, dt: f32, input: &PlayerInput, player: Vec2, out: &mut Vec<Command>) {
        if !self.enabled {
            return;
        }
        self.primary.advance(dt);
        self.secondary.advance(dt);

        let mut targets = Vec::new();
        if input.primary_fire && self.primary.ready(self.primary_interval) {
            if let Some(aim) = input.aim_target {
                targets.push(aim);
                self.primary.mark();
            }
        }
        if input.secondary_fire && self.secondary.ready(self.secondary_interval) {
            let step = 360.0 / self.secondary_count.max(1) as f32;
            targets.extend(
                (0..self.secondary_count)
                    .map(|index| player + heading(index as f32 * step) * RING_AIM_DISTANCE),
            );
            self.secondary.mark();
        }

        if !targets.is_empty() {
            out.push(Command::FirePlayerBullets { targets });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanctuary_core::EncounterVariant;

    fn targets(out: &[Command]) -> usize {
        out.iter()
            .map(|command| match command {
                Command::FirePlayerBullets { targets } => targets.len(),
                _ => 0,
            })
            .sum()
    }

    fn primary(aim: Option<Vec2>) -> PlayerInput {
        PlayerInput {
            aim_target: aim,
            primary_fire: true,
            ..PlayerInput::default()
        }
    }

    #[test]
    fn primary_respects_its_interval() {
        let mut armory = Armory::new(&EncounterConfig::default());
        let mut out = Vec::new();
        let input = primary(Some(Vec2::new(10.0, 10.0)));

        armory.handle(0.016, &input, Vec2::ZERO, &mut out);
        assert_eq!(targets(&out), 1);

        for _ in 0..8 {
            armory.handle(0.016, &input, Vec2::ZERO, &mut out);
        }
        assert_eq!(targets(&out), 2);
    }

    #[test]
    fn primary_without_an_aim_does_not_consume_the_cooldown() {
        let mut armory = Armory::new(&EncounterConfig::default());
        let mut out = Vec::new();
        armory.handle(0.016, &primary(None), Vec2::ZERO, &mut out);
        assert!(out.is_empty());
        armory.handle(0.016, &primary(Some(Vec2::ONE)), Vec2::ZERO, &mut out);
        assert_eq!(targets(&out), 1);
    }

    #[test]
    fn secondary_fires_a_ring_of_twelve() {
        let mut armory = Armory::new(&EncounterConfig::default());
        let mut out = Vec::new();
        let input = PlayerInput {
            secondary_fire: true,
            ..PlayerInput::default()
        };
        let player = Vec2::new(500.0, 500.0);

        armory.handle(0.016, &input, player, &mut out);

        let Some(Command::FirePlayerBullets { targets }) = out.first() else {
            panic!("expected a ring, got {out:?}");
        };
        assert_eq!(targets.len(), 12);
        assert!(targets
            .iter()
            .all(|target| (target.distance(player) - 100.0).abs() < 1e-3));

        armory.handle(0.3, &input, player, &mut out);
        assert_eq!(out.len(), 1);
        armory.handle(0.3, &input, player, &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn gauntlet_has_no_weapons() {
        let mut armory = Armory::new(&EncounterConfig::for_variant(EncounterVariant::Gauntlet));
        let mut out = Vec::new();
        let input = PlayerInput {
            secondary_fire: true,
            ..primary(Some(Vec2::ONE))
        };
        armory.handle(1.0, &input, Vec2::ZERO, &mut out);
        assert!(out.is_empty());
    }
}

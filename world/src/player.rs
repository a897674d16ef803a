//! Player body owned by the world.

use sanctuary_core::{ArenaTuning, MoveIntent, PlayerTuning, Vec2};

/// Position and health pool of the player.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PlayerAgent {
    pub(crate) position: Vec2,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) radius: f32,
    speed: f32,
}

impl PlayerAgent {
    /// Places a full-health player horizontally centred at the configured height.
    pub(crate) fn spawn(arena: &ArenaTuning, tuning: &PlayerTuning) -> Self {
        Self {
            position: Vec2::new(
                arena.width * 0.5,
                arena.height * tuning.spawn_height_ratio,
            ),
            health: tuning.max_health,
            max_health: tuning.max_health,
            radius: tuning.radius,
            speed: tuning.speed,
        }
    }

    /// Moves by `speed * dt` along each held axis, then clamps to the arena.
    pub(crate) fn steer(&mut self, intent: MoveIntent, dt: f32, arena: &ArenaTuning) {
        self.position += intent.axis() * self.speed * dt;
        self.clamp_to(arena);
    }

    /// Keeps the whole body inside the arena.
    pub(crate) fn clamp_to(&mut self, arena: &ArenaTuning) {
        // max/min instead of f32::clamp: a tiny arena must not panic.
        self.position.x = self.position.x.max(self.radius).min(arena.width - self.radius);
        self.position.y = self.position.y.max(self.radius).min(arena.height - self.radius);
    }

    /// Removes `amount` health without going below zero and returns what remains.
    pub(crate) fn take_damage(&mut self, amount: f32) -> f32 {
        self.health = (self.health - amount).max(0.0);
        self.health
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

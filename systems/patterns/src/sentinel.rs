//! Turret placement and border-laser cadence of the sentinel phase.

use sanctuary_core::{ArenaTuning, Command, HazardTuning, RandomSource, Vec2};

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SentinelCadence {
    pub(crate) turret_timer: f32,
    pub(crate) border_timer: f32,
}

impl SentinelCadence {
    pub(crate) fn restart(&mut self) {
        self.turret_timer = 0.0;
        self.border_timer = 0.0;
    }

    pub(crate) fn advance<R>(
        &mut self,
        dt: f32,
        arena: &ArenaTuning,
        tuning: &HazardTuning,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) where
        R: RandomSource + ?Sized,
    {
        self.turret_timer += dt;
        if self.turret_timer >= tuning.turret_interval {
            self.turret_timer -= tuning.turret_interval;
            let margin = tuning.turret_margin;
            let position = Vec2::new(
                rng.next_in_range(margin, arena.width - margin),
                rng.next_in_range(margin, arena.height - margin),
            );
            out.push(Command::SpawnTurret { position });
        }

        self.border_timer += dt;
        if self.border_timer >= tuning.border_interval {
            self.border_timer -= tuning.border_interval;
            let (origin, direction_degrees) = border_origin(arena, rng);
            out.push(Command::SpawnBorderLaser {
                origin,
                direction_degrees,
            });
        }
    }
}

/// Uniform edge and offset; the beam points straight into the arena.
fn border_origin<R>(arena: &ArenaTuning, rng: &mut R) -> (Vec2, f32)
where
    R: RandomSource + ?Sized,
{
    let side = rng.next_below(4);
    let along_x = rng.next_in_range(0.0, arena.width);
    let along_y = rng.next_in_range(0.0, arena.height);
    match side {
        0 => (Vec2::new(0.0, along_y), 0.0),
        1 => (Vec2::new(arena.width, along_y), 180.0),
        2 => (Vec2::new(along_x, 0.0), 90.0),
        _ => (Vec2::new(along_x, arena.height), 270.0),
    }
}

//! Player bullets and their boss contact test.

use sanctuary_core::{ArenaTuning, Vec2, FRAME_SCALE};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PlayerBullet {
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) radius: f32,
}

impl PlayerBullet {
    /// Aims from `from` toward `target`; a degenerate aim yields a stationary bullet.
    pub(crate) fn aimed(from: Vec2, target: Vec2, speed: f32, radius: f32) -> Self {
        Self {
            position: from,
            velocity: (target - from).normalize_or_zero() * speed,
            radius,
        }
    }

    fn touches_square(&self, center: Vec2, half_extent: f32) -> bool {
        let reach = half_extent + self.radius;
        let offset = (self.position - center).abs();
        offset.x < reach && offset.y < reach
    }
}

/// Bullets fired by the player that are still in flight.
#[derive(Clone, Debug, Default)]
pub(crate) struct BulletStore {
    bullets: Vec<PlayerBullet>,
}

impl BulletStore {
    pub(crate) fn push(&mut self, bullet: PlayerBullet) {
        self.bullets.push(bullet);
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &PlayerBullet> {
        self.bullets.iter()
    }

    /// Integrates every bullet and returns how many struck the boss square.
    ///
    /// Bullets that strike the boss are removed whether or not it can take
    /// damage; bullets that leave the arena are removed without margin.
    pub(crate) fn sweep(
        &mut self,
        dt: f32,
        arena: &ArenaTuning,
        boss: Vec2,
        boss_half_extent: f32,
    ) -> usize {
        let step = dt * FRAME_SCALE;
        let mut hits = 0;
        self.bullets.retain_mut(|bullet| {
            bullet.position += bullet.velocity * step;
            if bullet.touches_square(boss, boss_half_extent) {
                hits += 1;
                return false;
            }
            let Vec2 { x, y } = bullet.position;
            (0.0..=arena.width).contains(&x) && (0.0..=arena.height).contains(&y)
        });
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_aim_produces_a_stationary_bullet() {
        let origin = Vec2::new(400.0, 400.0);
        let bullet = PlayerBullet::aimed(origin, origin, 15.0, 5.0);
        assert_eq!(bullet.velocity, Vec2::ZERO);

        let mut store = BulletStore::default();
        store.push(bullet);
        let hits = store.sweep(1.0, &ArenaTuning::default(), Vec2::new(960.0, 200.0), 40.0);
        assert_eq!(hits, 0);
        assert_eq!(store.iter().next().map(|b| b.position), Some(origin));
    }

    #[test]
    fn bullets_hitting_the_boss_are_consumed() {
        let boss = Vec2::new(960.0, 200.0);
        let mut store = BulletStore::default();
        store.push(PlayerBullet::aimed(Vec2::new(960.0, 250.0), boss, 15.0, 5.0));
        store.push(PlayerBullet::aimed(Vec2::new(100.0, 900.0), Vec2::new(100.0, 0.0), 15.0, 5.0));

        let hits = store.sweep(1.0 / FRAME_SCALE, &ArenaTuning::default(), boss, 40.0);

        assert_eq!(hits, 1);
        assert_eq!(store.iter().count(), 1);
    }

    #[test]
    fn bullets_leaving_the_arena_are_removed() {
        let mut store = BulletStore::default();
        store.push(PlayerBullet::aimed(Vec2::new(5.0, 500.0), Vec2::new(0.0, 500.0), 15.0, 5.0));

        let hits = store.sweep(1.0 / FRAME_SCALE, &ArenaTuning::default(), Vec2::new(960.0, 200.0), 40.0);

        assert_eq!(hits, 0);
        assert_eq!(store.iter().count(), 0);
    }
}

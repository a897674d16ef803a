//! Emitters for the regular phase patterns.

use sanctuary_core::{
    angular_distance, bearing_degrees, ArenaTuning, HazardTint, Phase, ProjectileSpec,
    RandomSource, Vec2,
};

const SPIRAL_STEP: f32 = 20.0;
const CROSS_STEP: f32 = 15.0;
const RAIN_COUNT: u32 = 12;
const RAIN_SPAWN_Y: f32 = -20.0;
const GAP_HALF_WIDTH: f32 = 15.0;
const GAP_REACH: f32 = 850.0;
const BULLET_RADIUS: f32 = 7.0;

/// Accumulators of the regular cadence.
///
/// Rotations persist across phase changes and only reset with the encounter.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct NormalCadence {
    pub(crate) spawn_timer: f32,
    pub(crate) spiral_rotation: f32,
    pub(crate) cross_rotation: f32,
}

/// Where a regular emission starts and aims.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Muzzle {
    pub(crate) boss: Vec2,
    pub(crate) player: Vec2,
}

impl NormalCadence {
    /// Emits the volley of `phase` and returns the value the accumulator resets to.
    pub(crate) fn fire<R>(
        &mut self,
        phase: Phase,
        muzzle: Muzzle,
        arena: &ArenaTuning,
        rng: &mut R,
        batch: &mut Vec<ProjectileSpec>,
    ) -> f32
    where
        R: RandomSource + ?Sized,
    {
        let Muzzle { boss, player } = muzzle;
        match phase {
            Phase::Spiral => {
                self.spiral_rotation += SPIRAL_STEP;
                batch.extend(ring(boss, 12, self.spiral_rotation, 5.0, BULLET_RADIUS));
                -0.28
            }
            Phase::Rain => {
                let columns = arena.width.max(1.0) as u32;
                for _ in 0..RAIN_COUNT {
                    let x = rng.next_below(columns) as f32;
                    let speed = 7.0 + rng.next_below(4) as f32;
                    batch.push(ProjectileSpec::launched(
                        Vec2::new(x, RAIN_SPAWN_Y),
                        90.0,
                        speed,
                        BULLET_RADIUS,
                    ));
                }
                -0.03
            }
            Phase::Gaps => {
                let bearing = bearing_degrees(boss, player);
                batch.extend(
                    (0..36)
                        .map(|step| step as f32 * 10.0)
                        .filter(|angle| angular_distance(*angle, bearing) > GAP_HALF_WIDTH)
                        .map(|angle| {
                            ProjectileSpec::launched(boss, angle, 16.0, BULLET_RADIUS)
                                .tinted(HazardTint::Verdant)
                                .expiring_beyond(GAP_REACH)
                        }),
                );
                -0.05
            }
            Phase::Cross => {
                self.cross_rotation += CROSS_STEP;
                for speed in [13.0, 8.0] {
                    batch.extend(ring(boss, 6, self.cross_rotation, speed, BULLET_RADIUS));
                }
                -0.18
            }
            Phase::Shotgun => {
                let bearing = bearing_degrees(boss, player);
                batch.extend((-3..=3).map(|offset| {
                    ProjectileSpec::launched(boss, bearing + offset as f32 * 15.0, 14.0, 25.0)
                        .tinted(HazardTint::Ember)
                }));
                -0.38
            }
            Phase::Stream => {
                let bearing = bearing_degrees(boss, player);
                batch.extend((-1..=1).map(|offset| {
                    ProjectileSpec::launched(boss, bearing + offset as f32 * 10.0, 14.0, 9.0)
                }));
                0.0
            }
            Phase::Sentinel => 0.0,
        }
    }
}

/// Full ring of `count` projectiles evenly spaced from `rotation`.
pub(crate) fn ring(
    origin: Vec2,
    count: u32,
    rotation: f32,
    speed: f32,
    radius: f32,
) -> impl Iterator<Item = ProjectileSpec> {
    let step = 360.0 / count.max(1) as f32;
    (0..count).map(move |index| {
        ProjectileSpec::launched(origin, index as f32 * step + rotation, speed, radius)
    })
}

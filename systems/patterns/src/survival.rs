//! High-density interlude patterns, one per survival tier.

use sanctuary_core::{
    heading, ArenaTuning, Corridor, HazardTint, ProjectileShape, ProjectileSpec, RandomSource,
    ShardBurst, Vec2,
};

use crate::normal::ring;

const LANES: u32 = 12;
const LANE_WIDTH: f32 = 55.0;
const WALL_INTERVAL: f32 = 1.1;
const BLADE_HALF_EXTENTS: Vec2 = Vec2::new(9.0, 27.0);

const CROSS_INTERVAL: f32 = 0.08;
const CROSS_NEAREST: f32 = 60.0;
const CROSS_SPACING: f32 = 35.0;
const CROSS_FARTHEST: f32 = 1200.0;
const FLASH_LIFETIME: f32 = 0.12;

const MIASMA_INTERVAL: f32 = 0.05;
const POPROCK_INTERVAL: f32 = 0.7;
const POPROCK_SPLIT: f32 = 400.0;
const TOWER_INTERVAL: f32 = 0.65;
const TOWER_INSET: f32 = 100.0;
const TOWER_STEP: f32 = 2.5;

/// Safe band of the knife wall, centred on the arena.
pub(crate) fn knife_corridor(arena: &ArenaTuning) -> Corridor {
    Corridor::centered(arena.width * 0.5, LANES as f32 * LANE_WIDTH)
}

/// Accumulators of the interlude patterns.
///
/// Timers restart when an interlude begins; rotations carry over.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SurvivalCadence {
    pub(crate) spawn_timer: f32,
    pub(crate) wall_timer: f32,
    pub(crate) cross_rotation: f32,
    pub(crate) miasma_rotation: f32,
    pub(crate) poprock_timer: f32,
    pub(crate) tower_timer: f32,
    pub(crate) tower_rotation: f32,
}

impl SurvivalCadence {
    pub(crate) fn restart(&mut self) {
        self.spawn_timer = 0.0;
        self.wall_timer = 0.0;
        self.poprock_timer = 0.0;
        self.tower_timer = 0.0;
    }

    /// Knife wall: a row of blades with a two-lane gap, dropped from the boss height.
    pub(crate) fn knife_wall<R>(
        &mut self,
        dt: f32,
        boss: Vec2,
        arena: &ArenaTuning,
        rng: &mut R,
        batch: &mut Vec<ProjectileSpec>,
    ) where
        R: RandomSource + ?Sized,
    {
        self.wall_timer += dt;
        if self.wall_timer <= WALL_INTERVAL {
            return;
        }
        self.wall_timer = 0.0;

        let corridor = knife_corridor(arena);
        let gap = rng.next_below(LANES - 2);
        batch.extend(
            (0..LANES)
                .filter(|lane| *lane != gap && *lane != gap + 1)
                .map(|lane| {
                    let x = corridor.left + lane as f32 * LANE_WIDTH;
                    ProjectileSpec::launched(Vec2::new(x, boss.y), 90.0, 8.0, 0.0)
                        .shaped(ProjectileShape::Blade {
                            half_extents: BLADE_HALF_EXTENTS,
                        })
                        .tinted(HazardTint::Steel)
                }),
        );
    }

    /// Dense rotating cross of short-lived flashes plus four side streams.
    pub(crate) fn cross_streams<R>(
        &mut self,
        boss: Vec2,
        arena: &ArenaTuning,
        rng: &mut R,
        batch: &mut Vec<ProjectileSpec>,
    ) where
        R: RandomSource + ?Sized,
    {
        if self.spawn_timer <= CROSS_INTERVAL {
            return;
        }
        self.spawn_timer = 0.0;
        self.cross_rotation += 2.0;

        for arm in 0..4 {
            let angle = self.cross_rotation + arm as f32 * 90.0;
            let direction = heading(angle);
            let mut distance = CROSS_NEAREST;
            while distance < CROSS_FARTHEST {
                batch.push(
                    ProjectileSpec::launched(boss + direction * distance, angle, 0.0, 11.0)
                        .with_time_to_live(FLASH_LIFETIME)
                        .tinted(HazardTint::Toxic),
                );
                distance += CROSS_SPACING;
            }
        }

        let width = arena.width.max(1.0) as u32;
        let height = arena.height.max(1.0) as u32;
        let sides = [
            (Vec2::new(0.0, rng.next_below(height) as f32), 0.0),
            (Vec2::new(arena.width, rng.next_below(height) as f32), 180.0),
            (Vec2::new(rng.next_below(width) as f32, 0.0), 90.0),
            (Vec2::new(rng.next_below(width) as f32, arena.height), 270.0),
        ];
        batch.extend(sides.into_iter().map(|(origin, angle)| {
            ProjectileSpec::launched(origin, angle, 7.0, 7.0).tinted(HazardTint::Mint)
        }));
    }

    /// Wobbling four-arm miasma with splitting poprocks and corner tower bursts.
    pub(crate) fn miasma_towers<R>(
        &mut self,
        survival_elapsed: f32,
        boss: Vec2,
        arena: &ArenaTuning,
        rng: &mut R,
        batch: &mut Vec<ProjectileSpec>,
    ) where
        R: RandomSource + ?Sized,
    {
        if self.spawn_timer <= MIASMA_INTERVAL {
            return;
        }
        let since_last = self.spawn_timer;
        self.spawn_timer = 0.0;
        self.miasma_rotation += 2.0;

        batch.extend((0..4).map(|arm| {
            let wobble = (survival_elapsed * 5.0 + arm as f32).sin() * 15.0;
            let angle = self.miasma_rotation + arm as f32 * 90.0 + wobble;
            ProjectileSpec::launched(boss, angle, 7.0, 7.0).tinted(HazardTint::Amber)
        }));

        self.poprock_timer += since_last;
        if self.poprock_timer > POPROCK_INTERVAL {
            self.poprock_timer = 0.0;
            let angle = rng.next_below(360) as f32;
            let burst = ShardBurst {
                count: 12,
                speed: 5.0,
                radius: 6.0,
            };
            batch.push(
                ProjectileSpec::launched(boss, angle, 4.0, 15.0)
                    .tinted(HazardTint::Gold)
                    .splitting_beyond(POPROCK_SPLIT, burst),
            );
        }

        self.tower_timer += since_last;
        self.tower_rotation += TOWER_STEP;
        if self.tower_timer > TOWER_INTERVAL {
            self.tower_timer = 0.0;
            for corner in tower_corners(arena) {
                batch.extend(
                    ring(corner, 6, self.tower_rotation, 4.5, 9.0)
                        .map(|spec| spec.tinted(HazardTint::Orchid)),
                );
            }
        }
    }
}

/// Fixed corner positions of the tier three towers.
pub fn tower_corners(arena: &ArenaTuning) -> [Vec2; 4] {
    let near = TOWER_INSET;
    let right = arena.width - TOWER_INSET;
    let bottom = arena.height - TOWER_INSET;
    [
        Vec2::new(near, near),
        Vec2::new(right, near),
        Vec2::new(near, bottom),
        Vec2::new(right, bottom),
    ]
}

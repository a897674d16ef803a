//! Hostile projectile storage and the per-tick lifecycle sweep.

use sanctuary_core::{
    ArenaTuning, Behaviors, HazardTint, ProjectileShape, ProjectileSpec, Vec2, FRAME_SCALE,
};

/// A single live hostile projectile.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Projectile {
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) origin: Vec2,
    pub(crate) shape: ProjectileShape,
    pub(crate) tint: HazardTint,
    pub(crate) behaviors: Behaviors,
    pub(crate) age: f32,
}

impl From<ProjectileSpec> for Projectile {
    fn from(spec: ProjectileSpec) -> Self {
        Self {
            position: spec.position,
            velocity: spec.velocity,
            origin: spec.position,
            shape: spec.shape,
            tint: spec.tint,
            behaviors: spec.behaviors,
            age: 0.0,
        }
    }
}

/// Outcome of evaluating one projectile during the sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Fate {
    Keep,
    Burst,
    Expire,
    Contact,
    Cull,
}

impl Projectile {
    fn travelled(&self) -> f32 {
        self.position.distance(self.origin)
    }

    /// Evaluates the removal predicates in their fixed priority order.
    fn fate(&self, player: Vec2, player_radius: f32, arena: &ArenaTuning) -> Fate {
        let travelled = self.travelled();

        if let Some(split) = self.behaviors.split {
            if travelled > split.distance {
                return Fate::Burst;
            }
        }

        let lifetime_over = self
            .behaviors
            .time_to_live
            .is_some_and(|ttl| self.age >= ttl);
        let reach_over = self
            .behaviors
            .reach
            .is_some_and(|reach| travelled > reach);
        if lifetime_over || reach_over {
            return Fate::Expire;
        }

        if self.shape.overlaps_circle(self.position, player, player_radius) {
            return Fate::Contact;
        }

        let margin = arena.cull_margin;
        let Vec2 { x, y } = self.position;
        if x < -margin || x > arena.width + margin || y < -margin || y > arena.height + margin {
            return Fate::Cull;
        }

        Fate::Keep
    }
}

/// Summary of one lifecycle sweep.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SweepReport {
    /// Projectiles that touched the player and were removed.
    pub(crate) contacts: usize,
    /// Burst positions paired with the number of shards each produced.
    pub(crate) bursts: Vec<(Vec2, usize)>,
}

/// Ordered collection of every live hostile projectile.
#[derive(Clone, Debug, Default)]
pub(crate) struct ProjectileStore {
    projectiles: Vec<Projectile>,
}

impl ProjectileStore {
    pub(crate) fn append<I>(&mut self, specs: I)
    where
        I: IntoIterator<Item = ProjectileSpec>,
    {
        self.projectiles.extend(specs.into_iter().map(Projectile::from));
    }

    /// Removes every projectile and reports how many were dropped.
    pub(crate) fn clear(&mut self) -> usize {
        let removed = self.projectiles.len();
        self.projectiles.clear();
        removed
    }

    pub(crate) fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    /// Integrates every projectile, then evaluates fates and appends shard children.
    ///
    /// Children are appended after the retain pass and are never evaluated in the
    /// sweep that created them.
    pub(crate) fn sweep(
        &mut self,
        dt: f32,
        player: Vec2,
        player_radius: f32,
        arena: &ArenaTuning,
    ) -> SweepReport {
        let step = dt * FRAME_SCALE;
        for projectile in &mut self.projectiles {
            projectile.position += projectile.velocity * step;
            projectile.age += dt;
        }

        let mut report = SweepReport::default();
        let mut children = Vec::new();
        self.projectiles.retain(|projectile| {
            match projectile.fate(player, player_radius, arena) {
                Fate::Keep => true,
                Fate::Burst => {
                    if let Some(split) = projectile.behaviors.split {
                        let shards = split.burst.shards(projectile.position, projectile.tint);
                        report.bursts.push((projectile.position, shards.len()));
                        children.extend(shards);
                    }
                    false
                }
                Fate::Contact => {
                    report.contacts += 1;
                    false
                }
                Fate::Expire | Fate::Cull => false,
            }
        });
        self.append(children);

        report
    }
}

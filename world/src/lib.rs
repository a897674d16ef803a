#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative encounter state for Sanctuary.
//!
//! [`apply`] is the only way to mutate a [`World`]; the [`query`] module
//! exposes read-only views for systems and adapters.

mod bullets;
mod collision;
mod hazards;
mod player;
mod projectiles;

use sanctuary_core::{
    BeamKind, Command, Corridor, EncounterConfig, EncounterOutcome, Event, Phase, Stage, Vec2,
};

use bullets::{BulletStore, PlayerBullet};
use collision::CollisionResolver;
use hazards::HazardField;
use player::PlayerAgent;
use projectiles::ProjectileStore;

/// Boss body as last published by the phase controller.
#[derive(Clone, Debug, PartialEq)]
struct BossBody {
    position: Vec2,
    phase: Phase,
    stage: Stage,
    stage_elapsed: f32,
    health: f32,
}

/// Represents the authoritative encounter state.
#[derive(Debug)]
pub struct World {
    config: EncounterConfig,
    player: PlayerAgent,
    boss: BossBody,
    projectiles: ProjectileStore,
    bullets: BulletStore,
    hazards: HazardField,
    corridor: Option<Corridor>,
    resolver: CollisionResolver,
    outcome: EncounterOutcome,
    clock: f32,
}

impl World {
    /// Creates a world in its start-of-encounter state for the provided tuning.
    #[must_use]
    pub fn new(config: EncounterConfig) -> Self {
        let player = PlayerAgent::spawn(&config.arena, &config.player);
        let opening_phase = config
            .variant
            .phase_pool()
            .first()
            .copied()
            .unwrap_or(Phase::Spiral);
        let boss = BossBody {
            position: Vec2::new(config.arena.width * 0.5, config.boss.spawn_y),
            phase: opening_phase,
            stage: Stage::Active,
            stage_elapsed: 0.0,
            health: config.boss.max_health,
        };
        Self {
            resolver: CollisionResolver::new(config.player.rehit_interval),
            player,
            boss,
            projectiles: ProjectileStore::default(),
            bullets: BulletStore::default(),
            hazards: HazardField::default(),
            corridor: None,
            outcome: EncounterOutcome::Ongoing,
            clock: 0.0,
            config,
        }
    }

    fn boss_damageable(&self) -> bool {
        self.config.variant.boss_vulnerable() && !self.boss.stage.boss_invulnerable()
    }

    fn advance(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        self.clock += dt;
        let arena = self.config.arena;

        self.hazards
            .advance(dt, self.player.position, &self.config.hazards, out_events);

        let hits = self
            .bullets
            .sweep(dt, &arena, self.boss.position, self.config.boss.half_extent);
        if self.boss_damageable() {
            for _ in 0..hits {
                self.boss.health = (self.boss.health - self.config.boss.bullet_damage).max(0.0);
                out_events.push(Event::BossDamaged {
                    amount: self.config.boss.bullet_damage,
                    remaining: self.boss.health,
                });
            }
        }

        let report =
            self.projectiles
                .sweep(dt, self.player.position, self.player.radius, &arena);
        for (position, shards) in report.bursts {
            out_events.push(Event::ShardBurst { position, shards });
        }

        let beam_contact = self.hazards.beam_contact(
            self.player.position,
            self.player.radius,
            arena.diagonal(),
            self.config.hazards.beam_half_width,
        );
        if (report.contacts > 0 || beam_contact) && self.resolver.try_strike(self.clock) {
            let amount = self.config.player.hit_damage;
            let remaining = self.player.take_damage(amount);
            out_events.push(Event::PlayerDamaged { amount, remaining });
        }

        if let Some(corridor) = self.corridor {
            if self.player.is_alive() && !corridor.contains(self.player.position.x) {
                self.player.health = 0.0;
                out_events.push(Event::PlayerVoided);
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(EncounterConfig::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the outcome is terminal every command except [`Command::Reset`] is ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.outcome.is_terminal() && command != Command::Reset {
        return;
    }

    match command {
        Command::Reset => {
            let config = world.config.clone();
            *world = World::new(config);
            tracing::debug!("encounter reset");
            out_events.push(Event::EncounterReset);
        }
        Command::Tick { dt } => {
            world.advance(dt.as_secs_f32(), out_events);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::MovePlayer { intent, dt } => {
            let arena = world.config.arena;
            world.player.steer(intent, dt.as_secs_f32(), &arena);
        }
        Command::FirePlayerBullets { targets } => {
            if !world.config.variant.player_weapons() {
                return;
            }
            let tuning = world.config.player;
            for target in targets {
                world.bullets.push(PlayerBullet::aimed(
                    world.player.position,
                    target,
                    tuning.bullet_speed,
                    tuning.bullet_radius,
                ));
            }
        }
        Command::SetBoss {
            position,
            phase,
            stage,
            stage_elapsed,
        } => {
            let boss = &mut world.boss;
            if boss.phase != phase {
                tracing::debug!(from = boss.phase.label(), to = phase.label(), "boss phase changed");
                out_events.push(Event::BossPhaseChanged {
                    from: boss.phase,
                    to: phase,
                });
            }
            if boss.stage != stage {
                tracing::debug!(from = ?boss.stage, to = ?stage, "boss stage changed");
                out_events.push(Event::BossStageChanged {
                    from: boss.stage,
                    to: stage,
                });
            }
            boss.position = position;
            boss.phase = phase;
            boss.stage = stage;
            boss.stage_elapsed = stage_elapsed;
        }
        Command::ClearHazards => {
            let projectiles = world.projectiles.clear();
            let (turrets, beams) = world.hazards.clear();
            out_events.push(Event::HazardsCleared {
                projectiles,
                turrets,
                beams,
            });
        }
        Command::SpawnProjectiles { projectiles } => {
            tracing::trace!(count = projectiles.len(), "projectiles spawned");
            world.projectiles.append(projectiles);
        }
        Command::SpawnTurret { position } => {
            let turret = world.hazards.place_turret(position, world.player.position);
            out_events.push(Event::TurretPlaced { turret, position });
        }
        Command::SpawnBorderLaser {
            origin,
            direction_degrees,
        } => {
            let tuning = world.config.hazards;
            let kind = BeamKind::Border;
            let beam = world.hazards.fire_beam(
                kind,
                origin,
                direction_degrees,
                tuning.border_telegraph,
                tuning.border_live,
            );
            out_events.push(Event::BeamTelegraphed { beam, kind });
        }
        Command::SetCorridor { corridor } => {
            world.corridor = corridor;
        }
        Command::DeclareOutcome { outcome } => {
            if outcome.is_terminal() {
                tracing::debug!(?outcome, elapsed = world.clock, "outcome decided");
                world.outcome = outcome;
                out_events.push(Event::OutcomeDecided { outcome });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use sanctuary_core::{
        BeamId, BeamKind, BeamStage, Corridor, EncounterConfig, EncounterOutcome, HazardTint,
        Phase, ProjectileShape, Stage, TurretId, Vec2,
    };

    use super::World;

    /// Provides read-only access to the tuning the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &EncounterConfig {
        &world.config
    }

    /// Captures the player's position and health.
    #[must_use]
    pub fn player(world: &World) -> PlayerView {
        PlayerView {
            position: world.player.position,
            radius: world.player.radius,
            health: world.player.health,
            max_health: world.player.max_health,
        }
    }

    /// Captures the boss body as last published by the phase controller.
    #[must_use]
    pub fn boss(world: &World) -> BossView {
        BossView {
            position: world.boss.position,
            half_extent: world.config.boss.half_extent,
            phase: world.boss.phase,
            stage: world.boss.stage,
            stage_elapsed: world.boss.stage_elapsed,
            health: world.boss.health,
            max_health: world.config.boss.max_health,
        }
    }

    /// Boss health divided by its maximum.
    #[must_use]
    pub fn boss_health_ratio(world: &World) -> f32 {
        let max = world.config.boss.max_health;
        if max > 0.0 {
            world.boss.health / max
        } else {
            0.0
        }
    }

    /// Number of live hostile projectiles.
    #[must_use]
    pub fn projectile_count(world: &World) -> usize {
        world.projectiles.len()
    }

    /// Iterates every live hostile projectile in store order.
    pub fn projectiles(world: &World) -> impl Iterator<Item = ProjectileSnapshot> + '_ {
        world.projectiles.iter().map(|projectile| ProjectileSnapshot {
            position: projectile.position,
            velocity: projectile.velocity,
            shape: projectile.shape,
            tint: projectile.tint,
            age: projectile.age,
        })
    }

    /// Iterates every player bullet in flight.
    pub fn player_bullets(world: &World) -> impl Iterator<Item = BulletSnapshot> + '_ {
        world.bullets.iter().map(|bullet| BulletSnapshot {
            position: bullet.position,
            radius: bullet.radius,
        })
    }

    /// Iterates every placed turret.
    pub fn turrets(world: &World) -> impl Iterator<Item = TurretSnapshot> + '_ {
        world.hazards.turrets().iter().map(|turret| TurretSnapshot {
            id: turret.id,
            position: turret.position,
            bearing_degrees: turret.bearing_degrees,
            locked: turret.locked,
        })
    }

    /// Iterates every beam with its full-arena geometry.
    pub fn beams(world: &World) -> impl Iterator<Item = BeamSnapshot> + '_ {
        let length = world.config.arena.diagonal();
        let half_width = world.config.hazards.beam_half_width;
        world.hazards.beams().iter().map(move |beam| BeamSnapshot {
            id: beam.id,
            kind: beam.kind,
            origin: beam.origin,
            end: beam.end(length),
            half_width,
            stage: beam.stage(),
        })
    }

    /// Safe band of the knife wall, if one is active.
    #[must_use]
    pub fn corridor(world: &World) -> Option<Corridor> {
        world.corridor
    }

    /// Current encounter outcome.
    #[must_use]
    pub fn outcome(world: &World) -> EncounterOutcome {
        world.outcome
    }

    /// Simulated seconds since the encounter started.
    #[must_use]
    pub fn elapsed(world: &World) -> f32 {
        world.clock
    }

    /// Read-only snapshot of the player.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PlayerView {
        /// Player centre in world units.
        pub position: Vec2,
        /// Collision radius.
        pub radius: f32,
        /// Remaining health.
        pub health: f32,
        /// Health at the start of the encounter.
        pub max_health: f32,
    }

    /// Read-only snapshot of the boss.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct BossView {
        /// Boss centre in world units.
        pub position: Vec2,
        /// Half the side length of the boss square.
        pub half_extent: f32,
        /// Phase currently selected.
        pub phase: Phase,
        /// Stage currently active.
        pub stage: Stage,
        /// Seconds spent in the current stage.
        pub stage_elapsed: f32,
        /// Remaining health.
        pub health: f32,
        /// Health at the start of the encounter.
        pub max_health: f32,
    }

    /// Read-only snapshot of a hostile projectile.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ProjectileSnapshot {
        /// Current centre.
        pub position: Vec2,
        /// Velocity per reference frame.
        pub velocity: Vec2,
        /// Collision footprint.
        pub shape: ProjectileShape,
        /// Render hint.
        pub tint: HazardTint,
        /// Seconds alive.
        pub age: f32,
    }

    /// Read-only snapshot of a player bullet.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct BulletSnapshot {
        /// Current centre.
        pub position: Vec2,
        /// Collision radius.
        pub radius: f32,
    }

    /// Read-only snapshot of a turret.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct TurretSnapshot {
        /// Turret identifier.
        pub id: TurretId,
        /// Turret position.
        pub position: Vec2,
        /// Current (or locked) bearing in degrees.
        pub bearing_degrees: f32,
        /// Whether the bearing is locked.
        pub locked: bool,
    }

    /// Read-only snapshot of a beam.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct BeamSnapshot {
        /// Beam identifier.
        pub id: BeamId,
        /// Turret or border origin.
        pub kind: BeamKind,
        /// Start of the beam.
        pub origin: Vec2,
        /// End of the beam, one arena diagonal away.
        pub end: Vec2,
        /// Half of the beam thickness.
        pub half_width: f32,
        /// Telegraph, live or spent.
        pub stage: BeamStage,
    }
}

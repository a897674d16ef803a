#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Sanctuary encounter engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems observe read-only views and
//! the [`BossFrame`] produced by the phase controller, then respond with
//! [`Command`] values. The world executes those commands via its `apply`
//! entry point and broadcasts [`Event`] values describing what changed.

mod config;
mod random;

use std::time::Duration;

pub use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use config::{
    ArenaTuning, BossTuning, ConfigError, CycleTuning, EncounterConfig, HazardTuning,
    PlayerTuning, SurvivalTuning,
};
pub use random::RandomSource;

/// Title used by adapters when presenting the encounter.
pub const WINDOW_TITLE: &str = "Oryx Sanctuary";

/// Number of reference frames per second that projectile speeds are expressed in.
///
/// Speeds are authored as "units per frame at 60 Hz"; integration multiplies
/// by this constant and the real delta-time so motion is frame-rate independent.
pub const FRAME_SCALE: f32 = 60.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Restores every piece of encounter state to its start-of-encounter value.
    Reset,
    /// Advances hazards, projectiles and collisions by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Moves the player according to the provided intent, clamped to the arena.
    MovePlayer {
        /// Directional flags captured by the adapter.
        intent: MoveIntent,
        /// Duration the intent was held for.
        dt: Duration,
    },
    /// Launches one player bullet from the player toward each target point.
    FirePlayerBullets {
        /// World-space points the bullets are aimed at.
        targets: Vec<Vec2>,
    },
    /// Publishes the boss state computed by the phase controller for this tick.
    SetBoss {
        /// Boss centre in world units.
        position: Vec2,
        /// Phase whose pattern and motion drive the boss.
        phase: Phase,
        /// Sub-state gating which behaviour runs.
        stage: Stage,
        /// Seconds spent in the current stage.
        stage_elapsed: f32,
    },
    /// Removes every hostile projectile, turret and beam from the arena.
    ClearHazards,
    /// Appends freshly emitted projectiles to the projectile store.
    SpawnProjectiles {
        /// Launch descriptions for the new projectiles.
        projectiles: Vec<ProjectileSpec>,
    },
    /// Places a turret that tracks the player before firing a beam.
    SpawnTurret {
        /// Turret position in world units.
        position: Vec2,
    },
    /// Telegraphs a beam that sweeps across the arena from one of its edges.
    SpawnBorderLaser {
        /// Edge point the beam originates from.
        origin: Vec2,
        /// Direction of the beam in degrees.
        direction_degrees: f32,
    },
    /// Installs or removes the void corridor that kills the player outside its band.
    SetCorridor {
        /// Safe band, or `None` to remove the void.
        corridor: Option<Corridor>,
    },
    /// Freezes the encounter with the provided terminal outcome.
    DeclareOutcome {
        /// Outcome reported by the outcome tracker.
        outcome: EncounterOutcome,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the encounter returned to its initial state.
    EncounterReset,
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the boss switched to another phase.
    BossPhaseChanged {
        /// Phase that was active before the change.
        from: Phase,
        /// Phase that is now active.
        to: Phase,
    },
    /// Announces that the boss entered a different sub-state.
    BossStageChanged {
        /// Stage that was active before the change.
        from: Stage,
        /// Stage that is now active.
        to: Stage,
    },
    /// Reports how many hazards were removed by a clear request.
    HazardsCleared {
        /// Number of projectiles removed.
        projectiles: usize,
        /// Number of turrets removed.
        turrets: usize,
        /// Number of beams removed.
        beams: usize,
    },
    /// Reports that a projectile burst into shards.
    ShardBurst {
        /// Position the parent projectile occupied when it burst.
        position: Vec2,
        /// Number of shards launched.
        shards: usize,
    },
    /// Reports that the player lost health to a hazard contact.
    PlayerDamaged {
        /// Health removed by the hit.
        amount: f32,
        /// Health remaining after the hit.
        remaining: f32,
    },
    /// Reports that the player strayed into the void outside the corridor.
    PlayerVoided,
    /// Reports that a player bullet struck the boss.
    BossDamaged {
        /// Health removed by the hit.
        amount: f32,
        /// Health remaining after the hit.
        remaining: f32,
    },
    /// Confirms that a turret was placed in the arena.
    TurretPlaced {
        /// Identifier assigned to the turret.
        turret: TurretId,
        /// Turret position in world units.
        position: Vec2,
    },
    /// Reports that a turret stopped tracking and locked its bearing.
    TurretLocked {
        /// Identifier of the turret.
        turret: TurretId,
        /// Locked bearing in degrees.
        bearing_degrees: f32,
    },
    /// Reports that a beam began its telegraph.
    BeamTelegraphed {
        /// Identifier of the beam.
        beam: BeamId,
        /// Whether the beam came from a turret or an arena edge.
        kind: BeamKind,
    },
    /// Reports that a beam finished its telegraph and can now hurt the player.
    BeamLive {
        /// Identifier of the beam.
        beam: BeamId,
    },
    /// Announces that the encounter reached a terminal outcome.
    OutcomeDecided {
        /// Terminal outcome.
        outcome: EncounterOutcome,
    },
}

/// Selects which of the two encounter variants is simulated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncounterVariant {
    /// Boss fight: the player shoots back and the boss escalates into survival interludes.
    #[default]
    Sanctuary,
    /// Dodge-only gauntlet with turrets and border lasers, won by outlasting the clock.
    Gauntlet,
}

impl EncounterVariant {
    const SANCTUARY_PHASES: [Phase; 6] = [
        Phase::Spiral,
        Phase::Rain,
        Phase::Gaps,
        Phase::Cross,
        Phase::Shotgun,
        Phase::Stream,
    ];

    const GAUNTLET_PHASES: [Phase; 5] = [
        Phase::Spiral,
        Phase::Rain,
        Phase::Cross,
        Phase::Stream,
        Phase::Sentinel,
    ];

    /// Phases the boss cycles through in this variant. The first entry opens the encounter.
    #[must_use]
    pub fn phase_pool(self) -> &'static [Phase] {
        match self {
            Self::Sanctuary => &Self::SANCTUARY_PHASES,
            Self::Gauntlet => &Self::GAUNTLET_PHASES,
        }
    }

    /// Whether the boss can be damaged and therefore defeated.
    #[must_use]
    pub const fn boss_vulnerable(self) -> bool {
        matches!(self, Self::Sanctuary)
    }

    /// Whether the player may fire bullets.
    #[must_use]
    pub const fn player_weapons(self) -> bool {
        matches!(self, Self::Sanctuary)
    }

    /// Whether health thresholds trigger survival interludes.
    #[must_use]
    pub const fn survival_escalation(self) -> bool {
        matches!(self, Self::Sanctuary)
    }
}

/// Named boss behaviour mode with its own motion function and projectile pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Rotating radial rings fired from the arena centre.
    Spiral,
    /// Projectiles falling from above the arena.
    Rain,
    /// Fast rings with a safe gap centred on the player's bearing.
    Gaps,
    /// Rotating six-way cross fired at two speeds.
    Cross,
    /// Heavy aimed fan of large projectiles.
    Shotgun,
    /// Rapid aimed three-way stream.
    Stream,
    /// Turrets and border lasers while the boss patrols the perimeter.
    Sentinel,
}

impl Phase {
    /// Human readable label used by logs and adapters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Spiral => "spiral",
            Self::Rain => "rain",
            Self::Gaps => "gaps",
            Self::Cross => "cross",
            Self::Shotgun => "shotgun",
            Self::Stream => "stream",
            Self::Sentinel => "sentinel",
        }
    }
}

/// Index of a survival interlude, starting at one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurvivalTier(u8);

impl SurvivalTier {
    /// The knife-wall interlude.
    pub const FIRST: Self = Self(1);

    /// Creates a new tier wrapper.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric tier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Mutually exclusive boss sub-state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// The phase's motion function and pattern run.
    Active,
    /// Telegraph before the selected phase starts; the boss eases to its staging point.
    Warning,
    /// Telegraph before a survival interlude.
    SurvivalWarning {
        /// Interlude about to start.
        tier: SurvivalTier,
    },
    /// High-density survival interlude; the boss is invulnerable.
    Survival {
        /// Interlude that is running.
        tier: SurvivalTier,
    },
}

impl Stage {
    /// Whether the stage belongs to a survival interlude (telegraph included).
    #[must_use]
    pub const fn is_survival(self) -> bool {
        matches!(self, Self::SurvivalWarning { .. } | Self::Survival { .. })
    }

    /// Whether player bullets are ignored by the boss during this stage.
    #[must_use]
    pub const fn boss_invulnerable(self) -> bool {
        self.is_survival()
    }
}

/// Boss state produced by the phase controller once per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossFrame {
    /// Boss centre in world units.
    pub position: Vec2,
    /// Phase currently selected.
    pub phase: Phase,
    /// Stage currently active.
    pub stage: Stage,
    /// Seconds since the phase last became active.
    pub phase_elapsed: f32,
    /// Seconds spent in the current stage.
    pub stage_elapsed: f32,
    /// Stage entered during this tick, if a transition happened.
    pub entered: Option<Stage>,
}

/// Terminal state tracking for the encounter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncounterOutcome {
    /// The encounter is still being played.
    #[default]
    Ongoing,
    /// The player ran out of health.
    Defeat,
    /// The boss ran out of health or the player outlasted the clock.
    Victory,
}

impl EncounterOutcome {
    /// Whether the outcome freezes the simulation.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// Directional movement flags captured from the input device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MoveIntent {
    /// Move toward decreasing y.
    pub up: bool,
    /// Move toward increasing y.
    pub down: bool,
    /// Move toward decreasing x.
    pub left: bool,
    /// Move toward increasing x.
    pub right: bool,
}

impl MoveIntent {
    /// Per-axis direction in `-1.0..=1.0`; opposing flags cancel out.
    ///
    /// Diagonals are intentionally not normalised: each axis moves at full speed.
    #[must_use]
    pub fn axis(self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.up {
            axis.y -= 1.0;
        }
        if self.down {
            axis.y += 1.0;
        }
        if self.left {
            axis.x -= 1.0;
        }
        if self.right {
            axis.x += 1.0;
        }
        axis
    }
}

/// Everything the input collaborator reports for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerInput {
    /// Held movement directions.
    pub movement: MoveIntent,
    /// Pointer position in world units, if the pointer is over the arena.
    pub aim_target: Option<Vec2>,
    /// Primary fire held.
    pub primary_fire: bool,
    /// Secondary (ring) fire held.
    pub secondary_fire: bool,
    /// Reset requested.
    pub reset: bool,
}

/// Render hint selected by the emitting pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardTint {
    /// Default red projectile.
    #[default]
    Crimson,
    /// Gap-ring projectiles.
    Verdant,
    /// Shotgun pellets.
    Ember,
    /// Knife-wall blades.
    Steel,
    /// Survival cross flashes.
    Toxic,
    /// Survival side streams.
    Mint,
    /// Survival miasma arms.
    Amber,
    /// Splitting poprocks and their shards.
    Gold,
    /// Corner tower bursts.
    Orchid,
}

/// Collision footprint of a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ProjectileShape {
    /// Disc with the provided radius.
    Circle {
        /// Radius in world units.
        radius: f32,
    },
    /// Axis-aligned narrow rectangle.
    Blade {
        /// Half width and half height in world units.
        half_extents: Vec2,
    },
}

impl ProjectileShape {
    /// Radius of the smallest circle enclosing the shape.
    #[must_use]
    pub fn bounding_radius(self) -> f32 {
        match self {
            Self::Circle { radius } => radius,
            Self::Blade { half_extents } => half_extents.length(),
        }
    }

    /// Whether the shape centred at `center` overlaps the disc at `other` with `radius`.
    #[must_use]
    pub fn overlaps_circle(self, center: Vec2, other: Vec2, radius: f32) -> bool {
        match self {
            Self::Circle { radius: own } => {
                let reach = own + radius;
                center.distance_squared(other) <= reach * reach
            }
            Self::Blade { half_extents } => {
                let offset = other - center;
                let closest = offset.clamp(-half_extents, half_extents);
                offset.distance_squared(closest) <= radius * radius
            }
        }
    }
}

/// Ring of children launched when a projectile bursts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShardBurst {
    /// Number of shards, spread evenly over 360 degrees starting at 0.
    pub count: u32,
    /// Launch speed of each shard.
    pub speed: f32,
    /// Radius of each shard.
    pub radius: f32,
}

impl ShardBurst {
    /// Launch descriptions for the shards of a parent that burst at `position`.
    #[must_use]
    pub fn shards(self, position: Vec2, tint: HazardTint) -> Vec<ProjectileSpec> {
        if self.count == 0 {
            return Vec::new();
        }
        let step = 360.0 / self.count as f32;
        (0..self.count)
            .map(|index| {
                ProjectileSpec::launched(position, index as f32 * step, self.speed, self.radius)
                    .tinted(tint)
            })
            .collect()
    }
}

/// Split-on-range behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeSplit {
    /// Displacement from the launch origin that triggers the burst.
    pub distance: f32,
    /// Children launched at the burst position.
    pub burst: ShardBurst,
}

/// Independent capability flags attached to a projectile.
///
/// The lifecycle sweep evaluates them in a fixed order: `split` first, then
/// `time_to_live` and `reach`, then player contact, then arena bounds. The first
/// predicate that fires decides the projectile's fate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Behaviors {
    /// Burst into shards once the displacement from origin exceeds a distance.
    pub split: Option<RangeSplit>,
    /// Expire once the displacement from origin exceeds this distance.
    pub reach: Option<f32>,
    /// Expire once the projectile has been alive this many seconds.
    pub time_to_live: Option<f32>,
}

/// Launch description for a hostile projectile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    /// Launch position, also recorded as the projectile's origin.
    pub position: Vec2,
    /// Velocity in world units per reference frame.
    pub velocity: Vec2,
    /// Collision footprint.
    pub shape: ProjectileShape,
    /// Render hint.
    pub tint: HazardTint,
    /// Lifecycle behaviours.
    pub behaviors: Behaviors,
}

impl ProjectileSpec {
    /// Creates a circular projectile launched along `angle_degrees` at `speed`.
    #[must_use]
    pub fn launched(position: Vec2, angle_degrees: f32, speed: f32, radius: f32) -> Self {
        Self {
            position,
            velocity: heading(angle_degrees) * speed,
            shape: ProjectileShape::Circle { radius },
            tint: HazardTint::default(),
            behaviors: Behaviors::default(),
        }
    }

    /// Replaces the render hint.
    #[must_use]
    pub fn tinted(mut self, tint: HazardTint) -> Self {
        self.tint = tint;
        self
    }

    /// Replaces the collision footprint.
    #[must_use]
    pub fn shaped(mut self, shape: ProjectileShape) -> Self {
        self.shape = shape;
        self
    }

    /// Expires the projectile after `seconds` of life.
    #[must_use]
    pub fn with_time_to_live(mut self, seconds: f32) -> Self {
        self.behaviors.time_to_live = Some(seconds);
        self
    }

    /// Expires the projectile once it travelled farther than `distance`.
    #[must_use]
    pub fn expiring_beyond(mut self, distance: f32) -> Self {
        self.behaviors.reach = Some(distance);
        self
    }

    /// Bursts the projectile into `burst` once it travelled farther than `distance`.
    #[must_use]
    pub fn splitting_beyond(mut self, distance: f32, burst: ShardBurst) -> Self {
        self.behaviors.split = Some(RangeSplit { distance, burst });
        self
    }
}

/// Unit vector pointing along `angle_degrees` (0 = +x, 90 = +y).
#[must_use]
pub fn heading(angle_degrees: f32) -> Vec2 {
    let radians = angle_degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Bearing in degrees from `from` toward `to`, in `(-180, 180]`.
#[must_use]
pub fn bearing_degrees(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x).to_degrees()
}

/// Smallest absolute angle between two bearings, in `[0, 180]`.
#[must_use]
pub fn angular_distance(a_degrees: f32, b_degrees: f32) -> f32 {
    ((a_degrees - b_degrees + 540.0).rem_euclid(360.0) - 180.0).abs()
}

/// Safe horizontal band; everything left of `left` or right of `right` is void.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Corridor {
    /// Left edge of the safe band.
    pub left: f32,
    /// Right edge of the safe band.
    pub right: f32,
}

impl Corridor {
    /// Creates a corridor centred on `center` with the provided total width.
    #[must_use]
    pub fn centered(center: f32, width: f32) -> Self {
        let half = width * 0.5;
        Self {
            left: center - half,
            right: center + half,
        }
    }

    /// Whether the x coordinate lies inside the safe band.
    #[must_use]
    pub fn contains(&self, x: f32) -> bool {
        x >= self.left && x <= self.right
    }
}

/// Unique identifier assigned to a turret.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TurretId(u32);

impl TurretId {
    /// Creates a new turret identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a beam.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BeamId(u32);

impl BeamId {
    /// Creates a new beam identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Origin of a beam.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeamKind {
    /// Fired by a placed turret along its locked bearing.
    Turret(TurretId),
    /// Fired inward from an arena edge.
    Border,
}

/// Lifecycle stage of a beam.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeamStage {
    /// Visual-only warning; no collision.
    Telegraph,
    /// Collision-enabled.
    Live,
    /// Finished; removed on the next sweep.
    Spent,
}

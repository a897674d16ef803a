//! Tunable constants for the encounter, grouped by the component that reads them.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{EncounterVariant, Phase};

/// Complete tuning for one encounter.
///
/// Every field falls back to its default when omitted from a serialized
/// document, so a partial configuration file only overrides what it lists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// Which encounter variant to simulate.
    pub variant: EncounterVariant,
    /// Seconds the player must survive to win the gauntlet variant.
    pub survival_goal: f32,
    /// Arena dimensions and culling margin.
    pub arena: ArenaTuning,
    /// Player body, health and weapon constants.
    pub player: PlayerTuning,
    /// Boss body and health constants.
    pub boss: BossTuning,
    /// Phase cycle timings and easing gains.
    pub cycle: CycleTuning,
    /// Survival escalation thresholds and timings.
    pub survival: SurvivalTuning,
    /// Turret and beam timings.
    pub hazards: HazardTuning,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            variant: EncounterVariant::default(),
            survival_goal: 90.0,
            arena: ArenaTuning::default(),
            player: PlayerTuning::default(),
            boss: BossTuning::default(),
            cycle: CycleTuning::default(),
            survival: SurvivalTuning::default(),
            hazards: HazardTuning::default(),
        }
    }
}

/// Arena dimensions in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    /// Arena width.
    pub width: f32,
    /// Arena height.
    pub height: f32,
    /// Distance outside the arena a projectile may travel before it is culled.
    pub cull_margin: f32,
}

impl ArenaTuning {
    /// Arena dimensions as a vector.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Centre of the arena.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Length of the arena diagonal; beams span this distance.
    #[must_use]
    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            cull_margin: 150.0,
        }
    }
}

/// Player constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Collision radius.
    pub radius: f32,
    /// Health at the start of the encounter.
    pub max_health: f32,
    /// Movement speed in world units per second on each axis.
    pub speed: f32,
    /// Health removed by one hazard contact.
    pub hit_damage: f32,
    /// Minimum seconds between two damage applications.
    pub rehit_interval: f32,
    /// Spawn height as a fraction of the arena height.
    pub spawn_height_ratio: f32,
    /// Player bullet speed in world units per reference frame.
    pub bullet_speed: f32,
    /// Player bullet radius.
    pub bullet_radius: f32,
    /// Minimum seconds between primary shots.
    pub primary_interval: f32,
    /// Minimum seconds between secondary rings.
    pub secondary_interval: f32,
    /// Bullets per secondary ring.
    pub secondary_count: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: 15.0,
            max_health: 1000.0,
            speed: 500.0,
            hit_damage: 10.0,
            rehit_interval: 0.15,
            spawn_height_ratio: 0.8,
            bullet_speed: 15.0,
            bullet_radius: 5.0,
            primary_interval: 0.12,
            secondary_interval: 0.5,
            secondary_count: 12,
        }
    }
}

/// Boss constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    /// Half the side length of the square boss body.
    pub half_extent: f32,
    /// Health at the start of the encounter.
    pub max_health: f32,
    /// Spawn height; the boss starts horizontally centred.
    pub spawn_y: f32,
    /// Health removed by one player bullet.
    pub bullet_damage: f32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            half_extent: 40.0,
            max_health: 8000.0,
            spawn_y: 200.0,
            bullet_damage: 15.0,
        }
    }
}

/// Normal phase cycle constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleTuning {
    /// Seconds between phase selections.
    pub phase_duration: f32,
    /// Seconds between phase selections while the stream phase runs.
    pub aggressive_duration: f32,
    /// Seconds of telegraph before a selected phase becomes active.
    pub warning_duration: f32,
    /// Per-tick easing gain toward the staging point during the telegraph.
    pub warning_gain: f32,
    /// Per-tick easing gain used by centring motion.
    pub motion_gain: f32,
    /// Seconds the normal pattern accumulator must exceed before it fires.
    pub cadence: f32,
}

impl CycleTuning {
    /// Seconds between phase selections while `phase` is selected.
    #[must_use]
    pub fn duration_of(&self, phase: Phase) -> f32 {
        match phase {
            Phase::Stream => self.aggressive_duration,
            _ => self.phase_duration,
        }
    }
}

impl Default for CycleTuning {
    fn default() -> Self {
        Self {
            phase_duration: 8.0,
            aggressive_duration: 6.0,
            warning_duration: 2.0,
            warning_gain: 0.08,
            motion_gain: 0.05,
            cadence: 0.12,
        }
    }
}

/// Survival escalation constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivalTuning {
    /// Health ratio lost between two consecutive interludes.
    pub threshold_step: f32,
    /// Maximum number of interludes per encounter.
    pub tiers: u8,
    /// Seconds of telegraph before an interlude.
    pub warning_duration: f32,
    /// Seconds an interlude lasts.
    pub duration: f32,
    /// Per-tick easing gain toward the interlude stage position.
    pub gain: f32,
}

impl Default for SurvivalTuning {
    fn default() -> Self {
        Self {
            threshold_step: 0.3,
            tiers: 3,
            warning_duration: 2.0,
            duration: 15.0,
            gain: 0.05,
        }
    }
}

/// Turret and beam constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    /// Seconds between turret placements.
    pub turret_interval: f32,
    /// Seconds a turret tracks the player before locking.
    pub turret_track: f32,
    /// Minimum distance between a turret and the arena edge.
    pub turret_margin: f32,
    /// Telegraph seconds of a turret beam.
    pub laser_telegraph: f32,
    /// Live seconds of a turret beam.
    pub laser_live: f32,
    /// Seconds between border lasers.
    pub border_interval: f32,
    /// Telegraph seconds of a border beam.
    pub border_telegraph: f32,
    /// Live seconds of a border beam.
    pub border_live: f32,
    /// Half the thickness of every beam.
    pub beam_half_width: f32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            turret_interval: 1.4,
            turret_track: 1.0,
            turret_margin: 150.0,
            laser_telegraph: 0.7,
            laser_live: 0.35,
            border_interval: 2.2,
            border_telegraph: 0.9,
            border_live: 0.4,
            beam_half_width: 10.0,
        }
    }
}

/// Reasons an [`EncounterConfig`] cannot drive a simulation.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A length, duration or amount that must be strictly positive was not.
    #[error("`{field}` must be positive, got {value}")]
    NonPositive {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// The survival step does not describe a fraction of the health bar.
    #[error("`survival.threshold_step` must lie in (0, 1), got {0}")]
    ThresholdStep(f32),
    /// The spawn height does not lie inside the arena.
    #[error("`player.spawn_height_ratio` must lie in [0, 1], got {0}")]
    SpawnRatio(f32),
    /// The turret margin leaves no interior to place turrets in.
    #[error("`hazards.turret_margin` {margin} leaves no room inside a {width}x{height} arena")]
    TurretMargin {
        /// Rejected margin.
        margin: f32,
        /// Arena width.
        width: f32,
        /// Arena height.
        height: f32,
    },
}

impl EncounterConfig {
    /// Creates the default configuration for the provided variant.
    #[must_use]
    pub fn for_variant(variant: EncounterVariant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Rejects values that would stall or corrupt the simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("survival_goal", self.survival_goal),
            ("arena.width", self.arena.width),
            ("arena.height", self.arena.height),
            ("player.radius", self.player.radius),
            ("player.max_health", self.player.max_health),
            ("player.speed", self.player.speed),
            ("player.bullet_radius", self.player.bullet_radius),
            ("player.primary_interval", self.player.primary_interval),
            ("player.secondary_interval", self.player.secondary_interval),
            ("boss.half_extent", self.boss.half_extent),
            ("boss.max_health", self.boss.max_health),
            ("cycle.phase_duration", self.cycle.phase_duration),
            ("cycle.aggressive_duration", self.cycle.aggressive_duration),
            ("cycle.warning_duration", self.cycle.warning_duration),
            ("cycle.cadence", self.cycle.cadence),
            ("survival.warning_duration", self.survival.warning_duration),
            ("survival.duration", self.survival.duration),
            ("hazards.turret_interval", self.hazards.turret_interval),
            ("hazards.laser_telegraph", self.hazards.laser_telegraph),
            ("hazards.laser_live", self.hazards.laser_live),
            ("hazards.border_interval", self.hazards.border_interval),
            ("hazards.border_telegraph", self.hazards.border_telegraph),
            ("hazards.border_live", self.hazards.border_live),
            ("hazards.beam_half_width", self.hazards.beam_half_width),
        ];
        for (field, value) in positive {
            // NaN fails this comparison as well.
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        let step = self.survival.threshold_step;
        if !(step > 0.0 && step < 1.0) {
            return Err(ConfigError::ThresholdStep(step));
        }

        let ratio = self.player.spawn_height_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ConfigError::SpawnRatio(ratio));
        }

        let margin = self.hazards.turret_margin;
        if margin < 0.0
            || margin * 2.0 >= self.arena.width
            || margin * 2.0 >= self.arena.height
        {
            return Err(ConfigError::TurretMargin {
                margin,
                width: self.arena.width,
                height: self.arena.height,
            });
        }

        Ok(())
    }
}

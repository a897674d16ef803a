#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Sanctuary adapters.

pub mod visuals;

use anyhow::Result as AnyResult;
use glam::Vec2;
use sanctuary_core::{Corridor, MoveIntent, PlayerInput, ProjectileShape};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self::from_rgba_u8(red, green, blue, 255)
    }

    /// Creates a color from byte RGBA values.
    #[must_use]
    pub const fn from_rgba_u8(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: alpha as f32 / 255.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns the same color with its alpha channel replaced.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Directional keys held this frame.
    pub movement: MoveIntent,
    /// Cursor position expressed in world units, clamped to the arena bounds.
    pub cursor_world_space: Option<Vec2>,
    /// Whether the primary fire button is held.
    pub primary_fire: bool,
    /// Whether the secondary fire button is held.
    pub secondary_fire: bool,
    /// Whether a reset was requested on this frame.
    pub reset: bool,
}

impl From<FrameInput> for PlayerInput {
    fn from(input: FrameInput) -> Self {
        Self {
            movement: input.movement,
            aim_target: input.cursor_world_space,
            primary_fire: input.primary_fire,
            secondary_fire: input.secondary_fire,
            reset: input.reset,
        }
    }
}

/// Playfield dimensions and backdrop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArenaPresentation {
    /// Width of the arena in world units.
    pub width: f32,
    /// Height of the arena in world units.
    pub height: f32,
    /// Color the arena is cleared to.
    pub background: Color,
}

impl ArenaPresentation {
    /// Creates an arena descriptor, rejecting degenerate dimensions.
    pub fn new(width: f32, height: f32, background: Color) -> Result<Self, RenderingError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(RenderingError::InvalidArena { width, height });
        }
        Ok(Self {
            width,
            height,
            background,
        })
    }

    /// Centre of the arena.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }

    /// Clamps the provided world-space position to the arena bounds.
    #[must_use]
    pub fn clamp_world_position(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            position.x.clamp(0.0, self.width),
            position.y.clamp(0.0, self.height),
        )
    }

    /// Returns `true` when the position lies within the arena bounds.
    #[must_use]
    pub fn contains(&self, position: Vec2) -> bool {
        (0.0..=self.width).contains(&position.x) && (0.0..=self.height).contains(&position.y)
    }
}

/// Horizontal bar showing a fraction of a maximum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthBar {
    /// Top-left corner in world units.
    pub top_left: Vec2,
    /// Full size of the bar.
    pub size: Vec2,
    /// Filled share in the range 0.0..=1.0.
    pub fraction: f32,
    /// Color of the empty part.
    pub back: Color,
    /// Color of the filled part.
    pub fill: Color,
}

impl HealthBar {
    /// Creates a bar centred horizontally on `anchor` with its top edge at `anchor.y`.
    #[must_use]
    pub fn centered(anchor: Vec2, size: Vec2, fraction: f32, back: Color, fill: Color) -> Self {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            top_left: Vec2::new(anchor.x - size.x * 0.5, anchor.y),
            size,
            fraction,
            back,
            fill,
        }
    }

    /// Width of the filled part.
    #[must_use]
    pub fn filled_width(&self) -> f32 {
        self.size.x * self.fraction
    }
}

/// Boss square as it should be drawn this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossPresentation {
    /// Centre of the boss.
    pub position: Vec2,
    /// Half the side length of the square.
    pub half_extent: f32,
    /// Fill color after blink rules.
    pub color: Color,
}

/// Player disc with its personal health bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Centre of the player.
    pub position: Vec2,
    /// Radius of the player disc.
    pub radius: f32,
    /// Fill color of the disc.
    pub color: Color,
    /// Health bar drawn under the player.
    pub health: HealthBar,
}

/// Hostile projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Centre of the projectile.
    pub position: Vec2,
    /// Collision footprint, drawn as-is.
    pub shape: ProjectileShape,
    /// Fill color.
    pub color: Color,
}

/// Disc drawn for a player bullet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletPresentation {
    /// Centre of the bullet.
    pub position: Vec2,
    /// Radius of the bullet.
    pub radius: f32,
    /// Fill color.
    pub color: Color,
}

/// Turret body with a barrel along its bearing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurretPresentation {
    /// Centre of the turret.
    pub position: Vec2,
    /// Barrel direction in degrees.
    pub bearing_degrees: f32,
    /// Fill color, brighter once the bearing is locked.
    pub color: Color,
}

/// Beam segment drawn from origin to end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamPresentation {
    /// Start of the segment.
    pub origin: Vec2,
    /// End of the segment.
    pub end: Vec2,
    /// Drawn thickness.
    pub thickness: f32,
    /// Stroke color; translucent while telegraphing.
    pub color: Color,
}

/// Vertical band of the arena that is lethal to stand in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoidPresentation {
    /// Left edge of the band.
    pub left: f32,
    /// Right edge of the band.
    pub right: f32,
    /// Fill color.
    pub color: Color,
}

impl VoidPresentation {
    /// Bands to either side of `corridor` within an arena of `width`.
    #[must_use]
    pub fn around(corridor: Corridor, width: f32, color: Color) -> [Self; 2] {
        [
            Self {
                left: 0.0,
                right: corridor.left.clamp(0.0, width),
                color,
            },
            Self {
                left: corridor.right.clamp(0.0, width),
                right: width,
                color,
            },
        ]
    }

    /// Width of the band.
    #[must_use]
    pub fn width(&self) -> f32 {
        (self.right - self.left).max(0.0)
    }
}

/// Square marker drawn at a fixed tower position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerPresentation {
    /// Centre of the tower.
    pub position: Vec2,
    /// Half the side length of the square.
    pub half_extent: f32,
    /// Fill color.
    pub color: Color,
}

/// Everything an adapter needs to draw one frame.
///
/// Draw order follows field order: voids, towers, boss, beams, projectiles,
/// bullets, turrets, player, bars, wash.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Arena dimensions and backdrop.
    pub arena: ArenaPresentation,
    /// Lethal bands outside the survival corridor.
    pub voids: Vec<VoidPresentation>,
    /// Corner towers of the final survival tier.
    pub towers: Vec<TowerPresentation>,
    /// Boss, hidden once it has been defeated.
    pub boss: Option<BossPresentation>,
    /// Telegraphed and live beams.
    pub beams: Vec<BeamPresentation>,
    /// Hostile projectiles.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Player bullets.
    pub bullets: Vec<BulletPresentation>,
    /// Placed turrets.
    pub turrets: Vec<TurretPresentation>,
    /// Player disc and health bar.
    pub player: PlayerPresentation,
    /// Boss health bar, absent when the boss cannot be damaged.
    pub boss_health: Option<HealthBar>,
    /// Full-arena tint announcing the outcome.
    pub wash: Option<Color>,
}

impl Scene {
    /// Creates a scene showing only the arena and the player.
    #[must_use]
    pub fn new(arena: ArenaPresentation, player: PlayerPresentation) -> Self {
        Self {
            arena,
            voids: Vec::new(),
            towers: Vec::new(),
            boss: None,
            beams: Vec::new(),
            projectiles: Vec::new(),
            bullets: Vec::new(),
            turrets: Vec::new(),
            player,
            boss_health: None,
            wash: None,
        }
    }

    /// Drops every per-frame entity while keeping allocations.
    pub fn clear_entities(&mut self) {
        self.voids.clear();
        self.towers.clear();
        self.boss = None;
        self.beams.clear();
        self.projectiles.clear();
        self.bullets.clear();
        self.turrets.clear();
        self.boss_health = None;
        self.wash = None;
    }
}

/// Describes a full frame ready for presentation by a rendering backend.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used for the window or surface.
    pub window_title: String,
    /// Color the framebuffer is cleared to outside the arena.
    pub clear_color: Color,
    /// Scene that should be rendered.
    pub scene: Scene,
}

impl Presentation {
    /// Creates a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Time the host spent on its side of a frame, reported back to the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSimulationBreakdown {
    /// Time spent stepping the encounter.
    pub simulation: Duration,
    /// Time spent rebuilding the scene from world queries.
    pub scene_population: Duration,
}

/// Rendering backend capable of presenting Sanctuary scenes.
pub trait RenderingBackend {
    /// Runs the rendering loop until the window is closed or quit is requested.
    ///
    /// `update_scene` receives the frame delta and input, mutates the scene in
    /// place and reports how long it took.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameSimulationBreakdown + 'static;
}

/// Errors that can occur while constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Arena dimensions must both be positive.
    InvalidArena {
        /// Width that was provided.
        width: f32,
        /// Height that was provided.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArena { width, height } => {
                write!(
                    f,
                    "arena dimensions must be positive (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

//! Palette and blink rules that turn simulation state into colors.

use sanctuary_core::{BeamStage, EncounterOutcome, HazardTint, Phase, Stage};

use crate::Color;

/// Window area outside the arena.
pub const LETTERBOX: Color = Color::from_rgb_u8(0, 0, 0);
/// Arena backdrop.
pub const BACKGROUND: Color = Color::from_rgb_u8(10, 10, 15);
/// Player disc.
pub const PLAYER: Color = Color::from_rgb_u8(0, 255, 255);
/// Player bullets.
pub const PLAYER_BULLET: Color = Color::from_rgb_u8(255, 255, 0);
/// Lethal bands outside the survival corridor.
pub const VOID: Color = Color::from_rgb_u8(20, 0, 40);
/// Corner towers.
pub const TOWER: Color = Color::from_rgb_u8(150, 0, 150);
/// Empty part of the boss health bar.
pub const BOSS_BAR_BACK: Color = Color::from_rgb_u8(50, 50, 50);
/// Filled part of the boss health bar.
pub const BOSS_BAR_FILL: Color = Color::from_rgb_u8(255, 0, 0);
/// Empty part of the player health bar.
pub const PLAYER_BAR_BACK: Color = Color::from_rgb_u8(255, 0, 0);
/// Filled part of the player health bar.
pub const PLAYER_BAR_FILL: Color = Color::from_rgb_u8(0, 255, 0);

const BLUE: Color = Color::from_rgb_u8(0, 0, 255);
const BLACK: Color = Color::from_rgb_u8(0, 0, 0);
const WHITE: Color = Color::from_rgb_u8(255, 255, 255);
const FINAL_SURVIVAL: Color = Color::from_rgb_u8(255, 69, 0);
const TURRET_TRACKING: Color = Color::from_rgb_u8(120, 120, 140);
const BEAM: Color = Color::from_rgb_u8(255, 60, 60);

const SURVIVAL_BLINK_RATE: f32 = 15.0;
const WARNING_BLINK_RATE: f32 = 12.0;
const FINAL_TIER: u8 = 3;

/// Signature color of a phase.
#[must_use]
pub const fn phase_color(phase: Phase) -> Color {
    match phase {
        Phase::Spiral => Color::from_rgb_u8(255, 0, 255),
        Phase::Rain => Color::from_rgb_u8(255, 255, 0),
        Phase::Gaps => Color::from_rgb_u8(0, 255, 0),
        Phase::Cross => Color::from_rgb_u8(255, 0, 0),
        Phase::Shotgun => WHITE,
        Phase::Stream => Color::from_rgb_u8(255, 128, 0),
        Phase::Sentinel => Color::from_rgb_u8(0, 255, 255),
    }
}

/// Fill color of a projectile tint.
#[must_use]
pub const fn tint_color(tint: HazardTint) -> Color {
    match tint {
        HazardTint::Crimson => Color::from_rgb_u8(255, 0, 0),
        HazardTint::Verdant => Color::from_rgb_u8(0, 255, 0),
        HazardTint::Ember => Color::from_rgb_u8(255, 165, 0),
        HazardTint::Steel => Color::from_rgb_u8(220, 220, 220),
        HazardTint::Toxic => Color::from_rgb_u8(0, 255, 100),
        HazardTint::Mint => Color::from_rgb_u8(150, 255, 150),
        HazardTint::Amber => Color::from_rgb_u8(255, 150, 0),
        HazardTint::Gold => Color::from_rgb_u8(255, 255, 0),
        HazardTint::Orchid => Color::from_rgb_u8(255, 100, 255),
    }
}

/// Boss fill for the current stage.
///
/// Telegraphs blink: the phase warning alternates white and the incoming
/// phase color, the survival warning alternates blue and black.
#[must_use]
pub fn boss_color(phase: Phase, stage: Stage, stage_elapsed: f32) -> Color {
    match stage {
        Stage::Active => phase_color(phase),
        Stage::Warning => {
            if blink_on(stage_elapsed, WARNING_BLINK_RATE) {
                WHITE
            } else {
                phase_color(phase)
            }
        }
        Stage::SurvivalWarning { .. } => {
            if blink_on(stage_elapsed, SURVIVAL_BLINK_RATE) {
                BLUE
            } else {
                BLACK
            }
        }
        Stage::Survival { tier } if tier.get() >= FINAL_TIER => FINAL_SURVIVAL,
        Stage::Survival { .. } => BLUE,
    }
}

fn blink_on(elapsed: f32, rate: f32) -> bool {
    (elapsed.max(0.0) * rate) as u32 % 2 == 0
}

/// Turret fill; locked turrets take the beam color.
#[must_use]
pub const fn turret_color(locked: bool) -> Color {
    if locked {
        BEAM
    } else {
        TURRET_TRACKING
    }
}

/// Beam stroke and thickness for a stage, or `None` once spent.
#[must_use]
pub fn beam_style(stage: BeamStage, half_width: f32) -> Option<(Color, f32)> {
    match stage {
        BeamStage::Telegraph => Some((BEAM.with_alpha(0.3), 2.0)),
        BeamStage::Live => Some((BEAM, half_width * 2.0)),
        BeamStage::Spent => None,
    }
}

/// Translucent full-arena wash announcing a terminal outcome.
#[must_use]
pub const fn outcome_wash(outcome: EncounterOutcome) -> Option<Color> {
    match outcome {
        EncounterOutcome::Ongoing => None,
        EncounterOutcome::Defeat => Some(Color::from_rgba_u8(255, 0, 0, 100)),
        EncounterOutcome::Victory => Some(Color::from_rgba_u8(0, 255, 100, 100)),
    }
}

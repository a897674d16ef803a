//! Closed-form boss motion for each phase and the fixed staging points.

use sanctuary_core::{ArenaTuning, Phase, SurvivalTier, Vec2};

const RAIN_SWAY: f32 = 600.0;
const RAIN_BOB: f32 = 100.0;
const RAIN_HEIGHT: f32 = 200.0;
const GAPS_RADIUS: f32 = 400.0;
const GAPS_RATE: f32 = 1.25;
const CROSS_RADIUS: f32 = 200.0;
const CROSS_RATE: f32 = 3.0;
const CROSS_HOMING: f32 = 0.015;
const STREAM_RATE: f32 = -0.5;
const PERIMETER_INSET: f32 = 100.0;
const PERIMETER_SPEED: f32 = 320.0;
const SURVIVAL_KNIFE_HEIGHT: f32 = 150.0;

/// Exponential easing step: moves `gain` of the remaining distance.
pub(crate) fn ease(position: Vec2, target: Vec2, gain: f32) -> Vec2 {
    position + (target - position) * gain
}

/// Point the boss eases toward while `phase` is telegraphed.
pub(crate) fn staging_point(phase: Phase, arena: &ArenaTuning) -> Vec2 {
    let center = arena.center();
    match phase {
        Phase::Rain => Vec2::new(center.x, RAIN_HEIGHT),
        Phase::Gaps => Vec2::new(center.x + GAPS_RADIUS, center.y),
        Phase::Stream => Vec2::new(arena.width - PERIMETER_INSET, center.y),
        Phase::Sentinel => Vec2::splat(PERIMETER_INSET),
        Phase::Spiral | Phase::Cross | Phase::Shotgun => center,
    }
}

/// Point the boss eases toward during a survival interlude and its telegraph.
pub(crate) fn survival_point(tier: SurvivalTier, arena: &ArenaTuning) -> Vec2 {
    let center = arena.center();
    if tier == SurvivalTier::FIRST {
        Vec2::new(center.x, SURVIVAL_KNIFE_HEIGHT)
    } else {
        center
    }
}

/// Inputs of one active motion step.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MotionInput {
    pub(crate) phase: Phase,
    pub(crate) elapsed: f32,
    pub(crate) position: Vec2,
    pub(crate) player: Vec2,
    pub(crate) gain: f32,
}

/// Boss position for an active phase.
///
/// Only the cross phase keeps history: its homing centre drifts toward the player.
pub(crate) fn active_position(
    input: MotionInput,
    tracked_center: &mut Vec2,
    arena: &ArenaTuning,
) -> Vec2 {
    let center = arena.center();
    let t = input.elapsed;
    match input.phase {
        Phase::Spiral | Phase::Shotgun => ease(input.position, center, input.gain),
        Phase::Rain => Vec2::new(
            center.x + t.cos() * RAIN_SWAY,
            RAIN_HEIGHT + (t * 2.0).sin() * RAIN_BOB,
        ),
        Phase::Gaps => {
            let angle = t * GAPS_RATE;
            center + Vec2::new(angle.cos(), angle.sin()) * GAPS_RADIUS
        }
        Phase::Cross => {
            *tracked_center += (input.player - *tracked_center) * CROSS_HOMING;
            let angle = t * CROSS_RATE;
            *tracked_center + Vec2::new(angle.cos(), angle.sin()) * CROSS_RADIUS
        }
        Phase::Stream => {
            let angle = t * STREAM_RATE;
            let radii = center - Vec2::splat(PERIMETER_INSET);
            center + Vec2::new(angle.cos(), angle.sin()) * radii
        }
        Phase::Sentinel => perimeter_position(t, arena),
    }
}

/// Clockwise walk around the inset rectangle starting at its top-left corner.
fn perimeter_position(elapsed: f32, arena: &ArenaTuning) -> Vec2 {
    let left = PERIMETER_INSET;
    let top = PERIMETER_INSET;
    let right = (arena.width - PERIMETER_INSET).max(left);
    let bottom = (arena.height - PERIMETER_INSET).max(top);
    let width = right - left;
    let height = bottom - top;
    let perimeter = 2.0 * (width + height);
    if perimeter <= 0.0 {
        return Vec2::new(left, top);
    }

    let mut travelled = (elapsed * PERIMETER_SPEED).rem_euclid(perimeter);
    if travelled < width {
        return Vec2::new(left + travelled, top);
    }
    travelled -= width;
    if travelled < height {
        return Vec2::new(right, top + travelled);
    }
    travelled -= height;
    if travelled < width {
        return Vec2::new(right - travelled, bottom);
    }
    travelled -= width;
    Vec2::new(left, bottom - travelled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(phase: Phase, elapsed: f32) -> MotionInput {
        MotionInput {
            phase,
            elapsed,
            position: Vec2::new(960.0, 200.0),
            player: Vec2::new(960.0, 864.0),
            gain: 0.05,
        }
    }

    #[test]
    fn motion_is_pure_in_phase_time() {
        let arena = ArenaTuning::default();
        for phase in [Phase::Rain, Phase::Gaps, Phase::Stream, Phase::Sentinel] {
            let mut first = Vec2::ZERO;
            let mut second = Vec2::ONE;
            let a = active_position(input(phase, 3.7), &mut first, &arena);
            let b = active_position(input(phase, 3.7), &mut second, &arena);
            assert_eq!(a, b, "{phase:?} should not depend on history");
        }
    }

    #[test]
    fn rain_traces_a_figure_eight_near_the_top() {
        let arena = ArenaTuning::default();
        let mut tracked = Vec2::ZERO;
        let start = active_position(input(Phase::Rain, 0.0), &mut tracked, &arena);
        assert_eq!(start, Vec2::new(1560.0, 200.0));
    }

    #[test]
    fn stream_orbit_starts_at_the_right_edge() {
        let arena = ArenaTuning::default();
        let mut tracked = Vec2::ZERO;
        let start = active_position(input(Phase::Stream, 0.0), &mut tracked, &arena);
        assert_eq!(start, Vec2::new(1820.0, 540.0));
    }

    #[test]
    fn perimeter_walk_visits_corners_clockwise() {
        let arena = ArenaTuning::default();
        // Inset rectangle is 1720 x 880; 320 units per second.
        assert_eq!(perimeter_position(0.0, &arena), Vec2::new(100.0, 100.0));
        assert_eq!(perimeter_position(1720.0 / 320.0, &arena), Vec2::new(1820.0, 100.0));
        let third = (1720.0 + 880.0) / 320.0;
        assert!(perimeter_position(third, &arena).distance(Vec2::new(1820.0, 980.0)) < 1e-2);
        let back = (2.0 * (1720.0 + 880.0)) / 320.0;
        assert!(perimeter_position(back + 0.5, &arena).distance(Vec2::new(260.0, 100.0)) < 1e-2);
    }

    #[test]
    fn cross_centre_homes_toward_the_player() {
        let arena = ArenaTuning::default();
        let mut tracked = Vec2::new(960.0, 200.0);
        let _ = active_position(input(Phase::Cross, 0.0), &mut tracked, &arena);
        assert!((tracked.y - (200.0 + 664.0 * 0.015)).abs() < 1e-3);
    }

    #[test]
    fn staging_points_match_their_phase() {
        let arena = ArenaTuning::default();
        assert_eq!(staging_point(Phase::Rain, &arena), Vec2::new(960.0, 200.0));
        assert_eq!(staging_point(Phase::Gaps, &arena), Vec2::new(1360.0, 540.0));
        assert_eq!(staging_point(Phase::Stream, &arena), Vec2::new(1820.0, 540.0));
        assert_eq!(staging_point(Phase::Sentinel, &arena), Vec2::new(100.0, 100.0));
        assert_eq!(staging_point(Phase::Shotgun, &arena), arena.center());
        assert_eq!(
            survival_point(SurvivalTier::new(2), &arena),
            arena.center()
        );
    }
}

//! Damage gating and beam contact geometry.

use sanctuary_core::Vec2;

/// Rate-limits damage with a single last-hit timestamp shared by every hazard kind.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct CollisionResolver {
    last_hit: Option<f32>,
    rehit_interval: f32,
}

impl CollisionResolver {
    pub(crate) fn new(rehit_interval: f32) -> Self {
        Self {
            last_hit: None,
            rehit_interval,
        }
    }

    /// Records a hit at simulation time `now` when the re-hit window has passed.
    ///
    /// The first hit is always allowed; later hits need strictly more than the
    /// interval since the previous one.
    pub(crate) fn try_strike(&mut self, now: f32) -> bool {
        let allowed = self
            .last_hit
            .map_or(true, |last| now - last > self.rehit_interval);
        if allowed {
            self.last_hit = Some(now);
        }
        allowed
    }
}

/// Whether a disc touches the thick segment from `start` to `end`.
pub(crate) fn disc_touches_segment(
    start: Vec2,
    end: Vec2,
    half_width: f32,
    center: Vec2,
    radius: f32,
) -> bool {
    let segment = end - start;
    let length_squared = segment.length_squared();
    let closest = if length_squared <= f32::EPSILON {
        start
    } else {
        let t = ((center - start).dot(segment) / length_squared).clamp(0.0, 1.0);
        start + segment * t
    };
    let reach = half_width + radius;
    center.distance_squared(closest) <= reach * reach
}

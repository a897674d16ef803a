//! Turrets and beams: track, lock, telegraph, fire, expire.

use sanctuary_core::{
    bearing_degrees, heading, BeamId, BeamKind, BeamStage, Event, HazardTuning, TurretId, Vec2,
};

use crate::collision::disc_touches_segment;

/// A placed turret that tracks the player until it locks its bearing.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Turret {
    pub(crate) id: TurretId,
    pub(crate) position: Vec2,
    pub(crate) bearing_degrees: f32,
    pub(crate) tracked: f32,
    pub(crate) locked: bool,
}

/// A telegraphed beam with a fixed direction.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Beam {
    pub(crate) id: BeamId,
    pub(crate) kind: BeamKind,
    pub(crate) origin: Vec2,
    pub(crate) direction_degrees: f32,
    pub(crate) age: f32,
    telegraph: f32,
    live: f32,
}

impl Beam {
    pub(crate) fn stage(&self) -> BeamStage {
        if self.age < self.telegraph {
            BeamStage::Telegraph
        } else if self.age < self.telegraph + self.live {
            BeamStage::Live
        } else {
            BeamStage::Spent
        }
    }

    /// Far end of the beam for the provided length.
    pub(crate) fn end(&self, length: f32) -> Vec2 {
        self.origin + heading(self.direction_degrees) * length
    }
}

/// Every turret and beam in the arena plus identifier allocation.
#[derive(Clone, Debug, Default)]
pub(crate) struct HazardField {
    turrets: Vec<Turret>,
    beams: Vec<Beam>,
    next_turret: u32,
    next_beam: u32,
}

impl HazardField {
    pub(crate) fn turrets(&self) -> &[Turret] {
        &self.turrets
    }

    pub(crate) fn beams(&self) -> &[Beam] {
        &self.beams
    }

    pub(crate) fn place_turret(&mut self, position: Vec2, player: Vec2) -> TurretId {
        let id = TurretId::new(self.next_turret);
        self.next_turret = self.next_turret.wrapping_add(1);
        self.turrets.push(Turret {
            id,
            position,
            bearing_degrees: bearing_degrees(position, player),
            tracked: 0.0,
            locked: false,
        });
        id
    }

    pub(crate) fn fire_beam(
        &mut self,
        kind: BeamKind,
        origin: Vec2,
        direction_degrees: f32,
        telegraph: f32,
        live: f32,
    ) -> BeamId {
        let id = BeamId::new(self.next_beam);
        self.next_beam = self.next_beam.wrapping_add(1);
        self.beams.push(Beam {
            id,
            kind,
            origin,
            direction_degrees,
            age: 0.0,
            telegraph,
            live,
        });
        id
    }

    /// Removes every turret and beam, returning `(turrets, beams)` removed.
    pub(crate) fn clear(&mut self) -> (usize, usize) {
        let removed = (self.turrets.len(), self.beams.len());
        self.turrets.clear();
        self.beams.clear();
        removed
    }

    /// Ages beams, retires spent ones with their turrets, then advances tracking.
    ///
    /// Beams fired by turrets that lock during this call start aging next tick.
    pub(crate) fn advance(
        &mut self,
        dt: f32,
        player: Vec2,
        tuning: &HazardTuning,
        out_events: &mut Vec<Event>,
    ) {
        for beam in &mut self.beams {
            let before = beam.stage();
            beam.age += dt;
            if before == BeamStage::Telegraph && beam.stage() != BeamStage::Telegraph {
                out_events.push(Event::BeamLive { beam: beam.id });
            }
        }

        let mut retired = Vec::new();
        self.beams.retain(|beam| {
            let spent = beam.stage() == BeamStage::Spent;
            if spent {
                if let BeamKind::Turret(turret) = beam.kind {
                    retired.push(turret);
                }
            }
            !spent
        });
        self.turrets.retain(|turret| !retired.contains(&turret.id));

        let mut locked = Vec::new();
        for turret in self.turrets.iter_mut().filter(|turret| !turret.locked) {
            turret.bearing_degrees = bearing_degrees(turret.position, player);
            turret.tracked += dt;
            if turret.tracked >= tuning.turret_track {
                turret.locked = true;
                locked.push((turret.id, turret.position, turret.bearing_degrees));
            }
        }

        for (turret, position, bearing) in locked {
            out_events.push(Event::TurretLocked {
                turret,
                bearing_degrees: bearing,
            });
            let kind = BeamKind::Turret(turret);
            let beam = self.fire_beam(
                kind,
                position,
                bearing,
                tuning.laser_telegraph,
                tuning.laser_live,
            );
            out_events.push(Event::BeamTelegraphed { beam, kind });
        }
    }

    /// Whether any live beam of the provided length touches the player disc.
    pub(crate) fn beam_contact(
        &self,
        player: Vec2,
        player_radius: f32,
        length: f32,
        half_width: f32,
    ) -> bool {
        self.beams
            .iter()
            .filter(|beam| beam.stage() == BeamStage::Live)
            .any(|beam| {
                disc_touches_segment(beam.origin, beam.end(length), half_width, player, player_radius)
            })
    }
}

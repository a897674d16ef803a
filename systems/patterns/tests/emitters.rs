use std::time::Duration;

use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use sanctuary_core::{
    angular_distance, bearing_degrees, BossFrame, Command, EncounterConfig, Event, HazardTint,
    Phase, ProjectileShape, ProjectileSpec, RandomSource, Stage, SurvivalTier, Vec2,
};
use sanctuary_system_patterns::{tower_corners, PatternGenerator};
use sanctuary_world::{apply, query, World};

/// Returns a fixed value for every draw, clamped to the requested range.
struct Fixed(u32);

impl RandomSource for Fixed {
    fn next_below(&mut self, upper: u32) -> u32 {
        self.0.min(upper.saturating_sub(1))
    }

    fn next_unit(&mut self) -> f32 {
        0.25
    }
}

const BOSS: Vec2 = Vec2::new(960.0, 540.0);

fn frame(phase: Phase, stage: Stage) -> BossFrame {
    BossFrame {
        position: BOSS,
        phase,
        stage,
        phase_elapsed: 0.0,
        stage_elapsed: 0.0,
        entered: None,
    }
}

fn spawned(out: &[Command]) -> Vec<ProjectileSpec> {
    out.iter()
        .filter_map(|command| match command {
            Command::SpawnProjectiles { projectiles } => Some(projectiles.clone()),
            _ => None,
        })
        .flatten()
        .collect()
}

fn angle_of(spec: &ProjectileSpec) -> f32 {
    spec.velocity.y.atan2(spec.velocity.x).to_degrees()
}

/// Runs one tick long enough to pass the regular cadence.
fn fire_once<R: RandomSource>(phase: Phase, player: Vec2, rng: &mut R) -> Vec<ProjectileSpec> {
    let mut generator = PatternGenerator::new(&EncounterConfig::default());
    let mut out = Vec::new();
    generator.handle(&frame(phase, Stage::Active), 0.13, player, rng, &mut out);
    spawned(&out)
}

#[test]
fn gap_ring_never_emits_inside_the_gap() {
    let players = [
        Vec2::new(960.0, 900.0),
        Vec2::new(100.0, 100.0),
        Vec2::new(1800.0, 545.0),
        Vec2::new(400.0, 1000.0),
    ];
    for player in players {
        let volley = fire_once(Phase::Gaps, player, &mut Fixed(0));
        let bearing = bearing_degrees(BOSS, player);
        assert!(volley.len() >= 32 && volley.len() <= 34);
        for spec in &volley {
            assert!(angular_distance(angle_of(spec), bearing) > 15.0);
            assert_eq!(spec.tint, HazardTint::Verdant);
            assert_eq!(spec.behaviors.reach, Some(850.0));
        }
    }
}

#[test]
fn gap_ring_aligned_with_the_player_omits_three_bullets() {
    let volley = fire_once(Phase::Gaps, BOSS + Vec2::new(0.0, 300.0), &mut Fixed(0));
    assert_eq!(volley.len(), 33);
}

#[test]
fn rain_falls_from_above_with_banded_speed() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let volley = fire_once(Phase::Rain, Vec2::ZERO, &mut rng);
    assert_eq!(volley.len(), 12);
    for spec in volley {
        assert_eq!(spec.position.y, -20.0);
        assert!((0.0..1920.0).contains(&spec.position.x));
        assert!(spec.velocity.x.abs() < 1e-3);
        assert!((7.0 - 1e-3..=10.0 + 1e-3).contains(&spec.velocity.y));
    }
}

#[test]
fn shotgun_fan_is_centred_on_the_player_bearing() {
    let player = Vec2::new(1200.0, 900.0);
    let volley = fire_once(Phase::Shotgun, player, &mut Fixed(0));
    let bearing = bearing_degrees(BOSS, player);

    assert_eq!(volley.len(), 7);
    assert!(angular_distance(angle_of(&volley[3]), bearing) < 1e-3);
    assert!(angular_distance(angle_of(&volley[0]), bearing - 45.0) < 1e-3);
    assert!(volley
        .iter()
        .all(|spec| spec.shape == ProjectileShape::Circle { radius: 25.0 }));
}

#[test]
fn cross_fires_the_same_angles_at_two_speeds() {
    let volley = fire_once(Phase::Cross, Vec2::ZERO, &mut Fixed(0));
    assert_eq!(volley.len(), 12);
    let fast: Vec<f32> = volley[..6].iter().map(angle_of).collect();
    let slow: Vec<f32> = volley[6..].iter().map(angle_of).collect();
    for (a, b) in fast.iter().zip(&slow) {
        assert!(angular_distance(*a, *b) < 1e-3);
    }
    assert!((volley[0].velocity.length() - 13.0).abs() < 1e-3);
    assert!((volley[6].velocity.length() - 8.0).abs() < 1e-3);
    assert!(angular_distance(fast[0], 15.0) < 1e-3);
}

#[test]
fn spiral_rotation_advances_between_volleys_and_across_phases() {
    let mut generator = PatternGenerator::new(&EncounterConfig::default());
    let mut out = Vec::new();
    let spiral = frame(Phase::Spiral, Stage::Active);

    generator.handle(&spiral, 0.13, Vec2::ZERO, &mut Fixed(0), &mut out);
    let first = spawned(&out);
    out.clear();

    // Cadence resets to -0.28 after a spiral volley.
    generator.handle(&spiral, 0.39, Vec2::ZERO, &mut Fixed(0), &mut out);
    assert!(spawned(&out).is_empty());
    generator.handle(&spiral, 0.02, Vec2::ZERO, &mut Fixed(0), &mut out);
    let second = spawned(&out);
    out.clear();

    assert_eq!(first.len(), 12);
    assert_eq!(second.len(), 12);
    assert!(angular_distance(angle_of(&first[0]), 20.0) < 1e-3);
    assert!(angular_distance(angle_of(&second[0]), 40.0) < 1e-3);

    // A different phase in between does not reset the rotation.
    generator.handle(&frame(Phase::Rain, Stage::Active), 0.2, Vec2::ZERO, &mut Fixed(0), &mut out);
    out.clear();
    let entered = BossFrame {
        entered: Some(Stage::Active),
        ..spiral
    };
    generator.handle(&entered, 0.13, Vec2::ZERO, &mut Fixed(0), &mut out);
    let third = spawned(&out);
    assert!(angular_distance(angle_of(&third[0]), 60.0) < 1e-3);
}

#[test]
fn stream_fires_every_tick_past_the_cadence() {
    let mut generator = PatternGenerator::new(&EncounterConfig::default());
    let mut out = Vec::new();
    let stream = frame(Phase::Stream, Stage::Active);
    for _ in 0..4 {
        generator.handle(&stream, 0.13, Vec2::new(960.0, 900.0), &mut Fixed(0), &mut out);
    }
    assert_eq!(spawned(&out).len(), 12);
}

#[test]
fn knife_wall_leaves_a_two_lane_gap_inside_the_corridor() {
    let mut generator = PatternGenerator::new(&EncounterConfig::default());
    let mut out = Vec::new();
    let wall = frame(
        Phase::Spiral,
        Stage::Survival {
            tier: SurvivalTier::FIRST,
        },
    );

    generator.handle(&wall, 1.2, Vec2::ZERO, &mut Fixed(4), &mut out);
    let blades = spawned(&out);

    assert_eq!(blades.len(), 10);
    let lanes: Vec<u32> = blades
        .iter()
        .map(|spec| ((spec.position.x - 630.0) / 55.0).round() as u32)
        .collect();
    assert_eq!(lanes, vec![0, 1, 2, 3, 6, 7, 8, 9, 10, 11]);
    for spec in &blades {
        assert_eq!(spec.position.y, BOSS.y);
        assert_eq!(
            spec.shape,
            ProjectileShape::Blade {
                half_extents: Vec2::new(9.0, 27.0)
            }
        );
    }
}

#[test]
fn dense_cross_emits_flashes_and_side_streams() {
    let mut generator = PatternGenerator::new(&EncounterConfig::default());
    let mut out = Vec::new();
    let cross = frame(
        Phase::Spiral,
        Stage::Survival {
            tier: SurvivalTier::new(2),
        },
    );

    generator.handle(&cross, 0.09, Vec2::ZERO, &mut Fixed(7), &mut out);
    let volley = spawned(&out);

    let flashes: Vec<&ProjectileSpec> = volley
        .iter()
        .filter(|spec| spec.behaviors.time_to_live.is_some())
        .collect();
    assert_eq!(flashes.len(), 4 * 33);
    assert!(flashes
        .iter()
        .all(|spec| spec.velocity == Vec2::ZERO && spec.behaviors.time_to_live == Some(0.12)));
    let streams: Vec<&ProjectileSpec> = volley
        .iter()
        .filter(|spec| spec.tint == HazardTint::Mint)
        .collect();
    assert_eq!(streams.len(), 4);
    assert_eq!(streams[0].position, Vec2::new(0.0, 7.0));
    assert_eq!(streams[3].position, Vec2::new(7.0, 1080.0));
}

#[test]
fn miasma_adds_poprocks_and_tower_bursts_on_their_own_cadence() {
    let mut generator = PatternGenerator::new(&EncounterConfig::default());
    let mut out = Vec::new();
    let miasma = frame(
        Phase::Spiral,
        Stage::Survival {
            tier: SurvivalTier::new(3),
        },
    );

    let mut poprocks = 0;
    let mut towers = 0;
    let mut arms = 0;
    for _ in 0..10 {
        out.clear();
        generator.handle(&miasma, 0.06, Vec2::ZERO, &mut Fixed(0), &mut out);
        for spec in spawned(&out) {
            match spec.tint {
                HazardTint::Gold => poprocks += 1,
                HazardTint::Orchid => towers += 1,
                HazardTint::Amber => arms += 1,
                _ => {}
            }
        }
    }

    assert_eq!(arms, 40);
    assert_eq!(towers, 0);
    assert_eq!(poprocks, 0);

    for _ in 0..2 {
        out.clear();
        generator.handle(&miasma, 0.06, Vec2::ZERO, &mut Fixed(0), &mut out);
        for spec in spawned(&out) {
            match spec.tint {
                HazardTint::Gold => poprocks += 1,
                HazardTint::Orchid => towers += 1,
                _ => {}
            }
        }
    }
    assert_eq!(towers, 24);
    assert_eq!(poprocks, 1);
}

#[test]
fn sentinel_places_turrets_and_border_lasers() {
    let config = EncounterConfig::default();
    let mut generator = PatternGenerator::new(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut out = Vec::new();
    let sentinel = frame(Phase::Sentinel, Stage::Active);

    for _ in 0..(60 * 5) {
        generator.handle(&sentinel, 1.0 / 60.0, Vec2::ZERO, &mut rng, &mut out);
    }

    let turrets: Vec<Vec2> = out
        .iter()
        .filter_map(|command| match command {
            Command::SpawnTurret { position } => Some(*position),
            _ => None,
        })
        .collect();
    assert_eq!(turrets.len(), 3);
    for position in turrets {
        assert!((150.0..=1770.0).contains(&position.x));
        assert!((150.0..=930.0).contains(&position.y));
    }

    let lasers = out
        .iter()
        .filter_map(|command| match command {
            Command::SpawnBorderLaser {
                origin,
                direction_degrees,
            } => Some((*origin, *direction_degrees)),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(lasers.len(), 2);
    for (origin, direction) in lasers {
        let inward = origin + sanctuary_core::heading(direction) * 10.0;
        assert!((0.0..=1920.0).contains(&inward.x));
        assert!((0.0..=1080.0).contains(&inward.y));
    }
    assert!(spawned(&out).is_empty());
}

#[test]
fn poprocks_burst_into_shards_inside_the_world() {
    let mut world = World::default();
    let mut events = Vec::new();
    let poprock = tower_corners(&query::config(&world).arena)[0];
    apply(
        &mut world,
        Command::SpawnProjectiles {
            projectiles: vec![ProjectileSpec::launched(poprock, 45.0, 4.0, 15.0)
                .tinted(HazardTint::Gold)
                .splitting_beyond(
                    400.0,
                    sanctuary_core::ShardBurst {
                        count: 12,
                        speed: 5.0,
                        radius: 6.0,
                    },
                )],
        },
        &mut events,
    );

    for _ in 0..110 {
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs_f32(1.0 / 60.0),
            },
            &mut events,
        );
    }

    assert_eq!(query::projectile_count(&world), 12);
    assert!(query::projectiles(&world).all(|shard| shard.tint == HazardTint::Gold));
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::ShardBurst { shards: 12, .. }))
            .count(),
        1
    );
}

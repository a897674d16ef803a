use std::time::Duration;

use sanctuary_core::{Command, EncounterConfig, Event, ProjectileSpec, Vec2};
use sanctuary_world::{apply, query, World};

fn world_with_health(health: f32) -> World {
    let mut config = EncounterConfig::default();
    config.player.max_health = health;
    World::new(config)
}

fn spawn_at_player(world: &mut World, count: usize, events: &mut Vec<Event>) {
    let player = query::player(world).position;
    apply(
        world,
        Command::SpawnProjectiles {
            projectiles: vec![ProjectileSpec::launched(player, 0.0, 0.0, 7.0); count],
        },
        events,
    );
}

fn tick(world: &mut World, dt: Duration, events: &mut Vec<Event>) {
    apply(world, Command::Tick { dt }, events);
}

#[test]
fn overlapping_projectiles_cost_a_single_hit() {
    let mut world = world_with_health(100.0);
    let mut events = Vec::new();

    spawn_at_player(&mut world, 3, &mut events);
    tick(&mut world, Duration::from_millis(16), &mut events);

    assert_eq!(query::player(&world).health, 90.0);
    assert_eq!(query::projectile_count(&world), 0);
    let hits = events
        .iter()
        .filter(|event| matches!(event, Event::PlayerDamaged { .. }))
        .count();
    assert_eq!(hits, 1);
}

#[test]
fn contact_inside_the_rehit_window_is_free() {
    let mut world = world_with_health(100.0);
    let mut events = Vec::new();

    spawn_at_player(&mut world, 1, &mut events);
    tick(&mut world, Duration::from_millis(50), &mut events);
    assert_eq!(query::player(&world).health, 90.0);

    spawn_at_player(&mut world, 1, &mut events);
    tick(&mut world, Duration::from_millis(50), &mut events);
    assert_eq!(query::player(&world).health, 90.0);
    assert_eq!(query::projectile_count(&world), 0);

    tick(&mut world, Duration::from_millis(100), &mut events);
    spawn_at_player(&mut world, 1, &mut events);
    tick(&mut world, Duration::from_millis(50), &mut events);
    assert_eq!(query::player(&world).health, 80.0);
}

#[test]
fn flash_lifetime_is_exact_in_simulated_time() {
    let mut world = World::default();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::SpawnProjectiles {
            projectiles: vec![
                ProjectileSpec::launched(Vec2::new(200.0, 200.0), 0.0, 0.0, 11.0)
                    .with_time_to_live(0.25),
            ],
        },
        &mut events,
    );

    let step = Duration::from_micros(62_500);
    for _ in 0..3 {
        tick(&mut world, step, &mut events);
        assert_eq!(query::projectile_count(&world), 1);
    }
    tick(&mut world, step, &mut events);
    assert_eq!(query::projectile_count(&world), 0);
}

#[test]
fn border_beam_hurts_only_while_live() {
    let mut world = world_with_health(100.0);
    let mut events = Vec::new();
    let player = query::player(&world).position;
    apply(
        &mut world,
        Command::SpawnBorderLaser {
            origin: Vec2::new(0.0, player.y),
            direction_degrees: 0.0,
        },
        &mut events,
    );

    // Border telegraph lasts 0.9 s.
    for _ in 0..8 {
        tick(&mut world, Duration::from_millis(100), &mut events);
    }
    assert_eq!(query::player(&world).health, 100.0);

    for _ in 0..3 {
        tick(&mut world, Duration::from_millis(100), &mut events);
    }
    assert!(query::player(&world).health < 100.0);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::BeamLive { .. })));
}

#[test]
fn reset_restores_every_component() {
    let mut world = world_with_health(100.0);
    let mut events = Vec::new();
    spawn_at_player(&mut world, 2, &mut events);
    apply(
        &mut world,
        Command::SpawnTurret {
            position: Vec2::new(300.0, 300.0),
        },
        &mut events,
    );
    tick(&mut world, Duration::from_millis(16), &mut events);
    spawn_at_player(&mut world, 5, &mut events);

    apply(&mut world, Command::Reset, &mut events);

    let fresh = world_with_health(100.0);
    assert_eq!(query::player(&world), query::player(&fresh));
    assert_eq!(query::boss(&world), query::boss(&fresh));
    assert_eq!(query::projectile_count(&world), 0);
    assert_eq!(query::turrets(&world).count(), 0);
    assert_eq!(query::elapsed(&world), 0.0);
}

//! Builds rendering scenes from world queries.

use anyhow::{Context, Result};
use glam::Vec2;
use sanctuary_core::{EncounterOutcome, Stage};
use sanctuary_rendering::{
    visuals, ArenaPresentation, BeamPresentation, BossPresentation, BulletPresentation,
    HealthBar, PlayerPresentation, ProjectilePresentation, Scene, TowerPresentation,
    TurretPresentation, VoidPresentation,
};
use sanctuary_system_patterns::tower_corners;
use sanctuary_world::{query, World};

const BOSS_BAR_SIZE: Vec2 = Vec2::new(800.0, 20.0);
const BOSS_BAR_TOP: f32 = 30.0;
const PLAYER_BAR_SIZE: Vec2 = Vec2::new(40.0, 5.0);
const PLAYER_BAR_DROP: f32 = 25.0;
const TOWER_HALF_EXTENT: f32 = 20.0;
const TOWER_TIER: u8 = 3;

/// Creates a scene sized to the world's arena and fills it.
pub(crate) fn initial_scene(world: &World) -> Result<Scene> {
    let arena = query::config(world).arena;
    let arena = ArenaPresentation::new(arena.width, arena.height, visuals::BACKGROUND)
        .context("arena cannot be presented")?;
    let mut scene = Scene::new(arena, player_presentation(world));
    populate_scene(world, &mut scene);
    Ok(scene)
}

/// Rewrites every entity of `scene` from the current world state.
pub(crate) fn populate_scene(world: &World, scene: &mut Scene) {
    let config = query::config(world);
    let boss = query::boss(world);
    let outcome = query::outcome(world);

    scene.clear_entities();
    scene.player = player_presentation(world);

    if let Some(corridor) = query::corridor(world) {
        scene.voids.extend(VoidPresentation::around(
            corridor,
            scene.arena.width,
            visuals::VOID,
        ));
    }

    if matches!(boss.stage, Stage::Survival { tier } if tier.get() >= TOWER_TIER) {
        scene
            .towers
            .extend(tower_corners(&config.arena).map(|position| TowerPresentation {
                position,
                half_extent: TOWER_HALF_EXTENT,
                color: visuals::TOWER,
            }));
    }

    if outcome != EncounterOutcome::Victory {
        scene.boss = Some(BossPresentation {
            position: boss.position,
            half_extent: boss.half_extent,
            color: visuals::boss_color(boss.phase, boss.stage, boss.stage_elapsed),
        });
    }

    scene.beams.extend(query::beams(world).filter_map(|beam| {
        visuals::beam_style(beam.stage, beam.half_width).map(|(color, thickness)| {
            BeamPresentation {
                origin: beam.origin,
                end: beam.end,
                thickness,
                color,
            }
        })
    }));

    scene
        .projectiles
        .extend(query::projectiles(world).map(|projectile| ProjectilePresentation {
            position: projectile.position,
            shape: projectile.shape,
            color: visuals::tint_color(projectile.tint),
        }));

    scene
        .bullets
        .extend(query::player_bullets(world).map(|bullet| BulletPresentation {
            position: bullet.position,
            radius: bullet.radius,
            color: visuals::PLAYER_BULLET,
        }));

    scene
        .turrets
        .extend(query::turrets(world).map(|turret| TurretPresentation {
            position: turret.position,
            bearing_degrees: turret.bearing_degrees,
            color: visuals::turret_color(turret.locked),
        }));

    if config.variant.boss_vulnerable() {
        scene.boss_health = Some(HealthBar::centered(
            Vec2::new(scene.arena.width * 0.5, BOSS_BAR_TOP),
            BOSS_BAR_SIZE,
            query::boss_health_ratio(world),
            visuals::BOSS_BAR_BACK,
            visuals::BOSS_BAR_FILL,
        ));
    }

    scene.wash = visuals::outcome_wash(outcome);
}

fn player_presentation(world: &World) -> PlayerPresentation {
    let player = query::player(world);
    let fraction = if player.max_health > 0.0 {
        player.health / player.max_health
    } else {
        0.0
    };
    PlayerPresentation {
        position: player.position,
        radius: player.radius,
        color: visuals::PLAYER,
        health: HealthBar::centered(
            player.position + Vec2::new(0.0, PLAYER_BAR_DROP),
            PLAYER_BAR_SIZE,
            fraction,
            visuals::PLAYER_BAR_BACK,
            visuals::PLAYER_BAR_FILL,
        ),
    }
}

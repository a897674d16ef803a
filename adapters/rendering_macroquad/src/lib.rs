#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Sanctuary.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment, so
//! the dependency is declared without its default `audio` feature.
//!
//! Controls: `WASD` or the arrow keys move, the left mouse button fires at the
//! cursor, the right mouse button fires a ring, `R` resets and `Escape` quits.

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{
    is_key_down, is_key_pressed, is_mouse_button_down, mouse_position, KeyCode, MouseButton,
};
use macroquad::shapes::{draw_circle, draw_line, draw_rectangle};
use sanctuary_core::{heading, MoveIntent, ProjectileShape};
use sanctuary_rendering::{
    ArenaPresentation, FrameInput, FrameSimulationBreakdown, HealthBar, Presentation,
    RenderingBackend, Scene,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

const TURRET_RADIUS: f32 = 18.0;
const BARREL_LENGTH: f32 = 30.0;

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    window_width: i32,
    window_height: i32,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            window_width: 1280,
            window_height: 720,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures the initial window size in pixels.
    #[must_use]
    pub fn with_window_size(mut self, width: i32, height: i32) -> Self {
        self.window_width = width.max(1);
        self.window_height = height.max(1);
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` quits the game loop.
    quit_requested: bool,
    /// `R` restarts the encounter.
    reset_requested: bool,
    movement: MoveIntent,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let held = |keys: [KeyCode; 2]| keys.into_iter().any(is_key_down);
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            reset_requested: is_key_pressed(KeyCode::R),
            movement: MoveIntent {
                up: held([KeyCode::W, KeyCode::Up]),
                down: held([KeyCode::S, KeyCode::Down]),
                left: held([KeyCode::A, KeyCode::Left]),
                right: held([KeyCode::D, KeyCode::Right]),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    scene_population: Duration,
    render: Duration,
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    scene_population_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_scene_population: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);

        self.simulation_accum += breakdown.simulation;
        self.scene_population_accum += breakdown.scene_population;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames.max(1);
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_simulation: self.simulation_accum / frames,
            avg_scene_population: self.scene_population_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.scene_population_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameSimulationBreakdown + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            window_width,
            window_height,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width,
            window_height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let letterbox = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(letterbox);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let metrics = SceneMetrics::from_arena(&scene.arena, screen_width, screen_height);
                let (cursor_x, cursor_y) = mouse_position();
                let frame_input = gather_frame_input_from_observations(
                    &scene.arena,
                    &metrics,
                    Vec2::new(cursor_x, cursor_y),
                    keyboard,
                    is_mouse_button_down(MouseButton::Left),
                    is_mouse_button_down(MouseButton::Right),
                );

                let simulation_breakdown = update_scene(frame_dt, frame_input, &mut scene);

                let metrics = SceneMetrics::from_arena(&scene.arena, screen_width, screen_height);
                let render_start = Instant::now();
                draw_scene(&scene, &metrics);
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation: simulation_breakdown.simulation,
                    scene_population: simulation_breakdown.scene_population,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_simulation,
                        avg_scene_population,
                        avg_render,
                    }) = fps_metrics
                    {
                        println!(
                            "FPS: {:.2} (10s avg: {:.2}) | sim: {:>6.2}ms scene: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_simulation.as_secs_f64() * 1_000.0,
                            avg_scene_population.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Uniform scale and offsets that letterbox the arena into the window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl SceneMetrics {
    fn from_arena(arena: &ArenaPresentation, screen_width: f32, screen_height: f32) -> Self {
        let scale = if arena.width <= f32::EPSILON || arena.height <= f32::EPSILON {
            1.0
        } else {
            (screen_width / arena.width).min(screen_height / arena.height)
        };
        let offset_x = ((screen_width - arena.width * scale) * 0.5).max(0.0);
        let offset_y = ((screen_height - arena.height * scale) * 0.5).max(0.0);
        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + position.x * self.scale,
            self.offset_y + position.y * self.scale,
        )
    }

    fn to_world(&self, screen: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        Some(Vec2::new(
            (screen.x - self.offset_x) / self.scale,
            (screen.y - self.offset_y) / self.scale,
        ))
    }

    fn length(&self, world_length: f32) -> f32 {
        world_length * self.scale
    }
}

fn gather_frame_input_from_observations(
    arena: &ArenaPresentation,
    metrics: &SceneMetrics,
    cursor_position: Vec2,
    keyboard: KeyboardShortcuts,
    primary_fire: bool,
    secondary_fire: bool,
) -> FrameInput {
    FrameInput {
        movement: keyboard.movement,
        cursor_world_space: metrics
            .to_world(cursor_position)
            .map(|world| arena.clamp_world_position(world)),
        primary_fire,
        secondary_fire,
        reset: keyboard.reset_requested,
    }
}

fn draw_scene(scene: &Scene, metrics: &SceneMetrics) {
    let arena = scene.arena;
    fill_rect(Vec2::ZERO, Vec2::new(arena.width, arena.height), arena.background, metrics);

    for void in &scene.voids {
        fill_rect(
            Vec2::new(void.left, 0.0),
            Vec2::new(void.width(), arena.height),
            void.color,
            metrics,
        );
    }
    for tower in &scene.towers {
        fill_centered_rect(tower.position, Vec2::splat(tower.half_extent), tower.color, metrics);
    }
    if let Some(boss) = scene.boss {
        fill_centered_rect(boss.position, Vec2::splat(boss.half_extent), boss.color, metrics);
    }
    for beam in &scene.beams {
        let from = metrics.to_screen(beam.origin);
        let to = metrics.to_screen(beam.end);
        draw_line(
            from.x,
            from.y,
            to.x,
            to.y,
            metrics.length(beam.thickness).max(1.0),
            to_macroquad_color(beam.color),
        );
    }
    for projectile in &scene.projectiles {
        match projectile.shape {
            ProjectileShape::Circle { radius } => {
                fill_circle(projectile.position, radius, projectile.color, metrics);
            }
            ProjectileShape::Blade { half_extents } => {
                fill_centered_rect(projectile.position, half_extents, projectile.color, metrics);
            }
        }
    }
    for bullet in &scene.bullets {
        fill_circle(bullet.position, bullet.radius, bullet.color, metrics);
    }
    for turret in &scene.turrets {
        fill_circle(turret.position, TURRET_RADIUS, turret.color, metrics);
        let from = metrics.to_screen(turret.position);
        let to = metrics.to_screen(turret.position + heading(turret.bearing_degrees) * BARREL_LENGTH);
        draw_line(
            from.x,
            from.y,
            to.x,
            to.y,
            metrics.length(6.0).max(1.0),
            to_macroquad_color(turret.color),
        );
    }

    let player = scene.player;
    fill_circle(player.position, player.radius, player.color, metrics);
    draw_health_bar(player.health, metrics);
    if let Some(bar) = scene.boss_health {
        draw_health_bar(bar, metrics);
    }

    if let Some(wash) = scene.wash {
        fill_rect(Vec2::ZERO, Vec2::new(arena.width, arena.height), wash, metrics);
    }
}

fn draw_health_bar(bar: HealthBar, metrics: &SceneMetrics) {
    fill_rect(bar.top_left, bar.size, bar.back, metrics);
    fill_rect(
        bar.top_left,
        Vec2::new(bar.filled_width(), bar.size.y),
        bar.fill,
        metrics,
    );
}

fn fill_rect(
    top_left: Vec2,
    size: Vec2,
    color: sanctuary_rendering::Color,
    metrics: &SceneMetrics,
) {
    let corner = metrics.to_screen(top_left);
    draw_rectangle(
        corner.x,
        corner.y,
        metrics.length(size.x),
        metrics.length(size.y),
        to_macroquad_color(color),
    );
}

fn fill_centered_rect(
    center: Vec2,
    half_extents: Vec2,
    color: sanctuary_rendering::Color,
    metrics: &SceneMetrics,
) {
    fill_rect(center - half_extents, half_extents * 2.0, color, metrics);
}

fn fill_circle(center: Vec2, radius: f32, color: sanctuary_rendering::Color, metrics: &SceneMetrics) {
    let screen = metrics.to_screen(center);
    draw_circle(
        screen.x,
        screen.y,
        metrics.length(radius).max(1.0),
        to_macroquad_color(color),
    );
}

fn to_macroquad_color(color: sanctuary_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

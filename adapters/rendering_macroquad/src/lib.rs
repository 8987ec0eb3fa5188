#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Alien Invasion.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! Every body is drawn from primitive shapes. Text drawing is confined to the
//! local `hud` module.

mod hud;

use self::hud::{draw_hud, HudFrame};
use alien_invasion_rendering::{
    BodyPresentation, ButtonEdge, Color, FrameInput, FrameSimulationBreakdown, Presentation,
    RenderingBackend, Scene,
};
use anyhow::{ensure, Context, Result};
use glam::Vec2;
use macroquad::input::{is_key_pressed, is_key_released, KeyCode};
use macroquad::math::Vec2 as MacroquadVec2;
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

const DEFAULT_WINDOW_WIDTH: u32 = 1200;
const DEFAULT_WINDOW_HEIGHT: u32 = 800;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);

        Self { quit_requested }
    }
}

/// Raw key observations for the gameplay keys of one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct KeyObservations {
    left_pressed: bool,
    left_released: bool,
    right_pressed: bool,
    right_released: bool,
    fire_pressed: bool,
    restart_pressed: bool,
}

impl KeyObservations {
    fn poll() -> Self {
        Self {
            left_pressed: is_key_pressed(KeyCode::Left),
            left_released: is_key_released(KeyCode::Left),
            right_pressed: is_key_pressed(KeyCode::Right),
            right_released: is_key_released(KeyCode::Right),
            fire_pressed: is_key_pressed(KeyCode::Space),
            restart_pressed: is_key_pressed(KeyCode::P),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    window_width: u32,
    window_height: u32,
    fullscreen: bool,
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            fullscreen: false,
            swap_interval: None,
            show_fps: false,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that opens a 1200x800 window with the platform's
    /// default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the size of the created window in pixels.
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Configures whether the window covers the whole display.
    #[must_use]
    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
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

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    steps: u32,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    steps_accum: u64,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_steps: f32,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);

        self.simulation_accum += breakdown.simulation;
        self.steps_accum = self.steps_accum.saturating_add(u64::from(breakdown.steps));
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
        let frames = self.frames;
        let metrics = if seconds <= f32::EPSILON || frames == 0 {
            None
        } else {
            let per_second = frames as f32 / seconds;
            let window_seconds = self.window_duration.as_secs_f32();
            let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
                per_second
            } else {
                self.frame_times.len() as f32 / window_seconds
            };

            Some(FpsMetrics {
                per_second,
                trailing_ten_seconds,
                avg_simulation: self.simulation_accum / frames,
                avg_steps: self.steps_accum as f32 / frames as f32,
                avg_render: self.render_accum / frames,
            })
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.steps_accum = 0;
        self.render_accum = Duration::ZERO;
        metrics
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameSimulationBreakdown + 'static,
    {
        let Self {
            window_width,
            window_height,
            fullscreen,
            swap_interval,
            show_fps,
        } = self;

        ensure!(
            window_width > 0 && window_height > 0,
            "window dimensions must be positive (received {window_width}x{window_height})"
        );

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(window_width)
                .context("window width exceeds the platform limit")?,
            window_height: i32::try_from(window_height)
                .context("window height exceeds the platform limit")?,
            fullscreen,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        log::info!(
            "opening {}x{} window{}",
            window_width,
            window_height,
            if fullscreen { " (fullscreen)" } else { "" }
        );

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let letterbox = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    log::info!("quit requested");
                    break;
                }

                macroquad::window::clear_background(letterbox);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt =
                    Duration::try_from_secs_f32(dt_seconds.max(0.0)).unwrap_or(Duration::ZERO);
                let frame_input = frame_input_from_observations(KeyObservations::poll());

                let simulation_breakdown = update_scene(frame_dt, frame_input, &mut scene);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);

                let render_start = Instant::now();
                draw_arena(&scene, &metrics);
                draw_bullets(&scene.bullets, &metrics);
                draw_aliens(&scene.aliens, &metrics);
                draw_ship(&scene.ship, &metrics);
                draw_hud(
                    scene.hud,
                    HudFrame {
                        left: metrics.offset_x,
                        top: metrics.offset_y,
                        width: metrics.arena_width_scaled,
                        height: metrics.arena_height_scaled,
                        text_color: to_macroquad_color(hud_text_color(scene.background)),
                    },
                );
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation: simulation_breakdown.simulation,
                    steps: simulation_breakdown.steps,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_simulation,
                        avg_steps,
                        avg_render,
                    }) = fps_metrics
                    {
                        log::info!(
                            "FPS: {:.2} (10s avg: {:.2}) | sim: {:>6.2}ms ({:.2} steps) render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_simulation.as_secs_f64() * 1_000.0,
                            avg_steps,
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

fn frame_input_from_observations(observations: KeyObservations) -> FrameInput {
    FrameInput {
        move_left: ButtonEdge::from_observations(
            observations.left_pressed,
            observations.left_released,
        ),
        move_right: ButtonEdge::from_observations(
            observations.right_pressed,
            observations.right_released,
        ),
        fire: observations.fire_pressed,
        restart: observations.restart_pressed,
    }
}

/// Maps arena coordinates onto the window, preserving the aspect ratio.
#[derive(Clone, Copy, Debug)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    arena_width_scaled: f32,
    arena_height_scaled: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let world_width = scene.arena.width;
        let world_height = scene.arena.height;
        let scale = if world_width <= f32::EPSILON || world_height <= f32::EPSILON {
            1.0
        } else {
            (screen_width / world_width)
                .min(screen_height / world_height)
                .max(0.0)
        };

        let arena_width_scaled = world_width * scale;
        let arena_height_scaled = world_height * scale;
        let offset_x = ((screen_width - arena_width_scaled) * 0.5).max(0.0);
        let offset_y = ((screen_height - arena_height_scaled) * 0.5).max(0.0);

        Self {
            scale,
            offset_x,
            offset_y,
            arena_width_scaled,
            arena_height_scaled,
        }
    }

    fn to_screen(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + point.x * self.scale,
            self.offset_y + point.y * self.scale,
        )
    }

    /// Screen rectangle covered by the body as `(x, y, width, height)`.
    fn body_rect(&self, body: &BodyPresentation) -> (f32, f32, f32, f32) {
        let origin = self.to_screen(body.origin);
        let size = body.size * self.scale;
        (origin.x, origin.y, size.x, size.y)
    }
}

fn draw_arena(scene: &Scene, metrics: &SceneMetrics) {
    macroquad::shapes::draw_rectangle(
        metrics.offset_x,
        metrics.offset_y,
        metrics.arena_width_scaled,
        metrics.arena_height_scaled,
        to_macroquad_color(scene.background),
    );
}

fn draw_bullets(bullets: &[BodyPresentation], metrics: &SceneMetrics) {
    for bullet in bullets {
        let (x, y, width, height) = metrics.body_rect(bullet);
        // Keep hairline bullets visible on small windows.
        macroquad::shapes::draw_rectangle(
            x,
            y,
            width.max(1.0),
            height.max(1.0),
            to_macroquad_color(bullet.color),
        );
    }
}

fn draw_aliens(aliens: &[BodyPresentation], metrics: &SceneMetrics) {
    for alien in aliens {
        let (x, y, width, height) = metrics.body_rect(alien);
        if width <= f32::EPSILON || height <= f32::EPSILON {
            continue;
        }

        macroquad::shapes::draw_rectangle(x, y, width, height, to_macroquad_color(alien.color));

        let eye_color = to_macroquad_color(alien.color.darken(0.7));
        let eye_radius = width.min(height) * 0.1;
        for eye in alien_eye_centers(x, y, width, height) {
            macroquad::shapes::draw_circle(eye.x, eye.y, eye_radius, eye_color);
        }
    }
}

fn alien_eye_centers(x: f32, y: f32, width: f32, height: f32) -> [Vec2; 2] {
    let eye_y = y + height * 0.35;
    [
        Vec2::new(x + width * 0.3, eye_y),
        Vec2::new(x + width * 0.7, eye_y),
    ]
}

fn draw_ship(ship: &BodyPresentation, metrics: &SceneMetrics) {
    let (x, y, width, height) = metrics.body_rect(ship);
    if width <= f32::EPSILON || height <= f32::EPSILON {
        return;
    }

    let [nose, left, right] = ship_hull_points(x, y, width, height);
    macroquad::shapes::draw_triangle(
        MacroquadVec2::new(nose.x, nose.y),
        MacroquadVec2::new(left.x, left.y),
        MacroquadVec2::new(right.x, right.y),
        to_macroquad_color(ship.color),
    );

    let base_height = height * 0.25;
    macroquad::shapes::draw_rectangle(
        x,
        y + height - base_height,
        width,
        base_height,
        to_macroquad_color(ship.color.lighten(0.25)),
    );
}

/// Nose, bottom-left and bottom-right corners of the ship's hull.
fn ship_hull_points(x: f32, y: f32, width: f32, height: f32) -> [Vec2; 3] {
    [
        Vec2::new(x + width * 0.5, y),
        Vec2::new(x, y + height),
        Vec2::new(x + width, y + height),
    ]
}

fn hud_text_color(background: Color) -> Color {
    let luminance = 0.299 * background.red + 0.587 * background.green + 0.114 * background.blue;
    if luminance > 0.5 {
        Color::new(0.1, 0.1, 0.1, 1.0)
    } else {
        Color::new(0.95, 0.95, 0.95, 1.0)
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

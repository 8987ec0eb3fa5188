#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Alien Invasion adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
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
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
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

    /// Returns a new color darkened towards black by the provided amount.
    #[must_use]
    pub fn darken(self, amount: f32) -> Self {
        let keep = 1.0 - amount.clamp(0.0, 1.0);

        Self {
            red: self.red * keep,
            green: self.green * keep,
            blue: self.blue * keep,
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Edge observed for a held button during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ButtonEdge {
    /// The button kept its previous state.
    #[default]
    Unchanged,
    /// The button went down this frame.
    Pressed,
    /// The button came up this frame.
    Released,
}

impl ButtonEdge {
    /// Resolves the edge from the raw pressed/released observations of a frame.
    ///
    /// A button that went down and came back up within one frame reports the
    /// release, leaving the ship at rest.
    #[must_use]
    pub const fn from_observations(pressed: bool, released: bool) -> Self {
        if released {
            Self::Released
        } else if pressed {
            Self::Pressed
        } else {
            Self::Unchanged
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Edge observed for the steer-left button.
    pub move_left: ButtonEdge,
    /// Edge observed for the steer-right button.
    pub move_right: ButtonEdge,
    /// Whether the fire button went down on this frame.
    pub fire: bool,
    /// Whether the restart button went down on this frame.
    pub restart: bool,
}

/// Timing details reported by the simulation for a single rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSimulationBreakdown {
    /// Wall-clock time spent advancing the simulation.
    pub simulation: Duration,
    /// Number of fixed simulation steps executed.
    pub steps: u32,
}

/// Dimensions of the playable arena expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArenaPresentation {
    /// Width of the arena.
    pub width: f32,
    /// Height of the arena.
    pub height: f32,
}

impl ArenaPresentation {
    /// Creates a new arena descriptor.
    ///
    /// Returns an error when either dimension is not a positive finite number.
    pub fn new(width: f32, height: f32) -> std::result::Result<Self, RenderingError> {
        let valid = |value: f32| value.is_finite() && value > 0.0;
        if !valid(width) || !valid(height) {
            return Err(RenderingError::InvalidArena { width, height });
        }

        Ok(Self { width, height })
    }
}

/// Axis-aligned body drawn in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyPresentation {
    /// Top-left corner of the body.
    pub origin: Vec2,
    /// Width and height of the body.
    pub size: Vec2,
    /// Fill color of the body.
    pub color: Color,
}

impl BodyPresentation {
    /// Creates a new body descriptor.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2, color: Color) -> Self {
        Self {
            origin,
            size,
            color,
        }
    }
}

/// Overall game status shown by the heads-up display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HudStatus {
    /// The fleet is advancing.
    #[default]
    Playing,
    /// The player lost a ship and the next round is about to start.
    Recovering,
    /// No ships remain.
    GameOver,
}

/// Heads-up display drawn over the arena.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HudPresentation {
    /// Ships left to the player.
    pub lives: u32,
    /// Overall game status.
    pub status: HudStatus,
}

/// Scene description combining the arena and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Bounds of the playable arena.
    pub arena: ArenaPresentation,
    /// Fill color of the arena.
    pub background: Color,
    /// Player-controlled ship.
    pub ship: BodyPresentation,
    /// Aliens composing the fleet.
    pub aliens: Vec<BodyPresentation>,
    /// Bullets in flight.
    pub bullets: Vec<BodyPresentation>,
    /// Heads-up display state.
    pub hud: HudPresentation,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        arena: ArenaPresentation,
        background: Color,
        ship: BodyPresentation,
        aliens: Vec<BodyPresentation>,
        bullets: Vec<BodyPresentation>,
        hud: HudPresentation,
    ) -> Self {
        Self {
            arena,
            background,
            ship,
            aliens,
            bullets,
            hud,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear the area outside the arena.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
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

/// Rendering backend capable of presenting Alien Invasion scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the elapsed frame time and
    /// the input captured by the adapter, advances the simulation, and
    /// refreshes the scene before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameSimulationBreakdown + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Arena dimensions must be positive and finite.
    InvalidArena {
        /// Provided width that failed validation.
        width: f32,
        /// Provided height that failed validation.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_creation_accepts_positive_dimensions() {
        let arena = ArenaPresentation::new(1200.0, 800.0).expect("positive arena should succeed");

        assert_eq!(arena.width, 1200.0);
        assert_eq!(arena.height, 800.0);
    }

    #[test]
    fn arena_creation_rejects_degenerate_dimensions_without_panicking() {
        let error = ArenaPresentation::new(0.0, 800.0).expect_err("zero width must be rejected");
        assert!(matches!(error, RenderingError::InvalidArena { .. }));

        assert!(ArenaPresentation::new(1200.0, f32::NAN).is_err());
        assert!(ArenaPresentation::new(-5.0, 10.0).is_err());
    }

    #[test]
    fn lighten_and_darken_move_towards_extremes() {
        let base = Color::new(0.5, 0.2, 0.0, 0.8);

        let lighter = base.lighten(0.5);
        assert!((lighter.red - 0.75).abs() < f32::EPSILON);
        assert!((lighter.blue - 0.5).abs() < f32::EPSILON);
        assert_eq!(lighter.alpha, 0.8);

        let darker = base.darken(2.0);
        assert_eq!(darker, Color::new(0.0, 0.0, 0.0, 0.8));
    }

    #[test]
    fn button_edge_prefers_release_within_one_frame() {
        assert_eq!(
            ButtonEdge::from_observations(true, true),
            ButtonEdge::Released
        );
        assert_eq!(
            ButtonEdge::from_observations(true, false),
            ButtonEdge::Pressed
        );
        assert_eq!(
            ButtonEdge::from_observations(false, false),
            ButtonEdge::Unchanged
        );
    }

    #[test]
    fn scene_new_preserves_every_channel() {
        let arena = ArenaPresentation::new(400.0, 300.0).expect("valid arena");
        let ship = BodyPresentation::new(
            Vec2::new(170.0, 252.0),
            Vec2::new(60.0, 48.0),
            Color::from_rgb_u8(40, 70, 160),
        );
        let alien = BodyPresentation::new(
            Vec2::new(60.0, 58.0),
            Vec2::new(60.0, 58.0),
            Color::from_rgb_u8(70, 150, 70),
        );
        let hud = HudPresentation {
            lives: 2,
            status: HudStatus::Recovering,
        };

        let scene = Scene::new(
            arena,
            Color::from_rgb_u8(230, 230, 230),
            ship,
            vec![alien],
            Vec::new(),
            hud,
        );

        assert_eq!(scene.arena, arena);
        assert_eq!(scene.ship, ship);
        assert_eq!(scene.aliens, vec![alien]);
        assert!(scene.bullets.is_empty());
        assert_eq!(scene.hud, hud);
    }
}

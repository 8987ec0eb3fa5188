#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Alien Invasion experience.

mod config;
mod simulation;

use std::{path::PathBuf, time::Instant};

use alien_invasion_core::WINDOW_TITLE;
use alien_invasion_rendering::{Color, FrameSimulationBreakdown, Presentation, RenderingBackend};
use alien_invasion_rendering_macroquad::MacroquadBackend;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use crate::{
    config::{GameConfig, Overrides},
    simulation::Simulation,
};

/// Colour drawn around the arena when the window aspect ratio differs.
const LETTERBOX_COLOR: Color = Color::new(0.05, 0.05, 0.08, 1.0);

/// Command-line options for the Alien Invasion binary.
#[derive(Debug, Parser)]
#[command(name = "alien-invasion", about = "Defend the planet from a descending alien fleet")]
struct CliArgs {
    /// Optional TOML file with `[window]` and `[game]` tables.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Window width in pixels.
    #[arg(long, value_name = "PIXELS")]
    width: Option<u32>,
    /// Window height in pixels.
    #[arg(long, value_name = "PIXELS")]
    height: Option<u32>,
    /// Cover the whole display.
    #[arg(long)]
    fullscreen: bool,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    vsync: Option<bool>,
    /// Log frame timing metrics once per second.
    #[arg(long)]
    show_fps: bool,
    /// Ships available at the start of a game.
    #[arg(long, value_name = "N")]
    lives: Option<u32>,
}

impl CliArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            width: self.width,
            height: self.height,
            fullscreen: self.fullscreen,
            vsync: self.vsync,
            lives: self.lives,
        }
    }
}

/// Entry point for the Alien Invasion command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let config = GameConfig::load(args.config.as_deref())
        .context("failed to load configuration")?
        .with_overrides(args.overrides());
    config.validate().context("invalid configuration")?;

    log::info!(
        "starting with {} ships, {} bullets allowed, {} Hz simulation",
        config.settings.ship_limit,
        config.settings.bullets_allowed,
        config.settings.frame_rate
    );

    let mut simulation = Simulation::new(config.settings);
    let scene = simulation
        .scene()
        .context("failed to describe the opening scene")?;
    let presentation = Presentation::new(WINDOW_TITLE, LETTERBOX_COLOR, scene);

    let mut backend = MacroquadBackend::new()
        .with_window_size(config.window.width, config.window.height)
        .with_fullscreen(config.window.fullscreen)
        .with_show_fps(args.show_fps);
    if let Some(vsync) = config.window.vsync {
        backend = backend.with_vsync(vsync);
    }

    backend
        .run(presentation, move |frame_dt, input, scene| {
            let started = Instant::now();
            let steps = simulation.advance(frame_dt, input);
            simulation.populate_scene(scene);
            FrameSimulationBreakdown {
                simulation: started.elapsed(),
                steps,
            }
        })
        .context("rendering backend failed")?;

    log::info!("goodbye");
    Ok(())
}

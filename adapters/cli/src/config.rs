//! Layered game configuration: defaults, then an optional TOML file, then
//! command-line overrides.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use alien_invasion_core::{Settings, Size};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while assembling the game configuration.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}", .path.display())]
    Io {
        /// Location of the unreadable file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The configuration file is not valid TOML or names unknown keys.
    #[error("failed to parse config file {}", .path.display())]
    Parse {
        /// Location of the malformed file.
        path: PathBuf,
        /// Underlying TOML failure.
        #[source]
        source: toml::de::Error,
    },
    /// A value is outside of its supported range.
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending key.
        field: &'static str,
        /// Human-readable constraint that was violated.
        reason: &'static str,
    },
}

/// Window options understood by the `[window]` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowConfig {
    /// Width of the window in pixels.
    pub(crate) width: u32,
    /// Height of the window in pixels.
    pub(crate) height: u32,
    /// Whether the window covers the whole display.
    pub(crate) fullscreen: bool,
    /// Presentation sync; `None` keeps the platform default.
    pub(crate) vsync: Option<bool>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            fullscreen: false,
            vsync: None,
        }
    }
}

/// Complete configuration for one run of the game.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    /// Window options.
    pub(crate) window: WindowConfig,
    /// Gameplay tunables, read from the `[game]` table.
    #[serde(rename = "game")]
    pub(crate) settings: Settings,
}

/// Values supplied on the command line that take precedence over the file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
    pub(crate) fullscreen: bool,
    pub(crate) vsync: Option<bool>,
    pub(crate) lives: Option<u32>,
}

impl GameConfig {
    /// Loads the configuration file when one is provided, falling back to defaults.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies command-line overrides on top of the loaded values.
    #[must_use]
    pub(crate) fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(width) = overrides.width {
            self.window.width = width;
        }
        if let Some(height) = overrides.height {
            self.window.height = height;
        }
        if overrides.fullscreen {
            self.window.fullscreen = true;
        }
        if overrides.vsync.is_some() {
            self.window.vsync = overrides.vsync;
        }
        if let Some(lives) = overrides.lives {
            self.settings.ship_limit = lives;
        }
        self
    }

    /// Rejects values the simulation cannot run with.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 {
            return Err(invalid("window.width", "must be positive"));
        }
        if self.window.height == 0 {
            return Err(invalid("window.height", "must be positive"));
        }

        let settings = &self.settings;
        positive("game.ship_speed", settings.ship_speed)?;
        positive("game.bullet_speed", settings.bullet_speed)?;
        positive("game.alien_speed", settings.alien_speed)?;
        positive("game.bullet_width", settings.bullet_width)?;
        positive("game.bullet_height", settings.bullet_height)?;
        positive_size("game.ship_size", settings.ship_size)?;
        positive_size("game.alien_size", settings.alien_size)?;

        if !settings.fleet_drop_speed.is_finite() || settings.fleet_drop_speed < 0.0 {
            return Err(invalid("game.fleet_drop_speed", "must be zero or positive"));
        }
        if !settings.ship_hit_pause_secs.is_finite() || settings.ship_hit_pause_secs < 0.0 {
            return Err(invalid("game.ship_hit_pause_secs", "must be zero or positive"));
        }
        if settings.frame_rate == 0 {
            return Err(invalid("game.frame_rate", "must be at least 1"));
        }
        if settings.bullets_allowed == 0 {
            return Err(invalid("game.bullets_allowed", "must be at least 1"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be a positive number"))
    }
}

fn positive_size(field: &'static str, size: Size) -> Result<(), ConfigError> {
    positive(field, size.width)?;
    positive(field, size.height)
}

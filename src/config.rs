//! Engine configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::consts::{DEFAULT_GRID_SIZE, DEFAULT_ROOT_HEIGHT, DEFAULT_ROOT_TITLE, DEFAULT_ROOT_WIDTH};
use crate::geom::Rect;

pub const ENV_GRID_SIZE: &str = "COMPOSER_GRID_SIZE";
pub const ENV_ROOT_TITLE: &str = "COMPOSER_ROOT_TITLE";
pub const ENV_ROOT_WIDTH: &str = "COMPOSER_ROOT_WIDTH";
pub const ENV_ROOT_HEIGHT: &str = "COMPOSER_ROOT_HEIGHT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
    #[error("grid size must be positive")]
    ZeroGrid,
    #[error("root title must not be empty")]
    EmptyRootTitle,
    #[error("root frame must have positive size, got {width}x{height}")]
    DegenerateRoot { width: f64, height: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Grid unit used by gesture helpers when snapping drags and resizes.
    pub grid_size: u32,
    /// Title of the component present in a fresh state.
    pub root_title: String,
    /// Frame of the root component, and the default frame of new components.
    pub root_frame: Rect,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            root_title: DEFAULT_ROOT_TITLE.to_owned(),
            root_frame: Rect::new(0.0, 0.0, DEFAULT_ROOT_WIDTH, DEFAULT_ROOT_HEIGHT),
        }
    }
}

impl EngineConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `COMPOSER_GRID_SIZE`: default 5
    /// - `COMPOSER_ROOT_TITLE`: default `App`
    /// - `COMPOSER_ROOT_WIDTH`: default 600
    /// - `COMPOSER_ROOT_HEIGHT`: default 400
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for unparsable values and the validation errors
    /// of [`EngineConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`EngineConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let grid_size = parse_or(&lookup, ENV_GRID_SIZE, defaults.grid_size)?;
        let root_title = lookup(ENV_ROOT_TITLE).unwrap_or(defaults.root_title);
        let width = parse_or(&lookup, ENV_ROOT_WIDTH, defaults.root_frame.width)?;
        let height = parse_or(&lookup, ENV_ROOT_HEIGHT, defaults.root_frame.height)?;

        let config = Self { grid_size, root_title, root_frame: Rect::new(0.0, 0.0, width, height) };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// `ZeroGrid`, `EmptyRootTitle` or `DegenerateRoot`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::ZeroGrid);
        }
        if self.root_title.trim().is_empty() {
            return Err(ConfigError::EmptyRootTitle);
        }
        if self.root_frame.validate_frame().is_err() {
            return Err(ConfigError::DegenerateRoot { width: self.root_frame.width, height: self.root_frame.height });
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue { var, value: raw }),
    }
}

/// Runtime settings read from the environment
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

pub const KEYMAP_VAR: &str = "LADDERTRUCK_KEYMAP";
pub const LOG_VAR: &str = "LADDERTRUCK_LOG";
pub const FPS_VAR: &str = "LADDERTRUCK_FPS";
pub const CELL_ASPECT_VAR: &str = "LADDERTRUCK_CELL_ASPECT";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Keymap override file, applied on top of the default bindings
    pub keymap_path: Option<PathBuf>,
    pub log_path: PathBuf,
    pub fps: u32,
    /// Width over height of one terminal cell
    pub cell_aspect: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keymap_path: None,
            log_path: PathBuf::from("laddertruck.log"),
            fps: 30,
            cell_aspect: 0.5,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = lookup(KEYMAP_VAR) {
            config.keymap_path = Some(path.into());
        }
        if let Some(path) = lookup(LOG_VAR) {
            config.log_path = path.into();
        }
        if let Some(fps) = lookup(FPS_VAR) {
            config.fps = fps
                .trim()
                .parse()
                .with_context(|| format!("{FPS_VAR}={fps} is not a frame rate"))?;
            if config.fps == 0 {
                bail!("{FPS_VAR} must be at least 1");
            }
        }
        if let Some(aspect) = lookup(CELL_ASPECT_VAR) {
            config.cell_aspect = aspect
                .trim()
                .parse()
                .with_context(|| format!("{CELL_ASPECT_VAR}={aspect} is not a number"))?;
            if !(config.cell_aspect.is_finite() && config.cell_aspect > 0.0) {
                bail!("{CELL_ASPECT_VAR} must be positive");
            }
        }

        Ok(config)
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }
}

//! Engine configuration loaded from TOML
//!
//! Every section and field is optional; missing values fall back to the
//! defaults below.
//!
//! ```toml
//! [world]
//! seed = 42
//! load_radius = 3
//! background_generation = false
//!
//! [player]
//! spawn = [8.0, 40.0, 8.0]
//! max_health = 20.0
//!
//! [time]
//! day_length = 120.0
//!
//! [crafting]
//! discovery = "ever_held"
//!
//! [saves]
//! backend = "file"
//! dir = "saves"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{player, time};
use crate::crafting::DiscoveryPolicy;
use crate::persistence::{PersistenceResult, SaveManager};

/// Largest accepted chunk streaming radius
pub const MAX_LOAD_RADIUS: i32 = 16;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: u32,
    /// Chunks kept generated around the player, in rings
    pub load_radius: i32,
    pub background_generation: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            load_radius: 2,
            background_generation: cfg!(feature = "background-generation"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub spawn: [f32; 3],
    pub max_health: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: player::DEFAULT_SPAWN,
            max_health: player::MAX_HEALTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Seconds per full day/night cycle
    pub day_length: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            day_length: time::DEFAULT_DAY_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraftingConfig {
    pub discovery: DiscoveryPolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveBackend {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    pub backend: SaveBackend,
    /// Directory used by the file backend
    pub dir: PathBuf,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            backend: SaveBackend::Memory,
            dir: PathBuf::from("saves"),
        }
    }
}

impl SaveConfig {
    pub fn open(&self) -> PersistenceResult<SaveManager> {
        match self.backend {
            SaveBackend::Memory => Ok(SaveManager::in_memory()),
            SaveBackend::File => SaveManager::on_disk(&self.dir),
        }
    }
}

/// Main engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub time: TimeConfig,
    pub crafting: CraftingConfig,
    pub saves: SaveConfig,
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("[Config] Loaded {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(0..=MAX_LOAD_RADIUS).contains(&self.world.load_radius) {
            return Err(ConfigError::Invalid {
                field: "world.load_radius",
                reason: format!("{} is outside 0..={}", self.world.load_radius, MAX_LOAD_RADIUS),
            });
        }
        if !self.player.spawn.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "player.spawn",
                reason: "coordinates must be finite".to_string(),
            });
        }
        if !(self.player.max_health.is_finite() && self.player.max_health >= 1.0) {
            return Err(ConfigError::Invalid {
                field: "player.max_health",
                reason: format!("{} is below 1", self.player.max_health),
            });
        }
        if !(self.time.day_length.is_finite() && self.time.day_length > 0.0) {
            return Err(ConfigError::Invalid {
                field: "time.day_length",
                reason: format!("{} is not a positive number of seconds", self.time.day_length),
            });
        }
        Ok(())
    }
}

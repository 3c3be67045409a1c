//! Game settings: built-in defaults, then `reelbox.toml`, then CLI flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reelbox_core::reels::{BASE_STOP_TICKS, MAX_STOP_TICK, MIN_STOP_GAP, REEL_COUNT};
use reelbox_core::GameMode;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const SAVE_FILE_NAME: &str = "slots_data.json";
pub const CONFIG_FILE_NAME: &str = "reelbox.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Where the profile is stored. Defaults to the user data directory.
    pub save_path: Option<PathBuf>,
    /// Delay between animation frames.
    pub tick_ms: u64,
    /// Bet used for ENTER and for input that is not a number.
    pub default_bet: u64,
    pub mode: GameMode,
    /// Tick on which each reel stops, before jitter.
    pub stop_ticks: [u32; REEL_COUNT],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            save_path: None,
            tick_ms: 50,
            default_bet: 1,
            mode: GameMode::Progression,
            stop_ticks: BASE_STOP_TICKS,
        }
    }
}

impl GameConfig {
    /// ~/.config/reelbox on Linux, the platform equivalent elsewhere.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reelbox")
    }

    pub fn default_config_path() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE_NAME)
    }

    pub fn default_save_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reelbox")
            .join(SAVE_FILE_NAME)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: GameConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `explicit` when given (it must exist), otherwise the default
    /// config file if present, otherwise built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let path = Self::default_config_path();
        if path.exists() {
            debug!(path = %path.display(), "loading config");
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Reels must stop left to right whatever jitter a spin draws.
    pub fn validate(&self) -> Result<()> {
        if self.stop_ticks.iter().any(|&t| t == 0) {
            anyhow::bail!("stop_ticks must all be at least 1");
        }
        if self.stop_ticks.iter().any(|&t| t > MAX_STOP_TICK) {
            anyhow::bail!("stop_ticks must not exceed {MAX_STOP_TICK}");
        }
        for pair in self.stop_ticks.windows(2) {
            if pair[1] < pair[0] + MIN_STOP_GAP {
                anyhow::bail!(
                    "each stop tick must be at least {MIN_STOP_GAP} after the previous one, got {:?}",
                    self.stop_ticks
                );
            }
        }
        Ok(())
    }

    pub fn save_path(&self) -> PathBuf {
        self.save_path
            .clone()
            .unwrap_or_else(Self::default_save_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "tick_ms = 5\nmode = \"classic\"\n").unwrap();
        let config = GameConfig::load(Some(&path)).unwrap();
        assert_eq!(config.tick_ms, 5);
        assert_eq!(config.mode, GameMode::Classic);
        assert_eq!(config.default_bet, 1);
        assert_eq!(config.stop_ticks, [20, 45, 75]);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GameConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn zero_stop_tick_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "stop_ticks = [0, 10, 20]\n").unwrap();
        assert!(GameConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn crowded_or_reversed_stop_ticks_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        for ticks in ["[20, 21, 22]", "[75, 45, 20]", "[20, 27, 40]"] {
            std::fs::write(&path, format!("stop_ticks = {ticks}\n")).unwrap();
            let err = GameConfig::load(Some(&path)).unwrap_err();
            assert!(err.to_string().contains("at least 8 after"), "{ticks}");
        }
        std::fs::write(&path, "stop_ticks = [20, 28, 36]\n").unwrap();
        assert_eq!(GameConfig::load(Some(&path)).unwrap().stop_ticks, [20, 28, 36]);
    }

    #[test]
    fn huge_stop_tick_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "stop_ticks = [4294967295, 4294967295, 4294967295]\n").unwrap();
        let err = GameConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("must not exceed"));
    }

    #[test]
    fn save_path_override() {
        let config = GameConfig {
            save_path: Some(PathBuf::from("/tmp/x.json")),
            ..GameConfig::default()
        };
        assert_eq!(config.save_path(), PathBuf::from("/tmp/x.json"));
        assert!(GameConfig::default()
            .save_path()
            .ends_with(Path::new("reelbox").join(SAVE_FILE_NAME)));
    }
}

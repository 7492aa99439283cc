use std::path::Path;

use crate::ai::{EvalWeights, SearchConfig, WIN_SCORE};
use crate::error::{BoardError, ConfigError};
use crate::game::{Board, COLS, MAX_SIDE, ROWS};

/// Board dimensions for snapshots handed to the engine.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            rows: ROWS,
            cols: COLS,
        }
    }
}

impl BoardConfig {
    pub fn empty_board(&self) -> Result<Board, BoardError> {
        Board::new(self.rows, self.cols)
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub search: SearchConfig,
    pub eval: EvalWeights,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_SIDE).contains(&self.board.rows) {
            return Err(ConfigError::Validation(format!(
                "board.rows must be in 1..={MAX_SIDE}"
            )));
        }
        if !(1..=MAX_SIDE).contains(&self.board.cols) {
            return Err(ConfigError::Validation(format!(
                "board.cols must be in 1..={MAX_SIDE}"
            )));
        }
        if self.search.max_depth == 0 {
            return Err(ConfigError::Validation(
                "search.max_depth must be > 0".into(),
            ));
        }
        if self.search.time_limit_ms == 0 {
            return Err(ConfigError::Validation(
                "search.time_limit_ms must be > 0".into(),
            ));
        }
        if self.eval.four.abs() >= WIN_SCORE {
            return Err(ConfigError::Validation(format!(
                "eval.four must stay below the forced-win score {WIN_SCORE}"
            )));
        }
        if self.eval.center < 0 || self.eval.three < 0 || self.eval.two < 0 {
            return Err(ConfigError::Validation(
                "eval.center, eval.three and eval.two must be >= 0".into(),
            ));
        }
        if self.eval.opponent_three > 0 {
            return Err(ConfigError::Validation(
                "eval.opponent_three must be <= 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}

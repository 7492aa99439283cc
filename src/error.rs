use std::path::PathBuf;

/// Errors raised when building a board from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error(
        "board dimensions {rows}x{cols} out of range (each side must be 1..={})",
        crate::game::MAX_SIDE
    )]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("expected {expected} cells, got {actual}")]
    CellCountMismatch { expected: usize, actual: usize },

    #[error("cell {index} has invalid value {value} (expected 0, 1 or 2)")]
    InvalidCell { index: usize, value: u8 },

    #[error("character {ch:?} at position {index} is not a cell digit")]
    InvalidChar { index: usize, ch: char },

    #[error("piece at row {row}, column {col} sits above an empty cell")]
    FloatingPiece { row: usize, col: usize },
}

/// Contract violations rejected by the search engine. Running out of time is
/// not one of them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("board has no legal moves")]
    BoardFull,

    #[error("game is already over")]
    GameOver,

    #[error("invalid mover {0} (expected 1 or 2)")]
    InvalidMover(u8),

    #[error("search depth must be at least 1")]
    ZeroDepth,

    #[error("time limit must be at least 1 ms")]
    ZeroTimeLimit,

    #[error("invalid board: {0}")]
    Board(#[from] BoardError),
}

/// Errors that can occur while playing out a game between agents.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArenaError {
    #[error("{agent} selected illegal action {action} (legal: {legal:?})")]
    IllegalAction {
        agent: String,
        action: usize,
        legal: Vec<usize>,
    },

    #[error("{agent} failed to move: {source}")]
    Agent { agent: String, source: SearchError },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

//! # Connect Four Search
//!
//! Time-bounded game-tree search for Connect Four style games. Given a board
//! snapshot and the side to move, the engine returns a legal column within a
//! wall-clock budget, keeping the best fully searched answer when time runs
//! out.
//!
//! ## Modules
//!
//! - [`game`] — Board model with column drops and win detection, players, game state
//! - [`ai`] — Tactical shortcuts, static evaluation, iterative-deepening negamax, agents
//! - [`arena`] — Full games between two agents
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod arena;
pub mod config;
pub mod error;
pub mod game;

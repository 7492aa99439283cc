//! Connect Four game logic: a flat column-drop board, player identities, and a
//! game state machine with immutable transitions.

mod board;
mod player;
mod state;

pub use board::{Board, Cell, MoveError as BoardMoveError, COLS, CONNECT, MAX_SIDE, ROWS};
pub use player::Player;
pub use state::{GameOutcome, GameState, MoveError};

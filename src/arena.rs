//! Full games between two agents.

use crate::ai::Agent;
use crate::error::ArenaError;
use crate::game::{GameOutcome, GameState, Player};

/// Moves played and how the game ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub moves: Vec<usize>,
    pub outcome: GameOutcome,
}

impl GameRecord {
    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            GameOutcome::Winner(player) => Some(player),
            GameOutcome::Draw => None,
        }
    }
}

/// Play one game from `start` until it ends. `first` moves for Player 1.
pub fn play_from(
    start: GameState,
    first: &mut dyn Agent,
    second: &mut dyn Agent,
) -> Result<GameRecord, ArenaError> {
    let mut state = start;
    let mut moves = Vec::new();

    loop {
        if let Some(outcome) = state.outcome() {
            tracing::info!(?outcome, plies = moves.len(), "game finished");
            return Ok(GameRecord { moves, outcome });
        }

        let agent: &mut dyn Agent = match state.current_player() {
            Player::One => &mut *first,
            Player::Two => &mut *second,
        };
        let action = agent
            .select_action(&state)
            .map_err(|source| ArenaError::Agent {
                agent: agent.name().to_string(),
                source,
            })?;
        tracing::debug!(player = state.current_player().name(), action, "move");

        if state.apply_move_mut(action).is_err() {
            return Err(ArenaError::IllegalAction {
                agent: agent.name().to_string(),
                action,
                legal: state.legal_actions(),
            });
        }
        moves.push(action);
    }
}

/// Play one game on an empty standard board.
pub fn play_game(first: &mut dyn Agent, second: &mut dyn Agent) -> Result<GameRecord, ArenaError> {
    play_from(GameState::initial(), first, second)
}

/// Derive a deterministic seed for a given game index.
pub fn game_seed(base_seed: u64, game_index: usize) -> u64 {
    // FNV-1a-inspired mixing for deterministic, well-distributed seeds
    let mut hash = base_seed ^ 0x517cc1b727220a95;
    let index = game_index as u64;
    hash = hash.wrapping_mul(0x100000001b3);
    hash ^= index;
    hash = hash.wrapping_mul(0x100000001b3);
    hash ^= index >> 32;
    hash
}

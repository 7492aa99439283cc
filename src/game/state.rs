use super::board::{self, Board};
use super::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    ColumnFull,
    InvalidColumn,
    GameOver,
}

impl From<board::MoveError> for MoveError {
    fn from(err: board::MoveError) -> Self {
        match err {
            board::MoveError::ColumnFull => MoveError::ColumnFull,
            board::MoveError::InvalidColumn => MoveError::InvalidColumn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    outcome: Option<GameOutcome>,
}

impl GameState {
    /// Create initial game state on a standard board
    pub fn initial() -> Self {
        GameState {
            board: Board::standard(),
            current_player: Player::One, // Player 1 starts
            outcome: None,
        }
    }

    /// Wrap an existing position, deriving its outcome from the board.
    pub fn from_position(board: Board, current_player: Player) -> Self {
        let outcome = Self::outcome_of(&board);
        GameState {
            board,
            current_player,
            outcome,
        }
    }

    fn outcome_of(board: &Board) -> Option<GameOutcome> {
        if let Some(winner) = board.winner() {
            Some(GameOutcome::Winner(winner))
        } else if board.is_full() {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Get list of legal columns (not full)
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.legal_moves()
    }

    /// Apply a move and return new state (immutable)
    pub fn apply_move(&self, column: usize) -> Result<GameState, MoveError> {
        let mut next = self.clone();
        next.apply_move_mut(column)?;
        Ok(next)
    }

    /// Apply move in place
    pub fn apply_move_mut(&mut self, column: usize) -> Result<(), MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        self.board
            .drop_piece(column, self.current_player.to_cell())?;
        self.outcome = Self::outcome_of(&self.board);
        self.current_player = self.current_player.other();

        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

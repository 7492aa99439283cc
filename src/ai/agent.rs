use crate::error::SearchError;
use crate::game::GameState;

/// Universal interface for move-picking agents.
pub trait Agent {
    /// Select an action (column) for the current player of `state`.
    fn select_action(&mut self, state: &GameState) -> Result<usize, SearchError>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}

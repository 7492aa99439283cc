//! Move selection: one-ply tactics, static evaluation, and the time-bounded
//! iterative-deepening search, plus the agents that wrap them.

mod agent;
pub mod heuristic;
mod random;
pub mod search;
pub mod tactics;

pub use agent::Agent;
pub use heuristic::{EvalWeights, Heuristic, WindowHeuristic};
pub use random::RandomAgent;
pub use search::{
    best_move, Decision, SearchAgent, SearchConfig, SearchLimits, SearchReport, Searcher,
    INFINITY, WIN_SCORE,
};

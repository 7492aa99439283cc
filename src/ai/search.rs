//! Iterative-deepening negamax with alpha-beta pruning under a wall-clock
//! budget.
//!
//! Each call runs the tactical shortcuts first, then searches depth 1, 2, ...
//! up to the depth limit. A depth only replaces the current answer once every
//! root candidate has been scored; when the deadline passes mid-depth the
//! partial work is dropped and the previous answer stands. The first fallback
//! is the legal column nearest the center.
//!
//! Scores are from the side to move. `WIN_SCORE` marks a proven win inside
//! the horizon and is not adjusted for distance, so a win found at ply 3
//! scores the same as one found at ply 7.

use std::time::{Duration, Instant};

use crate::error::SearchError;
use crate::game::{Board, GameState, Player};

use super::agent::Agent;
use super::heuristic::{Heuristic, WindowHeuristic};
use super::tactics::{center_order, forced_block, immediate_win};

/// Score of a proven win. Anything at or beyond this magnitude is forced.
pub const WIN_SCORE: i32 = 1_000_000;

/// Bound for alpha-beta windows. Kept small enough that negation never
/// overflows.
pub const INFINITY: i32 = WIN_SCORE + 1;

/// Search configuration, loadable from the `[search]` TOML table.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_depth: u32,
    pub time_limit_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: 8,
            time_limit_ms: 1200,
        }
    }
}

impl SearchConfig {
    pub fn limits(&self) -> Result<SearchLimits, SearchError> {
        SearchLimits::new(self.max_depth, self.time_limit_ms)
    }
}

/// Validated depth and time budget for one search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    max_depth: u32,
    time_limit: Duration,
}

impl SearchLimits {
    pub fn new(max_depth: u32, time_limit_ms: u64) -> Result<Self, SearchError> {
        if max_depth == 0 {
            return Err(SearchError::ZeroDepth);
        }
        if time_limit_ms == 0 {
            return Err(SearchError::ZeroTimeLimit);
        }
        Ok(SearchLimits {
            max_depth,
            time_limit: Duration::from_millis(time_limit_ms),
        })
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

/// How the returned column was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Completes a line this move.
    ImmediateWin,
    /// Stops an opponent line that would complete next move.
    ForcedBlock,
    /// Best root move of the deepest completed depth.
    Searched,
    /// Not even depth 1 finished in time; nearest-center legal column.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub column: usize,
    /// Root score of the completed depth, `None` for shortcuts without search.
    pub score: Option<i32>,
    /// Deepest fully completed depth (0 when no depth completed).
    pub depth: u32,
    pub nodes: u64,
    pub elapsed: Duration,
    pub decision: Decision,
}

impl SearchReport {
    /// True when the score proves a win or loss within the horizon.
    pub fn is_forced(&self) -> bool {
        self.score.is_some_and(|s| s.abs() >= WIN_SCORE)
    }
}

/// Wall-clock cutoff polled at every node.
#[derive(Debug, Clone, Copy)]
struct Deadline(Option<Instant>);

impl Deadline {
    fn after(start: Instant, limit: Duration) -> Self {
        Deadline(start.checked_add(limit))
    }

    fn expired(self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }
}

/// Move picker for a single search tree.
pub struct Searcher<H = WindowHeuristic> {
    heuristic: H,
}

impl Default for Searcher {
    fn default() -> Self {
        Searcher::new(WindowHeuristic::default())
    }
}

impl<H: Heuristic> Searcher<H> {
    pub fn new(heuristic: H) -> Self {
        Searcher { heuristic }
    }

    /// Pick a column for `mover`. The board must have at least one legal move.
    pub fn search(
        &self,
        board: &Board,
        mover: Player,
        limits: SearchLimits,
    ) -> Result<usize, SearchError> {
        self.search_with_report(board, mover, limits)
            .map(|report| report.column)
    }

    pub fn search_with_report(
        &self,
        board: &Board,
        mover: Player,
        limits: SearchLimits,
    ) -> Result<SearchReport, SearchError> {
        let start = Instant::now();
        let order = center_order(board.cols());
        let fallback = order
            .iter()
            .copied()
            .find(|&col| board.is_legal(col))
            .ok_or(SearchError::BoardFull)?;

        let mut report = SearchReport {
            column: fallback,
            score: None,
            depth: 0,
            nodes: 0,
            elapsed: Duration::ZERO,
            decision: Decision::Fallback,
        };

        if let Some(column) = immediate_win(board, mover) {
            tracing::trace!(column, "immediate win");
            report.column = column;
            report.score = Some(WIN_SCORE);
            report.decision = Decision::ImmediateWin;
            report.elapsed = start.elapsed();
            return Ok(report);
        }

        if let Some(column) = forced_block(board, mover) {
            tracing::trace!(column, "forced block");
            report.column = column;
            report.decision = Decision::ForcedBlock;
            report.elapsed = start.elapsed();
            return Ok(report);
        }

        // Past this depth every line has filled the board.
        let horizon = limits
            .max_depth
            .min(u32::try_from(board.empty_cells()).unwrap_or(u32::MAX));

        let mut tree = Tree {
            heuristic: &self.heuristic,
            order: &order,
            deadline: Deadline::after(start, limits.time_limit),
            nodes: 0,
        };
        let mut scratch = board.clone();

        for depth in 1..=horizon {
            let Some((column, score)) = tree.root(&mut scratch, depth, mover) else {
                tracing::debug!(depth, nodes = tree.nodes, "deadline reached, keeping previous depth");
                break;
            };

            report.column = column;
            report.score = Some(score);
            report.depth = depth;
            report.decision = Decision::Searched;
            tracing::debug!(depth, column, score, nodes = tree.nodes, "depth complete");

            if score.abs() >= WIN_SCORE {
                break;
            }
        }

        report.nodes = tree.nodes;
        report.elapsed = start.elapsed();
        Ok(report)
    }
}

/// Per-call search state. Explores by dropping into `board` and lifting the
/// piece back out before any early return.
struct Tree<'a, H> {
    heuristic: &'a H,
    order: &'a [usize],
    deadline: Deadline,
    nodes: u64,
}

impl<H: Heuristic> Tree<'_, H> {
    /// Score every root candidate at `depth`. `None` means the deadline
    /// passed before the depth finished.
    fn root(&mut self, board: &mut Board, depth: u32, mover: Player) -> Option<(usize, i32)> {
        let mut best: Option<(usize, i32)> = None;
        let mut alpha = -INFINITY;

        for &col in self.order {
            if self.deadline.expired() {
                return None;
            }
            if board.drop_piece(col, mover.to_cell()).is_err() {
                continue;
            }
            let child = self.negamax(board, depth - 1, -INFINITY, -alpha, mover.other());
            board.lift_piece(col);
            let score = -child?;

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((col, score));
            }
            alpha = alpha.max(score);
        }

        best
    }

    fn negamax(
        &mut self,
        board: &mut Board,
        depth: u32,
        mut alpha: i32,
        beta: i32,
        mover: Player,
    ) -> Option<i32> {
        if self.deadline.expired() {
            return None;
        }
        self.nodes += 1;

        if let Some(winner) = board.winner() {
            return Some(if winner == mover { WIN_SCORE } else { -WIN_SCORE });
        }

        if depth == 0 {
            return Some(self.heuristic.evaluate(board, mover));
        }

        let mut best: Option<i32> = None;

        for &col in self.order {
            if board.drop_piece(col, mover.to_cell()).is_err() {
                continue;
            }
            let child = self.negamax(board, depth - 1, -beta, -alpha, mover.other());
            board.lift_piece(col);
            let score = -child?;

            best = Some(best.map_or(score, |b| b.max(score)));
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        // No legal moves left: a drawn, full board.
        Some(best.unwrap_or_else(|| self.heuristic.evaluate(board, mover)))
    }
}

/// Engine-backed agent playing with fixed limits.
pub struct SearchAgent<H = WindowHeuristic> {
    searcher: Searcher<H>,
    limits: SearchLimits,
}

impl SearchAgent {
    pub fn new(limits: SearchLimits) -> Self {
        SearchAgent {
            searcher: Searcher::default(),
            limits,
        }
    }
}

impl<H: Heuristic> SearchAgent<H> {
    pub fn with_searcher(searcher: Searcher<H>, limits: SearchLimits) -> Self {
        SearchAgent { searcher, limits }
    }
}

impl<H: Heuristic> Agent for SearchAgent<H> {
    fn select_action(&mut self, state: &GameState) -> Result<usize, SearchError> {
        if state.is_terminal() {
            return Err(SearchError::GameOver);
        }
        self.searcher
            .search(state.board(), state.current_player(), self.limits)
    }

    fn name(&self) -> &str {
        "Negamax"
    }
}

/// Flat-snapshot entry point: `cells` is row-major 0/1/2, `mover` is 1 or 2.
pub fn best_move(
    cells: &[u8],
    rows: usize,
    cols: usize,
    mover: u8,
    max_depth: u32,
    time_limit_ms: u64,
) -> Result<usize, SearchError> {
    let player = Player::from_code(mover).ok_or(SearchError::InvalidMover(mover))?;
    let limits = SearchLimits::new(max_depth, time_limit_ms)?;
    let board = Board::from_cells(rows, cols, cells)?;
    Searcher::default().search(&board, player, limits)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::error::BoardError;
    use crate::game::{COLS, ROWS};

    fn board(text: &str) -> Board {
        Board::parse(ROWS, COLS, text).unwrap()
    }

    fn limits(depth: u32, ms: u64) -> SearchLimits {
        SearchLimits::new(depth, ms).unwrap()
    }

    /// Heuristic that sees nothing; only terminal scores matter.
    struct Flat;

    impl Heuristic for Flat {
        fn evaluate(&self, _board: &Board, _player: Player) -> i32 {
            0
        }
    }

    #[test]
    fn selects_legal_action_on_empty_board() {
        let board = Board::standard();
        let column = Searcher::default()
            .search(&board, Player::One, limits(4, 5_000))
            .unwrap();
        assert!(board.is_legal(column));
    }

    #[test]
    fn selects_legal_actions_across_random_positions() {
        let mut rng = StdRng::seed_from_u64(7);
        let searcher = Searcher::default();

        for _ in 0..20 {
            let mut board = Board::standard();
            let mut mover = Player::One;
            let plies = rng.random_range(0..20);
            for _ in 0..plies {
                let legal = board.legal_moves();
                let col = legal[rng.random_range(0..legal.len())];
                board.drop_piece(col, mover.to_cell()).unwrap();
                mover = mover.other();
                if board.winner().is_some() {
                    break;
                }
            }
            if board.is_full() {
                continue;
            }
            let column = searcher.search(&board, mover, limits(3, 5_000)).unwrap();
            assert!(board.is_legal(column), "column {column} is not legal");
        }
    }

    #[test]
    fn takes_winning_move_with_tiny_budget() {
        let b = board("0000000/0000000/0000000/0000000/2220000/1110000");
        let report = Searcher::default()
            .search_with_report(&b, Player::One, limits(1, 1))
            .unwrap();
        assert_eq!(report.column, 3);
        assert_eq!(report.decision, Decision::ImmediateWin);
        assert!(report.is_forced());
    }

    #[test]
    fn blocks_opponent_win() {
        let b = board("0000000/0000000/0000000/0000000/0000001/0002221");
        let report = Searcher::default()
            .search_with_report(&b, Player::One, limits(6, 5_000))
            .unwrap();
        assert_eq!(report.column, 2);
        assert_eq!(report.decision, Decision::ForcedBlock);
    }

    #[test]
    fn block_with_two_threats_picks_nearest_center() {
        // Player 2 threatens both column 2 and column 6
        let b = board("0000000/0000000/0000000/0000000/0001100/0002220");
        let column = Searcher::default()
            .search(&b, Player::One, limits(6, 5_000))
            .unwrap();
        assert_eq!(column, 2);
    }

    #[test]
    fn prefers_win_over_block() {
        let b = board("0000000/0000000/0000000/0000000/2220000/1110000");
        let column = Searcher::default()
            .search(&b, Player::Two, limits(4, 5_000))
            .unwrap();
        // Player 2 cannot win at once, so it must block column 3
        assert_eq!(column, 3);

        let column = Searcher::default()
            .search(&b, Player::One, limits(4, 5_000))
            .unwrap();
        assert_eq!(column, 3);
    }

    #[test]
    fn finds_double_threat_and_stops_deepening() {
        // Player 1 can make an open three on the bottom row
        let b = board("0000000/0000000/0000000/0000000/0022000/0011000");
        let report = Searcher::default()
            .search_with_report(&b, Player::One, limits(8, 10_000))
            .unwrap();
        assert_eq!(report.decision, Decision::Searched);
        assert_eq!(report.score, Some(WIN_SCORE));
        assert_eq!(report.depth, 3);
        assert!(report.column == 1 || report.column == 4);
    }

    #[test]
    fn forced_win_survives_deeper_limits() {
        let b = board("0000000/0000000/0000000/0000000/0022000/0011000");
        let searcher = Searcher::default();
        let shallow = searcher
            .search_with_report(&b, Player::One, limits(3, 10_000))
            .unwrap();
        let deep = searcher
            .search_with_report(&b, Player::One, limits(10, 10_000))
            .unwrap();
        assert_eq!(shallow.score, Some(WIN_SCORE));
        assert_eq!(deep.score, Some(WIN_SCORE));
        assert_eq!(shallow.column, deep.column);
    }

    #[test]
    fn double_threat_scores_as_forced_loss() {
        // Player 2 wins in column 0 or column 4; one block is not enough
        let b = board("0000000/0000000/0000000/0000000/0000000/0222000");
        let order = center_order(COLS);
        let heuristic = WindowHeuristic::default();
        let mut tree = Tree {
            heuristic: &heuristic,
            order: &order,
            deadline: Deadline(None),
            nodes: 0,
        };
        let mut scratch = b.clone();
        let (_, score) = tree.root(&mut scratch, 2, Player::One).unwrap();
        assert_eq!(score, -WIN_SCORE);
        assert_eq!(scratch, b);

        // The shortcut still blocks the threat nearest the center
        let report = Searcher::default()
            .search_with_report(&b, Player::One, limits(4, 5_000))
            .unwrap();
        assert_eq!(report.column, 4);
        assert_eq!(report.decision, Decision::ForcedBlock);
    }

    #[test]
    fn deterministic_across_calls() {
        let b = board("0000000/0000000/0000000/0000000/0002000/0012100");
        let searcher = Searcher::default();
        let first = searcher.search(&b, Player::One, limits(6, 30_000)).unwrap();
        for _ in 0..3 {
            let again = searcher.search(&b, Player::One, limits(6, 30_000)).unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn respects_time_budget() {
        let b = Board::standard();
        let budget = 100;
        let start = Instant::now();
        let report = Searcher::default()
            .search_with_report(&b, Player::One, limits(42, budget))
            .unwrap();
        let elapsed = start.elapsed();

        assert!(b.is_legal(report.column));
        assert!(report.depth < 42);
        assert!(
            elapsed < Duration::from_millis(budget + 250),
            "search took {elapsed:?} for a {budget}ms budget"
        );
    }

    #[test]
    fn expired_budget_falls_back_to_center() {
        let b = Board::standard();
        let tree_order = center_order(COLS);
        let mut scratch = b.clone();
        let heuristic = WindowHeuristic::default();
        let mut tree = Tree {
            heuristic: &heuristic,
            order: &tree_order,
            deadline: Deadline(Some(Instant::now())),
            nodes: 0,
        };
        assert_eq!(tree.root(&mut scratch, 3, Player::One), None);
        assert_eq!(scratch, b, "aborted search must restore the board");

        let report = Searcher::default()
            .search_with_report(&b, Player::One, limits(20, 1))
            .unwrap();
        assert!(b.is_legal(report.column));
        if report.decision == Decision::Fallback {
            assert_eq!(report.column, 3);
            assert_eq!(report.depth, 0);
        }
    }

    #[test]
    fn timeout_keeps_last_completed_depth() {
        let b = Board::standard();
        let searcher = Searcher::default();
        // Depth 42 cannot finish in 50ms; the deadline stops a deeper pass
        let cut = searcher
            .search_with_report(&b, Player::One, limits(42, 50))
            .unwrap();
        assert_eq!(cut.decision, Decision::Searched);
        assert!(cut.depth >= 1);
        assert!(cut.depth < 42);

        let full = searcher
            .search_with_report(&b, Player::One, limits(cut.depth, 600_000))
            .unwrap();
        assert_eq!(full.depth, cut.depth);
        assert_eq!(full.column, cut.column);
        assert_eq!(full.score, cut.score);
    }

    #[test]
    fn fallback_skips_full_center_column() {
        let mut b = Board::standard();
        for i in 0..ROWS {
            let cell = if i % 2 == 0 { Player::One } else { Player::Two };
            b.drop_piece(3, cell.to_cell()).unwrap();
        }
        let column = Searcher::new(Flat)
            .search(&b, Player::One, limits(1, 5_000))
            .unwrap();
        assert_eq!(column, 2);
    }

    #[test]
    fn caller_board_is_not_mutated() {
        let b = board("0000000/0000000/0000000/0000000/0002000/0012100");
        let before = b.clone();
        let _ = Searcher::default().search(&b, Player::One, limits(5, 5_000));
        assert_eq!(b, before);
    }

    #[test]
    fn searches_non_standard_boards() {
        let b = Board::new(5, 5).unwrap();
        let column = Searcher::default()
            .search(&b, Player::One, limits(6, 5_000))
            .unwrap();
        assert!(b.is_legal(column));

        let narrow = Board::new(4, 1).unwrap();
        let column = Searcher::default()
            .search(&narrow, Player::Two, limits(4, 5_000))
            .unwrap();
        assert_eq!(column, 0);
    }

    #[test]
    fn rejects_full_board() {
        let b = board("1122112/2211221/1122112/2211221/1122112/2211221");
        assert_eq!(
            Searcher::default().search(&b, Player::One, limits(4, 100)),
            Err(SearchError::BoardFull)
        );
    }

    #[test]
    fn rejects_invalid_limits() {
        assert_eq!(SearchLimits::new(0, 100), Err(SearchError::ZeroDepth));
        assert_eq!(SearchLimits::new(4, 0), Err(SearchError::ZeroTimeLimit));
        let config = SearchConfig::default();
        assert_eq!(config.limits().unwrap().max_depth(), 8);
        assert_eq!(
            config.limits().unwrap().time_limit(),
            Duration::from_millis(1200)
        );
    }

    #[test]
    fn best_move_from_flat_snapshot() {
        let mut cells = vec![0u8; ROWS * COLS];
        for col in 0..3 {
            cells[5 * COLS + col] = 1;
            cells[4 * COLS + col] = 2;
        }
        assert_eq!(best_move(&cells, ROWS, COLS, 1, 1, 1), Ok(3));
        assert_eq!(
            best_move(&cells, ROWS, COLS, 3, 4, 100),
            Err(SearchError::InvalidMover(3))
        );
        assert_eq!(
            best_move(&cells, ROWS, COLS, 1, 0, 100),
            Err(SearchError::ZeroDepth)
        );
        assert_eq!(
            best_move(&cells, ROWS, COLS, 1, 4, 0),
            Err(SearchError::ZeroTimeLimit)
        );
        assert_eq!(
            best_move(&cells[..10], ROWS, COLS, 1, 4, 100),
            Err(SearchError::Board(BoardError::CellCountMismatch {
                expected: 42,
                actual: 10
            }))
        );
    }

    #[test]
    fn best_move_rejects_oversized_dimensions() {
        let cells = [0u8; 42];
        assert_eq!(
            best_move(&cells, usize::MAX, 2, 1, 4, 100),
            Err(SearchError::Board(BoardError::InvalidDimensions {
                rows: usize::MAX,
                cols: 2
            }))
        );
        assert_eq!(
            best_move(&cells, 200_000, 200_000, 1, 4, 100),
            Err(SearchError::Board(BoardError::InvalidDimensions {
                rows: 200_000,
                cols: 200_000
            }))
        );
    }

    // --- Agent trait tests ---

    #[test]
    fn agent_plays_from_game_state() {
        let mut agent = SearchAgent::new(limits(4, 5_000));
        let mut state = GameState::initial();
        for col in 0..3 {
            state = state.apply_move(col).unwrap(); // Player 1
            state = state.apply_move(col).unwrap(); // Player 2
        }
        assert_eq!(agent.select_action(&state), Ok(3));
        assert_eq!(agent.name(), "Negamax");
    }

    #[test]
    fn agent_rejects_finished_game() {
        let mut agent = SearchAgent::new(limits(4, 5_000));
        let mut state = GameState::initial();
        for col in [0, 0, 1, 1, 2, 2, 3] {
            state = state.apply_move(col).unwrap();
        }
        assert!(state.is_terminal());
        assert_eq!(agent.select_action(&state), Err(SearchError::GameOver));
    }

    #[test]
    fn full_game_vs_self_completes() {
        let mut agent1 = SearchAgent::new(limits(4, 2_000));
        let mut agent2 = SearchAgent::with_searcher(Searcher::new(Flat), limits(4, 2_000));
        let mut state = GameState::initial();
        let mut turn = 0;

        while !state.is_terminal() && turn < 42 {
            let action = if turn % 2 == 0 {
                agent1.select_action(&state).unwrap()
            } else {
                agent2.select_action(&state).unwrap()
            };
            state = state.apply_move(action).unwrap();
            turn += 1;
        }

        assert!(state.is_terminal(), "Game should complete");
    }
}

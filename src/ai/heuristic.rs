use crate::game::{Board, Cell, Player, CONNECT};

/// Weights for the static evaluator. Scores are from the mover's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    /// Bonus per mover piece in the center column.
    pub center: i32,
    /// A complete line. The terminal check normally catches these first.
    pub four: i32,
    /// Three mover pieces and one empty cell.
    pub three: i32,
    /// Two mover pieces and two empty cells.
    pub two: i32,
    /// Three opponent pieces and one empty cell.
    pub opponent_three: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        EvalWeights {
            center: 3,
            four: 100_000,
            three: 100,
            two: 10,
            opponent_three: -80,
        }
    }
}

/// Trait for evaluating a board position from a player's perspective.
pub trait Heuristic: Send + Sync {
    fn evaluate(&self, board: &Board, player: Player) -> i32;
}

/// Default heuristic: center control plus a scan of every 4-cell window.
#[derive(Debug, Clone, Default)]
pub struct WindowHeuristic {
    weights: EvalWeights,
}

impl WindowHeuristic {
    pub fn new(weights: EvalWeights) -> Self {
        WindowHeuristic { weights }
    }

    fn score_window(&self, own: usize, opp: usize, empty: usize) -> i32 {
        let w = &self.weights;
        match (own, opp, empty) {
            (4, 0, 0) => w.four,
            (3, 0, 1) => w.three,
            (2, 0, 2) => w.two,
            (0, 3, 1) => w.opponent_three,
            _ => 0,
        }
    }
}

impl Heuristic for WindowHeuristic {
    fn evaluate(&self, board: &Board, player: Player) -> i32 {
        let own_cell = player.to_cell();
        let center = board.cols() / 2;

        let center_pieces = (0..board.rows())
            .filter(|&row| board.get(row, center) == own_cell)
            .count();
        let mut score = self.weights.center * center_pieces as i32;

        board.for_each_window(|window: &[Cell; CONNECT]| {
            let mut own = 0;
            let mut opp = 0;
            let mut empty = 0;
            for &cell in window {
                match cell {
                    Cell::Empty => empty += 1,
                    c if c == own_cell => own += 1,
                    _ => opp += 1,
                }
            }
            score += self.score_window(own, opp, empty);
        });

        score
    }
}

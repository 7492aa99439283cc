//! One-ply tactical shortcuts run before the full search.
//!
//! Blocking policy: when the opponent threatens to win in several columns at
//! once, only the threat nearest the center is blocked. That position is
//! already lost against correct play; the shortcut does not try to detect it.

use crate::game::{Board, Player};

/// Horizontal distance from `col` to the board's center column.
pub fn center_distance(col: usize, cols: usize) -> usize {
    col.abs_diff(cols / 2)
}

/// Columns in search order: nearest the center first, ties to the lower
/// column.
pub fn center_order(cols: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..cols).collect();
    order.sort_by_key(|&col| center_distance(col, cols));
    order
}

/// Columns where dropping `player`'s piece wins on the spot, in column order.
pub fn winning_columns(board: &mut Board, player: Player) -> Vec<usize> {
    let mut wins = Vec::new();
    for col in 0..board.cols() {
        if board.drop_piece(col, player.to_cell()).is_err() {
            continue;
        }
        let won = board.winner() == Some(player);
        board.lift_piece(col);
        if won {
            wins.push(col);
        }
    }
    wins
}

/// The lowest column that wins immediately for `mover`.
pub fn immediate_win(board: &Board, mover: Player) -> Option<usize> {
    let mut scratch = board.clone();
    winning_columns(&mut scratch, mover).first().copied()
}

/// A column that stops one of the opponent's immediate wins, choosing the
/// threat closest to the center.
pub fn forced_block(board: &Board, mover: Player) -> Option<usize> {
    let mut scratch = board.clone();
    let cols = board.cols();
    winning_columns(&mut scratch, mover.other())
        .into_iter()
        .min_by_key(|&col| center_distance(col, cols))
}

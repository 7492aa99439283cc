use crate::error::BoardError;

use super::player::Player;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;
/// Pieces in a line needed to win.
pub const CONNECT: usize = 4;
/// Largest accepted row or column count.
pub const MAX_SIDE: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    One,
    Two,
}

impl Cell {
    /// Decode the 0/1/2 snapshot encoding.
    pub fn from_code(code: u8) -> Option<Cell> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::One),
            2 => Some(Cell::Two),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::One => 1,
            Cell::Two => 2,
        }
    }

    /// The player owning this cell, if any.
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::One => Some(Player::One),
            Cell::Two => Some(Player::Two),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    ColumnFull,
    InvalidColumn,
}

/// Row-major grid with column-drop semantics. Row 0 is the top.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

/// Direction steps (row, col) for the four line orientations.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

impl Board {
    /// Number of cells on a `rows x cols` board, or an error when either side
    /// is outside `1..=MAX_SIDE`.
    pub fn cell_count(rows: usize, cols: usize) -> Result<usize, BoardError> {
        if !(1..=MAX_SIDE).contains(&rows) || !(1..=MAX_SIDE).contains(&cols) {
            return Err(BoardError::InvalidDimensions { rows, cols });
        }
        rows.checked_mul(cols)
            .ok_or(BoardError::InvalidDimensions { rows, cols })
    }

    /// Create an empty board
    pub fn new(rows: usize, cols: usize) -> Result<Self, BoardError> {
        let count = Self::cell_count(rows, cols)?;
        Ok(Board {
            rows,
            cols,
            cells: vec![Cell::Empty; count],
        })
    }

    /// Create an empty 6x7 board
    pub fn standard() -> Self {
        Board {
            rows: ROWS,
            cols: COLS,
            cells: vec![Cell::Empty; ROWS * COLS],
        }
    }

    /// Build a board from a flat 0/1/2 snapshot, rejecting bad encodings and
    /// pieces that float above an empty cell.
    pub fn from_cells(rows: usize, cols: usize, codes: &[u8]) -> Result<Self, BoardError> {
        let expected = Self::cell_count(rows, cols)?;
        if codes.len() != expected {
            return Err(BoardError::CellCountMismatch {
                expected,
                actual: codes.len(),
            });
        }

        let cells = codes
            .iter()
            .enumerate()
            .map(|(index, &code)| {
                Cell::from_code(code).ok_or(BoardError::InvalidCell { index, value: code })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let board = Board { rows, cols, cells };

        for col in 0..cols {
            for row in 0..rows - 1 {
                if board.get(row, col) != Cell::Empty && board.get(row + 1, col) == Cell::Empty {
                    return Err(BoardError::FloatingPiece { row, col });
                }
            }
        }

        Ok(board)
    }

    /// Parse a textual snapshot of digits. Whitespace, `/` and `|` are ignored
    /// so rows can be laid out for readability.
    pub fn parse(rows: usize, cols: usize, text: &str) -> Result<Self, BoardError> {
        let mut codes = Vec::with_capacity(Self::cell_count(rows, cols)?);
        for (index, ch) in text
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/' && *c != '|')
            .enumerate()
        {
            let value = ch
                .to_digit(10)
                .and_then(|d| u8::try_from(d).ok())
                .ok_or(BoardError::InvalidChar { index, ch })?;
            codes.push(value);
        }
        Board::from_cells(rows, cols, &codes)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    /// Flat 0/1/2 export, row-major.
    pub fn to_codes(&self) -> Vec<u8> {
        self.cells.iter().map(|c| c.code()).collect()
    }

    /// A column is legal when it exists and its top cell is empty.
    pub fn is_legal(&self, col: usize) -> bool {
        col < self.cols && self.cells[col] == Cell::Empty
    }

    /// Legal columns in increasing order.
    pub fn legal_moves(&self) -> Vec<usize> {
        (0..self.cols).filter(|&col| self.is_legal(col)).collect()
    }

    pub fn empty_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Empty).count()
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..self.cols).all(|col| !self.is_legal(col))
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Result<usize, MoveError> {
        if col >= self.cols {
            return Err(MoveError::InvalidColumn);
        }
        if !self.is_legal(col) {
            return Err(MoveError::ColumnFull);
        }

        let row = (0..self.rows)
            .rev()
            .find(|&row| self.get(row, col) == Cell::Empty)
            .ok_or(MoveError::ColumnFull)?;
        self.cells[row * self.cols + col] = cell;
        Ok(row)
    }

    /// Remove the topmost piece of a column. Undo for `drop_piece`.
    pub fn lift_piece(&mut self, col: usize) -> Option<Cell> {
        if col >= self.cols {
            return None;
        }
        let row = (0..self.rows).find(|&row| self.get(row, col) != Cell::Empty)?;
        let index = row * self.cols + col;
        let cell = self.cells[index];
        self.cells[index] = Cell::Empty;
        Some(cell)
    }

    /// Scan every window on the board and return the owner of the first
    /// complete line found.
    pub fn winner(&self) -> Option<Player> {
        self.find_window(|window| {
            let first = window[0];
            if first != Cell::Empty && window.iter().all(|&c| c == first) {
                first.owner()
            } else {
                None
            }
        })
    }

    /// Visit every `CONNECT`-cell window: horizontal, vertical, then both
    /// diagonals.
    pub fn for_each_window(&self, mut visit: impl FnMut(&[Cell; CONNECT])) {
        self.find_window(|window| -> Option<()> {
            visit(window);
            None
        });
    }

    /// Visit windows in `for_each_window` order until `visit` returns a value.
    pub fn find_window<T>(&self, mut visit: impl FnMut(&[Cell; CONNECT]) -> Option<T>) -> Option<T> {
        let span = CONNECT as isize - 1;
        let rows = self.rows as isize;
        let cols = self.cols as isize;

        for (dr, dc) in DIRECTIONS {
            for row in 0..rows {
                let end_row = row + dr * span;
                if end_row < 0 || end_row >= rows {
                    continue;
                }
                for col in 0..cols {
                    let end_col = col + dc * span;
                    if end_col >= cols {
                        continue;
                    }
                    let mut window = [Cell::Empty; CONNECT];
                    for (i, slot) in window.iter_mut().enumerate() {
                        let r = (row + dr * i as isize) as usize;
                        let c = (col + dc * i as isize) as usize;
                        *slot = self.get(r, c);
                    }
                    if let Some(found) = visit(&window) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

use serde::{Deserialize, Serialize};

use super::analysis::line_runs;
use crate::error::MoveError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;
pub const CONNECT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

/// Board dimensions and the run length that wins a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardShape {
    pub rows: usize,
    pub cols: usize,
    pub connect: usize,
}

impl Default for BoardShape {
    fn default() -> Self {
        BoardShape {
            rows: ROWS,
            cols: COLS,
            connect: CONNECT,
        }
    }
}

/// Read-only view of a board, as consumed by the decision engine.
pub trait BoardOracle {
    fn shape(&self) -> BoardShape;

    /// Colour of the coin at (row, col). Row 0 is the top.
    fn cell_at(&self, row: usize, col: usize) -> Cell;

    /// Row a coin dropped into `col` would land in, or `None` when the column is full.
    fn lowest_open_row(&self, col: usize) -> Option<usize>;

    fn columns_with_room(&self) -> Vec<usize> {
        (0..self.shape().cols)
            .filter(|&col| self.lowest_open_row(col).is_some())
            .collect()
    }

    fn is_empty(&self) -> bool {
        let shape = self.shape();
        match shape.rows.checked_sub(1) {
            Some(bottom) => (0..shape.cols).all(|col| self.lowest_open_row(col) == Some(bottom)),
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    shape: BoardShape,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty 6x7 board
    pub fn new() -> Self {
        Self::with_shape(BoardShape::default())
    }

    pub fn with_shape(shape: BoardShape) -> Self {
        Board {
            shape,
            cells: vec![Cell::Empty; shape.rows * shape.cols],
        }
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, the last row is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.shape.cols + col]
    }

    /// Check if a column is full
    pub fn is_column_full(&self, col: usize) -> bool {
        self.lowest_open_row(col).is_none()
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Result<usize, MoveError> {
        if col >= self.shape.cols {
            return Err(MoveError::InvalidColumn {
                column: col,
                cols: self.shape.cols,
            });
        }

        let row = self
            .lowest_open_row(col)
            .ok_or(MoveError::ColumnFull(col))?;
        self.cells[row * self.shape.cols + col] = cell;
        Ok(row)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..self.shape.cols).all(|col| self.is_column_full(col))
    }

    /// Check if the coin at (row, col) completes a winning run
    pub fn check_win(&self, row: usize, col: usize) -> bool {
        let cell = self.get(row, col);
        if cell == Cell::Empty {
            return false;
        }
        line_runs(self, row, col, cell).contains(&self.shape.connect)
    }

    /// Clear every cell, keeping the dimensions
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }
}

impl BoardOracle for Board {
    fn shape(&self) -> BoardShape {
        self.shape
    }

    fn cell_at(&self, row: usize, col: usize) -> Cell {
        self.get(row, col)
    }

    fn lowest_open_row(&self, col: usize) -> Option<usize> {
        if col >= self.shape.cols {
            return None;
        }
        (0..self.shape.rows)
            .rev()
            .find(|&row| self.get(row, col) == Cell::Empty)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                assert_eq!(board.get(row, col), Cell::Empty);
            }
        }
        assert!(board.is_empty());
        assert_eq!(board.columns_with_room(), vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_drop_piece() {
        let mut board = Board::new();

        let row = board.drop_piece(3, Cell::Red).unwrap();
        assert_eq!(row, 5); // Should land at bottom
        assert_eq!(board.get(5, 3), Cell::Red);

        let row = board.drop_piece(3, Cell::Yellow).unwrap();
        assert_eq!(row, 4); // Should land on top of first piece
        assert_eq!(board.get(4, 3), Cell::Yellow);
        assert_eq!(board.lowest_open_row(3), Some(3));
        assert!(!board.is_empty());
    }

    #[test]
    fn test_column_full_leaves_board_untouched() {
        let mut board = Board::new();
        for _ in 0..ROWS {
            board.drop_piece(0, Cell::Red).unwrap();
        }
        let before = board.clone();

        assert!(board.is_column_full(0));
        assert_eq!(board.lowest_open_row(0), None);
        assert_eq!(board.drop_piece(0, Cell::Yellow), Err(MoveError::ColumnFull(0)));
        assert_eq!(board, before);
        assert!(!board.columns_with_room().contains(&0));
    }

    #[test]
    fn test_invalid_column() {
        let mut board = Board::new();
        assert_eq!(
            board.drop_piece(7, Cell::Red),
            Err(MoveError::InvalidColumn { column: 7, cols: 7 })
        );
    }

    #[test]
    fn test_custom_shape() {
        let mut board = Board::with_shape(BoardShape {
            rows: 4,
            cols: 5,
            connect: 3,
        });
        assert_eq!(board.drop_piece(4, Cell::Red).unwrap(), 3);
        for col in 0..3 {
            board.drop_piece(col, Cell::Yellow).unwrap();
        }
        assert!(board.check_win(3, 1));
    }

    #[test]
    fn test_board_without_rows() {
        let mut board = Board::with_shape(BoardShape {
            rows: 0,
            cols: 7,
            connect: 4,
        });
        assert!(board.is_empty());
        assert!(board.is_full());
        assert!(board.columns_with_room().is_empty());
        assert_eq!(board.drop_piece(2, Cell::Red), Err(MoveError::ColumnFull(2)));
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new();
        for col in 0..COLS {
            for _ in 0..ROWS {
                board.drop_piece(col, Cell::Red).unwrap();
            }
        }
        assert!(board.is_full());
        assert!(board.columns_with_room().is_empty());

        board.clear();
        assert!(board.is_empty());
    }

    #[test]
    fn test_horizontal_win() {
        let mut board = Board::new();
        for col in 0..4 {
            board.drop_piece(col, Cell::Red).unwrap();
        }
        assert!(board.check_win(5, 2));
    }

    #[test]
    fn test_vertical_win() {
        let mut board = Board::new();
        for _ in 0..4 {
            board.drop_piece(3, Cell::Yellow).unwrap();
        }
        assert!(board.check_win(2, 3));
    }

    #[test]
    fn test_diagonal_up_win() {
        let mut board = Board::new();
        // Create diagonal / pattern
        board.drop_piece(0, Cell::Red).unwrap();

        board.drop_piece(1, Cell::Yellow).unwrap();
        board.drop_piece(1, Cell::Red).unwrap();

        board.drop_piece(2, Cell::Yellow).unwrap();
        board.drop_piece(2, Cell::Yellow).unwrap();
        board.drop_piece(2, Cell::Red).unwrap();

        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(3, Cell::Yellow).unwrap();
        let row = board.drop_piece(3, Cell::Red).unwrap();

        assert!(board.check_win(row, 3));
    }

    #[test]
    fn test_diagonal_down_win() {
        let mut board = Board::new();
        // Create diagonal \ pattern
        board.drop_piece(6, Cell::Red).unwrap();

        board.drop_piece(5, Cell::Yellow).unwrap();
        board.drop_piece(5, Cell::Red).unwrap();

        board.drop_piece(4, Cell::Yellow).unwrap();
        board.drop_piece(4, Cell::Yellow).unwrap();
        board.drop_piece(4, Cell::Red).unwrap();

        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(3, Cell::Yellow).unwrap();
        let row = board.drop_piece(3, Cell::Red).unwrap();

        assert!(board.check_win(row, 3));
    }

    #[test]
    fn test_five_in_a_row_still_wins() {
        let mut board = Board::new();
        for col in [0, 1, 3, 4] {
            board.drop_piece(col, Cell::Red).unwrap();
        }
        let row = board.drop_piece(2, Cell::Red).unwrap();
        assert!(board.check_win(row, 2));
    }

    #[test]
    fn test_no_win_with_three() {
        let mut board = Board::new();
        for col in 0..3 {
            board.drop_piece(col, Cell::Red).unwrap();
        }
        assert!(!board.check_win(5, 1));
    }
}

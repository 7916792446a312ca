//! The six tactical categories and the catalog that finds them on a board.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::{line_runs, BoardOracle, Cell};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "complete-4")]
    Complete4,
    #[serde(rename = "complete-3")]
    Complete3,
    #[serde(rename = "complete-2")]
    Complete2,
    #[serde(rename = "block-4")]
    Block4,
    #[serde(rename = "block-3")]
    Block3,
    #[serde(rename = "block-2")]
    Block2,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::Complete4,
        Strategy::Complete3,
        Strategy::Complete2,
        Strategy::Block4,
        Strategy::Block3,
        Strategy::Block2,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Strategy::Complete4 => "complete-4",
            Strategy::Complete3 => "complete-3",
            Strategy::Complete2 => "complete-2",
            Strategy::Block4 => "block-4",
            Strategy::Block3 => "block-3",
            Strategy::Block2 => "block-2",
        }
    }

    /// Strategy for a run of `length` created by the mover, or by the
    /// opponent when `block` is set. Runs below two carry no strategy.
    pub fn from_run(length: usize, block: bool) -> Option<Strategy> {
        let strategy = match (length, block) {
            (0 | 1, _) => return None,
            (2, false) => Strategy::Complete2,
            (3, false) => Strategy::Complete3,
            (_, false) => Strategy::Complete4,
            (2, true) => Strategy::Block2,
            (3, true) => Strategy::Block3,
            (_, true) => Strategy::Block4,
        };
        Some(strategy)
    }

    /// Completing or blocking an immediate win.
    pub fn is_critical(self) -> bool {
        matches!(self, Strategy::Complete4 | Strategy::Block4)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.tag() == s)
            .ok_or_else(|| format!("unknown strategy '{}'", s))
    }
}

/// A strategy that a coin in `column` would carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrategyOption {
    pub strategy: Strategy,
    pub column: usize,
}

/// Every (strategy, column) pair open to `mover` this turn.
///
/// For each column with room, the landing cell is scanned once for the
/// mover's colour and once for the opponent's. A column can offer several
/// strategies at once; choosing among them is left to the caller.
pub fn available_strategies<B: BoardOracle + ?Sized>(
    board: &B,
    mover: Cell,
    opponent: Cell,
) -> Vec<StrategyOption> {
    let mut options = Vec::new();

    for column in board.columns_with_room() {
        let Some(row) = board.lowest_open_row(column) else {
            continue;
        };
        for (color, block) in [(mover, false), (opponent, true)] {
            // Longest runs first, matching the order of Strategy::ALL
            for length in line_runs(board, row, column, color).into_iter().rev() {
                if let Some(strategy) = Strategy::from_run(length, block) {
                    options.push(StrategyOption { strategy, column });
                }
            }
        }
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Board;

    fn strategies_at(options: &[StrategyOption], column: usize) -> Vec<Strategy> {
        options
            .iter()
            .filter(|o| o.column == column)
            .map(|o| o.strategy)
            .collect()
    }

    #[test]
    fn test_tags_roundtrip() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.tag().parse::<Strategy>().unwrap(), strategy);
            assert_eq!(strategy.to_string(), strategy.tag());
        }
        assert!("complete-5".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_from_run() {
        assert_eq!(Strategy::from_run(1, false), None);
        assert_eq!(Strategy::from_run(2, false), Some(Strategy::Complete2));
        assert_eq!(Strategy::from_run(3, true), Some(Strategy::Block3));
        assert_eq!(Strategy::from_run(4, true), Some(Strategy::Block4));
        assert!(Strategy::Block4.is_critical());
        assert!(!Strategy::Complete3.is_critical());
    }

    #[test]
    fn test_empty_board_offers_nothing() {
        let board = Board::new();
        assert!(available_strategies(&board, Cell::Yellow, Cell::Red).is_empty());
    }

    #[test]
    fn test_vertical_runs_for_both_sides() {
        let mut board = Board::new();
        // Mover (Yellow) stacks two in column 3, opponent (Red) two in column 4
        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(4, Cell::Red).unwrap();
        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(4, Cell::Red).unwrap();

        let options = available_strategies(&board, Cell::Yellow, Cell::Red);
        let col3 = strategies_at(&options, 3);
        let col4 = strategies_at(&options, 4);

        assert!(col3.contains(&Strategy::Complete3));
        assert!(col4.contains(&Strategy::Block3));
        assert!(!col3.contains(&Strategy::Block3));
    }

    #[test]
    fn test_three_stacked_offers_the_win() {
        let mut board = Board::new();
        for _ in 0..3 {
            board.drop_piece(3, Cell::Yellow).unwrap();
            board.drop_piece(0, Cell::Red).unwrap();
        }

        let options = available_strategies(&board, Cell::Yellow, Cell::Red);
        assert!(strategies_at(&options, 3).contains(&Strategy::Complete4));
        // Red's stack in column 0 must be blocked there
        assert!(strategies_at(&options, 0).contains(&Strategy::Block4));
    }

    #[test]
    fn test_one_column_several_strategies() {
        let mut board = Board::new();
        board.drop_piece(1, Cell::Yellow).unwrap();
        board.drop_piece(2, Cell::Yellow).unwrap();
        board.drop_piece(4, Cell::Red).unwrap();

        let options = available_strategies(&board, Cell::Yellow, Cell::Red);
        let col3 = strategies_at(&options, 3);
        assert_eq!(col3, vec![Strategy::Complete3, Strategy::Block2]);
    }

    #[test]
    fn test_full_columns_are_skipped() {
        let mut board = Board::new();
        for i in 0..6 {
            let cell = if i % 2 == 0 { Cell::Red } else { Cell::Yellow };
            board.drop_piece(2, cell).unwrap();
        }
        let options = available_strategies(&board, Cell::Yellow, Cell::Red);
        assert!(options.iter().all(|o| o.column != 2));
        assert!(!options.is_empty());
    }
}

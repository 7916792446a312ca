//! Run-length analysis around a single cell.
//!
//! Every line through a cell is scanned the same way: walk outward in one
//! direction, then in the opposite one, counting coins of the queried colour.
//! The origin counts once whatever it currently holds, so querying an empty
//! landing cell answers "what runs would a coin here create?".

use std::collections::BTreeSet;

use super::board::{BoardOracle, Cell};

/// Horizontal, vertical, ascending diagonal (/), descending diagonal (\).
/// Rows grow downwards, so "ascending" steps to row - 1 as the column grows.
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (-1, 1), (1, 1)];

/// Distinct run lengths through (row, col) for `color`, one candidate per axis.
///
/// Lengths saturate at the board's connect length.
pub fn line_runs<B: BoardOracle + ?Sized>(
    board: &B,
    row: usize,
    col: usize,
    color: Cell,
) -> BTreeSet<usize> {
    AXES.iter()
        .map(|&(dr, dc)| run_length(board, row, col, color, dr, dc))
        .collect()
}

fn run_length<B: BoardOracle + ?Sized>(
    board: &B,
    row: usize,
    col: usize,
    color: Cell,
    dr: isize,
    dc: isize,
) -> usize {
    let limit = board.shape().connect.max(1);
    let forward = walk(board, row, col, color, (dr, dc), limit - 1);
    let backward = walk(board, row, col, color, (-dr, -dc), limit - 1 - forward);
    1 + forward + backward
}

/// Count matching cells stepping from (row, col) along `step`, stopping at the
/// first mismatch, the board edge, or after `max` cells.
fn walk<B: BoardOracle + ?Sized>(
    board: &B,
    row: usize,
    col: usize,
    color: Cell,
    step: (isize, isize),
    max: usize,
) -> usize {
    let shape = board.shape();
    let (mut r, mut c) = (row as isize, col as isize);
    let mut count = 0;

    while count < max {
        r += step.0;
        c += step.1;
        if r < 0 || c < 0 || r >= shape.rows as isize || c >= shape.cols as isize {
            break;
        }
        if board.cell_at(r as usize, c as usize) != color {
            break;
        }
        count += 1;
    }

    count
}

//! Fixed-priority computer opponent.
//!
//! Priority: take a winning cell, else block the opponent's winning cell,
//! else take the center, else a uniformly random empty cell. This is a
//! greedy one-move lookahead and deliberately does not build forks.

use rand::seq::SliceRandom;
use rand::Rng;

use super::board::{check_win, Board, Mark, CENTER};

/// Cell the computer playing `me` picks, or `None` on a full board.
pub fn choose_move<R: Rng + ?Sized>(board: &Board, me: Mark, rng: &mut R) -> Option<usize> {
    completing_cell(board, me)
        .or_else(|| completing_cell(board, me.other()))
        .or_else(|| board.is_empty_at(CENTER).then_some(CENTER))
        .or_else(|| board.empty_cells().choose(rng).copied())
}

/// Lowest empty cell that completes a line for `mark`.
pub fn completing_cell(board: &Board, mark: Mark) -> Option<usize> {
    board.empty_cells().into_iter().find(|&cell| {
        let mut probe = *board;
        probe.place(cell, mark);
        matches!(check_win(&probe), Some((winner, _)) if winner == mark)
    })
}

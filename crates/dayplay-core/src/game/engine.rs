//! Game engine state machine.
//!
//! ## State Transitions
//!
//! ```text
//! InProgress -> InProgress   (mark placed, no line, board not full; turn flips)
//! InProgress -> Won          (mark completes a line)
//! InProgress -> Draw         (board full, no line)
//! Won | Draw -> InProgress   (reset only)
//! ```
//!
//! Illegal input (taken cell, out-of-range cell, finished game) is ignored.

use serde::{Deserialize, Serialize};

use super::board::{check_win, Board, Line, Mark};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum GameStatus {
    InProgress,
    Won { winner: Mark, line: Line },
    Draw,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// A mark that was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub cell: usize,
    pub mark: Mark,
    pub status: GameStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEngine {
    board: Board,
    current: Mark,
    status: GameStatus,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEngine {
    /// Empty board, X to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current: Mark::X,
            status: GameStatus::InProgress,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mark to move next. After a finished game this is the mark that
    /// made the last move.
    pub fn current(&self) -> Mark {
        self.current
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == GameStatus::InProgress
    }

    pub fn winning_line(&self) -> Option<Line> {
        match self.status {
            GameStatus::Won { line, .. } => Some(line),
            _ => None,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Place the current mark on `cell`. Returns `None` when the move is
    /// not accepted.
    pub fn place(&mut self, cell: usize) -> Option<MoveResult> {
        if !self.is_active() {
            return None;
        }
        let mark = self.current;
        if !self.board.place(cell, mark) {
            return None;
        }

        self.status = match check_win(&self.board) {
            Some((winner, line)) => GameStatus::Won { winner, line },
            None if self.board.is_full() => GameStatus::Draw,
            None => {
                self.current = mark.other();
                GameStatus::InProgress
            }
        };

        Some(MoveResult {
            cell,
            mark,
            status: self.status,
        })
    }

    /// Clear the board; X moves first.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(engine: &mut GameEngine, cells: &[usize]) -> Option<MoveResult> {
        let mut last = None;
        for &c in cells {
            last = engine.place(c);
        }
        last
    }

    #[test]
    fn turns_alternate_from_x() {
        let mut engine = GameEngine::new();
        assert_eq!(engine.current(), Mark::X);
        engine.place(0).unwrap();
        assert_eq!(engine.current(), Mark::O);
        engine.place(4).unwrap();
        assert_eq!(engine.current(), Mark::X);
    }

    #[test]
    fn taken_cell_is_ignored() {
        let mut engine = GameEngine::new();
        engine.place(0).unwrap();
        assert!(engine.place(0).is_none());
        assert_eq!(engine.current(), Mark::O);
        assert!(engine.place(42).is_none());
    }

    #[test]
    fn win_freezes_board() {
        let mut engine = GameEngine::new();
        let last = play(&mut engine, &[0, 3, 1, 4, 2]).unwrap();
        assert_eq!(
            last.status,
            GameStatus::Won {
                winner: Mark::X,
                line: [0, 1, 2]
            }
        );
        assert!(!engine.is_active());
        assert_eq!(engine.winning_line(), Some([0, 1, 2]));
        let before = engine.clone();
        assert!(engine.place(8).is_none());
        assert_eq!(engine, before);
    }

    #[test]
    fn full_board_is_draw() {
        let mut engine = GameEngine::new();
        // X O X / X O O / O X X
        let last = play(&mut engine, &[0, 1, 2, 4, 3, 5, 7, 6, 8]).unwrap();
        assert_eq!(last.status, GameStatus::Draw);
        assert!(engine.status().is_terminal());
    }

    #[test]
    fn win_on_last_cell_is_win_not_draw() {
        let mut engine = GameEngine::new();
        // X O X / O X O / O X X  -> X completes the diagonal on cell 8
        let last = play(&mut engine, &[0, 1, 2, 3, 4, 5, 7, 6, 8]).unwrap();
        assert!(matches!(last.status, GameStatus::Won { winner: Mark::X, .. }));
    }

    #[test]
    fn reset_restores_fresh_game() {
        let mut engine = GameEngine::new();
        play(&mut engine, &[0, 3, 1, 4, 2]);
        engine.reset();
        assert_eq!(engine, GameEngine::new());
        assert!(engine.is_active());
    }
}

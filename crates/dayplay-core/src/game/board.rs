//! 3x3 board and line detection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A player's mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three cell indices that win when they share a mark.
pub type Line = [usize; 3];

/// Rows, then columns, then diagonals. Scan order is part of the contract.
pub const LINES: [Line; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

pub const CENTER: usize = 4;
pub const CELLS: usize = 9;

/// Nine cells, serialized as `""`, `"X"` or `"O"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Board([Option<Mark>; CELLS]);

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from cell strings; anything other than "X"/"O" is empty.
    pub fn from_cells(cells: [&str; CELLS]) -> Self {
        let mut board = Self::new();
        for (slot, cell) in board.0.iter_mut().zip(cells) {
            *slot = parse_cell(cell);
        }
        board
    }

    pub fn get(&self, index: usize) -> Option<Mark> {
        self.0.get(index).copied().flatten()
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        index < CELLS && self.0[index].is_none()
    }

    /// Put `mark` on an empty cell. Returns false when the cell is taken
    /// or out of range.
    pub fn place(&mut self, index: usize, mark: Mark) -> bool {
        if !self.is_empty_at(index) {
            return false;
        }
        self.0[index] = Some(mark);
        true
    }

    /// Empty cell indices, ascending.
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..CELLS).filter(|&i| self.0[i].is_none()).collect()
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.0.iter().filter(|c| **c == Some(mark)).count()
    }
}

fn parse_cell(cell: &str) -> Option<Mark> {
    match cell {
        "X" => Some(Mark::X),
        "O" => Some(Mark::O),
        _ => None,
    }
}

impl From<Board> for Vec<String> {
    fn from(board: Board) -> Self {
        board
            .0
            .iter()
            .map(|c| c.map(Mark::as_str).unwrap_or("").to_string())
            .collect()
    }
}

impl TryFrom<Vec<String>> for Board {
    type Error = String;

    fn try_from(cells: Vec<String>) -> Result<Self, Self::Error> {
        if cells.len() != CELLS {
            return Err(format!("expected {CELLS} cells, got {}", cells.len()));
        }
        let mut board = Board::new();
        for (slot, cell) in board.0.iter_mut().zip(&cells) {
            *slot = match cell.as_str() {
                "" => None,
                other => Some(parse_cell(other).ok_or_else(|| format!("invalid cell '{other}'"))?),
            };
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            let cells: Vec<String> = (0..3)
                .map(|col| {
                    let i = row * 3 + col;
                    match self.0[i] {
                        Some(mark) => mark.to_string(),
                        None => i.to_string(),
                    }
                })
                .collect();
            writeln!(f, " {} ", cells.join(" | "))?;
            if row < 2 {
                writeln!(f, "---+---+---")?;
            }
        }
        Ok(())
    }
}

/// First line in [`LINES`] order holding three equal marks.
pub fn check_win(board: &Board) -> Option<(Mark, Line)> {
    LINES.iter().find_map(|&line| {
        let [a, b, c] = line;
        match board.get(a) {
            Some(mark) if board.get(b) == Some(mark) && board.get(c) == Some(mark) => {
                Some((mark, line))
            }
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_row_wins() {
        let board = Board::from_cells(["X", "X", "X", "", "", "", "", "", ""]);
        assert_eq!(check_win(&board), Some((Mark::X, [0, 1, 2])));
    }

    #[test]
    fn full_board_without_line_is_not_a_win() {
        let board = Board::from_cells(["X", "O", "X", "O", "X", "O", "O", "X", "O"]);
        assert!(board.is_full());
        assert_eq!(check_win(&board), None);
    }

    #[test]
    fn every_line_is_detected() {
        for line in LINES {
            let mut board = Board::new();
            for i in line {
                board.place(i, Mark::O);
            }
            assert_eq!(check_win(&board), Some((Mark::O, line)));
        }
    }

    #[test]
    fn multi_line_board_reports_first_in_scan_order() {
        let board = Board::from_cells(["X", "X", "X", "X", "", "", "X", "", ""]);
        assert_eq!(check_win(&board), Some((Mark::X, [0, 1, 2])));
    }

    #[test]
    fn place_rejects_taken_and_out_of_range() {
        let mut board = Board::new();
        assert!(board.place(4, Mark::X));
        assert!(!board.place(4, Mark::O));
        assert!(!board.place(9, Mark::O));
        assert_eq!(board.get(4), Some(Mark::X));
        assert_eq!(board.empty_cells(), vec![0, 1, 2, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn serializes_as_strings() {
        let board = Board::from_cells(["X", "", "O", "", "", "", "", "", ""]);
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, r#"["X","","O","","","","","",""]"#);
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
        assert!(serde_json::from_str::<Board>(r#"["X"]"#).is_err());
        assert!(serde_json::from_str::<Board>(r#"["Z","","","","","","","",""]"#).is_err());
    }
}

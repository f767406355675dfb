//! Property tests for the game engine and opponent.

use dayplay_core::game::{check_win, choose_move, Board, GameEngine, GameStatus, Mark};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;

fn cell_order() -> impl Strategy<Value = Vec<usize>> {
    Just((0..9).collect::<Vec<usize>>()).prop_shuffle()
}

proptest! {
    #[test]
    fn status_is_exclusive_and_terminal_states_freeze(order in cell_order()) {
        let mut engine = GameEngine::new();
        for cell in order {
            let before = engine.clone();
            let accepted = engine.place(cell);

            if before.status().is_terminal() {
                prop_assert!(accepted.is_none());
                prop_assert_eq!(&engine, &before);
                continue;
            }

            let result = accepted.expect("legal move on an open board");
            let win = check_win(engine.board());
            match engine.status() {
                GameStatus::InProgress => {
                    prop_assert!(win.is_none());
                    prop_assert!(!engine.board().is_full());
                    prop_assert_eq!(engine.current(), result.mark.other());
                }
                GameStatus::Won { winner, line } => {
                    prop_assert_eq!(win, Some((winner, line)));
                    prop_assert_eq!(winner, result.mark);
                    prop_assert!(line.contains(&cell));
                }
                GameStatus::Draw => {
                    prop_assert!(win.is_none());
                    prop_assert!(engine.board().is_full());
                }
            }
        }
        prop_assert!(engine.status().is_terminal());
    }

    #[test]
    fn arbitrary_input_never_breaks_invariants(cells in prop::collection::vec(0usize..12, 0..40)) {
        let mut engine = GameEngine::new();
        for cell in cells {
            engine.place(cell);
            let x = engine.board().count(Mark::X);
            let o = engine.board().count(Mark::O);
            prop_assert!(x == o || x == o + 1);
        }
    }

    #[test]
    fn opponent_always_picks_an_empty_cell(order in cell_order(), moves in 0usize..9, seed in any::<u64>()) {
        let mut engine = GameEngine::new();
        for &cell in order.iter().take(moves) {
            engine.place(cell);
        }
        let board = *engine.board();
        let mut rng = Mcg128Xsl64::seed_from_u64(seed);
        match choose_move(&board, Mark::O, &mut rng) {
            Some(cell) => prop_assert!(board.is_empty_at(cell)),
            None => prop_assert!(board.is_full()),
        }
    }
}

#[test]
fn opponent_never_misses_an_immediate_win() {
    let boards = [
        ["O", "O", "", "X", "X", "", "", "", ""],
        ["O", "X", "X", "", "O", "X", "", "", ""],
        ["X", "X", "O", "", "O", "", "", "", "X"],
    ];
    for cells in boards {
        let board = Board::from_cells(cells);
        let mut rng = Mcg128Xsl64::seed_from_u64(0);
        let cell = choose_move(&board, Mark::O, &mut rng).unwrap();
        let mut after = board;
        after.place(cell, Mark::O);
        assert!(
            matches!(check_win(&after), Some((Mark::O, _))),
            "missed win on {cells:?}"
        );
    }
}

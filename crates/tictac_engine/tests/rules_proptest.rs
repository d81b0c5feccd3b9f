//! Property tests for move validation and outcome detection.

use proptest::prelude::*;
use proptest::strategy::ValueTree;
use proptest::test_runner::TestRunner;
use tictac_engine::{
    Board, Cell, GameId, Line, Move, MoveError, MoveRequest, Outcome, PlayerId, Position,
    RejectionKind, Symbol, detect_outcome, detect_outcome_concurrent, find_winning_line, is_full,
    validate_move,
};

fn symbol() -> impl Strategy<Value = Symbol> {
    prop_oneof![Just(Symbol::X), Just(Symbol::O)]
}

fn cell() -> impl Strategy<Value = Cell> {
    prop_oneof![
        Just(Cell::Empty),
        Just(Cell::Occupied(Symbol::X)),
        Just(Cell::Occupied(Symbol::O)),
    ]
}

/// Random square grid of side 1..=6.
fn grid() -> impl Strategy<Value = Vec<Vec<Cell>>> {
    (1usize..=6).prop_flat_map(|size| prop::collection::vec(prop::collection::vec(cell(), size), size))
}

fn board(rows: Vec<Vec<Cell>>) -> Board {
    Board::try_from(rows).expect("square grid")
}

fn cells_of(line: Line, size: usize) -> Vec<(usize, usize)> {
    (0..size)
        .map(|i| match line {
            Line::Row(r) => (r, i),
            Line::Column(c) => (i, c),
            Line::MainDiagonal => (i, i),
            Line::AntiDiagonal => (i, size - 1 - i),
        })
        .collect()
}

/// A previous move by player 1 at `(0, 0)`.
fn previous(symbol: Symbol) -> Move {
    Move::new(
        GameId::from(1),
        MoveRequest::new(PlayerId::from(1), symbol, Position::new(0, 0)),
    )
}

/// Board of the given size with `(0, 0)` holding `symbol`.
fn board_after_first(size: usize, symbol: Symbol) -> Board {
    let mut rows = vec![vec![Cell::Empty; size]; size];
    rows[0][0] = Cell::Occupied(symbol);
    board(rows)
}

fn line_in(size: usize) -> impl Strategy<Value = Line> {
    prop_oneof![
        (0..size).prop_map(Line::Row),
        (0..size).prop_map(Line::Column),
        Just(Line::MainDiagonal),
        Just(Line::AntiDiagonal),
    ]
}

proptest! {
    #[test]
    fn filled_line_always_wins(
        (rows, line) in grid().prop_flat_map(|rows| {
            let size = rows.len();
            (Just(rows), line_in(size))
        }),
        mark in symbol(),
    ) {
        let mut rows = rows;
        let size = rows.len();
        for (r, c) in cells_of(line, size) {
            rows[r][c] = Cell::Occupied(mark);
        }
        let board = board(rows);

        prop_assert!(find_winning_line(&board).is_some());
        prop_assert!(matches!(detect_outcome(&board), Outcome::Win(_)));
    }

    #[test]
    fn reported_line_is_uniform(rows in grid()) {
        let board = board(rows);
        if let Some(line) = find_winning_line(&board) {
            let cells: Vec<Cell> = cells_of(line, board.size())
                .into_iter()
                .map(|(r, c)| board.get(Position::new(r, c)).expect("on board"))
                .collect();
            prop_assert!(!cells[0].is_empty());
            prop_assert!(cells.iter().all(|cell| *cell == cells[0]));
        }
    }

    #[test]
    fn no_line_means_tie_exactly_when_full(rows in grid()) {
        let board = board(rows);
        prop_assume!(find_winning_line(&board).is_none());
        let expected = if is_full(&board) { Outcome::Tie } else { Outcome::Ongoing };
        prop_assert_eq!(detect_outcome(&board), expected);
    }

    #[test]
    fn positions_off_board_always_invalid(
        size in 1usize..=8,
        row in 0usize..16,
        column in 0usize..16,
        mark in symbol(),
    ) {
        prop_assume!(row >= size || column >= size);
        let candidate = MoveRequest::new(PlayerId::from(1), mark, Position::new(row, column));
        let err = validate_move(&Board::new(size), &candidate, None);
        prop_assert!(err.is_err());
        prop_assert!(!err.expect_err("rejected").is_turn_violation());
    }

    #[test]
    fn occupied_cell_always_invalid(
        size in 1usize..=8,
        first in symbol(),
        mark in symbol(),
        player in 1u64..=3,
    ) {
        let board = board_after_first(size, first);
        let candidate = MoveRequest::new(PlayerId::from(player), mark, Position::new(0, 0));
        let err = validate_move(&board, &candidate, Some(&previous(first)))
            .expect_err("occupied cell");
        prop_assert_eq!(err, MoveError::CellOccupied { position: Position::new(0, 0) });
    }

    #[test]
    fn same_player_twice_is_turn_violation(
        size in 2usize..=8,
        first in symbol(),
        mark in symbol(),
        offset in 1usize..64,
    ) {
        let cells = size * size;
        let index = 1 + offset % (cells - 1);
        let position = Position::new(index / size, index % size);
        let board = board_after_first(size, first);
        let candidate = MoveRequest::new(PlayerId::from(1), mark, position);

        let err = validate_move(&board, &candidate, Some(&previous(first)))
            .expect_err("same player");
        prop_assert_eq!(err.kind(), RejectionKind::TurnViolation);
        prop_assert_eq!(err, MoveError::AlreadyPlayed { player: PlayerId::from(1) });
    }

    #[test]
    fn same_symbol_twice_is_turn_violation(
        size in 2usize..=8,
        first in symbol(),
        player in 2u64..=50,
        offset in 1usize..64,
    ) {
        let cells = size * size;
        let index = 1 + offset % (cells - 1);
        let position = Position::new(index / size, index % size);
        let board = board_after_first(size, first);
        let candidate = MoveRequest::new(PlayerId::from(player), first, position);

        let err = validate_move(&board, &candidate, Some(&previous(first)))
            .expect_err("same symbol");
        prop_assert_eq!(err, MoveError::SymbolReused { symbol: first });
    }

    #[test]
    fn alternating_player_and_symbol_accepted(
        size in 2usize..=8,
        first in symbol(),
        player in 2u64..=50,
        offset in 1usize..64,
    ) {
        let cells = size * size;
        let index = 1 + offset % (cells - 1);
        let position = Position::new(index / size, index % size);
        let board = board_after_first(size, first);
        let candidate = MoveRequest::new(PlayerId::from(player), first.opponent(), position);

        prop_assert!(validate_move(&board, &candidate, Some(&previous(first))).is_ok());
    }

    #[test]
    fn empty_board_accepts_any_first_move(
        size in 1usize..=8,
        offset in 0usize..64,
        mark in symbol(),
    ) {
        let position = Position::new(offset % size, (offset / size) % size);
        let candidate = MoveRequest::new(PlayerId::from(1), mark, position);
        prop_assert!(validate_move(&Board::new(size), &candidate, None).is_ok());
    }
}

#[tokio::test]
async fn test_concurrent_detection_matches_sequential() {
    let mut runner = TestRunner::default();
    for _ in 0..64 {
        let rows = grid()
            .new_tree(&mut runner)
            .expect("generate grid")
            .current();
        let board = board(rows);
        assert_eq!(detect_outcome_concurrent(&board).await, detect_outcome(&board));
    }
}

//! Core board types for N×N tic-tac-toe.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One of the two marks a player can place.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Symbol {
    /// The `X` mark.
    X,
    /// The `O` mark.
    O,
}

impl Symbol {
    /// Returns the other symbol.
    pub fn opponent(self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }
}

/// A cell on the board.
///
/// Serialized with an empty-string sentinel: `""`, `"X"` or `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Cell {
    /// Nothing placed yet.
    #[default]
    Empty,
    /// Cell holds a symbol.
    Occupied(Symbol),
}

impl Cell {
    /// Returns the symbol in this cell, if any.
    pub fn symbol(self) -> Option<Symbol> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(symbol) => Some(symbol),
        }
    }

    /// Returns true if nothing has been placed here.
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl From<Cell> for String {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => String::new(),
            Cell::Occupied(symbol) => symbol.to_string(),
        }
    }
}

/// A cell value that is neither empty nor a known symbol.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Invalid cell value: '{}'", value)]
pub struct InvalidCell {
    /// The rejected value.
    pub value: String,
}

impl TryFrom<String> for Cell {
    type Error = InvalidCell;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Ok(Cell::Empty);
        }
        value
            .parse::<Symbol>()
            .map(Cell::Occupied)
            .map_err(|_| InvalidCell { value })
    }
}

/// A `(row, column)` coordinate on the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_new::new,
)]
pub struct Position {
    /// Zero-based row index.
    pub row: usize,
    /// Zero-based column index.
    pub column: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Square N×N board.
///
/// The side length is fixed when the board is created. Serializes as an
/// array of rows, each an array of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<Cell>>", try_from = "Vec<Vec<Cell>>")]
pub struct Board {
    rows: Vec<Vec<Cell>>,
}

impl Board {
    /// Creates an empty board with the given side length.
    #[instrument]
    pub fn new(size: usize) -> Self {
        Self {
            rows: vec![vec![Cell::Empty; size]; size],
        }
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the position lies on the board.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size() && pos.column < self.size()
    }

    /// Gets the cell at `pos`, or `None` when off the board.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.rows.get(pos.row).and_then(|row| row.get(pos.column)).copied()
    }

    /// Gets the cell at `(row, column)`.
    ///
    /// # Panics
    ///
    /// Panics when the coordinate is off the board. Line scans only call
    /// this with in-range indices.
    pub(crate) fn at(&self, row: usize, column: usize) -> Cell {
        self.rows[row][column]
    }

    /// Checks if the cell at `pos` is on the board and empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        matches!(self.get(pos), Some(Cell::Empty))
    }

    /// Places a symbol, returning `false` when `pos` is off the board.
    pub(crate) fn place(&mut self, pos: Position, symbol: Symbol) -> bool {
        match self
            .rows
            .get_mut(pos.row)
            .and_then(|row| row.get_mut(pos.column))
        {
            Some(cell) => {
                *cell = Cell::Occupied(symbol);
                true
            }
            None => false,
        }
    }

    /// Rows in order, each as a slice of cells.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Every empty position in row-major order.
    pub fn empty_positions(&self) -> Vec<Position> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .filter(|(_, cell)| cell.is_empty())
                    .map(move |(column, _)| Position::new(row, column))
            })
            .collect()
    }

    /// Formats the board as a human-readable grid.
    pub fn display(&self) -> String {
        let size = self.size();
        let separator = vec!["-"; size].join("+");
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Cell::Empty => ".".to_string(),
                        Cell::Occupied(symbol) => symbol.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect::<Vec<_>>()
            .join(&format!("\n{}\n", separator))
    }
}

impl From<Board> for Vec<Vec<Cell>> {
    fn from(board: Board) -> Self {
        board.rows
    }
}

/// Rows that do not form a square grid.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Board is not square: {} rows, row {} has {} cells", rows, row, len)]
pub struct NotSquare {
    /// Number of rows supplied.
    pub rows: usize,
    /// Index of the first offending row.
    pub row: usize,
    /// Length of that row.
    pub len: usize,
}

impl TryFrom<Vec<Vec<Cell>>> for Board {
    type Error = NotSquare;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        let size = rows.len();
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(NotSquare {
                rows: size,
                row,
                len: cells.len(),
            });
        }
        Ok(Self { rows })
    }
}

//! Game rules for N×N tic-tac-toe.
//!
//! Pure functions over a board snapshot: move legality, line scans and
//! the tie check. Nothing here touches storage.

pub mod draw;
pub mod outcome;
pub mod validate;
pub mod win;

pub use draw::is_full;
pub use outcome::{Outcome, detect_outcome, detect_outcome_concurrent};
pub use validate::{MoveError, RejectionKind, validate_move};
pub use win::{Line, find_winning_line, scan_anti_diagonal, scan_columns, scan_main_diagonal, scan_rows};

//! Display hint for whose move it is.
//!
//! The service enforces turn order; this is only what the board screen shows.

use tracing::instrument;

use crate::types::{Board, PlayerRef};

/// Counts the non-empty cells of a board.
#[instrument(skip(board))]
pub fn occupied_cells(board: &Board) -> usize {
    board.cells().filter(|cell| cell.is_some()).count()
}

/// Returns the player expected to move next.
///
/// An even number of occupied cells (zero included) means the first player
/// moves, an odd number means the second. Returns whichever seat that is,
/// which may be empty.
#[instrument(skip_all)]
pub fn next_player<'a>(
    board: &Board,
    first_player: Option<&'a PlayerRef>,
    second_player: Option<&'a PlayerRef>,
) -> Option<&'a PlayerRef> {
    if occupied_cells(board) % 2 == 0 {
        first_player
    } else {
        second_player
    }
}

//! Cursor movement for keyboard navigation of the board.

use crossterm::event::KeyCode;

/// A board cell addressed by row and column, both in `0..3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    /// Row, top to bottom.
    pub row: usize,
    /// Column, left to right.
    pub col: usize,
}

impl Cell {
    /// Maps keypad digits `1`..=`9` to cells in row-major order.
    pub fn from_digit(c: char) -> Option<Self> {
        let n = c.to_digit(10)?.checked_sub(1)? as usize;
        (n < 9).then_some(Self {
            row: n / 3,
            col: n % 3,
        })
    }

    /// The digit that selects this cell.
    pub fn digit(self) -> usize {
        self.row * 3 + self.col + 1
    }
}

/// Moves cursor based on arrow keys; stops at the edges.
pub fn move_cursor(cursor: Cell, key: KeyCode) -> Cell {
    match key {
        KeyCode::Up => Cell {
            row: cursor.row.saturating_sub(1),
            ..cursor
        },
        KeyCode::Down => Cell {
            row: (cursor.row + 1).min(2),
            ..cursor
        },
        KeyCode::Left => Cell {
            col: cursor.col.saturating_sub(1),
            ..cursor
        },
        KeyCode::Right => Cell {
            col: (cursor.col + 1).min(2),
            ..cursor
        },
        _ => cursor,
    }
}

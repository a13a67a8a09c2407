use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeSeq as _};

use super::{BOARD_HEIGHT, BOARD_WIDTH, catalog::PieceKind, piece::ActivePiece, shape::ShapeMatrix};

const EMPTY_CELL: u8 = 0;

type Row = [u8; BOARD_WIDTH];

const EMPTY_ROW: Row = [EMPTY_CELL; BOARD_WIDTH];

fn is_row_full(row: &Row) -> bool {
    row.iter().all(|&cell| cell != EMPTY_CELL)
}

fn column_index(x: i32) -> Option<usize> {
    usize::try_from(x).ok().filter(|&x| x < BOARD_WIDTH)
}

/// Fixed 10×20 grid of locked cells.
///
/// Each cell holds `0` when empty or [`PieceKind::cell_value`] of the piece
/// that locked there. The board is never resized; it changes only when a
/// piece is merged into it or full rows are cleared.
///
/// # Coordinate System
///
/// - `(0, 0)` is the top-left cell
/// - X increases rightward (columns `0..10`)
/// - Y increases downward (rows `0..20`)
/// - Rows above the board (negative `y`) have no contents; only the side walls
///   constrain a piece there
///
/// # Example
///
/// ```
/// use stackfall_engine::{ActivePiece, Board, PieceKind};
///
/// let mut board = Board::EMPTY;
/// let piece = ActivePiece::spawn(PieceKind::O).drop_position(&board);
/// board.merge(&piece);
///
/// assert_eq!(board.occupied_count(), 4);
/// assert_eq!(board.cell_kind(4, 19), Some(PieceKind::O));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: [Row; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; BOARD_HEIGHT],
    };

    /// Returns the raw value at column `x`, row `y`, or `None` when out of
    /// bounds.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<u8> {
        self.rows.get(y)?.get(x).copied()
    }

    /// Returns the piece kind locked at column `x`, row `y`.
    ///
    /// `None` for empty cells and for coordinates outside the board.
    #[must_use]
    pub fn cell_kind(&self, x: usize, y: usize) -> Option<PieceKind> {
        PieceKind::from_cell_value(self.cell(x, y)?)
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8; BOARD_WIDTH]> {
        self.rows.iter()
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|&&cell| cell != EMPTY_CELL)
            .count()
    }

    /// Locks a single cell with `kind`.
    ///
    /// Returns `false` (leaving the board untouched) if the coordinates are
    /// outside the board.
    #[must_use]
    pub fn fill_cell(&mut self, x: usize, y: usize, kind: PieceKind) -> bool {
        let Some(cell) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) else {
            return false;
        };
        *cell = kind.cell_value();
        true
    }

    /// Tests whether `shape` placed with its top-left cell at
    /// `(origin_x, origin_y)` is illegal.
    ///
    /// An occupied shape cell collides when it lies left of column 0, right of
    /// the last column, below the last row, or on a non-empty board cell.
    /// Cells above row 0 only collide with the side walls, which lets pieces
    /// hang partly off the top of the board.
    ///
    /// This is the single legality check for every move, rotation and spawn.
    #[must_use]
    pub fn collides(&self, shape: &ShapeMatrix, origin_x: i32, origin_y: i32) -> bool {
        shape.occupied_offsets().any(|(dx, dy)| {
            let Some(x) = column_index(origin_x + dx) else {
                return true;
            };
            match usize::try_from(origin_y + dy) {
                Err(_) => false,
                Ok(y) => y >= BOARD_HEIGHT || self.rows[y][x] != EMPTY_CELL,
            }
        })
    }

    /// Writes the piece's occupied cells into the board.
    ///
    /// Cells above row 0 cannot be stored and are dropped; the number of
    /// dropped cells is returned. A non-zero result means the stack has
    /// overflowed the top of the board.
    pub fn merge(&mut self, piece: &ActivePiece) -> usize {
        let value = piece.kind().cell_value();
        let mut dropped = 0;
        for (x, y) in piece.occupied_positions() {
            let Ok(y) = usize::try_from(y) else {
                dropped += 1;
                continue;
            };
            if let (Some(x), true) = (column_index(x), y < BOARD_HEIGHT) {
                self.rows[y][x] = value;
            }
        }
        dropped
    }

    /// Returns the indices of all full rows, top to bottom.
    #[must_use]
    pub fn full_rows(&self) -> ArrayVec<usize, BOARD_HEIGHT> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| is_row_full(row))
            .map(|(y, _)| y)
            .collect()
    }

    /// Clears full rows and returns the number of rows cleared.
    ///
    /// Remaining rows keep their relative order and shift down; one empty row
    /// is inserted at the top for every cleared row.
    pub fn clear_full_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..BOARD_HEIGHT).rev() {
            if is_row_full(&self.rows[y]) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(EMPTY_ROW);
        count
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{}", row_to_string(row))?;
        }
        Ok(())
    }
}

fn row_to_string(row: &Row) -> String {
    row.iter()
        .map(|&cell| PieceKind::from_cell_value(cell).map_or('.', PieceKind::as_char))
        .collect()
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Format: ["..........", ..., "IIII..OO.."] (one string per row, top first)
        let mut seq = serializer.serialize_seq(Some(BOARD_HEIGHT))?;
        for row in &self.rows {
            seq.serialize_element(&row_to_string(row))?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let lines = Vec::<String>::deserialize(deserializer)?;
        if lines.len() != BOARD_HEIGHT {
            return Err(serde::de::Error::custom(format!(
                "expected {BOARD_HEIGHT} rows, got {}",
                lines.len()
            )));
        }

        let mut board = Self::EMPTY;
        for (y, line) in lines.iter().enumerate() {
            if line.chars().count() != BOARD_WIDTH {
                return Err(serde::de::Error::custom(format!(
                    "row {y} must have {BOARD_WIDTH} cells, got '{line}'"
                )));
            }
            for (x, c) in line.chars().enumerate() {
                board.rows[y][x] = match (c, PieceKind::from_char(c)) {
                    ('.', _) => EMPTY_CELL,
                    (_, Some(kind)) => kind.cell_value(),
                    (_, None) => {
                        return Err(serde::de::Error::custom(format!(
                            "invalid cell '{c}' at ({x}, {y})"
                        )));
                    }
                };
            }
        }
        Ok(board)
    }
}

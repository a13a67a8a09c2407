use serde::{Deserialize, Serialize};

use super::{BOARD_WIDTH, board::Board, catalog::PieceKind, shape::ShapeMatrix};

/// Board-relative position of a piece's top-left shape cell.
///
/// Coordinates are signed: a piece may sit partly above the visible board
/// (negative `y`) while it is falling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct PieceOrigin {
    pub x: i32,
    pub y: i32,
}

impl PieceOrigin {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The live, falling piece: its kind, current rotation and origin.
///
/// Translation and rotation helpers are pure. They return candidate origins
/// or shapes and leave validation to [`Board::collides`]. Only after a
/// candidate is accepted does the owner commit it with
/// [`ActivePiece::set_origin`] or [`ActivePiece::set_shape`].
///
/// # Example
///
/// ```
/// use stackfall_engine::{ActivePiece, Board, PieceKind, PieceOrigin};
///
/// let board = Board::EMPTY;
/// let mut piece = ActivePiece::spawn(PieceKind::T);
/// assert_eq!(piece.origin(), PieceOrigin::new(4, 0));
///
/// let rotated = piece.rotate();
/// if !board.collides(&rotated, piece.origin().x, piece.origin().y) {
///     piece.set_shape(rotated);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ActivePiece {
    kind: PieceKind,
    shape: ShapeMatrix,
    origin: PieceOrigin,
}

impl ActivePiece {
    /// Creates a piece in spawn orientation, horizontally centered on row 0.
    #[must_use]
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = kind.shape();
        Self {
            kind,
            shape,
            origin: spawn_origin(&shape),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn shape(&self) -> &ShapeMatrix {
        &self.shape
    }

    #[must_use]
    pub const fn origin(&self) -> PieceOrigin {
        self.origin
    }

    /// Returns the shape rotated 90° clockwise. The piece itself is unchanged.
    #[must_use]
    pub const fn rotate(&self) -> ShapeMatrix {
        self.shape.rotated_clockwise()
    }

    /// Returns the origin shifted by `(dx, dy)`. The piece itself is unchanged.
    #[must_use]
    pub const fn translate(&self, dx: i32, dy: i32) -> PieceOrigin {
        self.origin.translated(dx, dy)
    }

    pub fn set_origin(&mut self, origin: PieceOrigin) {
        self.origin = origin;
    }

    pub fn set_shape(&mut self, shape: ShapeMatrix) {
        self.shape = shape;
    }

    /// Absolute `(x, y)` board coordinates of every occupied cell.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied_offsets()
            .map(move |(dx, dy)| (self.origin.x + dx, self.origin.y + dy))
    }

    /// Returns this piece moved straight down as far as it legally can.
    ///
    /// If the piece cannot move down at all, it is returned unchanged.
    #[must_use]
    pub fn drop_position(&self, board: &Board) -> Self {
        let mut dropped = *self;
        loop {
            let below = dropped.translate(0, 1);
            if board.collides(&dropped.shape, below.x, below.y) {
                return dropped;
            }
            dropped.origin = below;
        }
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn spawn_origin(shape: &ShapeMatrix) -> PieceOrigin {
    let x = BOARD_WIDTH / 2 - shape.width() / 2;
    PieceOrigin::new(x as i32, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_centers_piece() {
        let expected = [
            (PieceKind::I, 3),
            (PieceKind::J, 4),
            (PieceKind::L, 4),
            (PieceKind::O, 4),
            (PieceKind::S, 4),
            (PieceKind::T, 4),
            (PieceKind::Z, 4),
        ];
        for (kind, x) in expected {
            let piece = ActivePiece::spawn(kind);
            assert_eq!(piece.origin(), PieceOrigin::new(x, 0), "{kind}");
            assert_eq!(piece.kind(), kind);
            assert_eq!(*piece.shape(), kind.shape());
        }
    }

    #[test]
    fn test_rotate_and_translate_are_pure() {
        let piece = ActivePiece::spawn(PieceKind::L);
        let rotated = piece.rotate();
        let moved = piece.translate(-2, 3);

        assert_eq!(rotated, PieceKind::L.shape().rotated_clockwise());
        assert_eq!(moved, PieceOrigin::new(2, 3));
        assert_eq!(piece, ActivePiece::spawn(PieceKind::L));
    }

    #[test]
    fn test_setters_commit_changes() {
        let mut piece = ActivePiece::spawn(PieceKind::S);
        let rotated = piece.rotate();
        piece.set_shape(rotated);
        piece.set_origin(PieceOrigin::new(0, 5));

        assert_eq!(*piece.shape(), rotated);
        assert_eq!(piece.origin(), PieceOrigin::new(0, 5));
    }

    #[test]
    fn test_occupied_positions_are_absolute() {
        let mut piece = ActivePiece::spawn(PieceKind::T);
        piece.set_origin(PieceOrigin::new(2, -1));

        let positions: Vec<_> = piece.occupied_positions().collect();
        assert_eq!(positions, vec![(3, -1), (2, 0), (3, 0), (4, 0)]);
    }

    #[test]
    fn test_drop_position_on_empty_board() {
        let board = Board::EMPTY;
        let dropped = ActivePiece::spawn(PieceKind::O).drop_position(&board);
        // O is 2 rows tall, so it rests on rows 18 and 19.
        assert_eq!(dropped.origin(), PieceOrigin::new(4, 18));
    }

    #[test]
    fn test_drop_position_stops_on_stack() {
        let mut board = Board::EMPTY;
        assert!(board.fill_cell(3, 10, PieceKind::Z));

        let dropped = ActivePiece::spawn(PieceKind::I).drop_position(&board);
        assert_eq!(dropped.origin(), PieceOrigin::new(3, 9));
    }

    #[test]
    fn test_piece_serialization() {
        let piece = ActivePiece::spawn(PieceKind::J);
        let serialized = serde_json::to_string(&piece).unwrap();
        assert_eq!(
            serialized,
            r##"{"kind":"J","shape":"#../###","origin":{"x":4,"y":0}}"##
        );

        let deserialized: ActivePiece = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, piece);
    }
}

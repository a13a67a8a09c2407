use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

use super::shape::ShapeMatrix;

/// Enum representing the type of piece.
///
/// The discriminant is the piece's catalog identifier (0..=6). Locked cells on
/// the board store `identifier + 1`, leaving `0` for empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// Every piece kind, in identifier order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Returns the catalog identifier (0..=6).
    #[must_use]
    pub const fn id(self) -> usize {
        self as usize
    }

    /// Looks up a piece kind by catalog identifier.
    #[must_use]
    pub const fn from_id(id: usize) -> Option<Self> {
        if id < Self::LEN {
            Some(Self::ALL[id])
        } else {
            None
        }
    }

    /// Returns the value written into board cells locked by this piece.
    ///
    /// ```
    /// use stackfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.cell_value(), 1);
    /// assert_eq!(PieceKind::Z.cell_value(), 7);
    /// ```
    #[must_use]
    pub const fn cell_value(self) -> u8 {
        self as u8 + 1
    }

    /// Inverse of [`Self::cell_value`]. Returns `None` for `0` (empty) and for
    /// values outside the catalog.
    #[must_use]
    pub const fn from_cell_value(value: u8) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Self::from_id(value as usize - 1)
        }
    }

    /// Returns the canonical spawn-orientation shape.
    #[must_use]
    pub const fn shape(self) -> ShapeMatrix {
        PIECE_SHAPES[self.id()]
    }

    /// Returns the display color.
    #[must_use]
    pub const fn color(self) -> Color {
        PIECE_COLORS[self.id()]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// RGB display color of a piece.
///
/// The engine never draws; renderers map identifiers to colors through
/// [`color_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Returns the canonical shape matrix for `kind`.
#[must_use]
pub const fn shape_for(kind: PieceKind) -> ShapeMatrix {
    kind.shape()
}

/// Returns the display color for `kind`.
#[must_use]
pub const fn color_for(kind: PieceKind) -> Color {
    kind.color()
}

/// Draws a uniformly distributed piece kind from the caller's random source.
///
/// ```
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
/// use stackfall_engine::random_identifier;
///
/// let mut a = Pcg32::seed_from_u64(7);
/// let mut b = Pcg32::seed_from_u64(7);
/// assert_eq!(random_identifier(&mut a), random_identifier(&mut b));
/// ```
pub fn random_identifier<R: Rng + ?Sized>(rng: &mut R) -> PieceKind {
    rng.random()
}

const PIECE_COLORS: [Color; PieceKind::LEN] = [
    Color::rgb(0, 240, 240),  // I
    Color::rgb(0, 120, 255),  // J
    Color::rgb(255, 160, 0),  // L
    Color::rgb(255, 230, 0),  // O
    Color::rgb(0, 230, 0),    // S
    Color::rgb(180, 0, 255),  // T
    Color::rgb(255, 50, 50),  // Z
];

const PIECE_SHAPES: [ShapeMatrix; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];
    [
        // I-piece
        ShapeMatrix::new(1, 4, [[C, C, C, C], EEEE, EEEE, EEEE]),
        // J-piece
        ShapeMatrix::new(2, 3, [[C, E, E, E], [C, C, C, E], EEEE, EEEE]),
        // L-piece
        ShapeMatrix::new(2, 3, [[E, E, C, E], [C, C, C, E], EEEE, EEEE]),
        // O-piece
        ShapeMatrix::new(2, 2, [[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
        // S-piece
        ShapeMatrix::new(2, 3, [[E, C, C, E], [C, C, E, E], EEEE, EEEE]),
        // T-piece
        ShapeMatrix::new(2, 3, [[E, C, E, E], [C, C, C, E], EEEE, EEEE]),
        // Z-piece
        ShapeMatrix::new(2, 3, [[C, C, E, E], [E, C, C, E], EEEE, EEEE]),
    ]
};

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_every_shape_is_a_tetromino() {
        for kind in PieceKind::ALL {
            assert_eq!(kind.shape().occupied_count(), 4, "{kind} should have 4 cells");
        }
    }

    #[test]
    fn test_four_rotations_restore_shape() {
        for kind in PieceKind::ALL {
            let shape = shape_for(kind);
            let rotated = shape
                .rotated_clockwise()
                .rotated_clockwise()
                .rotated_clockwise()
                .rotated_clockwise();
            assert_eq!(rotated, shape, "{kind} did not round-trip");
        }
    }

    #[test]
    fn test_canonical_shapes() {
        let expected = [
            (PieceKind::I, "####"),
            (PieceKind::J, "#../###"),
            (PieceKind::L, "..#/###"),
            (PieceKind::O, "##/##"),
            (PieceKind::S, ".##/##."),
            (PieceKind::T, ".#./###"),
            (PieceKind::Z, "##./.##"),
        ];
        for (kind, text) in expected {
            assert_eq!(shape_for(kind).to_string(), text);
        }
    }

    #[test]
    fn test_colors_are_distinct() {
        for (i, a) in PieceKind::ALL.iter().enumerate() {
            for b in &PieceKind::ALL[i + 1..] {
                assert_ne!(color_for(*a), color_for(*b), "{a} and {b} share a color");
            }
        }
        assert_eq!(color_for(PieceKind::I), Color::rgb(0, 240, 240));
    }

    #[test]
    fn test_id_and_cell_value_conversion() {
        for (id, kind) in PieceKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.id(), id);
            assert_eq!(PieceKind::from_id(id), Some(kind));
            assert_eq!(PieceKind::from_cell_value(kind.cell_value()), Some(kind));
        }
        assert_eq!(PieceKind::from_id(7), None);
        assert_eq!(PieceKind::from_cell_value(0), None);
        assert_eq!(PieceKind::from_cell_value(8), None);
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
            assert_eq!(kind.to_string(), kind.as_char().to_string());
        }
        assert_eq!(PieceKind::from_char('X'), None);
        assert_eq!(PieceKind::from_char('i'), None);
    }

    #[test]
    fn test_random_identifier_is_seed_deterministic() {
        let mut a = Pcg32::seed_from_u64(42);
        let mut b = Pcg32::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(random_identifier(&mut a), random_identifier(&mut b));
        }
    }

    #[test]
    fn test_random_identifier_covers_catalog() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut seen = [false; PieceKind::LEN];
        for _ in 0..1000 {
            seen[random_identifier(&mut rng).id()] = true;
        }
        assert!(seen.iter().all(|&s| s), "every kind should be drawn: {seen:?}");
    }
}

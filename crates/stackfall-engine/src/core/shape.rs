use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Largest number of rows or columns a shape can span.
pub const MAX_SHAPE_SIZE: usize = 4;

type Cells = [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];

/// Immutable rectangular grid of occupied/empty cells describing a piece.
///
/// Cells are stored row-major in a fixed 4×4 buffer; only the top-left
/// `height() × width()` region is meaningful and everything outside it is
/// always empty, so two matrices compare equal exactly when they describe the
/// same shape.
///
/// Rotation never edits a matrix in place. [`ShapeMatrix::rotated_clockwise`]
/// returns a new value, which lets the catalog share one `const` matrix with
/// every piece spawned from it.
///
/// # Text form
///
/// Matrices serialize as their rows joined by `/`, using `#` for an occupied
/// cell and `.` for an empty one:
///
/// ```
/// use stackfall_engine::PieceKind;
///
/// let t = PieceKind::T.shape();
/// assert_eq!(t.to_string(), ".#./###");
/// assert_eq!(t.rotated_clockwise().to_string(), "#./##/#.");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    height: u8,
    width: u8,
    cells: Cells,
}

impl ShapeMatrix {
    /// Builds a matrix from a 4×4 buffer whose meaningful region is
    /// `height × width`.
    ///
    /// Panics (at compile time for `const` callers) if the dimensions are out
    /// of range or a cell outside the region is set.
    #[expect(clippy::cast_possible_truncation)]
    pub(crate) const fn new(height: usize, width: usize, cells: Cells) -> Self {
        assert!(height >= 1 && height <= MAX_SHAPE_SIZE);
        assert!(width >= 1 && width <= MAX_SHAPE_SIZE);
        let mut y = 0;
        while y < MAX_SHAPE_SIZE {
            let mut x = 0;
            while x < MAX_SHAPE_SIZE {
                assert!(!(cells[y][x] && (y >= height || x >= width)));
                x += 1;
            }
            y += 1;
        }
        Self {
            height: height as u8,
            width: width as u8,
            cells,
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height as usize
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    /// Returns whether the cell at column `x`, row `y` is occupied.
    ///
    /// Coordinates outside the matrix are reported as empty.
    #[must_use]
    pub const fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height() && self.cells[y][x]
    }

    /// Iterates over the `(x, y)` offsets of occupied cells, row by row.
    pub fn occupied_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width)
                .filter(move |&x| self.cells[usize::from(y)][usize::from(x)])
                .map(move |x| (i32::from(x), i32::from(y)))
        })
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.occupied_offsets().count()
    }

    /// Returns the matrix rotated 90° clockwise.
    ///
    /// The result has the source's width as its height and vice versa, with
    /// `rotated[i][j] = source[height - 1 - j][i]`.
    #[must_use]
    pub const fn rotated_clockwise(&self) -> Self {
        let height = self.height as usize;
        let width = self.width as usize;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut i = 0;
        while i < width {
            let mut j = 0;
            while j < height {
                cells[i][j] = self.cells[height - 1 - j][i];
                j += 1;
            }
            i += 1;
        }
        Self {
            height: self.width,
            width: self.height,
            cells,
        }
    }
}

impl fmt::Display for ShapeMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            if y > 0 {
                f.write_str("/")?;
            }
            for x in 0..self.width() {
                f.write_str(if self.cells[y][x] { "#" } else { "." })?;
            }
        }
        Ok(())
    }
}

impl Serialize for ShapeMatrix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShapeMatrix {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let rows: Vec<&str> = s.split('/').collect();
        if rows.len() > MAX_SHAPE_SIZE {
            return Err(serde::de::Error::custom(format!(
                "shape has {} rows, at most {MAX_SHAPE_SIZE} allowed: '{s}'",
                rows.len()
            )));
        }
        let width = rows[0].len();
        if width == 0 || width > MAX_SHAPE_SIZE {
            return Err(serde::de::Error::custom(format!(
                "shape width must be 1-{MAX_SHAPE_SIZE}, got {width}: '{s}'"
            )));
        }

        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(serde::de::Error::custom(format!(
                    "shape is not rectangular: row {y} has {} cells, expected {width}",
                    row.len()
                )));
            }
            for (x, c) in row.chars().enumerate() {
                cells[y][x] = match c {
                    '#' => true,
                    '.' => false,
                    _ => {
                        return Err(serde::de::Error::custom(format!(
                            "invalid shape cell '{c}' (expected '#' or '.')"
                        )));
                    }
                };
            }
        }

        Ok(Self::new(rows.len(), width, cells))
    }
}

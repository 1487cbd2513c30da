use std::fmt;
use std::str::FromStr;

use rand::Rng;
use thiserror::Error;
use tracing::debug;
use tracing::warn;

use crate::Coord;
use crate::cell::Cell;

/// Side length of a [`Grid`], validated to lie in `[GridSize::MIN, GridSize::MAX]`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct GridSize(usize);

#[derive(Debug, Error, PartialEq, Clone)]
pub enum SizeError {
    #[error("Grid size {size} is outside [{min}, {max}]", min = GridSize::MIN, max = GridSize::MAX)]
    OutOfRange { size: i128 },

    #[error("Grid size {value} is outside [{min}, {max}]", min = GridSize::MIN, max = GridSize::MAX)]
    FloatOutOfRange { value: f64 },

    #[error("Grid size must be a whole number, got {value}")]
    NotAnInteger { value: f64 },

    #[error("Failed to parse \"{input}\" as a grid size")]
    Parse { input: String },
}

impl GridSize {
    pub const MIN: usize = 30;
    pub const MAX: usize = 100;

    /// Side length boards start with.
    pub const DEFAULT: Self = Self(40);

    pub fn new(size: usize) -> Result<Self, SizeError> {
        if (Self::MIN..=Self::MAX).contains(&size) {
            Ok(Self(size))
        } else {
            Err(SizeError::OutOfRange { size: size as i128 })
        }
    }

    pub fn get(self) -> usize {
        self.0
    }

    fn from_wide(size: i128) -> Result<Self, SizeError> {
        match usize::try_from(size) {
            Ok(size) => Self::new(size),
            Err(_) => Err(SizeError::OutOfRange { size }),
        }
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for GridSize {
    type Error = SizeError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl TryFrom<i32> for GridSize {
    type Error = SizeError;

    fn try_from(size: i32) -> Result<Self, Self::Error> {
        Self::from_wide(size as i128)
    }
}

impl TryFrom<i64> for GridSize {
    type Error = SizeError;

    fn try_from(size: i64) -> Result<Self, Self::Error> {
        Self::from_wide(size as i128)
    }
}

impl TryFrom<f64> for GridSize {
    type Error = SizeError;

    /// Integral floats such as `40.0` are accepted, anything with a fractional part (or NaN,
    /// or an infinity) is not.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(SizeError::NotAnInteger { value });
        }

        // Checked before the cast, which saturates far outside the range.
        if value < Self::MIN as f64 || value > Self::MAX as f64 {
            return Err(SizeError::FloatOutOfRange { value });
        }

        Self::new(value as usize)
    }
}

impl FromStr for GridSize {
    type Err = SizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(size) = s.parse::<i128>() {
            return Self::from_wide(size);
        }

        match s.parse::<f64>() {
            Ok(value) => Self::try_from(value),
            Err(_) => Err(SizeError::Parse {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A square board whose edges wrap around: row `-1` is the last row, column `size` is the
/// first column, and so on. Cells are stored row-major.
#[derive(PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,

    /// Side length. Always equal to the number of rows and to the length of every row.
    side: usize,
}

impl Grid {
    /// Create a grid of `size × size` dead cells.
    pub fn new<S>(size: S) -> Result<Self, SizeError>
    where
        S: TryInto<GridSize, Error = SizeError>,
    {
        Ok(Self::with_size(size.try_into()?))
    }

    /// Like [`Grid::new`], for a size that has already been validated.
    pub fn with_size(size: GridSize) -> Self {
        Self::blank(size.get())
    }

    /// Unvalidated constructor. Only tiny hand-built boards in tests go below
    /// [`GridSize::MIN`].
    pub(crate) fn blank(side: usize) -> Self {
        assert!(side > 0, "a grid needs at least one cell");

        Self {
            cells: vec![Cell::dead(); side * side],
            side,
        }
    }

    pub fn size(&self) -> usize {
        self.side
    }

    /// Read the cell at `(row, col)`, wrapping both coordinates.
    pub fn get(&self, row: Coord, col: Coord) -> Cell {
        self.cells[self.index(row, col)]
    }

    /// Convenience for `self.get(row, col).alive`.
    pub fn is_alive(&self, row: Coord, col: Coord) -> bool {
        self.get(row, col).alive
    }

    /// Write the cell at `(row, col)`, wrapping both coordinates.
    pub fn set(&mut self, row: Coord, col: Coord, alive: bool) {
        let i = self.index(row, col);
        self.cells[i] = Cell::from(alive);
    }

    /// Bring `round(density * size²)` cells to life at uniformly random coordinates.
    ///
    /// Coordinates are drawn independently, so the same cell can be hit more than once and the
    /// resulting alive fraction is at most `density`. Densities outside `[0, 1]` are clamped.
    pub fn randomize<R>(&mut self, density: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let density = if density.is_nan() {
            warn!("Density is NaN, treating it as 0");
            0.0
        } else if !(0.0..=1.0).contains(&density) {
            warn!(density, "Density outside [0, 1], clamping");
            density.clamp(0.0, 1.0)
        } else {
            density
        };

        let draws = (density * self.cells.len() as f64).round() as usize;
        debug!(draws, size = self.side, "Randomizing grid cells");

        for _ in 0..draws {
            let row = rng.gen_range(0..self.side);
            let col = rng.gen_range(0..self.side);

            self.cells[row * self.side + col] = Cell::alive();
        }
    }

    /// Iterate over the rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.side)
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|c| c.alive).count()
    }

    /// Whether every cell is dead.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| !c.alive)
    }

    fn index(&self, row: Coord, col: Coord) -> usize {
        let n = self.side as Coord;

        let row = row.rem_euclid(n) as usize;
        let col = col.rem_euclid(n) as usize;

        row * self.side + col
    }
}

impl Clone for Grid {
    fn clone(&self) -> Self {
        Self {
            cells: self.cells.clone(),
            side: self.side,
        }
    }

    // Reuses the existing allocation, which is what the engine's per-tick snapshot relies on.
    fn clone_from(&mut self, source: &Self) {
        self.cells.clone_from(&source.cells);
        self.side = source.side;
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("size", &self.side)
            .field("alive", &self.alive_count())
            .finish()
    }
}

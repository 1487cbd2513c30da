/// Bit of the window pattern holding the evaluated cell itself.
const CELL_MASK: u16 = 0b0_0001_0000;

/// The eight bits around [`CELL_MASK`].
const NBHD_MASK: u16 = 0b1_1110_1111;

/// Number of distinct 3x3 window patterns.
pub const WINDOW_PATTERNS: usize = 1 << 9;

// Count the bits using Brian Kernighan's way
// See: http://graphics.stanford.edu/~seander/bithacks.html#CountBitsSetKernighan
fn count_bits(mut x: u16) -> u8 {
    let mut n = 0;

    while x != 0 {
        x &= x - 1;
        n += 1;
    }

    n
}

/// Which cells of the 3x3 window around a cell are counted when deciding its next state.
///
/// # Window layout
/// A window is packed into the low 9 bits of a `u16`, row-major from the top left:
/// ```notrust
///   0 1 2
///   3 4 5
///   6 7 8
/// ```
/// Bit 4 is the cell being evaluated.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum Neighborhood {
    /// Count all 9 cells, the center included. A total of 3 brings the cell to life, a total
    /// of 4 leaves it as it was, anything else kills it.
    #[default]
    Window,

    /// Classical Moore neighborhood: count the 8 surrounding cells only. 3 brings the cell to
    /// life, 2 leaves it as it was, anything else kills it.
    Moore,
}

impl Neighborhood {
    /// Next state of the center of `window`.
    pub fn next(self, window: u16) -> bool {
        let alive = window & CELL_MASK == CELL_MASK;

        let (count, born, keep) = match self {
            Self::Window => (count_bits(window & (NBHD_MASK | CELL_MASK)), 3, 4),
            Self::Moore => (count_bits(window & NBHD_MASK), 3, 2),
        };

        match count {
            n if n == born => true,
            n if n == keep => alive,
            _ => false,
        }
    }

    /// Compute the result of every possible window.
    ///
    /// Indexing the returned table with a packed window yields the next state of its center
    /// cell.
    pub fn compute_rules(self) -> Vec<bool> {
        (0..WINDOW_PATTERNS as u16).map(|w| self.next(w)).collect()
    }
}

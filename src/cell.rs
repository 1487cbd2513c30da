/// A single square of the board. Cells carry no identity beyond their position in a
/// [`Grid`](crate::grid::Grid).
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Cell {
    pub alive: bool,
}

impl Cell {
    /// Return the canonical dead cell
    pub const fn dead() -> Self {
        Self { alive: false }
    }

    /// Return a live cell
    pub const fn alive() -> Self {
        Self { alive: true }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Character used when printing a grid as text.
    pub fn symbol(&self) -> char {
        if self.alive { '#' } else { '.' }
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        Self { alive }
    }
}

#[cfg(test)]
mod tests {
    use super::Cell;

    #[test]
    fn default_is_dead() {
        assert_eq!(Cell::default(), Cell::dead());
        assert!(!Cell::default().is_alive());
    }

    #[test]
    fn copies_are_independent() {
        let a = Cell::alive();
        let mut b = a;
        b.alive = false;

        assert!(a.is_alive());
        assert!(!b.is_alive());
    }
}

use crate::grid::GridSize;

pub enum Event {
    Command(Command),
    Edit(Edit),
    ViewEvent(ViewEvent),

    /// Exit the application
    Exit,
}

/// Requests aimed at the simulation.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Command {
    /// Start a stopped simulation, stop a running one
    StartStop,

    /// Bring a fraction of the board to life
    Randomize,

    /// Stop and clear the board, keeping its size
    Reset,

    /// Stop, then start over on a freshly randomized board of the given size
    Resize(GridSize),
}

/// Edits to the size being typed in.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Edit {
    Push(char),
    Pop,
    Clear,

    /// Parse what was typed and resize to it
    Submit,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViewEvent {
    /// Shift the view across the torus, in cells
    Pan { rows: isize, cols: isize },

    /// Put the board's origin back in the top left corner
    Recenter,

    /// The terminal changed size
    Redraw,
}

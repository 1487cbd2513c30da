pub mod camera;
pub mod cell;
pub mod config;
pub mod driver;
pub mod events;
pub mod grid;
pub mod io;
pub mod rules;
pub mod simulation;

/// Row or column index. Any value is valid: the board wraps.
pub type Coord = isize;

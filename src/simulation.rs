use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::debug;
use tracing::trace;

use crate::Coord;
use crate::grid::Grid;
use crate::grid::GridSize;
use crate::grid::SizeError;
use crate::rules::Neighborhood;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum SimulationError {
    #[error("Invalid size: {0}")]
    InvalidSize(#[from] SizeError),

    #[error("Cannot tick a stopped simulation")]
    NotRunning,
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum RunState {
    #[default]
    Stopped,
    Running,
}

/// The engine: a current board, the snapshot it is advanced from, and the bookkeeping the
/// driver displays.
///
/// The engine keeps no clock. Whoever owns it calls [`Simulation::tick`] at whatever cadence
/// it likes while [`Simulation::is_running`] holds. [`Simulation::reset`] does not stop a
/// running simulation; callers stop ticking before resetting.
pub struct Simulation {
    /// The board as of the last completed tick. This is what gets rendered.
    current: Grid,

    /// The board as it was when the current tick started. Rules read from here and write to
    /// `current`, so every cell of a tick sees the same prior state. Overwritten wholesale at
    /// the start of every tick.
    previous: Grid,

    /// Indexing into this table with a packed 3x3 window yields the next state of its center.
    rules: Vec<bool>,

    neighborhood: Neighborhood,

    tick_count: u64,

    state: RunState,

    rng: StdRng,
}

impl Simulation {
    /// A stopped simulation on an all-dead board.
    pub fn new<S>(size: S) -> Result<Self, SimulationError>
    where
        S: TryInto<GridSize, Error = SizeError>,
    {
        let grid = Grid::new(size)?;

        Ok(Self::from_grid(grid))
    }

    /// Like [`Simulation::new`], with a reproducible random source.
    pub fn with_seed<S>(size: S, seed: u64) -> Result<Self, SimulationError>
    where
        S: TryInto<GridSize, Error = SizeError>,
    {
        let grid = Grid::new(size)?;

        Ok(Self::with_rng(grid, StdRng::seed_from_u64(seed)))
    }

    /// A stopped simulation starting from an existing board, such as a hand-placed pattern.
    pub fn from_grid(grid: Grid) -> Self {
        Self::with_rng(grid, StdRng::from_entropy())
    }

    pub(crate) fn with_rng(grid: Grid, rng: StdRng) -> Self {
        let neighborhood = Neighborhood::default();

        Self {
            previous: grid.clone(),
            current: grid,
            rules: neighborhood.compute_rules(),
            neighborhood,
            tick_count: 0,
            state: RunState::Stopped,
            rng,
        }
    }

    /// Switch how the window around a cell is counted.
    pub fn with_neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.neighborhood = neighborhood;
        self.rules = neighborhood.compute_rules();
        self
    }

    pub fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }

    /// Replace the board with a fresh all-dead one and zero the tick counter.
    ///
    /// On an invalid size nothing changes.
    pub fn reset<S>(&mut self, size: S) -> Result<(), SimulationError>
    where
        S: TryInto<GridSize, Error = SizeError>,
    {
        self.reset_to(size.try_into()?);

        Ok(())
    }

    /// Like [`Simulation::reset`], for a size that has already been validated.
    pub fn reset_to(&mut self, size: GridSize) {
        debug!(%size, "Resetting grid");

        self.current = Grid::with_size(size);
        self.previous = Grid::with_size(size);
        self.tick_count = 0;
    }

    /// Bring roughly `density` of the current board to life. See [`Grid::randomize`].
    pub fn randomize_current(&mut self, density: f64) {
        self.current.randomize(density, &mut self.rng);
    }

    pub fn start(&mut self) {
        if self.state == RunState::Stopped {
            debug!(tick = self.tick_count, "Starting simulation");
            self.state = RunState::Running;
        }
    }

    pub fn stop(&mut self) {
        if self.state == RunState::Running {
            debug!(tick = self.tick_count, "Stopping simulation");
            self.state = RunState::Stopped;
        }
    }

    /// Start if stopped, stop if running. Returns the new state.
    pub fn toggle(&mut self) -> RunState {
        match self.state {
            RunState::Stopped => self.start(),
            RunState::Running => self.stop(),
        }

        self.state
    }

    /// Advance every cell by one step.
    pub fn tick(&mut self) -> Result<(), SimulationError> {
        if self.state != RunState::Running {
            return Err(SimulationError::NotRunning);
        }

        self.previous.clone_from(&self.current);

        let n = self.previous.size() as Coord;
        for row in 0..n {
            for col in 0..n {
                let window = window_at(&self.previous, row, col);
                self.current.set(row, col, self.rules[window as usize]);
            }
        }

        self.tick_count += 1;
        trace!(tick = self.tick_count, "Ran a tick");

        Ok(())
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Read-only view of the board for rendering.
    pub fn current_grid(&self) -> &Grid {
        &self.current
    }
}

/// Pack the 3x3 window centered on `(row, col)` into the low 9 bits of a `u16`, row-major
/// from the top left. See [`Neighborhood`] for the layout.
fn window_at(grid: &Grid, row: Coord, col: Coord) -> u16 {
    let mut window = 0;
    let mut bit = 0;

    for dr in -1..=1 {
        for dc in -1..=1 {
            if grid.is_alive(row + dr, col + dc) {
                window |= 1 << bit;
            }

            bit += 1;
        }
    }

    window
}

/// A [`Simulation`] that can be handed to several threads.
///
/// Every operation holds the one lock for its whole duration, so ticks, resets, randomizes
/// and start/stop never interleave.
#[derive(Clone)]
pub struct SharedSimulation {
    inner: Arc<Mutex<Simulation>>,
}

impl SharedSimulation {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            inner: Arc::new(Mutex::new(simulation)),
        }
    }

    /// Run `f` with exclusive access to the simulation.
    pub fn with<R>(&self, f: impl FnOnce(&mut Simulation) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn reset<S>(&self, size: S) -> Result<(), SimulationError>
    where
        S: TryInto<GridSize, Error = SizeError>,
    {
        self.lock().reset(size)
    }

    pub fn randomize_current(&self, density: f64) {
        self.lock().randomize_current(density)
    }

    pub fn start(&self) {
        self.lock().start()
    }

    pub fn stop(&self) {
        self.lock().stop()
    }

    pub fn tick(&self) -> Result<(), SimulationError> {
        self.lock().tick()
    }

    pub fn tick_count(&self) -> u64 {
        self.lock().tick_count()
    }

    pub fn is_running(&self) -> bool {
        self.lock().is_running()
    }

    /// Copy of the current board, taken under the lock.
    pub fn snapshot(&self) -> Grid {
        self.lock().current_grid().clone()
    }

    // A panic while holding the lock can only happen between whole operations, so the state
    // behind a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, Simulation> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::RunState;
    use super::SharedSimulation;
    use super::Simulation;
    use super::SimulationError;
    use super::window_at;
    use crate::grid::Grid;
    use crate::grid::SizeError;
    use crate::rules::Neighborhood;

    fn tiny(side: usize, alive: &[(isize, isize)]) -> Simulation {
        let mut grid = Grid::blank(side);
        for &(r, c) in alive {
            grid.set(r, c, true);
        }

        let mut sim = Simulation::with_rng(grid, StdRng::seed_from_u64(0));
        sim.start();
        sim
    }

    #[test]
    fn starts_stopped_and_empty() {
        let sim = Simulation::new(40).unwrap();

        assert_eq!(sim.state(), RunState::Stopped);
        assert_eq!(sim.tick_count(), 0);
        assert_eq!(sim.current_grid().size(), 40);
        assert!(sim.current_grid().is_empty());
        assert_eq!(sim.neighborhood(), Neighborhood::Window);
    }

    #[test]
    fn window_packs_row_major() {
        let mut grid = Grid::blank(3);
        grid.set(0, 0, true);
        grid.set(2, 2, true);

        // centered on (1, 1): top left is bit 0, bottom right is bit 8
        assert_eq!(window_at(&grid, 1, 1), 0b1_0000_0001);
        // centered on (0, 0) the window wraps: (2, 2) is the top left, (0, 0) the center
        assert_eq!(window_at(&grid, 0, 0), 0b0_0001_0001);
    }

    #[test]
    fn whole_torus_window_with_three_alive() {
        // On a 3x3 torus every window covers the whole board.
        let mut sim = tiny(3, &[(0, 0), (0, 1), (1, 0)]);

        sim.tick().unwrap();

        assert!(sim.current_grid().is_alive(0, 0));
        assert_eq!(sim.current_grid().alive_count(), 9);
    }

    #[test]
    fn empty_window_dies() {
        let mut sim = tiny(5, &[(0, 0)]);

        sim.tick().unwrap();

        // (2, 2)'s window holds nothing, and (0, 0)'s holds only itself
        assert!(!sim.current_grid().is_alive(2, 2));
        assert!(sim.current_grid().is_empty());
    }

    #[test]
    fn count_of_four_is_unchanged() {
        // 2x2 block: every member's window holds exactly the 4 block cells
        let block = [(1, 1), (1, 2), (2, 1), (2, 2)];
        let mut sim = tiny(6, &block);

        sim.tick().unwrap();

        for (r, c) in block {
            assert!(sim.current_grid().is_alive(r, c));
        }
        assert_eq!(sim.current_grid().alive_count(), 4);
    }

    #[test]
    fn reads_come_from_snapshot() {
        // A horizontal blinker turns vertical. Reading from the board being written would
        // let early writes leak into later windows and break the pattern.
        let mut sim = tiny(8, &[(3, 2), (3, 3), (3, 4)]);

        sim.tick().unwrap();

        let grid = sim.current_grid();
        assert!(grid.is_alive(2, 3));
        assert!(grid.is_alive(3, 3));
        assert!(grid.is_alive(4, 3));
        assert_eq!(grid.alive_count(), 3);
    }

    #[test]
    fn tick_requires_running() {
        let mut sim = Simulation::with_seed(30, 3).unwrap();
        sim.randomize_current(0.2);
        let before = sim.current_grid().clone();

        assert_eq!(sim.tick(), Err(SimulationError::NotRunning));
        assert_eq!(sim.tick_count(), 0);
        assert_eq!(sim.current_grid(), &before);
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut sim = Simulation::new(30).unwrap();

        sim.stop();
        assert!(!sim.is_running());

        sim.start();
        sim.start();
        assert!(sim.is_running());

        assert_eq!(sim.toggle(), RunState::Stopped);
        assert_eq!(sim.toggle(), RunState::Running);
    }

    #[test]
    fn invalid_reset_changes_nothing() {
        let mut sim = Simulation::with_seed(30, 9).unwrap();
        sim.randomize_current(0.5);
        sim.start();
        sim.tick().unwrap();
        let before = sim.current_grid().clone();

        let err = sim.reset(101).unwrap_err();

        assert_eq!(
            err,
            SimulationError::InvalidSize(SizeError::OutOfRange { size: 101 })
        );
        assert_eq!(sim.tick_count(), 1);
        assert_eq!(sim.current_grid(), &before);
        assert!(sim.is_running());
    }

    #[test]
    fn reset_does_not_stop() {
        let mut sim = Simulation::new(30).unwrap();
        sim.start();

        sim.reset(50).unwrap();

        assert!(sim.is_running());
        assert_eq!(sim.current_grid().size(), 50);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let mut a = Simulation::with_seed(45, 1234).unwrap();
        let mut b = Simulation::with_seed(45, 1234).unwrap();

        a.randomize_current(0.08);
        b.randomize_current(0.08);

        assert_eq!(a.current_grid(), b.current_grid());
    }

    #[test]
    fn moore_mode_matches_window_mode() {
        let mut window = Simulation::with_seed(35, 77).unwrap();
        let mut moore = Simulation::with_seed(35, 77)
            .unwrap()
            .with_neighborhood(Neighborhood::Moore);

        window.randomize_current(0.3);
        moore.randomize_current(0.3);
        window.start();
        moore.start();

        for _ in 0..10 {
            window.tick().unwrap();
            moore.tick().unwrap();
            assert_eq!(window.current_grid(), moore.current_grid());
        }
    }

    #[test]
    fn shared_simulation_serializes_ticks() {
        let shared = SharedSimulation::new(Simulation::with_seed(30, 5).unwrap());
        shared.randomize_current(0.1);
        shared.start();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        shared.tick().unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.tick_count(), 100);
        assert!(shared.is_running());
        assert_eq!(shared.snapshot().size(), 30);

        shared.stop();
        assert_eq!(shared.tick(), Err(SimulationError::NotRunning));
        assert_eq!(shared.with(|sim| sim.tick_count()), 100);
    }
}

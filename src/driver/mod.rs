use std::time::Duration;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;
use tracing::warn;

use crate::camera::Camera;
use crate::config::Config;
use crate::events::Command;
use crate::events::Edit;
use crate::events::Event;
use crate::events::ViewEvent;
use crate::grid::Grid;
use crate::grid::GridSize;
use crate::simulation::RunState;
use crate::simulation::Simulation;
use crate::simulation::SimulationError;

pub mod ticker;

pub use self::ticker::Ticker;

/// Longest the event loop blocks while nothing is scheduled.
const IDLE_TIMEOUT: Duration = Duration::from_millis(500);

/// Longest size input accepted. `100` is the largest valid size, so anything longer is a typo.
const MAX_INPUT: usize = 8;

/// What the event loop should do after handling an event.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Flow {
    Continue,
    Exit,
}

/// Everything between the terminal and the [`Simulation`]: it owns the repeating timer, turns
/// key presses into engine calls and keeps the camera in step with the board.
pub struct Driver {
    sim: Simulation,
    ticker: Ticker,
    camera: Camera,
    config: Config,

    /// Size being typed in, not yet submitted
    input: String,

    /// Last rejected request, shown on the status line until the next successful one
    error: Option<String>,
}

impl Driver {
    pub fn new(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let sim = Simulation::with_rng(Grid::with_size(config.size), rng)
            .with_neighborhood(config.neighborhood());

        Self {
            camera: Camera::fit(sim.current_grid()),
            ticker: Ticker::new(config.interval()),
            sim,
            config,
            input: String::new(),
            error: None,
        }
    }

    /// Start from a randomized board of the configured size.
    pub fn init(&mut self) {
        self.restart(self.config.size);
        debug!(size = %self.config.size, "Grid set up");
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Size input typed so far.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// How long the event loop may wait for input before the ticker needs attention.
    pub fn timeout(&self, now: Instant) -> Duration {
        self.ticker.timeout(now, IDLE_TIMEOUT)
    }

    pub fn apply(&mut self, event: Event, now: Instant) -> Flow {
        match event {
            Event::Exit => return Flow::Exit,
            Event::Command(command) => self.handle(command, now),
            Event::Edit(edit) => self.edit(edit, now),
            Event::ViewEvent(ViewEvent::Pan { rows, cols }) => {
                self.camera.offset_y(rows);
                self.camera.offset_x(cols);
            }
            Event::ViewEvent(ViewEvent::Recenter) => self.camera.reset_view(),
            Event::ViewEvent(ViewEvent::Redraw) => {}
        }

        Flow::Continue
    }

    pub fn handle(&mut self, command: Command, now: Instant) {
        self.error = None;

        match command {
            Command::StartStop => match self.sim.toggle() {
                RunState::Running => {
                    // The first tick happens right away, later ones once per interval.
                    self.ticker.arm(now);
                    self.run_tick();
                }
                RunState::Stopped => self.ticker.cancel(),
            },
            Command::Randomize => self.sim.randomize_current(self.config.density),
            Command::Reset => {
                let size = self.size();
                self.halt();
                self.sim.reset_to(size);
            }
            Command::Resize(size) => self.restart(size),
        }
    }

    /// Fire the ticker if it is due. Returns whether a tick ran.
    ///
    /// The ticker only stays armed while the simulation is running.
    pub fn on_timer(&mut self, now: Instant) -> bool {
        if !self.ticker.poll(now) {
            return false;
        }

        if !self.sim.is_running() {
            self.ticker.cancel();
            return false;
        }

        self.run_tick()
    }

    /// Render the visible part of the board.
    pub fn frame(&mut self) -> &str {
        self.camera.draw(self.sim.current_grid());
        self.camera.render()
    }

    pub fn status_line(&self) -> String {
        let grid = self.sim.current_grid();
        let state = match self.sim.state() {
            RunState::Running => "running",
            RunState::Stopped => "stopped",
        };

        let mut line = format!(
            "tick {} | {} | {}x{} | {} alive | size> {}_",
            self.sim.tick_count(),
            state,
            grid.size(),
            grid.size(),
            grid.alive_count(),
            self.input,
        );

        if let Some(error) = &self.error {
            line.push_str(" | ");
            line.push_str(error);
        }

        line
    }

    fn edit(&mut self, edit: Edit, now: Instant) {
        match edit {
            Edit::Push(c) => {
                if self.input.len() < MAX_INPUT {
                    self.input.push(c);
                }
            }
            Edit::Pop => {
                self.input.pop();
            }
            Edit::Clear => self.input.clear(),
            Edit::Submit => {
                let input = std::mem::take(&mut self.input);
                if input.trim().is_empty() {
                    return;
                }

                match input.parse::<GridSize>() {
                    Ok(size) => self.handle(Command::Resize(size), now),
                    Err(e) => self.reject(e.into()),
                }
            }
        }
    }

    /// Stop, then reset to `size` and randomize.
    fn restart(&mut self, size: GridSize) {
        self.halt();

        self.sim.reset_to(size);
        self.sim.randomize_current(self.config.density);
        self.camera = Camera::fit(self.sim.current_grid());
    }

    /// Stop the simulation and the timer together. The engine does not stop itself on reset.
    fn halt(&mut self) {
        self.sim.stop();
        self.ticker.cancel();
    }

    fn run_tick(&mut self) -> bool {
        match self.sim.tick() {
            Ok(()) => true,
            Err(e) => {
                self.ticker.cancel();
                self.reject(e);
                false
            }
        }
    }

    fn reject(&mut self, e: SimulationError) {
        warn!("Rejected request: {e}");
        self.error = Some(e.to_string());
    }

    fn size(&self) -> GridSize {
        // The board is only ever built from validated sizes.
        GridSize::new(self.sim.current_grid().size()).unwrap_or(self.config.size)
    }
}

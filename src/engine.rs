//! The simulation state machine.
//!
//! [`SimulationEngine`] owns the snake, the food pool and all timing state. A driver
//! calls [`SimulationEngine::tick`] once per [`SimulationEngine::interval`] and
//! funnels input through [`SimulationEngine::set_direction`] and
//! [`SimulationEngine::toggle_pause`] on the same thread, so no tick ever sees a
//! half-applied change. Nothing here touches the terminal, which keeps the engine
//! usable headless.

use std::cmp::max;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use anyhow::{ensure, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::food::{Food, FoodCategory, FoodField};
use crate::grid::{Grid, Position};
use crate::snake::{Direction, Snake};

pub const DEFAULT_INTERVAL_MS: u64 = 100;
pub const MIN_INTERVAL_MS: u64 = 50;
const INTERVAL_STEP_MS: u64 = 10;
const POINTS_PER_SPEEDUP: usize = 5;

/// Where a fresh snake starts, clamped into boards smaller than this.
pub const ORIGIN: Position = Position::new(5, 5);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EngineSettings {
    pub grid: Grid,
    pub base_interval: Duration,
}

impl EngineSettings {
    pub fn new(width_cells: i32, height_cells: i32, base_interval_ms: u64) -> Result<Self> {
        ensure!(base_interval_ms > 0, "tick interval must be positive");
        Ok(EngineSettings {
            grid: Grid::new(width_cells, height_cells)?,
            base_interval: Duration::from_millis(base_interval_ms),
        })
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            grid: Grid::default(),
            base_interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EngineState {
    Running,
    Paused,
    GameOver,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickResult {
    /// Paused or already over; nothing moved.
    Unchanged,
    Continued { score: usize, length: usize },
    GameOver { final_score: usize },
}

/// Read-only view handed to renderers after each tick.
#[derive(Clone, Debug)]
pub struct Snapshot<'a> {
    pub body: &'a VecDeque<Position>,
    pub food: &'a [Food],
    pub score: usize,
    pub length: usize,
    pub direction: Direction,
    pub state: EngineState,
    pub interval: Duration,
}

pub struct SimulationEngine {
    settings: EngineSettings,
    snake: Snake,
    food: FoodField,
    direction: Direction,
    pending_direction: Option<Direction>,
    interval: Duration,
    state: EngineState,
    rng: StdRng,
}

impl SimulationEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self::from_rng(settings, StdRng::from_entropy())
    }

    /// Same seed, same food sequence, across resets too.
    pub fn with_seed(settings: EngineSettings, seed: u64) -> Self {
        Self::from_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn from_rng(settings: EngineSettings, mut rng: StdRng) -> Self {
        let food = FoodField::new(settings.grid, rng.gen());
        let mut engine = SimulationEngine {
            settings,
            snake: Snake::new(start_position(&settings.grid)),
            food,
            direction: Direction::Right,
            pending_direction: None,
            interval: settings.base_interval,
            state: EngineState::Running,
            rng,
        };
        engine.reset();
        engine
    }

    /// Starts a new round: fresh snake and pool, base speed, running.
    pub fn reset(&mut self) {
        let grid = self.settings.grid;

        self.snake = Snake::new(start_position(&grid));
        self.food = FoodField::new(grid, self.rng.gen());
        self.direction = Direction::Right;
        self.pending_direction = None;
        self.interval = self.settings.base_interval;
        self.state = EngineState::Running;
        self.refill_food();

        crate::log!("New round on a {}x{} grid", grid.width(), grid.height());
    }

    /// Queues a turn for the next tick. Reversals into the neck are ignored.
    pub fn set_direction(&mut self, direction: Direction) {
        if self.state == EngineState::GameOver || direction.is_opposite(self.direction) {
            return;
        }
        self.pending_direction = Some(direction);
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            EngineState::Running => EngineState::Paused,
            EngineState::Paused => EngineState::Running,
            EngineState::GameOver => EngineState::GameOver,
        };
    }

    pub fn tick(&mut self) -> TickResult {
        if self.state != EngineState::Running {
            return TickResult::Unchanged;
        }

        if let Some(direction) = self.pending_direction.take() {
            self.direction = direction;
        }

        let grid = self.settings.grid;
        let new_head = self.snake.advance(self.direction);

        if !grid.in_bounds(new_head) {
            let final_score = self.score();
            self.state = EngineState::GameOver;
            crate::log!("Hit the wall at ({}, {}), final score {}", new_head.x, new_head.y, final_score);
            return TickResult::GameOver { final_score };
        }

        self.snake.grow(new_head);

        match self.food.consume_at(new_head) {
            Some(category) => {
                match category {
                    FoodCategory::Growth => {}
                    FoodCategory::Penalty => self.snake.apply_penalty(),
                    FoodCategory::Bonus => self.snake.apply_bonus(self.direction, &grid),
                }
                self.refill_food();
            }
            None => self.snake.shrink_tail(),
        }

        // Effects first, then the bite: a bonus tail can be bitten off in the same tick.
        if self.snake.self_collision_truncate() {
            crate::log!("Bit own tail at ({}, {}), length now {}", new_head.x, new_head.y, self.snake.len());
        }

        self.adjust_interval();

        TickResult::Continued { score: self.score(), length: self.snake.len() }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            body: self.snake.body(),
            food: self.food.items(),
            score: self.score(),
            length: self.snake.len(),
            direction: self.direction,
            state: self.state,
            interval: self.interval,
        }
    }

    pub fn score(&self) -> usize {
        self.snake.len() - 1
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn grid(&self) -> Grid {
        self.settings.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &FoodField {
        &self.food
    }

    fn refill_food(&mut self) {
        let occupied: HashSet<Position> = self.snake.body().iter().copied().collect();
        let rerolled = self.food.ensure_populated(&occupied);
        if rerolled > 0 {
            crate::log!("Re-rolled {} penalty food item(s) over the cap", rerolled);
        }
    }

    fn adjust_interval(&mut self) {
        let score = self.score();
        if score == 0 || score % POINTS_PER_SPEEDUP != 0 {
            return;
        }

        let base = self.settings.base_interval.as_millis() as u64;
        let faster = base.saturating_sub((score / POINTS_PER_SPEEDUP) as u64 * INTERVAL_STEP_MS);
        self.interval = Duration::from_millis(max(MIN_INTERVAL_MS, faster));
    }
}

fn start_position(grid: &Grid) -> Position {
    Position::new(ORIGIN.x.min(grid.width() - 1), ORIGIN.y.min(grid.height() - 1))
}

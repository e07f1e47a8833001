//! Grid snake with a multi-item food pool.
//!
//! The simulation lives in [`engine`] and is driven one [`engine::SimulationEngine::tick`]
//! at a time; it never touches the terminal. [`config`], [`scores`], [`input`] and
//! [`logger`] are the collaborators the terminal binary wires around it.

pub mod config;
pub mod engine;
pub mod food;
pub mod grid;
pub mod input;
pub mod logger;
pub mod scores;
pub mod snake;

pub use engine::{EngineSettings, EngineState, SimulationEngine, Snapshot, TickResult};
pub use food::{Food, FoodCategory, FoodField};
pub use grid::{Grid, Position};
pub use snake::{Direction, Snake};

#![deny(
    warnings,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs
)]
//! Core simulation types for a tile-based snake game played on the surface
//! of a cube: six square grids topologically joined along their edges.
//! The goal is an exact, exhaustively-enumerated model of direction and
//! position on the cube, where which face is "up" after crossing an edge
//! depends on which edge was crossed and in which orientation, and a single
//! wrong case produces a silently wrong board. On top of that sits the
//! discrete tick state machine that advances the snake inside a
//! continuously interpolated animation clock.
//! Rendering, menus, audio and input decoding are collaborators that consume
//! this crate's tiles and stats; none of them live here.
//! ```
//! use cubesnake_core::direction::Direction3;
//! use cubesnake_core::model::{Model, ModelConfig};
//! use cubesnake_core::types::{Direction2, TickInstruments};
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! struct Instruments;
//!
//! impl TickInstruments for Instruments {
//!     fn observe_tick(&self, _: Duration) {}
//! }
//!
//! let mut model = Model::new(ModelConfig::default()).unwrap();
//! model.change_direction(Direction3::Up, Direction2::Left);
//! model.update(0.5, &Instruments);
//! assert!(!model.is_game_over());
//! ```

pub mod direction;
pub mod model;
pub mod position;
pub mod tile_grid;
pub mod types;

use model::ModelConfig;

/// Loads a model configuration from a JSON string; missing fields take
/// their defaults
/// ```
/// let config = cubesnake_core::config_fixture(r#"{"grid_width": 8}"#);
/// assert_eq!(config.grid_width, 8);
/// ```
pub fn config_fixture(config: &str) -> ModelConfig {
    let config: Result<ModelConfig, _> = serde_json::from_str(config);
    config.expect("the json literal is valid")
}

//! Detection engine: turn state machine, candidate scanner, parameters.
//!
//! Modules
//! - [`params`] – configuration types for every heuristic threshold.
//! - `scanner` – the bounded forward scan locating a settled dart.
//! - `pipeline` – the [`DartDetector`] turn machine.
pub mod params;
mod pipeline;
mod scanner;

pub use params::{DartParams, SubtractorParams};
pub use pipeline::DartDetector;

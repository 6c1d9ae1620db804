//! randwalk - discrete-time random walk simulation
//!
//! Simulates n-dimensional random walks under configurable movement rules
//! (five walker variants), environmental constraints (obstacles and magic
//! gates), and restart/termination policies, then aggregates statistics
//! across repeated independent runs.

pub mod config;
pub mod coord;
pub mod environment;
pub mod error;
pub mod plot;
pub mod report;
pub mod restart;
pub mod runner;
pub mod step;
pub mod trajectory;
pub mod walker;

// Re-export main types
pub use config::{load_config, SimulationSpec, WalkerKind};
pub use coord::Coord;
pub use environment::Environment;
pub use error::EngineError;
pub use restart::RestartPolicy;
pub use runner::{SimulationResult, SimulationRunner};
pub use step::StepPolicy;
pub use trajectory::Trajectory;
pub use walker::Walker;

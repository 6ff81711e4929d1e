//! Host-facing surface: the scale/container registries and the engine
//! facade that ties them to the interaction history.

pub mod engine;
pub mod state;

pub use engine::InteractionEngine;
pub use state::{AnyScale, DATA_GETTER, PlotState};

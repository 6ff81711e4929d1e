//! replot-rs: interaction history engine for linked visualizations.
//!
//! This crate provides the non-rendering core of an explorable plot system:
//! scales with filter/sort/color state, synchronous update fan-out, and a
//! serializable undo/redo log replayed through typed commands.

pub mod api;
pub mod core;
pub mod data;
pub mod error;
pub mod history;
pub mod telemetry;

pub use api::{InteractionEngine, PlotState};
pub use error::{ReplotError, ReplotResult};

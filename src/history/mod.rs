//! Interaction history: serializable events, replayable commands, and the
//! undo/redo stack that navigates them.

pub mod command;
pub mod event;
pub mod kinds;
pub mod stack;
pub mod targets;

pub use command::ScaleCommand;
pub use event::{DeferredParam, EventParam, HistoryEvent};
pub use kinds::{ActionName, EventSubtype, EventType};
pub use stack::{HistoryStack, ResolvedParams, replay, resolve_params};
pub use targets::{EventTargets, ScaleTarget};

use serde_json::Value;
use tracing::warn;

use crate::data::DataPayload;
use crate::error::{ReplotError, ReplotResult};
use crate::history::{HistoryEvent, HistoryStack, stack};

use super::PlotState;

/// Main orchestration facade consumed by host applications.
///
/// `InteractionEngine` pairs the registries in [`PlotState`] with a
/// [`HistoryStack`], so every dispatched interaction mutates the live
/// scales and lands in the undo/redo log in one step.
#[derive(Debug, Default)]
pub struct InteractionEngine {
    state: PlotState,
    history: HistoryStack,
}

impl InteractionEngine {
    #[must_use]
    pub fn new(state: PlotState) -> Self {
        Self {
            state,
            history: HistoryStack::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &PlotState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PlotState {
        &mut self.state
    }

    #[must_use]
    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Delivers a payload to the registries without touching the history.
    pub fn apply_payload(&mut self, payload: DataPayload) {
        self.state.apply_payload(payload);
    }

    /// Parses and delivers a payload serialized as JSON.
    pub fn apply_payload_json_str(&mut self, input: &str) -> ReplotResult<()> {
        let payload: DataPayload = serde_json::from_str(input)
            .map_err(|e| ReplotError::InvalidData(format!("failed to parse payload json: {e}")))?;
        self.apply_payload(payload);
        Ok(())
    }

    /// Applies an event to its target and records it as the newest history
    /// entry.
    ///
    /// Malformed events fail before anything is recorded. An event whose
    /// target is not registered is still recorded, the way any valid
    /// interaction is, and only the application step is skipped.
    pub fn dispatch(&mut self, event: HistoryEvent) -> ReplotResult<()> {
        match stack::replay(&event, &mut self.state) {
            Ok(()) => {}
            Err(err @ ReplotError::UnknownTarget { .. }) => {
                warn!(
                    error = %err,
                    action = %event.action(),
                    id = event.id(),
                    "dispatching event without a live target"
                );
            }
            Err(err) => return Err(err),
        }
        self.history.push(event);
        Ok(())
    }

    /// Records an event that was already applied through direct scale calls.
    pub fn record(&mut self, event: HistoryEvent) {
        self.history.push(event);
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        self.history.can_go_forward()
    }

    pub fn go_back(&mut self) {
        self.history.go_back(&mut self.state);
    }

    pub fn go_forward(&mut self) {
        self.history.go_forward(&mut self.state);
    }

    /// Replays every remaining un-applied entry, typically right after an
    /// import.
    pub fn replay_all(&mut self) {
        while self.history.can_go_forward() {
            self.history.go_forward(&mut self.state);
        }
    }

    /// Exports the applied portion of the history as serializable records.
    pub fn export(&mut self) -> ReplotResult<Vec<Value>> {
        self.history.export()
    }

    pub fn export_json_pretty(&mut self) -> ReplotResult<String> {
        let records = self.export()?;
        serde_json::to_string_pretty(&records).map_err(|e| {
            ReplotError::InvalidData(format!("failed to serialize history export: {e}"))
        })
    }

    /// Imports previously exported records into an empty history. The log
    /// is not applied yet; step through it with [`InteractionEngine::go_forward`]
    /// or [`InteractionEngine::replay_all`].
    pub fn import(&mut self, records: Vec<Value>) -> ReplotResult<()> {
        self.history.import(records)
    }

    pub fn import_json_str(&mut self, input: &str) -> ReplotResult<()> {
        let records: Vec<Value> = serde_json::from_str(input).map_err(|e| {
            ReplotError::InvalidData(format!("failed to parse history import json: {e}"))
        })?;
        self.import(records)
    }
}

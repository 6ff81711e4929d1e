use serde_json::Value;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::error::{ReplotError, ReplotResult};

use super::command::ScaleCommand;
use super::event::{EventParam, HistoryEvent};
use super::kinds::EventType;
use super::targets::EventTargets;

/// The interaction log: an append-only event sequence plus a movable
/// pointer at the last applied entry.
///
/// Prior states are never snapshotted. Undo locates the nearest earlier
/// related event and replays it; when none exists it replays a synthesized
/// reset, which is how navigation returns to the initial state without the
/// log ever recording that state. Redo replays the next entry. Pushing while
/// redo entries exist prunes them first.
#[derive(Debug, Default)]
pub struct HistoryStack {
    stack: Vec<HistoryEvent>,
    pointer: Option<usize>,
}

impl HistoryStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[HistoryEvent] {
        &self.stack
    }

    /// Index of the last applied event, or `None` when nothing is applied.
    #[must_use]
    pub fn pointer(&self) -> Option<usize> {
        self.pointer
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Appends an event as the newest entry, discarding any redo suffix
    /// first and moving the pointer onto the new entry.
    pub fn push(&mut self, event: HistoryEvent) {
        if self.can_go_forward() {
            self.prune();
        }
        debug!(
            action = %event.action(),
            id = event.id(),
            depth = self.stack.len() + 1,
            "recording history event"
        );
        self.stack.push(event);
        self.pointer = Some(self.pointer.map_or(0, |p| p + 1));
    }

    /// Drops every entry beyond the pointer; with no pointer the whole
    /// stack is cleared.
    pub fn prune(&mut self) {
        match self.pointer {
            None => self.stack.clear(),
            Some(pointer) => self.stack.truncate(pointer + 1),
        }
    }

    /// Removes and returns the newest entry, stepping the pointer back.
    pub fn pop(&mut self) -> Option<HistoryEvent> {
        self.pointer = match self.pointer {
            Some(0) | None => None,
            Some(pointer) => Some(pointer - 1),
        };
        self.stack.pop()
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.pointer.is_some()
    }

    /// True whenever an un-replayed suffix exists, including a freshly
    /// imported log that has not been stepped into yet.
    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        match self.pointer {
            None => !self.stack.is_empty(),
            Some(pointer) => pointer + 1 < self.stack.len(),
        }
    }

    /// Nearest event before `pointer` related to `event`; when none exists,
    /// a synthesized reset for the event's subtype.
    #[must_use]
    pub fn get_prev_related(&self, event: &HistoryEvent, pointer: usize) -> HistoryEvent {
        self.stack[..pointer]
            .iter()
            .rev()
            .find(|earlier| event.is_related(earlier))
            .cloned()
            .unwrap_or_else(|| event.to_reset())
    }

    /// Undo: replays the nearest event related to the currently pointed-to
    /// one (or its synthesized reset) and steps the pointer back.
    pub fn go_back(&mut self, targets: &mut impl EventTargets) {
        let Some(pointer) = self.pointer else {
            return;
        };
        let current = self.stack[pointer].clone();
        let previous = self.get_prev_related(&current, pointer);
        self.pointer = pointer.checked_sub(1);
        self.execute(&previous, targets);
    }

    /// Redo: advances the pointer and replays the event it lands on.
    pub fn go_forward(&mut self, targets: &mut impl EventTargets) {
        if !self.can_go_forward() {
            return;
        }
        let next = self.pointer.map_or(0, |p| p + 1);
        self.pointer = Some(next);
        let event = self.stack[next].clone();
        self.execute(&event, targets);
    }

    /// Replays one event against the registered targets. Failures are
    /// reported and swallowed: a log entry that cannot be replayed must not
    /// take the interface down, and the pointer has already moved by the
    /// time this runs.
    pub fn execute(&self, event: &HistoryEvent, targets: &mut impl EventTargets) {
        if let Err(err) = replay(event, targets) {
            warn!(
                error = %err,
                event_type = %event.event_type(),
                action = %event.action(),
                id = event.id(),
                "skipping history event that could not be replayed"
            );
        }
    }

    /// Serializes entries from the start through the pointer, pruning the
    /// redo suffix first; redo-only entries are never exported.
    pub fn export(&mut self) -> ReplotResult<Vec<Value>> {
        self.prune();
        self.stack.iter().map(HistoryEvent::to_json).collect()
    }

    /// Rebuilds the log from exported records. The stack must be empty and
    /// the pointer stays unset: the caller replays the log with
    /// [`HistoryStack::go_forward`] to reapply it.
    pub fn import(&mut self, records: Vec<Value>) -> ReplotResult<()> {
        if !self.stack.is_empty() {
            return Err(ReplotError::ImportIntoNonEmpty {
                len: self.stack.len(),
            });
        }
        self.stack = records
            .into_iter()
            .map(HistoryEvent::from_json)
            .collect::<ReplotResult<Vec<_>>>()?;
        debug!(depth = self.stack.len(), "imported history log");
        Ok(())
    }
}

/// Flat list of replay-ready parameter values. Events rarely carry more
/// than a handful, so resolution stays off the heap for the common case.
pub type ResolvedParams = SmallVec<[Value; 4]>;

/// Replaces every deferred parameter with the live value of its getter;
/// literals pass through unchanged. Runs fresh on every execution.
pub fn resolve_params(
    event: &HistoryEvent,
    targets: &impl EventTargets,
) -> ReplotResult<ResolvedParams> {
    event
        .params()
        .iter()
        .map(|param| match param {
            EventParam::Literal(value) => Ok(value.clone()),
            EventParam::Deferred(deferred) => targets.computed(&deferred.getter, &deferred.args),
        })
        .collect()
}

/// Resolves an event's parameters, decodes its command, and applies it to
/// the matching target.
pub fn replay(event: &HistoryEvent, targets: &mut impl EventTargets) -> ReplotResult<()> {
    let params = resolve_params(event, targets)?;
    let command = ScaleCommand::decode(event.action(), &params)?;
    match event.event_type() {
        EventType::Scale => {
            let Some(target) = targets.scale(event.id()) else {
                return Err(ReplotError::UnknownTarget {
                    kind: "scale",
                    id: event.id().to_owned(),
                });
            };
            command.apply(target)
        }
        // No target registry exists for data events; they are recorded for
        // the log but cannot be replayed.
        EventType::Data => Err(ReplotError::UnknownTarget {
            kind: "data",
            id: event.id().to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::HistoryStack;
    use crate::error::{ReplotError, ReplotResult};
    use crate::history::event::{EventParam, HistoryEvent};
    use crate::history::kinds::{ActionName, EventSubtype, EventType};
    use crate::history::targets::{EventTargets, ScaleTarget};

    struct NoTargets;

    impl EventTargets for NoTargets {
        fn scale(&mut self, _id: &str) -> Option<ScaleTarget<'_>> {
            None
        }

        fn computed(&self, getter: &str, _args: &[Value]) -> ReplotResult<Value> {
            Err(ReplotError::UnknownGetter {
                key: getter.to_owned(),
            })
        }
    }

    fn zoom(id: &str, min: u64, max: u64) -> HistoryEvent {
        HistoryEvent::new(
            EventType::Scale,
            EventSubtype::Filter,
            id,
            ActionName::Zoom,
            vec![EventParam::literal(min), EventParam::literal(max)],
        )
    }

    #[test]
    fn push_always_lands_on_the_newest_entry() {
        let mut stack = HistoryStack::new();
        assert!(!stack.can_go_back());
        assert!(!stack.can_go_forward());

        stack.push(zoom("sample_id", 0, 2));
        stack.push(zoom("sample_id", 1, 3));
        assert_eq!(stack.pointer(), Some(1));
        assert!(!stack.can_go_forward());
        assert!(stack.can_go_back());
    }

    #[test]
    fn push_prunes_the_redo_suffix() {
        let mut stack = HistoryStack::new();
        stack.push(zoom("a", 0, 1));
        stack.push(zoom("a", 1, 2));
        stack.push(zoom("a", 2, 3));
        stack.go_back(&mut NoTargets);
        stack.go_back(&mut NoTargets);
        assert_eq!(stack.pointer(), Some(0));
        assert!(stack.can_go_forward());

        stack.push(zoom("a", 3, 4));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pointer(), Some(1));
        assert!(!stack.can_go_forward());
    }

    #[test]
    fn prune_without_pointer_clears_everything() {
        let mut stack = HistoryStack::new();
        stack.push(zoom("a", 0, 1));
        stack.go_back(&mut NoTargets);
        assert_eq!(stack.pointer(), None);
        assert!(stack.can_go_forward());

        stack.push(zoom("a", 1, 2));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.pointer(), Some(0));
    }

    #[test]
    fn pop_steps_the_pointer_back() {
        let mut stack = HistoryStack::new();
        stack.push(zoom("a", 0, 1));
        stack.push(zoom("a", 1, 2));

        let popped = stack.pop().expect("entry");
        assert_eq!(popped, zoom("a", 1, 2));
        assert_eq!(stack.pointer(), Some(0));

        stack.pop();
        assert_eq!(stack.pointer(), None);
        assert!(stack.pop().is_none());
    }

    #[test]
    fn prev_related_skips_unrelated_entries() {
        let mut stack = HistoryStack::new();
        stack.push(zoom("sample_id", 0, 2));
        stack.push(zoom("signatures", 0, 5));
        stack.push(zoom("sample_id", 1, 3));

        let current = stack.events()[2].clone();
        let previous = stack.get_prev_related(&current, 2);
        assert_eq!(previous, zoom("sample_id", 0, 2));
    }

    #[test]
    fn prev_related_synthesizes_a_reset_at_the_log_start() {
        let mut stack = HistoryStack::new();
        stack.push(zoom("sample_id", 0, 2));

        let current = stack.events()[0].clone();
        let previous = stack.get_prev_related(&current, 0);
        assert_eq!(previous.action(), ActionName::ResetFilter);
        assert!(previous.params().is_empty());
    }

    #[test]
    fn failed_replay_keeps_pointer_movement_consistent() {
        let mut stack = HistoryStack::new();
        stack.push(zoom("missing", 0, 2));
        stack.push(zoom("missing", 1, 3));

        stack.go_back(&mut NoTargets);
        assert_eq!(stack.pointer(), Some(0));
        stack.go_forward(&mut NoTargets);
        assert_eq!(stack.pointer(), Some(1));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn export_prunes_the_redo_suffix() {
        let mut stack = HistoryStack::new();
        stack.push(zoom("a", 0, 1));
        stack.push(zoom("a", 1, 2));
        stack.go_back(&mut NoTargets);

        let records = stack.export().expect("export");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["action"], json!("zoom"));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn import_requires_an_empty_stack_and_keeps_the_pointer_unset() {
        let mut source = HistoryStack::new();
        source.push(zoom("a", 0, 1));
        source.push(zoom("a", 1, 2));
        let records = source.export().expect("export");

        let mut fresh = HistoryStack::new();
        fresh.import(records.clone()).expect("import");
        assert_eq!(fresh.len(), 2);
        assert_eq!(fresh.pointer(), None);
        assert!(fresh.can_go_forward());
        assert!(!fresh.can_go_back());

        assert!(matches!(
            fresh.import(records),
            Err(ReplotError::ImportIntoNonEmpty { len: 2 }),
        ));
    }

    #[test]
    fn import_rejects_malformed_records() {
        let mut stack = HistoryStack::new();
        let err = stack.import(vec![json!({ "type": "SCALE", "id": "a" })]);
        assert!(err.is_err());
        assert!(stack.is_empty());
    }
}

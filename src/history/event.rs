use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ReplotError, ReplotResult};

use super::kinds::{ActionName, EventSubtype, EventType};

/// One parameter of a history event.
///
/// A literal is stored verbatim. A deferred parameter is a marker that names
/// a registered getter; it is resolved fresh on every execution so the value
/// reflects live state, never the state at record time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventParam {
    Deferred(DeferredParam),
    Literal(Value),
}

impl EventParam {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    pub fn deferred(getter: impl Into<String>, args: Vec<Value>) -> Self {
        Self::Deferred(DeferredParam {
            computed: DeferredTag,
            getter: getter.into(),
            args,
        })
    }

    #[must_use]
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }
}

impl From<Value> for EventParam {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

/// Wire shape of a deferred parameter:
/// `{ "computed": true, "getter": "<key>", "args": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeferredParam {
    computed: DeferredTag,
    pub getter: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

/// Sentinel field that only ever serializes to the literal `true`; any other
/// value fails to parse, which is what keeps ordinary objects carrying a
/// `computed` key from being mistaken for markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DeferredTag;

impl Serialize for DeferredTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(true)
    }
}

impl<'de> Deserialize<'de> for DeferredTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match bool::deserialize(deserializer)? {
            true => Ok(Self),
            false => Err(de::Error::custom("deferred marker must be `true`")),
        }
    }
}

/// An immutable record of one user action: what kind of state it touched,
/// which target it addressed, and the invocation to replay.
///
/// Two events are related iff their type, subtype, and id all match; undo
/// navigation walks the log along that relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    #[serde(rename = "type")]
    event_type: EventType,
    subtype: EventSubtype,
    id: String,
    action: ActionName,
    #[serde(default)]
    params: Vec<EventParam>,
}

impl HistoryEvent {
    pub fn new(
        event_type: EventType,
        subtype: EventSubtype,
        id: impl Into<String>,
        action: ActionName,
        params: Vec<EventParam>,
    ) -> Self {
        Self {
            event_type,
            subtype,
            id: id.into(),
            action,
            params,
        }
    }

    #[must_use]
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    #[must_use]
    pub fn subtype(&self) -> EventSubtype {
        self.subtype
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn action(&self) -> ActionName {
        self.action
    }

    #[must_use]
    pub fn params(&self) -> &[EventParam] {
        &self.params
    }

    /// Whether `other` targets the same kind of state on the same object.
    #[must_use]
    pub fn is_related(&self, other: &HistoryEvent) -> bool {
        self.event_type == other.event_type
            && self.subtype == other.subtype
            && self.id == other.id
    }

    /// The reset event synthesized when no earlier related event exists:
    /// same type, subtype, and id, with the subtype's reset action and no
    /// parameters.
    #[must_use]
    pub fn to_reset(&self) -> HistoryEvent {
        Self::new(
            self.event_type,
            self.subtype,
            self.id.clone(),
            self.subtype.reset_action(),
            Vec::new(),
        )
    }

    pub fn to_json(&self) -> ReplotResult<Value> {
        serde_json::to_value(self)
            .map_err(|e| ReplotError::InvalidData(format!("failed to serialize history event: {e}")))
    }

    pub fn from_json(value: Value) -> ReplotResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| ReplotError::InvalidData(format!("failed to parse history event: {e}")))
    }
}

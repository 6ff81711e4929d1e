use thiserror::Error;

pub type ReplotResult<T> = Result<T, ReplotError>;

#[derive(Debug, Error)]
pub enum ReplotError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("no getter registered for computed-parameter key `{key}`")]
    UnknownGetter { key: String },

    #[error("no {kind} registered under id `{id}`")]
    UnknownTarget { kind: &'static str, id: String },

    #[error("action `{action}` is not supported by {kind} targets")]
    UnsupportedAction {
        action: &'static str,
        kind: &'static str,
    },

    #[error("history import requires an empty stack (stack holds {len} events)")]
    ImportIntoNonEmpty { len: usize },

    #[error("hierarchy has no subtree named `{0}`")]
    UnknownHierarchyRoot(String),

    #[error("unknown chromosome `{0}`")]
    UnknownChromosome(String),
}

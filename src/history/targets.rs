use serde_json::Value;

use crate::core::{CategoricalScale, ContinuousScale, GenomeScale};
use crate::error::ReplotResult;

/// Mutable view of one replay target, resolved by id just before a command
/// is applied. Binary scales replay through their categorical view.
#[derive(Debug)]
pub enum ScaleTarget<'a> {
    Categorical(&'a mut CategoricalScale),
    Continuous(&'a mut ContinuousScale),
    Genome(&'a mut GenomeScale),
}

impl ScaleTarget<'_> {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Categorical(_) => "categorical scale",
            Self::Continuous(_) => "continuous scale",
            Self::Genome(_) => "genome scale",
        }
    }
}

/// Registries the history stack consults while executing an event: target
/// resolution by id and getter resolution for deferred parameters.
///
/// The stack never owns its targets; a mutable registry is handed in per
/// navigation call.
pub trait EventTargets {
    /// Resolves a scale-typed target by id. `None` means the id is not
    /// registered; the stack reports it and skips the event.
    fn scale(&mut self, id: &str) -> Option<ScaleTarget<'_>>;

    /// Invokes the getter registered under `getter` with `args`, producing
    /// the live value a deferred parameter stands for.
    fn computed(&self, getter: &str, args: &[Value]) -> ReplotResult<Value>;
}

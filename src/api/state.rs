use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::{BinaryScale, CategoricalScale, ContinuousScale, DomainValue, GenomeScale, Scale};
use crate::data::{DataContainer, DataPayload};
use crate::error::{ReplotError, ReplotResult};
use crate::history::{EventTargets, ScaleTarget};

/// Getter name resolved against the data container registry instead of the
/// user-registered getters.
pub const DATA_GETTER: &str = "getData";

type ComputedGetter = Box<dyn Fn(&[Value]) -> ReplotResult<Value>>;

/// Owned form of any scale variant, as stored in the registry.
pub enum AnyScale {
    Categorical(CategoricalScale),
    Binary(BinaryScale),
    Continuous(ContinuousScale),
    Genome(GenomeScale),
}

impl AnyScale {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Categorical(scale) => scale.id(),
            Self::Binary(scale) => scale.id(),
            Self::Continuous(scale) => scale.id(),
            Self::Genome(scale) => scale.id(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Categorical(scale) => scale.name(),
            Self::Binary(scale) => scale.name(),
            Self::Continuous(scale) => scale.name(),
            Self::Genome(scale) => scale.name(),
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        match self {
            Self::Categorical(scale) => scale.is_loading(),
            Self::Binary(scale) => scale.is_loading(),
            Self::Continuous(scale) => scale.is_loading(),
            Self::Genome(_) => false,
        }
    }

    /// Borrows the variant as a replay target. Binary scales replay through
    /// their categorical behavior.
    pub fn as_target(&mut self) -> ScaleTarget<'_> {
        match self {
            Self::Categorical(scale) => ScaleTarget::Categorical(scale),
            Self::Binary(scale) => ScaleTarget::Categorical(scale.as_categorical_mut()),
            Self::Continuous(scale) => ScaleTarget::Continuous(scale),
            Self::Genome(scale) => ScaleTarget::Genome(scale),
        }
    }

    pub fn resolve_domain(&mut self, values: Vec<DomainValue>) {
        match self {
            Self::Categorical(scale) => scale.resolve_domain(values),
            Self::Binary(scale) => scale.as_categorical_mut().resolve_domain(values),
            Self::Continuous(scale) => scale.resolve_domain(values),
            Self::Genome(scale) => {
                debug!(
                    id = scale.id(),
                    "genome scales keep their built-in assembly domain"
                );
            }
        }
    }

    #[must_use]
    pub fn as_categorical(&self) -> Option<&CategoricalScale> {
        match self {
            Self::Categorical(scale) => Some(scale),
            Self::Binary(scale) => Some(scale.as_categorical()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_continuous(&self) -> Option<&ContinuousScale> {
        match self {
            Self::Continuous(scale) => Some(scale),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_genome(&self) -> Option<&GenomeScale> {
        match self {
            Self::Genome(scale) => Some(scale),
            _ => None,
        }
    }
}

impl fmt::Debug for AnyScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self {
            Self::Categorical(_) => "Categorical",
            Self::Binary(_) => "Binary",
            Self::Continuous(_) => "Continuous",
            Self::Genome(_) => "Genome",
        };
        f.debug_struct("AnyScale")
            .field("variant", &variant)
            .field("id", &self.id())
            .finish()
    }
}

impl From<CategoricalScale> for AnyScale {
    fn from(scale: CategoricalScale) -> Self {
        Self::Categorical(scale)
    }
}

impl From<BinaryScale> for AnyScale {
    fn from(scale: BinaryScale) -> Self {
        Self::Binary(scale)
    }
}

impl From<ContinuousScale> for AnyScale {
    fn from(scale: ContinuousScale) -> Self {
        Self::Continuous(scale)
    }
}

impl From<GenomeScale> for AnyScale {
    fn from(scale: GenomeScale) -> Self {
        Self::Genome(scale)
    }
}

/// Registries backing one plot: scales, data containers, and the computed
/// getters history replay resolves deferred parameters against.
///
/// Registration order is preserved, matching the order synchronous update
/// notifications fan out in.
#[derive(Default)]
pub struct PlotState {
    scales: IndexMap<String, AnyScale>,
    containers: IndexMap<String, DataContainer>,
    getters: IndexMap<String, ComputedGetter>,
}

impl PlotState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a scale under its own id, replacing any previous entry
    /// with that id in place.
    pub fn add_scale(&mut self, scale: impl Into<AnyScale>) {
        let scale = scale.into();
        if self.scales.contains_key(scale.id()) {
            debug!(id = scale.id(), "replacing registered scale");
        }
        self.scales.insert(scale.id().to_owned(), scale);
    }

    pub fn add_container(&mut self, container: DataContainer) {
        if self.containers.contains_key(container.id()) {
            debug!(id = container.id(), "replacing registered data container");
        }
        self.containers
            .insert(container.id().to_owned(), container);
    }

    /// Registers a computed getter for deferred history parameters.
    pub fn register_getter(
        &mut self,
        key: impl Into<String>,
        getter: impl Fn(&[Value]) -> ReplotResult<Value> + 'static,
    ) {
        self.getters.insert(key.into(), Box::new(getter));
    }

    #[must_use]
    pub fn get_scale(&self, id: &str) -> Option<&AnyScale> {
        self.scales.get(id)
    }

    pub fn get_scale_mut(&mut self, id: &str) -> Option<&mut AnyScale> {
        self.scales.get_mut(id)
    }

    #[must_use]
    pub fn get_container(&self, id: &str) -> Option<&DataContainer> {
        self.containers.get(id)
    }

    pub fn scales(&self) -> impl Iterator<Item = &AnyScale> {
        self.scales.values()
    }

    pub fn containers(&self) -> impl Iterator<Item = &DataContainer> {
        self.containers.values()
    }

    /// True while any registered scale or container still waits for its
    /// payload.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.scales.values().any(AnyScale::is_loading)
            || self.containers.values().any(DataContainer::is_loading)
    }

    /// Delivers a payload, resolving every pending registry entry it names.
    /// Entries addressed to unregistered ids are reported and skipped.
    pub fn apply_payload(&mut self, payload: DataPayload) {
        for (id, rows) in payload.data {
            match self.containers.get_mut(&id) {
                Some(container) => container.resolve_rows(rows),
                None => warn!(id, "payload rows address an unregistered data container"),
            }
        }
        for (id, values) in payload.scales {
            match self.scales.get_mut(&id) {
                Some(scale) => scale.resolve_domain(values),
                None => warn!(id, "payload domain addresses an unregistered scale"),
            }
        }
    }

    fn container_rows_value(&self, id: &str) -> ReplotResult<Value> {
        let container = self
            .containers
            .get(id)
            .ok_or_else(|| ReplotError::UnknownTarget {
                kind: "data",
                id: id.to_owned(),
            })?;
        Ok(container.rows_value())
    }
}

impl fmt::Debug for PlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotState")
            .field("scales", &self.scales.keys().collect::<Vec<_>>())
            .field("containers", &self.containers.keys().collect::<Vec<_>>())
            .field("getters", &self.getters.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl EventTargets for PlotState {
    fn scale(&mut self, id: &str) -> Option<ScaleTarget<'_>> {
        self.scales.get_mut(id).map(AnyScale::as_target)
    }

    fn computed(&self, getter: &str, args: &[Value]) -> ReplotResult<Value> {
        if getter == DATA_GETTER {
            let id = args.first().and_then(Value::as_str).ok_or_else(|| {
                ReplotError::InvalidData(format!(
                    "{DATA_GETTER} expects a container id as its first argument"
                ))
            })?;
            return self.container_rows_value(id);
        }
        let Some(resolver) = self.getters.get(getter) else {
            return Err(ReplotError::UnknownGetter {
                key: getter.to_owned(),
            });
        };
        resolver(args)
    }
}

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::container::DataRow;
use crate::core::value::DomainValue;

/// Bundle emitted by an external data provider once a fetch completes.
///
/// Keys under `data` address pending [`DataContainer`](super::DataContainer)s
/// by id; keys under `scales` address pending scales by id and carry their
/// resolved domains.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataPayload {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub data: IndexMap<String, Vec<DataRow>>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub scales: IndexMap<String, Vec<DomainValue>>,
}

impl DataPayload {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.scales.is_empty()
    }
}

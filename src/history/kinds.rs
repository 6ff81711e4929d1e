use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of application state a history event applies to. Selects the
/// target registry used to resolve the event's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "SCALE")]
    Scale,
    #[serde(rename = "DATA")]
    Data,
}

impl EventType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scale => "SCALE",
            Self::Data => "DATA",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fine-grained action kind. Events sharing type, subtype, and id are
/// "related"; the subtype also names the reset action synthesized when undo
/// walks past the earliest related event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventSubtype {
    #[serde(rename = "FILTER")]
    Filter,
    #[serde(rename = "SORT")]
    Sort,
    #[serde(rename = "COLOR_SCALE")]
    ColorScale,
    #[serde(rename = "COLOR_OVERRIDE")]
    ColorOverride,
}

impl EventSubtype {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Filter => "FILTER",
            Self::Sort => "SORT",
            Self::ColorScale => "COLOR_SCALE",
            Self::ColorOverride => "COLOR_OVERRIDE",
        }
    }

    /// Action that returns a target to its initial state for this subtype.
    #[must_use]
    pub fn reset_action(self) -> ActionName {
        match self {
            Self::Filter => ActionName::ResetFilter,
            Self::Sort => ActionName::ResetSort,
            Self::ColorScale => ActionName::ResetColorScale,
            Self::ColorOverride => ActionName::ResetColorOverride,
        }
    }
}

impl fmt::Display for EventSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of method names a history event may invoke on its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionName {
    #[serde(rename = "zoom")]
    Zoom,
    #[serde(rename = "filter")]
    Filter,
    #[serde(rename = "sort")]
    Sort,
    #[serde(rename = "sortByHierarchy")]
    SortByHierarchy,
    #[serde(rename = "filterByHierarchy")]
    FilterByHierarchy,
    #[serde(rename = "setDomain")]
    SetDomain,
    #[serde(rename = "setDomainFiltered")]
    SetDomainFiltered,
    #[serde(rename = "setColorScaleByKey")]
    SetColorScaleByKey,
    #[serde(rename = "setColorOverrides")]
    SetColorOverrides,
    #[serde(rename = "filterByChromosome")]
    FilterByChromosome,
    #[serde(rename = "filterByChromosomeAndPosition")]
    FilterByChromosomeAndPosition,
    #[serde(rename = "resetFilter")]
    ResetFilter,
    #[serde(rename = "resetSort")]
    ResetSort,
    #[serde(rename = "resetColorScale")]
    ResetColorScale,
    #[serde(rename = "resetColorOverride")]
    ResetColorOverride,
    #[serde(rename = "reset")]
    Reset,
}

impl ActionName {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zoom => "zoom",
            Self::Filter => "filter",
            Self::Sort => "sort",
            Self::SortByHierarchy => "sortByHierarchy",
            Self::FilterByHierarchy => "filterByHierarchy",
            Self::SetDomain => "setDomain",
            Self::SetDomainFiltered => "setDomainFiltered",
            Self::SetColorScaleByKey => "setColorScaleByKey",
            Self::SetColorOverrides => "setColorOverrides",
            Self::FilterByChromosome => "filterByChromosome",
            Self::FilterByChromosomeAndPosition => "filterByChromosomeAndPosition",
            Self::ResetFilter => "resetFilter",
            Self::ResetSort => "resetSort",
            Self::ResetColorScale => "resetColorScale",
            Self::ResetColorOverride => "resetColorOverride",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

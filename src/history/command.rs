use indexmap::IndexMap;
use serde_json::Value;

use crate::core::color::Color;
use crate::core::hierarchy::HierarchyNode;
use crate::core::scale::Scale;
use crate::core::value::DomainValue;
use crate::data::DataRow;
use crate::error::{ReplotError, ReplotResult};

use super::kinds::ActionName;
use super::targets::ScaleTarget;

/// A fully decoded scale invocation: the action tag plus strongly typed
/// parameters.
///
/// Decoding happens after deferred parameters are resolved, so a malformed
/// parameter list surfaces as a typed error instead of a bad method call.
/// Applying a command to a target kind that does not support it is also a
/// typed error; the stack reports both and leaves the target untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleCommand {
    Zoom { min: f64, max: f64 },
    Filter { indices: Vec<usize> },
    Sort {
        rows: Vec<DataRow>,
        variable_key: String,
        ascending: bool,
    },
    SortByHierarchy {
        hierarchy: HierarchyNode,
        root: Option<String>,
    },
    FilterByHierarchy {
        hierarchy: HierarchyNode,
        root: Option<String>,
    },
    SetDomain { values: Vec<DomainValue> },
    SetDomainFiltered { values: Vec<DomainValue> },
    SetColorScaleByKey { key: String },
    SetColorOverrides {
        overrides: IndexMap<String, Color>,
    },
    FilterByChromosome { chromosome: String },
    FilterByChromosomeAndPosition {
        chromosome: String,
        start: u64,
        end: u64,
    },
    ResetFilter,
    ResetSort,
    ResetColorScale,
    ResetColorOverride,
    Reset,
}

impl ScaleCommand {
    /// Decodes an action and its resolved parameter list into a command.
    pub fn decode(action: ActionName, params: &[Value]) -> ReplotResult<Self> {
        match action {
            ActionName::Zoom => Ok(Self::Zoom {
                min: number_param(action, params, 0)?,
                max: number_param(action, params, 1)?,
            }),
            ActionName::Filter => Ok(Self::Filter {
                indices: index_list_param(action, params, 0)?,
            }),
            ActionName::Sort => Ok(Self::Sort {
                rows: row_list_param(action, params, 0)?,
                variable_key: string_param(action, params, 1)?,
                ascending: optional_bool_param(action, params, 2, true)?,
            }),
            ActionName::SortByHierarchy => Ok(Self::SortByHierarchy {
                hierarchy: hierarchy_param(action, params, 0)?,
                root: optional_string_param(action, params, 1)?,
            }),
            ActionName::FilterByHierarchy => Ok(Self::FilterByHierarchy {
                hierarchy: hierarchy_param(action, params, 0)?,
                root: optional_string_param(action, params, 1)?,
            }),
            ActionName::SetDomain => Ok(Self::SetDomain {
                values: domain_list_param(action, params, 0)?,
            }),
            ActionName::SetDomainFiltered => Ok(Self::SetDomainFiltered {
                values: domain_list_param(action, params, 0)?,
            }),
            ActionName::SetColorScaleByKey => Ok(Self::SetColorScaleByKey {
                key: string_param(action, params, 0)?,
            }),
            ActionName::SetColorOverrides => Ok(Self::SetColorOverrides {
                overrides: overrides_param(action, params, 0)?,
            }),
            ActionName::FilterByChromosome => Ok(Self::FilterByChromosome {
                chromosome: string_param(action, params, 0)?,
            }),
            ActionName::FilterByChromosomeAndPosition => Ok(Self::FilterByChromosomeAndPosition {
                chromosome: string_param(action, params, 0)?,
                start: position_param(action, params, 1)?,
                end: position_param(action, params, 2)?,
            }),
            ActionName::ResetFilter => Ok(Self::ResetFilter),
            ActionName::ResetSort => Ok(Self::ResetSort),
            ActionName::ResetColorScale => Ok(Self::ResetColorScale),
            ActionName::ResetColorOverride => Ok(Self::ResetColorOverride),
            ActionName::Reset => Ok(Self::Reset),
        }
    }

    /// The wire action this command decodes from.
    #[must_use]
    pub fn action(&self) -> ActionName {
        match self {
            Self::Zoom { .. } => ActionName::Zoom,
            Self::Filter { .. } => ActionName::Filter,
            Self::Sort { .. } => ActionName::Sort,
            Self::SortByHierarchy { .. } => ActionName::SortByHierarchy,
            Self::FilterByHierarchy { .. } => ActionName::FilterByHierarchy,
            Self::SetDomain { .. } => ActionName::SetDomain,
            Self::SetDomainFiltered { .. } => ActionName::SetDomainFiltered,
            Self::SetColorScaleByKey { .. } => ActionName::SetColorScaleByKey,
            Self::SetColorOverrides { .. } => ActionName::SetColorOverrides,
            Self::FilterByChromosome { .. } => ActionName::FilterByChromosome,
            Self::FilterByChromosomeAndPosition { .. } => {
                ActionName::FilterByChromosomeAndPosition
            }
            Self::ResetFilter => ActionName::ResetFilter,
            Self::ResetSort => ActionName::ResetSort,
            Self::ResetColorScale => ActionName::ResetColorScale,
            Self::ResetColorOverride => ActionName::ResetColorOverride,
            Self::Reset => ActionName::Reset,
        }
    }

    /// Applies the command to a resolved target, bridging each variant to
    /// the scale method it names.
    pub fn apply(self, target: ScaleTarget<'_>) -> ReplotResult<()> {
        let unsupported = |target: &ScaleTarget<'_>, action: ActionName| {
            Err(ReplotError::UnsupportedAction {
                action: action.as_str(),
                kind: target.kind(),
            })
        };

        match self {
            Self::Zoom { min, max } => match target {
                ScaleTarget::Categorical(scale) => {
                    let (min, max) = zoom_indices(min, max)?;
                    scale.zoom(min, max);
                    Ok(())
                }
                ScaleTarget::Continuous(scale) => {
                    scale.zoom(min, max);
                    Ok(())
                }
                genome => unsupported(&genome, ActionName::Zoom),
            },
            Self::Filter { indices } => match target {
                ScaleTarget::Categorical(scale) => {
                    scale.filter(&indices);
                    Ok(())
                }
                other => unsupported(&other, ActionName::Filter),
            },
            Self::Sort {
                rows,
                variable_key,
                ascending,
            } => match target {
                ScaleTarget::Categorical(scale) => {
                    scale.sort_rows(&rows, &variable_key, ascending);
                    Ok(())
                }
                other => unsupported(&other, ActionName::Sort),
            },
            Self::SortByHierarchy { hierarchy, root } => match target {
                ScaleTarget::Categorical(scale) => {
                    scale.sort_by_hierarchy(&hierarchy, root.as_deref())
                }
                other => unsupported(&other, ActionName::SortByHierarchy),
            },
            Self::FilterByHierarchy { hierarchy, root } => match target {
                ScaleTarget::Categorical(scale) => {
                    scale.filter_by_hierarchy(&hierarchy, root.as_deref())
                }
                other => unsupported(&other, ActionName::FilterByHierarchy),
            },
            Self::SetDomain { values } => match target {
                ScaleTarget::Categorical(scale) => {
                    scale.set_domain(values);
                    Ok(())
                }
                ScaleTarget::Continuous(scale) => {
                    scale.set_domain(values);
                    Ok(())
                }
                genome => unsupported(&genome, ActionName::SetDomain),
            },
            Self::SetDomainFiltered { values } => match target {
                ScaleTarget::Categorical(scale) => {
                    scale.set_domain_filtered(values);
                    Ok(())
                }
                ScaleTarget::Continuous(scale) => {
                    scale.set_domain_filtered(values);
                    Ok(())
                }
                genome => unsupported(&genome, ActionName::SetDomainFiltered),
            },
            Self::SetColorScaleByKey { key } => match target {
                ScaleTarget::Categorical(scale) => {
                    scale.set_color_scale_by_key(&key);
                    Ok(())
                }
                ScaleTarget::Continuous(scale) => {
                    scale.set_color_scale_by_key(&key);
                    Ok(())
                }
                genome => unsupported(&genome, ActionName::SetColorScaleByKey),
            },
            Self::SetColorOverrides { overrides } => match target {
                ScaleTarget::Categorical(scale) => {
                    scale.set_color_overrides(overrides);
                    Ok(())
                }
                other => unsupported(&other, ActionName::SetColorOverrides),
            },
            Self::FilterByChromosome { chromosome } => match target {
                ScaleTarget::Genome(scale) => scale.filter_by_chromosome(&chromosome),
                other => unsupported(&other, ActionName::FilterByChromosome),
            },
            Self::FilterByChromosomeAndPosition {
                chromosome,
                start,
                end,
            } => match target {
                ScaleTarget::Genome(scale) => {
                    scale.filter_by_chromosome_and_position(&chromosome, start, end)
                }
                other => unsupported(&other, ActionName::FilterByChromosomeAndPosition),
            },
            Self::ResetFilter => match target {
                ScaleTarget::Categorical(scale) => {
                    scale.reset_filter();
                    Ok(())
                }
                ScaleTarget::Continuous(scale) => {
                    scale.reset_filter();
                    Ok(())
                }
                // The genome scale has a single reset covering its filters.
                ScaleTarget::Genome(scale) => {
                    scale.reset();
                    Ok(())
                }
            },
            Self::ResetSort => match target {
                ScaleTarget::Categorical(scale) => {
                    scale.reset_sort();
                    Ok(())
                }
                other => unsupported(&other, ActionName::ResetSort),
            },
            Self::ResetColorScale => match target {
                ScaleTarget::Categorical(scale) => {
                    scale.reset_color_scale();
                    Ok(())
                }
                ScaleTarget::Continuous(scale) => {
                    scale.reset_color_scale();
                    Ok(())
                }
                genome => unsupported(&genome, ActionName::ResetColorScale),
            },
            Self::ResetColorOverride => match target {
                ScaleTarget::Categorical(scale) => {
                    scale.reset_color_override();
                    Ok(())
                }
                other => unsupported(&other, ActionName::ResetColorOverride),
            },
            Self::Reset => match target {
                ScaleTarget::Genome(scale) => {
                    scale.reset();
                    Ok(())
                }
                other => unsupported(&other, ActionName::Reset),
            },
        }
    }
}

fn param<'a>(action: ActionName, params: &'a [Value], index: usize) -> ReplotResult<&'a Value> {
    params.get(index).ok_or_else(|| {
        ReplotError::InvalidData(format!("action `{action}` is missing parameter {index}"))
    })
}

fn number_param(action: ActionName, params: &[Value], index: usize) -> ReplotResult<f64> {
    param(action, params, index)?.as_f64().ok_or_else(|| {
        ReplotError::InvalidData(format!("action `{action}` expects a number at parameter {index}"))
    })
}

fn string_param(action: ActionName, params: &[Value], index: usize) -> ReplotResult<String> {
    param(action, params, index)?
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| {
            ReplotError::InvalidData(format!(
                "action `{action}` expects a string at parameter {index}"
            ))
        })
}

fn optional_string_param(
    action: ActionName,
    params: &[Value],
    index: usize,
) -> ReplotResult<Option<String>> {
    match params.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => string_param(action, params, index).map(Some),
    }
}

fn optional_bool_param(
    action: ActionName,
    params: &[Value],
    index: usize,
    default: bool,
) -> ReplotResult<bool> {
    match params.get(index) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value.as_bool().ok_or_else(|| {
            ReplotError::InvalidData(format!(
                "action `{action}` expects a boolean at parameter {index}"
            ))
        }),
    }
}

fn position_param(action: ActionName, params: &[Value], index: usize) -> ReplotResult<u64> {
    param(action, params, index)?.as_u64().ok_or_else(|| {
        ReplotError::InvalidData(format!(
            "action `{action}` expects a non-negative integer at parameter {index}"
        ))
    })
}

fn index_list_param(action: ActionName, params: &[Value], index: usize) -> ReplotResult<Vec<usize>> {
    let list = param(action, params, index)?.as_array().ok_or_else(|| {
        ReplotError::InvalidData(format!(
            "action `{action}` expects an index array at parameter {index}"
        ))
    })?;
    list.iter()
        .map(|entry| {
            entry.as_u64().map(|i| i as usize).ok_or_else(|| {
                ReplotError::InvalidData(format!(
                    "action `{action}` expects non-negative indices at parameter {index}"
                ))
            })
        })
        .collect()
}

fn domain_list_param(
    action: ActionName,
    params: &[Value],
    index: usize,
) -> ReplotResult<Vec<DomainValue>> {
    let list = param(action, params, index)?.as_array().ok_or_else(|| {
        ReplotError::InvalidData(format!(
            "action `{action}` expects a value array at parameter {index}"
        ))
    })?;
    list.iter()
        .map(|entry| {
            DomainValue::from_json(entry).ok_or_else(|| {
                ReplotError::InvalidData(format!(
                    "action `{action}` has an unsupported domain value at parameter {index}"
                ))
            })
        })
        .collect()
}

fn row_list_param(action: ActionName, params: &[Value], index: usize) -> ReplotResult<Vec<DataRow>> {
    let list = param(action, params, index)?.as_array().ok_or_else(|| {
        ReplotError::InvalidData(format!(
            "action `{action}` expects a row array at parameter {index}"
        ))
    })?;
    list.iter()
        .map(|entry| {
            entry.as_object().cloned().ok_or_else(|| {
                ReplotError::InvalidData(format!(
                    "action `{action}` expects row objects at parameter {index}"
                ))
            })
        })
        .collect()
}

fn hierarchy_param(
    action: ActionName,
    params: &[Value],
    index: usize,
) -> ReplotResult<HierarchyNode> {
    serde_json::from_value(param(action, params, index)?.clone()).map_err(|e| {
        ReplotError::InvalidData(format!(
            "action `{action}` has a malformed hierarchy at parameter {index}: {e}"
        ))
    })
}

fn overrides_param(
    action: ActionName,
    params: &[Value],
    index: usize,
) -> ReplotResult<IndexMap<String, Color>> {
    serde_json::from_value(param(action, params, index)?.clone()).map_err(|e| {
        ReplotError::InvalidData(format!(
            "action `{action}` has a malformed color override map at parameter {index}: {e}"
        ))
    })
}

fn zoom_indices(min: f64, max: f64) -> ReplotResult<(usize, usize)> {
    let as_index = |bound: f64| {
        (bound.is_finite() && bound >= 0.0 && bound.fract() == 0.0)
            .then_some(bound as usize)
            .ok_or_else(|| {
                ReplotError::InvalidData(format!(
                    "zoom on a discrete scale expects non-negative integer bounds, got {bound}"
                ))
            })
    };
    Ok((as_index(min)?, as_index(max)?))
}

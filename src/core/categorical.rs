use indexmap::IndexMap;

use crate::data::{DataContainer, DataRow, row_field};
use crate::error::{ReplotError, ReplotResult};

use super::color::{Color, ColorScale, UNKNOWN_COLOR};
use super::hierarchy::HierarchyNode;
use super::scale::{DomainInput, Scale, ScaleCore};
use super::value::{DomainValue, UNKNOWN_LABEL};

/// Scale over a discrete, ordered set of values.
///
/// Colors are assigned by normalized domain position, optionally overridden
/// per value. The filtered domain is narrowed by index slices (`zoom`),
/// index sets (`filter`), or hierarchy leaves, and the full domain can be
/// reordered by a data-driven sort or a grouping tree.
#[derive(Debug)]
pub struct CategoricalScale {
    core: ScaleCore,
    human_domain: Vec<String>,
    color_overrides: IndexMap<String, Color>,
    color_overrides_original: IndexMap<String, Color>,
}

impl CategoricalScale {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        domain: impl Into<DomainInput>,
    ) -> Self {
        Self {
            core: ScaleCore::new(id, name, domain.into()),
            human_domain: Vec::new(),
            color_overrides: IndexMap::new(),
            color_overrides_original: IndexMap::new(),
        }
    }

    /// Attaches display labels parallel to the domain. Labels are used only
    /// while their length matches the domain length.
    #[must_use]
    pub fn with_human_domain(
        mut self,
        labels: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.human_domain = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Selects the construction palette by registry key; unknown keys keep
    /// the default.
    #[must_use]
    pub fn with_palette_key(mut self, palette_key: &str) -> Self {
        if let Some(color_scale) = ColorScale::by_key(palette_key) {
            self.core.install_palette(color_scale);
        }
        self
    }

    /// Seeds per-value color overrides, also captured as the reset snapshot.
    #[must_use]
    pub fn with_color_overrides(mut self, overrides: IndexMap<String, Color>) -> Self {
        self.color_overrides = overrides.clone();
        self.color_overrides_original = overrides;
        self
    }

    #[must_use]
    pub fn human_domain(&self) -> &[String] {
        &self.human_domain
    }

    #[must_use]
    pub fn color_overrides(&self) -> &IndexMap<String, Color> {
        &self.color_overrides
    }

    /// Narrows the filtered domain to the contiguous slice
    /// `domain[min_index..=max_index]`. Bounds are inclusive and clamped to
    /// the domain; an inverted range empties the filter.
    pub fn zoom(&mut self, min_index: usize, max_index: usize) {
        let domain = self.core.domain();
        let filtered = if min_index >= domain.len() || min_index > max_index {
            Vec::new()
        } else {
            domain[min_index..=max_index.min(domain.len() - 1)].to_vec()
        };
        self.core.set_domain_filtered(filtered);
    }

    /// Narrows the filtered domain to the values at `indices`, preserving
    /// the order of `indices`. Out-of-range indices are skipped.
    pub fn filter(&mut self, indices: &[usize]) {
        let domain = self.core.domain();
        let filtered = indices
            .iter()
            .filter_map(|&index| domain.get(index).cloned())
            .collect();
        self.core.set_domain_filtered(filtered);
    }

    /// Reorders the domain by each value's `variable_key` field in the
    /// container's rows, matching rows on this scale's id. Missing rows and
    /// unknown values sort as `-1`.
    pub fn sort(&mut self, data: &DataContainer, variable_key: &str, ascending: bool) {
        self.sort_rows(data.rows(), variable_key, ascending);
    }

    pub fn sort_rows(&mut self, rows: &[DataRow], variable_key: &str, ascending: bool) {
        let row_key = self.core.id().to_owned();
        let domain = self.core.domain().to_vec();
        let keys: Vec<f64> = domain
            .iter()
            .map(|value| {
                row_field(rows, &row_key, value, variable_key)
                    .and_then(|field| field.to_number())
                    .unwrap_or(-1.0)
            })
            .collect();

        let mut order: Vec<usize> = (0..domain.len()).collect();
        order.sort_by(|&a, &b| {
            let ord = keys[a].total_cmp(&keys[b]);
            if ascending { ord } else { ord.reverse() }
        });

        let sorted: Vec<DomainValue> = order.into_iter().map(|i| domain[i].clone()).collect();
        let filtered = self.reordered_filtered(&sorted);
        self.core.replace_domains(sorted, filtered);
    }

    /// Reorders the domain to the leaf order of `hierarchy`, optionally
    /// re-rooted at the subtree named `root`, pruned to this scale's values;
    /// the filtered domain is reset to the same order.
    pub fn sort_by_hierarchy(
        &mut self,
        hierarchy: &HierarchyNode,
        root: Option<&str>,
    ) -> ReplotResult<()> {
        let leaves = self.matching_leaves(rooted_subtree(hierarchy, root)?);
        self.core.replace_domains(leaves.clone(), leaves);
        Ok(())
    }

    /// Narrows the filtered domain to the leaf order of `hierarchy`,
    /// optionally re-rooted at the subtree named `root`, pruned to this
    /// scale's values. The full domain is untouched.
    pub fn filter_by_hierarchy(
        &mut self,
        hierarchy: &HierarchyNode,
        root: Option<&str>,
    ) -> ReplotResult<()> {
        let leaves = self.matching_leaves(rooted_subtree(hierarchy, root)?);
        self.core.set_domain_filtered(leaves);
        Ok(())
    }

    /// Replaces the per-value color override map.
    pub fn set_color_overrides(&mut self, overrides: IndexMap<String, Color>) {
        self.color_overrides = overrides;
        self.core.emit_update();
    }

    /// Restores the override map captured at construction.
    pub fn reset_color_override(&mut self) {
        self.color_overrides = self.color_overrides_original.clone();
        self.core.emit_update();
    }

    /// Restores the construction-time domain order. Filtered membership is
    /// kept and follows the restored order.
    pub fn reset_sort(&mut self) {
        let original = self.core.domain_original().to_vec();
        let filtered = self.reordered_filtered(&original);
        self.core.replace_domains(original, filtered);
    }

    /// Current filtered membership rearranged into `order`.
    fn reordered_filtered(&self, order: &[DomainValue]) -> Vec<DomainValue> {
        let filtered = self.core.domain_filtered();
        order
            .iter()
            .filter(|value| filtered.contains(value))
            .cloned()
            .collect()
    }

    /// Domain values named by `tree`'s leaves, pruned to this scale and in
    /// depth-first leaf order.
    fn matching_leaves(&self, tree: &HierarchyNode) -> Vec<DomainValue> {
        let domain = self.core.domain();
        let Some(pruned) = tree.pruned(|leaf| domain.iter().any(|value| value.matches_name(leaf)))
        else {
            return Vec::new();
        };
        pruned
            .leaves()
            .into_iter()
            .filter_map(|leaf| {
                domain
                    .iter()
                    .find(|value| value.matches_name(leaf))
                    .cloned()
            })
            .collect()
    }
}

fn rooted_subtree<'a>(
    hierarchy: &'a HierarchyNode,
    root: Option<&str>,
) -> ReplotResult<&'a HierarchyNode> {
    match root {
        Some(name) => hierarchy
            .subtree(name)
            .ok_or_else(|| ReplotError::UnknownHierarchyRoot(name.to_owned())),
        None => Ok(hierarchy),
    }
}

impl Scale for CategoricalScale {
    fn core(&self) -> &ScaleCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ScaleCore {
        &mut self.core
    }

    fn color(&self, value: &DomainValue) -> Color {
        if value.is_unknown() {
            return UNKNOWN_COLOR;
        }
        if let Some(color) = self.color_overrides.get(&value.to_string()) {
            return *color;
        }
        let domain = self.core.domain();
        let Some(index) = domain.iter().position(|v| v == value) else {
            return UNKNOWN_COLOR;
        };
        let t = if domain.len() > 1 {
            index as f64 / (domain.len() - 1) as f64
        } else {
            0.0
        };
        self.core.color_scale().sample(t)
    }

    fn rank(&self, value: &DomainValue) -> f64 {
        if value.is_unknown() {
            return -1.0;
        }
        self.core
            .domain()
            .iter()
            .position(|v| v == value)
            .map_or(-1.0, |index| index as f64)
    }

    fn to_human(&self, value: &DomainValue) -> String {
        if value.is_unknown() {
            return UNKNOWN_LABEL.to_owned();
        }
        let domain = self.core.domain();
        if self.human_domain.len() == domain.len() {
            if let Some(index) = domain.iter().position(|v| v == value) {
                return self.human_domain[index].clone();
            }
        }
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use indexmap::IndexMap;

    use super::CategoricalScale;
    use crate::core::color::{Color, UNKNOWN_COLOR};
    use crate::core::hierarchy::HierarchyNode;
    use crate::core::scale::Scale;
    use crate::core::value::DomainValue;

    fn samples() -> CategoricalScale {
        CategoricalScale::new(
            "sample_id",
            "Samples",
            ["S1", "S2", "S3", "S4", "S5", "S6"]
                .into_iter()
                .map(DomainValue::from)
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn zoom_takes_an_inclusive_slice() {
        let mut scale = samples();
        scale.zoom(1, 3);
        assert_eq!(scale.domain_filtered().len(), 3);
        assert_eq!(scale.domain().len(), 6);
        assert_eq!(
            scale.domain_filtered(),
            ["S2", "S3", "S4"].map(DomainValue::from),
        );
    }

    #[test]
    fn zoom_clamps_and_empties_inverted_ranges() {
        let mut scale = samples();
        scale.zoom(4, 100);
        assert_eq!(scale.domain_filtered(), ["S5", "S6"].map(DomainValue::from));
        scale.zoom(3, 1);
        assert!(scale.domain_filtered().is_empty());
    }

    #[test]
    fn filter_preserves_index_order() {
        let mut scale = samples();
        scale.filter(&[4, 0, 2, 99]);
        assert_eq!(
            scale.domain_filtered(),
            ["S5", "S1", "S3"].map(DomainValue::from),
        );
    }

    #[test]
    fn comparator_is_descending_over_domain_position() {
        let scale = samples();
        let a = DomainValue::from("S2");
        let b = DomainValue::from("S3");
        assert_eq!(scale.comparator(&a, &b, true), Ordering::Greater);
        assert_eq!(
            scale.comparator(&DomainValue::from("S4"), &b, true),
            Ordering::Less,
        );
        assert_eq!(scale.comparator(&a, &b, false), Ordering::Less);
        assert_eq!(
            scale.comparator(&DomainValue::from("nan"), &a, true),
            Ordering::Less,
        );
    }

    #[test]
    fn color_uses_overrides_then_domain_position() {
        let red = Color::rgb(255, 0, 0);
        let mut overrides = IndexMap::new();
        overrides.insert("S2".to_owned(), red);

        let mut scale = samples();
        scale.set_color_overrides(overrides);
        assert_eq!(scale.color(&DomainValue::from("S2")), red);
        assert_ne!(scale.color(&DomainValue::from("S1")), red);
        assert_eq!(scale.color(&DomainValue::from("nan")), UNKNOWN_COLOR);

        scale.reset_color_override();
        assert_ne!(scale.color(&DomainValue::from("S2")), red);
    }

    #[test]
    fn hierarchy_filter_respects_reroot() {
        let tree = HierarchyNode::branch(
            "all",
            vec![
                HierarchyNode::branch(
                    "left",
                    vec![HierarchyNode::leaf("S3"), HierarchyNode::leaf("S1")],
                ),
                HierarchyNode::branch("right", vec![HierarchyNode::leaf("S5")]),
            ],
        );

        let mut scale = samples();
        scale
            .filter_by_hierarchy(&tree, Some("left"))
            .expect("subtree exists");
        assert_eq!(scale.domain_filtered(), ["S3", "S1"].map(DomainValue::from));
        assert_eq!(scale.domain().len(), 6);

        assert!(scale.filter_by_hierarchy(&tree, Some("missing")).is_err());
    }

    #[test]
    fn human_labels_require_matching_length() {
        let scale = CategoricalScale::new(
            "age_group",
            "Age group",
            vec![DomainValue::from(0.0), DomainValue::from(1.0)],
        )
        .with_human_domain(["Child", "Adult"]);
        assert_eq!(scale.to_human(&DomainValue::from(1.0)), "Adult");
        assert_eq!(scale.to_human(&DomainValue::from("nan")), "Unknown");

        let unlabeled = samples().with_human_domain(["only-one"]);
        assert_eq!(unlabeled.to_human(&DomainValue::from("S2")), "S2");
    }
}

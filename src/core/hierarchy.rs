use serde::{Deserialize, Serialize};

/// A node in an externally supplied grouping tree.
///
/// Branches group related values; leaves name domain values. Scales consume
/// the tree by pruning it to leaves they know about and reading the remaining
/// leaf order depth-first, left to right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn branch(name: impl Into<String>, children: Vec<HierarchyNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Finds the first node named `name`, searching depth-first from this
    /// node. Used to re-root a scale at a named subtree.
    #[must_use]
    pub fn subtree(&self, name: &str) -> Option<&Self> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.subtree(name))
    }

    /// Leaf names in depth-first, left-to-right order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        if self.is_leaf() {
            out.push(&self.name);
            return;
        }
        for child in &self.children {
            child.collect_leaves(out);
        }
    }

    /// Copy of the tree keeping only leaves for which `keep` returns true.
    /// Branches left without leaves are dropped; returns `None` when nothing
    /// survives.
    #[must_use]
    pub fn pruned(&self, keep: impl Fn(&str) -> bool) -> Option<Self> {
        self.pruned_inner(&keep)
    }

    fn pruned_inner(&self, keep: &dyn Fn(&str) -> bool) -> Option<Self> {
        if self.is_leaf() {
            return keep(&self.name).then(|| self.clone());
        }
        let children: Vec<Self> = self
            .children
            .iter()
            .filter_map(|child| child.pruned_inner(keep))
            .collect();
        (!children.is_empty()).then(|| Self {
            name: self.name.clone(),
            children,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::HierarchyNode;

    fn cohort() -> HierarchyNode {
        HierarchyNode::branch(
            "cohort",
            vec![
                HierarchyNode::branch(
                    "treated",
                    vec![HierarchyNode::leaf("S3"), HierarchyNode::leaf("S1")],
                ),
                HierarchyNode::branch("control", vec![HierarchyNode::leaf("S2")]),
            ],
        )
    }

    #[test]
    fn leaves_follow_depth_first_order() {
        assert_eq!(cohort().leaves(), vec!["S3", "S1", "S2"]);
    }

    #[test]
    fn subtree_finds_nested_branches() {
        let tree = cohort();
        let control = tree.subtree("control").expect("branch exists");
        assert_eq!(control.leaves(), vec!["S2"]);
        assert!(tree.subtree("placebo").is_none());
    }

    #[test]
    fn pruning_drops_empty_branches() {
        let pruned = cohort()
            .pruned(|name| name != "S2")
            .expect("leaves survive");
        assert_eq!(pruned.leaves(), vec!["S3", "S1"]);
        assert!(pruned.subtree("control").is_none());

        assert!(cohort().pruned(|_| false).is_none());
    }

    #[test]
    fn serde_omits_empty_children() {
        let json = serde_json::to_value(HierarchyNode::leaf("S1")).expect("serialize");
        assert_eq!(json, serde_json::json!({ "name": "S1" }));

        let tree: HierarchyNode = serde_json::from_value(serde_json::json!({
            "name": "root",
            "children": [{ "name": "S1" }, { "name": "S2" }],
        }))
        .expect("deserialize");
        assert_eq!(tree.leaves(), vec!["S1", "S2"]);
    }
}

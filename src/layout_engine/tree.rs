use serde::{Deserialize, Serialize};

use crate::layout_engine::Axis;

/// Tolerance for the sibling weight-sum invariant. Weights are adjusted with
/// zero-sum arithmetic so drift only comes from redistribution on insert and
/// remove.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Opaque window identifier supplied by the caller. The engine only ever
/// compares these for identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(u64);

impl WindowId {
    pub fn new(raw: u64) -> Self { Self(raw) }

    pub fn raw(self) -> u64 { self.0 }
}

/// A node of the layout tree: either a single window or an axis-aligned split
/// of weighted children. Matched exhaustively at every traversal site.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Leaf(WindowId),
    Split(SplitNode),
}

impl Node {
    pub fn contains(&self, window: WindowId) -> bool {
        match self {
            Node::Leaf(w) => *w == window,
            Node::Split(split) => split.children.iter().any(|c| c.node.contains(window)),
        }
    }

    /// First window in pre-order. A split always has children, so this cannot
    /// fail on a well-formed tree.
    pub fn first_window(&self) -> WindowId {
        match self {
            Node::Leaf(w) => *w,
            Node::Split(split) => split.children[0].node.first_window(),
        }
    }

    pub fn window_count(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Split(split) => split.children.iter().map(|c| c.node.window_count()).sum(),
        }
    }

    pub fn collect_windows(&self, out: &mut Vec<WindowId>) {
        match self {
            Node::Leaf(w) => out.push(*w),
            Node::Split(split) => {
                for child in &split.children {
                    child.node.collect_windows(out);
                }
            }
        }
    }

    /// Reset every split under this node to equal weights.
    pub fn rebalance(&mut self) {
        if let Node::Split(split) = self {
            let share = 1.0 / split.children.len() as f64;
            for child in &mut split.children {
                child.weight = share;
                child.node.rebalance();
            }
        }
    }

    /// Descend along a child-index path. Panics on a path that does not
    /// denote a node of this tree; callers derive paths from the tree itself.
    pub(crate) fn descend(&self, path: &[usize]) -> &Node {
        let mut node = self;
        for &index in path {
            match node {
                Node::Split(split) => node = &split.children[index].node,
                Node::Leaf(_) => panic!("path descends through a leaf"),
            }
        }
        node
    }

    pub(crate) fn descend_mut(&mut self, path: &[usize]) -> &mut Node {
        let mut node = self;
        for &index in path {
            match node {
                Node::Split(split) => node = &mut split.children[index].node,
                Node::Leaf(_) => panic!("path descends through a leaf"),
            }
        }
        node
    }
}

/// One weighted slot of a split. The weight belongs to the slot, not to the
/// node occupying it: collapsing a split into its sole remaining child leaves
/// the slot weight untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub node: Node,
    pub weight: f64,
}

/// An ordered list of weighted children partitioning one axis. Maintains
/// `Σ weight == 1` (within [`WEIGHT_SUM_TOLERANCE`]) and `len >= 2` across
/// every mutation except the removal that signals collapse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitNode {
    axis: Axis,
    children: Vec<Child>,
}

impl SplitNode {
    /// A fresh split of two equal halves, the only way a split comes into
    /// existence.
    pub fn new_pair(axis: Axis, first: Node, second: Node) -> Self {
        Self {
            axis,
            children: vec![
                Child { node: first, weight: 0.5 },
                Child { node: second, weight: 0.5 },
            ],
        }
    }

    pub fn axis(&self) -> Axis { self.axis }

    pub fn len(&self) -> usize { self.children.len() }

    pub fn children(&self) -> &[Child] { &self.children }

    pub fn node(&self, index: usize) -> &Node { &self.children[index].node }

    pub fn node_mut(&mut self, index: usize) -> &mut Node { &mut self.children[index].node }

    pub fn weight(&self, index: usize) -> f64 { self.children[index].weight }

    pub fn weight_sum(&self) -> f64 { self.children.iter().map(|c| c.weight).sum() }

    /// Insert `node` at `index`. Without an explicit weight the new slot gets
    /// `1/(n+1)` and existing slots are rescaled by the remaining share,
    /// preserving their relative proportions. An explicit weight is clamped
    /// into (0, 1) first.
    pub fn insert_child(&mut self, index: usize, node: Node, explicit_weight: Option<f64>) {
        let n = self.children.len();
        let new_weight = match explicit_weight {
            Some(w) => w.clamp(f64::EPSILON, 1.0 - f64::EPSILON),
            None => 1.0 / (n + 1) as f64,
        };
        let scale = 1.0 - new_weight;
        for child in &mut self.children {
            child.weight *= scale;
        }
        self.children.insert(index, Child { node, weight: new_weight });
        self.debug_check_weights();
    }

    /// Remove the slot at `index`, redistributing its weight proportionally
    /// among the remaining siblings. The caller must check
    /// [`SplitNode::needs_collapse`] afterwards.
    pub fn remove_child(&mut self, index: usize) -> Node {
        assert!(
            self.children.len() >= 2,
            "removing from a split with fewer than two children"
        );
        let removed = self.children.remove(index);
        let remaining = 1.0 - removed.weight;
        // remaining > 0: at least one sibling with positive weight is left.
        for child in &mut self.children {
            child.weight /= remaining;
        }
        if self.children.len() >= 2 {
            self.debug_check_weights();
        }
        removed.node
    }

    pub fn needs_collapse(&self) -> bool { self.children.len() < 2 }

    /// Take the sole remaining child after a removal left this split with one
    /// slot. Returns `None` while the split still has two or more children.
    pub fn take_sole_child(&mut self) -> Option<Node> {
        if self.children.len() == 1 {
            self.children.pop().map(|c| c.node)
        } else {
            None
        }
    }

    /// Zero-sum transfer between two sibling slots: `weight[a] += delta`,
    /// `weight[b] -= delta`, with the applied delta clamped so neither slot
    /// leaves `[min_weight, 1 - min_weight]`. The sum is preserved exactly.
    pub fn set_weight_pair(&mut self, a: usize, b: usize, delta: f64, min_weight: f64) {
        assert!(a != b, "weight transfer between a slot and itself");
        let w_a = self.children[a].weight;
        let w_b = self.children[b].weight;
        let hi = (w_b - min_weight).min((1.0 - min_weight) - w_a).max(0.0);
        let lo = (min_weight - w_a).max(w_b - (1.0 - min_weight)).min(0.0);
        let applied = delta.clamp(lo, hi);
        self.children[a].weight = w_a + applied;
        self.children[b].weight = w_b - applied;
        self.debug_check_weights();
    }

    fn debug_check_weights(&self) {
        debug_assert!(
            (self.weight_sum() - 1.0).abs() < WEIGHT_SUM_TOLERANCE,
            "split weights sum to {}",
            self.weight_sum()
        );
        debug_assert!(self.children.iter().all(|c| c.weight >= 0.0));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn w(raw: u64) -> WindowId { WindowId::new(raw) }

    fn pair() -> SplitNode {
        SplitNode::new_pair(Axis::Horizontal, Node::Leaf(w(1)), Node::Leaf(w(2)))
    }

    #[test]
    fn new_pair_is_two_equal_halves() {
        let split = pair();
        assert_eq!(split.len(), 2);
        assert_eq!(split.weight(0), 0.5);
        assert_eq!(split.weight(1), 0.5);
    }

    #[test]
    fn insert_without_weight_rescales_proportionally() {
        let mut split = pair();
        split.set_weight_pair(0, 1, 0.1, 0.0); // [0.6, 0.4]
        split.insert_child(2, Node::Leaf(w(3)), None);

        // New slot gets 1/3, the old 0.6/0.4 ratio survives the rescale.
        assert!((split.weight(2) - 1.0 / 3.0).abs() < WEIGHT_SUM_TOLERANCE);
        assert!((split.weight(0) - 0.4).abs() < WEIGHT_SUM_TOLERANCE);
        assert!((split.weight(1) - 0.4 * 2.0 / 3.0).abs() < WEIGHT_SUM_TOLERANCE);
        assert!((split.weight_sum() - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn insert_with_explicit_weight_clamps_out_of_range() {
        let mut split = pair();
        split.insert_child(0, Node::Leaf(w(3)), Some(2.0));
        assert!(split.weight(0) < 1.0);
        assert!((split.weight_sum() - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn remove_redistributes_proportionally() {
        let mut split = pair();
        split.insert_child(2, Node::Leaf(w(3)), Some(0.5));
        // [0.25, 0.25, 0.5]
        let removed = split.remove_child(2);
        assert_eq!(removed, Node::Leaf(w(3)));
        assert!((split.weight(0) - 0.5).abs() < WEIGHT_SUM_TOLERANCE);
        assert!((split.weight(1) - 0.5).abs() < WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn remove_to_one_child_signals_collapse() {
        let mut split = pair();
        split.remove_child(0);
        assert!(split.needs_collapse());
        assert_eq!(split.take_sole_child(), Some(Node::Leaf(w(2))));
    }

    #[test]
    fn take_sole_child_refuses_healthy_split() {
        let mut split = pair();
        assert_eq!(split.take_sole_child(), None);
        assert_eq!(split.len(), 2);
    }

    #[test]
    fn weight_pair_transfer_is_zero_sum() {
        let mut split = pair();
        split.set_weight_pair(0, 1, 0.1, 0.0);
        assert_eq!(split.weight(0), 0.6);
        assert_eq!(split.weight(1), 0.4);
        assert_eq!(split.weight_sum(), 1.0);
    }

    #[test]
    fn weight_pair_transfer_clamps_oversized_delta() {
        let mut split = pair();
        split.set_weight_pair(0, 1, 5.0, 0.05);
        assert!((split.weight(0) - 0.95).abs() < WEIGHT_SUM_TOLERANCE);
        assert!((split.weight(1) - 0.05).abs() < WEIGHT_SUM_TOLERANCE);

        // Pushing further in the same direction changes nothing.
        split.set_weight_pair(0, 1, 0.3, 0.05);
        assert!((split.weight(0) - 0.95).abs() < WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn weight_pair_transfer_clamps_negative_delta() {
        let mut split = pair();
        split.set_weight_pair(0, 1, -5.0, 0.05);
        assert!((split.weight(0) - 0.05).abs() < WEIGHT_SUM_TOLERANCE);
        assert!((split.weight(1) - 0.95).abs() < WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn rebalance_resets_nested_splits() {
        let mut split = pair();
        split.set_weight_pair(0, 1, 0.3, 0.0);
        split.insert_child(2, Node::Leaf(w(3)), None);
        let mut node = Node::Split(split);
        node.rebalance();
        let Node::Split(split) = node else { unreachable!() };
        for i in 0..3 {
            assert!((split.weight(i) - 1.0 / 3.0).abs() < WEIGHT_SUM_TOLERANCE);
        }
    }

    #[test]
    fn collect_windows_is_preorder() {
        let inner = SplitNode::new_pair(Axis::Vertical, Node::Leaf(w(2)), Node::Leaf(w(3)));
        let root = SplitNode::new_pair(Axis::Horizontal, Node::Leaf(w(1)), Node::Split(inner));
        let mut out = Vec::new();
        Node::Split(root).collect_windows(&mut out);
        assert_eq!(out, vec![w(1), w(2), w(3)]);
    }
}

//! Locating the split boundary a directional drag should move.
//!
//! The tree stores no parent links; resolution walks from the root to the
//! target leaf accumulating child indices, then scans that path leafward-up
//! for the nearest qualifying ancestor.

use crate::layout_engine::direction::Direction;
use crate::layout_engine::tree::{Node, SplitNode, WindowId};

/// The boundary selected for a directional edge move: the split at `path`
/// (child indices from the root), the slot holding the target leaf's subtree,
/// and the adjacent slot on the requested side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeTarget {
    pub path: Vec<usize>,
    pub child: usize,
    pub neighbor: usize,
}

/// Child-index path from `node` to the leaf holding `window`.
pub fn find_path(node: &Node, window: WindowId) -> Option<Vec<usize>> {
    fn walk(node: &Node, window: WindowId, path: &mut Vec<usize>) -> bool {
        match node {
            Node::Leaf(w) => *w == window,
            Node::Split(split) => {
                for (index, child) in split.children().iter().enumerate() {
                    path.push(index);
                    if walk(&child.node, window, path) {
                        return true;
                    }
                    path.pop();
                }
                false
            }
        }
    }
    let mut path = Vec::new();
    walk(node, window, &mut path).then_some(path)
}

/// Find the nearest ancestor split whose axis matches `direction` and where
/// the target's subtree has a neighbor on the requested side. `None` when the
/// window is absent or already sits on the tree's outer boundary for that
/// direction.
pub fn resolve(root: &Node, window: WindowId, direction: Direction) -> Option<EdgeTarget> {
    let path = find_path(root, window)?;
    let mut splits: Vec<&SplitNode> = Vec::with_capacity(path.len());
    let mut node = root;
    for &index in &path {
        let Node::Split(split) = node else {
            unreachable!("path descends through a leaf");
        };
        splits.push(split);
        node = split.node(index);
    }

    for depth in (0..path.len()).rev() {
        let split = splits[depth];
        if split.axis() != direction.axis() {
            continue;
        }
        let child = path[depth];
        let neighbor = if direction.is_after() {
            (child + 1 < split.len()).then_some(child + 1)
        } else {
            child.checked_sub(1)
        };
        if let Some(neighbor) = neighbor {
            return Some(EdgeTarget { path: path[..depth].to_vec(), child, neighbor });
        }
    }
    None
}

/// The leaf of `node` nearest to a viewer entering the subtree while moving
/// in `direction`: moving right lands on the leftmost leaf of a horizontal
/// split, moving left on the rightmost, and so on.
pub fn closest_leaf_toward(node: &Node, direction: Direction) -> WindowId {
    match node {
        Node::Leaf(window) => *window,
        Node::Split(split) => {
            let index = if split.axis() == direction.axis() && !direction.is_after() {
                split.len() - 1
            } else {
                0
            };
            closest_leaf_toward(split.node(index), direction)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout_engine::Axis;

    fn w(raw: u64) -> WindowId { WindowId::new(raw) }

    /// `[1 | [2 / 3]]`: window 1 fills the left half, 2 over 3 on the right.
    fn sample_tree() -> Node {
        let right = SplitNode::new_pair(Axis::Vertical, Node::Leaf(w(2)), Node::Leaf(w(3)));
        Node::Split(SplitNode::new_pair(
            Axis::Horizontal,
            Node::Leaf(w(1)),
            Node::Split(right),
        ))
    }

    #[test]
    fn find_path_locates_nested_leaves() {
        let tree = sample_tree();
        assert_eq!(find_path(&tree, w(1)), Some(vec![0]));
        assert_eq!(find_path(&tree, w(3)), Some(vec![1, 1]));
        assert_eq!(find_path(&tree, w(9)), None);
    }

    #[test]
    fn resolve_picks_the_root_boundary_for_horizontal_drags() {
        let tree = sample_tree();
        assert_eq!(
            resolve(&tree, w(1), Direction::Right),
            Some(EdgeTarget { path: vec![], child: 0, neighbor: 1 })
        );
        // Window 3's left edge is the root boundary, found by skipping its
        // vertical parent.
        assert_eq!(
            resolve(&tree, w(3), Direction::Left),
            Some(EdgeTarget { path: vec![], child: 1, neighbor: 0 })
        );
    }

    #[test]
    fn resolve_picks_the_nearest_matching_ancestor() {
        let tree = sample_tree();
        assert_eq!(
            resolve(&tree, w(3), Direction::Up),
            Some(EdgeTarget { path: vec![1], child: 1, neighbor: 0 })
        );
    }

    #[test]
    fn resolve_fails_on_the_outer_boundary() {
        let tree = sample_tree();
        assert_eq!(resolve(&tree, w(1), Direction::Left), None);
        assert_eq!(resolve(&tree, w(1), Direction::Up), None);
        assert_eq!(resolve(&tree, w(3), Direction::Down), None);
        assert_eq!(resolve(&tree, w(2), Direction::Up), None);
    }

    #[test]
    fn resolve_fails_for_unknown_window() {
        assert_eq!(resolve(&sample_tree(), w(9), Direction::Right), None);
    }

    #[test]
    fn closest_leaf_depends_on_approach_direction() {
        let tree = sample_tree();
        assert_eq!(closest_leaf_toward(&tree, Direction::Right), w(1));
        // Entering the right half leftward: its own split is vertical, so the
        // first child wins.
        assert_eq!(closest_leaf_toward(&tree, Direction::Left), w(2));
        assert_eq!(closest_leaf_toward(&tree, Direction::Down), w(1));
    }
}

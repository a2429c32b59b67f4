//! Pure projection of a layout tree onto a rectangle.
//!
//! All boundary math lives in [`child_rect`] so that full projection and
//! on-demand recovery of an interior split's rectangle (used to turn pixel
//! drags into weight deltas) can never disagree.

use crate::common::geometry::Rect;
use crate::layout_engine::tree::{Node, SplitNode, WindowId};

/// Recursively partition `rect` among the tree's windows in child order.
/// Identical inputs always produce identical output; the only allocation is
/// the caller-provided output vector.
pub fn project(node: &Node, rect: Rect, out: &mut Vec<(WindowId, Rect)>) {
    match node {
        Node::Leaf(window) => out.push((*window, rect)),
        Node::Split(split) => {
            for index in 0..split.len() {
                project(split.node(index), child_rect(split, rect, index), out);
            }
        }
    }
}

/// The rectangle of child `index` when `split` occupies `rect`.
///
/// Interior boundaries are rounded to whole pixels; the last child runs to the
/// exact end of the parent. Children therefore tile the parent with no gap
/// and no overlap, and extents sum to the parent extent exactly.
pub fn child_rect(split: &SplitNode, rect: Rect, index: usize) -> Rect {
    let axis = split.axis();
    let lo = boundary(split, rect, index);
    let hi = boundary(split, rect, index + 1);
    rect.with_span(axis, lo, hi - lo)
}

/// Position of the edge before child `index` (`index == len` gives the far
/// edge of the parent).
fn boundary(split: &SplitNode, rect: Rect, index: usize) -> f64 {
    let axis = split.axis();
    let start = rect.origin_along(axis);
    if index == 0 {
        return start;
    }
    let total = rect.extent_along(axis);
    if index == split.len() {
        return start + total;
    }
    let consumed: f64 = (0..index).map(|i| split.weight(i)).sum();
    (start + total * consumed).round()
}

/// Rectangle of the node at `path` when the root occupies `rect`. Used by
/// edge resolution to recover a split's extent without caching a rectangle
/// per interior node.
pub fn rect_along_path(root: &Node, rect: Rect, path: &[usize]) -> Rect {
    let mut node = root;
    let mut rect = rect;
    for &index in path {
        match node {
            Node::Split(split) => {
                rect = child_rect(split, rect, index);
                node = split.node(index);
            }
            Node::Leaf(_) => panic!("path descends through a leaf"),
        }
    }
    rect
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout_engine::Axis;

    fn w(raw: u64) -> WindowId { WindowId::new(raw) }

    #[test]
    fn leaf_fills_the_whole_rect() {
        let rect = Rect::new(0.0, 0.0, 800.0, 600.0);
        let mut out = Vec::new();
        project(&Node::Leaf(w(1)), rect, &mut out);
        assert_eq!(out, vec![(w(1), rect)]);
    }

    #[test]
    fn equal_horizontal_split_halves_the_screen() {
        let split = SplitNode::new_pair(Axis::Horizontal, Node::Leaf(w(1)), Node::Leaf(w(2)));
        let mut out = Vec::new();
        project(&Node::Split(split), Rect::new(0.0, 0.0, 1920.0, 1080.0), &mut out);
        assert_eq!(out, vec![
            (w(1), Rect::new(0.0, 0.0, 960.0, 1080.0)),
            (w(2), Rect::new(960.0, 0.0, 960.0, 1080.0)),
        ]);
    }

    #[test]
    fn vertical_split_divides_height() {
        let split = SplitNode::new_pair(Axis::Vertical, Node::Leaf(w(1)), Node::Leaf(w(2)));
        let mut out = Vec::new();
        project(&Node::Split(split), Rect::new(0.0, 0.0, 1920.0, 1080.0), &mut out);
        assert_eq!(out, vec![
            (w(1), Rect::new(0.0, 0.0, 1920.0, 540.0)),
            (w(2), Rect::new(0.0, 540.0, 1920.0, 540.0)),
        ]);
    }

    #[test]
    fn uneven_division_stays_contiguous_and_exact() {
        let mut split = SplitNode::new_pair(Axis::Horizontal, Node::Leaf(w(1)), Node::Leaf(w(2)));
        split.insert_child(2, Node::Leaf(w(3)), None);
        // Equal thirds of 100 cannot all be whole pixels.
        let mut node = Node::Split(split);
        node.rebalance();

        let mut out = Vec::new();
        project(&node, Rect::new(0.0, 0.0, 100.0, 50.0), &mut out);

        let widths: Vec<f64> = out.iter().map(|(_, r)| r.size.width).collect();
        assert_eq!(widths.iter().sum::<f64>(), 100.0);
        for pair in out.windows(2) {
            assert_eq!(pair[0].1.max_x(), pair[1].1.origin.x);
        }
        assert_eq!(out.last().unwrap().1.max_x(), 100.0);
    }

    #[test]
    fn rect_along_path_matches_projection() {
        let inner = SplitNode::new_pair(Axis::Vertical, Node::Leaf(w(2)), Node::Leaf(w(3)));
        let root = Node::Split(SplitNode::new_pair(
            Axis::Horizontal,
            Node::Leaf(w(1)),
            Node::Split(inner),
        ));
        let rect = Rect::new(0.0, 0.0, 1920.0, 1080.0);

        let inner_rect = rect_along_path(&root, rect, &[1]);
        assert_eq!(inner_rect, Rect::new(960.0, 0.0, 960.0, 1080.0));

        let mut out = Vec::new();
        project(&root, rect, &mut out);
        // The split's rect spans exactly its leaves' rects.
        assert_eq!(out[1].1.origin, inner_rect.origin);
        assert_eq!(out[2].1.max_y(), inner_rect.max_y());
    }
}

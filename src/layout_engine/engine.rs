use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::collections::HashMap;
use crate::common::config::LayoutSettings;
use crate::common::geometry::{Point, Rect, Round};
use crate::layout_engine::direction::{Axis, Direction};
use crate::layout_engine::tree::{Node, SplitNode, WindowId};
use crate::layout_engine::{edge, projector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A caller bug: the engine holds at most one leaf per window.
    #[error("window {0:?} is already in the layout tree")]
    AlreadyPresent(WindowId),
}

/// Opaque monitor reference handed through [`TreeLayoutEngine::do_layout`].
/// The engine never interprets it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonitorId(pub u64);

/// Caller-supplied per-window size state, passed through layout unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeState {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowPlacement {
    pub window: WindowId,
    pub rect: Rect,
    pub size_state: SizeState,
}

/// Result of changing the default insertion direction, for forwarding to
/// whatever notification layer the caller runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectionChange {
    pub previous: Direction,
    pub current: Direction,
}

/// A split staged on a leaf by [`TreeLayoutEngine::split_at`], consumed by
/// the next `add` targeting that leaf. Staging instead of inserting keeps
/// one-child splits out of the tree entirely.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
struct Presplit {
    window: WindowId,
    axis: Axis,
}

/// A weight-partitioned tree of windows over one rectangle.
///
/// Single-threaded and synchronous; every operation runs to completion on the
/// caller's thread. "Not found" and "nothing to do" conditions are reported
/// through return values, never panics; the sole hard failure is inserting a
/// window that is already present.
#[derive(Serialize, Deserialize)]
pub struct TreeLayoutEngine {
    root: Option<Node>,
    default_direction: Direction,
    min_weight: f64,
    focused: Option<WindowId>,
    presplit: Option<Presplit>,
    /// Rectangle of the last `do_layout` call. Edge moves convert pixels to
    /// weights against it, so they no-op until a first layout happens.
    #[serde(skip)]
    last_area: Option<Rect>,
    #[serde(skip)]
    window_rects: HashMap<WindowId, Rect>,
}

impl Default for TreeLayoutEngine {
    fn default() -> Self { Self::new(&LayoutSettings::default()) }
}

impl TreeLayoutEngine {
    pub fn new(settings: &LayoutSettings) -> Self {
        Self {
            root: None,
            default_direction: settings.default_direction,
            min_weight: settings.min_weight,
            focused: None,
            presplit: None,
            last_area: None,
            window_rects: HashMap::default(),
        }
    }

    pub fn root(&self) -> Option<&Node> { self.root.as_ref() }

    pub fn default_direction(&self) -> Direction { self.default_direction }

    /// Change the insertion direction for subsequent `add` calls. Returns the
    /// transition when it actually changed, for the caller to broadcast.
    pub fn set_default_direction(&mut self, direction: Direction) -> Option<DirectionChange> {
        if self.default_direction == direction {
            return None;
        }
        let previous = std::mem::replace(&mut self.default_direction, direction);
        Some(DirectionChange { previous, current: direction })
    }

    /// Record the most recently focused window. Insertion targets it while it
    /// remains in the tree.
    pub fn set_focused_window(&mut self, window: Option<WindowId>) { self.focused = window; }

    pub fn focused_window(&self) -> Option<WindowId> { self.focused }

    pub fn contains_window(&self, window: WindowId) -> bool {
        self.root.as_ref().is_some_and(|root| root.contains(window))
    }

    pub fn len(&self) -> usize { self.root.as_ref().map_or(0, Node::window_count) }

    pub fn is_empty(&self) -> bool { self.root.is_none() }

    /// All windows in pre-order, which is also layout order.
    pub fn windows(&self) -> Vec<WindowId> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.collect_windows(&mut out);
        }
        out
    }

    /// The rectangle last assigned to `window` by `do_layout`, if any.
    pub fn window_rect(&self, window: WindowId) -> Option<Rect> {
        self.window_rects.get(&window).copied()
    }

    pub fn add(&mut self, window: WindowId) -> Result<(), LayoutError> {
        self.add_in_direction(window, None)
    }

    /// Insert `window` next to the focused leaf (or the first leaf when
    /// nothing valid is focused), on the side given by `direction` or the
    /// engine default. A staged `split_at` on the target takes precedence
    /// over the direction's axis.
    pub fn add_in_direction(
        &mut self,
        window: WindowId,
        direction: Option<Direction>,
    ) -> Result<(), LayoutError> {
        if self.contains_window(window) {
            tracing::warn!(?window, "rejecting duplicate insertion");
            return Err(LayoutError::AlreadyPresent(window));
        }
        let Some(root) = self.root.as_mut() else {
            tracing::debug!(?window, "added as root");
            self.root = Some(Node::Leaf(window));
            return Ok(());
        };

        let direction = direction.unwrap_or(self.default_direction);
        let target = match self.focused.filter(|f| root.contains(*f)) {
            Some(focused) => focused,
            None => root.first_window(),
        };
        let path = edge::find_path(root, target).expect("target leaf is in the tree");

        if let Some(staged) = self.presplit.take_if(|p| p.window == target) {
            wrap_in_pair(root.descend_mut(&path), staged.axis, direction, window);
            tracing::debug!(?window, ?target, axis = ?staged.axis, "added into staged split");
            return Ok(());
        }

        // Same-axis parent: join it as a sibling. Otherwise wrap the target's
        // slot in a new split; the slot keeps its weight either way.
        if let Some((&target_index, parent_path)) = path.split_last() {
            if let Node::Split(parent) = root.descend_mut(parent_path) {
                if parent.axis() == direction.axis() {
                    let at = if direction.is_after() { target_index + 1 } else { target_index };
                    parent.insert_child(at, Node::Leaf(window), None);
                    tracing::debug!(?window, ?target, ?direction, "added as sibling");
                    return Ok(());
                }
            }
        }
        wrap_in_pair(root.descend_mut(&path), direction.axis(), direction, window);
        tracing::debug!(?window, ?target, ?direction, "added in new split");
        Ok(())
    }

    /// Remove `window` from the tree, collapsing a split left with a single
    /// child into that child. Returns false when the window is not present.
    pub fn remove(&mut self, window: WindowId) -> bool {
        let Some(root) = self.root.as_mut() else { return false };
        let Some(path) = edge::find_path(root, window) else {
            tracing::debug!(?window, "remove: not in tree");
            return false;
        };

        if let Some((&index, parent_path)) = path.split_last() {
            let parent = root.descend_mut(parent_path);
            let sole = match parent {
                Node::Split(split) => {
                    split.remove_child(index);
                    split.take_sole_child()
                }
                Node::Leaf(_) => unreachable!("leaf paths end under a split"),
            };
            if let Some(sole) = sole {
                // The collapsed split's slot weight stays with the slot.
                *parent = sole;
            }
        } else {
            self.root = None;
        }

        self.window_rects.remove(&window);
        if self.presplit.is_some_and(|p| p.window == window) {
            self.presplit = None;
        }
        if self.focused == Some(window) {
            self.focused = None;
        }
        tracing::debug!(?window, "removed");
        true
    }

    /// Stage a split of the given axis on `window`'s leaf; the next `add`
    /// targeting that leaf lands inside it. Returns false when the window is
    /// not in the tree.
    pub fn split_at(&mut self, window: WindowId, axis: Axis) -> bool {
        if !self.contains_window(window) {
            return false;
        }
        self.presplit = Some(Presplit { window, axis });
        true
    }

    /// Compute placements for every window over `area`. Deterministic and
    /// side-effect free apart from refreshing the engine's rectangle cache,
    /// so it is safe to call on every drag tick. `size_state` supplies each
    /// window's caller-owned state, forwarded untouched.
    pub fn do_layout(
        &mut self,
        area: Rect,
        monitor: MonitorId,
        size_state: impl Fn(WindowId) -> SizeState,
    ) -> Vec<WindowPlacement> {
        let area = area.round();
        self.last_area = Some(area);
        self.window_rects.clear();

        let Some(root) = &self.root else { return Vec::new() };
        let mut pairs = Vec::with_capacity(root.window_count());
        projector::project(root, area, &mut pairs);

        let mut placements = Vec::with_capacity(pairs.len());
        for (window, rect) in pairs {
            self.window_rects.insert(window, rect);
            placements.push(WindowPlacement {
                window,
                rect,
                size_state: size_state(window),
            });
        }
        tracing::trace!(?monitor, windows = placements.len(), "computed layout");
        placements
    }

    /// Drag the edge of `window` on the side named by `direction` by a pixel
    /// delta, adjusting the weights of the nearest qualifying ancestor split.
    /// No-ops (returning false) when the window is absent, no layout has been
    /// computed yet, or the window already touches the outer boundary.
    pub fn move_window_edges_in_direction(
        &mut self,
        direction: Direction,
        pixel_delta: Point,
        window: WindowId,
    ) -> bool {
        let Some(area) = self.last_area else {
            tracing::debug!(?window, "edge move before first layout");
            return false;
        };
        let Some(root) = self.root.as_mut() else { return false };
        let Some(target) = edge::resolve(root, window, direction) else {
            tracing::debug!(?window, ?direction, "no movable edge");
            return false;
        };

        let axis = direction.axis();
        let extent = projector::rect_along_path(root, area, &target.path).extent_along(axis);
        if extent <= 0.0 {
            return false;
        }
        let weight_delta = pixel_delta.along(axis) / extent;
        let Node::Split(split) = root.descend_mut(&target.path) else {
            unreachable!("edge targets denote splits");
        };
        split.set_weight_pair(target.child, target.neighbor, weight_delta, self.min_weight);
        true
    }

    /// Nearest window adjacent to `window` in `direction`, by the projected
    /// geometry.
    pub fn window_in_direction(&self, window: WindowId, direction: Direction) -> Option<WindowId> {
        let root = self.root.as_ref()?;
        let target = edge::resolve(root, window, direction)?;
        let Node::Split(split) = root.descend(&target.path) else {
            unreachable!("edge targets denote splits");
        };
        Some(edge::closest_leaf_toward(split.node(target.neighbor), direction))
    }

    /// Swap `window` with its directional neighbor. Slots and weights stay
    /// put; only the occupants trade places.
    pub fn swap_window_in_direction(&mut self, window: WindowId, direction: Direction) -> bool {
        let Some(neighbor) = self.window_in_direction(window, direction) else {
            return false;
        };
        self.swap_windows(window, neighbor)
    }

    pub fn swap_windows(&mut self, a: WindowId, b: WindowId) -> bool {
        if a == b {
            return false;
        }
        let Some(root) = self.root.as_mut() else { return false };
        let (Some(path_a), Some(path_b)) = (edge::find_path(root, a), edge::find_path(root, b))
        else {
            return false;
        };
        *root.descend_mut(&path_a) = Node::Leaf(b);
        *root.descend_mut(&path_b) = Node::Leaf(a);
        true
    }

    /// Reset every split to equal weights.
    pub fn rebalance(&mut self) {
        if let Some(root) = self.root.as_mut() {
            root.rebalance();
        }
    }

    pub fn draw_tree(&self) -> String {
        fn write_node(node: &Node, weight: Option<f64>, out: &mut String, indent: usize) {
            for _ in 0..indent {
                out.push_str("  ");
            }
            if let Some(weight) = weight {
                out.push_str(&format!("{weight:.2} "));
            }
            match node {
                Node::Leaf(window) => out.push_str(&format!("Leaf {:?}\n", window)),
                Node::Split(split) => {
                    out.push_str(&format!("Split {:?}\n", split.axis()));
                    for child in split.children() {
                        write_node(&child.node, Some(child.weight), out, indent + 1);
                    }
                }
            }
        }
        match &self.root {
            Some(root) => {
                let mut out = String::new();
                write_node(root, None, &mut out, 0);
                out
            }
            None => "<empty layout>".to_string(),
        }
    }

    /// Snapshot the tree, weights, and insertion state as JSON. Rectangle
    /// caches are derived state and are not part of the snapshot: a restored
    /// engine needs a `do_layout` before edge moves work again.
    pub fn save_state(&self) -> anyhow::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn load_state(state: serde_json::Value) -> anyhow::Result<Self> {
        Ok(serde_json::from_value(state)?)
    }
}

/// Replace `slot`'s occupant with a two-child split of `axis` holding the old
/// occupant and a new leaf, ordered by the insertion direction.
fn wrap_in_pair(slot: &mut Node, axis: Axis, direction: Direction, window: WindowId) {
    let existing = std::mem::replace(slot, Node::Leaf(window));
    let (first, second) = if direction.is_after() {
        (existing, Node::Leaf(window))
    } else {
        (Node::Leaf(window), existing)
    };
    *slot = Node::Split(SplitNode::new_pair(axis, first, second));
}

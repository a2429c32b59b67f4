pub mod direction;
pub mod edge;
pub mod engine;
pub mod projector;
pub mod tree;

pub use direction::{Axis, Direction};
pub use engine::{
    DirectionChange, LayoutError, MonitorId, SizeState, TreeLayoutEngine, WindowPlacement,
};
pub use tree::{Node, SplitNode, WindowId};

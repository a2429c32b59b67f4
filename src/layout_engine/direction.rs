use serde::{Deserialize, Serialize};

/// Partition axis of a split: horizontal splits divide width, vertical splits
/// divide height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::Horizontal,
            Direction::Up | Direction::Down => Axis::Vertical,
        }
    }

    /// Whether this direction points toward the slot after a reference slot
    /// in child order. Left/Up point before, Right/Down point after.
    pub fn is_after(self) -> bool { matches!(self, Direction::Right | Direction::Down) }
}

use serde::{Deserialize, Serialize};

use crate::layout_engine::Axis;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self { Self { x, y } }

    /// The component of this point along `axis`.
    pub fn along(self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self { Self { width, height } }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn max_x(&self) -> f64 { self.origin.x + self.size.width }

    pub fn max_y(&self) -> f64 { self.origin.y + self.size.height }

    pub fn origin_along(&self, axis: Axis) -> f64 { self.origin.along(axis) }

    pub fn extent_along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.size.width,
            Axis::Vertical => self.size.height,
        }
    }

    /// This rect with its `axis` span replaced by `[start, start + len)`. The
    /// cross-axis span is untouched.
    pub fn with_span(&self, axis: Axis, start: f64, len: f64) -> Rect {
        match axis {
            Axis::Horizontal => Rect::new(start, self.origin.y, len, self.size.height),
            Axis::Vertical => Rect::new(self.origin.x, start, self.size.width, len),
        }
    }
}

pub trait Round {
    fn round(self) -> Self;
}

impl Round for Rect {
    fn round(self) -> Self {
        Rect::new(
            self.origin.x.round(),
            self.origin.y.round(),
            self.size.width.round(),
            self.size.height.round(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_span_keeps_cross_axis() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(
            rect.with_span(Axis::Horizontal, 30.0, 40.0),
            Rect::new(30.0, 20.0, 40.0, 50.0)
        );
        assert_eq!(
            rect.with_span(Axis::Vertical, 5.0, 25.0),
            Rect::new(10.0, 5.0, 100.0, 25.0)
        );
    }

    #[test]
    fn round_applies_per_field() {
        let rect = Rect::new(0.4, 0.6, 99.5, 100.2);
        assert_eq!(rect.round(), Rect::new(0.0, 1.0, 100.0, 100.0));
    }
}

//! Axis-aligned rectangles.
//!
//! Used for face bounds, overlay placements and image views.

use std::fmt;

/// An axis-aligned rectangle in pixel coordinates.
///
/// Rectangles are allowed to have zero height and/or width, and may be positioned at negative
/// coordinates (an overlay can hang off the left edge of a frame).
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    /// Creates a rectangle extending downwards and right from a point.
    #[inline]
    pub const fn from_top_left(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the X coordinate of the left side of the rectangle.
    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Returns the Y coordinate of the top side of the rectangle.
    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Returns `true` if every coordinate of `self` is a finite number.
    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
    }

    #[must_use]
    pub fn move_by(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    #[must_use]
    pub fn move_to(&self, x: f32, y: f32) -> Rect {
        Rect { x, y, ..*self }
    }

    /// Computes the intersection of `self` and `other`.
    ///
    /// Returns [`None`] when the intersection is empty (ie. the rectangles do not overlap).
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x_min = self.x.max(other.x);
        let y_min = self.y.max(other.y);
        let x_max = (self.x + self.width).min(other.x + other.width);
        let y_max = (self.y + self.height).min(other.y + other.height);
        if x_min > x_max || y_min > y_max {
            return None;
        }

        Some(Rect::from_top_left(x_min, y_min, x_max - x_min, y_max - y_min))
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect @ ({},{})/{}x{}",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection() {
        let frame = Rect::from_top_left(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            frame.intersection(&Rect::from_top_left(-4.0, 8.0, 6.0, 6.0)),
            Some(Rect::from_top_left(0.0, 8.0, 2.0, 2.0))
        );
        assert_eq!(
            frame.intersection(&Rect::from_top_left(11.0, 0.0, 1.0, 1.0)),
            None
        );
    }

    #[test]
    fn test_move() {
        let rect = Rect::from_top_left(1.0, 2.0, 3.0, 4.0);
        assert_eq!(rect.move_by(-1.0, 40.0), Rect::from_top_left(0.0, 42.0, 3.0, 4.0));
        assert_eq!(rect.move_to(7.0, 8.0), Rect::from_top_left(7.0, 8.0, 3.0, 4.0));
    }

    #[test]
    fn test_is_finite() {
        assert!(Rect::from_top_left(-3.0, 0.0, 1.0, 1.0).is_finite());
        assert!(!Rect::from_top_left(0.0, 0.0, f32::NAN, 1.0).is_finite());
        assert!(!Rect::from_top_left(0.0, f32::INFINITY, 1.0, 1.0).is_finite());
    }
}

//! Logical/physical pixel conversion.
//!
//! A `DpiScale` is the diagonal of the device transform: multiplying a
//! logical coordinate by it yields device pixels. 96 DPI is 1.0.

use crate::rect::{LogicalRect, Point, Rect};

/// The baseline DPI at which one logical unit equals one pixel.
pub const BASE_DPI: u32 = 96;

/// Horizontal and vertical scale factors of a display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DpiScale {
    pub x: f64,
    pub y: f64,
}

impl DpiScale {
    /// 100% scaling.
    pub const IDENTITY: DpiScale = DpiScale { x: 1.0, y: 1.0 };

    /// Creates a scale, rejecting zero, negative, or non-finite factors.
    pub fn new(x: f64, y: f64) -> Option<Self> {
        let valid = |f: f64| f.is_finite() && f > 0.0;
        if valid(x) && valid(y) {
            Some(Self { x, y })
        } else {
            None
        }
    }

    /// Builds a uniform scale from a DPI value as reported by Win32.
    pub fn from_dpi(dpi: u32) -> Option<Self> {
        let f = f64::from(dpi) / f64::from(BASE_DPI);
        Self::new(f, f)
    }

    /// Converts a device-pixel rectangle into logical units.
    pub fn to_logical(&self, rect: Rect) -> LogicalRect {
        LogicalRect::new(
            f64::from(rect.x) / self.x,
            f64::from(rect.y) / self.y,
            f64::from(rect.width) / self.x,
            f64::from(rect.height) / self.y,
        )
    }

    /// Converts a device-pixel coordinate into logical units.
    pub fn point_to_logical(&self, x: i32, y: i32) -> Point {
        Point::new(f64::from(x) / self.x, f64::from(y) / self.y)
    }

    /// Converts a logical point into rounded device pixels.
    pub fn to_physical(&self, point: Point) -> (i32, i32) {
        (
            (point.x * self.x).round() as i32,
            (point.y * self.y).round() as i32,
        )
    }

    /// Converts a logical length on the horizontal axis into device pixels.
    pub fn width_to_physical(&self, w: f64) -> i32 {
        (w * self.x).round() as i32
    }

    /// Converts a logical length on the vertical axis into device pixels.
    pub fn height_to_physical(&self, h: f64) -> i32 {
        (h * self.y).round() as i32
    }
}

impl Default for DpiScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_dpi_maps_common_settings() {
        assert_eq!(DpiScale::from_dpi(96), Some(DpiScale::IDENTITY));
        assert_eq!(DpiScale::from_dpi(144).map(|s| s.x), Some(1.5));
        assert_eq!(DpiScale::from_dpi(192).map(|s| s.y), Some(2.0));
        assert_eq!(DpiScale::from_dpi(0), None);
    }

    #[test]
    fn new_rejects_degenerate_factors() {
        assert!(DpiScale::new(0.0, 1.0).is_none());
        assert!(DpiScale::new(1.0, -2.0).is_none());
        assert!(DpiScale::new(f64::NAN, 1.0).is_none());
        assert!(DpiScale::new(1.25, 1.25).is_some());
    }

    #[test]
    fn to_logical_divides_each_axis() {
        // Arrange
        let scale = DpiScale::new(1.5, 2.0).unwrap();

        // Act
        let logical = scale.to_logical(Rect::new(300, 100, 2880, 1600));

        // Assert
        assert_eq!(logical, LogicalRect::new(200.0, 50.0, 1920.0, 800.0));
    }

    #[test]
    fn to_physical_rounds() {
        // Arrange
        let scale = DpiScale::new(1.25, 1.25).unwrap();

        // Act
        let (x, y) = scale.to_physical(Point::new(10.3, 7.0));

        // Assert
        assert_eq!((x, y), (13, 9));
    }
}

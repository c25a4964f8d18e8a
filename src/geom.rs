//! Geometry utilities: points, rectangles, grid snapping, and the ratio
//! projection that maps a placement into its parent's rendered space.
//!
//! Nothing here knows about components. A component's `position` is simply a
//! [`Rect`] that acts as the reference frame for its children, and
//! [`project_child_into_parent`] is the single transform the layout resolver
//! applies at every nesting level.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// Errors raised by geometry validation and snapping.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// Snapping requires a strictly positive grid unit.
    #[error("grid size must be positive, got {0}")]
    InvalidGrid(u32),
    /// A coordinate or size was NaN or infinite.
    #[error("non-finite geometry value: {0}")]
    NonFinite(f64),
    /// A reference frame with zero or negative width/height.
    #[error("degenerate frame: {width}x{height}")]
    Degenerate { width: f64, height: f64 },
    /// A placement with negative width/height.
    #[error("negative size: {width}x{height}")]
    NegativeSize { width: f64, height: f64 },
    /// The snapped value does not fit the integer grid range.
    #[error("value out of snapping range: {0}")]
    OutOfRange(f64),
}

/// A point in either relative or rendered space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle: `{x, y, width, height}`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Same size, shifted by `(dx, dy)`.
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..*self }
    }

    /// Whether `pt` lies inside the rectangle (edges inclusive).
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.width && pt.y >= self.y && pt.y <= self.y + self.height
    }

    /// Whether this rectangle can serve as a projection reference.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite()) || self.width <= 0.0 || self.height <= 0.0
    }

    /// Validate a rectangle used as a component's own frame.
    ///
    /// # Errors
    ///
    /// `NonFinite` for NaN/infinite values, `Degenerate` for a zero or
    /// negative width or height.
    pub fn validate_frame(&self) -> Result<(), GeometryError> {
        self.check_finite()?;
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(GeometryError::Degenerate { width: self.width, height: self.height });
        }
        Ok(())
    }

    /// Validate a rectangle used as a child placement. Zero-size placements
    /// are allowed; they simply render nothing below them.
    ///
    /// # Errors
    ///
    /// `NonFinite` for NaN/infinite values, `NegativeSize` for a negative
    /// width or height.
    pub fn validate_placement(&self) -> Result<(), GeometryError> {
        self.check_finite()?;
        if self.width < 0.0 || self.height < 0.0 {
            return Err(GeometryError::NegativeSize { width: self.width, height: self.height });
        }
        Ok(())
    }

    fn check_finite(&self) -> Result<(), GeometryError> {
        for v in [self.x, self.y, self.width, self.height] {
            if !v.is_finite() {
                return Err(GeometryError::NonFinite(v));
            }
        }
        Ok(())
    }
}

/// Round `value` to the nearest multiple of `grid_size`.
///
/// # Errors
///
/// `InvalidGrid` when `grid_size` is zero, `NonFinite` for NaN/infinite input,
/// `OutOfRange` when the snapped value would not fit in an `i64`.
#[allow(clippy::cast_possible_truncation)]
pub fn snap(value: f64, grid_size: u32) -> Result<i64, GeometryError> {
    // 2^63: the first f64 past i64::MAX.
    const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if grid_size == 0 {
        return Err(GeometryError::InvalidGrid(grid_size));
    }
    if !value.is_finite() {
        return Err(GeometryError::NonFinite(value));
    }
    let quotient = (value / f64::from(grid_size)).round();
    if quotient.abs() >= I64_LIMIT {
        return Err(GeometryError::OutOfRange(value));
    }
    (quotient as i64).checked_mul(i64::from(grid_size)).ok_or(GeometryError::OutOfRange(value))
}

/// Map `child`, expressed in `reference`'s frame, into a parent that renders
/// that frame at `parent_width` x `parent_height`.
///
/// The result is relative to the rendered frame's own origin. Returns `None`
/// when `reference` has no usable width or height.
#[must_use]
pub fn project_child_into_parent(child: &Rect, reference: &Rect, parent_width: f64, parent_height: f64) -> Option<Rect> {
    if reference.is_degenerate() {
        return None;
    }
    let scale_x = parent_width / reference.width;
    let scale_y = parent_height / reference.height;
    Some(Rect {
        x: (child.x - reference.x) * scale_x,
        y: (child.y - reference.y) * scale_y,
        width: child.width * scale_x,
        height: child.height * scale_y,
    })
}

//! Gesture helpers for callers that capture drag and resize input.
//!
//! The reducer records geometry as given. These builders turn the raw values
//! a pointer gesture reports into grid-aligned [`Transform`] payloads, so
//! every caller snaps the same way.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geom::{GeometryError, Point, Rect, snap};
use crate::reducer::Transform;

/// Snap a grid value back into geometry space.
#[allow(clippy::cast_precision_loss)]
fn snapped(value: f64, grid_size: u32) -> Result<f64, GeometryError> {
    Ok(snap(value, grid_size)? as f64)
}

/// Build the transform for a drag that left the node's top-left at `target`.
///
/// # Errors
///
/// `InvalidGrid` for a zero grid, `NonFinite` for NaN or infinite input.
pub fn drag_transform(target: Point, grid_size: u32) -> Result<Transform, GeometryError> {
    Ok(Transform { x: snapped(target.x, grid_size)?, y: snapped(target.y, grid_size)?, width: None, height: None })
}

/// Build the transform for a finished resize.
///
/// `node` is the resized shape as the gesture reports it: its offset from
/// the entity's stored origin and its unscaled size. `scale_x`/`scale_y` are
/// the factors the gesture applied. The new size is snapped; the new origin
/// is `origin` shifted by the node offset.
///
/// # Errors
///
/// `InvalidGrid` for a zero grid, `NonFinite` for NaN or infinite input.
pub fn resize_transform(
    node: &Rect,
    scale_x: f64,
    scale_y: f64,
    origin: &Rect,
    grid_size: u32,
) -> Result<Transform, GeometryError> {
    let x = node.x + origin.x;
    let y = node.y + origin.y;
    for value in [x, y] {
        if !value.is_finite() {
            return Err(GeometryError::NonFinite(value));
        }
    }
    Ok(Transform {
        x,
        y,
        width: Some(snapped(node.width * scale_x, grid_size)?),
        height: Some(snapped(node.height * scale_y, grid_size)?),
    })
}

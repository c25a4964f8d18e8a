//! Hit-testing against a resolved layout.
//!
//! Only direct placements of the focused component are selectable; a point
//! inside a nested placement selects the direct placement that contains it.
//! Later entries draw on top, so the scan runs in reverse draw order.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::ChildRef;
use crate::geom::{Point, Rect};
use crate::layout::LayoutNode;

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub child: ChildRef,
    /// Absolute rectangle of the hit placement, or the frame for the pseudo-child.
    pub rect: Rect,
}

/// Find the topmost direct placement under `pt`.
///
/// Falls back to the pseudo-child when `pt` is inside `frame` but over no
/// placement. Returns `None` outside the frame.
#[must_use]
pub fn hit_test(pt: Point, layout: &[LayoutNode], frame: Rect) -> Option<Hit> {
    let top = layout
        .iter()
        .rev()
        .filter(|node| node.depth == 0)
        .find(|node| node.rect.contains(pt))
        .map(|node| Hit { child: ChildRef::Placed(node.child_id), rect: node.rect });

    top.or_else(|| frame.contains(pt).then_some(Hit { child: ChildRef::Pseudo, rect: frame }))
}

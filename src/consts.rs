//! Shared constants for the composer crate.

// ── Identity ────────────────────────────────────────────────────

/// Raw id used on the wire for a component's pseudo-child (its own body).
pub const PSEUDO_CHILD_ID: i64 = -1;

/// Id assigned to the root component in a fresh editor state.
pub const ROOT_COMPONENT_ID: u32 = 1;

/// First id handed out by a component's child counter.
pub const FIRST_CHILD_ID: u32 = 1;

/// First id handed out by a component's prop counter.
pub const FIRST_PROP_ID: u32 = 1;

// ── Geometry ────────────────────────────────────────────────────

/// Grid unit used for drag/resize snapping when nothing else is configured.
pub const DEFAULT_GRID_SIZE: u32 = 5;

/// Title of the root component in a fresh editor state.
pub const DEFAULT_ROOT_TITLE: &str = "App";

/// Width of the root component's frame.
pub const DEFAULT_ROOT_WIDTH: f64 = 600.0;

/// Height of the root component's frame.
pub const DEFAULT_ROOT_HEIGHT: f64 = 400.0;

// ── Colors ──────────────────────────────────────────────────────

/// Border color of the root component.
pub const ROOT_COLOR: &str = "#FF6D00";

/// Border color used for element (non-component) placements.
pub const ELEMENT_COLOR: &str = "#000000";

/// Colors cycled through for components created without an explicit color.
pub const COMPONENT_PALETTE: [&str; 8] = [
    "#D94B4B", "#2E86AB", "#3BB273", "#E1BC29", "#7768AE", "#F18F01", "#16BAC5", "#C73E1D",
];

//! Component composition engine.
//!
//! Keeps a graph of reusable component definitions, each an ordered list of
//! placements that reference other components or primitive elements. Edits
//! arrive as [`reducer::Operation`] values and produce a new
//! [`state::EditorState`]; the layout resolver then derives absolute geometry
//! for any component at any rendered size from each level's own stored frame.
//! Rendering, export and input capture belong to the caller.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Single-writer [`engine::EngineCore`] that owns the current state |
//! | [`reducer`] | Operations, the pure `reduce` function, and [`reducer::EditError`] |
//! | [`state`] | Editor state and the exportable [`state::Snapshot`] |
//! | [`doc`] | Component, child and prop types; the id- and title-indexed store |
//! | [`focus`] | Focus tracker |
//! | [`layout`] | Recursive layout resolver |
//! | [`hit`] | Hit-testing against a resolved layout |
//! | [`input`] | Grid-snapped transforms for drag and resize gestures |
//! | [`geom`] | Points, rectangles, snapping and projection |
//! | [`config`] | Environment-driven engine configuration |
//! | [`consts`] | Shared constants (ids, defaults, colors) |

pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod focus;
pub mod geom;
pub mod hit;
pub mod input;
pub mod layout;
pub mod reducer;
pub mod state;

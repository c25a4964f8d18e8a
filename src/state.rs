//! Editor state: the component store, focus, and the global id counters.
//!
//! DESIGN
//! ======
//! `EditorState` is an immutable-by-convention snapshot. The reducer clones it
//! (cheap: components are `Arc`-shared), edits the clone and hands it back, so
//! every snapshot a caller has seen stays valid. `Snapshot` is the plain,
//! serde-friendly view handed to exporters; it carries no focus.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::consts::{COMPONENT_PALETTE, ROOT_COLOR, ROOT_COMPONENT_ID};
use crate::doc::{Component, ComponentId, ComponentStore};
use crate::focus::Focus;

/// Plain view of the component graph and its counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub components: Vec<Component>,
    pub next_id: u32,
    pub total_components: usize,
}

/// Full editor state.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub(crate) store: ComponentStore,
    pub(crate) focus: Focus,
    pub(crate) next_id: u32,
    pub(crate) total_components: usize,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl EditorState {
    /// A fresh state holding only the root component, unfocused.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        let mut store = ComponentStore::new();
        store.insert(Component::new(
            ComponentId(ROOT_COMPONENT_ID),
            config.root_title.clone(),
            ROOT_COLOR,
            config.root_frame,
        ));
        Self { store, focus: Focus::Unfocused, next_id: ROOT_COMPONENT_ID + 1, total_components: 1 }
    }

    #[must_use]
    pub fn store(&self) -> &ComponentStore {
        &self.store
    }

    #[must_use]
    pub fn focus(&self) -> Focus {
        self.focus
    }

    #[must_use]
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    #[must_use]
    pub fn total_components(&self) -> usize {
        self.total_components
    }

    #[must_use]
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.store.get(id)
    }

    /// The focused component, if any.
    #[must_use]
    pub fn focus_component(&self) -> Option<&Component> {
        self.focus.component().and_then(|id| self.store.get(id))
    }

    /// Exporter view of the component graph.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            components: self.store.iter().cloned().collect(),
            next_id: self.next_id,
            total_components: self.total_components,
        }
    }

    /// Palette color for a component created without an explicit one.
    #[must_use]
    pub fn palette_color(id: ComponentId) -> &'static str {
        COMPONENT_PALETTE[id.0 as usize % COMPONENT_PALETTE.len()]
    }
}

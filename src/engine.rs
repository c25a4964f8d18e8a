//! Single-writer engine wrapper.
//!
//! [`EngineCore`] owns the current [`EditorState`] and replaces it wholesale
//! with each successful [`reduce_with`] result. Callers read the state, resolve
//! layout, and hit-test through it; every write goes through
//! [`EngineCore::dispatch`].

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::debug;

use crate::config::EngineConfig;
use crate::doc::{ChildId, ComponentId};
use crate::focus::Focus;
use crate::geom::{Point, Rect};
use crate::hit::{Hit, hit_test};
use crate::layout::{LayoutNode, resolve_layout};
use crate::reducer::{EditError, Operation, reduce_with};
use crate::state::{EditorState, Snapshot};

/// Notifications returned from a dispatch for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ComponentCreated { id: ComponentId },
    ChildCreated { component_id: ComponentId, child_id: ChildId },
    FocusChanged(Focus),
    RenderNeeded,
}

/// Engine state: the current snapshot and the configuration it was built with.
#[derive(Debug, Clone, Default)]
pub struct EngineCore {
    state: EditorState,
    config: EngineConfig,
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { state: EditorState::new(&config), config }
    }

    // --- Writes ---

    /// Apply one operation.
    ///
    /// # Errors
    ///
    /// Any [`EditError`] from the reducer. The current state is unchanged.
    pub fn dispatch(&mut self, op: Operation) -> Result<Vec<Action>, EditError> {
        let name = op.name();
        let created = self.pending_ids(&op);
        let next = match reduce_with(&self.config, &self.state, op) {
            Ok(next) => next,
            Err(e) => {
                debug!(op = name, error = %e, code = e.error_code(), "operation rejected");
                return Err(e);
            }
        };

        let mut actions = Vec::new();
        match created {
            Some(Created::Component(id)) => actions.push(Action::ComponentCreated { id }),
            Some(Created::Child(component_id, child_id)) => {
                actions.push(Action::ChildCreated { component_id, child_id });
            }
            None => {}
        }
        if next.focus() != self.state.focus() {
            actions.push(Action::FocusChanged(next.focus()));
        }
        actions.push(Action::RenderNeeded);

        self.state = next;
        debug!(
            op = name,
            components = self.state.total_components(),
            focus = ?self.state.focus(),
            "operation applied"
        );
        Ok(actions)
    }

    /// Ids an operation will assign if it succeeds.
    fn pending_ids(&self, op: &Operation) -> Option<Created> {
        match op {
            Operation::AddComponent { .. } => Some(Created::Component(ComponentId(self.state.next_id()))),
            Operation::AddChild { component_id, .. } => self
                .state
                .component(*component_id)
                .map(|c| Created::Child(*component_id, ChildId(c.next_child_id))),
            _ => None,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Resolve the focused component rendered into `rendered`.
    ///
    /// # Errors
    ///
    /// `NoFocusComponent` when nothing is focused.
    pub fn focus_layout(&self, rendered: Rect) -> Result<Vec<LayoutNode>, EditError> {
        let focused = self.state.focus().component().ok_or(EditError::NoFocusComponent)?;
        resolve_layout(self.state.store(), focused, rendered)
    }

    /// Resolve any component rendered into `rendered`.
    ///
    /// # Errors
    ///
    /// `ComponentNotFound` for an unknown id.
    pub fn layout(&self, component_id: ComponentId, rendered: Rect) -> Result<Vec<LayoutNode>, EditError> {
        resolve_layout(self.state.store(), component_id, rendered)
    }

    /// Resolve what a viewer would show: the focused component, or the
    /// lowest-id remaining component when nothing is focused. Empty when the
    /// store holds no components at all.
    ///
    /// # Errors
    ///
    /// Whatever [`resolve_layout`] returns; none for a consistent state.
    pub fn current_layout(&self, rendered: Rect) -> Result<Vec<LayoutNode>, EditError> {
        let target = self.state.focus().component().or_else(|| self.state.store().iter().next().map(|c| c.id));
        match target {
            Some(id) => resolve_layout(self.state.store(), id, rendered),
            None => Ok(Vec::new()),
        }
    }

    /// Hit-test `pt` against the focused component rendered into `rendered`.
    ///
    /// # Errors
    ///
    /// `NoFocusComponent` when nothing is focused.
    pub fn hit_test(&self, pt: Point, rendered: Rect) -> Result<Option<Hit>, EditError> {
        let layout = self.focus_layout(rendered)?;
        Ok(hit_test(pt, &layout, rendered))
    }
}

enum Created {
    Component(ComponentId),
    Child(ComponentId, ChildId),
}

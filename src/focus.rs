//! Focus tracker: which component is being edited and, within it, which
//! child (or the pseudo-child) is selected.
//!
//! Focus is transient view state. It is never part of an exported snapshot and
//! must never point at an entity that a mutation removed; the `invalidate_*`
//! helpers drop back to [`Focus::Unfocused`] whenever that would happen.

#[cfg(test)]
#[path = "focus_test.rs"]
mod focus_test;

use serde::{Deserialize, Serialize};

use crate::doc::{ChildId, ChildRef, ComponentId};

/// Coarse state of the focus machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusState {
    Unfocused,
    ComponentFocused,
    ChildFocused,
}

/// Current editing focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Focus {
    /// Nothing selected.
    #[default]
    Unfocused,
    /// A component is open for editing; no child is selected.
    Component { component: ComponentId },
    /// A child (or the pseudo-child) of the focused component is selected.
    Child { component: ComponentId, child: ChildRef },
}

impl Focus {
    #[must_use]
    pub fn state(&self) -> FocusState {
        match self {
            Self::Unfocused => FocusState::Unfocused,
            Self::Component { .. } => FocusState::ComponentFocused,
            Self::Child { .. } => FocusState::ChildFocused,
        }
    }

    /// The focused component, in either focused state.
    #[must_use]
    pub fn component(&self) -> Option<ComponentId> {
        match *self {
            Self::Unfocused => None,
            Self::Component { component } | Self::Child { component, .. } => Some(component),
        }
    }

    /// The focused child, if one is selected.
    #[must_use]
    pub fn child(&self) -> Option<ChildRef> {
        match *self {
            Self::Child { child, .. } => Some(child),
            _ => None,
        }
    }

    /// Focus after `component` was deleted.
    #[must_use]
    pub fn invalidate_component(self, component: ComponentId) -> Self {
        if self.component() == Some(component) { Self::Unfocused } else { self }
    }

    /// Focus after `child` was removed from `component`.
    #[must_use]
    pub fn invalidate_child(self, component: ComponentId, child: ChildId) -> Self {
        match self {
            Self::Child { component: c, child: ChildRef::Placed(id) } if c == component && id == child => {
                Self::Unfocused
            }
            other => other,
        }
    }
}

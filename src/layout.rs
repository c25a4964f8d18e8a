//! Recursive layout resolver.
//!
//! Given a component and the rectangle it is rendered into, produce the
//! absolute rectangle of every placement below it. Each level is projected
//! from the placement's geometry relative to its own component's `position`,
//! so a definition reused at several sizes renders correctly everywhere. No
//! absolute geometry is ever stored for nested placements.
//!
//! Output is flattened in draw order: a placement, then everything inside it,
//! then its next sibling. The pseudo-child is not emitted; it is the rendered
//! frame the caller passed in.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use serde::Serialize;
use tracing::warn;

use crate::consts::ELEMENT_COLOR;
use crate::doc::{ChildId, ChildKind, ChildType, Component, ComponentId, ComponentStore};
use crate::geom::{Rect, project_child_into_parent};
use crate::reducer::EditError;

/// One resolved placement, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    /// Id of the placement within the component that declares it.
    pub child_id: ChildId,
    /// Child ids from the resolved component down to this placement.
    pub path: Vec<ChildId>,
    /// 0 for direct children of the resolved component.
    pub depth: usize,
    /// Absolute rendered rectangle.
    pub rect: Rect,
    pub child_type: ChildType,
    /// The referenced component, for component placements.
    pub component_id: Option<ComponentId>,
    /// Border color: the referenced component's color, or the element color.
    pub color: String,
    /// Referenced component title or element tag.
    pub label: String,
}

impl LayoutNode {
    /// Id of the direct child of the resolved component this node belongs to.
    #[must_use]
    pub fn root_child_id(&self) -> ChildId {
        self.path.first().copied().unwrap_or(self.child_id)
    }
}

/// Resolve every placement below `component_id`, rendered into `rendered`.
///
/// # Errors
///
/// `ComponentNotFound` if `component_id` is not in the store. A zero-size
/// frame anywhere in the tree is not an error; that subtree resolves to
/// nothing.
pub fn resolve_layout(
    store: &ComponentStore,
    component_id: ComponentId,
    rendered: Rect,
) -> Result<Vec<LayoutNode>, EditError> {
    let component = store.get(component_id).ok_or(EditError::ComponentNotFound(component_id))?;
    let mut resolver = Resolver { store, out: Vec::new(), path: Vec::new(), ancestors: vec![component_id] };
    resolver.walk(component, rendered, 0);
    Ok(resolver.out)
}

struct Resolver<'a> {
    store: &'a ComponentStore,
    out: Vec<LayoutNode>,
    path: Vec<ChildId>,
    ancestors: Vec<ComponentId>,
}

impl<'a> Resolver<'a> {
    fn walk(&mut self, component: &'a Component, frame: Rect, depth: usize) {
        let reference = component.position;
        if reference.is_degenerate() {
            return;
        }

        for child in &component.children {
            let Some(local) = project_child_into_parent(&child.position, &reference, frame.width, frame.height) else {
                return;
            };
            let rect = local.translate(frame.x, frame.y);

            let nested = match &child.kind {
                ChildKind::Component { component_name, .. } => {
                    let found = self.store.get_by_title(component_name);
                    if found.is_none() {
                        warn!(component = %component.id, child = %child.child_id, name = %component_name, "placement names unknown component");
                    }
                    found
                }
                ChildKind::Element { .. } => None,
            };

            self.path.push(child.child_id);
            self.out.push(LayoutNode {
                child_id: child.child_id,
                path: self.path.clone(),
                depth,
                rect,
                child_type: child.child_type(),
                component_id: child.component_id(),
                color: nested.map_or_else(|| ELEMENT_COLOR.to_owned(), |c| c.color.clone()),
                label: child.label().to_owned(),
            });

            if let Some(target) = nested {
                if self.ancestors.contains(&target.id) {
                    warn!(component = %target.id, "placement cycle; not expanding");
                } else {
                    self.ancestors.push(target.id);
                    self.walk(target, rect, depth + 1);
                    self.ancestors.pop();
                }
            }
            self.path.pop();
        }
    }
}

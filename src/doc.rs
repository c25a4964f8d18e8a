//! Document model: component definitions, their child placements, and the
//! in-memory store that owns every definition.
//!
//! Definitions and placements are kept apart. A [`Component`] owns its
//! geometry and its ordered [`Child`] list; a child only holds a *reference*
//! (id and title) to the component it instantiates. One definition can be
//! placed in many parents and an edit to it is visible everywhere at once.
//!
//! [`ComponentStore`] indexes definitions by id and, secondarily, by title.
//! Components are held behind `Arc` so that cloning a store is cheap and
//! untouched definitions are shared between successive editor snapshots.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::consts::{FIRST_CHILD_ID, FIRST_PROP_ID, PSEUDO_CHILD_ID};
use crate::geom::Rect;

/// Unique identifier of a component definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub u32);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a child placement, unique within its parent component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildId(pub u32);

impl fmt::Display for ChildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a prop, unique within its component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropId(pub u32);

impl fmt::Display for PropId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Either a stored child or the component's own body.
///
/// On the wire the pseudo-child is `-1` and stored children are their
/// positive id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ChildRef {
    /// The synthesized pseudo-child standing for the component itself.
    Pseudo,
    /// A child stored in the component's `children` list.
    Placed(ChildId),
}

impl TryFrom<i64> for ChildRef {
    type Error = String;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        if raw == PSEUDO_CHILD_ID {
            return Ok(Self::Pseudo);
        }
        match u32::try_from(raw) {
            Ok(id) if id > 0 => Ok(Self::Placed(ChildId(id))),
            _ => Err(format!("invalid child id: {raw}")),
        }
    }
}

impl From<ChildRef> for i64 {
    fn from(child: ChildRef) -> Self {
        match child {
            ChildRef::Pseudo => PSEUDO_CHILD_ID,
            ChildRef::Placed(id) => i64::from(id.0),
        }
    }
}

impl From<ChildId> for ChildRef {
    fn from(id: ChildId) -> Self {
        Self::Placed(id)
    }
}

impl fmt::Display for ChildRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", i64::from(*self))
    }
}

/// Discriminator for what a placement renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildType {
    /// Expands recursively into another component's children.
    Component,
    /// Terminal primitive element (e.g. `div`, `button`).
    Element,
}

/// What a child placement instantiates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChildKind {
    /// An instance of another component, referenced by id and title.
    Component { component_id: ComponentId, component_name: String },
    /// A primitive element identified by its tag.
    Element { tag: String },
}

/// A placement of one component instance (or element) inside a parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub child_id: ChildId,
    pub kind: ChildKind,
    /// Geometry relative to the parent's own `position`.
    pub position: Rect,
    #[serde(default)]
    pub html_attributes: BTreeMap<String, String>,
}

impl Child {
    #[must_use]
    pub fn child_type(&self) -> ChildType {
        match self.kind {
            ChildKind::Component { .. } => ChildType::Component,
            ChildKind::Element { .. } => ChildType::Element,
        }
    }

    /// Id of the referenced component, if this is a component placement.
    #[must_use]
    pub fn component_id(&self) -> Option<ComponentId> {
        match self.kind {
            ChildKind::Component { component_id, .. } => Some(component_id),
            ChildKind::Element { .. } => None,
        }
    }

    /// Title of the referenced component, or the element tag.
    #[must_use]
    pub fn label(&self) -> &str {
        match &self.kind {
            ChildKind::Component { component_name, .. } => component_name,
            ChildKind::Element { tag } => tag,
        }
    }
}

/// Synthesized view of a component's own body. Never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoChild {
    pub component_id: ComponentId,
    pub title: String,
    pub position: Rect,
}

/// A declared prop on a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prop {
    pub id: PropId,
    pub key: String,
    pub value: String,
    pub required: bool,
    pub prop_type: String,
}

/// A reusable component definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub title: String,
    pub color: String,
    /// The component's own frame; children are expressed relative to it.
    pub position: Rect,
    /// Placements in z-order: first is bottom, last is top.
    pub children: Vec<Child>,
    pub next_child_id: u32,
    #[serde(default)]
    pub focus_child_id: Option<ChildRef>,
    #[serde(default)]
    pub selectable_parents: Vec<ComponentId>,
    #[serde(default)]
    pub props: Vec<Prop>,
    pub next_prop_id: u32,
    #[serde(default)]
    pub stateful: bool,
}

impl Component {
    /// A fresh definition with no children, props, or editing metadata.
    #[must_use]
    pub fn new(id: ComponentId, title: impl Into<String>, color: impl Into<String>, position: Rect) -> Self {
        Self {
            id,
            title: title.into(),
            color: color.into(),
            position,
            children: Vec::new(),
            next_child_id: FIRST_CHILD_ID,
            focus_child_id: None,
            selectable_parents: Vec::new(),
            props: Vec::new(),
            next_prop_id: FIRST_PROP_ID,
            stateful: false,
        }
    }

    #[must_use]
    pub fn pseudo_child(&self) -> PseudoChild {
        PseudoChild { component_id: self.id, title: self.title.clone(), position: self.position }
    }

    #[must_use]
    pub fn child(&self, id: ChildId) -> Option<&Child> {
        self.children.iter().find(|c| c.child_id == id)
    }

    pub fn child_mut(&mut self, id: ChildId) -> Option<&mut Child> {
        self.children.iter_mut().find(|c| c.child_id == id)
    }

    /// Index of a child in z-order.
    #[must_use]
    pub fn child_index(&self, id: ChildId) -> Option<usize> {
        self.children.iter().position(|c| c.child_id == id)
    }

    /// Whether `child` names the pseudo-child or a stored child.
    #[must_use]
    pub fn has_child(&self, child: ChildRef) -> bool {
        match child {
            ChildRef::Pseudo => true,
            ChildRef::Placed(id) => self.child(id).is_some(),
        }
    }

    /// Geometry of a stored child or of the pseudo-child.
    #[must_use]
    pub fn position_of(&self, child: ChildRef) -> Option<Rect> {
        match child {
            ChildRef::Pseudo => Some(self.position),
            ChildRef::Placed(id) => self.child(id).map(|c| c.position),
        }
    }

    /// Ids of the components this definition places directly.
    pub fn referenced_components(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.children.iter().filter_map(Child::component_id)
    }
}

/// In-memory store of component definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentStore {
    components: BTreeMap<ComponentId, Arc<Component>>,
    by_title: BTreeMap<String, ComponentId>,
}

impl ComponentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a component, keeping the title index in step.
    pub fn insert(&mut self, component: Component) {
        if let Some(old) = self.components.get(&component.id) {
            self.by_title.remove(&old.title);
        }
        self.by_title.insert(component.title.clone(), component.id);
        self.components.insert(component.id, Arc::new(component));
    }

    /// Remove a component by id, returning it if it was present.
    pub fn remove(&mut self, id: ComponentId) -> Option<Arc<Component>> {
        let removed = self.components.remove(&id)?;
        self.by_title.remove(&removed.title);
        Some(removed)
    }

    #[must_use]
    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(&id).map(Arc::as_ref)
    }

    /// Look up a component through the secondary title index.
    #[must_use]
    pub fn get_by_title(&self, title: &str) -> Option<&Component> {
        self.by_title.get(title).and_then(|id| self.get(*id))
    }

    #[must_use]
    pub fn contains(&self, id: ComponentId) -> bool {
        self.components.contains_key(&id)
    }

    #[must_use]
    pub fn title_taken(&self, title: &str) -> bool {
        self.by_title.contains_key(title)
    }

    /// Mutable access for edits that leave the title alone. Clones the
    /// definition first if another snapshot still shares it.
    pub(crate) fn get_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.get_mut(&id).map(Arc::make_mut)
    }

    /// Change a component's title, updating the title index and the
    /// `component_name` of every child that references it.
    ///
    /// Returns false if the component does not exist. Uniqueness is the
    /// caller's responsibility.
    pub(crate) fn rename(&mut self, id: ComponentId, title: &str) -> bool {
        let Some(component) = self.get_mut(id) else {
            return false;
        };
        let old = std::mem::replace(&mut component.title, title.to_owned());
        self.by_title.remove(&old);
        self.by_title.insert(title.to_owned(), id);

        for parent in self.referrers(id) {
            let Some(parent) = self.get_mut(parent) else {
                continue;
            };
            for child in &mut parent.children {
                if let ChildKind::Component { component_id, component_name } = &mut child.kind {
                    if *component_id == id {
                        title.clone_into(component_name);
                    }
                }
            }
        }
        true
    }

    /// Ids of the components that place `id` as a child at least once.
    #[must_use]
    pub fn referrers(&self, id: ComponentId) -> Vec<ComponentId> {
        self.components
            .values()
            .filter(|c| c.referenced_components().any(|r| r == id))
            .map(|c| c.id)
            .collect()
    }

    /// Whether `target` is reachable from `from` by following component
    /// placements. A component always reaches itself.
    #[must_use]
    pub fn reaches(&self, from: ComponentId, target: ComponentId) -> bool {
        let mut seen = BTreeSet::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if !seen.insert(id) {
                continue;
            }
            if let Some(component) = self.get(id) {
                stack.extend(component.referenced_components());
            }
        }
        false
    }

    /// A component that lies on a placement cycle, if any exists.
    #[must_use]
    pub fn find_cycle(&self) -> Option<ComponentId> {
        self.components
            .values()
            .find(|c| c.referenced_components().any(|r| self.reaches(r, c.id)))
            .map(|c| c.id)
    }

    /// Components in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.values().map(Arc::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Whether two stores share the same allocation for `id`.
    #[must_use]
    pub fn shares(&self, other: &Self, id: ComponentId) -> bool {
        match (self.components.get(&id), other.components.get(&id)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

//! Mutation engine: every structural and geometric edit as a pure function
//! from `(state, operation)` to a new state.
//!
//! DESIGN
//! ======
//! `reduce` clones the incoming snapshot, applies one [`Operation`] to the
//! clone, and returns it. Components are `Arc`-shared, so only the
//! definitions an operation touches are copied. A rejected operation returns
//! an [`EditError`] and the caller keeps its untouched prior snapshot; there
//! is no partially-applied state.
//!
//! Snapping is the caller's job. Drag and resize payloads arrive already
//! grid-aligned (see [`crate::input`]) and are recorded as-is.

#[cfg(test)]
#[path = "reducer_test.rs"]
mod reducer_test;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::doc::{Child, ChildId, ChildKind, ChildRef, Component, ComponentId, ComponentStore, Prop, PropId};
use crate::focus::Focus;
use crate::geom::{GeometryError, Rect};
use crate::state::{EditorState, Snapshot};

// =============================================================================
// TYPES
// =============================================================================

/// What a new child placement should instantiate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NewChild {
    /// An instance of an existing component.
    Component { component_id: ComponentId },
    /// A primitive element.
    Element { tag: String },
}

/// Sparse update for a component's metadata. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stateful: Option<bool>,
}

/// Already-snapped geometry from a drag (x/y) or resize (all four).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl Transform {
    /// Geometry after applying this transform to `current`.
    #[must_use]
    pub fn apply(&self, current: &Rect) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width.unwrap_or(current.width),
            height: self.height.unwrap_or(current.height),
        }
    }
}

/// One edit to the editor state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    AddComponent {
        title: String,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        position: Option<Rect>,
    },
    AddChild {
        component_id: ComponentId,
        child: NewChild,
        position: Rect,
    },
    DeleteChild {
        component_id: ComponentId,
        child_id: ChildId,
    },
    UpdateComponent {
        component_id: ComponentId,
        update: ComponentUpdate,
    },
    DeleteComponent {
        component_id: ComponentId,
    },
    ChangeFocusComponent {
        component_id: ComponentId,
    },
    ChangeFocusChild {
        child: ChildRef,
    },
    ChangeComponentFocusChild {
        component_id: ComponentId,
        child: ChildRef,
    },
    HandleTransform {
        component_id: ComponentId,
        child: ChildRef,
        transform: Transform,
    },
    MoveToTop {
        component_id: ComponentId,
        child_id: ChildId,
    },
    MoveToBottom {
        component_id: ComponentId,
        child_id: ChildId,
    },
    AddProp {
        component_id: ComponentId,
        key: String,
        #[serde(default)]
        value: String,
        #[serde(default)]
        required: bool,
        #[serde(default)]
        prop_type: String,
    },
    DeleteProp {
        component_id: ComponentId,
        prop_id: PropId,
    },
    UpdateHtmlAttribute {
        component_id: ComponentId,
        child_id: ChildId,
        attribute: String,
        value: String,
    },
    SetSelectableParents,
    LoadSnapshot {
        snapshot: Snapshot,
    },
    Reset,
}

impl Operation {
    /// Stable name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddComponent { .. } => "add_component",
            Self::AddChild { .. } => "add_child",
            Self::DeleteChild { .. } => "delete_child",
            Self::UpdateComponent { .. } => "update_component",
            Self::DeleteComponent { .. } => "delete_component",
            Self::ChangeFocusComponent { .. } => "change_focus_component",
            Self::ChangeFocusChild { .. } => "change_focus_child",
            Self::ChangeComponentFocusChild { .. } => "change_component_focus_child",
            Self::HandleTransform { .. } => "handle_transform",
            Self::MoveToTop { .. } => "move_to_top",
            Self::MoveToBottom { .. } => "move_to_bottom",
            Self::AddProp { .. } => "add_prop",
            Self::DeleteProp { .. } => "delete_prop",
            Self::UpdateHtmlAttribute { .. } => "update_html_attribute",
            Self::SetSelectableParents => "set_selectable_parents",
            Self::LoadSnapshot { .. } => "load_snapshot",
            Self::Reset => "reset",
        }
    }
}

/// Broad class of a rejected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A named component, child, or prop does not exist.
    Reference,
    /// A title or key collides with an existing one.
    Uniqueness,
    /// The edit would make a component contain itself.
    Cycle,
    /// The edit would produce unusable geometry.
    Geometry,
    /// A loaded snapshot is internally inconsistent.
    Snapshot,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("component not found: {0}")]
    ComponentNotFound(ComponentId),
    #[error("child {child} not found in component {component}")]
    ChildNotFound { component: ComponentId, child: ChildRef },
    #[error("prop {prop} not found in component {component}")]
    PropNotFound { component: ComponentId, prop: PropId },
    #[error("no component is focused")]
    NoFocusComponent,
    #[error("component title already in use: {0}")]
    DuplicateTitle(String),
    #[error("component title must not be empty")]
    EmptyTitle,
    #[error("prop key already declared on component {component}: {key}")]
    DuplicateProp { component: ComponentId, key: String },
    #[error("element tag must not be empty")]
    EmptyTag,
    #[error("placing component {child} inside {parent} would create a cycle")]
    CycleDetected { parent: ComponentId, child: ComponentId },
    #[error("invalid geometry: {0}")]
    Geometry(#[from] GeometryError),
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
    #[error("no {0} ids left to allocate")]
    IdSpaceExhausted(IdSpace),
}

/// Counter that ran out of ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSpace {
    Component,
    Child,
    Prop,
}

impl std::fmt::Display for IdSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Component => "component",
            Self::Child => "child",
            Self::Prop => "prop",
        })
    }
}

impl EditError {
    /// Stable machine-readable code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ComponentNotFound(_) => "E_COMPONENT_NOT_FOUND",
            Self::ChildNotFound { .. } => "E_CHILD_NOT_FOUND",
            Self::PropNotFound { .. } => "E_PROP_NOT_FOUND",
            Self::NoFocusComponent => "E_NO_FOCUS_COMPONENT",
            Self::DuplicateTitle(_) => "E_DUPLICATE_TITLE",
            Self::EmptyTitle => "E_EMPTY_TITLE",
            Self::DuplicateProp { .. } => "E_DUPLICATE_PROP",
            Self::EmptyTag => "E_EMPTY_TAG",
            Self::CycleDetected { .. } => "E_CYCLE",
            Self::Geometry(_) => "E_GEOMETRY",
            Self::InvalidSnapshot(_) => "E_INVALID_SNAPSHOT",
            Self::IdSpaceExhausted(_) => "E_ID_SPACE_EXHAUSTED",
        }
    }

    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ComponentNotFound(_)
            | Self::ChildNotFound { .. }
            | Self::PropNotFound { .. }
            | Self::NoFocusComponent
            | Self::EmptyTag => ErrorCategory::Reference,
            Self::DuplicateTitle(_)
            | Self::EmptyTitle
            | Self::DuplicateProp { .. }
            | Self::IdSpaceExhausted(_) => ErrorCategory::Uniqueness,
            Self::CycleDetected { .. } => ErrorCategory::Cycle,
            Self::Geometry(_) => ErrorCategory::Geometry,
            Self::InvalidSnapshot(_) => ErrorCategory::Snapshot,
        }
    }
}

// =============================================================================
// REDUCE
// =============================================================================

/// Apply `op` to `state` with default configuration.
///
/// # Errors
///
/// Any [`EditError`]; `state` is never modified.
pub fn reduce(state: &EditorState, op: Operation) -> Result<EditorState, EditError> {
    reduce_with(&EngineConfig::default(), state, op)
}

/// Apply `op` to `state`. `config` supplies the default frame for new
/// components and the root used by `Reset`.
///
/// # Errors
///
/// Any [`EditError`]; `state` is never modified.
pub fn reduce_with(config: &EngineConfig, state: &EditorState, op: Operation) -> Result<EditorState, EditError> {
    let mut next = state.clone();
    match op {
        Operation::AddComponent { title, color, position } => {
            add_component(&mut next, title, color, position.unwrap_or(config.root_frame))?;
        }
        Operation::AddChild { component_id, child, position } => add_child(&mut next, component_id, child, position)?,
        Operation::DeleteChild { component_id, child_id } => delete_child(&mut next, component_id, child_id)?,
        Operation::UpdateComponent { component_id, update } => update_component(&mut next, component_id, update)?,
        Operation::DeleteComponent { component_id } => delete_component(&mut next, component_id)?,
        Operation::ChangeFocusComponent { component_id } => change_focus_component(&mut next, component_id)?,
        Operation::ChangeFocusChild { child } => change_focus_child(&mut next, child)?,
        Operation::ChangeComponentFocusChild { component_id, child } => {
            let component = component_mut(&mut next.store, component_id)?;
            if !component.has_child(child) {
                return Err(EditError::ChildNotFound { component: component_id, child });
            }
            component.focus_child_id = Some(child);
        }
        Operation::HandleTransform { component_id, child, transform } => {
            handle_transform(&mut next, component_id, child, transform)?;
        }
        Operation::MoveToTop { component_id, child_id } => move_child(&mut next, component_id, child_id, true)?,
        Operation::MoveToBottom { component_id, child_id } => move_child(&mut next, component_id, child_id, false)?,
        Operation::AddProp { component_id, key, value, required, prop_type } => {
            add_prop(&mut next, component_id, key, value, required, prop_type)?;
        }
        Operation::DeleteProp { component_id, prop_id } => {
            let component = component_mut(&mut next.store, component_id)?;
            let index = component
                .props
                .iter()
                .position(|p| p.id == prop_id)
                .ok_or(EditError::PropNotFound { component: component_id, prop: prop_id })?;
            component.props.remove(index);
        }
        Operation::UpdateHtmlAttribute { component_id, child_id, attribute, value } => {
            let component = component_mut(&mut next.store, component_id)?;
            let child = component.child_mut(child_id).ok_or(EditError::ChildNotFound {
                component: component_id,
                child: ChildRef::Placed(child_id),
            })?;
            child.html_attributes.insert(attribute, value);
        }
        Operation::SetSelectableParents => {
            let focused = next.focus.component().ok_or(EditError::NoFocusComponent)?;
            refresh_selectable_parents(&mut next.store, focused)?;
        }
        Operation::LoadSnapshot { snapshot } => return load_snapshot(snapshot),
        Operation::Reset => return Ok(EditorState::new(config)),
    }
    Ok(next)
}

// =============================================================================
// COMPONENTS
// =============================================================================

fn add_component(
    state: &mut EditorState,
    title: String,
    color: Option<String>,
    position: Rect,
) -> Result<(), EditError> {
    let title = validate_title(&state.store, &title)?;
    position.validate_frame()?;

    let id = ComponentId(state.next_id);
    state.next_id = next_counter(state.next_id, IdSpace::Component)?;
    let color = color.unwrap_or_else(|| EditorState::palette_color(id).to_owned());
    state.store.insert(Component::new(id, title, color, position));
    state.total_components += 1;
    Ok(())
}

fn update_component(state: &mut EditorState, id: ComponentId, update: ComponentUpdate) -> Result<(), EditError> {
    let current = state.store.get(id).ok_or(EditError::ComponentNotFound(id))?;
    let rename = match update.title {
        Some(ref raw) if raw.trim() != current.title => Some(validate_title(&state.store, raw)?),
        _ => None,
    };

    if let Some(title) = rename {
        state.store.rename(id, &title);
    }
    let component = component_mut(&mut state.store, id)?;
    if let Some(color) = update.color {
        component.color = color;
    }
    if let Some(stateful) = update.stateful {
        component.stateful = stateful;
    }
    Ok(())
}

/// Remove a component and, in cascade, every placement of it elsewhere.
fn delete_component(state: &mut EditorState, id: ComponentId) -> Result<(), EditError> {
    if !state.store.contains(id) {
        return Err(EditError::ComponentNotFound(id));
    }

    for parent_id in state.store.referrers(id) {
        let Some(parent) = state.store.get_mut(parent_id) else {
            continue;
        };
        let removed: Vec<ChildId> = parent
            .children
            .iter()
            .filter(|c| c.component_id() == Some(id))
            .map(|c| c.child_id)
            .collect();
        parent.children.retain(|c| c.component_id() != Some(id));
        for child_id in removed {
            clear_component_focus_child(parent, child_id);
            state.focus = state.focus.invalidate_child(parent_id, child_id);
        }
    }

    let holders: Vec<ComponentId> =
        state.store.iter().filter(|c| c.selectable_parents.contains(&id)).map(|c| c.id).collect();
    for holder in holders {
        if let Some(component) = state.store.get_mut(holder) {
            component.selectable_parents.retain(|p| *p != id);
        }
    }

    state.store.remove(id);
    state.total_components -= 1;
    state.focus = state.focus.invalidate_component(id);
    Ok(())
}

fn add_prop(
    state: &mut EditorState,
    id: ComponentId,
    key: String,
    value: String,
    required: bool,
    prop_type: String,
) -> Result<(), EditError> {
    let component = component_mut(&mut state.store, id)?;
    if component.props.iter().any(|p| p.key == key) {
        return Err(EditError::DuplicateProp { component: id, key });
    }
    let prop_id = PropId(component.next_prop_id);
    component.next_prop_id = next_counter(component.next_prop_id, IdSpace::Prop)?;
    component.props.push(Prop { id: prop_id, key, value, required, prop_type });
    Ok(())
}

// =============================================================================
// CHILDREN
// =============================================================================

fn add_child(state: &mut EditorState, parent_id: ComponentId, child: NewChild, position: Rect) -> Result<(), EditError> {
    if !state.store.contains(parent_id) {
        return Err(EditError::ComponentNotFound(parent_id));
    }
    position.validate_placement()?;

    let kind = match child {
        NewChild::Component { component_id } => {
            let target = state.store.get(component_id).ok_or(EditError::ComponentNotFound(component_id))?;
            if state.store.reaches(component_id, parent_id) {
                return Err(EditError::CycleDetected { parent: parent_id, child: component_id });
            }
            ChildKind::Component { component_id, component_name: target.title.clone() }
        }
        NewChild::Element { tag } => {
            let tag = tag.trim();
            if tag.is_empty() {
                return Err(EditError::EmptyTag);
            }
            ChildKind::Element { tag: tag.to_owned() }
        }
    };

    let parent = component_mut(&mut state.store, parent_id)?;
    let child_id = ChildId(parent.next_child_id);
    parent.next_child_id = next_counter(parent.next_child_id, IdSpace::Child)?;
    parent.children.push(Child { child_id, kind, position, html_attributes: BTreeMap::new() });
    Ok(())
}

fn delete_child(state: &mut EditorState, component_id: ComponentId, child_id: ChildId) -> Result<(), EditError> {
    let component = component_mut(&mut state.store, component_id)?;
    let index = component
        .child_index(child_id)
        .ok_or(EditError::ChildNotFound { component: component_id, child: ChildRef::Placed(child_id) })?;
    component.children.remove(index);
    clear_component_focus_child(component, child_id);
    state.focus = state.focus.invalidate_child(component_id, child_id);
    Ok(())
}

fn handle_transform(
    state: &mut EditorState,
    component_id: ComponentId,
    child: ChildRef,
    transform: Transform,
) -> Result<(), EditError> {
    let component = component_mut(&mut state.store, component_id)?;
    match child {
        ChildRef::Pseudo => {
            let next = transform.apply(&component.position);
            next.validate_frame()?;
            component.position = next;
        }
        ChildRef::Placed(id) => {
            let target = component.child_mut(id).ok_or(EditError::ChildNotFound { component: component_id, child })?;
            let next = transform.apply(&target.position);
            next.validate_placement()?;
            target.position = next;
        }
    }
    Ok(())
}

fn move_child(state: &mut EditorState, component_id: ComponentId, child_id: ChildId, to_top: bool) -> Result<(), EditError> {
    let component = component_mut(&mut state.store, component_id)?;
    let index = component
        .child_index(child_id)
        .ok_or(EditError::ChildNotFound { component: component_id, child: ChildRef::Placed(child_id) })?;
    let child = component.children.remove(index);
    if to_top {
        component.children.push(child);
    } else {
        component.children.insert(0, child);
    }
    Ok(())
}

// =============================================================================
// FOCUS
// =============================================================================

fn change_focus_component(state: &mut EditorState, id: ComponentId) -> Result<(), EditError> {
    if !state.store.contains(id) {
        return Err(EditError::ComponentNotFound(id));
    }
    state.focus = Focus::Component { component: id };
    Ok(())
}

fn change_focus_child(state: &mut EditorState, child: ChildRef) -> Result<(), EditError> {
    let component_id = state.focus.component().ok_or(EditError::NoFocusComponent)?;
    let component = state.store.get(component_id).ok_or(EditError::ComponentNotFound(component_id))?;
    if !component.has_child(child) {
        return Err(EditError::ChildNotFound { component: component_id, child });
    }
    state.focus = Focus::Child { component: component_id, child };
    Ok(())
}

/// Recompute which components could adopt `id` as a child without a cycle.
fn refresh_selectable_parents(store: &mut ComponentStore, id: ComponentId) -> Result<(), EditError> {
    if !store.contains(id) {
        return Err(EditError::ComponentNotFound(id));
    }
    let parents: Vec<ComponentId> = store.iter().map(|c| c.id).filter(|candidate| !store.reaches(id, *candidate)).collect();
    component_mut(store, id)?.selectable_parents = parents;
    Ok(())
}

// =============================================================================
// SNAPSHOTS
// =============================================================================

/// Validate a snapshot and build a fresh, unfocused state from it.
fn load_snapshot(snapshot: Snapshot) -> Result<EditorState, EditError> {
    if snapshot.total_components != snapshot.components.len() {
        return Err(EditError::InvalidSnapshot(format!(
            "total_components is {} but {} components were supplied",
            snapshot.total_components,
            snapshot.components.len()
        )));
    }

    let mut store = ComponentStore::new();
    for component in snapshot.components {
        if store.contains(component.id) {
            return Err(EditError::InvalidSnapshot(format!("duplicate component id {}", component.id)));
        }
        if store.title_taken(&component.title) {
            return Err(EditError::DuplicateTitle(component.title));
        }
        if component.id.0 >= snapshot.next_id {
            return Err(EditError::InvalidSnapshot(format!("component id {} is not below next_id {}", component.id, snapshot.next_id)));
        }
        component.position.validate_frame()?;
        store.insert(component);
    }

    for component in store.iter() {
        let mut seen = BTreeSet::new();
        for child in &component.children {
            if !seen.insert(child.child_id) || child.child_id.0 >= component.next_child_id {
                return Err(EditError::InvalidSnapshot(format!("bad child id {} in component {}", child.child_id, component.id)));
            }
            child.position.validate_placement()?;
            if let ChildKind::Component { component_id, component_name } = &child.kind {
                let target = store.get(*component_id).ok_or(EditError::ComponentNotFound(*component_id))?;
                if target.title != *component_name {
                    return Err(EditError::InvalidSnapshot(format!(
                        "child {} of component {} names {component_name:?} but component {component_id} is {:?}",
                        child.child_id, component.id, target.title
                    )));
                }
            }
        }
        validate_metadata(&store, component)?;
    }

    if let Some(id) = store.find_cycle() {
        return Err(EditError::CycleDetected { parent: id, child: id });
    }

    Ok(EditorState {
        store,
        focus: Focus::Unfocused,
        next_id: snapshot.next_id,
        total_components: snapshot.total_components,
    })
}

/// Editing metadata must only point at things that exist.
fn validate_metadata(store: &ComponentStore, component: &Component) -> Result<(), EditError> {
    if let Some(child) = component.focus_child_id {
        if !component.has_child(child) {
            return Err(EditError::InvalidSnapshot(format!(
                "component {} focuses missing child {child}",
                component.id
            )));
        }
    }
    if let Some(parent) = component.selectable_parents.iter().find(|p| !store.contains(**p)) {
        return Err(EditError::InvalidSnapshot(format!(
            "component {} lists missing selectable parent {parent}",
            component.id
        )));
    }

    let mut ids = BTreeSet::new();
    let mut keys = BTreeSet::new();
    for prop in &component.props {
        if !ids.insert(prop.id) || prop.id.0 >= component.next_prop_id {
            return Err(EditError::InvalidSnapshot(format!("bad prop id {} in component {}", prop.id, component.id)));
        }
        if !keys.insert(prop.key.as_str()) {
            return Err(EditError::InvalidSnapshot(format!(
                "duplicate prop key {:?} in component {}",
                prop.key, component.id
            )));
        }
    }
    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

fn component_mut(store: &mut ComponentStore, id: ComponentId) -> Result<&mut Component, EditError> {
    store.get_mut(id).ok_or(EditError::ComponentNotFound(id))
}

fn validate_title(store: &ComponentStore, raw: &str) -> Result<String, EditError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(EditError::EmptyTitle);
    }
    if store.title_taken(title) {
        return Err(EditError::DuplicateTitle(title.to_owned()));
    }
    Ok(title.to_owned())
}

/// The value a counter moves to after handing out `current`.
fn next_counter(current: u32, space: IdSpace) -> Result<u32, EditError> {
    current.checked_add(1).ok_or(EditError::IdSpaceExhausted(space))
}

fn clear_component_focus_child(component: &mut Component, child_id: ChildId) {
    if component.focus_child_id == Some(ChildRef::Placed(child_id)) {
        component.focus_child_id = None;
    }
}

#![allow(clippy::float_cmp)]

use std::collections::BTreeMap;

use super::*;
use crate::doc::Child;

// =============================================================
// Helpers
// =============================================================

fn component(id: u32, title: &str, color: &str, position: Rect) -> Component {
    Component::new(ComponentId(id), title, color, position)
}

fn place(parent: &mut Component, target: &Component, position: Rect) {
    let child_id = ChildId(parent.next_child_id);
    parent.next_child_id += 1;
    parent.children.push(Child {
        child_id,
        kind: ChildKind::Component { component_id: target.id, component_name: target.title.clone() },
        position,
        html_attributes: BTreeMap::new(),
    });
}

fn place_element(parent: &mut Component, tag: &str, position: Rect) {
    let child_id = ChildId(parent.next_child_id);
    parent.next_child_id += 1;
    parent.children.push(Child {
        child_id,
        kind: ChildKind::Element { tag: tag.to_owned() },
        position,
        html_attributes: BTreeMap::new(),
    });
}

fn store_of(components: Vec<Component>) -> ComponentStore {
    let mut store = ComponentStore::new();
    for c in components {
        store.insert(c);
    }
    store
}

fn rects(nodes: &[LayoutNode]) -> Vec<Rect> {
    nodes.iter().map(|n| n.rect).collect()
}

// =============================================================
// Direct children
// =============================================================

#[test]
fn direct_child_at_unit_scale() {
    let button = component(2, "Button", "#f00", Rect::new(0.0, 0.0, 600.0, 400.0));
    let mut app = component(1, "App", "#000", Rect::new(0.0, 0.0, 600.0, 400.0));
    place(&mut app, &button, Rect::new(10.0, 10.0, 30.0, 15.0));
    let store = store_of(vec![app, button]);

    let nodes = resolve_layout(&store, ComponentId(1), Rect::new(0.0, 0.0, 600.0, 400.0)).unwrap();
    assert_eq!(nodes.len(), 1);
    let node = &nodes[0];
    assert_eq!(node.rect, Rect::new(10.0, 10.0, 30.0, 15.0));
    assert_eq!(node.child_type, ChildType::Component);
    assert_eq!(node.component_id, Some(ComponentId(2)));
    assert_eq!(node.child_id, ChildId(1));
    assert_eq!(node.color, "#f00");
    assert_eq!(node.label, "Button");
    assert_eq!(node.depth, 0);
}

#[test]
fn rendered_origin_offsets_every_node() {
    let mut app = component(1, "App", "#000", Rect::new(25.0, 25.0, 600.0, 400.0));
    place_element(&mut app, "div", Rect::new(35.0, 45.0, 60.0, 40.0));
    let store = store_of(vec![app]);

    let nodes = resolve_layout(&store, ComponentId(1), Rect::new(100.0, 50.0, 300.0, 200.0)).unwrap();
    assert_eq!(nodes[0].rect, Rect::new(105.0, 60.0, 30.0, 20.0));
    assert_eq!(nodes[0].child_type, ChildType::Element);
    assert_eq!(nodes[0].component_id, None);
    assert_eq!(nodes[0].color, ELEMENT_COLOR);
}

#[test]
fn empty_component_resolves_to_nothing() {
    let store = store_of(vec![component(1, "App", "#000", Rect::new(0.0, 0.0, 10.0, 10.0))]);
    assert!(resolve_layout(&store, ComponentId(1), Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap().is_empty());
}

#[test]
fn unknown_component_is_error() {
    let store = ComponentStore::new();
    let err = resolve_layout(&store, ComponentId(1), Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap_err();
    assert_eq!(err, EditError::ComponentNotFound(ComponentId(1)));
}

// =============================================================
// Reuse / recursion
// =============================================================

#[test]
fn reused_component_scales_per_placement() {
    let mut r = component(3, "R", "#0f0", Rect::new(0.0, 0.0, 100.0, 100.0));
    place_element(&mut r, "div", Rect::new(50.0, 0.0, 50.0, 100.0));

    let mut big = component(1, "Big", "#000", Rect::new(0.0, 0.0, 200.0, 200.0));
    place(&mut big, &r, Rect::new(0.0, 0.0, 200.0, 200.0));
    let mut small = component(2, "Small", "#000", Rect::new(0.0, 0.0, 50.0, 50.0));
    place(&mut small, &r, Rect::new(0.0, 0.0, 50.0, 50.0));
    let store = store_of(vec![big, small, r]);

    let big_nodes = resolve_layout(&store, ComponentId(1), Rect::new(0.0, 0.0, 200.0, 200.0)).unwrap();
    assert_eq!(big_nodes[1].rect, Rect::new(100.0, 0.0, 100.0, 200.0));

    let small_nodes = resolve_layout(&store, ComponentId(2), Rect::new(0.0, 0.0, 50.0, 50.0)).unwrap();
    assert_eq!(small_nodes[1].rect, Rect::new(25.0, 0.0, 25.0, 50.0));
}

#[test]
fn nested_levels_compose_offsets_and_scales() {
    // Leaf frame 10x10 with a 5x5 box in its lower-right quadrant.
    let mut leaf = component(3, "Leaf", "#111", Rect::new(0.0, 0.0, 10.0, 10.0));
    place_element(&mut leaf, "span", Rect::new(5.0, 5.0, 5.0, 5.0));
    // Mid frame 100x100 placing Leaf at (50,50) size 50x50.
    let mut mid = component(2, "Mid", "#222", Rect::new(0.0, 0.0, 100.0, 100.0));
    place(&mut mid, &leaf, Rect::new(50.0, 50.0, 50.0, 50.0));
    // App frame 200x200 placing Mid over its full area.
    let mut app = component(1, "App", "#333", Rect::new(0.0, 0.0, 200.0, 200.0));
    place(&mut app, &mid, Rect::new(0.0, 0.0, 200.0, 200.0));
    let store = store_of(vec![app, mid, leaf]);

    let nodes = resolve_layout(&store, ComponentId(1), Rect::new(0.0, 0.0, 400.0, 400.0)).unwrap();
    assert_eq!(
        rects(&nodes),
        vec![
            Rect::new(0.0, 0.0, 400.0, 400.0),
            Rect::new(200.0, 200.0, 200.0, 200.0),
            Rect::new(300.0, 300.0, 100.0, 100.0),
        ]
    );
    assert_eq!(nodes.iter().map(|n| n.depth).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(nodes[2].path, vec![ChildId(1), ChildId(1), ChildId(1)]);
    assert_eq!(nodes[2].root_child_id(), ChildId(1));
    assert_eq!(nodes[1].color, "#111");
}

#[test]
fn draw_order_is_preorder() {
    let mut card = component(2, "Card", "#abc", Rect::new(0.0, 0.0, 100.0, 100.0));
    place_element(&mut card, "h1", Rect::new(0.0, 0.0, 100.0, 20.0));
    place_element(&mut card, "p", Rect::new(0.0, 20.0, 100.0, 80.0));
    let mut app = component(1, "App", "#000", Rect::new(0.0, 0.0, 100.0, 100.0));
    place(&mut app, &card, Rect::new(0.0, 0.0, 50.0, 50.0));
    place_element(&mut app, "footer", Rect::new(0.0, 90.0, 100.0, 10.0));
    let store = store_of(vec![app, card]);

    let nodes = resolve_layout(&store, ComponentId(1), Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    let labels: Vec<&str> = nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["Card", "h1", "p", "footer"]);
    assert_eq!(nodes[2].path, vec![ChildId(1), ChildId(2)]);
    assert_eq!(nodes[3].root_child_id(), ChildId(2));
}

#[test]
fn nested_origin_is_subtracted_at_each_level() {
    let mut leaf = component(2, "Leaf", "#111", Rect::new(25.0, 25.0, 100.0, 100.0));
    place_element(&mut leaf, "div", Rect::new(25.0, 25.0, 50.0, 50.0));
    let mut app = component(1, "App", "#000", Rect::new(0.0, 0.0, 100.0, 100.0));
    place(&mut app, &leaf, Rect::new(10.0, 10.0, 100.0, 100.0));
    let store = store_of(vec![app, leaf]);

    let nodes = resolve_layout(&store, ComponentId(1), Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    assert_eq!(nodes[1].rect, Rect::new(10.0, 10.0, 50.0, 50.0));
}

// =============================================================
// Degenerate input
// =============================================================

#[test]
fn zero_size_reference_renders_nothing_below() {
    let mut flat = component(2, "Flat", "#111", Rect::new(0.0, 0.0, 0.0, 10.0));
    place_element(&mut flat, "div", Rect::new(0.0, 0.0, 1.0, 1.0));
    let mut app = component(1, "App", "#000", Rect::new(0.0, 0.0, 100.0, 100.0));
    place(&mut app, &flat, Rect::new(0.0, 0.0, 10.0, 10.0));
    let store = store_of(vec![app, flat]);

    let nodes = resolve_layout(&store, ComponentId(1), Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].label, "Flat");
}

#[test]
fn zero_size_root_frame_renders_nothing() {
    let mut app = component(1, "App", "#000", Rect::new(0.0, 0.0, 0.0, 0.0));
    place_element(&mut app, "div", Rect::new(0.0, 0.0, 1.0, 1.0));
    let store = store_of(vec![app]);
    assert!(resolve_layout(&store, ComponentId(1), Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap().is_empty());
}

#[test]
fn cycle_in_store_is_not_expanded() {
    let a_template = component(1, "A", "#000", Rect::new(0.0, 0.0, 10.0, 10.0));
    let mut b = component(2, "B", "#111", Rect::new(0.0, 0.0, 10.0, 10.0));
    place(&mut b, &a_template, Rect::new(0.0, 0.0, 10.0, 10.0));
    let mut a = a_template.clone();
    place(&mut a, &b, Rect::new(0.0, 0.0, 10.0, 10.0));
    let store = store_of(vec![a, b]);

    let nodes = resolve_layout(&store, ComponentId(1), Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
    let labels: Vec<&str> = nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["B", "A"]);
}

#[test]
fn unknown_name_is_drawn_but_not_expanded() {
    let mut app = component(1, "App", "#000", Rect::new(0.0, 0.0, 10.0, 10.0));
    app.children.push(Child {
        child_id: ChildId(1),
        kind: ChildKind::Component { component_id: ComponentId(9), component_name: "Ghost".into() },
        position: Rect::new(0.0, 0.0, 5.0, 5.0),
        html_attributes: BTreeMap::new(),
    });
    let store = store_of(vec![app]);
    let nodes = resolve_layout(&store, ComponentId(1), Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].color, ELEMENT_COLOR);
}

// =============================================================
// Idempotence
// =============================================================

#[test]
fn resolving_twice_is_identical() {
    let mut card = component(2, "Card", "#abc", Rect::new(3.0, 7.0, 33.0, 17.0));
    place_element(&mut card, "p", Rect::new(4.0, 8.0, 11.0, 3.0));
    let mut app = component(1, "App", "#000", Rect::new(0.0, 0.0, 97.0, 61.0));
    place(&mut app, &card, Rect::new(13.0, 5.0, 41.0, 29.0));
    let store = store_of(vec![app, card]);
    let frame = Rect::new(0.0, 0.0, 333.0, 211.0);

    let first = resolve_layout(&store, ComponentId(1), frame).unwrap();
    let second = resolve_layout(&store, ComponentId(1), frame).unwrap();
    assert_eq!(first, second);
}

//! Integration tests for document history through the editor.

use shared::Transform;
use treed_editor_lib::fixtures::*;
use treed_editor_lib::state::document::DocumentState;
use treed_editor_lib::state::settings::EditorSettings;
use treed_editor_lib::Editor;

fn ids(e: &Editor) -> Vec<String> {
    e.document().nodes().iter().map(|n| n.id.clone()).collect()
}

#[test]
fn test_update_transform_twice_pushes_one_snapshot() {
    let mut doc = DocumentState::default();
    doc.add(cube_node("a", 1.0));
    let past = doc.past_len();

    let t = Transform::from_position([1.0, 2.0, 3.0]);
    assert!(doc.update_transform("a", t));
    assert!(!doc.update_transform("a", t));
    assert_eq!(doc.past_len(), past + 1);
}

#[test]
fn test_editor_set_transform_is_idempotent() {
    let mut e = Editor::default();
    e.add_node(cube_node("a", 2.0));
    let past = e.document().past_len();

    let t = Transform::from_position([4.0, 1.0, 0.0]);
    e.set_transform("a", t);
    e.set_transform("a", t);
    assert_eq!(e.document().past_len(), past + 1);
}

#[test]
fn test_undo_redo_round_trip() {
    let mut e = Editor::default();
    for id in ["A", "B", "C"] {
        assert!(e.add_node(cube_node(id, 1.0)));
    }
    assert_eq!(ids(&e), vec!["A", "B", "C"]);

    for _ in 0..3 {
        assert!(e.undo());
    }
    assert!(e.document().is_empty());
    assert!(e.scene().ids().is_empty());
    assert!(!e.undo());

    for _ in 0..3 {
        assert!(e.redo());
    }
    assert_eq!(ids(&e), vec!["A", "B", "C"]);
    assert_eq!(e.scene().ids(), vec!["A", "B", "C"]);
    assert!(!e.redo());
}

#[test]
fn test_new_edit_clears_redo() {
    let mut e = Editor::default();
    e.add_node(cube_node("A", 1.0));
    e.add_node(cube_node("B", 1.0));
    e.undo();
    assert!(e.document().can_redo());

    e.add_node(cube_node("C", 1.0));
    assert!(!e.document().can_redo());
    assert_eq!(ids(&e), vec!["A", "C"]);
}

#[test]
fn test_history_depth_is_capped() {
    let mut settings = EditorSettings::default();
    settings.history.max_depth = 3;
    let mut e = Editor::new(settings);
    for i in 0..5 {
        e.add_node(cube_node(&format!("n{i}"), 1.0));
    }
    assert_eq!(e.document().past_len(), 3);

    while e.undo() {}
    // The two oldest adds fell off the history
    assert_eq!(ids(&e), vec!["n0", "n1"]);
}

#[test]
fn test_history_depth_follows_settings() {
    let mut e = Editor::default();
    for i in 0..4 {
        e.add_node(cube_node(&format!("n{i}"), 1.0));
    }
    e.update_settings(|s| s.history.max_depth = 2);
    assert_eq!(e.settings().history.max_depth, 2);
    assert_eq!(e.document().past_len(), 2);

    e.add_node(cube_node("n4", 1.0));
    assert_eq!(e.document().past_len(), 2);
}

#[test]
fn test_undo_of_move_restores_live_transform() {
    let mut e = Editor::default();
    e.add_node(cube_node_at("a", 2.0, [0.0, 1.0, 0.0]));
    e.set_transform("a", Transform::from_position([3.0, 1.0, 0.0]));

    assert!(e.undo());
    let live = e.scene().find_object("a").unwrap().transform;
    assert_eq!(live.position, [0.0, 1.0, 0.0]);
    assert!(e.redo());
    assert_eq!(e.scene().find_object("a").unwrap().transform.position, [3.0, 1.0, 0.0]);
}

#[test]
fn test_load_drops_history() {
    let mut e = Editor::default();
    e.add_node(cube_node("x", 1.0));
    e.load(three_cube_document());
    assert!(!e.document().can_undo());
    assert_eq!(ids(&e), vec!["a", "b", "c"]);
}

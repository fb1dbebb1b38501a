//! Integration tests for the JSON command protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use treed_editor_lib::command::{execute_json, execute_json_batch};
use treed_editor_lib::validation::parse_document;
use treed_editor_lib::Editor;

const THREE_CUBES: &str = r#"[
    {"command": "add", "id": "a", "primitive": {"type": "cube", "params": {"size": 2}}, "transform": {"position": [0, 1, 0], "rotation": [0, 0, 0], "scale": [1, 1, 1]}},
    {"command": "add", "id": "b", "primitive": {"type": "cube", "params": {"size": 2}}, "transform": {"position": [5, 1, 0], "rotation": [0, 0, 0], "scale": [1, 1, 1]}},
    {"command": "add", "id": "c", "primitive": {"type": "cube", "params": {"size": 2}}, "transform": {"position": [10, 1, 0], "rotation": [0, 0, 0], "scale": [1, 1, 1]}}
]"#;

fn editor_with_cubes() -> Editor {
    let mut e = Editor::default();
    for resp in execute_json_batch(&mut e, THREE_CUBES).unwrap() {
        assert!(resp.success, "Failed: {:?}", resp.error);
    }
    e
}

#[test]
fn test_command_add_and_scene_graph() {
    let mut e = editor_with_cubes();
    let resp = execute_json(&mut e, r#"{"command": "scene_graph"}"#).unwrap();
    let nodes = resp.data.unwrap()["nodes"].as_array().unwrap().clone();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[2]["name"], "Cube 3");
}

#[test]
fn test_command_add_duplicate_id_rejected() {
    let mut e = editor_with_cubes();
    let resp = execute_json(
        &mut e,
        r#"{"command": "add", "id": "a", "primitive": {"type": "sphere", "params": {"radius": 1}}}"#,
    )
    .unwrap();
    assert!(!resp.success);
    assert_eq!(e.document().len(), 3);
}

#[test]
fn test_command_plane_click() {
    let mut e = editor_with_cubes();
    let resps = execute_json_batch(
        &mut e,
        r#"[
            {"command": "mode", "mode": "planes"},
            {"command": "click", "origin": [5.3, 50.0, 0.1], "direction": [0.0, -1.0, 0.0]}
        ]"#,
    )
    .unwrap();
    let data = resps[1].data.as_ref().unwrap();
    assert_eq!(data["plane"]["object_id"], "b");
    assert_eq!(data["plane"]["face_ids"].as_array().unwrap().len(), 2);
    assert_eq!(data["selected"].as_array().unwrap().len(), 0);
}

#[test]
fn test_command_duplicate_array_mirror() {
    let mut e = editor_with_cubes();
    let resps = execute_json_batch(
        &mut e,
        r#"[
            {"command": "select", "ids": ["b"]},
            {"command": "duplicate"},
            {"command": "array", "count": 2, "spacing": 3.0, "axis": "z"},
            {"command": "mirror", "axis": "x", "mode": "copy"},
            {"command": "inspect"}
        ]"#,
    )
    .unwrap();
    for resp in &resps {
        assert!(resp.success, "Failed: {:?}", resp.error);
    }
    assert_eq!(resps[2].data.as_ref().unwrap()["ids"].as_array().unwrap().len(), 2);
    // 3 + duplicate + 2 array copies + mirror copy
    assert_eq!(resps[4].data.as_ref().unwrap()["node_count"], 7);
}

#[test]
fn test_command_flags_and_rename() {
    let mut e = editor_with_cubes();
    let resps = execute_json_batch(
        &mut e,
        r#"[
            {"command": "set_visible", "id": "a", "visible": false},
            {"command": "set_locked", "id": "b", "locked": true},
            {"command": "rename", "id": "c", "name": "Lid"},
            {"command": "reorder", "ids": ["c", "a", "b"]},
            {"command": "scene_graph"}
        ]"#,
    )
    .unwrap();
    let nodes = resps[4].data.as_ref().unwrap()["nodes"].as_array().unwrap().clone();
    assert_eq!(nodes[0]["name"], "Lid");
    assert_eq!(nodes[1]["visible"], false);
    assert_eq!(nodes[2]["locked"], true);
}

#[test]
fn test_command_tool_needs_selection() {
    let mut e = editor_with_cubes();
    execute_json(&mut e, r#"{"command": "clear_selection"}"#).unwrap();
    let resp = execute_json(&mut e, r#"{"command": "tool", "tool": "translate"}"#).unwrap();
    assert!(resp.data.unwrap()["attached"].is_null());

    execute_json(&mut e, r#"{"command": "select", "ids": ["a"]}"#).unwrap();
    let resp = execute_json(&mut e, r#"{"command": "tool", "tool": "translate"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["attached"], "a");
}

#[test]
fn test_command_set_transform_then_export() {
    let mut e = editor_with_cubes();
    let resp = execute_json(
        &mut e,
        r#"{"command": "set_transform", "id": "a", "transform": {"position": [1, 2, 3], "rotation": [0, 0, 0], "scale": [1, 1, 1]}}"#,
    )
    .unwrap();
    assert!(resp.success);

    let resp = execute_json(&mut e, r#"{"command": "export"}"#).unwrap();
    let json = resp.data.unwrap()["scene_json"].as_str().unwrap().to_string();
    let doc = parse_document(&json).unwrap();
    assert_eq!(doc.nodes.len(), 3);
    assert_eq!(doc.nodes[0].transform.unwrap().position, [1.0, 2.0, 3.0]);
}

#[test]
fn test_command_load_and_new() {
    let mut e = editor_with_cubes();
    let resp = execute_json(
        &mut e,
        r#"{"command": "load", "document": {"nodes": [{"uuid": "s", "type": "sphere", "params": {"radius": 2}}]}}"#,
    )
    .unwrap();
    assert!(resp.success, "Failed: {:?}", resp.error);
    assert_eq!(e.scene().ids(), vec!["s".to_string()]);

    let resp = execute_json(&mut e, r#"{"command": "load", "document": {"nodes": [{"uuid": "s"}, {"uuid": "s"}]}}"#).unwrap();
    assert!(!resp.success);
    assert_eq!(e.scene().ids(), vec!["s".to_string()]);

    execute_json(&mut e, r#"{"command": "new"}"#).unwrap();
    assert!(e.document().is_empty());
}

//! JSON command protocol for driving the editor headlessly.

use serde::{Deserialize, Serialize};
use shared::{Node, Primitive, Transform};

use crate::editor::{Editor, MirrorMode};
use crate::export::kind_counts;
use crate::geometry::Axis;
use crate::state::selection::SelectionMode;
use crate::validation::parse_document_value;
use crate::viewport::gizmo::TransformTool;
use crate::viewport::picking::Ray;

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Add a primitive; optional explicit id and transform
    Add {
        primitive: Primitive,
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        transform: Option<Transform>,
    },
    Delete {
        id: String,
    },
    Select {
        ids: Vec<String>,
    },
    ClearSelection,
    Undo,
    Redo,
    SetVisible {
        id: String,
        visible: bool,
    },
    SetLocked {
        id: String,
        locked: bool,
    },
    Rename {
        id: String,
        name: String,
    },
    Reorder {
        ids: Vec<String>,
    },
    SetTransform {
        id: String,
        transform: Transform,
    },
    Duplicate,
    Array {
        count: usize,
        spacing: f64,
        #[serde(default)]
        axis: Axis,
    },
    Mirror {
        #[serde(default)]
        axis: Axis,
        #[serde(default)]
        mode: MirrorMode,
    },
    Mode {
        mode: SelectionMode,
    },
    Tool {
        tool: TransformTool,
    },
    /// Committed click along a world-space ray
    Click {
        origin: [f32; 3],
        direction: [f32; 3],
    },
    /// Replace the document (validated first)
    Load {
        document: serde_json::Value,
    },
    New,
    SceneGraph,
    Inspect,
    Export,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }

    /// Success carrying a flag, or a failure naming the unknown id
    fn flag(done: bool, what: &str, id: &str) -> Self {
        if done {
            Self::ok()
        } else {
            Self::err(format!("{what}: unknown id {id}"))
        }
    }
}

pub fn execute_command(editor: &mut Editor, cmd: EditorCommand) -> CommandResponse {
    match cmd {
        EditorCommand::Add {
            primitive,
            id,
            transform,
        } => {
            let id = id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let mut node = Node::new(id.clone(), primitive);
            node.transform = transform;
            if editor.add_node(node) {
                CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
            } else {
                CommandResponse::err(format!("Duplicate id {id}"))
            }
        }

        EditorCommand::Delete { id } => CommandResponse::flag(editor.delete(&id), "delete", &id),

        EditorCommand::Select { ids } => {
            if editor.select(&ids) {
                CommandResponse::ok_with_data(serde_json::json!({ "selected": editor.selected_ids() }))
            } else {
                CommandResponse::err(format!("select: unknown id {}", ids.join(", ")))
            }
        }

        EditorCommand::ClearSelection => {
            editor.clear_selection();
            CommandResponse::ok()
        }

        EditorCommand::Undo => {
            let undone = editor.undo();
            CommandResponse::ok_with_data(serde_json::json!({ "undone": undone }))
        }

        EditorCommand::Redo => {
            let redone = editor.redo();
            CommandResponse::ok_with_data(serde_json::json!({ "redone": redone }))
        }

        EditorCommand::SetVisible { id, visible } => {
            CommandResponse::flag(editor.set_visible(&id, visible), "set_visible", &id)
        }

        EditorCommand::SetLocked { id, locked } => {
            CommandResponse::flag(editor.set_locked(&id, locked), "set_locked", &id)
        }

        EditorCommand::Rename { id, name } => {
            CommandResponse::flag(editor.rename(&id, &name), "rename", &id)
        }

        EditorCommand::Reorder { ids } => {
            if editor.reorder(&ids) {
                CommandResponse::ok()
            } else {
                CommandResponse::err("reorder: unknown id in list")
            }
        }

        EditorCommand::SetTransform { id, transform } => {
            CommandResponse::flag(editor.set_transform(&id, transform), "set_transform", &id)
        }

        EditorCommand::Duplicate => match editor.duplicate_selection() {
            Some(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
            None => CommandResponse::err("Nothing selected"),
        },

        EditorCommand::Array {
            count,
            spacing,
            axis,
        } => {
            let ids = editor.array_selection(count, spacing, axis);
            if ids.is_empty() {
                CommandResponse::err("Nothing selected or count < 1")
            } else {
                CommandResponse::ok_with_data(serde_json::json!({ "ids": ids }))
            }
        }

        EditorCommand::Mirror { axis, mode } => match editor.mirror_selection(axis, mode) {
            Some(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
            None => CommandResponse::err("Nothing selected"),
        },

        EditorCommand::Mode { mode } => {
            editor.set_mode(mode);
            CommandResponse::ok()
        }

        EditorCommand::Tool { tool } => {
            editor.set_tool(tool);
            CommandResponse::ok_with_data(serde_json::json!({ "attached": editor.gizmo().attached() }))
        }

        EditorCommand::Click { origin, direction } => {
            editor.click(&Ray::new(origin.into(), direction.into()));
            CommandResponse::ok_with_data(serde_json::json!({
                "selected": editor.selected_ids(),
                "plane": editor.selected_plane(),
            }))
        }

        EditorCommand::Load { document } => match parse_document_value(document) {
            Ok(doc) => {
                editor.load(doc);
                CommandResponse::ok_with_data(serde_json::json!({ "node_count": editor.document().len() }))
            }
            Err(e) => {
                tracing::warn!("Rejected document: {e}");
                CommandResponse::err(format!("Invalid document: {e}"))
            }
        },

        EditorCommand::New => {
            editor.new_document();
            CommandResponse::ok()
        }

        EditorCommand::SceneGraph => {
            CommandResponse::ok_with_data(serde_json::json!({ "nodes": editor.get_scene_graph() }))
        }

        EditorCommand::Inspect => {
            let nodes = editor.document().nodes();
            let kinds: serde_json::Map<String, serde_json::Value> = kind_counts(nodes)
                .into_iter()
                .map(|(k, n)| (k.to_string(), n.into()))
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "node_count": nodes.len(),
                "kinds": kinds,
                "selected": editor.selected_ids(),
                "mode": editor.selection().mode(),
                "can_undo": editor.document().can_undo(),
                "can_redo": editor.document().can_redo(),
                "rebuilds": editor.rebuild_count(),
            }))
        }

        EditorCommand::Export => match editor.export_scene_json() {
            Ok(json) => CommandResponse::ok_with_data(serde_json::json!({ "scene_json": json })),
            Err(e) => CommandResponse::err(format!("Export failed: {e}")),
        },
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(editor: &mut Editor, json: &str) -> Result<CommandResponse, String> {
    let cmd: EditorCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(editor, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(editor: &mut Editor, json: &str) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<EditorCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(editor, cmd))
        .collect())
}

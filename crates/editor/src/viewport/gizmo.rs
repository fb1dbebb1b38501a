use serde::{Deserialize, Serialize};
use shared::{ObjectId, Transform};

use crate::state::settings::SnapSettings;

/// Active transform tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformTool {
    #[default]
    None,
    Translate,
    Rotate,
    Scale,
}

impl TransformTool {
    /// Keyboard shortcut: g / r / s
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'g' => Some(TransformTool::Translate),
            'r' => Some(TransformTool::Rotate),
            's' => Some(TransformTool::Scale),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        *self != TransformTool::None
    }
}

/// Transform manipulator bound to at most one body
#[derive(Debug, Default)]
pub struct GizmoState {
    pub tool: TransformTool,
    /// Body the manipulator is attached to
    attached: Option<ObjectId>,
    /// Transform at drag start, while a drag is in progress
    drag_start: Option<Transform>,
}

impl GizmoState {
    /// Re-evaluate the binding for the current body selection.
    ///
    /// Attached only when a tool is chosen and the body is not locked.
    /// Moving off a body mid-drag ends the drag and returns that body with
    /// its drag-start transform so the caller can roll the preview back.
    #[must_use]
    pub fn bind(
        &mut self,
        selected: Option<&ObjectId>,
        locked: bool,
    ) -> Option<(ObjectId, Transform)> {
        let target = selected.filter(|_| self.tool.is_active() && !locked);
        let interrupted = if self.attached.as_ref() != target {
            self.drag_start.take().zip(self.attached.clone()).map(|(t, id)| (id, t))
        } else {
            None
        };
        self.attached = target.cloned();
        interrupted
    }

    pub fn attached(&self) -> Option<&ObjectId> {
        self.attached.as_ref()
    }

    pub fn is_attached_to(&self, id: &str) -> bool {
        self.attached.as_deref() == Some(id)
    }

    /// Start a drag on the attached body; false when nothing is attached.
    pub fn begin_drag(&mut self, current: Transform) -> bool {
        if self.attached.is_none() {
            return false;
        }
        self.drag_start = Some(current);
        true
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    /// Finish the drag, returning the transform it started from
    pub fn end_drag(&mut self) -> Option<Transform> {
        self.drag_start.take()
    }
}

/// Quantize the components the tool edits to the snap steps.
pub fn snap_transform(t: Transform, tool: TransformTool, snap: &SnapSettings) -> Transform {
    if !snap.enabled {
        return t;
    }
    let mut out = t;
    match tool {
        TransformTool::Translate => {
            out.position = t.position.map(|v| round_to(v, snap.move_step));
        }
        TransformTool::Rotate => {
            let step = snap.rotation_step_deg.to_radians();
            out.rotation = t.rotation.map(|v| round_to(v, step));
        }
        TransformTool::Scale => {
            out.scale = t
                .scale
                .map(|v| round_to(v, snap.scale_step).max(SnapSettings::MIN_STEP));
        }
        TransformTool::None => {}
    }
    out
}

fn round_to(value: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}

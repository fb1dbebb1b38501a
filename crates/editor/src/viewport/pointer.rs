//! Pointer gesture tracking: hover suspension and click vs. drag disambiguation.

use glam::Vec2;

use super::picking::Ray;

/// A pointer sample: screen position plus the world ray under it
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub position: Vec2,
    pub ray: Ray,
}

impl PointerEvent {
    pub fn new(position: Vec2, ray: Ray) -> Self {
        Self { position, ray }
    }
}

/// What a pointer-up turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Down and up within the click tolerance
    Click,
    /// Pointer travelled too far; camera drag, no pick
    Drag,
    /// Up without a matching down
    None,
}

/// Tracks pointer-down position and the gestures that suspend hover.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    /// Maximum squared screen distance between down and up for a click, px²
    click_tolerance: f32,
    down_at: Option<Vec2>,
    orbiting: bool,
    gizmo_dragging: bool,
}

impl PointerTracker {
    pub fn new(click_tolerance: f32) -> Self {
        Self {
            click_tolerance,
            down_at: None,
            orbiting: false,
            gizmo_dragging: false,
        }
    }

    pub fn pointer_down(&mut self, position: Vec2) {
        self.down_at = Some(position);
    }

    pub fn pointer_up(&mut self, position: Vec2) -> Gesture {
        match self.down_at.take() {
            Some(down) if down.distance_squared(position) <= self.click_tolerance => Gesture::Click,
            Some(_) => Gesture::Drag,
            None => Gesture::None,
        }
    }

    pub fn set_orbiting(&mut self, orbiting: bool) {
        self.orbiting = orbiting;
    }

    pub fn set_gizmo_dragging(&mut self, dragging: bool) {
        self.gizmo_dragging = dragging;
    }

    /// Hover picking runs only when neither a camera orbit nor a gizmo drag is active
    pub fn hover_allowed(&self) -> bool {
        !self.orbiting && !self.gizmo_dragging
    }

    /// Squared screen distance, px²
    pub fn set_click_tolerance(&mut self, tolerance: f32) {
        self.click_tolerance = tolerance.max(0.0);
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(2.0)
    }
}

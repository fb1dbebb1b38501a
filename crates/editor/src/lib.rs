// Library crate: the headless editor engine, exposed for the command-line
// driver and for integration tests.

pub mod build;
pub mod command;
pub mod editor;
pub mod events;
pub mod export;
pub mod fixtures;
pub mod geometry;
pub mod state;
pub mod sync;
pub mod validation;

/// Mesh, picking, coplanar regions and pointer/gizmo input.
pub mod viewport {
    pub mod gizmo;
    pub mod mesh;
    pub mod picking;
    pub mod pointer;
    pub mod region;
}

pub use editor::Editor;

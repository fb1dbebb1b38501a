//! Live scene construction from document nodes

pub mod primitives;
pub mod scene;

pub use primitives::{MeshFactory, PrimitiveFactory, Renderable};
pub use scene::{HelperKind, LiveObject, LiveScene};

//! Validation of data crossing into the editor.
//!
//! `parse_document` guards the document model against malformed external
//! files; `MeshValidator` checks factory output (buffer strides, index range,
//! unit normals, extents).

use std::collections::HashSet;

use shared::{DocumentFile, Node};
use thiserror::Error;

use crate::geometry::triangle_area;
use crate::viewport::mesh::MeshData;
use crate::viewport::picking::Aabb;

/// Why an external document was rejected
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("document has no \"nodes\" field")]
    MissingNodes,
    #[error("\"nodes\" is not an array")]
    NodesNotArray,
    #[error("node {index} is malformed: {source}")]
    BadNode {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate node id {0}")]
    DuplicateId(String),
}

/// Parse and validate a document from JSON text.
pub fn parse_document(json: &str) -> Result<DocumentFile, DocumentError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    parse_document_value(value)
}

/// Validate an already parsed JSON value as a document.
pub fn parse_document_value(value: serde_json::Value) -> Result<DocumentFile, DocumentError> {
    let serde_json::Value::Object(mut root) = value else {
        return Err(DocumentError::MissingNodes);
    };
    let entries = match root.remove("nodes") {
        Some(serde_json::Value::Array(entries)) => entries,
        Some(_) => return Err(DocumentError::NodesNotArray),
        None => return Err(DocumentError::MissingNodes),
    };

    let mut seen = HashSet::new();
    let mut nodes = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let node: Node =
            serde_json::from_value(entry).map_err(|source| DocumentError::BadNode { index, source })?;
        if !seen.insert(node.id.clone()) {
            return Err(DocumentError::DuplicateId(node.id));
        }
        nodes.push(node);
    }
    Ok(DocumentFile { nodes })
}

/// Integrity checks over a `MeshData`.
pub struct MeshValidator<'a> {
    mesh: &'a MeshData,
}

impl<'a> MeshValidator<'a> {
    pub fn new(mesh: &'a MeshData) -> Self {
        Self { mesh }
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    /// Vertex buffer is whole vertices and index buffer whole triangles
    pub fn are_strides_valid(&self) -> bool {
        self.mesh.vertices.len() % 9 == 0 && self.mesh.indices.len() % 3 == 0
    }

    pub fn are_indices_in_range(&self) -> bool {
        let n = self.vertex_count() as u32;
        self.mesh.indices.iter().all(|&i| i < n)
    }

    /// Every vertex normal has unit length within `epsilon`
    pub fn are_normals_normalized(&self, epsilon: f32) -> bool {
        self.mesh.vertices.chunks_exact(9).all(|v| {
            let len = (v[3] * v[3] + v[4] * v[4] + v[5] * v[5]).sqrt();
            (len - 1.0).abs() <= epsilon
        })
    }

    /// Zero-area triangles (cone apexes, pole rows)
    pub fn degenerate_triangle_count(&self) -> usize {
        self.mesh
            .triangles()
            .filter(|(_, t)| triangle_area(t) <= f32::EPSILON)
            .count()
    }

    /// Bounding box extents (width, height, depth)
    pub fn dimensions(&self) -> [f32; 3] {
        let aabb = Aabb::from_mesh(self.mesh);
        (aabb.max - aabb.min).to_array()
    }

    pub fn assert_dimensions_approx(&self, expected: [f32; 3], tolerance: f32) -> bool {
        self.dimensions()
            .iter()
            .zip(expected)
            .all(|(d, e)| (d - e).abs() < tolerance)
    }

    /// Empty list means the mesh is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.are_strides_valid() {
            errors.push(format!(
                "Buffer lengths not whole vertices/triangles: {} floats, {} indices",
                self.mesh.vertices.len(),
                self.mesh.indices.len()
            ));
        }
        if !self.are_indices_in_range() {
            errors.push(format!("Indices out of range (vertex_count={})", self.vertex_count()));
        }
        if !self.are_normals_normalized(0.1) {
            errors.push("Some normals are not unit-length (epsilon=0.1)".to_string());
        }
        if self.triangle_count() == 0 {
            errors.push("Mesh has no triangles".to_string());
        }
        errors
    }
}

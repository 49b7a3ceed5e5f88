//! Capability traits for host application meshes.
//!
//! A host (3ds Max, Maya, an in-memory mesh) exposes its polygons through
//! [`PolygonMesh`] so that the exporter can walk them face vertex by face
//! vertex without knowing the host's object model.
//!
//! Face vertices are addressed by `(polygon, vertex)`, where `vertex` is the
//! position of the vertex in the polygon's enumeration. Hole vertices follow
//! the outer boundary in that enumeration.

/// A hole cut from a host polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleInfo {
    /// Polygon the hole belongs to.
    pub polygon: usize,
    /// Number of vertices on the hole's boundary.
    pub vertex_count: usize,
    /// Mesh vertex index of the first vertex of the hole.
    pub first_vertex: u32,
}

/// A per-face-vertex color set of the host mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSet {
    pub name: String,
    /// Color index written for face vertices without a color.
    pub white_color_index: u32,
}

impl ColorSet {
    pub fn new(name: impl Into<String>, white_color_index: u32) -> Self {
        Self {
            name: name.into(),
            white_color_index,
        }
    }
}

/// Read access to a host polygon mesh.
pub trait PolygonMesh {
    fn num_polygons(&self) -> usize;

    /// Number of face vertices of `polygon`, hole vertices included.
    fn polygon_vertex_count(&self, polygon: usize) -> usize;

    /// Mesh vertex (position) index of a face vertex.
    fn vertex_index(&self, polygon: usize, vertex: usize) -> u32;

    fn has_face_vertex_normals(&self) -> bool;

    fn normal_index(&self, polygon: usize, vertex: usize) -> Option<u32>;

    fn uv_set_names(&self) -> &[String];

    fn uv_index(&self, polygon: usize, vertex: usize, uv_set: usize) -> Option<u32>;

    fn color_sets(&self) -> &[ColorSet];

    /// `None` means the face vertex carries no color.
    fn color_index(&self, polygon: usize, vertex: usize, color_set: usize) -> Option<u32>;

    fn is_holed(&self, polygon: usize) -> bool;

    /// All holes of the mesh.
    fn hole_infos(&self) -> &[HoleInfo];

    /// Triangles covering `polygon` as triples of face-vertex positions, or
    /// `None` if the host cannot triangulate it.
    fn triangulate(&self, polygon: usize) -> Option<Vec<[usize; 3]>>;

    /// Material names of the mesh's shader slots.
    fn shaders(&self) -> &[String];

    /// Shader slot of `polygon`. `None` or an index past [`PolygonMesh::shaders`]
    /// means the polygon has no material.
    fn shader_index(&self, polygon: usize) -> Option<usize>;
}

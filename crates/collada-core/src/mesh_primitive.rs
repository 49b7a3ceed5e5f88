//! Decoded mesh primitive: de-interleaved index arrays plus face structure.

use crate::geometry_indices::{FaceIndex, MaterialId};
use crate::index_list::IndexList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Triangles,
    /// Both `<polylist>` and `<polygons>`.
    Polygons,
    Tristrips,
    Trifans,
}

impl PrimitiveType {
    pub fn is_strip_or_fan(self) -> bool {
        matches!(self, PrimitiveType::Tristrips | PrimitiveType::Trifans)
    }
}

/// A hole cut from a polygon of a `<polygons>` primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolygonHole {
    /// Position of the hole's negative entry in the vertex-count array.
    pub entry: usize,
    /// Polygon the hole belongs to.
    pub face: FaceIndex,
}

/// Lengths of every index array of a primitive at some point of decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexArrayLengths {
    pub positions: usize,
    pub normals: usize,
    pub uv_coords: Vec<usize>,
    pub colors: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct MeshPrimitive {
    primitive_type: PrimitiveType,
    position_indices: Vec<u32>,
    normal_indices: Vec<u32>,
    uv_coord_indices: Vec<IndexList>,
    color_indices: Vec<IndexList>,
    grouped_vertices_vertex_count: Vec<i32>,
    polygon_holes: Vec<PolygonHole>,
    grouped_vertex_elements_count: usize,
    face_count: usize,
    material_id: MaterialId,
    material: String,
}

impl MeshPrimitive {
    pub fn new(primitive_type: PrimitiveType) -> Self {
        Self {
            primitive_type,
            position_indices: Vec::new(),
            normal_indices: Vec::new(),
            uv_coord_indices: Vec::new(),
            color_indices: Vec::new(),
            grouped_vertices_vertex_count: Vec::new(),
            polygon_holes: Vec::new(),
            grouped_vertex_elements_count: 0,
            face_count: 0,
            material_id: MaterialId::default(),
            material: String::new(),
        }
    }

    pub fn primitive_type(&self) -> PrimitiveType {
        self.primitive_type
    }

    pub fn position_indices(&self) -> &[u32] {
        &self.position_indices
    }

    pub fn position_indices_mut(&mut self) -> &mut Vec<u32> {
        &mut self.position_indices
    }

    pub fn normal_indices(&self) -> &[u32] {
        &self.normal_indices
    }

    pub fn normal_indices_mut(&mut self) -> &mut Vec<u32> {
        &mut self.normal_indices
    }

    pub fn has_normal_indices(&self) -> bool {
        !self.normal_indices.is_empty()
    }

    pub fn uv_coord_indices(&self) -> &[IndexList] {
        &self.uv_coord_indices
    }

    pub fn uv_coord_indices_mut(&mut self) -> &mut Vec<IndexList> {
        &mut self.uv_coord_indices
    }

    pub fn color_indices(&self) -> &[IndexList] {
        &self.color_indices
    }

    pub fn color_indices_mut(&mut self) -> &mut Vec<IndexList> {
        &mut self.color_indices
    }

    /// Vertex counts of the polygons, strips or fans. Negative entries are
    /// holes of the preceding polygon.
    pub fn grouped_vertices_vertex_count(&self) -> &[i32] {
        &self.grouped_vertices_vertex_count
    }

    pub fn append_grouped_vertices_vertex_count(&mut self, count: i32) {
        self.grouped_vertices_vertex_count.push(count);
    }

    /// Registers a hole of `face` and records its negative vertex count.
    pub fn append_polygon_hole(&mut self, face: FaceIndex, vertex_count: usize) {
        let entry = self.grouped_vertices_vertex_count.len();
        self.grouped_vertices_vertex_count
            .push(-i32::try_from(vertex_count).unwrap_or(i32::MAX));
        self.polygon_holes.push(PolygonHole { entry, face });
    }

    pub fn polygon_holes(&self) -> &[PolygonHole] {
        &self.polygon_holes
    }

    pub fn num_polygon_holes(&self) -> usize {
        self.polygon_holes.len()
    }

    /// Number of strips or fans.
    pub fn grouped_vertex_elements_count(&self) -> usize {
        self.grouped_vertex_elements_count
    }

    pub fn set_grouped_vertex_elements_count(&mut self, count: usize) {
        self.grouped_vertex_elements_count = count;
    }

    pub fn face_count(&self) -> usize {
        self.face_count
    }

    pub fn set_face_count(&mut self, face_count: usize) {
        self.face_count = face_count;
    }

    pub fn material_id(&self) -> MaterialId {
        self.material_id
    }

    pub fn set_material_id(&mut self, material_id: MaterialId) {
        self.material_id = material_id;
    }

    /// Material symbol of the primitive's `material` attribute.
    pub fn material(&self) -> &str {
        &self.material
    }

    pub fn set_material(&mut self, material: impl Into<String>) {
        self.material = material.into();
    }

    pub fn reserve(&mut self, additional: usize) {
        self.position_indices.reserve(additional);
        self.normal_indices.reserve(additional);
    }

    pub fn index_array_lengths(&self) -> IndexArrayLengths {
        IndexArrayLengths {
            positions: self.position_indices.len(),
            normals: self.normal_indices.len(),
            uv_coords: self.uv_coord_indices.iter().map(IndexList::len).collect(),
            colors: self.color_indices.iter().map(IndexList::len).collect(),
        }
    }

    /// Shrinks every index array back to the given lengths. Channels created
    /// after the lengths were taken are emptied.
    pub fn restore_index_array_lengths(&mut self, lengths: &IndexArrayLengths) {
        self.position_indices.truncate(lengths.positions);
        self.normal_indices.truncate(lengths.normals);
        for (i, list) in self.uv_coord_indices.iter_mut().enumerate() {
            list.truncate(lengths.uv_coords.get(i).copied().unwrap_or(0));
        }
        for (i, list) in self.color_indices.iter_mut().enumerate() {
            list.truncate(lengths.colors.get(i).copied().unwrap_or(0));
        }
    }

    /// Keeps `count` entries past `start` in every index array. A channel
    /// created after `start` was taken starts at zero.
    pub fn truncate_after(&mut self, start: &IndexArrayLengths, count: usize) {
        let keep = |lengths: &[usize], i: usize| lengths.get(i).copied().unwrap_or(0) + count;
        self.position_indices.truncate(start.positions + count);
        self.normal_indices.truncate(start.normals + count);
        for (i, list) in self.uv_coord_indices.iter_mut().enumerate() {
            list.truncate(keep(&start.uv_coords, i));
        }
        for (i, list) in self.color_indices.iter_mut().enumerate() {
            list.truncate(keep(&start.colors, i));
        }
    }

    pub fn truncate_index_arrays(&mut self, len: usize) {
        self.position_indices.truncate(len);
        self.normal_indices.truncate(len);
        for list in &mut self.uv_coord_indices {
            list.truncate(len);
        }
        for list in &mut self.color_indices {
            list.truncate(len);
        }
    }

    /// Sum of the positive vertex counts.
    pub fn face_vertex_count_sum(&self) -> usize {
        self.grouped_vertices_vertex_count
            .iter()
            .filter(|&&count| count > 0)
            .map(|&count| count as usize)
            .sum()
    }

    /// Number of indices in the primitive, counting polygon and hole vertices.
    pub fn vertex_index_count(&self) -> usize {
        match self.primitive_type {
            PrimitiveType::Triangles => self.face_count * 3,
            _ => self
                .grouped_vertices_vertex_count
                .iter()
                .map(|count| count.unsigned_abs() as usize)
                .sum(),
        }
    }

    /// Number of triangles the primitive covers once triangulated.
    pub fn triangle_count(&self) -> usize {
        match self.primitive_type {
            PrimitiveType::Triangles => self.face_count,
            PrimitiveType::Tristrips | PrimitiveType::Trifans => self.face_count,
            PrimitiveType::Polygons => self
                .grouped_vertices_vertex_count
                .iter()
                .filter(|&&count| count >= 3)
                .map(|&count| count as usize - 2)
                .sum(),
        }
    }

    pub fn has_only_triangles(&self) -> bool {
        match self.primitive_type {
            PrimitiveType::Triangles => true,
            PrimitiveType::Tristrips | PrimitiveType::Trifans => false,
            PrimitiveType::Polygons => self
                .grouped_vertices_vertex_count
                .iter()
                .all(|&count| count == 3),
        }
    }
}

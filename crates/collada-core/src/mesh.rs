use std::collections::BTreeMap;

use crate::geometry_indices::MaterialId;
use crate::mesh_primitive::MeshPrimitive;
use crate::mesh_vertex_data::MeshVertexData;

/// A decoded `<mesh>`: merged vertex buffers plus the primitives indexing them.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    id: String,
    name: String,
    positions: MeshVertexData,
    normals: MeshVertexData,
    colors: MeshVertexData,
    uv_coords: MeshVertexData,
    primitives: Vec<MeshPrimitive>,
}

impl Mesh {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn positions(&self) -> &MeshVertexData {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut MeshVertexData {
        &mut self.positions
    }

    pub fn normals(&self) -> &MeshVertexData {
        &self.normals
    }

    pub fn normals_mut(&mut self) -> &mut MeshVertexData {
        &mut self.normals
    }

    pub fn colors(&self) -> &MeshVertexData {
        &self.colors
    }

    pub fn colors_mut(&mut self) -> &mut MeshVertexData {
        &mut self.colors
    }

    pub fn uv_coords(&self) -> &MeshVertexData {
        &self.uv_coords
    }

    pub fn uv_coords_mut(&mut self) -> &mut MeshVertexData {
        &mut self.uv_coords
    }

    pub fn primitives(&self) -> &[MeshPrimitive] {
        &self.primitives
    }

    pub fn add_primitive(&mut self, primitive: MeshPrimitive) {
        self.primitives.push(primitive);
    }

    pub fn num_primitives(&self) -> usize {
        self.primitives.len()
    }

    pub fn face_count(&self) -> usize {
        self.primitives.iter().map(MeshPrimitive::face_count).sum()
    }

    /// Triangles needed to represent the mesh.
    pub fn triangle_count(&self) -> usize {
        self.primitives.iter().map(MeshPrimitive::triangle_count).sum()
    }

    pub fn has_only_triangles(&self) -> bool {
        self.primitives.iter().all(MeshPrimitive::has_only_triangles)
    }

    /// Maps the material ids of the primitives to consecutive host material
    /// ids starting at 1, in order of first use.
    pub fn material_id_map(&self) -> BTreeMap<MaterialId, u32> {
        let mut map = BTreeMap::new();
        let mut next_host_id = 1;
        for primitive in &self.primitives {
            map.entry(primitive.material_id()).or_insert_with(|| {
                let id = next_host_id;
                next_host_id += 1;
                id
            });
        }
        map
    }
}
